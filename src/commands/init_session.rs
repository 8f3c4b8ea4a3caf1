//! Session initialization command
//!
//! Interactive login that creates the session file used by every other
//! command. Run once per account.

use std::io::{self, Write};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::get_client_for_init;

pub async fn run() -> Result<()> {
    let config = Config::new();

    println!(
        r#"
This will create a NEW Telegram session for {}.

Creating a fresh session signs you out on devices that shared the old
session file. Type 'YES' (uppercase) to continue: "#,
        config.phone
    );

    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        println!("\nCancelled. No session file was created.");
        return Ok(());
    }

    println!("\nRequesting a login code for {}...", config.phone);

    // Connect without existing session
    let client = get_client_for_init().await?;

    let token = client
        .request_login_code(&config.phone, &config.api_hash)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

    println!("Enter the code from Telegram: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();

    let user = client
        .sign_in(&token, code)
        .await
        .map_err(|e| Error::TelegramError(format!("Failed to sign in: {}", e)))?;

    // Session is auto-saved by SqliteSession

    println!(
        r#"
Session created.

Profile:
  Name: {}
  Username: @{}

You can now run `chat_stats stats <chat>` or `chat_stats bot`.
Back up the session file and do not run init-session again.
"#,
        user.full_name(),
        user.username().unwrap_or("not set"),
    );

    Ok(())
}
