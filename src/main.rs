//! Chat Stats CLI - main entry point

use clap::{Parser, Subcommand};

use chat_stats::commands;
use chat_stats::config::Config;
use chat_stats::logs;

#[derive(Parser)]
#[command(name = "chat_stats")]
#[command(about = "Telegram two-party chat statistics userbot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a chat and print (or deliver) the statistics report
    Stats {
        /// Chat alias from config, @username or numeric id
        chat: String,

        /// Maximum number of messages to fetch
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the raw analysis result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Deliver the report into Telegram as well
        #[arg(long, default_value_t = false)]
        send: bool,
    },

    /// Run in userbot mode, answering the owner's /stats command
    Bot,

    /// Initialize a new session (use only once!)
    InitSession,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    let config = Config::new();
    logs::init_logging(config.logs_dir.as_deref(), config.logs_keep)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            chat,
            limit,
            json,
            send,
        } => {
            commands::stats::run(commands::StatsArgs {
                chat,
                limit,
                json,
                send,
            })
            .await?;
        }
        Commands::Bot => {
            commands::bot::run().await?;
        }
        Commands::InitSession => {
            commands::init_session::run().await?;
        }
    }

    Ok(())
}
