//! Configuration for the Telegram API, report settings and chat aliases
//!
//! Loads configuration from a config.yml file. Values are read once into a
//! `Config` and passed down; nothing is kept in process-wide state.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default constants (fallback if config.yml not found)
pub const SESSION_NAME: &str = "chat_stats_session";
pub const LOCK_FILE: &str = "chat_stats_session.lock";
pub const DEFAULT_LIMIT: usize = 3000;
pub const CI_LIMIT: usize = 1000;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_LOGS_KEEP: usize = 15;

/// Chat entity types
#[derive(Debug, Clone)]
pub enum ChatEntity {
    /// Channel by ID
    Channel(i64),
    /// Group chat by ID
    Chat(i64),
    /// User by username (without @)
    Username(String),
    /// User by ID
    UserId(i64),
}

impl ChatEntity {
    pub fn channel(id: i64) -> Self {
        ChatEntity::Channel(id)
    }

    pub fn chat(id: i64) -> Self {
        ChatEntity::Chat(id)
    }

    pub fn username(name: &str) -> Self {
        let name = name.strip_prefix('@').unwrap_or(name);
        ChatEntity::Username(name.to_string())
    }

    pub fn user_id(id: i64) -> Self {
        ChatEntity::UserId(id)
    }
}

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramConfig>,
    user: Option<UserConfig>,
    limits: Option<LimitsConfig>,
    chats: Option<HashMap<String, ChatConfig>>,
    report: Option<ReportConfig>,
    logs: Option<LogsConfig>,
}

#[derive(Debug, Deserialize)]
struct TelegramConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    phone: Option<String>,
    session_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct UserConfig {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    id: Option<String>,
    name: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct LimitsConfig {
    default: Option<usize>,
    ci: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ChatConfig {
    #[serde(rename = "type")]
    chat_type: String,
    id: Option<i64>,
    username: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReportConfig {
    /// Report locale: "en" or "ru"
    language: Option<String>,
    /// Deliver into the analyzed chat instead of Saved Messages
    send_to_chat: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct LogsConfig {
    dir: Option<String>,
    keep: Option<usize>,
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub phone: String,
    pub api_id: i32,
    pub api_hash: String,
    pub session_name: String,
    pub lock_file: String,
    pub my_user_id: i64,
    pub default_limit: usize,
    pub ci_limit: usize,
    pub chats: HashMap<String, ChatEntity>,
    pub language: String,
    pub send_to_chat: bool,
    pub logs_dir: Option<PathBuf>,
    pub logs_keep: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from config.yml or use defaults
    /// Environment variables take precedence over config.yml values
    pub fn new() -> Self {
        Self::load_from_file("config.yml")
            .or_else(|_| Self::load_from_file("../config.yml"))
            .unwrap_or_else(|_| Self::defaults())
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_key: &str) -> String {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return env_val;
                }
            }
        }
        // Also check explicit env_key as fallback
        if let Ok(env_val) = std::env::var(env_key) {
            return env_val;
        }
        value.unwrap_or_default()
    }

    /// Resolve an integer value from string config or env var
    fn resolve_env_i32(value: Option<String>, env_key: &str) -> i32 {
        Self::resolve_env_i64(value, env_key) as i32
    }

    /// Resolve an i64 value from string config or env var
    fn resolve_env_i64(value: Option<String>, env_key: &str) -> i64 {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    if let Ok(parsed) = env_val.parse::<i64>() {
                        return parsed;
                    }
                }
            }
            // Explicit numeric values win over the environment
            if let Ok(parsed) = v.parse::<i64>() {
                return parsed;
            }
        }
        if let Ok(env_val) = std::env::var(env_key) {
            if let Ok(parsed) = env_val.parse::<i64>() {
                return parsed;
            }
        }
        0
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let yaml: YamlConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        let telegram = yaml.telegram.unwrap_or(TelegramConfig {
            api_id: None,
            api_hash: None,
            phone: None,
            session_name: None,
        });

        let user = yaml.user.unwrap_or(UserConfig {
            id: None,
            name: None,
        });

        let limits = yaml.limits.unwrap_or(LimitsConfig {
            default: None,
            ci: None,
        });

        let report = yaml.report.unwrap_or(ReportConfig {
            language: None,
            send_to_chat: None,
        });

        let logs = yaml.logs.unwrap_or(LogsConfig {
            dir: None,
            keep: None,
        });

        // Parse chats
        let mut chats = HashMap::new();
        if let Some(yaml_chats) = yaml.chats {
            for (name, chat_config) in yaml_chats {
                let entity = match chat_config.chat_type.as_str() {
                    "channel" => {
                        if let Some(id) = chat_config.id {
                            ChatEntity::Channel(id)
                        } else {
                            continue;
                        }
                    }
                    "group" => {
                        if let Some(id) = chat_config.id {
                            ChatEntity::Chat(id)
                        } else {
                            continue;
                        }
                    }
                    "user" => {
                        if let Some(id) = chat_config.id {
                            ChatEntity::UserId(id)
                        } else {
                            continue;
                        }
                    }
                    "username" => {
                        if let Some(username) = chat_config.username {
                            ChatEntity::Username(username)
                        } else {
                            continue;
                        }
                    }
                    _ => continue,
                };
                chats.insert(name, entity);
            }
        }

        // Resolve values with env var precedence
        let api_id = Self::resolve_env_i32(telegram.api_id, "TELEGRAM_API_ID");
        let api_hash = Self::resolve_env_string(telegram.api_hash, "TELEGRAM_API_HASH");
        let phone = Self::resolve_env_string(telegram.phone, "TELEGRAM_PHONE");
        let my_user_id = Self::resolve_env_i64(user.id, "USER_ID");

        Ok(Self {
            phone,
            api_id,
            api_hash,
            session_name: telegram
                .session_name
                .unwrap_or_else(|| SESSION_NAME.to_string()),
            lock_file: LOCK_FILE.to_string(),
            my_user_id,
            default_limit: limits.default.unwrap_or(DEFAULT_LIMIT),
            ci_limit: limits.ci.unwrap_or(CI_LIMIT),
            chats,
            language: report
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            send_to_chat: report.send_to_chat.unwrap_or(false),
            logs_dir: logs.dir.map(PathBuf::from),
            logs_keep: logs.keep.unwrap_or(DEFAULT_LOGS_KEEP),
        })
    }

    /// Create config with empty defaults (fallback)
    /// User MUST provide config.yml with actual credentials
    fn defaults() -> Self {
        Self {
            phone: String::new(),
            api_id: 0,
            api_hash: String::new(),
            session_name: SESSION_NAME.to_string(),
            lock_file: LOCK_FILE.to_string(),
            my_user_id: 0,
            default_limit: DEFAULT_LIMIT,
            ci_limit: CI_LIMIT,
            chats: HashMap::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            send_to_chat: false,
            logs_dir: None,
            logs_keep: DEFAULT_LOGS_KEEP,
        }
    }

    /// Get chat entity by name
    pub fn get_chat(&self, name: &str) -> Option<&ChatEntity> {
        self.chats.get(name)
    }

    /// Check if running in GitHub Actions
    pub fn is_github_actions() -> bool {
        std::env::var("GITHUB_ACTIONS")
            .map(|v| v == "true")
            .unwrap_or(false)
    }

    /// Get history limit based on environment
    pub fn get_limit(&self) -> usize {
        if Self::is_github_actions() {
            self.ci_limit
        } else {
            self.default_limit
        }
    }
}
