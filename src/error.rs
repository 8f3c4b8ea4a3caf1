//! Error types for the chat statistics bot
//!
//! Retrieval, session and configuration failures are `Error` values and stop
//! a request with no partial report. "Not enough participants" is not an
//! error: see `stats::AnalysisOutcome`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Session file not found: {0}")]
    SessionNotFound(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_session_not_found() {
        let err = Error::SessionNotFound("test.session".to_string());
        assert!(err.to_string().contains("Session file not found"));
        assert!(err.to_string().contains("test.session"));
    }

    #[test]
    fn test_error_display_session_locked() {
        let err = Error::SessionLocked;
        assert!(err.to_string().contains("locked by another process"));
    }

    #[test]
    fn test_error_display_chat_not_found() {
        let err = Error::ChatNotFound("partner_chat".to_string());
        assert!(err.to_string().contains("Chat not found"));
        assert!(err.to_string().contains("partner_chat"));
    }

    #[test]
    fn test_error_display_telegram_error() {
        let err = Error::TelegramError("flood wait".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Telegram API error"));
        assert!(msg.contains("flood wait"));
    }

    #[test]
    fn test_error_display_invalid_argument() {
        let err = Error::InvalidArgument("missing required field".to_string());
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();

        assert!(matches!(err, Error::SerializationError(_)));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_debug_impl() {
        let err = Error::SessionLocked;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("SessionLocked"));
    }

    #[test]
    fn test_error_all_variants_display() {
        let variants: Vec<Error> = vec![
            Error::SessionNotFound("session".to_string()),
            Error::SessionLocked,
            Error::LockError("lock".to_string()),
            Error::TelegramError("telegram".to_string()),
            Error::ChatNotFound("chat".to_string()),
            Error::SerializationError("serial".to_string()),
            Error::InvalidArgument("arg".to_string()),
        ];

        for err in variants {
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_err() -> Result<i32> {
            Err(Error::LockError("busy".to_string()))
        }

        assert!(returns_err().is_err());
    }
}
