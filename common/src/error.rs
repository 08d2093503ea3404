//! Error types shared by the common crate.

use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("fecha inválida".to_string());
        assert_eq!(format!("{}", error), "Parse error: fecha inválida");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_from_base64() {
        use base64::Engine;
        let decode_error = base64::engine::general_purpose::STANDARD
            .decode("@@not base64@@")
            .unwrap_err();
        let error: Error = decode_error.into();
        assert!(matches!(error, Error::Base64(_)));
        assert!(format!("{}", error).contains("Base64"));
    }
}
