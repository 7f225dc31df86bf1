//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// 認可エラー(401)かどうか
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::Json(json_error);
        let display = format!("{}", error);
        assert!(display.contains("JSON error"));
    }

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("itemが文字列ではありません".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Parse error: itemが文字列ではありません");
    }

    #[test]
    fn test_error_display_api() {
        let error = Error::Api {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        let display = format!("{}", error);
        assert_eq!(display, "API error (500): Internal Server Error");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_is_unauthorized() {
        let unauthorized = Error::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        let forbidden = Error::Api {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert!(unauthorized.is_unauthorized());
        assert!(!forbidden.is_unauthorized());
        assert!(!Error::Storage("full".to_string()).is_unauthorized());
    }
}
