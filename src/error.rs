use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Main error type for a bullyclock node
#[derive(Debug)]
pub enum NodeError {
    /// Configuration or CLI argument errors
    Config(String),

    /// Request bodies that could not be parsed
    MalformedInput(String),

    /// Peer communication errors
    Transport(String),

    /// System I/O errors
    Io(std::io::Error),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Config(msg) => write!(f, "Configuration error: {}", msg),
            NodeError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            NodeError::Transport(msg) => write!(f, "Transport error: {}", msg),
            NodeError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for NodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NodeError::Io(err) => Some(err),
            _ => None,
        }
    }
}

// Convenient type alias for Results using our error type
pub type Result<T> = std::result::Result<T, NodeError>;

impl NodeError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            NodeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NodeError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            NodeError::Transport(_) => StatusCode::BAD_GATEWAY,
            NodeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            NodeError::Config(_) => "configuration_error",
            NodeError::MalformedInput(_) => "malformed_input",
            NodeError::Transport(_) => "transport_error",
            NodeError::Io(_) => "io_error",
        }
    }
}

// Axum IntoResponse implementation for HTTP error responses
impl IntoResponse for NodeError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = json!({
            "error": {
                "code": status_code.as_u16(),
                "message": self.to_string(),
                "type": self.error_type(),
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

// Conversions from common error types
impl From<std::io::Error> for NodeError {
    fn from(err: std::io::Error) -> Self {
        NodeError::Io(err)
    }
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        NodeError::Transport(err.to_string())
    }
}

// Helper macros for common error construction patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::NodeError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NodeError::Config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! malformed_input {
    ($msg:expr) => {
        $crate::error::NodeError::MalformedInput($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NodeError::MalformedInput(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = NodeError::Config("Invalid port".to_string());
        assert_eq!(config_err.to_string(), "Configuration error: Invalid port");

        let io_err = NodeError::Io(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));
        assert!(io_err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let node_err: NodeError = io_err.into();

        assert!(matches!(node_err, NodeError::Io(_)));
        assert!(std::error::Error::source(&node_err).is_some());
    }

    #[test]
    fn test_macros() {
        let err = config_error!("probe timeout {} must be positive", 0);
        assert_eq!(
            err.to_string(),
            "Configuration error: probe timeout 0 must be positive"
        );

        let err = malformed_input!("not a timestamp");
        assert_eq!(err.to_string(), "Malformed input: not a timestamp");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            malformed_input!("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NodeError::Transport("down".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(config_error!("x").error_type(), "configuration_error");
    }
}
