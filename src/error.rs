//! Error types for SuiRandom

use std::fmt;

use crate::rpc::RpcError;

#[derive(Debug, Clone)]
pub enum DrawError {
    InvalidAddress(String),
    InvalidName(String),
    NotEnoughAddresses { found: usize, required: usize },
    InvalidWinnerCount { requested: u64, max: u64 },
    RpcError(String),
    ExecutionFailed(String),
    NoWinnerData,
    CryptoError(String),
    KeystoreError(String),
    ConfigError(String),
    IoError(String),
    SerializationError(String),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DrawError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            DrawError::InvalidName(msg) => write!(f, "Invalid SuiNS name: {}", msg),
            DrawError::NotEnoughAddresses { found, required } => write!(
                f,
                "At least {} valid addresses are required, got {}",
                required, found
            ),
            DrawError::InvalidWinnerCount { requested, max } => write!(
                f,
                "Number of winners must be between 1 and {}, got {}",
                max, requested
            ),
            DrawError::RpcError(msg) => write!(f, "RPC error: {}", msg),
            DrawError::ExecutionFailed(msg) => write!(f, "Transaction failed: {}", msg),
            DrawError::NoWinnerData => write!(f, "No winner data in response"),
            DrawError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            DrawError::KeystoreError(msg) => write!(f, "Keystore error: {}", msg),
            DrawError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            DrawError::IoError(msg) => write!(f, "IO error: {}", msg),
            DrawError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DrawError {}

impl From<std::io::Error> for DrawError {
    fn from(err: std::io::Error) -> Self {
        DrawError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for DrawError {
    fn from(err: serde_json::Error) -> Self {
        DrawError::SerializationError(err.to_string())
    }
}

impl From<bcs::Error> for DrawError {
    fn from(err: bcs::Error) -> Self {
        DrawError::SerializationError(format!("bcs: {}", err))
    }
}

impl From<RpcError> for DrawError {
    fn from(err: RpcError) -> Self {
        DrawError::RpcError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, DrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DrawError::NotEnoughAddresses {
            found: 1,
            required: 2,
        };
        assert_eq!(
            err.to_string(),
            "At least 2 valid addresses are required, got 1"
        );

        let err = DrawError::InvalidWinnerCount {
            requested: 0,
            max: 5,
        };
        assert_eq!(
            err.to_string(),
            "Number of winners must be between 1 and 5, got 0"
        );
        assert_eq!(
            DrawError::NoWinnerData.to_string(),
            "No winner data in response"
        );
    }

    #[test]
    fn test_rpc_error_conversion() {
        let err: DrawError = RpcError::Remote {
            code: -32602,
            message: "Invalid params".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "RPC error: JSON-RPC error -32602: Invalid params");
    }
}
