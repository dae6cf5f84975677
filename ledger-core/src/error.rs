//! Error types for the ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every error surfaces immediately to the host; this layer performs no
/// retries and no local recovery. The host's atomic commit discards any
/// writes a failed invocation staged.
#[derive(Error, Debug)]
pub enum Error {
    /// Transfer amount unparseable or non-positive
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Account key absent, or the store read faulted
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Sender lookup failed during a transfer
    #[error("sender account error: {source}")]
    SenderNotFound {
        /// Sender account name
        name: String,
        /// Underlying lookup failure
        #[source]
        source: Box<Error>,
    },

    /// Receiver lookup failed during a transfer
    #[error("receiver account error: {source}")]
    ReceiverNotFound {
        /// Receiver account name
        name: String,
        /// Underlying lookup failure
        #[source]
        source: Box<Error>,
    },

    /// Sender balance below the requested amount
    #[error("insufficient balance in {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Debited account name
        account: String,
        /// Balance at the time of the transfer
        available: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// Entity could not be encoded
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Stored bytes could not be decoded
    #[error("deserialization error: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// State store read fault
    #[error("state read error: {0}")]
    StateRead(String),

    /// State store write fault
    #[error("state write error: {0}")]
    StateWrite(String),

    /// Range iterator could not be opened or failed mid-scan
    #[error("range scan error: {0}")]
    RangeScan(String),

    /// Storage backend fault (missing column family, open failure)
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a lookup failure as a sender-side transfer error.
    pub fn sender_not_found(name: impl Into<String>, source: Error) -> Self {
        Error::SenderNotFound {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a lookup failure as a receiver-side transfer error.
    pub fn receiver_not_found(name: impl Into<String>, source: Error) -> Self {
        Error::ReceiverNotFound {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_wraps_source() {
        let err = Error::receiver_not_found(
            "BankC",
            Error::AccountNotFound("BankC".to_string()),
        );

        assert!(err.to_string().contains("receiver account error"));
        assert!(err.to_string().contains("BankC"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_insufficient_balance_message() {
        let err = Error::InsufficientBalance {
            account: "BankB".to_string(),
            available: Decimal::from(500),
            requested: Decimal::from(1000),
        };

        let msg = err.to_string();
        assert!(msg.contains("BankB"));
        assert!(msg.contains("500"));
        assert!(msg.contains("1000"));
    }
}
