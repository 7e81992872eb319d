//! Error type shared by the catalog store and configuration layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure, including constraint violations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or malformed config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller passed a value the store refuses to write
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Stored row that cannot be mapped back to a record
    #[error("Corrupt book record: {0}")]
    CorruptRecord(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        let err = Error::InvalidInput("ISBN is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: ISBN is required");

        let err = Error::CorruptRecord("bad timestamp".to_string());
        assert_eq!(err.to_string(), "Corrupt book record: bad timestamp");
    }
}
