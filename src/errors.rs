//! Error types for the Polla/Micro lottery engine
//!
//! Validation errors reject operator input at the point of entry. Persistence errors
//! come from the record stores and are surfaced as notices by the session layer.

use thiserror::Error;

/// Root error type for all lottery operations
#[derive(Debug, Error)]
pub enum PollaError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing required field: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),
}

/// Rejected operator input. The previous value is always retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid number (allowed: 0, 00, 1-36)")]
    InvalidSymbol(String),

    #[error("number {0} is already used in this ticket")]
    DuplicateSymbol(String),

    #[error("{count} numbers given but {variant} takes at most {max}")]
    TooManyNumbers {
        variant: String,
        count: usize,
        max: usize,
    },

    #[error("slot {slot} is out of range for {variant} (pick size {pick_size})")]
    SlotOutOfRange {
        variant: String,
        slot: usize,
        pick_size: usize,
    },

    #[error("unknown game variant '{0}' (expected polla or micro)")]
    UnknownVariant(String),

    #[error("unknown day '{0}'")]
    UnknownDay(String),

    #[error("ticket #{0} does not exist")]
    UnknownTicket(u32),
}

/// Record store failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database open failed: {0}")]
    OpenFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("An active winning set already exists for {0}")]
    ActiveSetExists(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<rocksdb::Error> for PollaError {
    fn from(e: rocksdb::Error) -> Self {
        PollaError::Persistence(PersistenceError::WriteFailed(e.to_string()))
    }
}

impl From<std::io::Error> for PollaError {
    fn from(e: std::io::Error) -> Self {
        PollaError::Persistence(PersistenceError::ReadFailed(e.to_string()))
    }
}

impl From<serde_json::Error> for PollaError {
    fn from(e: serde_json::Error) -> Self {
        PollaError::Persistence(PersistenceError::CorruptedData(e.to_string()))
    }
}

impl From<toml::de::Error> for PollaError {
    fn from(e: toml::de::Error) -> Self {
        PollaError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl PollaError {
    /// True for failures of the record stores, which never invalidate in-memory state
    pub fn is_persistence(&self) -> bool {
        matches!(self, PollaError::Persistence(_))
    }
}

/// Convenience type alias for Results
pub type PollaResult<T> = Result<T, PollaError>;
