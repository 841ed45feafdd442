//! Store and reference-data error types.

use thiserror::Error;

/// Errors raised by the care store and its document backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A reminder with this id already exists.
    #[error("Reminder already exists: {0}")]
    Conflict(String),

    /// The backing document store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A persisted document could not be decoded.
    #[error("Document '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Conflict(_) => "This reminder already exists.",
            StoreError::Storage(_) => "Unable to save your data. Please try again.",
            StoreError::Corrupt { .. } => {
                "Local data may be corrupted. Consider resetting app data."
            }
            StoreError::Serialization(_) => "A data operation failed. Please try again.",
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while loading the species reference table.
#[derive(Debug, Error)]
pub enum SpeciesTableError {
    #[error("Species '{species_id}' has cold threshold {cold}°C not below hot threshold {hot}°C")]
    InconsistentThresholds {
        species_id: String,
        cold: f64,
        hot: f64,
    },

    #[error("Species listed twice: {0}")]
    DuplicateSpecies(String),

    #[error("Failed to read species file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse species file: {0}")]
    Parse(#[from] serde_json::Error),
}
