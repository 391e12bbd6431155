use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Recoverable store failures. The `Display` text is what the user sees in
/// the status bar; none of these leave the store unusable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ID '{0}' not recognized as integer")]
    InvalidId(String),

    #[error("Event with id = '{0}' does not exist")]
    NotFound(i64),

    #[error("Key '{0}' unrecognized")]
    UnknownField(String),

    #[error("Filter key '{0}' unrecognized")]
    UnknownFilterKey(String),

    #[error("Invalid value for '{key}': {details}")]
    InvalidFieldValue { key: String, details: String },

    #[error("Filter '{key}' does not accept {details}")]
    InvalidFilterValue { key: String, details: String },

    #[error("Failed to load events from {source_name}: {details}")]
    Fetch {
        source_name: &'static str,
        details: String,
    },
}
