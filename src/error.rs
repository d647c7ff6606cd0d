// Error taxonomy shared across catalog, generator, query and export

use thiserror::Error;

/// All failures the core can report. The request layer maps these onto
/// transport codes; the core itself has no notion of status codes.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An id with no corresponding entity.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Malformed or invariant-violating field values, including bad
    /// filter/pagination parameters.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Id collision on insert.
    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    /// Generator invoked with impossible parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// CSV encode/decode failure in the bulk tabular form.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encode/decode failure in the bulk form.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn business_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            kind: "business",
            id: id.to_string(),
        }
    }

    pub fn service_not_found(id: u64) -> Self {
        CatalogError::NotFound {
            kind: "service",
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CatalogError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
