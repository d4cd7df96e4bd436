use thiserror::Error;

// Missing peer-dataset columns are not an error; they only degrade the output.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("invalid profile field `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("invalid skill catalogue: {0}")]
    Catalogue(String),

    #[error("peer dataset error: {0}")]
    Dataset(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RoadmapError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RoadmapError>;
