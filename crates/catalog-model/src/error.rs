use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid item id: {0:?}")]
    InvalidItemId(String),
    #[error("invalid facet name: {0:?}")]
    InvalidFacetName(String),
    #[error("duplicate item id in record store: {0}")]
    DuplicateItemId(String),
    #[error("invalid range for facet {facet}: min {min} is greater than max {max}")]
    InvalidRange { facet: String, min: String, max: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
