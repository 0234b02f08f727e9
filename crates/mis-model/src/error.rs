use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown canonical field: {0}")]
    UnknownField(String),
    #[error("{field} is not a categorical field")]
    NotCategorical { field: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
