use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("code is not a single name-attributes mapping: {entry}")]
    MalformedCode { entry: String },

    #[error("code name must not be empty")]
    EmptyName,

    #[error("duplicate item in {dimension} codelist: {name}")]
    DuplicateCode { dimension: String, name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
