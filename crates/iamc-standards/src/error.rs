#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("definitions directory not found: {path}")]
    NotADirectory { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML definition file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Model(#[from] iamc_model::ModelError),

    #[error("duplicate item in {dimension} tag codelist: {name}")]
    DuplicateTag { dimension: String, name: String },

    #[error("unexpected tag {placeholder} in codelist entry: {code}")]
    StrayTag { code: String, placeholder: String },

    #[error("unexpected whitespace at the start or end of a code name: '{name}'")]
    InvalidName { name: String },

    #[error(
        "cannot substitute non-string attribute {attribute} of tag target {target} into code {code}"
    )]
    NonStringFragment {
        code: String,
        target: String,
        attribute: String,
    },

    #[error("tag definition is not a single placeholder-targets mapping: {entry}")]
    MalformedTag { entry: String },

    #[error("invalid codelist file {file}: {message}")]
    InvalidFormat { file: String, message: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
