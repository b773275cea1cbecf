#![deny(unsafe_code)]

pub mod dsd;
pub mod error;
pub mod expand;
pub mod export;
pub mod loader;

pub use crate::dsd::DataStructureDefinition;
pub use crate::error::{Result, StandardsError};
pub use crate::expand::{expand_tag, find_placeholder};
pub use crate::export::{Table, to_csv, to_rows, to_yaml};
pub use crate::loader::{CodeListBuilder, FILE_ATTR, from_directory, from_directory_with};
