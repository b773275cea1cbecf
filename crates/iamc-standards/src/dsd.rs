//! The aggregate of all dimension codelists for one set of definitions.

use std::path::Path;

use iamc_model::CodeList;

use crate::error::{Result, StandardsError};
use crate::loader;

/// Grouping attribute injected on region codes from their file's top-level
/// key (e.g. `common`, `countries`).
pub const REGION_HIERARCHY_ATTR: &str = "hierarchy";

/// Definition of the datastructure codelists for the dimensions of an
/// IAMC-format dataset. Owns one [`CodeList`] per recognized dimension.
#[derive(Debug, Clone)]
pub struct DataStructureDefinition {
    pub variable: CodeList,
    pub region: CodeList,
}

impl DataStructureDefinition {
    /// Assemble the definition from a directory holding `variables/` and
    /// `regions/` codelist directories.
    pub fn from_directory(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(StandardsError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let variable = loader::from_directory("variable", &path.join("variables"))?;
        let region = loader::from_directory_with(
            "region",
            &path.join("regions"),
            REGION_HIERARCHY_ATTR,
        )?;

        Ok(Self { variable, region })
    }

    /// The codelist governing `dimension`, if it is a recognized one.
    pub fn codelist(&self, dimension: &str) -> Option<&CodeList> {
        match dimension {
            "variable" => Some(&self.variable),
            "region" => Some(&self.region),
            _ => None,
        }
    }

    /// All dimension codelists, in a fixed order.
    pub fn codelists(&self) -> impl Iterator<Item = &CodeList> {
        [&self.variable, &self.region].into_iter()
    }
}
