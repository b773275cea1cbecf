//! Validation of a dataset's dimension values against assembled codelists.
//!
//! The core never touches the dataset itself; it only needs the distinct
//! values used per dimension, exposed through [`DimensionView`]. Violations
//! are collected across all dimensions before failing, so one validation
//! pass reports the complete picture.

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use iamc_model::CodeList;
use iamc_standards::DataStructureDefinition;

/// Read access to the dimension-value columns of a tabular dataset.
///
/// Returns `None` for dimensions the dataset does not carry; those are
/// skipped during validation.
pub trait DimensionView {
    fn distinct_values(&self, dimension: &str) -> Option<Vec<String>>;
}

/// Distinct dimension values held in a plain map, mainly for tests and
/// small callers.
impl DimensionView for BTreeMap<String, Vec<String>> {
    fn distinct_values(&self, dimension: &str) -> Option<Vec<String>> {
        self.get(dimension).cloned()
    }
}

/// The values of one dimension that are not members of its codelist.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionViolations {
    pub dimension: String,
    pub missing: Vec<String>,
}

/// Aggregated validation failure: every offending dimension with its full
/// set of missing values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct ValidationError {
    pub violations: Vec<DimensionViolations>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "the following values are not defined in the codelists:")?;
        for violation in &self.violations {
            writeln!(
                f,
                "  {}: {:?}",
                violation.dimension, violation.missing
            )?;
        }
        Ok(())
    }
}

/// Check that every distinct value in each recognized dimension of `data`
/// is a member of the corresponding codelist.
///
/// All dimensions are checked before returning, so the error enumerates
/// every violation at once. Succeeds silently when everything is defined.
pub fn validate(
    definition: &DataStructureDefinition,
    data: &impl DimensionView,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    for codelist in definition.codelists() {
        let Some(values) = data.distinct_values(codelist.name()) else {
            continue;
        };
        let missing = missing_values(codelist, values);
        if !missing.is_empty() {
            violations.push(DimensionViolations {
                dimension: codelist.name().to_string(),
                missing,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// The subset of `values` that are not members of `codelist`, keeping the
/// dataset's order.
fn missing_values(codelist: &CodeList, values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter(|value| !codelist.contains(value))
        .collect()
}
