//! Lenient CSV intake for batches of insurance claims.
//!
//! Alternate column names are mapped onto the canonical tabular features. Columns that
//! cannot be found, and cells that do not parse, are filled with zero rather than rejected:
//! bulk scoring favors availability over strict validation.

mod mapping;
mod normalizer;
mod parser;

use crate::risk::{ClaimInput, TabularFeature};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum BulkImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for BulkImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkImportError::Io(err) => write!(f, "failed to read bulk claims file: {}", err),
            BulkImportError::Csv(err) => write!(f, "invalid bulk claims CSV data: {}", err),
        }
    }
}

impl std::error::Error for BulkImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BulkImportError::Io(err) => Some(err),
            BulkImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BulkImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BulkImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Claims read from one bulk file, with the features that had to be zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkImport {
    pub claims: Vec<ClaimInput>,
    pub missing_features: Vec<TabularFeature>,
}

pub struct BulkClaimImporter;

impl BulkClaimImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<BulkImport, BulkImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<BulkImport, BulkImportError> {
        let parsed = parser::parse_rows(reader)?;
        let layout = &parsed.layout;

        let claims = parsed
            .records
            .iter()
            .map(|record| {
                ClaimInput::insurance(
                    layout.value(record, TabularFeature::ClaimAmount),
                    layout.value(record, TabularFeature::PolicyTenureDays),
                    layout.value(record, TabularFeature::NumPriorClaims),
                    layout.value(record, TabularFeature::CustomerAge),
                )
            })
            .collect();

        Ok(BulkImport {
            claims,
            missing_features: layout.missing(),
        })
    }
}
