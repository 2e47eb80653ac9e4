//! Error types for the carbon stock core.
//!
//! The estimator itself only fails on out-of-domain measurements. Degenerate
//! plot areas and empty tree lists are recovered locally and never surface here.

use std::fmt;

/// Which measured quantity failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Diameter at breast height (cm)
    Dbh,
    /// Species wood density (g/cm³)
    WoodDensity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Dbh => write!(f, "dbh"),
            Quantity::WoodDensity => write!(f, "wood density"),
        }
    }
}

/// Errors that can occur while building inputs for, or consuming results of,
/// a carbon estimate.
#[derive(Debug, thiserror::Error)]
pub enum CarbonError {
    /// A measurement was zero, negative or non-finite.
    #[error("invalid measurement for tree '{tree_id}': {quantity} must be finite and positive, got {value}")]
    InvalidMeasurement {
        /// Id of the offending tree (or species name for catalog entries).
        tree_id: String,
        /// The quantity that failed validation.
        quantity: Quantity,
        /// The rejected value.
        value: f64,
    },

    /// Two catalog entries share a name.
    #[error("duplicate species name in catalog: {0}")]
    DuplicateSpecies(String),

    /// A survey referenced a species missing from the catalog.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// Failed to decode a TOML document (catalog, survey or config).
    #[error("failed to parse TOML: {source}")]
    Toml {
        /// The underlying TOML decode error.
        #[from]
        source: toml::de::Error,
    },

    /// Failed to decode or encode JSON.
    #[error("failed to process JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Failed to read or write a file.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The CSV writer failed while exporting a sheet.
    #[cfg(feature = "export")]
    #[error("failed to export sheet '{sheet}': {source}")]
    Export {
        /// Name of the sheet being written.
        sheet: String,
        /// The underlying CSV error.
        source: csv::Error,
    },
}

impl CarbonError {
    /// Shorthand for an invalid dbh on the given tree.
    pub fn invalid_dbh(tree_id: &str, value: f64) -> Self {
        Self::InvalidMeasurement {
            tree_id: tree_id.to_string(),
            quantity: Quantity::Dbh,
            value,
        }
    }

    /// Shorthand for an invalid wood density attached to the given tree or species.
    pub fn invalid_wood_density(owner: &str, value: f64) -> Self {
        Self::InvalidMeasurement {
            tree_id: owner.to_string(),
            quantity: Quantity::WoodDensity,
            value,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CarbonError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_measurement_message() {
        let err = CarbonError::invalid_dbh("tree-7", -3.0);
        assert_eq!(
            err.to_string(),
            "invalid measurement for tree 'tree-7': dbh must be finite and positive, got -3"
        );
    }

    #[test]
    fn test_wood_density_message_names_quantity() {
        let err = CarbonError::invalid_wood_density("Jati", 0.0);
        assert!(err.to_string().contains("wood density"));
    }
}
