//! Plot survey files
//!
//! A survey records the plot metadata plus each measured tree by species name
//! and DBH. Resolving it against a [`SpeciesCatalog`] produces the
//! [`TreeObservation`]s the estimator consumes.
//!
//! ```toml
//! [plot]
//! name = "Petak Utara"
//! area = 0.25
//!
//! [[trees]]
//! id = "PU-001"
//! species = "Jati (Tectona grandis)"
//! dbh_cm = 32.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::core_types::species::SpeciesCatalog;
use crate::core_types::tree::TreeObservation;
use crate::core_types::units::Centimeters;
use crate::error::Result;
use crate::report::Plot;

/// One measured tree as written in a survey file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyTree {
    /// Caller-assigned id; a UUID is generated when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Species display name, looked up in the catalog
    pub species: String,
    pub dbh_cm: f64,
}

/// A plot and its measured trees
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotSurvey {
    pub plot: Plot,
    #[serde(default)]
    pub trees: Vec<SurveyTree>,
}

impl PlotSurvey {
    /// Parse a survey from TOML text.
    ///
    /// # Errors
    /// Returns `CarbonError::Toml` on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Parse a survey from JSON text.
    ///
    /// # Errors
    /// Returns `CarbonError::Json` on malformed input.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a survey file, choosing the format by extension (`.json`, anything
    /// else is read as TOML).
    ///
    /// # Errors
    /// Returns `CarbonError::Io` if the file cannot be read, otherwise a parse error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(path = %path.display(), is_json, "Loading plot survey");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    /// Resolve species names and validate measurements, preserving tree order.
    ///
    /// # Errors
    /// - `CarbonError::UnknownSpecies` for a species missing from `catalog`
    /// - `CarbonError::InvalidMeasurement` for a non-positive or non-finite dbh
    pub fn resolve(&self, catalog: &SpeciesCatalog) -> Result<Vec<TreeObservation>> {
        self.trees
            .iter()
            .map(|entry| {
                let species = catalog.lookup(&entry.species)?.clone();
                let dbh = Centimeters::new(entry.dbh_cm);
                match &entry.id {
                    Some(id) => TreeObservation::new(id.as_str(), species, dbh),
                    None => TreeObservation::with_generated_id(species, dbh),
                }
            })
            .collect()
    }
}
