use serde::{Deserialize, Serialize};

use crate::core_types::species::SpeciesProfile;
use crate::core_types::units::Centimeters;
use crate::error::{CarbonError, Result};

/// A single measured tree in a plot
///
/// Observations are immutable once recorded; removing a tree is the caller's
/// concern (drop it from the list passed to the estimator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeObservation {
    pub id: String,
    pub species: SpeciesProfile,
    pub dbh: Centimeters, // Diameter at breast height
}

impl TreeObservation {
    /// Record a tree with a caller-supplied id.
    ///
    /// # Errors
    /// Returns `CarbonError::InvalidMeasurement` if `dbh` is zero, negative or
    /// non-finite.
    pub fn new(id: impl Into<String>, species: SpeciesProfile, dbh: Centimeters) -> Result<Self> {
        let id = id.into();
        if !dbh.is_valid_measurement() {
            return Err(CarbonError::invalid_dbh(&id, *dbh));
        }
        Ok(Self { id, species, dbh })
    }

    /// Record a tree with a freshly generated UUID v4 id.
    ///
    /// # Errors
    /// Same as [`TreeObservation::new`].
    pub fn with_generated_id(species: SpeciesProfile, dbh: Centimeters) -> Result<Self> {
        Self::new(uuid::Uuid::new_v4().to_string(), species, dbh)
    }

    /// Check both allometric inputs.
    ///
    /// Observations built through [`TreeObservation::new`] only need the
    /// density check, but deserialized or hand-assembled ones bypass the
    /// constructor, so the estimator revalidates everything.
    ///
    /// # Errors
    /// Returns `CarbonError::InvalidMeasurement` for the first failing quantity
    /// (dbh first, then wood density).
    pub fn validate(&self) -> Result<()> {
        if !self.dbh.is_valid_measurement() {
            return Err(CarbonError::invalid_dbh(&self.id, *self.dbh));
        }
        if !self.species.wood_density.is_valid_measurement() {
            return Err(CarbonError::invalid_wood_density(
                &self.id,
                *self.species.wood_density,
            ));
        }
        Ok(())
    }
}
