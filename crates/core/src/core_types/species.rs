use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core_types::units::WoodDensity;
use crate::error::{CarbonError, Result};

/// Reference data for a tree species
///
/// Wood density is the only allometric input; name and scientific name are
/// carried through to results and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub name: String,
    pub scientific_name: String,
    pub wood_density: WoodDensity, // g/cm³
}

impl SpeciesProfile {
    /// Create a species profile, rejecting non-finite or non-positive wood density.
    ///
    /// # Errors
    /// Returns `CarbonError::InvalidMeasurement` naming the species when the
    /// density is not a usable measurement.
    pub fn new(
        name: impl Into<String>,
        scientific_name: impl Into<String>,
        wood_density: WoodDensity,
    ) -> Result<Self> {
        let name = name.into();
        if !wood_density.is_valid_measurement() {
            return Err(CarbonError::invalid_wood_density(&name, *wood_density));
        }
        Ok(Self {
            name,
            scientific_name: scientific_name.into(),
            wood_density,
        })
    }

    /// Build a built-in entry. Values are compile-time constants known to be valid.
    fn preset(name: &str, scientific_name: &str, wood_density: f64) -> Self {
        Self {
            name: name.to_string(),
            scientific_name: scientific_name.to_string(),
            wood_density: WoodDensity::new(wood_density),
        }
    }
}

/// On-disk catalog layout: a list of `[[species]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    species: Vec<SpeciesProfile>,
}

/// Immutable table of species profiles keyed by name
///
/// Insertion order is preserved for listing (the order a tree-entry form
/// would present), with an `FxHashMap` index for name lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesCatalog {
    entries: Vec<SpeciesProfile>,
    index: FxHashMap<String, usize>,
}

impl SpeciesCatalog {
    /// Build a catalog from profiles.
    ///
    /// # Errors
    /// - `CarbonError::DuplicateSpecies` if two profiles share a name
    /// - `CarbonError::InvalidMeasurement` if a profile carries an unusable density
    ///   (possible when profiles were deserialized rather than built with `new`)
    pub fn new(entries: Vec<SpeciesProfile>) -> Result<Self> {
        let mut index =
            FxHashMap::with_capacity_and_hasher(entries.len(), rustc_hash::FxBuildHasher);
        for (i, profile) in entries.iter().enumerate() {
            if !profile.wood_density.is_valid_measurement() {
                return Err(CarbonError::invalid_wood_density(
                    &profile.name,
                    *profile.wood_density,
                ));
            }
            if index.insert(profile.name.clone(), i).is_some() {
                return Err(CarbonError::DuplicateSpecies(profile.name.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Common Indonesian plantation and forest species
    ///
    /// Wood densities are indicative values (g/cm³) as used by the field
    /// survey tool this crate serves.
    pub fn indonesian_defaults() -> Self {
        let entries = vec![
            SpeciesProfile::preset("Meranti (Shorea sp.)", "Shorea spp.", 0.55),
            SpeciesProfile::preset("Jati (Tectona grandis)", "Tectona grandis", 0.67),
            SpeciesProfile::preset(
                "Sengon (Falcataria moluccana)",
                "Falcataria moluccana",
                0.33,
            ),
            SpeciesProfile::preset(
                "Mahoni (Swietenia macrophylla)",
                "Swietenia macrophylla",
                0.6,
            ),
            SpeciesProfile::preset("Akasia (Acacia mangium)", "Acacia mangium", 0.65),
            SpeciesProfile::preset(
                "Pohon Karet (Hevea brasiliensis)",
                "Hevea brasiliensis",
                0.58,
            ),
            SpeciesProfile::preset("Trembesi (Samanea saman)", "Samanea saman", 0.52),
            SpeciesProfile::preset("Durian (Durio zibethinus)", "Durio zibethinus", 0.62),
            SpeciesProfile::preset("Mangga (Mangifera indica)", "Mangifera indica", 0.68),
        ];

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, profile)| (profile.name.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Parse a catalog from TOML text containing `[[species]]` tables.
    ///
    /// # Errors
    /// Returns a TOML decode error, or the validation errors of [`SpeciesCatalog::new`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.species)
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, otherwise as [`SpeciesCatalog::from_toml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Look up a species by its display name.
    ///
    /// # Errors
    /// Returns `CarbonError::UnknownSpecies` if no entry has that name.
    pub fn lookup(&self, name: &str) -> Result<&SpeciesProfile> {
        self.get(name)
            .ok_or_else(|| CarbonError::UnknownSpecies(name.to_string()))
    }

    /// Look up a species by name, returning `None` if absent
    pub fn get(&self, name: &str) -> Option<&SpeciesProfile> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Iterate profiles in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, SpeciesProfile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a SpeciesCatalog {
    type Item = &'a SpeciesProfile;
    type IntoIter = std::slice::Iter<'a, SpeciesProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::indonesian_defaults()
    }
}
