//! Carbon Stock Core Library
//!
//! Estimates above- and below-ground biomass, carbon stock and CO₂-equivalent
//! sequestration for trees in a forestry plot from species wood density and
//! diameter at breast height, using a height-free pantropical allometric model
//! and IPCC default ratios.
//!
//! ## Layout
//! - [`core_types`]: unit newtypes, species catalog, tree observations
//! - [`allometry`]: the per-tree biomass → carbon → CO₂ chain
//! - [`estimator`]: plot-level aggregation ([`estimate`])
//! - [`report`]: locale-aware text rendering
//! - [`export`]: two-sheet CSV export (feature `export`)
//! - [`survey`]: survey files resolved against a catalog

// Core types and utilities
pub mod core_types;
pub mod error;

// Calculation
pub mod allometry;
pub mod estimator;

// Input and presentation collaborators
#[cfg(feature = "export")]
pub mod export;
pub mod report;
pub mod survey;

// Re-export core types
pub use core_types::{Centimeters, Hectares, Kilograms, Tonnes, WoodDensity};
pub use core_types::{SpeciesCatalog, SpeciesProfile, TreeObservation};
pub use error::{CarbonError, Quantity};

// Re-export calculation API
pub use allometry::{biomass_breakdown, BiomassBreakdown};
pub use estimator::{estimate, AggregateResult, AreaBasis, PerTreeResult};

// Re-export collaborators
#[cfg(feature = "export")]
pub use export::{export_file_stem, Workbook};
pub use report::{format_number, NumberLocale, Plot, PlotReport};
pub use survey::{PlotSurvey, SurveyTree};
