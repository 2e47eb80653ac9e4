//! C ABI for the carbon stock estimator
//!
//! All functions return a [`CarbonErrorCode`]; on failure the message is
//! available from `carbon_get_last_error()` on the same thread. Every function
//! is reentrant and may be called concurrently from any thread.

mod error;
mod helpers;

pub use error::{carbon_get_last_error, carbon_get_last_error_code, CarbonErrorCode};

use carbon_stock_core::{
    biomass_breakdown, estimate, Centimeters, Hectares, SpeciesProfile, TreeObservation,
    WoodDensity,
};
use std::slice;

use crate::error::DefaultCarbonError;
use crate::helpers::{clear_last_error, track_error};

/// One tree as supplied by the caller
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CarbonTreeInput {
    /// Species wood density (g/cm³), must be > 0.
    pub wood_density: f64,
    /// Diameter at breast height (cm), must be > 0.
    pub dbh_cm: f64,
}

/// Per-tree carbon figures, written in input order
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CarbonTreeResult {
    pub carbon_stock_kg: f64,
    pub co2_sequestration_kg: f64,
}

/// Full biomass chain for one tree
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CarbonTreeMetrics {
    pub above_ground_biomass_kg: f64,
    pub below_ground_biomass_kg: f64,
    pub total_biomass_kg: f64,
    pub carbon_stock_kg: f64,
    pub co2_equivalent_kg: f64,
}

/// Plot aggregates
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CarbonAggregate {
    pub total_trees: usize,
    pub total_carbon_stock_tonnes: f64,
    pub total_co2_sequestration_tonnes: f64,
    pub carbon_stock_per_hectare: f64,
    pub co2_sequestration_per_hectare: f64,
    /// `false` when the plot area was not positive and the per-hectare
    /// fields hold absolute totals instead of areal densities.
    pub area_is_areal: bool,
}

/// Build core observations from C input. Trees are identified by their index.
fn observations(trees: &[CarbonTreeInput]) -> Vec<TreeObservation> {
    trees
        .iter()
        .enumerate()
        .map(|(i, input)| TreeObservation {
            id: i.to_string(),
            species: SpeciesProfile {
                name: String::new(),
                scientific_name: String::new(),
                wood_density: WoodDensity::new(input.wood_density),
            },
            dbh: Centimeters::new(input.dbh_cm),
        })
        .collect()
}

/// Estimate carbon stock for a plot.
///
/// # Parameters
/// - `trees`: Array of `len` tree inputs (may be null only when `len` is 0)
/// - `len`: Number of trees
/// - `plot_area_ha`: Plot area in hectares; values <= 0 make the per-hectare
///   fields equal the totals and clear `area_is_areal`
/// - `out_aggregate`: Receives the plot aggregates
/// - `out_breakdown`: Optional array of `len` entries receiving per-tree results
///   in input order; pass null to skip
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if `out_aggregate` is null, or `trees` is null with `len > 0`
/// - `InvalidMeasurement` if any tree has a non-positive or non-finite
///   density or DBH (outputs are left untouched)
///
/// # Safety
/// `trees` must point to `len` valid `CarbonTreeInput` values and
/// `out_breakdown`, when non-null, to `len` writable `CarbonTreeResult` slots.
#[no_mangle]
pub unsafe extern "C" fn carbon_estimate(
    trees: *const CarbonTreeInput,
    len: usize,
    plot_area_ha: f64,
    out_aggregate: *mut CarbonAggregate,
    out_breakdown: *mut CarbonTreeResult,
) -> CarbonErrorCode {
    if out_aggregate.is_null() {
        return track_error(&DefaultCarbonError::null_pointer("out_aggregate"));
    }
    let inputs: &[CarbonTreeInput] = if len == 0 {
        &[]
    } else if trees.is_null() {
        return track_error(&DefaultCarbonError::null_pointer("trees"));
    } else {
        slice::from_raw_parts(trees, len)
    };

    let result = match estimate(&observations(inputs), Hectares::new(plot_area_ha)) {
        Ok(result) => result,
        Err(e) => return track_error(&DefaultCarbonError::invalid_measurement(&e)),
    };

    *out_aggregate = CarbonAggregate {
        total_trees: result.total_trees,
        total_carbon_stock_tonnes: *result.total_carbon_stock,
        total_co2_sequestration_tonnes: *result.total_co2_sequestration,
        carbon_stock_per_hectare: *result.carbon_stock_per_hectare,
        co2_sequestration_per_hectare: *result.co2_sequestration_per_hectare,
        area_is_areal: result.is_areal(),
    };

    if !out_breakdown.is_null() && len > 0 {
        let out = slice::from_raw_parts_mut(out_breakdown, len);
        for (slot, tree) in out.iter_mut().zip(&result.tree_breakdown) {
            *slot = CarbonTreeResult {
                carbon_stock_kg: *tree.carbon_stock,
                co2_sequestration_kg: *tree.co2_sequestration,
            };
        }
    }

    clear_last_error()
}

/// Compute the full biomass chain for a single tree.
///
/// # Returns
/// - `Ok` on success
/// - `NullPointer` if `out_metrics` is null
/// - `InvalidMeasurement` if density or DBH is non-positive or non-finite
///
/// # Safety
/// `out_metrics` must be a valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn carbon_tree_metrics(
    wood_density: f64,
    dbh_cm: f64,
    out_metrics: *mut CarbonTreeMetrics,
) -> CarbonErrorCode {
    if out_metrics.is_null() {
        return track_error(&DefaultCarbonError::null_pointer("out_metrics"));
    }

    let validated = SpeciesProfile::new("tree", "", WoodDensity::new(wood_density))
        .and_then(|species| TreeObservation::new("tree", species, Centimeters::new(dbh_cm)));
    let tree = match validated {
        Ok(tree) => tree,
        Err(e) => return track_error(&DefaultCarbonError::invalid_measurement(&e)),
    };

    let b = biomass_breakdown(tree.species.wood_density, tree.dbh);
    *out_metrics = CarbonTreeMetrics {
        above_ground_biomass_kg: *b.above_ground,
        below_ground_biomass_kg: *b.below_ground,
        total_biomass_kg: *b.total,
        carbon_stock_kg: *b.carbon_stock,
        co2_equivalent_kg: *b.co2_equivalent,
    };
    clear_last_error()
}
