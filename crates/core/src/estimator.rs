//! Plot-level carbon estimator
//!
//! `estimate` turns an ordered list of tree observations plus a plot area into
//! per-tree carbon/CO₂ figures and plot aggregates. It is a pure function: no
//! I/O, no shared state, safe to call from any number of threads at once.
//!
//! Edge cases handled without error:
//! - **Empty plot**: all-zero aggregates and an empty breakdown
//! - **Degenerate area** (`<= 0` or NaN): per-hectare figures fall back to
//!   the absolute totals (divisor 1) and the result is tagged
//!   [`AreaBasis::AbsoluteFallback`]
//!
//! Out-of-domain measurements (dbh or wood density not finite and positive)
//! reject the whole calculation with `CarbonError::InvalidMeasurement`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allometry::{biomass_breakdown, CO2_PER_CARBON};
use crate::core_types::tree::TreeObservation;
use crate::core_types::units::{Centimeters, Hectares, Kilograms, Tonnes};
use crate::error::Result;

/// Tree count at which per-tree work moves onto the rayon pool.
/// Below this the thread handoff costs more than the arithmetic.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Carbon figures for one tree, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerTreeResult {
    pub id: String,
    pub species_name: String,
    pub dbh: Centimeters,
    pub carbon_stock: Kilograms,
    pub co2_sequestration: Kilograms,
}

/// What the per-hectare figures of an [`AggregateResult`] actually mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AreaBasis {
    /// Totals were divided by a positive plot area; figures are t/ha.
    #[default]
    Areal,
    /// Plot area was zero, negative or NaN; the divisor was replaced by 1 so
    /// the "per-hectare" figures equal the absolute totals. Placeholder only.
    AbsoluteFallback,
}

impl AreaBasis {
    /// Divisor used for per-hectare figures under the safe-divisor policy
    fn divisor_for(plot_area: Hectares) -> (Self, Hectares) {
        if plot_area.is_positive() {
            (AreaBasis::Areal, plot_area)
        } else {
            (AreaBasis::AbsoluteFallback, Hectares::ONE)
        }
    }
}

/// Plot totals plus the per-tree breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total_trees: usize,
    pub total_carbon_stock: Tonnes,
    pub total_co2_sequestration: Tonnes,
    pub carbon_stock_per_hectare: Tonnes,
    pub co2_sequestration_per_hectare: Tonnes,
    pub area_basis: AreaBasis,
    pub tree_breakdown: Vec<PerTreeResult>,
}

impl AggregateResult {
    /// Result for a plot with no trees
    pub fn empty(area_basis: AreaBasis) -> Self {
        Self {
            area_basis,
            ..Self::default()
        }
    }

    /// Sum of per-tree carbon stock in kilograms
    pub fn total_carbon_stock_kg(&self) -> Kilograms {
        self.tree_breakdown.iter().map(|t| t.carbon_stock).sum()
    }

    /// True when per-hectare figures are genuine areal densities
    pub fn is_areal(&self) -> bool {
        self.area_basis == AreaBasis::Areal
    }
}

/// Compute the carbon result for a single tree.
///
/// Assumes the observation has already been validated.
fn tree_result(tree: &TreeObservation) -> PerTreeResult {
    let biomass = biomass_breakdown(tree.species.wood_density, tree.dbh);
    PerTreeResult {
        id: tree.id.clone(),
        species_name: tree.species.name.clone(),
        dbh: tree.dbh,
        carbon_stock: biomass.carbon_stock,
        co2_sequestration: biomass.co2_equivalent,
    }
}

/// Estimate carbon stock and CO₂ sequestration for a plot.
///
/// # Arguments
/// * `trees` - Observations in the order they should appear in the breakdown
/// * `plot_area` - Plot area; non-positive values trigger the safe divisor
///
/// # Returns
/// Aggregates in tonnes and a breakdown with one entry per tree, same order
/// as `trees`. No rounding is applied.
///
/// # Errors
/// Returns `CarbonError::InvalidMeasurement` for the first tree (in input
/// order) whose dbh or wood density is not finite and positive. No partial
/// result is produced.
///
/// # Example
/// ```
/// use carbon_stock_core::core_types::{Centimeters, Hectares, SpeciesCatalog, TreeObservation};
/// use carbon_stock_core::estimate;
///
/// let catalog = SpeciesCatalog::indonesian_defaults();
/// let jati = catalog.lookup("Jati (Tectona grandis)").unwrap().clone();
/// let trees = vec![TreeObservation::new("J-1", jati, Centimeters::new(35.0)).unwrap()];
///
/// let result = estimate(&trees, Hectares::new(0.25)).unwrap();
/// assert_eq!(result.total_trees, 1);
/// assert!(result.is_areal());
/// ```
pub fn estimate(trees: &[TreeObservation], plot_area: Hectares) -> Result<AggregateResult> {
    let (area_basis, divisor) = AreaBasis::divisor_for(plot_area);
    if area_basis == AreaBasis::AbsoluteFallback {
        warn!(
            plot_area = *plot_area,
            "Plot area is not positive; per-hectare figures fall back to absolute totals"
        );
    }

    if trees.is_empty() {
        debug!("No trees supplied, returning empty result");
        return Ok(AggregateResult::empty(area_basis));
    }

    trees.iter().try_for_each(TreeObservation::validate)?;

    let tree_breakdown: Vec<PerTreeResult> = if trees.len() >= PARALLEL_THRESHOLD {
        trees.par_iter().map(tree_result).collect()
    } else {
        trees.iter().map(tree_result).collect()
    };

    let total_carbon_kg: Kilograms = tree_breakdown.iter().map(|t| t.carbon_stock).sum();
    let total_carbon_stock = total_carbon_kg.to_tonnes();
    let total_co2_sequestration = (total_carbon_kg * CO2_PER_CARBON).to_tonnes();

    debug!(
        trees = trees.len(),
        total_carbon_t = *total_carbon_stock,
        total_co2_t = *total_co2_sequestration,
        "Carbon estimate complete"
    );

    Ok(AggregateResult {
        total_trees: trees.len(),
        total_carbon_stock,
        total_co2_sequestration,
        carbon_stock_per_hectare: total_carbon_stock / divisor,
        co2_sequestration_per_hectare: total_co2_sequestration / divisor,
        area_basis,
        tree_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::species::SpeciesProfile;
    use crate::core_types::units::WoodDensity;
    use crate::error::{CarbonError, Quantity};
    use approx::assert_relative_eq;

    fn meranti() -> SpeciesProfile {
        SpeciesProfile::new("Meranti", "Shorea spp.", WoodDensity::new(0.55)).unwrap()
    }

    fn tree(id: &str, dbh: f64) -> TreeObservation {
        TreeObservation::new(id, meranti(), Centimeters::new(dbh)).unwrap()
    }

    #[test]
    fn test_empty_plot_is_all_zero() {
        let result = estimate(&[], Hectares::new(3.0)).unwrap();
        assert_eq!(result.total_trees, 0);
        assert_eq!(result.total_carbon_stock, Tonnes::ZERO);
        assert_eq!(result.total_co2_sequestration, Tonnes::ZERO);
        assert_eq!(result.carbon_stock_per_hectare, Tonnes::ZERO);
        assert_eq!(result.co2_sequestration_per_hectare, Tonnes::ZERO);
        assert!(result.tree_breakdown.is_empty());
        assert!(result.is_areal());
    }

    #[test]
    fn test_empty_plot_with_zero_area_is_flagged() {
        let result = estimate(&[], Hectares::new(0.0)).unwrap();
        assert_eq!(result.area_basis, AreaBasis::AbsoluteFallback);
        assert_eq!(result.total_carbon_stock, Tonnes::ZERO);
    }

    #[test]
    fn test_single_tree_reference_values() {
        let result = estimate(&[tree("m1", 30.0)], Hectares::new(1.0)).unwrap();

        let agb = 0.11 * 0.55 * 30.0_f64.powf(2.62);
        let carbon = 0.47 * (agb + 0.26 * agb);
        let co2 = carbon * 44.0 / 12.0;

        let row = &result.tree_breakdown[0];
        assert_eq!(row.id, "m1");
        assert_eq!(row.species_name, "Meranti");
        assert_eq!(row.dbh, Centimeters::new(30.0));
        assert_relative_eq!(*row.carbon_stock, carbon, max_relative = 1e-9);
        assert_relative_eq!(*row.co2_sequestration, co2, max_relative = 1e-9);
        assert_relative_eq!(*result.total_carbon_stock, carbon / 1000.0, max_relative = 1e-9);
        assert_relative_eq!(*result.total_co2_sequestration, co2 / 1000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_safe_divisor_for_degenerate_area() {
        let trees = [tree("a", 20.0), tree("b", 35.0)];
        for area in [0.0, -2.5, f64::NAN] {
            let result = estimate(&trees, Hectares::new(area)).unwrap();
            assert_eq!(result.area_basis, AreaBasis::AbsoluteFallback);
            assert_eq!(result.carbon_stock_per_hectare, result.total_carbon_stock);
            assert_eq!(
                result.co2_sequestration_per_hectare,
                result.total_co2_sequestration
            );
        }
    }

    #[test]
    fn test_rejects_invalid_dbh_naming_first_offender() {
        let mut bad = tree("bad-1", 10.0);
        bad.dbh = Centimeters::new(0.0);
        let mut worse = tree("bad-2", 10.0);
        worse.dbh = Centimeters::new(-5.0);

        let err = estimate(&[tree("ok", 12.0), bad, worse], Hectares::new(1.0)).unwrap_err();
        match err {
            CarbonError::InvalidMeasurement {
                tree_id,
                quantity,
                value,
            } => {
                assert_eq!(tree_id, "bad-1");
                assert_eq!(quantity, Quantity::Dbh);
                assert_eq!(value, 0.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_invalid_wood_density() {
        let mut bad = tree("d1", 10.0);
        bad.species.wood_density = WoodDensity::new(0.0);
        let err = estimate(&[bad], Hectares::new(1.0)).unwrap_err();
        assert!(matches!(
            err,
            CarbonError::InvalidMeasurement {
                quantity: Quantity::WoodDensity,
                ..
            }
        ));
    }

    #[test]
    fn test_total_carbon_kg_helper() {
        let result = estimate(&[tree("a", 15.0), tree("b", 25.0)], Hectares::new(1.0)).unwrap();
        assert_relative_eq!(
            *result.total_carbon_stock_kg().to_tonnes(),
            *result.total_carbon_stock,
            max_relative = 1e-12
        );
    }
}
