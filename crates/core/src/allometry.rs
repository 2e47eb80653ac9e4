//! Height-free allometric biomass and carbon model
//!
//! Estimates tree biomass from wood density and diameter at breast height only,
//! then converts it to carbon stock and CO₂-equivalent using IPCC default ratios.
//!
//! # Formula chain
//! ```text
//! AGB = 0.11 × ρ × D^2.62
//! BGB = 0.26 × AGB
//! TB  = AGB + BGB
//! C   = 0.47 × TB
//! CO₂ = C × 44/12
//! ```
//!
//! # References
//! - Chave, J. et al. (2005). "Tree allometry and improved estimation of carbon stocks
//!   and balance in tropical forests." Oecologia, 145, 87-99.
//! - IPCC (2006). "Guidelines for National Greenhouse Gas Inventories, Volume 4:
//!   Agriculture, Forestry and Other Land Use." Table 4.4 (root-to-shoot ratio) and
//!   Section 4.3 (carbon fraction of dry matter).

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Centimeters, Kilograms, WoodDensity};

/// Allometric coefficient `a` in `AGB = a × ρ × D^b`
pub const AGB_COEFFICIENT: f64 = 0.11;

/// Allometric exponent `b` on DBH in `AGB = a × ρ × D^b`
pub const AGB_DBH_EXPONENT: f64 = 2.62;

/// IPCC default root-to-shoot ratio for tropical forest
pub const ROOT_TO_SHOOT_RATIO: f64 = 0.26;

/// IPCC default carbon fraction of dry biomass
pub const CARBON_FRACTION: f64 = 0.47;

/// Molecular weight ratio of CO₂ (44 g/mol) to C (12 g/mol)
pub const CO2_PER_CARBON: f64 = 44.0 / 12.0;

/// Intermediate and final values of the biomass-to-CO₂ chain for one tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomassBreakdown {
    pub above_ground: Kilograms,
    pub below_ground: Kilograms,
    pub total: Kilograms,
    pub carbon_stock: Kilograms,
    pub co2_equivalent: Kilograms,
}

/// Above-ground biomass (kg)
///
/// Simplified pantropical estimator that omits tree height:
/// ```text
/// AGB = 0.11 × ρ × D^2.62
/// ```
/// - **ρ** = wood density (g/cm³)
/// - **D** = diameter at breast height (cm)
///
/// `D` must be positive; callers validate before reaching this point.
#[inline]
pub fn above_ground_biomass(wood_density: WoodDensity, dbh: Centimeters) -> Kilograms {
    Kilograms::new(AGB_COEFFICIENT * *wood_density * dbh.powf(AGB_DBH_EXPONENT))
}

/// Below-ground (root) biomass from above-ground biomass
#[inline]
pub fn below_ground_biomass(above_ground: Kilograms) -> Kilograms {
    above_ground * ROOT_TO_SHOOT_RATIO
}

/// Carbon held in dry biomass
#[inline]
pub fn carbon_content(total_biomass: Kilograms) -> Kilograms {
    total_biomass * CARBON_FRACTION
}

/// CO₂-equivalent mass of a carbon mass
#[inline]
pub fn co2_equivalent(carbon: Kilograms) -> Kilograms {
    carbon * CO2_PER_CARBON
}

/// Run the full chain for a single tree
///
/// # Example
/// ```
/// use carbon_stock_core::allometry::biomass_breakdown;
/// use carbon_stock_core::core_types::{Centimeters, WoodDensity};
///
/// let b = biomass_breakdown(WoodDensity::new(0.55), Centimeters::new(30.0));
/// assert!((*b.co2_equivalent / *b.carbon_stock - 44.0 / 12.0).abs() < 1e-12);
/// ```
pub fn biomass_breakdown(wood_density: WoodDensity, dbh: Centimeters) -> BiomassBreakdown {
    let above_ground = above_ground_biomass(wood_density, dbh);
    let below_ground = below_ground_biomass(above_ground);
    let total = above_ground + below_ground;
    let carbon_stock = carbon_content(total);

    BiomassBreakdown {
        above_ground,
        below_ground,
        total,
        carbon_stock,
        co2_equivalent: co2_equivalent(carbon_stock),
    }
}
