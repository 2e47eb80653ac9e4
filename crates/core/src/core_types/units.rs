//! Semantic unit types for type-safe forestry quantity handling
//!
//! This module provides newtype wrappers for the handful of physical quantities
//! the carbon estimator works with, so that a diameter in centimeters can never
//! be passed where a plot area in hectares is expected, and kilograms of carbon
//! are never summed into a tonnes total by accident.
//!
//! # Design Philosophy
//! - All quantities use f64; results are reported to 4 decimals and summed
//!   across thousands of trees
//! - Arithmetic only where the estimator needs it: kilogram sums and scaling,
//!   and tonnes divided by hectares
//! - Provides explicit conversion methods between related types
//!   (`Kilograms::to_tonnes`, `Tonnes::to_kilograms`)
//! - Serde support for serialization (serialized as the bare number)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Constructors never panic: validation of measurements happens at the
//!   domain boundary (`TreeObservation::new`, `SpeciesProfile::new`, `estimate`)
//!
//! # Usage
//! ```
//! use carbon_stock_core::core_types::units::{Kilograms, Tonnes};
//!
//! let carbon = Kilograms::new(1250.0);
//! let tonnes: Tonnes = carbon.into();
//! assert!((*tonnes - 1.25).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Deref, Div, Mul};

/// Kilograms per metric tonne
pub const KG_PER_TONNE: f64 = 1000.0;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// LENGTH
// ============================================================================

/// Length in centimeters (trunk diameter at breast height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Centimeters(f64);

impl Eq for Centimeters {}

impl PartialOrd for Centimeters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Centimeters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Centimeters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Centimeters {
    /// Create a new length in centimeters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Centimeters(value)
    }

    /// True when the value is a usable measurement (finite and strictly positive)
    #[inline]
    #[must_use]
    pub fn is_valid_measurement(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl fmt::Display for Centimeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} cm", self.0)
    }
}

// ============================================================================
// AREA
// ============================================================================

/// Area in hectares (10,000 m²)
///
/// Plot areas may be zero or negative when supplied by a caller; the estimator
/// treats such areas as degenerate rather than rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hectares(f64);

impl Eq for Hectares {}

impl PartialOrd for Hectares {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hectares {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Hectares {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Hectares {
    /// One hectare
    pub const ONE: Hectares = Hectares(1.0);

    /// Create a new area in hectares
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Hectares(value)
    }

    /// True when the area can be used as a divisor for areal densities.
    /// NaN compares false and is therefore degenerate.
    #[inline]
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl fmt::Display for Hectares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ha", self.0)
    }
}

// ============================================================================
// MASS
// ============================================================================

/// Mass in kilograms (per-tree biomass, carbon and CO₂)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilograms(f64);

impl Eq for Kilograms {}

impl PartialOrd for Kilograms {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kilograms {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kilograms {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kilograms {
    /// Create a new mass in kilograms
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Kilograms(value)
    }

    /// Convert to metric tonnes
    #[inline]
    #[must_use]
    pub fn to_tonnes(self) -> Tonnes {
        Tonnes(self.0 / KG_PER_TONNE)
    }
}

impl From<Kilograms> for Tonnes {
    fn from(k: Kilograms) -> Tonnes {
        k.to_tonnes()
    }
}

impl fmt::Display for Kilograms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kg", self.0)
    }
}

impl Add for Kilograms {
    type Output = Kilograms;
    fn add(self, rhs: Kilograms) -> Kilograms {
        Kilograms(self.0 + rhs.0)
    }
}

impl Mul<f64> for Kilograms {
    type Output = Kilograms;
    fn mul(self, rhs: f64) -> Kilograms {
        Kilograms(self.0 * rhs)
    }
}

impl Sum for Kilograms {
    fn sum<I: Iterator<Item = Kilograms>>(iter: I) -> Kilograms {
        Kilograms(iter.map(|k| k.0).sum())
    }
}

/// Mass in metric tonnes (plot totals and areal densities)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Tonnes(f64);

impl Eq for Tonnes {}

impl PartialOrd for Tonnes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tonnes {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Tonnes {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Tonnes {
    /// Zero mass
    pub const ZERO: Tonnes = Tonnes(0.0);

    /// Create a new mass in tonnes
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Tonnes(value)
    }

    /// Convert to kilograms
    #[inline]
    #[must_use]
    pub fn to_kilograms(self) -> Kilograms {
        Kilograms(self.0 * KG_PER_TONNE)
    }
}

impl fmt::Display for Tonnes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} t", self.0)
    }
}

// Tonnes / Hectares = areal density, reported in the same Tonnes wrapper
// (t/ha) because no other areal quantity exists in this crate.
impl Div<Hectares> for Tonnes {
    type Output = Tonnes;
    fn div(self, rhs: Hectares) -> Tonnes {
        Tonnes(self.0 / rhs.0)
    }
}

// ============================================================================
// DENSITY
// ============================================================================

/// Basic wood density in g/cm³ (oven-dry mass over green volume)
///
/// Typical tropical values fall between 0.2 and 1.1 g/cm³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct WoodDensity(f64);

impl Eq for WoodDensity {}

impl PartialOrd for WoodDensity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WoodDensity {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for WoodDensity {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl WoodDensity {
    /// Create a new wood density in g/cm³
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        WoodDensity(value)
    }

    /// True when the value is a usable measurement (finite and strictly positive)
    #[inline]
    #[must_use]
    pub fn is_valid_measurement(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl fmt::Display for WoodDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} g/cm³", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kilograms_to_tonnes() {
        let kg = Kilograms::new(2500.0);
        assert_relative_eq!(*kg.to_tonnes(), 2.5);
        assert_relative_eq!(*kg.to_tonnes().to_kilograms(), 2500.0);
    }

    #[test]
    fn test_kilograms_sum() {
        let masses = [Kilograms::new(1.5), Kilograms::new(2.5), Kilograms::new(6.0)];
        let total: Kilograms = masses.into_iter().sum();
        assert_eq!(total, Kilograms::new(10.0));
    }

    #[test]
    fn test_tonnes_per_hectare() {
        let density = Tonnes::new(12.0) / Hectares::new(4.0);
        assert_eq!(density, Tonnes::new(3.0));
    }

    #[test]
    fn test_measurement_validity() {
        assert!(Centimeters::new(30.0).is_valid_measurement());
        assert!(!Centimeters::new(0.0).is_valid_measurement());
        assert!(!Centimeters::new(-4.0).is_valid_measurement());
        assert!(!Centimeters::new(f64::NAN).is_valid_measurement());
        assert!(!WoodDensity::new(f64::INFINITY).is_valid_measurement());
    }

    #[test]
    fn test_degenerate_area() {
        assert!(Hectares::new(0.5).is_positive());
        assert!(!Hectares::new(0.0).is_positive());
        assert!(!Hectares::new(-1.0).is_positive());
        assert!(!Hectares::new(f64::NAN).is_positive());
    }

    #[test]
    fn test_total_ordering() {
        assert!(Centimeters::new(10.0) < Centimeters::new(20.0));
        assert_eq!(Tonnes::new(1.0).max(Tonnes::new(3.0)), Tonnes::new(3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Centimeters::new(30.0).to_string(), "30.0 cm");
        assert_eq!(Kilograms::new(12.345).to_string(), "12.35 kg");
        assert_eq!(WoodDensity::new(0.55).to_string(), "0.55 g/cm³");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Hectares::new(2.0)).unwrap();
        assert_eq!(json, "2.0");
        let back: Hectares = serde_json::from_str("2.5").unwrap();
        assert_eq!(back, Hectares::new(2.5));
    }
}
