//! Validation of the plot carbon estimator against the allometric reference formulas
//!
//! Each scenario recomputes the expected values by hand from
//! `AGB = 0.11 ρ D^2.62`, `BGB = 0.26 AGB`, `C = 0.47 (AGB + BGB)`,
//! `CO₂ = C × 44/12` and checks the estimator reproduces them.

use approx::assert_relative_eq;
use carbon_stock_core::estimator::PARALLEL_THRESHOLD;
use carbon_stock_core::{
    estimate, AreaBasis, Centimeters, Hectares, SpeciesCatalog, SpeciesProfile, TreeObservation,
    WoodDensity,
};

const CO2_RATIO: f64 = 44.0 / 12.0;

/// Reference carbon stock (kg) for one tree, written out longhand
fn reference_carbon_kg(rho: f64, dbh: f64) -> f64 {
    let agb = 0.11 * rho * dbh.powf(2.62);
    let bgb = 0.26 * agb;
    0.47 * (agb + bgb)
}

fn species(name: &str, rho: f64) -> SpeciesProfile {
    SpeciesProfile::new(name, name, WoodDensity::new(rho)).unwrap()
}

fn tree(id: &str, profile: &SpeciesProfile, dbh: f64) -> TreeObservation {
    TreeObservation::new(id, profile.clone(), Centimeters::new(dbh)).unwrap()
}

/// A mixed plot drawn from the built-in catalog
fn mixed_plot() -> Vec<TreeObservation> {
    let catalog = SpeciesCatalog::indonesian_defaults();
    catalog
        .iter()
        .enumerate()
        .map(|(i, profile)| tree(&format!("T{i:03}"), profile, 8.0 + 7.5 * i as f64))
        .collect()
}

#[test]
fn test_single_meranti_tree_30cm() {
    let meranti = species("Meranti", 0.55);
    let result = estimate(&[tree("m-30", &meranti, 30.0)], Hectares::new(1.0)).unwrap();

    let carbon = reference_carbon_kg(0.55, 30.0);
    let row = &result.tree_breakdown[0];
    assert_relative_eq!(*row.carbon_stock, carbon, max_relative = 1e-9);
    assert_relative_eq!(*row.co2_sequestration, carbon * CO2_RATIO, max_relative = 1e-9);

    // Sanity check on magnitude: AGB ≈ 448 kg → C ≈ 265 kg
    assert!(
        *row.carbon_stock > 255.0 && *row.carbon_stock < 275.0,
        "carbon stock {} kg outside expected band",
        *row.carbon_stock
    );
}

#[test]
fn test_two_identical_trees_on_two_hectares() {
    let meranti = species("Meranti", 0.55);
    let one = estimate(&[tree("a", &meranti, 30.0)], Hectares::new(1.0)).unwrap();
    let two = estimate(
        &[tree("a", &meranti, 30.0), tree("b", &meranti, 30.0)],
        Hectares::new(2.0),
    )
    .unwrap();

    assert_eq!(two.total_trees, 2);
    assert_relative_eq!(
        *two.total_carbon_stock,
        2.0 * *one.total_carbon_stock,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        *two.total_co2_sequestration,
        2.0 * *one.total_co2_sequestration,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        *two.carbon_stock_per_hectare,
        *two.total_carbon_stock / 2.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        *two.co2_sequestration_per_hectare,
        *two.total_co2_sequestration / 2.0,
        max_relative = 1e-12
    );
    assert_eq!(two.area_basis, AreaBasis::Areal);
}

#[test]
fn test_zero_area_uses_absolute_totals() {
    let trees = mixed_plot();
    let result = estimate(&trees, Hectares::new(0.0)).unwrap();

    assert_eq!(result.area_basis, AreaBasis::AbsoluteFallback);
    assert_eq!(result.carbon_stock_per_hectare, result.total_carbon_stock);
    assert_eq!(
        result.co2_sequestration_per_hectare,
        result.total_co2_sequestration
    );
}

#[test]
fn test_totals_match_breakdown_sum() {
    let trees = mixed_plot();
    let result = estimate(&trees, Hectares::new(0.4)).unwrap();

    let sum_kg: f64 = result.tree_breakdown.iter().map(|t| *t.carbon_stock).sum();
    assert_relative_eq!(*result.total_carbon_stock, sum_kg / 1000.0, max_relative = 1e-12);

    let co2_sum_kg: f64 = result
        .tree_breakdown
        .iter()
        .map(|t| *t.co2_sequestration)
        .sum();
    assert_relative_eq!(
        *result.total_co2_sequestration,
        co2_sum_kg / 1000.0,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        *result.carbon_stock_per_hectare,
        *result.total_carbon_stock / 0.4,
        max_relative = 1e-12
    );
}

#[test]
fn test_co2_to_carbon_ratio_holds_everywhere() {
    let result = estimate(&mixed_plot(), Hectares::new(1.5)).unwrap();

    for row in &result.tree_breakdown {
        assert_relative_eq!(
            *row.co2_sequestration / *row.carbon_stock,
            CO2_RATIO,
            max_relative = 1e-12
        );
    }
    assert_relative_eq!(
        *result.total_co2_sequestration / *result.total_carbon_stock,
        CO2_RATIO,
        max_relative = 1e-12
    );
}

#[test]
fn test_breakdown_preserves_input_order() {
    let trees = mixed_plot();
    let result = estimate(&trees, Hectares::new(1.0)).unwrap();

    assert_eq!(result.tree_breakdown.len(), trees.len());
    for (input, output) in trees.iter().zip(&result.tree_breakdown) {
        assert_eq!(input.id, output.id);
        assert_eq!(input.species.name, output.species_name);
        assert_eq!(input.dbh, output.dbh);
    }
}

#[test]
fn test_every_tree_matches_reference_formula() {
    let trees = mixed_plot();
    let result = estimate(&trees, Hectares::new(1.0)).unwrap();

    for (input, output) in trees.iter().zip(&result.tree_breakdown) {
        let expected = reference_carbon_kg(*input.species.wood_density, *input.dbh);
        assert_relative_eq!(*output.carbon_stock, expected, max_relative = 1e-9);
    }
}

#[test]
fn test_empty_plot() {
    for area in [2.0, 0.0, -1.0] {
        let result = estimate(&[], Hectares::new(area)).unwrap();
        assert_eq!(result.total_trees, 0);
        assert_eq!(*result.total_carbon_stock, 0.0);
        assert_eq!(*result.total_co2_sequestration, 0.0);
        assert_eq!(*result.carbon_stock_per_hectare, 0.0);
        assert_eq!(*result.co2_sequestration_per_hectare, 0.0);
        assert!(result.tree_breakdown.is_empty());
    }
}

#[test]
fn test_parallel_path_matches_sequential() {
    let sengon = species("Sengon", 0.33);
    let jati = species("Jati", 0.67);

    // Large enough to take the rayon path
    let big: Vec<TreeObservation> = (0..PARALLEL_THRESHOLD + 17)
        .map(|i| {
            let profile = if i % 2 == 0 { &sengon } else { &jati };
            tree(&format!("P{i}"), profile, 5.0 + (i % 97) as f64)
        })
        .collect();

    let parallel = estimate(&big, Hectares::new(10.0)).unwrap();

    // Same trees in small sequential batches
    let mut sequential_rows = Vec::new();
    for chunk in big.chunks(100) {
        sequential_rows.extend(estimate(chunk, Hectares::new(10.0)).unwrap().tree_breakdown);
    }

    assert_eq!(parallel.tree_breakdown.len(), sequential_rows.len());
    for (p, s) in parallel.tree_breakdown.iter().zip(&sequential_rows) {
        assert_eq!(p.id, s.id);
        assert_eq!(p.carbon_stock, s.carbon_stock);
        assert_eq!(p.co2_sequestration, s.co2_sequestration);
    }

    let sequential_total: f64 = sequential_rows.iter().map(|r| *r.carbon_stock).sum();
    assert_relative_eq!(
        *parallel.total_carbon_stock,
        sequential_total / 1000.0,
        max_relative = 1e-9
    );
}

#[test]
fn test_deterministic() {
    let trees = mixed_plot();
    let first = estimate(&trees, Hectares::new(0.75)).unwrap();
    let second = estimate(&trees, Hectares::new(0.75)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_callers() {
    let trees = mixed_plot();
    let expected = estimate(&trees, Hectares::new(1.0)).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| estimate(&trees, Hectares::new(1.0)).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
