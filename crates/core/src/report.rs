//! Human-readable rendering of estimate results
//!
//! The estimator never rounds; everything here is presentation only. Display
//! figures use 2 decimal places with locale-aware digit grouping, matching the
//! `id-ID` formatting of the field survey tool by default.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use crate::core_types::units::Hectares;
use crate::estimator::AggregateResult;

/// Decimal places used for on-screen figures
pub const DISPLAY_DECIMALS: usize = 2;

/// Plot metadata shown alongside results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Plot {
    pub name: String,
    pub area: Hectares,
}

impl Plot {
    pub fn new(name: impl Into<String>, area: Hectares) -> Self {
        Self {
            name: name.into(),
            area,
        }
    }
}

/// Digit grouping and decimal separator convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberLocale {
    /// `1.234.567,89`
    #[default]
    Indonesian,
    /// `1,234,567.89`
    English,
}

impl NumberLocale {
    fn separators(self) -> (char, char) {
        match self {
            NumberLocale::Indonesian => ('.', ','),
            NumberLocale::English => (',', '.'),
        }
    }

    /// Parse a short locale tag (`id`, `id-ID`, `en`, `en-US`, ...)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag.split(['-', '_']).next().unwrap_or_default();
        match lang.to_ascii_lowercase().as_str() {
            "id" | "indonesian" => Some(NumberLocale::Indonesian),
            "en" | "english" => Some(NumberLocale::English),
            _ => None,
        }
    }
}

/// Format a number with fixed decimals and locale grouping.
///
/// Non-finite values render as `-`.
///
/// ```
/// use carbon_stock_core::report::{format_number, NumberLocale};
///
/// assert_eq!(format_number(1234567.891, 2, NumberLocale::Indonesian), "1.234.567,89");
/// assert_eq!(format_number(1234567.891, 2, NumberLocale::English), "1,234,567.89");
/// ```
pub fn format_number(value: f64, decimals: usize, locale: NumberLocale) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let (group_sep, decimal_sep) = locale.separators();
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    // Rounding can turn -0.001 into "0.00"; don't print "-0,00"
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(group_sep);
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(decimal_sep);
        out.push_str(frac);
    }
    out
}

/// Text summary of a plot estimate
#[derive(Debug, Clone)]
pub struct PlotReport<'a> {
    plot: &'a Plot,
    result: &'a AggregateResult,
    locale: NumberLocale,
    decimals: usize,
}

impl<'a> PlotReport<'a> {
    pub fn new(plot: &'a Plot, result: &'a AggregateResult) -> Self {
        Self {
            plot,
            result,
            locale: NumberLocale::default(),
            decimals: DISPLAY_DECIMALS,
        }
    }

    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    fn num(&self, value: f64) -> String {
        format_number(value, self.decimals, self.locale)
    }

    /// Render the report as a string
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        let r = self.result;
        let name = if self.plot.name.is_empty() {
            "N/A"
        } else {
            self.plot.name.as_str()
        };

        writeln!(out, "=== Carbon Estimate: {name} ===")?;
        writeln!(out, "Plot area:            {} ha", self.num(*self.plot.area))?;
        writeln!(out, "Trees:                {}", r.total_trees)?;
        writeln!(
            out,
            "Total carbon stock:   {} t C",
            self.num(*r.total_carbon_stock)
        )?;
        writeln!(
            out,
            "Total CO2 sequestered: {} t CO2e",
            self.num(*r.total_co2_sequestration)
        )?;

        let suffix = if r.is_areal() {
            ""
        } else {
            "  (plot area not positive: absolute totals, not per hectare)"
        };
        writeln!(
            out,
            "Carbon per hectare:   {} t C/ha{suffix}",
            self.num(*r.carbon_stock_per_hectare)
        )?;
        writeln!(
            out,
            "CO2 per hectare:      {} t CO2e/ha{suffix}",
            self.num(*r.co2_sequestration_per_hectare)
        )?;

        if r.tree_breakdown.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(
            out,
            "{:<38} {:<34} {:>10} {:>14} {:>14}",
            "ID", "Species", "DBH (cm)", "Carbon (kg)", "CO2 (kg)"
        )?;
        for tree in &r.tree_breakdown {
            writeln!(
                out,
                "{:<38} {:<34} {:>10} {:>14} {:>14}",
                tree.id,
                tree.species_name,
                self.num(*tree.dbh),
                self.num(*tree.carbon_stock),
                self.num(*tree.co2_sequestration)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for PlotReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
