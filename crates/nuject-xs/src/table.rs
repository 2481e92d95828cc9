//! Validated cross-section interpolation surfaces.

use std::path::Path;

use nuject_core::{ErrorInfo, InjectError, ParticleType};
use serde::{Deserialize, Serialize};

/// On-disk encoding of a cross-section table.
#[derive(Debug, Serialize, Deserialize)]
struct RawTable {
    /// Optional final-state pair the table was produced for.
    #[serde(default)]
    final_state: Option<(ParticleType, ParticleType)>,
    energies: Vec<f64>,
    inelasticities: Vec<f64>,
    total: Vec<f64>,
    differential: Vec<Vec<f64>>,
}

/// A 1-D total-cross-section surface over energy plus a 2-D differential
/// surface over (energy, inelasticity), both owned exclusively by one
/// provider.
///
/// Axes are strictly increasing and all values non-negative; both are
/// enforced at construction so every later query can assume a well formed
/// table. Queries outside the tabulated support are an error, never a clamp.
#[derive(Debug, Clone)]
pub struct CrossSectionTable {
    final_state: Option<(ParticleType, ParticleType)>,
    energies: Vec<f64>,
    inelasticities: Vec<f64>,
    total: Vec<f64>,
    differential: Vec<Vec<f64>>,
}

impl CrossSectionTable {
    /// Builds a table from its raw arrays, validating shape and values.
    pub fn new(
        energies: Vec<f64>,
        inelasticities: Vec<f64>,
        total: Vec<f64>,
        differential: Vec<Vec<f64>>,
    ) -> Result<Self, InjectError> {
        let table = Self {
            final_state: None,
            energies,
            inelasticities,
            total,
            differential,
        };
        table.validate()?;
        Ok(table)
    }

    /// Loads and validates a table from a JSON file.
    ///
    /// Missing files, malformed JSON, and axis/value violations all surface
    /// as `Table` errors carrying the offending path.
    pub fn load(path: &Path) -> Result<Self, InjectError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            InjectError::Table(
                ErrorInfo::new("table-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let raw: RawTable = serde_json::from_str(&text).map_err(|err| {
            InjectError::Table(
                ErrorInfo::new("table-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let table = Self {
            final_state: raw.final_state,
            energies: raw.energies,
            inelasticities: raw.inelasticities,
            total: raw.total,
            differential: raw.differential,
        };
        table.validate().map_err(|err| match err {
            InjectError::Table(info) => {
                InjectError::Table(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), InjectError> {
        check_axis("energies", &self.energies)?;
        check_axis("inelasticities", &self.inelasticities)?;
        if self.total.len() != self.energies.len() {
            return Err(table_error(
                "table-shape",
                "total cross-section length must match the energy axis",
            ));
        }
        if self.differential.len() != self.energies.len() {
            return Err(table_error(
                "table-shape",
                "differential surface must have one row per energy",
            ));
        }
        for row in &self.differential {
            if row.len() != self.inelasticities.len() {
                return Err(table_error(
                    "table-shape",
                    "differential rows must match the inelasticity axis",
                ));
            }
        }
        for value in self.total.iter().chain(self.differential.iter().flatten()) {
            if !value.is_finite() || *value < 0.0 {
                return Err(table_error(
                    "table-values",
                    "cross-section values must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }

    /// Final-state pair recorded in the table file, if any.
    pub fn final_state(&self) -> Option<(ParticleType, ParticleType)> {
        self.final_state
    }

    /// Tabulated energy support as `(min, max)`.
    pub fn energy_support(&self) -> (f64, f64) {
        (self.energies[0], *self.energies.last().unwrap_or(&0.0))
    }

    /// Tabulated inelasticity support as `(min, max)`.
    pub fn inelasticity_support(&self) -> (f64, f64) {
        (
            self.inelasticities[0],
            *self.inelasticities.last().unwrap_or(&0.0),
        )
    }

    /// Total cross section at `energy`, linearly interpolated.
    pub fn total(&self, energy: f64) -> Result<f64, InjectError> {
        let (idx, frac) = locate("energy", &self.energies, energy)?;
        Ok(lerp(self.total[idx], self.total[idx + 1], frac))
    }

    /// Differential cross-section density at `(energy, inelasticity)`,
    /// bilinearly interpolated.
    pub fn differential(&self, energy: f64, inelasticity: f64) -> Result<f64, InjectError> {
        let (ei, ef) = locate("energy", &self.energies, energy)?;
        let (yi, yf) = locate("inelasticity", &self.inelasticities, inelasticity)?;
        let low = lerp(
            self.differential[ei][yi],
            self.differential[ei][yi + 1],
            yf,
        );
        let high = lerp(
            self.differential[ei + 1][yi],
            self.differential[ei + 1][yi + 1],
            yf,
        );
        Ok(lerp(low, high, ef))
    }

    /// Largest differential value along the inelasticity axis at `energy`.
    ///
    /// Used as the rejection-sampling ceiling; interpolated rows are convex
    /// combinations of the bracketing tabulated rows, so the column-wise
    /// blended maximum bounds the whole interpolated row.
    pub fn row_maximum(&self, energy: f64) -> Result<f64, InjectError> {
        let (ei, ef) = locate("energy", &self.energies, energy)?;
        let mut maximum = 0.0_f64;
        for column in 0..self.inelasticities.len() {
            let blended = lerp(
                self.differential[ei][column],
                self.differential[ei + 1][column],
                ef,
            );
            maximum = maximum.max(blended);
        }
        Ok(maximum)
    }

    /// Trapezoidal integral of the differential density over the
    /// inelasticity axis at `energy`. Normalizes sampled densities.
    pub fn integrated_differential(&self, energy: f64) -> Result<f64, InjectError> {
        let (ei, ef) = locate("energy", &self.energies, energy)?;
        let mut integral = 0.0;
        for window in 0..self.inelasticities.len() - 1 {
            let width = self.inelasticities[window + 1] - self.inelasticities[window];
            let left = lerp(
                self.differential[ei][window],
                self.differential[ei + 1][window],
                ef,
            );
            let right = lerp(
                self.differential[ei][window + 1],
                self.differential[ei + 1][window + 1],
                ef,
            );
            integral += 0.5 * (left + right) * width;
        }
        Ok(integral)
    }
}

fn table_error(code: &str, message: &str) -> InjectError {
    InjectError::Table(ErrorInfo::new(code, message))
}

fn check_axis(name: &str, axis: &[f64]) -> Result<(), InjectError> {
    if axis.len() < 2 {
        return Err(InjectError::Table(
            ErrorInfo::new("table-axes", "axis needs at least two points")
                .with_context("axis", name),
        ));
    }
    for pair in axis.windows(2) {
        if !(pair[0].is_finite() && pair[1].is_finite()) || pair[1] <= pair[0] {
            return Err(InjectError::Table(
                ErrorInfo::new("table-axes", "axis must be finite and strictly increasing")
                    .with_context("axis", name),
            ));
        }
    }
    Ok(())
}

/// Finds the bracketing interval for `x` on a strictly increasing axis,
/// returning the lower index and the interpolation fraction.
fn locate(name: &str, axis: &[f64], x: f64) -> Result<(usize, f64), InjectError> {
    let first = axis[0];
    let last = axis[axis.len() - 1];
    if !x.is_finite() || x < first || x > last {
        return Err(InjectError::Domain(
            ErrorInfo::new(
                "table-support",
                "query lies outside the tabulated support",
            )
            .with_context("axis", name)
            .with_context("value", format!("{x}"))
            .with_context("support", format!("[{first}, {last}]")),
        ));
    }
    // Binary search for the largest index with axis[idx] <= x.
    let mut low = 0usize;
    let mut high = axis.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if axis[mid] <= x {
            low = mid;
        } else {
            high = mid;
        }
    }
    let span = axis[low + 1] - axis[low];
    Ok(((low), (x - axis[low]) / span))
}

fn lerp(a: f64, b: f64, frac: f64) -> f64 {
    a + (b - a) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CrossSectionTable {
        CrossSectionTable::new(
            vec![10.0, 100.0, 1000.0],
            vec![0.0, 0.5, 1.0],
            vec![1.0, 2.0, 4.0],
            vec![
                vec![1.0, 1.0, 1.0],
                vec![2.0, 3.0, 2.0],
                vec![4.0, 6.0, 4.0],
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn total_interpolates_between_nodes() {
        let table = sample_table();
        assert!((table.total(10.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((table.total(55.0).unwrap() - 1.5).abs() < 1e-12);
        assert!((table.total(1000.0).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn queries_outside_support_are_domain_errors() {
        let table = sample_table();
        let err = table.total(5.0).unwrap_err();
        assert!(matches!(err, InjectError::Domain(_)));
        let err = table.differential(100.0, 1.5).unwrap_err();
        assert_eq!(err.info().code, "table-support");
    }

    #[test]
    fn boundary_energies_are_accepted() {
        let table = sample_table();
        assert!(table.total(10.0).is_ok());
        assert!(table.total(1000.0).is_ok());
        assert!(table.differential(10.0, 0.0).is_ok());
        assert!(table.differential(1000.0, 1.0).is_ok());
    }

    #[test]
    fn bilinear_blend_matches_hand_value() {
        let table = sample_table();
        // Halfway in energy between the 100 and 1000 rows, at y = 0.5.
        let value = table.differential(550.0, 0.5).unwrap();
        assert!((value - 4.5).abs() < 1e-12);
    }

    #[test]
    fn row_maximum_bounds_the_row() {
        let table = sample_table();
        let ceiling = table.row_maximum(550.0).unwrap();
        for step in 0..=20 {
            let y = step as f64 / 20.0;
            assert!(table.differential(550.0, y).unwrap() <= ceiling + 1e-12);
        }
    }

    #[test]
    fn integral_of_flat_row_is_width() {
        let table = sample_table();
        // The 10 GeV row is flat at 1.0 over y in [0, 1].
        assert!((table.integrated_differential(10.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_monotonic_axis_rejected() {
        let err = CrossSectionTable::new(
            vec![10.0, 10.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap_err();
        assert_eq!(err.info().code, "table-axes");
    }

    #[test]
    fn negative_values_rejected() {
        let err = CrossSectionTable::new(
            vec![10.0, 100.0],
            vec![0.0, 1.0],
            vec![1.0, -1.0],
            vec![vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap_err();
        assert_eq!(err.info().code, "table-values");
    }

    #[test]
    fn mismatched_row_length_rejected() {
        let err = CrossSectionTable::new(
            vec![10.0, 100.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap_err();
        assert_eq!(err.info().code, "table-shape");
    }
}
