//! Read-only cross-section queries and final-state sampling.

use std::path::Path;

use nuject_core::{ErrorInfo, FinalStateKinematics, FinalStateSampler, InjectError, RngHandle};

use crate::table::CrossSectionTable;

/// Rejection trials allowed per final-state draw before the miss is treated
/// as a table/configuration mismatch rather than bad luck.
const MAX_REJECTION_TRIALS: usize = 1000;

/// Wraps the tabulated total and differential cross sections for one
/// interaction channel and answers interpolation and sampling queries.
///
/// State is read-only after construction; the provider is shared freely
/// across generation workers.
#[derive(Debug, Clone)]
pub struct CrossSectionProvider {
    table: CrossSectionTable,
}

impl CrossSectionProvider {
    /// Wraps an already validated table.
    pub fn new(table: CrossSectionTable) -> Self {
        Self { table }
    }

    /// Loads the table from a JSON file and wraps it.
    pub fn load(path: &Path) -> Result<Self, InjectError> {
        Ok(Self::new(CrossSectionTable::load(path)?))
    }

    /// The wrapped table.
    pub fn table(&self) -> &CrossSectionTable {
        &self.table
    }

    /// Differential cross-section density at `(energy, inelasticity)`.
    pub fn differential_cross_section(
        &self,
        energy: f64,
        inelasticity: f64,
    ) -> Result<f64, InjectError> {
        self.table.differential(energy, inelasticity)
    }
}

impl FinalStateSampler for CrossSectionProvider {
    fn total_cross_section(&self, energy: f64) -> Result<f64, InjectError> {
        self.table.total(energy)
    }

    /// Draws an inelasticity from the normalized differential distribution
    /// at `energy` by rejection against the tabulated row maximum.
    fn sample_final_state(
        &self,
        energy: f64,
        rng: &mut RngHandle,
    ) -> Result<(FinalStateKinematics, f64), InjectError> {
        let ceiling = self.table.row_maximum(energy)?;
        let norm = self.table.integrated_differential(energy)?;
        if ceiling <= 0.0 || norm <= 0.0 {
            return Err(InjectError::Domain(
                ErrorInfo::new(
                    "differential-empty",
                    "differential cross section vanishes at this energy",
                )
                .with_context("energy", format!("{energy}")),
            ));
        }
        let (y_min, y_max) = self.table.inelasticity_support();
        for _ in 0..MAX_REJECTION_TRIALS {
            let candidate = rng.uniform_in(y_min, y_max);
            let density = self.table.differential(energy, candidate)?;
            if rng.uniform() * ceiling <= density {
                return Ok((
                    FinalStateKinematics {
                        inelasticity: candidate,
                    },
                    density / norm,
                ));
            }
        }
        Err(InjectError::Domain(
            ErrorInfo::new(
                "rejection-exhausted",
                "final-state rejection sampling exhausted its trial budget",
            )
            .with_context("energy", format!("{energy}"))
            .with_context("trials", MAX_REJECTION_TRIALS.to_string())
            .with_hint("the differential table is probably spiked or mismatched to this channel"),
        ))
    }
}
