//! Final-state kinematics drawing, behind the substitution seam.

use std::sync::Arc;

use nuject_core::{FinalStateKinematics, FinalStateSampler, InjectError, RngHandle};

/// Thin composition wrapper over a shared [`FinalStateSampler`].
///
/// Exists so alternative channel physics can replace the tabulated provider
/// without touching injector logic; the injector only ever talks to this
/// type.
#[derive(Clone)]
pub struct KinematicsSampler {
    sampler: Arc<dyn FinalStateSampler>,
}

impl KinematicsSampler {
    /// Wraps a shared final-state sampler.
    pub fn new(sampler: Arc<dyn FinalStateSampler>) -> Self {
        Self { sampler }
    }

    /// Draws final-state kinematics at `energy` together with the sampling
    /// density needed for weighting.
    pub fn sample(
        &self,
        energy: f64,
        rng: &mut RngHandle,
    ) -> Result<(FinalStateKinematics, f64), InjectError> {
        self.sampler.sample_final_state(energy, rng)
    }

    /// Total cross section at `energy`.
    pub fn total_cross_section(&self, energy: f64) -> Result<f64, InjectError> {
        self.sampler.total_cross_section(energy)
    }
}

impl std::fmt::Debug for KinematicsSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinematicsSampler").finish_non_exhaustive()
    }
}
