#![deny(missing_docs)]
#![doc = "Core types, error taxonomy and deterministic RNG for the nuject event-injection engine."]

pub mod errors;
pub mod event;
pub mod particle;
pub mod rng;

pub use errors::{ErrorInfo, InjectError};
pub use event::{Event, FinalStateKinematics};
pub use particle::{CurrentType, InteractionChannel, ParticleType};
pub use rng::{derive_substream_seed, RngHandle};

/// Capability seam for final-state physics: anything that can report a total
/// cross section and draw normalized final-state kinematics at a given
/// primary energy can drive the injector. The tabulated cross-section
/// provider is the canonical implementation; alternative channel physics
/// plugs in here without touching injector logic.
pub trait FinalStateSampler: Send + Sync {
    /// Total cross section at the given energy.
    fn total_cross_section(&self, energy: f64) -> Result<f64, InjectError>;

    /// Draws final-state kinematics from the normalized differential
    /// distribution at the given energy, returning the drawn value together
    /// with its sampling density (needed later for weight computation).
    fn sample_final_state(
        &self,
        energy: f64,
        rng: &mut RngHandle,
    ) -> Result<(FinalStateKinematics, f64), InjectError>;
}
