//! The terminal event record emitted by the injector.

use serde::{Deserialize, Serialize};

use crate::particle::InteractionChannel;

/// Final-state kinematic variables drawn for one interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalStateKinematics {
    /// Fraction of the primary energy transferred to the hadronic system.
    pub inelasticity: f64,
}

/// One generated interaction event.
///
/// Events are immutable once emitted; ownership transfers to the output
/// sink. `one_weight` is the importance-sampling correction: multiplying any
/// per-event observable by it and summing over all events gives an unbiased
/// estimator of the rate-weighted integral under the physical distribution,
/// whatever sampling distributions were used to draw the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Channel the event was injected through.
    pub channel: InteractionChannel,
    /// Primary neutrino energy.
    pub energy: f64,
    /// Zenith angle of the primary direction, radians from straight down.
    pub zenith: f64,
    /// Azimuth angle of the primary direction, radians.
    pub azimuth: f64,
    /// Interaction vertex position, metres.
    pub vertex: [f64; 3],
    /// Sampled final-state kinematics.
    pub kinematics: FinalStateKinematics,
    /// Importance-sampling weight.
    pub one_weight: f64,
}
