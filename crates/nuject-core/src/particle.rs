//! Particle categories and interaction-channel inference.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, InjectError};

/// Final- and initial-state particle categories known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticleType {
    /// Electron.
    EMinus,
    /// Positron.
    EPlus,
    /// Muon.
    MuMinus,
    /// Anti-muon.
    MuPlus,
    /// Tau lepton.
    TauMinus,
    /// Anti-tau lepton.
    TauPlus,
    /// Electron neutrino.
    NuE,
    /// Electron antineutrino.
    NuEBar,
    /// Muon neutrino.
    NuMu,
    /// Muon antineutrino.
    NuMuBar,
    /// Tau neutrino.
    NuTau,
    /// Tau antineutrino.
    NuTauBar,
    /// Hadronic shower pseudo-particle.
    Hadrons,
}

impl ParticleType {
    /// Whether this is a charged lepton (any flavor, either sign).
    pub fn is_charged_lepton(&self) -> bool {
        matches!(
            self,
            ParticleType::EMinus
                | ParticleType::EPlus
                | ParticleType::MuMinus
                | ParticleType::MuPlus
                | ParticleType::TauMinus
                | ParticleType::TauPlus
        )
    }

    /// Whether this is a neutrino or antineutrino.
    pub fn is_neutrino(&self) -> bool {
        matches!(
            self,
            ParticleType::NuE
                | ParticleType::NuEBar
                | ParticleType::NuMu
                | ParticleType::NuMuBar
                | ParticleType::NuTau
                | ParticleType::NuTauBar
        )
    }

    /// The neutrino that produces this charged lepton in a charged-current
    /// interaction. `None` for anything that is not a charged lepton.
    pub fn cc_parent_neutrino(&self) -> Option<ParticleType> {
        match self {
            ParticleType::EMinus => Some(ParticleType::NuE),
            ParticleType::EPlus => Some(ParticleType::NuEBar),
            ParticleType::MuMinus => Some(ParticleType::NuMu),
            ParticleType::MuPlus => Some(ParticleType::NuMuBar),
            ParticleType::TauMinus => Some(ParticleType::NuTau),
            ParticleType::TauPlus => Some(ParticleType::NuTauBar),
            _ => None,
        }
    }
}

/// Interaction current implied by a final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrentType {
    /// Charged-current deep inelastic scattering.
    Charged,
    /// Neutral-current deep inelastic scattering.
    Neutral,
}

/// The interaction channel a run injects: the two final-state categories,
/// the inferred initial neutrino, and the current type.
///
/// Immutable once constructed; runs never mutate their channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionChannel {
    /// First final-state particle (the lepton side).
    pub final_type_1: ParticleType,
    /// Second final-state particle (the hadronic side).
    pub final_type_2: ParticleType,
    /// Initial neutrino type inferred from the final state.
    pub initial_type: ParticleType,
    /// Current type inferred from the final state.
    pub current: CurrentType,
}

impl InteractionChannel {
    /// Infers the channel from its final-state pair.
    ///
    /// A charged lepton plus hadrons is a charged-current event from the
    /// matching (anti)neutrino; a neutrino plus hadrons is a neutral-current
    /// event from that same neutrino. Any other pair is rejected.
    pub fn from_final_state(
        final_type_1: ParticleType,
        final_type_2: ParticleType,
    ) -> Result<Self, InjectError> {
        if final_type_2 != ParticleType::Hadrons {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "channel-final-state",
                    "second final-state particle must be the hadronic shower",
                )
                .with_context("final_type_2", format!("{final_type_2:?}"))
                .with_hint("order the final state as (lepton, hadrons)"),
            ));
        }
        if let Some(initial) = final_type_1.cc_parent_neutrino() {
            return Ok(Self {
                final_type_1,
                final_type_2,
                initial_type: initial,
                current: CurrentType::Charged,
            });
        }
        if final_type_1.is_neutrino() {
            return Ok(Self {
                final_type_1,
                final_type_2,
                initial_type: final_type_1,
                current: CurrentType::Neutral,
            });
        }
        Err(InjectError::Configuration(
            ErrorInfo::new(
                "channel-final-state",
                "first final-state particle must be a charged lepton or a neutrino",
            )
            .with_context("final_type_1", format!("{final_type_1:?}")),
        ))
    }
}
