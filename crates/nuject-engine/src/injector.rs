//! Single-event generation: direction, energy, vertex, kinematics, weight.

use nuject_core::{ErrorInfo, Event, InjectError, InteractionChannel, RngHandle};

use crate::acceptance::{direction_cosines, AngularAcceptance};
use crate::geometry::GeometryModel;
use crate::kinematics::KinematicsSampler;
use crate::spectrum::SpectrumSampler;

/// Attempts allowed per event before transient domain misses are treated as
/// a structural table/configuration mismatch and escalated run-fatal.
const MAX_EVENT_ATTEMPTS: usize = 100;

/// Orchestrates one event's generation and computes its combined weight.
///
/// All state is read-only during generation; a single injector is shared
/// across workers, each of which drives it with a private random stream.
#[derive(Debug, Clone)]
pub struct Injector {
    channel: InteractionChannel,
    spectrum: SpectrumSampler,
    acceptance: AngularAcceptance,
    geometry: GeometryModel,
    kinematics: KinematicsSampler,
    normalization: f64,
}

impl Injector {
    /// Assembles an injector from validated components.
    pub fn new(
        channel: InteractionChannel,
        spectrum: SpectrumSampler,
        acceptance: AngularAcceptance,
        geometry: GeometryModel,
        kinematics: KinematicsSampler,
        normalization: f64,
    ) -> Self {
        Self {
            channel,
            spectrum,
            acceptance,
            geometry,
            kinematics,
            normalization,
        }
    }

    /// The channel this injector produces.
    pub fn channel(&self) -> InteractionChannel {
        self.channel
    }

    /// The geometry policy in effect.
    pub fn geometry(&self) -> &GeometryModel {
        &self.geometry
    }

    /// Generates one event, retrying transient domain misses up to a bounded
    /// cap. Returns the event together with the number of retries spent.
    ///
    /// Configuration and I/O errors are never retried; exhausting the retry
    /// budget escalates the last domain error, which the controller treats
    /// as run-fatal.
    pub fn generate(&self, rng: &mut RngHandle) -> Result<(Event, usize), InjectError> {
        let mut last_miss = None;
        for attempt in 0..MAX_EVENT_ATTEMPTS {
            match self.attempt(rng) {
                Ok(event) => return Ok((event, attempt)),
                Err(err) if err.is_retryable() => last_miss = Some(err),
                Err(err) => return Err(err),
            }
        }
        match last_miss {
            Some(miss) => Err(miss
                .with_context("attempts", MAX_EVENT_ATTEMPTS.to_string())
                .with_context("escalation", "event retry budget exhausted")),
            None => Err(InjectError::Domain(ErrorInfo::new(
                "attempts-exhausted",
                "event sampling made no progress within its attempt cap",
            ))),
        }
    }

    /// One full sampling pass; any failure aborts this attempt only.
    fn attempt(&self, rng: &mut RngHandle) -> Result<Event, InjectError> {
        let (zenith, azimuth, angular_density) = self.acceptance.sample_direction(rng);
        let (energy, energy_density) = self.spectrum.sample(rng);
        let volume = self.geometry.injection_volume(energy)?;
        let direction = direction_cosines(zenith, azimuth);
        let (vertex, vertex_density) = volume.sample_vertex(rng, direction);
        let (kinematics, kinematics_density) = self.kinematics.sample(energy, rng)?;
        let sigma = self.kinematics.total_cross_section(energy)?;

        let one_weight = sigma
            / (energy_density
                * angular_density
                * vertex_density
                * kinematics_density
                * self.normalization);
        if !one_weight.is_finite() || one_weight < 0.0 {
            return Err(InjectError::Domain(
                ErrorInfo::new("weight-invalid", "event weight is not finite")
                    .with_context("energy", format!("{energy}"))
                    .with_context("one_weight", format!("{one_weight}")),
            ));
        }

        Ok(Event {
            channel: self.channel,
            energy,
            zenith,
            azimuth,
            vertex,
            kinematics,
            one_weight,
        })
    }
}
