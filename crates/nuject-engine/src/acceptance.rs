//! Angular acceptance box and solid-angle-uniform direction sampling.

use std::f64::consts::PI;

use nuject_core::{ErrorInfo, InjectError, RngHandle};

/// Angular bounds for injected directions, radians, zenith measured from the
/// reference axis (+z).
///
/// Directions are drawn uniform in cos(zenith) over the zenith band and
/// uniform in azimuth, i.e. uniform per unit solid angle restricted to the
/// box; the joint density is `1 / solid_angle`.
#[derive(Debug, Clone, Copy)]
pub struct AngularAcceptance {
    min_zenith: f64,
    max_zenith: f64,
    min_azimuth: f64,
    max_azimuth: f64,
}

impl AngularAcceptance {
    /// Validates and builds the acceptance box.
    ///
    /// Zenith bounds must satisfy `0 <= min <= max <= pi`, azimuth bounds
    /// `0 <= min <= max <= 2 pi`, and the box must enclose a non-zero solid
    /// angle.
    pub fn new(
        min_zenith: f64,
        max_zenith: f64,
        min_azimuth: f64,
        max_azimuth: f64,
    ) -> Result<Self, InjectError> {
        let ordered = (0.0..=PI).contains(&min_zenith)
            && (0.0..=PI).contains(&max_zenith)
            && min_zenith <= max_zenith
            && (0.0..=2.0 * PI).contains(&min_azimuth)
            && (0.0..=2.0 * PI).contains(&max_azimuth)
            && min_azimuth <= max_azimuth;
        if !ordered {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "acceptance-bounds",
                    "angular bounds must be ordered and inside [0, pi] x [0, 2 pi]",
                )
                .with_context("min_zenith", format!("{min_zenith}"))
                .with_context("max_zenith", format!("{max_zenith}"))
                .with_context("min_azimuth", format!("{min_azimuth}"))
                .with_context("max_azimuth", format!("{max_azimuth}")),
            ));
        }
        let acceptance = Self {
            min_zenith,
            max_zenith,
            min_azimuth,
            max_azimuth,
        };
        if acceptance.solid_angle() <= 0.0 {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "acceptance-measure",
                    "angular bounds describe a zero-measure region",
                )
                .with_hint("widen the zenith or azimuth band"),
            ));
        }
        Ok(acceptance)
    }

    /// Lower zenith bound.
    pub fn min_zenith(&self) -> f64 {
        self.min_zenith
    }

    /// Upper zenith bound.
    pub fn max_zenith(&self) -> f64 {
        self.max_zenith
    }

    /// Solid angle enclosed by the box, steradians.
    pub fn solid_angle(&self) -> f64 {
        (self.min_zenith.cos() - self.max_zenith.cos()) * (self.max_azimuth - self.min_azimuth)
    }

    /// Draws a direction, returning `(zenith, azimuth, density)` where the
    /// density is per unit solid angle.
    pub fn sample_direction(&self, rng: &mut RngHandle) -> (f64, f64, f64) {
        // cos is decreasing in zenith, so the cosine band is
        // [cos(max_zenith), cos(min_zenith)].
        let cosine = rng.uniform_in(self.max_zenith.cos(), self.min_zenith.cos());
        let zenith = cosine.clamp(-1.0, 1.0).acos();
        let azimuth = rng.uniform_in(self.min_azimuth, self.max_azimuth);
        (zenith, azimuth, 1.0 / self.solid_angle())
    }
}

/// Unit vector for the given zenith/azimuth pair.
pub fn direction_cosines(zenith: f64, azimuth: f64) -> [f64; 3] {
    let sin_zenith = zenith.sin();
    [
        sin_zenith * azimuth.cos(),
        sin_zenith * azimuth.sin(),
        zenith.cos(),
    ]
}
