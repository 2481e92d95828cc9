//! Injection-volume geometry for ranged and volume mode.

use std::f64::consts::PI;

use nuject_core::{ErrorInfo, InjectError, RngHandle};

/// Continuous-slowing-down muon energy loss in water, `dE/dx = a + b E`.
/// Energies in GeV, depths in metres water-equivalent.
const MUON_LOSS_IONIZATION: f64 = 0.212;
const MUON_LOSS_RADIATIVE: f64 = 3.34e-4;

/// Approximate range of the secondary charged lepton at `energy`, metres
/// water-equivalent. Monotone increasing in energy, which is the only
/// property event weights rely on; the constants steer efficiency alone.
pub fn secondary_range(energy: f64) -> f64 {
    (1.0 + energy * MUON_LOSS_RADIATIVE / MUON_LOSS_IONIZATION).ln() / MUON_LOSS_RADIATIVE
}

/// A direction-aligned cylinder in which one event's vertex is placed.
///
/// The cylinder is centred on the coordinate origin with its axis along the
/// incoming direction. In volume mode the same cylinder serves the whole
/// run; in ranged mode a fresh one is derived per event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectionVolume {
    radius: f64,
    length: f64,
}

impl InjectionVolume {
    fn new(radius: f64, length: f64) -> Result<Self, InjectError> {
        if !(radius.is_finite() && length.is_finite()) || radius <= 0.0 || length <= 0.0 {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "geometry-extent",
                    "injection cylinder radius and length must be positive",
                )
                .with_context("radius", format!("{radius}"))
                .with_context("length", format!("{length}")),
            ));
        }
        Ok(Self { radius, length })
    }

    /// Cylinder radius, metres.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Full cylinder length along the injection axis, metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Enclosed volume, cubic metres.
    pub fn volume(&self) -> f64 {
        PI * self.radius * self.radius * self.length
    }

    /// Draws a vertex uniformly inside the cylinder aligned with
    /// `direction`, returning the position and the sampling density
    /// (`1 / volume` for a uniform draw).
    pub fn sample_vertex(&self, rng: &mut RngHandle, direction: [f64; 3]) -> ([f64; 3], f64) {
        let (u, v) = perpendicular_basis(direction);
        // Uniform over the disk: radius scales with sqrt of the draw.
        let disk_radius = self.radius * rng.uniform().sqrt();
        let disk_angle = rng.uniform_in(0.0, 2.0 * PI);
        let along = rng.uniform_in(-0.5 * self.length, 0.5 * self.length);
        let across_u = disk_radius * disk_angle.cos();
        let across_v = disk_radius * disk_angle.sin();
        let position = [
            u[0] * across_u + v[0] * across_v + direction[0] * along,
            u[1] * across_u + v[1] * across_v + direction[1] * along,
            u[2] * across_u + v[2] * across_v + direction[2] * along,
        ];
        (position, 1.0 / self.volume())
    }
}

/// Injection-geometry policy for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryModel {
    /// Fixed cylinder used for every event.
    Volume {
        /// Configured cylinder.
        cylinder: InjectionVolume,
    },
    /// Per-event cylinder whose length tracks the secondary-particle range
    /// at the sampled energy, so samples are not wasted on vertices the
    /// secondary could never reach the detector from. The weight correction
    /// accounts for the varying volume, so physics stays unbiased.
    Ranged {
        /// Disk radius of the injection face, metres.
        injection_radius: f64,
        /// Padding added on either end of the range-scaled column, metres.
        endcap_length: f64,
    },
}

impl GeometryModel {
    /// Fixed-cylinder volume mode.
    pub fn volume_mode(cylinder_radius: f64, cylinder_height: f64) -> Result<Self, InjectError> {
        Ok(GeometryModel::Volume {
            cylinder: InjectionVolume::new(cylinder_radius, cylinder_height)?,
        })
    }

    /// Range-scaled ranged mode.
    pub fn ranged_mode(injection_radius: f64, endcap_length: f64) -> Result<Self, InjectError> {
        // Validate eagerly so misconfiguration surfaces before the run.
        InjectionVolume::new(injection_radius, 2.0 * endcap_length)?;
        Ok(GeometryModel::Ranged {
            injection_radius,
            endcap_length,
        })
    }

    /// Resolves the injection volume for one event at `energy`.
    pub fn injection_volume(&self, energy: f64) -> Result<InjectionVolume, InjectError> {
        match self {
            GeometryModel::Volume { cylinder } => Ok(*cylinder),
            GeometryModel::Ranged {
                injection_radius,
                endcap_length,
            } => InjectionVolume::new(
                *injection_radius,
                2.0 * endcap_length + secondary_range(energy),
            ),
        }
    }
}

/// Two unit vectors spanning the plane perpendicular to `axis`.
fn perpendicular_basis(axis: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    // Pick the coordinate axis least aligned with the direction to avoid a
    // degenerate cross product.
    let helper = if axis[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let mut u = [
        axis[1] * helper[2] - axis[2] * helper[1],
        axis[2] * helper[0] - axis[0] * helper[2],
        axis[0] * helper[1] - axis[1] * helper[0],
    ];
    let norm = (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]).sqrt();
    u = [u[0] / norm, u[1] / norm, u[2] / norm];
    let v = [
        axis[1] * u[2] - axis[2] * u[1],
        axis[2] * u[0] - axis[0] * u[2],
        axis[0] * u[1] - axis[1] * u[0],
    ];
    (u, v)
}
