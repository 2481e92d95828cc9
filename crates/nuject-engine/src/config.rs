//! YAML-configurable run parameters and cross-field validation.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use nuject_core::{ErrorInfo, InjectError, InteractionChannel, ParticleType};
use serde::{Deserialize, Serialize};

use crate::acceptance::AngularAcceptance;
use crate::geometry::GeometryModel;
use crate::spectrum::SpectrumSampler;

/// Full description of one injection run.
///
/// Validated as a whole when the controller is constructed and never mutated
/// during generation. Angles are radians; degrees-to-radians conversion is
/// the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Final-state pair selecting the interaction channel.
    pub channel: ChannelConfig,
    /// Number of events to generate.
    pub events: usize,
    /// Primary-energy spectrum parameters.
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    /// Angular acceptance bounds.
    #[serde(default)]
    pub acceptance: AcceptanceConfig,
    /// Injection-geometry policy and overrides.
    #[serde(default)]
    pub mode: InjectionMode,
    /// Cross-section table reference.
    pub table: TableConfig,
    /// Global normalization constant folded into every weight
    /// (target number density times any external flux normalization).
    #[serde(default = "default_normalization")]
    pub normalization: f64,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Generation workers; 1 runs sequentially.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_normalization() -> f64 {
    1.0
}

fn default_workers() -> usize {
    1
}

/// Final-state particle pair for the run's channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// First final-state particle (the lepton side).
    pub final_type_1: ParticleType,
    /// Second final-state particle (the hadronic side).
    pub final_type_2: ParticleType,
}

/// Power-law spectrum parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectrumConfig {
    /// Lower energy bound.
    #[serde(default = "default_min_energy")]
    pub min_energy: f64,
    /// Upper energy bound.
    #[serde(default = "default_max_energy")]
    pub max_energy: f64,
    /// Spectral index gamma of `E^-gamma`.
    #[serde(default = "default_spectral_index")]
    pub spectral_index: f64,
}

fn default_min_energy() -> f64 {
    1.0e3
}

fn default_max_energy() -> f64 {
    1.0e5
}

fn default_spectral_index() -> f64 {
    2.0
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            min_energy: default_min_energy(),
            max_energy: default_max_energy(),
            spectral_index: default_spectral_index(),
        }
    }
}

/// Angular bounds, radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AcceptanceConfig {
    /// Minimum zenith.
    #[serde(default)]
    pub min_zenith: f64,
    /// Maximum zenith.
    #[serde(default = "default_max_zenith")]
    pub max_zenith: f64,
    /// Minimum azimuth.
    #[serde(default)]
    pub min_azimuth: f64,
    /// Maximum azimuth.
    #[serde(default = "default_max_azimuth")]
    pub max_azimuth: f64,
}

fn default_max_zenith() -> f64 {
    PI
}

fn default_max_azimuth() -> f64 {
    2.0 * PI
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            min_zenith: 0.0,
            max_zenith: default_max_zenith(),
            min_azimuth: 0.0,
            max_azimuth: default_max_azimuth(),
        }
    }
}

/// Injection-geometry selector with per-mode overrides, metres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InjectionMode {
    /// Per-event range-scaled cylinder.
    Ranged {
        /// Disk radius of the injection face.
        #[serde(default = "default_extent")]
        injection_radius: f64,
        /// Padding on either end of the range-scaled column.
        #[serde(default = "default_extent")]
        endcap_length: f64,
    },
    /// Fixed cylinder for the whole run.
    Volume {
        /// Cylinder radius.
        #[serde(default = "default_extent")]
        cylinder_radius: f64,
        /// Full cylinder height.
        #[serde(default = "default_extent")]
        cylinder_height: f64,
    },
}

fn default_extent() -> f64 {
    1200.0
}

impl Default for InjectionMode {
    fn default() -> Self {
        InjectionMode::Ranged {
            injection_radius: default_extent(),
            endcap_length: default_extent(),
        }
    }
}

/// Cross-section table reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Path to the JSON cross-section table.
    pub path: PathBuf,
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests when deriving substream seeds.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    100
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl RunConfig {
    /// Loads a run configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, InjectError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            InjectError::Io(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_yaml::from_str(&text).map_err(|err| {
            InjectError::Configuration(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Infers the interaction channel from the configured final state.
    pub fn build_channel(&self) -> Result<InteractionChannel, InjectError> {
        InteractionChannel::from_final_state(self.channel.final_type_1, self.channel.final_type_2)
    }

    /// Builds the validated spectrum sampler.
    pub fn build_spectrum(&self) -> Result<SpectrumSampler, InjectError> {
        SpectrumSampler::new(
            self.spectrum.min_energy,
            self.spectrum.max_energy,
            self.spectrum.spectral_index,
        )
    }

    /// Builds the validated angular acceptance.
    pub fn build_acceptance(&self) -> Result<AngularAcceptance, InjectError> {
        AngularAcceptance::new(
            self.acceptance.min_zenith,
            self.acceptance.max_zenith,
            self.acceptance.min_azimuth,
            self.acceptance.max_azimuth,
        )
    }

    /// Builds the validated geometry model.
    pub fn build_geometry(&self) -> Result<GeometryModel, InjectError> {
        match self.mode {
            InjectionMode::Ranged {
                injection_radius,
                endcap_length,
            } => GeometryModel::ranged_mode(injection_radius, endcap_length),
            InjectionMode::Volume {
                cylinder_radius,
                cylinder_height,
            } => GeometryModel::volume_mode(cylinder_radius, cylinder_height),
        }
    }

    /// Cross-field validation of everything except the table contents.
    ///
    /// The engine never substitutes defaults for invalid values; any
    /// violation is reported here and the run refuses to configure.
    pub fn validate(&self) -> Result<(), InjectError> {
        self.build_channel()?;
        self.build_spectrum()?;
        self.build_acceptance()?;
        self.build_geometry()?;
        if !self.normalization.is_finite() || self.normalization <= 0.0 {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "normalization-invalid",
                    "normalization constant must be positive and finite",
                )
                .with_context("normalization", format!("{}", self.normalization)),
            ));
        }
        if self.workers == 0 {
            return Err(InjectError::Configuration(ErrorInfo::new(
                "workers-zero",
                "at least one generation worker is required",
            )));
        }
        Ok(())
    }
}
