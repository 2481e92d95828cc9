//! Power-law primary-energy sampling.

use nuject_core::{ErrorInfo, InjectError, RngHandle};

/// Spectral indices closer to 1 than this are treated as the log-uniform
/// special case; the general inverse-CDF form divides by `1 - gamma`.
const LOG_UNIFORM_TOLERANCE: f64 = 1e-9;

/// Draws primary energies from `E^-gamma` over a bounded range and reports
/// the normalized sampling density alongside each draw.
///
/// The sampler is a pure function of the random stream: identical stream
/// state yields identical draws.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumSampler {
    min_energy: f64,
    max_energy: f64,
    spectral_index: f64,
}

impl SpectrumSampler {
    /// Builds a sampler over `[min_energy, max_energy]` with the given
    /// spectral index. Bounds must satisfy `0 < min < max`.
    pub fn new(min_energy: f64, max_energy: f64, spectral_index: f64) -> Result<Self, InjectError> {
        if !(min_energy.is_finite() && max_energy.is_finite() && spectral_index.is_finite())
            || min_energy <= 0.0
            || min_energy >= max_energy
        {
            return Err(InjectError::Configuration(
                ErrorInfo::new(
                    "spectrum-bounds",
                    "energy bounds must satisfy 0 < min < max with a finite spectral index",
                )
                .with_context("min_energy", format!("{min_energy}"))
                .with_context("max_energy", format!("{max_energy}"))
                .with_context("spectral_index", format!("{spectral_index}")),
            ));
        }
        Ok(Self {
            min_energy,
            max_energy,
            spectral_index,
        })
    }

    /// Lower energy bound.
    pub fn min_energy(&self) -> f64 {
        self.min_energy
    }

    /// Upper energy bound.
    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    fn is_log_uniform(&self) -> bool {
        (self.spectral_index - 1.0).abs() < LOG_UNIFORM_TOLERANCE
    }

    /// Draws one energy and returns it with its sampling density.
    ///
    /// Energies outside `[min, max]` are never produced: the inverse CDF maps
    /// the unit interval onto the bounds, and the result is clamped against
    /// floating-point overshoot at the edges.
    pub fn sample(&self, rng: &mut RngHandle) -> (f64, f64) {
        let draw = rng.uniform();
        let energy = if self.is_log_uniform() {
            // E = a * (b/a)^u
            self.min_energy * (self.max_energy / self.min_energy).powf(draw)
        } else {
            let power = 1.0 - self.spectral_index;
            let low = self.min_energy.powf(power);
            let high = self.max_energy.powf(power);
            (low + draw * (high - low)).powf(1.0 / power)
        };
        let energy = energy.clamp(self.min_energy, self.max_energy);
        (energy, self.density(energy))
    }

    /// Normalized sampling density at `energy`.
    pub fn density(&self, energy: f64) -> f64 {
        if self.is_log_uniform() {
            1.0 / (energy * (self.max_energy / self.min_energy).ln())
        } else {
            let power = 1.0 - self.spectral_index;
            power * energy.powf(-self.spectral_index)
                / (self.max_energy.powf(power) - self.min_energy.powf(power))
        }
    }

    /// Analytic CDF of the sampling distribution, used by distribution tests.
    pub fn cdf(&self, energy: f64) -> f64 {
        if self.is_log_uniform() {
            (energy / self.min_energy).ln() / (self.max_energy / self.min_energy).ln()
        } else {
            let power = 1.0 - self.spectral_index;
            (energy.powf(power) - self.min_energy.powf(power))
                / (self.max_energy.powf(power) - self.min_energy.powf(power))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = SpectrumSampler::new(100.0, 10.0, 2.0).unwrap_err();
        assert_eq!(err.info().code, "spectrum-bounds");
        let err = SpectrumSampler::new(0.0, 10.0, 2.0).unwrap_err();
        assert!(matches!(err, InjectError::Configuration(_)));
    }

    #[test]
    fn samples_stay_inside_bounds() {
        let sampler = SpectrumSampler::new(1000.0, 100_000.0, 2.0).unwrap();
        let mut rng = RngHandle::from_seed(17);
        for _ in 0..10_000 {
            let (energy, density) = sampler.sample(&mut rng);
            assert!((1000.0..=100_000.0).contains(&energy));
            assert!(density > 0.0);
        }
    }

    #[test]
    fn power_law_matches_analytic_cdf() {
        let sampler = SpectrumSampler::new(1000.0, 100_000.0, 2.0).unwrap();
        let mut rng = RngHandle::from_seed(29);
        let draws = 50_000;
        let mut energies: Vec<f64> = (0..draws).map(|_| sampler.sample(&mut rng).0).collect();
        energies.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // Kolmogorov–Smirnov style bound on the empirical CDF deviation.
        let mut worst = 0.0_f64;
        for (rank, energy) in energies.iter().enumerate() {
            let empirical = (rank + 1) as f64 / draws as f64;
            worst = worst.max((empirical - sampler.cdf(*energy)).abs());
        }
        // 1.63 / sqrt(n) is the 1% critical value; stay under it comfortably.
        assert!(worst < 1.63 / (draws as f64).sqrt(), "ks = {worst}");
    }

    #[test]
    fn flat_index_gives_uniform_density() {
        let sampler = SpectrumSampler::new(10.0, 110.0, 0.0).unwrap();
        // gamma = 0 falls out of the general form as 1 / (max - min).
        assert!((sampler.density(10.0) - 0.01).abs() < 1e-15);
        assert!((sampler.density(110.0) - 0.01).abs() < 1e-15);
    }

    #[test]
    fn unit_index_branches_to_log_uniform() {
        let sampler = SpectrumSampler::new(10.0, 1000.0, 1.0).unwrap();
        let expected = 1.0 / (50.0 * (100.0_f64).ln());
        assert!((sampler.density(50.0) - expected).abs() < 1e-15);

        let mut rng = RngHandle::from_seed(7);
        for _ in 0..5000 {
            let (energy, _) = sampler.sample(&mut rng);
            assert!((10.0..=1000.0).contains(&energy));
        }
    }

    #[test]
    fn density_integrates_to_one() {
        for index in [0.0, 0.5, 1.0, 2.0, 3.7, -1.2] {
            let sampler = SpectrumSampler::new(5.0, 500.0, index).unwrap();
            let steps = 20_000;
            let width = (500.0 - 5.0) / steps as f64;
            let mut integral = 0.0;
            for step in 0..steps {
                let energy = 5.0 + (step as f64 + 0.5) * width;
                integral += sampler.density(energy) * width;
            }
            assert!((integral - 1.0).abs() < 1e-3, "index {index}: {integral}");
        }
    }

    #[test]
    fn boundary_energies_have_finite_density() {
        let sampler = SpectrumSampler::new(1000.0, 100_000.0, 2.0).unwrap();
        assert!(sampler.density(1000.0).is_finite());
        assert!(sampler.density(100_000.0).is_finite());
    }
}
