use rand::RngCore;
use rand_distr::{Distribution, StandardNormal, Uniform};
use std::f64::consts::PI;

/// Number of weeks in one seasonal cycle of the generated series
pub const WEEKS_PER_YEAR: usize = 52;

/// Generates a weekly series from an explicit random number generator, so
/// the same generator state always yields the same series.
pub trait StochasticProcess: Send + Sync {
    fn generate(&self, num_weeks: usize, rng: &mut dyn RngCore) -> Vec<f64>;
}

/// Replays a known series, such as a historical record
#[derive(Debug, Clone)]
pub struct Deterministic {
    values: Vec<f64>,
}

impl Deterministic {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl StochasticProcess for Deterministic {
    fn generate(&self, num_weeks: usize, _rng: &mut dyn RngCore) -> Vec<f64> {
        self.values.iter().copied().take(num_weeks).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl StochasticProcess for Constant {
    fn generate(&self, num_weeks: usize, _rng: &mut dyn RngCore) -> Vec<f64> {
        vec![self.value; num_weeks]
    }
}

/// Independent samples of a uniform distribution in `[low, high)`
#[derive(Debug, Clone)]
pub struct UniformProcess {
    distribution: Uniform<f64>,
}

impl UniformProcess {
    pub fn new(low: f64, high: f64) -> Result<Self, String> {
        let distribution = Uniform::new(low, high).map_err(|e| e.to_string())?;
        Ok(Self { distribution })
    }
}

impl StochasticProcess for UniformProcess {
    fn generate(&self, num_weeks: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..num_weeks).map(|_| self.distribution.sample(rng)).collect()
    }
}

/// Log-normally distributed streamflow whose log-mean follows a yearly
/// sinusoid:
/// `ln q = z * log_sigma + log_mu * (1 + a * sin(2 pi (t mod 52) / 52))`
#[derive(Debug, Clone, Copy)]
pub struct SeasonalLogNormal {
    sin_amplitude: f64,
    log_mu: f64,
    log_sigma: f64,
}

impl SeasonalLogNormal {
    pub fn new(
        sin_amplitude: f64,
        log_mu: f64,
        log_sigma: f64,
    ) -> Result<Self, String> {
        if !(log_sigma.is_finite() && log_sigma >= 0.0) {
            return Err(format!(
                "log_sigma must be finite and non-negative, found {log_sigma}"
            ));
        }
        if !(sin_amplitude.is_finite() && log_mu.is_finite()) {
            return Err("sin_amplitude and log_mu must be finite".to_string());
        }
        Ok(Self {
            sin_amplitude,
            log_mu,
            log_sigma,
        })
    }

    /// Mean of the log-flow at a given week
    pub fn seasonal_log_mu(&self, week: usize) -> f64 {
        let phase = 2.0 * PI / WEEKS_PER_YEAR as f64
            * (week % WEEKS_PER_YEAR) as f64;
        self.log_mu * (1.0 + self.sin_amplitude * phase.sin())
    }
}

impl StochasticProcess for SeasonalLogNormal {
    fn generate(&self, num_weeks: usize, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..num_weeks)
            .map(|week| {
                let z: f64 = StandardNormal.sample(rng);
                (z * self.log_sigma + self.seasonal_log_mu(week)).exp()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_deterministic_replays_values() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let process = Deterministic::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(process.generate(3, &mut rng), vec![1.0, 2.0, 3.0]);
        assert_eq!(process.generate(2, &mut rng), vec![1.0, 2.0]);
    }

    #[test]
    fn test_constant_process() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let process = Constant::new(0.05);
        assert_eq!(process.generate(4, &mut rng), vec![0.05; 4]);
    }

    #[test]
    fn test_uniform_process_within_bounds() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let process = UniformProcess::new(0.0, 25.0).unwrap();
        let values = process.generate(1000, &mut rng);
        assert_eq!(values.len(), 1000);
        assert!(values.iter().all(|v| (0.0..25.0).contains(v)));
    }

    #[test]
    fn test_uniform_process_invalid_bounds() {
        assert!(UniformProcess::new(1.0, 0.0).is_err());
    }

    #[test]
    fn test_seasonal_log_mu() {
        let process = SeasonalLogNormal::new(1.0, 2.0, 0.5).unwrap();
        assert_eq!(process.seasonal_log_mu(0), 2.0);
        assert_eq!(process.seasonal_log_mu(52), 2.0);
        assert!((process.seasonal_log_mu(13) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_seasonal_lognormal_invalid_sigma() {
        assert!(SeasonalLogNormal::new(1.0, 2.0, -0.5).is_err());
    }

    #[test]
    fn test_seasonal_lognormal_is_reproducible() {
        let process = SeasonalLogNormal::new(1.0, 2.1, 1.8).unwrap();
        let a = process.generate(100, &mut Xoshiro256Plus::seed_from_u64(42));
        let b = process.generate(100, &mut Xoshiro256Plus::seed_from_u64(42));
        let c = process.generate(100, &mut Xoshiro256Plus::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|q| *q > 0.0));
    }

    #[test]
    fn test_seasonal_lognormal_whitened_log_mean() {
        let num_weeks = 100_000;
        let (log_mu, log_sigma) = (7.8, 0.5);
        let process = SeasonalLogNormal::new(1.0, log_mu, log_sigma).unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let flows = process.generate(num_weeks, &mut rng);

        let whitened: Vec<f64> = flows
            .iter()
            .enumerate()
            .map(|(week, q)| {
                (q.ln() - process.seasonal_log_mu(week)) / log_sigma
            })
            .collect();
        let mean = crate::utils::mean(&whitened);
        let variance = whitened.iter().map(|w| (w - mean).powi(2)).sum::<f64>()
            / num_weeks as f64;
        assert!(mean.abs() < 0.05, "whitened mean {mean}");
        assert!((variance - 1.0).abs() < 0.05, "whitened variance {variance}");
    }
}
