use crate::error::BetaError;
use serde::Serialize;
use statrs::function::beta::beta_reg;
use statrs::function::gamma::ln_gamma;
use std::fmt;

pub const CURVE_LOWER: f64 = 0.0;
pub const CURVE_UPPER: f64 = 1.0;
pub const CURVE_SAMPLES: usize = 1001;

/// A Beta(a, b) distribution over a Bernoulli success probability.
///
/// The value is immutable: observing data through [`BetaDistribution::update`]
/// returns a new posterior and leaves the prior untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BetaDistribution {
    a: f64,
    b: f64,
}

/// One sample of a normalized density curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl BetaDistribution {
    pub fn new(a: f64, b: f64) -> Result<Self, BetaError> {
        validate_shape("a", a)?;
        validate_shape("b", b)?;
        Ok(Self { a, b })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Posterior after observing `successes` ones and `failures` zeros.
    pub fn update(&self, successes: u64, failures: u64) -> Self {
        Self {
            a: self.a + successes as f64,
            b: self.b + failures as f64,
        }
    }

    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }

    pub fn variance(&self) -> f64 {
        let numerator = self.a * self.b;
        let denominator = (self.a + self.b).powf(2.0) * (self.a + self.b + 1.0);
        numerator / denominator
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn log_beta(&self) -> f64 {
        ln_gamma(self.a) + ln_gamma(self.b) - ln_gamma(self.a + self.b)
    }

    pub fn log_density(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return f64::NEG_INFINITY;
        }
        xlogy(self.a - 1.0, x) + xlogy(self.b - 1.0, 1.0 - x) - self.log_beta()
    }

    /// Probability density at `x`, zero outside [0, 1].
    pub fn density(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        self.log_density(x).exp()
    }

    /// Regularized incomplete beta function, i.e. P(p <= x).
    pub fn cumulative(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        beta_reg(self.a, self.b, x)
    }

    /// Posterior mass on [lower, upper]. A reversed interval is empty.
    pub fn credible_interval(&self, lower: f64, upper: f64) -> f64 {
        if lower > upper {
            return 0.0;
        }
        self.cumulative(upper) - self.cumulative(lower)
    }

    pub fn status_report(&self) -> String {
        format!(
            "Parameters of beta distribution:\n\
             a: {}  b: {}\n\
             mean: {:.6}\n\
             variance: {:.6}\n\
             ---------------------------------\n",
            self.a,
            self.b,
            self.mean(),
            self.variance()
        )
    }

    /// Density sampled on `samples` evenly spaced points of [lower, upper],
    /// scaled so the sampled values sum to one.
    pub fn density_curve(&self, lower: f64, upper: f64, samples: usize) -> Vec<CurvePoint> {
        let xs: Vec<f64> = match samples {
            0 => Vec::new(),
            1 => vec![lower],
            n => {
                let step = (upper - lower) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { upper } else { lower + step * i as f64 })
                    .collect()
            }
        };

        let mut curve: Vec<CurvePoint> = xs
            .into_iter()
            .map(|x| {
                let y = self.density(x);
                CurvePoint {
                    x,
                    y: if y.is_finite() { y } else { 0.0 },
                }
            })
            .collect();

        let total: f64 = curve.iter().map(|p| p.y).sum();
        if total > 0.0 {
            for point in curve.iter_mut() {
                point.y /= total;
            }
        }
        curve
    }

    pub fn default_density_curve(&self) -> Vec<CurvePoint> {
        self.density_curve(CURVE_LOWER, CURVE_UPPER, CURVE_SAMPLES)
    }
}

impl fmt::Display for BetaDistribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Beta({}, {})", self.a, self.b)
    }
}

fn validate_shape(name: &'static str, value: f64) -> Result<(), BetaError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BetaError::InvalidParameter { name, value })
    }
}

// k * ln(y), with 0 * ln(0) taken as 0
fn xlogy(k: f64, y: f64) -> f64 {
    if k == 0.0 { 0.0 } else { k * y.ln() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_new_rejects_non_positive() {
        for (a, b) in vec![(0.0, 1.0), (1.0, 0.0), (-2.0, 2.0), (1.0, f64::NAN), (f64::INFINITY, 1.0)] {
            let result = BetaDistribution::new(a, b);
            assert!(matches!(result, Err(BetaError::InvalidParameter { .. })));
        }
        assert!(BetaDistribution::new(0.5, 3.0).is_ok());
    }

    #[test]
    fn test_mean_and_variance() {
        for (a, b) in vec![(2.0, 2.0), (1.0, 1.0), (0.5, 7.0), (30.0, 4.0)] {
            let model = BetaDistribution::new(a, b).unwrap();
            assert_eq!(model.mean(), a / (a + b));
            let expected = a * b / ((a + b).powf(2.0) * (a + b + 1.0));
            assert_eq!(model.variance(), expected);
            assert!(close(model.standard_deviation(), expected.sqrt(), 1e-15));
        }
    }

    #[test]
    fn test_update_returns_new_model() {
        let prior = BetaDistribution::new(2.0, 2.0).unwrap();
        let posterior = prior.update(3, 1);
        assert_eq!(posterior.a(), 5.0);
        assert_eq!(posterior.b(), 3.0);
        assert_eq!(prior.a(), 2.0);
        assert_eq!(prior.b(), 2.0);
        assert_eq!(prior.update(0, 0), prior);
    }

    #[test]
    fn test_update_order_insensitive() {
        let prior = BetaDistribution::new(1.5, 4.0).unwrap();
        let forward = prior.update(3, 2).update(7, 0);
        let backward = prior.update(7, 0).update(3, 2);
        assert_eq!(forward, backward);
        assert_ne!(prior.update(3, 2), prior.update(7, 0));
    }

    #[test]
    fn test_cumulative_bounds() {
        for (a, b) in vec![(2.0, 2.0), (0.5, 0.5), (100.0, 3.0)] {
            let model = BetaDistribution::new(a, b).unwrap();
            assert_eq!(model.cumulative(0.0), 0.0);
            assert_eq!(model.cumulative(1.0), 1.0);
            assert_eq!(model.cumulative(-0.5), 0.0);
            assert_eq!(model.cumulative(1.5), 1.0);
        }
    }

    #[test]
    fn test_cumulative_known_values() {
        let uniform = BetaDistribution::new(1.0, 1.0).unwrap();
        assert!(close(uniform.cumulative(0.3), 0.3, 1e-12));
        let symmetric = BetaDistribution::new(2.0, 2.0).unwrap();
        assert!(close(symmetric.cumulative(0.5), 0.5, 1e-12));
        // Beta(2, 1) has cdf x^2
        let skewed = BetaDistribution::new(2.0, 1.0).unwrap();
        assert!(close(skewed.cumulative(0.4), 0.16, 1e-12));
    }

    #[test]
    fn test_credible_interval() {
        let model = BetaDistribution::new(5.0, 3.0).unwrap();
        assert_eq!(model.credible_interval(0.8, 0.2), 0.0);
        assert_eq!(model.credible_interval(0.4, 0.4), 0.0);
        assert_eq!(model.credible_interval(0.0, 1.0), 1.0);

        let expected = model.cumulative(0.7) - model.cumulative(0.3);
        assert_eq!(model.credible_interval(0.3, 0.7), expected);
        assert!(expected > 0.0 && expected < 1.0);
    }

    #[test]
    fn test_density_uniform() {
        let uniform = BetaDistribution::new(1.0, 1.0).unwrap();
        for x in vec![0.0, 0.25, 0.5, 1.0] {
            assert!(close(uniform.density(x), 1.0, 1e-12));
        }
        assert_eq!(uniform.density(-0.1), 0.0);
        assert_eq!(uniform.density(1.1), 0.0);
    }

    #[test]
    fn test_density_known_value() {
        // Beta(2, 2) pdf is 6x(1-x)
        let model = BetaDistribution::new(2.0, 2.0).unwrap();
        assert!(close(model.density(0.5), 1.5, 1e-12));
        assert!(close(model.density(0.25), 1.125, 1e-12));
        assert_eq!(model.density(0.0), 0.0);
        assert_eq!(model.density(1.0), 0.0);
    }

    #[test]
    fn test_density_boundary_singularity() {
        let model = BetaDistribution::new(0.5, 0.5).unwrap();
        assert!(model.density(0.0).is_infinite());
        assert!(model.density(1.0).is_infinite());
        assert!(model.density(0.5).is_finite());
    }

    #[test]
    fn test_density_integrates_to_one() {
        let model = BetaDistribution::new(2.0, 3.0).unwrap();
        let n = 10_000;
        let h = 1.0 / n as f64;
        let mut area = 0.0;
        for i in 0..n {
            let x0 = i as f64 * h;
            let x1 = x0 + h;
            area += 0.5 * h * (model.density(x0) + model.density(x1));
        }
        assert!(close(area, 1.0, 1e-6));
    }

    #[test]
    fn test_density_large_parameters_stay_finite() {
        let model = BetaDistribution::new(1.0e4, 2.5e4).unwrap();
        let peak = model.density(model.mean());
        assert!(peak.is_finite());
        assert!(peak > 0.0);
    }

    #[test]
    fn test_density_curve_normalized() {
        let model = BetaDistribution::new(5.0, 3.0).unwrap();
        let curve = model.default_density_curve();
        assert_eq!(curve.len(), CURVE_SAMPLES);
        assert_eq!(curve.first().unwrap().x, 0.0);
        assert_eq!(curve.last().unwrap().x, 1.0);
        assert!(curve.windows(2).all(|w| w[0].x < w[1].x));
        let total: f64 = curve.iter().map(|p| p.y).sum();
        assert!(close(total, 1.0, 1e-9));
    }

    #[test]
    fn test_density_curve_with_singularity() {
        let model = BetaDistribution::new(0.5, 2.0).unwrap();
        let curve = model.density_curve(0.0, 1.0, 11);
        assert_eq!(curve[0].y, 0.0);
        assert!(curve.iter().all(|p| p.y.is_finite()));
        let total: f64 = curve.iter().map(|p| p.y).sum();
        assert!(close(total, 1.0, 1e-9));
    }

    #[test]
    fn test_density_curve_degenerate_sizes() {
        let model = BetaDistribution::new(2.0, 2.0).unwrap();
        assert!(model.density_curve(0.0, 1.0, 0).is_empty());
        let single = model.density_curve(0.3, 1.0, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].x, 0.3);
        assert!(close(single[0].y, 1.0, 1e-12));
    }

    #[test]
    fn test_status_report() {
        let model = BetaDistribution::new(5.0, 3.0).unwrap();
        let report = model.status_report();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "Parameters of beta distribution:");
        assert_eq!(lines[1], "a: 5  b: 3");
        assert_eq!(lines[2], "mean: 0.625000");
        assert_eq!(lines[3], "variance: 0.026042");
        assert_eq!(lines[4], "---------------------------------");
    }

    #[test]
    fn test_display() {
        let model = BetaDistribution::new(2.5, 4.0).unwrap();
        assert_eq!(format!("{}", model), "Beta(2.5, 4)");
    }
}
