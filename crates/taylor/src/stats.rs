//! Statistics plotted on a Taylor diagram.

use viz_common::{VizError, VizResult};

/// Pattern statistics of a test series against a reference series.
///
/// Standard deviations are population (divide by N) values, so the
/// outputs satisfy `centered_rms^2 = test_std^2 + reference_std^2
/// - 2 test_std reference_std correlation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaylorStats {
    pub correlation: f64,
    pub centered_rms: f64,
    pub test_std: f64,
    pub reference_std: f64,
}

impl TaylorStats {
    /// Express both standard deviations and the RMS difference in units
    /// of the reference standard deviation.
    pub fn normalized(&self) -> TaylorStats {
        TaylorStats {
            correlation: self.correlation,
            centered_rms: self.centered_rms / self.reference_std,
            test_std: self.test_std / self.reference_std,
            reference_std: 1.0,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compare `test` against `reference`, point by point.
pub fn taylor_stats(test: &[f64], reference: &[f64]) -> VizResult<TaylorStats> {
    if test.len() != reference.len() {
        return Err(VizError::LengthMismatch {
            name: "test".to_string(),
            expected: reference.len(),
            actual: test.len(),
        });
    }
    if test.len() < 2 {
        return Err(VizError::domain(
            "test",
            test.len() as f64,
            "at least two points are required",
        ));
    }
    for (name, series) in [("test", test), ("reference", reference)] {
        if let Some(&v) = series.iter().find(|v| !v.is_finite()) {
            return Err(VizError::domain(name, v, "must be finite"));
        }
    }

    let test_mean = mean(test);
    let reference_mean = mean(reference);
    let n = test.len() as f64;

    let (mut cov, mut test_var, mut reference_var, mut diff_sq) = (0.0, 0.0, 0.0, 0.0);
    for (&t, &r) in test.iter().zip(reference) {
        let dt = t - test_mean;
        let dr = r - reference_mean;
        cov += dt * dr;
        test_var += dt * dt;
        reference_var += dr * dr;
        diff_sq += (dt - dr) * (dt - dr);
    }

    if test_var == 0.0 {
        return Err(VizError::domain("test", 0.0, "variance is zero"));
    }
    if reference_var == 0.0 {
        return Err(VizError::domain("reference", 0.0, "variance is zero"));
    }

    let stats = TaylorStats {
        correlation: (cov / (test_var * reference_var).sqrt()).clamp(-1.0, 1.0),
        centered_rms: (diff_sq / n).sqrt(),
        test_std: (test_var / n).sqrt(),
        reference_std: (reference_var / n).sqrt(),
    };

    tracing::trace!(
        points = test.len(),
        correlation = stats.correlation,
        centered_rms = stats.centered_rms,
        "Computed Taylor statistics"
    );

    Ok(stats)
}
