//! Common test fixtures for diagram tests.
//!
//! Model/observation comparison statistics as published with the NCL
//! Taylor diagram gallery. Standard deviations are already normalized by
//! the reference.

/// One model's statistics across several variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelStats {
    pub name: &'static str,
    pub stddev: &'static [f64],
    pub corrcoef: &'static [f64],
    /// Percent bias per variable
    pub bias: &'static [f64],
}

/// Three-variable comparison used for marker, legend and bias tests.
pub mod three_vars {
    use super::ModelStats;

    pub const MODEL_A: ModelStats = ModelStats {
        name: "Model A",
        stddev: &[1.230, 0.988, 1.092],
        corrcoef: &[0.958, 0.973, 0.740],
        bias: &[2.7, -1.5, 17.31],
    };

    pub const MODEL_B: ModelStats = ModelStats {
        name: "Model B",
        stddev: &[1.129, 0.996, 1.016],
        corrcoef: &[0.963, 0.975, 0.801],
        bias: &[1.7, 2.5, -17.31],
    };

    pub const VARIABLES: [&str; 3] = ["SLP", "Tsfc", "Prc"];
}

/// Eight-variable comparison used for model-name keys.
pub mod eight_vars {
    use super::ModelStats;

    pub const CASE_A: ModelStats = ModelStats {
        name: "Case A",
        stddev: &[1.000, 0.794, 0.876, 0.870, 0.836, 0.673, 0.736, 0.733],
        corrcoef: &[0.963, 0.976, 0.854, 0.730, 0.826, 0.863, 0.960, 0.734],
        bias: &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    };

    pub const CASE_B: ModelStats = ModelStats {
        name: "Case B",
        stddev: &[1.129, 0.996, 1.016, 0.821, 0.792, 0.702, 0.867, 0.929],
        corrcoef: &[0.963, 0.975, 0.801, 0.747, 0.862, 0.855, 0.968, 0.816],
        bias: &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    };

    pub const VARIABLES: [&str; 8] = [
        "SLP",
        "Tsfc",
        "Prc",
        "Prc 30S-30N",
        "LW",
        "SW",
        "U300",
        "Guess",
    ];
}

/// Sets with points beyond the default 1.65 stddev limit.
pub mod outliers {
    use super::ModelStats;

    /// Two of four points exceed the stddev range.
    pub const TWO_OUTSIDE: ModelStats = ModelStats {
        name: "Wide A",
        stddev: &[0.9, 1.8, 1.2, 2.4],
        corrcoef: &[0.9, 0.8, 0.7, 0.95],
        bias: &[3.0, -12.0, 0.5, 25.0],
    };

    /// Three of three points exceed the stddev range.
    pub const THREE_OUTSIDE: ModelStats = ModelStats {
        name: "Wide B",
        stddev: &[1.7, 1.9, 2.1],
        corrcoef: &[0.6, 0.5, 0.4],
        bias: &[-6.0, 8.0, -0.2],
    };
}

/// Paired time series with a known correlation structure.
pub mod series {
    /// Reference observations
    pub const OBSERVED: [f64; 8] = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 8.0, 7.0];

    /// Model output: the reference scaled by 2 and shifted by 1
    pub const SCALED: [f64; 8] = [3.0, 7.0, 5.0, 11.0, 9.0, 13.0, 17.0, 15.0];

    /// Model output with the order of neighbours swapped
    pub const JITTERED: [f64; 8] = [3.0, 1.0, 5.0, 2.0, 6.0, 4.0, 7.0, 8.0];
}
