//! Coordinate system of the diagram.
//!
//! Correlation maps to angle through `theta = arccos(corrcoef)` and
//! standard deviation maps directly to radius, giving a quarter-disc
//! frame with perfect correlation along the horizontal axis.

use std::f64::consts::FRAC_PI_2;

use viz_common::{AxisSpec, Coord, FrameSpec, Tick, VizError, VizResult};

use crate::config::{DiagramConfig, FontConfig};

/// Correlation values that carry a tick on the angular axis.
pub const CORRELATION_TICKS: [f64; 13] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95, 0.99, 1.0,
];

pub const CORRELATION_LABEL: &str = "Correlation";
pub const STDDEV_LABEL: &str = "Standard deviation (Normalized)";

/// Angular extent of the frame.
pub const THETA_RANGE: (f64, f64) = (0.0, FRAC_PI_2);

/// Position of a (stddev, corrcoef) pair in the frame.
pub fn to_polar(stddev: f64, corrcoef: f64) -> Coord {
    Coord::data(corrcoef.acos(), stddev)
}

/// Ticks of the angular axis, labelled with the correlation they stand for.
pub fn correlation_ticks() -> Vec<Tick> {
    CORRELATION_TICKS
        .iter()
        .map(|&corr| Tick {
            value: corr.acos(),
            label: decimal_label(corr),
        })
        .collect()
}

/// Shortest decimal form that keeps at least one fractional digit.
fn decimal_label(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Ticks of the radial axes; the tick equal to `refstd` shows `reference_label`.
pub fn std_ticks(levels: &[f64], refstd: f64, reference_label: &str) -> VizResult<Vec<Tick>> {
    let mut ticks: Vec<Tick> = levels
        .iter()
        .map(|&level| Tick {
            value: level,
            label: format!("{:.2}", level),
        })
        .collect();

    let reference = ticks
        .iter_mut()
        .find(|tick| tick.value == refstd)
        .ok_or_else(|| {
            VizError::invalid(
                "refstd",
                format!("{} is not one of the std_levels {:?}", refstd, levels),
            )
        })?;
    reference.label = reference_label.to_string();

    Ok(ticks)
}

/// Build the frame description for a validated configuration.
///
/// The outer arc carries correlation ticks and the "Correlation" label,
/// both radial edges carry stddev ticks, the vertical edge carries the
/// stddev label, and the inner arc is hidden.
pub fn frame_spec(config: &DiagramConfig) -> VizResult<FrameSpec> {
    let fonts = &config.fonts;
    let stddev = std_ticks(&config.std_levels, config.refstd, &config.reference_label)?;

    Ok(FrameSpec {
        theta_range: THETA_RANGE,
        r_range: config.std_range,
        subplot: config.subplot,
        top: labelled_axis(correlation_ticks(), Some(CORRELATION_LABEL), fonts),
        bottom: AxisSpec {
            visible: false,
            ..AxisSpec::default()
        },
        left: labelled_axis(stddev.clone(), None, fonts),
        right: labelled_axis(stddev, Some(STDDEV_LABEL), fonts),
    })
}

fn labelled_axis(ticks: Vec<Tick>, label: Option<&str>, fonts: &FontConfig) -> AxisSpec {
    AxisSpec {
        visible: true,
        ticks,
        show_ticklabels: true,
        label: label.map(str::to_string),
        ticklabel_size: fonts.ticklabel_size,
        label_size: fonts.axislabel_size,
        tick_size: fonts.tick_size,
        ticklabel_pad: fonts.ticklabel_pad,
        label_pad: fonts.axislabel_pad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_labels() {
        let labels: Vec<String> = correlation_ticks().into_iter().map(|t| t.label).collect();
        assert_eq!(labels[0], "0.0");
        assert_eq!(labels[3], "0.3");
        assert_eq!(labels[10], "0.95");
        assert_eq!(labels[11], "0.99");
        assert_eq!(labels[12], "1.0");
    }

    #[test]
    fn test_correlation_tick_angles() {
        let ticks = correlation_ticks();
        assert!((ticks[0].value - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(ticks[12].value, 0.0);
        for pair in ticks.windows(2) {
            assert!(pair[0].value > pair[1].value);
        }
    }

    #[test]
    fn test_std_tick_labels() {
        let ticks = std_ticks(&[0.0, 0.5, 1.0, 1.5], 1.0, "REF").unwrap();
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0.00", "0.50", "REF", "1.50"]);
    }

    #[test]
    fn test_std_ticks_require_exact_reference() {
        let err = std_ticks(&[0.0, 0.5, 1.0], 0.9999999, "REF").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_to_polar_extremes() {
        assert_eq!(to_polar(1.2, 1.0), Coord::data(0.0, 1.2));
        match to_polar(0.5, 0.0) {
            Coord::Data { theta, r } => {
                assert!((theta - FRAC_PI_2).abs() < 1e-12);
                assert_eq!(r, 0.5);
            }
            other => panic!("unexpected coordinate {:?}", other),
        }
    }
}
