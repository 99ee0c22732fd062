//! Tests for Taylor statistics and their placement on a diagram.

use taylor::{rms, taylor_stats, to_polar, DiagramConfig, ModelSetOptions, TaylorDiagram};
use test_utils::{assert_approx_eq, fixtures::series, RecordingSurface};
use viz_common::Coord;

// ============================================================================
// Statistics
// ============================================================================

#[test]
fn test_linear_transform_of_reference() {
    let stats = taylor_stats(&series::SCALED, &series::OBSERVED).unwrap();

    assert_approx_eq!(stats.correlation, 1.0, 1e-12);
    assert_approx_eq!(stats.test_std, 2.0 * stats.reference_std, 1e-12);
    // Centered difference of 2x against x is x itself
    assert_approx_eq!(stats.centered_rms, stats.reference_std, 1e-12);
}

#[test]
fn test_law_of_cosines_identity() {
    for test in [&series::SCALED, &series::JITTERED] {
        let s = taylor_stats(test, &series::OBSERVED).unwrap();
        let expected = s.test_std.powi(2) + s.reference_std.powi(2)
            - 2.0 * s.test_std * s.reference_std * s.correlation;
        assert_approx_eq!(s.centered_rms.powi(2), expected, 1e-9);
    }
}

#[test]
fn test_normalized_stats_match_rms_field() {
    let stats = taylor_stats(&series::JITTERED, &series::OBSERVED)
        .unwrap()
        .normalized();

    assert_eq!(stats.reference_std, 1.0);
    let from_field = rms(1.0, stats.test_std, stats.correlation.acos());
    assert_approx_eq!(from_field, stats.centered_rms, 1e-9);
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn test_normalized_stats_plot_at_their_polar_position() {
    let stats = taylor_stats(&series::JITTERED, &series::OBSERVED)
        .unwrap()
        .normalized();

    let mut diagram =
        TaylorDiagram::with_surface(DiagramConfig::default(), RecordingSurface::new()).unwrap();
    diagram
        .add_model_set(
            &[stats.test_std],
            &[stats.correlation],
            &ModelSetOptions::default(),
        )
        .unwrap();

    let point = diagram.surface().scatters()[0].points[0];
    assert_eq!(point, to_polar(stats.test_std, stats.correlation));
    match point {
        Coord::Data { theta, r } => {
            assert!(theta > 0.0 && theta < std::f64::consts::FRAC_PI_2);
            assert!(r > 0.0);
        }
        other => panic!("unexpected coordinate {:?}", other),
    }
}
