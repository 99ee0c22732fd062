//! Sample sets: markers, point labels and the outlier shelf.

use viz_common::{
    ArtistId, Color, Coord, MarkerShape, MarkerStyle, Surface, TextContent, TextItem, TextStyle,
    VizError, VizResult, style::DEFAULT_MARKER_SIZE,
};

use crate::config::ModelSetOptions;
use crate::diagram::TaylorDiagram;
use crate::frame::to_polar;

/// Horizontal distance between outlier shelf slots, in axes fraction.
pub const OUTLIER_SLOT_WIDTH: f64 = 0.22;

const OUTLIER_MARKER_AT: (f64, f64) = (0.054, -0.105);
const OUTLIER_LABEL_AT: (f64, f64) = (0.045, -0.08);
const OUTLIER_VALUES_AT: (f64, f64) = (0.08, -0.10);
const OUTLIER_VALUES_SIZE: f64 = 17.0;

/// Marker area (points squared) and shape for a percent bias.
///
/// | `abs(bias)` | size |
/// |---|---|
/// | > 20 | 130 |
/// | (10, 20] | 90 |
/// | (5, 10] | 50 |
/// | (1, 5] | 30 |
/// | <= 1 | 60 |
///
/// Points with `abs(bias) <= 1` are circles; otherwise the triangle
/// points up for positive bias and down for negative bias.
pub fn bias_to_marker_size(bias: f64) -> (f64, MarkerShape) {
    let magnitude = bias.abs();
    let size = if magnitude > 20.0 {
        130.0
    } else if magnitude > 10.0 {
        90.0
    } else if magnitude > 5.0 {
        50.0
    } else if magnitude > 1.0 {
        30.0
    } else {
        60.0
    };

    let shape = if magnitude <= 1.0 {
        MarkerShape::Circle
    } else if bias > 0.0 {
        MarkerShape::TriangleUp
    } else {
        MarkerShape::TriangleDown
    };

    (size, shape)
}

/// The legend entry a sample set contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendHandle {
    /// Unlabelled sets are left out of legends
    pub label: Option<String>,
    pub marker: MarkerStyle,
}

/// A point moved to the outlier shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierPlacement {
    /// Shelf slot, counted across all sets of the diagram
    pub slot: usize,
    /// Position of the point in the call's input
    pub index: usize,
    pub stddev: f64,
    pub corrcoef: f64,
}

/// What one `add_model_set` call drew.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSetArtists {
    /// Input positions of points drawn inside the frame
    pub inside: Vec<usize>,
    pub markers: Vec<ArtistId>,
    /// Point labels, inside points first, then shelf labels
    pub texts: Vec<ArtistId>,
    pub outliers: Vec<OutlierPlacement>,
    pub legend_handle: LegendHandle,
}

/// Reject bad input before anything is drawn.
fn validate(stddev: &[f64], corrcoef: &[f64], options: &ModelSetOptions) -> VizResult<()> {
    if options.bias_on {
        let bias = options.bias.as_ref().ok_or_else(|| {
            VizError::invalid("bias", "bias values are required when bias_on is set")
        })?;
        if options.marker.is_some() || options.size.is_some() {
            return Err(VizError::invalid(
                "marker",
                "marker and size are derived from bias when bias_on is set",
            ));
        }
        if bias.len() != stddev.len() {
            return Err(VizError::LengthMismatch {
                name: "bias".to_string(),
                expected: stddev.len(),
                actual: bias.len(),
            });
        }
        if let Some(&b) = bias.iter().find(|b| !b.is_finite()) {
            return Err(VizError::domain("bias", b, "must be finite"));
        }
    }

    if corrcoef.len() != stddev.len() {
        return Err(VizError::LengthMismatch {
            name: "corrcoef".to_string(),
            expected: stddev.len(),
            actual: corrcoef.len(),
        });
    }
    if let Some(&s) = stddev.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(VizError::domain("stddev", s, "must be finite and non-negative"));
    }
    if let Some(&c) = corrcoef
        .iter()
        .find(|c| !c.is_finite() || **c < -1.0 || **c > 1.0)
    {
        return Err(VizError::domain("corrcoef", c, "must lie in [-1, 1]"));
    }

    if let Some(size) = options.size {
        if !size.is_finite() || size < 0.0 {
            return Err(VizError::invalid(
                "size",
                format!("must be a non-negative area, got {}", size),
            ));
        }
    }
    Ok(())
}

/// Split input positions into (inside, outside).
///
/// A point stays inside when `stddev <= std_max` and `corrcoef >= std_min`;
/// the lower stddev bound doubles as the correlation bound.
pub fn partition(
    stddev: &[f64],
    corrcoef: &[f64],
    std_range: (f64, f64),
    outlier_handling: bool,
) -> (Vec<usize>, Vec<usize>) {
    if !outlier_handling {
        return ((0..stddev.len()).collect(), Vec::new());
    }
    let (std_min, std_max) = std_range;
    (0..stddev.len()).partition(|&i| stddev[i] <= std_max && corrcoef[i] >= std_min)
}

fn base_marker(options: &ModelSetOptions) -> MarkerStyle {
    MarkerStyle {
        shape: options.marker.unwrap_or_default(),
        size: options.size.unwrap_or(DEFAULT_MARKER_SIZE),
        face: options
            .color
            .or(options.face_color)
            .unwrap_or(Color::DEFAULT_CYCLE),
        edge: options.color.or(options.edge_color),
        line_width: 1.0,
    }
}

fn bias_marker(base: &MarkerStyle, bias: f64) -> MarkerStyle {
    let (size, shape) = bias_to_marker_size(bias);
    MarkerStyle {
        shape,
        size,
        ..base.clone()
    }
}

impl<S: Surface> TaylorDiagram<S> {
    /// Plot one set of (stddev, corrcoef) pairs.
    ///
    /// Points are labelled with their 1-based input position. With
    /// `outlier_handling`, points outside the frame go to the shelf below
    /// it, one slot each, continuing after the slots of earlier sets.
    pub fn add_model_set(
        &mut self,
        stddev: &[f64],
        corrcoef: &[f64],
        options: &ModelSetOptions,
    ) -> VizResult<ModelSetArtists> {
        validate(stddev, corrcoef, options)?;

        let (inside, outside) = partition(
            stddev,
            corrcoef,
            self.config.std_range,
            options.outlier_handling,
        );
        let base = base_marker(options);
        let bias = options.bias.as_deref().filter(|_| options.bias_on);
        let frame = self.frame;

        let mut markers = Vec::new();
        match bias {
            Some(bias) => {
                for &i in &inside {
                    let marker = bias_marker(&base, bias[i]);
                    let point = to_polar(stddev[i], corrcoef[i]);
                    markers.push(self.surface.scatter(frame, &[point], &marker)?);
                }
            }
            None if !inside.is_empty() => {
                let points: Vec<Coord> = inside
                    .iter()
                    .map(|&i| to_polar(stddev[i], corrcoef[i]))
                    .collect();
                markers.push(self.surface.scatter(frame, &points, &base)?);
            }
            None => {}
        }

        let legend_handle = LegendHandle {
            label: options.label.clone(),
            marker: if bias.is_some() {
                // Bias markers vary per point; the legend shows a plain dot
                let color = options.key_color().unwrap_or(Color::DEFAULT_CYCLE);
                MarkerStyle {
                    face: color,
                    edge: Some(color),
                    ..MarkerStyle::default()
                }
            } else {
                base.clone()
            },
        };

        let mut texts = Vec::new();
        if options.annotate {
            let style = TextStyle::sized(options.font_size)
                .with_color(options.key_color().unwrap_or(Color::BLACK));
            for &i in &inside {
                let item = TextItem::new(
                    to_polar(stddev[i], corrcoef[i]),
                    TextContent::plain((i + 1).to_string()),
                    style.clone(),
                )
                .with_offset(options.xytext.0, options.xytext.1);
                texts.push(self.surface.text(frame, &item)?);
            }
        }

        let mut outliers = Vec::with_capacity(outside.len());
        for (k, &i) in outside.iter().enumerate() {
            let slot = self.next_outlier_slot + k;
            let shift = slot as f64 * OUTLIER_SLOT_WIDTH;

            let marker = match bias {
                Some(bias) => bias_marker(&base, bias[i]),
                None => base.clone(),
            };
            let at = Coord::axes(OUTLIER_MARKER_AT.0 + shift, OUTLIER_MARKER_AT.1);
            markers.push(self.surface.scatter(frame, &[at], &marker)?);

            let label = TextItem::new(
                Coord::axes(OUTLIER_LABEL_AT.0 + shift, OUTLIER_LABEL_AT.1),
                TextContent::plain((i + 1).to_string()),
                TextStyle::sized(options.font_size),
            );
            texts.push(self.surface.text(frame, &label)?);

            let values = TextItem::new(
                Coord::axes(OUTLIER_VALUES_AT.0 + shift, OUTLIER_VALUES_AT.1),
                TextContent::Fraction {
                    numerator: format!("{:.2}", stddev[i]),
                    denominator: format!("{:.2}", corrcoef[i]),
                },
                TextStyle::sized(OUTLIER_VALUES_SIZE),
            );
            self.surface.text(frame, &values)?;

            outliers.push(OutlierPlacement {
                slot,
                index: i,
                stddev: stddev[i],
                corrcoef: corrcoef[i],
            });
        }

        // Only a fully drawn set claims its shelf slots and legend entry
        self.next_outlier_slot += outliers.len();
        self.legend_handles.push(legend_handle.clone());

        tracing::debug!(
            label = options.label.as_deref().unwrap_or(""),
            points = stddev.len(),
            inside = inside.len(),
            outliers = outliers.len(),
            bias_on = options.bias_on,
            next_slot = self.next_outlier_slot,
            "Added model set"
        );

        Ok(ModelSetArtists {
            inside,
            markers,
            texts,
            outliers,
            legend_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramConfig;
    use test_utils::RecordingSurface;
    use viz_common::{FrameId, FrameSpec, LegendSpec, LineStyle, PolarGrid, TitleSpec};

    #[test]
    fn test_bias_table() {
        assert_eq!(bias_to_marker_size(25.0), (130.0, MarkerShape::TriangleUp));
        assert_eq!(bias_to_marker_size(-25.0), (130.0, MarkerShape::TriangleDown));
        assert_eq!(bias_to_marker_size(0.5), (60.0, MarkerShape::Circle));
        assert_eq!(bias_to_marker_size(7.0), (50.0, MarkerShape::TriangleUp));
    }

    #[test]
    fn test_bias_table_boundaries() {
        assert_eq!(bias_to_marker_size(20.0), (90.0, MarkerShape::TriangleUp));
        assert_eq!(bias_to_marker_size(-10.0), (50.0, MarkerShape::TriangleDown));
        assert_eq!(bias_to_marker_size(5.0), (30.0, MarkerShape::TriangleUp));
        assert_eq!(bias_to_marker_size(-1.0), (60.0, MarkerShape::Circle));
        assert_eq!(bias_to_marker_size(1.0001), (30.0, MarkerShape::TriangleUp));
        assert_eq!(bias_to_marker_size(0.0), (60.0, MarkerShape::Circle));
    }

    #[test]
    fn test_partition_rule() {
        let stddev = [1.0, 1.7, 0.5, 1.65];
        let corrcoef = [0.9, 0.9, -0.2, 0.0];
        let (inside, outside) = partition(&stddev, &corrcoef, (0.0, 1.65), true);
        assert_eq!(inside, vec![0, 3]);
        assert_eq!(outside, vec![1, 2]);

        let (inside, outside) = partition(&stddev, &corrcoef, (0.0, 1.65), false);
        assert_eq!(inside, vec![0, 1, 2, 3]);
        assert!(outside.is_empty());
    }

    #[test]
    fn test_validate_bias_requirements() {
        let options = ModelSetOptions {
            bias_on: true,
            ..ModelSetOptions::default()
        };
        assert!(validate(&[1.0], &[1.0], &options).unwrap_err().is_configuration());

        let options = ModelSetOptions::default()
            .with_bias(vec![1.0])
            .marker(MarkerShape::Square);
        assert!(validate(&[1.0], &[1.0], &options).unwrap_err().is_configuration());

        let options = ModelSetOptions::default().with_bias(vec![1.0, 2.0]);
        assert!(matches!(
            validate(&[1.0], &[1.0], &options),
            Err(VizError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_domain() {
        let options = ModelSetOptions::default();
        assert!(matches!(
            validate(&[1.0], &[1.2], &options),
            Err(VizError::Domain { .. })
        ));
        assert!(matches!(
            validate(&[-0.1], &[0.5], &options),
            Err(VizError::Domain { .. })
        ));
        assert!(matches!(
            validate(&[f64::NAN], &[0.5], &options),
            Err(VizError::Domain { .. })
        ));
        assert!(validate(&[1.0], &[-0.5], &options).is_ok());
    }

    /// Records everything but fails every text call.
    struct NoText(RecordingSurface);

    impl Surface for NoText {
        fn add_frame(&mut self, spec: &FrameSpec) -> VizResult<FrameId> {
            self.0.add_frame(spec)
        }
        fn update_frame(&mut self, frame: FrameId, spec: &FrameSpec) -> VizResult<()> {
            self.0.update_frame(frame, spec)
        }
        fn plot(
            &mut self,
            frame: FrameId,
            path: &[Coord],
            style: &LineStyle,
        ) -> VizResult<ArtistId> {
            self.0.plot(frame, path, style)
        }
        fn scatter(
            &mut self,
            frame: FrameId,
            points: &[Coord],
            marker: &MarkerStyle,
        ) -> VizResult<ArtistId> {
            self.0.scatter(frame, points, marker)
        }
        fn text(&mut self, _frame: FrameId, _item: &TextItem) -> VizResult<ArtistId> {
            Err(VizError::Render("text unavailable".to_string()))
        }
        fn contour(
            &mut self,
            frame: FrameId,
            grid: &PolarGrid,
            levels: &[f64],
            style: &LineStyle,
        ) -> VizResult<ArtistId> {
            self.0.contour(frame, grid, levels, style)
        }
        fn legend(&mut self, frame: FrameId, spec: &LegendSpec) -> VizResult<ArtistId> {
            self.0.legend(frame, spec)
        }
        fn set_title(&mut self, frame: FrameId, title: &TitleSpec) -> VizResult<ArtistId> {
            self.0.set_title(frame, title)
        }
    }

    #[test]
    fn test_failed_set_keeps_no_handle_or_slots() {
        let mut diagram =
            TaylorDiagram::with_surface(DiagramConfig::default(), NoText(RecordingSurface::new()))
                .unwrap();

        let options = ModelSetOptions::default().label("Model A");
        let err = diagram
            .add_model_set(&[1.0, 1.9], &[0.9, 0.8], &options)
            .unwrap_err();
        assert!(matches!(err, VizError::Render(_)));
        assert!(diagram.legend_handles().is_empty());
        assert_eq!(diagram.outlier_count(), 0);

        // Outliers only, no point labels: the shelf text fails too
        let options = ModelSetOptions::default()
            .annotate(false)
            .outlier_handling(true);
        assert!(diagram.add_model_set(&[1.9], &[0.8], &options).is_err());
        assert!(diagram.legend_handles().is_empty());
        assert_eq!(diagram.outlier_count(), 0);
    }

    #[test]
    fn test_bias_marker_keeps_color() {
        let base = base_marker(&ModelSetOptions::default().color(Color::rgb(255, 0, 0)));
        let marker = bias_marker(&base, -12.0);
        assert_eq!(marker.size, 90.0);
        assert_eq!(marker.shape, MarkerShape::TriangleDown);
        assert_eq!(marker.face, Color::rgb(255, 0, 0));
    }
}
