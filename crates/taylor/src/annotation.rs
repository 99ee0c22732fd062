//! Grids, legends, titles and other non-data drawing.

use serde::{Deserialize, Serialize};
use viz_common::{
    ArtistId, AxisSide, Color, Coord, Dash, LegendEntry, LegendLoc, LegendSpec, LineStyle,
    MarkerShape, MarkerStyle, Surface, TextContent, TextItem, TextStyle, TitleSpec, VAlign,
    VizError, VizResult,
};

use crate::diagram::{arc_path, TaylorDiagram};

const GRID_GRAY: Color = Color::rgb(211, 211, 211);

/// Default style of correlation grid lines.
pub fn corr_grid_style() -> LineStyle {
    LineStyle::new(GRID_GRAY, 0.5, Dash::long_dash())
}

/// Default style of stddev grid arcs.
pub fn std_grid_style() -> LineStyle {
    LineStyle::new(GRID_GRAY, 1.0, Dash::long_dash())
}

/// Default style of the major tick grid.
pub fn major_grid_style() -> LineStyle {
    LineStyle::new(Color::rgb(0xb0, 0xb0, 0xb0), 0.8, Dash::Solid)
}

/// Which tick family [`TaylorDiagram::add_grid`] draws lines for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxis {
    #[default]
    Both,
    Correlation,
    StdDev,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelNameOptions {
    /// Top-left of the text block, in axes fraction
    pub position: (f64, f64),
    pub v_align: VAlign,
    pub font_size: f64,
}

impl Default for ModelNameOptions {
    fn default() -> Self {
        Self {
            position: (0.1, 0.31),
            v_align: VAlign::Top,
            font_size: 13.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegendOptions {
    /// Anchor point in axes fraction
    pub anchor: (f64, f64),
    pub loc: LegendLoc,
    pub font_size: f64,
    pub frame_on: bool,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            anchor: (1.1, 0.95),
            loc: LegendLoc::UpperRight,
            font_size: 14.0,
            frame_on: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TitleOptions {
    pub font_size: f64,
    /// Vertical position in axes fraction; unset places the title above the frame
    pub y: Option<f64>,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            y: None,
        }
    }
}

/// Arguments of [`TaylorDiagram::set_fontsizes_and_pad`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontSizes {
    pub ticklabel: f64,
    pub axislabel: f64,
    pub axislabel_pad: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            ticklabel: 14.0,
            axislabel: 16.0,
            axislabel_pad: 8.0,
        }
    }
}

// Bias legend layout, in axes fraction
const BIAS_HEADER: &str = "-  /  +     Bias\n";
const BIAS_HEADER_AT: (f64, f64) = (0.07, 0.92);
const BIAS_FONT_SIZE: f64 = 11.0;
const BIAS_FIRST_ROW: f64 = 0.87;
const BIAS_ROW_STEP: f64 = 0.04;
const BIAS_NEGATIVE_X: f64 = 0.08;
const BIAS_POSITIVE_X: f64 = 0.13;
const BIAS_LABEL_X: f64 = 0.18;
const BIAS_ROWS: [(f64, &str); 5] = [
    (130.0, ">20%"),
    (90.0, "10-20%"),
    (50.0, "5-10%"),
    (30.0, "1-5%"),
    (60.0, "<1%"),
];

fn check_correlations(values: &[f64]) -> VizResult<()> {
    match values
        .iter()
        .find(|v| !v.is_finite() || **v < -1.0 || **v > 1.0)
    {
        Some(&v) => Err(VizError::domain("corrcoef", v, "must lie in [-1, 1]")),
        None => Ok(()),
    }
}

impl<S: Surface> TaylorDiagram<S> {
    /// Radial lines at the given correlations, spanning the stddev range.
    pub fn add_corr_grid(&mut self, values: &[f64], style: &LineStyle) -> VizResult<Vec<ArtistId>> {
        check_correlations(values)?;
        let (std_min, std_max) = (self.std_min(), self.std_max());
        let mut artists = Vec::with_capacity(values.len());
        for &value in values {
            let theta = value.acos();
            let line = [Coord::data(theta, std_min), Coord::data(theta, std_max)];
            artists.push(self.surface.plot(self.frame, &line, style)?);
        }
        tracing::debug!(count = values.len(), "Added correlation grid");
        Ok(artists)
    }

    /// Arcs at the given standard deviations.
    pub fn add_std_grid(&mut self, values: &[f64], style: &LineStyle) -> VizResult<Vec<ArtistId>> {
        if let Some(&v) = values.iter().find(|v| !v.is_finite()) {
            return Err(VizError::domain("stddev", v, "must be finite"));
        }
        let mut artists = Vec::with_capacity(values.len());
        for &value in values {
            artists.push(self.surface.plot(self.frame, &arc_path(value), style)?);
        }
        tracing::debug!(count = values.len(), "Added stddev grid");
        Ok(artists)
    }

    #[deprecated(note = "use add_corr_grid")]
    pub fn add_xgrid(&mut self, values: &[f64], style: &LineStyle) -> VizResult<Vec<ArtistId>> {
        tracing::warn!("add_xgrid is deprecated; use add_corr_grid instead");
        self.add_corr_grid(values, style)
    }

    #[deprecated(note = "use add_std_grid")]
    pub fn add_ygrid(&mut self, values: &[f64], style: &LineStyle) -> VizResult<Vec<ArtistId>> {
        tracing::warn!("add_ygrid is deprecated; use add_std_grid instead");
        self.add_std_grid(values, style)
    }

    /// Grid lines at the frame's own tick positions.
    pub fn add_grid(&mut self, axis: GridAxis, style: &LineStyle) -> VizResult<Vec<ArtistId>> {
        let (std_min, std_max) = (self.std_min(), self.std_max());
        let mut artists = Vec::new();

        if matches!(axis, GridAxis::Both | GridAxis::Correlation) {
            let thetas: Vec<f64> = self
                .frame_spec
                .axis(AxisSide::Top)
                .ticks
                .iter()
                .map(|t| t.value)
                .collect();
            for theta in thetas {
                let line = [Coord::data(theta, std_min), Coord::data(theta, std_max)];
                artists.push(self.surface.plot(self.frame, &line, style)?);
            }
        }

        if matches!(axis, GridAxis::Both | GridAxis::StdDev) {
            let radii: Vec<f64> = self
                .frame_spec
                .axis(AxisSide::Left)
                .ticks
                .iter()
                .map(|t| t.value)
                .collect();
            for r in radii {
                artists.push(self.surface.plot(self.frame, &arc_path(r), style)?);
            }
        }

        tracing::debug!(axis = ?axis, lines = artists.len(), "Added major grid");
        Ok(artists)
    }

    /// One text block listing `"{n} - {name}"` per name, numbered from 1.
    pub fn add_model_name(
        &mut self,
        names: &[impl AsRef<str>],
        options: &ModelNameOptions,
    ) -> VizResult<ArtistId> {
        let text = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{} - {}", i + 1, name.as_ref()))
            .collect::<Vec<_>>()
            .join("\n");

        let item = TextItem::new(
            Coord::axes(options.position.0, options.position.1),
            TextContent::Plain(text),
            TextStyle::sized(options.font_size).with_v_align(options.v_align),
        );
        self.surface.text(self.frame, &item)
    }

    /// The fixed key explaining bias marker sizes, in the upper left corner.
    pub fn add_bias_legend(&mut self) -> VizResult<Vec<ArtistId>> {
        let frame = self.frame;
        let mut artists = Vec::new();

        let header = TextItem::new(
            Coord::axes(BIAS_HEADER_AT.0, BIAS_HEADER_AT.1),
            TextContent::plain(BIAS_HEADER),
            TextStyle::sized(BIAS_FONT_SIZE).with_v_align(VAlign::Top),
        );
        artists.push(self.surface.text(frame, &header)?);

        let mut y = BIAS_FIRST_ROW;
        for (row, (size, label)) in BIAS_ROWS.iter().enumerate() {
            let (negative, positive) = if row == BIAS_ROWS.len() - 1 {
                (MarkerShape::Circle, MarkerShape::Circle)
            } else {
                (MarkerShape::TriangleDown, MarkerShape::TriangleUp)
            };

            for (x, shape) in [(BIAS_NEGATIVE_X, negative), (BIAS_POSITIVE_X, positive)] {
                let marker = MarkerStyle {
                    shape,
                    size: *size,
                    face: Color::NONE,
                    edge: Some(Color::BLACK),
                    line_width: 0.5,
                };
                artists.push(self.surface.scatter(frame, &[Coord::axes(x, y)], &marker)?);
            }

            let text = TextItem::new(
                Coord::axes(BIAS_LABEL_X, y - 0.01),
                TextContent::plain(*label),
                TextStyle::sized(BIAS_FONT_SIZE),
            );
            artists.push(self.surface.text(frame, &text)?);

            y -= BIAS_ROW_STEP;
        }

        Ok(artists)
    }

    /// Legend of the labelled sample sets, most recent first.
    pub fn add_legend(&mut self, options: &LegendOptions) -> VizResult<ArtistId> {
        let entries: Vec<LegendEntry> = self
            .legend_handles
            .iter()
            .rev()
            .filter_map(|handle| {
                handle.label.as_ref().map(|label| LegendEntry {
                    label: label.clone(),
                    marker: handle.marker.clone(),
                })
            })
            .collect();

        if entries.is_empty() {
            return Err(VizError::NoLegendHandles);
        }

        let spec = LegendSpec {
            entries,
            anchor: options.anchor,
            loc: options.loc,
            font_size: options.font_size,
            frame_on: options.frame_on,
        };
        tracing::debug!(entries = spec.entries.len(), "Added legend");
        self.surface.legend(self.frame, &spec)
    }

    pub fn add_title(&mut self, text: &str, options: &TitleOptions) -> VizResult<ArtistId> {
        let title = TitleSpec {
            text: text.to_string(),
            font_size: options.font_size,
            y: options.y,
        };
        self.surface.set_title(self.frame, &title)
    }

    /// Resize tick labels on the three labelled axes and the two axis
    /// labels, and set the axis label padding.
    pub fn set_fontsizes_and_pad(&mut self, sizes: &FontSizes) -> VizResult<()> {
        let mut spec = self.frame_spec.clone();
        for side in [AxisSide::Top, AxisSide::Right, AxisSide::Left] {
            spec.axis_mut(side).ticklabel_size = sizes.ticklabel;
        }
        for side in [AxisSide::Top, AxisSide::Right] {
            let axis = spec.axis_mut(side);
            axis.label_size = sizes.axislabel;
            axis.label_pad = sizes.axislabel_pad;
        }

        self.surface.update_frame(self.frame, &spec)?;
        self.frame_spec = spec;
        Ok(())
    }
}
