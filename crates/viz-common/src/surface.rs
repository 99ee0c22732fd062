//! The rendering-surface abstraction.
//!
//! Diagram code never rasterizes anything itself. It describes a
//! curvilinear frame once with [`FrameSpec`] and then issues drawing
//! calls in that frame's polar data space (`theta` in radians, `r` in
//! data units) or in axes-fraction space. Backends decide how frames are
//! laid out on the page and how primitives are drawn.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::style::{LineStyle, MarkerStyle, TextStyle};

/// Identifier of a drawn element, unique within one surface.
pub type ArtistId = usize;

/// Identifier of a frame (sub-plot region) within one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

/// A position inside a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    /// Polar data coordinates: angle in radians, radius in data units.
    Data { theta: f64, r: f64 },
    /// Fraction of the frame's axes box: (0, 0) bottom-left, (1, 1) top-right.
    Axes { x: f64, y: f64 },
}

impl Coord {
    pub fn data(theta: f64, r: f64) -> Self {
        Coord::Data { theta, r }
    }

    pub fn axes(x: f64, y: f64) -> Self {
        Coord::Axes { x, y }
    }

    /// Data-space elements are clipped to the frame; axes-space ones are not.
    pub fn is_clipped(&self) -> bool {
        matches!(self, Coord::Data { .. })
    }
}

/// Position of a frame within a regular grid of sub-plots.
///
/// Deserializes from either the compact three-digit form (`111`, `121`)
/// or an explicit `{nrows, ncols, index}` map. `index` is 1-based and
/// runs row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SubplotRepr")]
pub struct SubplotSpec {
    pub nrows: u32,
    pub ncols: u32,
    pub index: u32,
}

impl Default for SubplotSpec {
    fn default() -> Self {
        Self {
            nrows: 1,
            ncols: 1,
            index: 1,
        }
    }
}

impl SubplotSpec {
    pub fn new(nrows: u32, ncols: u32, index: u32) -> VizResult<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(VizError::invalid(
                "subplot",
                "nrows and ncols must be positive",
            ));
        }
        let cells = nrows.checked_mul(ncols).ok_or_else(|| {
            VizError::invalid(
                "subplot",
                format!("{} x {} cells is too many", nrows, ncols),
            )
        })?;
        if index == 0 || index > cells {
            return Err(VizError::invalid(
                "subplot",
                format!("index {} outside 1..={}", index, cells),
            ));
        }
        Ok(Self {
            nrows,
            ncols,
            index,
        })
    }

    /// Parse the three-digit form, e.g. `121` = 1 row, 2 columns, first cell.
    pub fn from_code(code: u32) -> VizResult<Self> {
        if !(111..=999).contains(&code) {
            return Err(VizError::invalid(
                "subplot",
                format!("'{}' is not a three-digit subplot code", code),
            ));
        }
        Self::new(code / 100, (code / 10) % 10, code % 10)
    }

    /// Zero-based (row, column) of this cell.
    pub fn cell(&self) -> (u32, u32) {
        let zero = self.index - 1;
        (zero / self.ncols, zero % self.ncols)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubplotRepr {
    Code(u32),
    Explicit { nrows: u32, ncols: u32, index: u32 },
}

impl TryFrom<SubplotRepr> for SubplotSpec {
    type Error = VizError;

    fn try_from(repr: SubplotRepr) -> Result<Self, Self::Error> {
        match repr {
            SubplotRepr::Code(code) => SubplotSpec::from_code(code),
            SubplotRepr::Explicit {
                nrows,
                ncols,
                index,
            } => SubplotSpec::new(nrows, ncols, index),
        }
    }
}

/// A tick mark: position in the axis' own coordinate and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// One of the four boundaries of a curvilinear frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSide {
    /// Outer arc, `r = r_max`; ticks are angles.
    Top,
    /// Inner arc, `r = r_min`; ticks are angles.
    Bottom,
    /// Radial edge at `theta = theta_min`; ticks are radii.
    Left,
    /// Radial edge at `theta = theta_max`; ticks are radii.
    Right,
}

/// Appearance and ticks of one frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub visible: bool,
    pub ticks: Vec<Tick>,
    pub show_ticklabels: bool,
    pub label: Option<String>,
    /// Tick label size in points
    pub ticklabel_size: f64,
    /// Axis label size in points
    pub label_size: f64,
    /// Tick length in points
    pub tick_size: f64,
    /// Gap between tick and tick label in points
    pub ticklabel_pad: f64,
    /// Gap between tick labels and axis label in points
    pub label_pad: f64,
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            visible: true,
            ticks: Vec::new(),
            show_ticklabels: false,
            label: None,
            ticklabel_size: 10.0,
            label_size: 10.0,
            tick_size: 4.0,
            ticklabel_pad: 4.0,
            label_pad: 4.0,
        }
    }
}

/// Description of a curvilinear polar frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    /// Angular extent in radians
    pub theta_range: (f64, f64),
    /// Radial extent in data units
    pub r_range: (f64, f64),
    pub subplot: SubplotSpec,
    pub top: AxisSpec,
    pub bottom: AxisSpec,
    pub left: AxisSpec,
    pub right: AxisSpec,
}

impl FrameSpec {
    pub fn axis(&self, side: AxisSide) -> &AxisSpec {
        match side {
            AxisSide::Top => &self.top,
            AxisSide::Bottom => &self.bottom,
            AxisSide::Left => &self.left,
            AxisSide::Right => &self.right,
        }
    }

    pub fn axis_mut(&mut self, side: AxisSide) -> &mut AxisSpec {
        match side {
            AxisSide::Top => &mut self.top,
            AxisSide::Bottom => &mut self.bottom,
            AxisSide::Left => &mut self.left,
            AxisSide::Right => &mut self.right,
        }
    }
}

/// Text body: plain (possibly multi-line) or a stacked fraction.
#[derive(Debug, Clone, PartialEq)]
pub enum TextContent {
    Plain(String),
    Fraction {
        numerator: String,
        denominator: String,
    },
}

impl TextContent {
    pub fn plain(text: impl Into<String>) -> Self {
        TextContent::Plain(text.into())
    }
}

/// A text element anchored at a coordinate, shifted by a pixel offset
/// (positive `dy` moves up).
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub at: Coord,
    pub offset_px: (f64, f64),
    pub content: TextContent,
    pub style: TextStyle,
}

impl TextItem {
    pub fn new(at: Coord, content: TextContent, style: TextStyle) -> Self {
        Self {
            at,
            offset_px: (0.0, 0.0),
            content,
            style,
        }
    }

    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset_px = (dx, dy);
        self
    }
}

/// Scalar field sampled on a regular (theta, r) grid.
///
/// Values are row-major with one row per angle: `values[i * radii.len() + j]`
/// is the value at `(thetas[i], radii[j])`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarGrid {
    pub thetas: Vec<f64>,
    pub radii: Vec<f64>,
    pub values: Vec<f64>,
}

impl PolarGrid {
    pub fn from_fn(thetas: Vec<f64>, radii: Vec<f64>, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut values = Vec::with_capacity(thetas.len() * radii.len());
        for &theta in &thetas {
            for &r in &radii {
                values.push(f(theta, r));
            }
        }
        Self {
            thetas,
            radii,
            values,
        }
    }

    pub fn value(&self, theta_idx: usize, r_idx: usize) -> f64 {
        self.values[theta_idx * self.radii.len() + r_idx]
    }

    /// (min, max) over finite values, `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Where the legend's anchor point sits on the legend box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLoc {
    #[default]
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSpec {
    pub entries: Vec<LegendEntry>,
    /// Anchor point in axes fraction
    pub anchor: (f64, f64),
    pub loc: LegendLoc,
    /// Label size in points
    pub font_size: f64,
    pub frame_on: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleSpec {
    pub text: String,
    /// Size in points
    pub font_size: f64,
    /// Vertical position in axes fraction; `None` places it just above the frame.
    pub y: Option<f64>,
}

/// A drawing backend.
///
/// Implementations are single-writer: every call mutates the surface and
/// none may be issued concurrently.
pub trait Surface {
    /// Create a new frame at `spec.subplot`.
    fn add_frame(&mut self, spec: &FrameSpec) -> VizResult<FrameId>;

    /// Replace the axis styling of an existing frame. Extents never change.
    fn update_frame(&mut self, frame: FrameId, spec: &FrameSpec) -> VizResult<()>;

    /// Stroke a polyline.
    fn plot(&mut self, frame: FrameId, path: &[Coord], style: &LineStyle) -> VizResult<ArtistId>;

    /// Draw one marker at each point.
    fn scatter(
        &mut self,
        frame: FrameId,
        points: &[Coord],
        marker: &MarkerStyle,
    ) -> VizResult<ArtistId>;

    fn text(&mut self, frame: FrameId, item: &TextItem) -> VizResult<ArtistId>;

    /// Draw iso-lines of `grid` at each of `levels`.
    fn contour(
        &mut self,
        frame: FrameId,
        grid: &PolarGrid,
        levels: &[f64],
        style: &LineStyle,
    ) -> VizResult<ArtistId>;

    fn legend(&mut self, frame: FrameId, spec: &LegendSpec) -> VizResult<ArtistId>;

    fn set_title(&mut self, frame: FrameId, title: &TitleSpec) -> VizResult<ArtistId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subplot_from_code() {
        let spec = SubplotSpec::from_code(121).unwrap();
        assert_eq!(spec, SubplotSpec { nrows: 1, ncols: 2, index: 1 });
        assert_eq!(SubplotSpec::from_code(224).unwrap().cell(), (1, 1));
        assert!(SubplotSpec::from_code(125).is_err());
        assert!(SubplotSpec::from_code(42).is_err());
        assert!(SubplotSpec::from_code(101).is_err());
    }

    #[test]
    fn test_subplot_deserialize_forms() {
        let compact: SubplotSpec = serde_json::from_str("122").unwrap();
        let explicit: SubplotSpec =
            serde_json::from_str(r#"{"nrows": 1, "ncols": 2, "index": 2}"#).unwrap();
        assert_eq!(compact, explicit);
        assert!(serde_json::from_str::<SubplotSpec>("100").is_err());
    }

    #[test]
    fn test_subplot_cell_count_overflow() {
        let err = SubplotSpec::new(70000, 70000, 1).unwrap_err();
        assert!(matches!(err, VizError::InvalidParameter { .. }));

        let parsed =
            serde_json::from_str::<SubplotSpec>(r#"{"nrows": 70000, "ncols": 70000, "index": 1}"#);
        assert!(parsed.is_err());

        assert!(SubplotSpec::new(65536, 65535, 1).is_ok());
    }

    #[test]
    fn test_polar_grid_layout() {
        let grid = PolarGrid::from_fn(vec![0.0, 1.0], vec![10.0, 20.0, 30.0], |t, r| t * 100.0 + r);
        assert_eq!(grid.values.len(), 6);
        assert_eq!(grid.value(1, 2), 130.0);
        assert_eq!(grid.value_range(), Some((10.0, 130.0)));
    }

    #[test]
    fn test_coord_clipping() {
        assert!(Coord::data(0.0, 1.0).is_clipped());
        assert!(!Coord::axes(0.5, 0.5).is_clipped());
    }
}
