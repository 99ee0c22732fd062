//! SVG rendering surface.
//!
//! [`SvgSurface`] implements [`Surface`] by laying frames out on a page,
//! projecting polar data coordinates onto each frame's square axes box,
//! and serializing everything as one standalone SVG document. PNG output
//! rasterizes that document.
//!
//! Units: line widths, marker sizes, font sizes and paddings arrive in
//! points and are converted with `dpi / 72`. Text offsets are in pixels.

use std::f64::consts::PI;
use std::fmt::{self, Write as _};
use std::path::Path;

use serde::{Deserialize, Serialize};
use viz_common::{
    ArtistId, AxisSide, Color, Coord, FrameId, FrameSpec, HAlign, LegendLoc, LegendSpec,
    LineStyle, MarkerShape, MarkerStyle, PolarGrid, Surface, TextContent, TextItem, TextStyle,
    TitleSpec, VAlign, VizError, VizResult,
};

use crate::contour::polar_contours;
use crate::png::render_svg_to_png;

// Default sub-plot margins, as fractions of the figure
const SUBPLOT_LEFT: f64 = 0.125;
const SUBPLOT_RIGHT: f64 = 0.9;
const SUBPLOT_BOTTOM: f64 = 0.11;
const SUBPLOT_TOP: f64 = 0.88;
const SUBPLOT_WSPACE: f64 = 0.2;
const SUBPLOT_HSPACE: f64 = 0.2;

/// Frame spine width in points
const AXES_LINE_WIDTH: f64 = 0.8;
/// Title gap above the axes box in points
const TITLE_PAD: f64 = 6.0;

// Font metrics as fractions of the font size
const LINE_HEIGHT: f64 = 1.2;
const ASCENT: f64 = 0.8;
const CHAR_WIDTH: f64 = 0.6;

const FONT_FAMILY: &str = "DejaVu Sans, Bitstream Vera Sans, Arial, sans-serif";

/// Longest angular step between interpolated vertices of a data-space path.
const MAX_ARC_STEP: f64 = PI / 360.0;

/// Page size and background of a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FigureConfig {
    /// Width in inches
    pub width: f64,
    /// Height in inches
    pub height: f64,
    pub dpi: f64,
    pub background: Color,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 8.0,
            dpi: 100.0,
            background: Color::WHITE,
        }
    }
}

impl FigureConfig {
    pub fn validate(&self) -> VizResult<()> {
        for (param, value) in [("width", self.width), ("height", self.height), ("dpi", self.dpi)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(VizError::invalid(
                    param,
                    format!("must be a positive number, got {}", value),
                ));
            }
        }
        Ok(())
    }

    /// Page size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpi).round() as u32,
            (self.height * self.dpi).round() as u32,
        )
    }

    /// Pixels per point.
    pub fn pt_to_px(&self) -> f64 {
        self.dpi / 72.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Layer {
    Lines,
    Markers,
    Text,
    Overlay,
}

#[derive(Debug, Clone)]
struct Element {
    layer: Layer,
    clipped: bool,
    body: String,
}

/// Placement of one frame on the page.
#[derive(Debug, Clone)]
struct FrameLayout {
    spec: FrameSpec,
    /// Axes box in pixels
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    /// Cartesian data extent origin of the sector
    x_min: f64,
    y_min: f64,
    /// Pixels per data unit
    scale: f64,
    elements: Vec<Element>,
}

impl FrameLayout {
    fn new(spec: &FrameSpec, figure: &FigureConfig) -> VizResult<Self> {
        let (t0, t1) = spec.theta_range;
        let (r0, r1) = spec.r_range;
        if !(t0.is_finite() && t1.is_finite() && t0 < t1) {
            return Err(VizError::invalid(
                "theta_range",
                format!("expected finite min < max, got ({}, {})", t0, t1),
            ));
        }
        if !(r0.is_finite() && r1.is_finite() && r0 >= 0.0 && r0 < r1) {
            return Err(VizError::invalid(
                "r_range",
                format!("expected finite 0 <= min < max, got ({}, {})", r0, r1),
            ));
        }

        let (page_w, page_h) = figure.pixel_size();
        let (cell_left, cell_top, cell_w, cell_h) =
            subplot_cell(spec.subplot.nrows, spec.subplot.ncols, spec.subplot.cell());
        let cell_left = cell_left * page_w as f64;
        let cell_top = cell_top * page_h as f64;
        let cell_w = cell_w * page_w as f64;
        let cell_h = cell_h * page_h as f64;

        // Equal aspect: shrink the cell to the sector's shape, centered
        let (x_min, x_max, y_min, y_max) = sector_extent(spec.theta_range, spec.r_range);
        let scale = (cell_w / (x_max - x_min)).min(cell_h / (y_max - y_min));
        let width = (x_max - x_min) * scale;
        let height = (y_max - y_min) * scale;

        Ok(Self {
            spec: spec.clone(),
            left: cell_left + (cell_w - width) / 2.0,
            top: cell_top + (cell_h - height) / 2.0,
            width,
            height,
            x_min,
            y_min,
            scale,
            elements: Vec::new(),
        })
    }

    fn data_to_px(&self, theta: f64, r: f64) -> (f64, f64) {
        let x = r * theta.cos();
        let y = r * theta.sin();
        (
            self.left + (x - self.x_min) * self.scale,
            self.top + self.height - (y - self.y_min) * self.scale,
        )
    }

    fn axes_to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (self.left + x * self.width, self.top + (1.0 - y) * self.height)
    }

    fn project(&self, coord: Coord) -> (f64, f64) {
        match coord {
            Coord::Data { theta, r } => self.data_to_px(theta, r),
            Coord::Axes { x, y } => self.axes_to_px(x, y),
        }
    }

    /// Project a path, following arcs between consecutive data-space vertices.
    fn project_path(&self, path: &[Coord]) -> Vec<(f64, f64)> {
        let mut points = Vec::with_capacity(path.len());
        let mut previous: Option<Coord> = None;

        for &coord in path {
            if let (Some(Coord::Data { theta: t0, r: r0 }), Coord::Data { theta, r }) =
                (previous, coord)
            {
                let steps = ((theta - t0).abs() / MAX_ARC_STEP).ceil();
                if steps.is_finite() && steps > 1.0 {
                    let steps = steps as usize;
                    for s in 1..steps {
                        let f = s as f64 / steps as f64;
                        points.push(self.data_to_px(t0 + f * (theta - t0), r0 + f * (r - r0)));
                    }
                }
            }
            points.push(self.project(coord));
            previous = Some(coord);
        }

        points
    }

    fn push(&mut self, layer: Layer, clipped: bool, body: String) {
        self.elements.push(Element {
            layer,
            clipped,
            body,
        });
    }
}

/// Figure-fraction box (left, top, width, height) of a sub-plot cell.
///
/// `top` is measured downward from the top edge of the page.
fn subplot_cell(nrows: u32, ncols: u32, (row, col): (u32, u32)) -> (f64, f64, f64, f64) {
    let total_w = SUBPLOT_RIGHT - SUBPLOT_LEFT;
    let total_h = SUBPLOT_TOP - SUBPLOT_BOTTOM;
    let cell_w = total_w / (ncols as f64 + SUBPLOT_WSPACE * (ncols as f64 - 1.0));
    let cell_h = total_h / (nrows as f64 + SUBPLOT_HSPACE * (nrows as f64 - 1.0));

    let left = SUBPLOT_LEFT + col as f64 * cell_w * (1.0 + SUBPLOT_WSPACE);
    let top = (1.0 - SUBPLOT_TOP) + row as f64 * cell_h * (1.0 + SUBPLOT_HSPACE);
    (left, top, cell_w, cell_h)
}

/// Cartesian bounding box (x_min, x_max, y_min, y_max) of an annulus sector.
fn sector_extent(theta: (f64, f64), r: (f64, f64)) -> (f64, f64, f64, f64) {
    let mut angles: Vec<f64> = (0..=90)
        .map(|i| theta.0 + (theta.1 - theta.0) * i as f64 / 90.0)
        .collect();
    let mut k = (theta.0 / (PI / 2.0)).ceil() as i64;
    while k as f64 * PI / 2.0 <= theta.1 {
        angles.push(k as f64 * PI / 2.0);
        k += 1;
    }

    let mut extent = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &angle in &angles {
        for radius in [r.0, r.1] {
            // Snap cos/sin of axis angles so the box edge lands exactly on zero
            let x = clean(radius * angle.cos());
            let y = clean(radius * angle.sin());
            extent.0 = extent.0.min(x);
            extent.1 = extent.1.max(x);
            extent.2 = extent.2.min(y);
            extent.3 = extent.3.max(y);
        }
    }
    extent
}

fn clean(v: f64) -> f64 {
    if v.abs() < 1e-12 {
        0.0
    } else {
        v
    }
}

/// A [`Surface`] that renders to a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    config: FigureConfig,
    frames: Vec<FrameLayout>,
    next_artist: ArtistId,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self {
            config: FigureConfig::default(),
            frames: Vec::new(),
            next_artist: 0,
        }
    }
}

impl SvgSurface {
    pub fn new(config: FigureConfig) -> VizResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frames: Vec::new(),
            next_artist: 0,
        })
    }

    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Axes box of a frame in pixels: (left, top, width, height).
    pub fn frame_box(&self, frame: FrameId) -> VizResult<(f64, f64, f64, f64)> {
        let layout = self.layout(frame)?;
        Ok((layout.left, layout.top, layout.width, layout.height))
    }

    /// Pixel position of a coordinate in a frame.
    pub fn project(&self, frame: FrameId, coord: Coord) -> VizResult<(f64, f64)> {
        Ok(self.layout(frame)?.project(coord))
    }

    fn layout(&self, frame: FrameId) -> VizResult<&FrameLayout> {
        self.frames.get(frame.0).ok_or(VizError::UnknownFrame(frame.0))
    }

    fn layout_mut(&mut self, frame: FrameId) -> VizResult<&mut FrameLayout> {
        self.frames
            .get_mut(frame.0)
            .ok_or(VizError::UnknownFrame(frame.0))
    }

    fn next_id(&mut self) -> ArtistId {
        let id = self.next_artist;
        self.next_artist += 1;
        id
    }

    /// Serialize the figure.
    pub fn to_svg_string(&self) -> VizResult<String> {
        let svg = self
            .write_document()
            .map_err(|_| VizError::Render("failed to format SVG document".to_string()))?;
        tracing::info!(
            bytes = svg.len(),
            frames = self.frames.len(),
            "Rendered SVG document"
        );
        Ok(svg)
    }

    /// Rasterize the figure to PNG bytes.
    pub fn to_png(&self) -> VizResult<Vec<u8>> {
        let png = render_svg_to_png(&self.to_svg_string()?)?;
        tracing::info!(bytes = png.len(), "Encoded PNG image");
        Ok(png)
    }

    /// Write the figure to `path`; `.png` rasterizes, anything else is SVG.
    pub fn save(&self, path: &Path) -> VizResult<()> {
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);

        if is_png {
            std::fs::write(path, self.to_png()?)?;
        } else {
            std::fs::write(path, self.to_svg_string()?)?;
        }
        Ok(())
    }

    fn write_document(&self) -> Result<String, fmt::Error> {
        let (width, height) = self.config.pixel_size();
        let pt = self.config.pt_to_px();
        let mut out = String::new();

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        )?;
        if !self.config.background.is_transparent() {
            writeln!(
                out,
                r#"<rect x="0" y="0" width="{}" height="{}" {}/>"#,
                width,
                height,
                fill_attr(self.config.background)
            )?;
        }

        writeln!(out, "<defs>")?;
        for (index, layout) in self.frames.iter().enumerate() {
            writeln!(
                out,
                r#"<clipPath id="frame-clip-{}"><path d="{}"/></clipPath>"#,
                index,
                sector_outline(layout)
            )?;
        }
        writeln!(out, "</defs>")?;

        for (index, layout) in self.frames.iter().enumerate() {
            writeln!(out, r#"<g id="frame-{}">"#, index)?;
            write_layer(&mut out, index, layout, Layer::Lines)?;
            write_frame_axes(&mut out, layout, pt)?;
            for layer in [Layer::Markers, Layer::Text, Layer::Overlay] {
                write_layer(&mut out, index, layout, layer)?;
            }
            writeln!(out, "</g>")?;
        }

        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

fn write_layer(out: &mut String, index: usize, layout: &FrameLayout, layer: Layer) -> fmt::Result {
    let (clipped, free): (Vec<&Element>, Vec<&Element>) = layout
        .elements
        .iter()
        .filter(|e| e.layer == layer)
        .partition(|e| e.clipped);

    if !clipped.is_empty() {
        writeln!(out, r#"<g clip-path="url(#frame-clip-{})">"#, index)?;
        for element in clipped {
            out.push_str(&element.body);
        }
        writeln!(out, "</g>")?;
    }
    for element in free {
        out.push_str(&element.body);
    }
    Ok(())
}

/// Closed outline of the frame's annulus sector, in pixels.
fn sector_outline(layout: &FrameLayout) -> String {
    let (t0, t1) = layout.spec.theta_range;
    let (r0, r1) = layout.spec.r_range;
    let outer = [Coord::data(t0, r1), Coord::data(t1, r1)];
    let mut points = layout.project_path(&outer);
    if r0 > 0.0 {
        points.extend(layout.project_path(&[Coord::data(t1, r0), Coord::data(t0, r0)]));
    } else {
        points.push(layout.data_to_px(t0, 0.0));
    }
    let mut d = path_data(&points);
    d.push('Z');
    d
}

/// SVG path data; non-finite points break the path.
fn path_data(points: &[(f64, f64)]) -> String {
    let mut d = String::with_capacity(points.len() * 16);
    let mut pen_down = false;
    for &(x, y) in points {
        if !(x.is_finite() && y.is_finite()) {
            pen_down = false;
            continue;
        }
        let cmd = if pen_down { 'L' } else { 'M' };
        let _ = write!(d, "{}{:.2} {:.2} ", cmd, x, y);
        pen_down = true;
    }
    d.trim_end().to_string()
}

fn fill_attr(color: Color) -> String {
    if color.is_transparent() {
        return r#"fill="none""#.to_string();
    }
    let mut attr = format!(r#"fill="{}""#, color.to_hex());
    if color.a < 255 {
        let _ = write!(attr, r#" fill-opacity="{:.3}""#, color.opacity());
    }
    attr
}

fn stroke_attr(color: Color, width_px: f64) -> String {
    if color.is_transparent() || width_px <= 0.0 {
        return r#"stroke="none""#.to_string();
    }
    let mut attr = format!(r#"stroke="{}" stroke-width="{:.2}""#, color.to_hex(), width_px);
    if color.a < 255 {
        let _ = write!(attr, r#" stroke-opacity="{:.3}""#, color.opacity());
    }
    attr
}

/// Stroke attributes of a line; dash lengths scale with the line width.
fn line_attrs(style: &LineStyle, pt: f64) -> String {
    let width_px = style.width * pt;
    let mut attrs = stroke_attr(style.color, width_px);
    let dashes = style.dash.on_off();
    if !dashes.is_empty() && style.width > 0.0 {
        let scaled: Vec<String> = dashes
            .iter()
            .map(|d| format!("{:.2}", d * width_px))
            .collect();
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, scaled.join(","));
        let offset = style.dash.offset();
        if offset != 0.0 {
            let _ = write!(attrs, r#" stroke-dashoffset="{:.2}""#, offset * width_px);
        }
    }
    attrs
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn estimate_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * CHAR_WIDTH * font_px
}

/// Marker glyph centered on `(cx, cy)` with radius `radius` pixels.
fn write_marker(
    out: &mut String,
    cx: f64,
    cy: f64,
    radius: f64,
    marker: &MarkerStyle,
    pt: f64,
) -> fmt::Result {
    let edge_px = marker.line_width * pt;
    let paint = if marker.shape.is_line_art() {
        format!(
            r#"fill="none" {}"#,
            stroke_attr(marker.edge.unwrap_or(marker.face), edge_px.max(pt))
        )
    } else {
        format!(
            "{} {}",
            fill_attr(marker.face),
            marker
                .edge
                .map(|edge| stroke_attr(edge, edge_px))
                .unwrap_or_else(|| r#"stroke="none""#.to_string())
        )
    };

    let vertices: Vec<(f64, f64)> = match marker.shape {
        MarkerShape::Circle | MarkerShape::Point => {
            let r = if marker.shape == MarkerShape::Point {
                radius * 0.5
            } else {
                radius
            };
            return writeln!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
                cx, cy, r, paint
            );
        }
        MarkerShape::Plus => {
            return writeln!(
                out,
                r#"<path d="M{:.2} {:.2} L{:.2} {:.2} M{:.2} {:.2} L{:.2} {:.2}" {}/>"#,
                cx - radius, cy, cx + radius, cy, cx, cy - radius, cx, cy + radius, paint
            );
        }
        MarkerShape::Cross => {
            let d = radius * std::f64::consts::FRAC_1_SQRT_2;
            return writeln!(
                out,
                r#"<path d="M{:.2} {:.2} L{:.2} {:.2} M{:.2} {:.2} L{:.2} {:.2}" {}/>"#,
                cx - d, cy - d, cx + d, cy + d, cx - d, cy + d, cx + d, cy - d, paint
            );
        }
        MarkerShape::TriangleUp => vec![(0.0, -1.0), (-1.0, 1.0), (1.0, 1.0)],
        MarkerShape::TriangleDown => vec![(0.0, 1.0), (-1.0, -1.0), (1.0, -1.0)],
        MarkerShape::Square => vec![(-0.8, -0.8), (0.8, -0.8), (0.8, 0.8), (-0.8, 0.8)],
        MarkerShape::Diamond => vec![(0.0, -1.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)],
        MarkerShape::Star => (0..10)
            .map(|i| {
                let angle = PI / 2.0 + i as f64 * PI / 5.0;
                let scale = if i % 2 == 0 { 1.0 } else { 0.381966 };
                (scale * angle.cos(), -scale * angle.sin())
            })
            .collect(),
    };

    let points: Vec<(f64, f64)> = vertices
        .iter()
        .map(|(x, y)| (cx + x * radius, cy + y * radius))
        .collect();
    writeln!(out, r#"<path d="{}Z" {}/>"#, path_data(&points), paint)
}

/// Write (possibly multi-line) text anchored at `(x, y)` pixels.
///
/// Alignment is applied in the text's own frame before rotation.
fn write_text_block(
    out: &mut String,
    x: f64,
    y: f64,
    text: &str,
    style: &TextStyle,
    pt: f64,
) -> fmt::Result {
    let font_px = style.font_size * pt;
    let line_px = LINE_HEIGHT * font_px;
    let lines: Vec<&str> = text.split('\n').collect();
    let block_h = lines.len() as f64 * line_px;

    let first_baseline = match style.v_align {
        VAlign::Top => y + ASCENT * font_px,
        VAlign::Center => y - block_h / 2.0 + ASCENT * font_px,
        VAlign::Bottom => y - block_h + ASCENT * font_px,
        VAlign::Baseline => y,
    };
    let anchor = match style.h_align {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    };

    write!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" text-anchor="{}" {} xml:space="preserve""#,
        x,
        first_baseline,
        FONT_FAMILY,
        font_px,
        anchor,
        fill_attr(style.color)
    )?;
    if style.rotation != 0.0 {
        write!(out, r#" transform="rotate({:.2} {:.2} {:.2})""#, -style.rotation, x, y)?;
    }
    out.push('>');

    if lines.len() == 1 {
        out.push_str(&escape_xml(text));
    } else {
        for (i, line) in lines.iter().enumerate() {
            write!(
                out,
                r#"<tspan x="{:.2}" y="{:.2}">{}</tspan>"#,
                x,
                first_baseline + i as f64 * line_px,
                escape_xml(line)
            )?;
        }
    }
    writeln!(out, "</text>")
}

/// Numerator over a bar over denominator.
fn write_fraction(
    out: &mut String,
    x: f64,
    y: f64,
    numerator: &str,
    denominator: &str,
    style: &TextStyle,
    pt: f64,
) -> fmt::Result {
    let font_px = style.font_size * pt;
    let width = estimate_width(numerator, font_px).max(estimate_width(denominator, font_px));
    let half_h = LINE_HEIGHT * font_px;

    let cx = match style.h_align {
        HAlign::Left => x + width / 2.0,
        HAlign::Center => x,
        HAlign::Right => x - width / 2.0,
    };
    let bar_y = match style.v_align {
        VAlign::Top => y + half_h,
        VAlign::Center => y,
        VAlign::Bottom | VAlign::Baseline => y - half_h,
    };

    writeln!(out, r#"<g>"#)?;
    let centered = style.clone().with_h_align(HAlign::Center);
    let num_style = centered.clone().with_v_align(VAlign::Baseline);
    write_text_block(out, cx, bar_y - 0.25 * font_px, numerator, &num_style, pt)?;
    writeln!(
        out,
        r#"<path d="M{:.2} {:.2} L{:.2} {:.2}" {}/>"#,
        cx - width / 2.0,
        bar_y,
        cx + width / 2.0,
        bar_y,
        stroke_attr(style.color, (font_px / 18.0).max(0.5))
    )?;
    let den_style = centered.with_v_align(VAlign::Top);
    write_text_block(out, cx, bar_y + 0.2 * font_px, denominator, &den_style, pt)?;
    writeln!(out, "</g>")
}

/// Alignment that keeps text on the side of `(dx, dy)` (screen space, y down).
fn align_away(dx: f64, dy: f64) -> (HAlign, VAlign) {
    let h = if dx > 0.3 {
        HAlign::Left
    } else if dx < -0.3 {
        HAlign::Right
    } else {
        HAlign::Center
    };
    let v = if dy < -0.3 {
        VAlign::Bottom
    } else if dy > 0.3 {
        VAlign::Top
    } else {
        VAlign::Center
    };
    (h, v)
}

fn write_frame_axes(out: &mut String, layout: &FrameLayout, pt: f64) -> fmt::Result {
    for side in [AxisSide::Bottom, AxisSide::Left, AxisSide::Right, AxisSide::Top] {
        match side {
            AxisSide::Top | AxisSide::Bottom => write_arc_axis(out, layout, side, pt)?,
            AxisSide::Left | AxisSide::Right => write_radial_axis(out, layout, side, pt)?,
        }
    }
    Ok(())
}

fn spine_style() -> LineStyle {
    LineStyle::new(Color::BLACK, AXES_LINE_WIDTH, viz_common::Dash::Solid)
}

/// Outer or inner arc; ticks are angles.
fn write_arc_axis(out: &mut String, layout: &FrameLayout, side: AxisSide, pt: f64) -> fmt::Result {
    let axis = layout.spec.axis(side);
    let (t0, t1) = layout.spec.theta_range;
    let (r0, r1) = layout.spec.r_range;
    let (radius, outward) = if side == AxisSide::Top { (r1, 1.0) } else { (r0, -1.0) };
    if !axis.visible || radius <= 0.0 {
        return Ok(());
    }

    let spine = layout.project_path(&[Coord::data(t0, radius), Coord::data(t1, radius)]);
    writeln!(
        out,
        r#"<path d="{}" fill="none" {}/>"#,
        path_data(&spine),
        line_attrs(&spine_style(), pt)
    )?;

    let tick_len = axis.tick_size * pt;
    let pad = axis.ticklabel_pad * pt;
    let label_style = TextStyle::sized(axis.ticklabel_size);
    let eps = 1e-9;

    for tick in axis.ticks.iter().filter(|t| t.value >= t0 - eps && t.value <= t1 + eps) {
        let (px, py) = layout.data_to_px(tick.value, radius);
        // Screen-space unit vector pointing away from the sector
        let ux = outward * tick.value.cos();
        let uy = -outward * tick.value.sin();
        writeln!(
            out,
            r#"<path d="M{:.2} {:.2} L{:.2} {:.2}" {}/>"#,
            px,
            py,
            px - ux * tick_len,
            py - uy * tick_len,
            line_attrs(&spine_style(), pt)
        )?;
        if axis.show_ticklabels {
            let (h, v) = align_away(ux, uy);
            let style = label_style.clone().with_h_align(h).with_v_align(v);
            write_text_block(out, px + ux * pad, py + uy * pad, &tick.label, &style, pt)?;
        }
    }

    if let Some(label) = &axis.label {
        let mid = (t0 + t1) / 2.0;
        let (px, py) = layout.data_to_px(mid, radius);
        let reach = pad
            + if axis.show_ticklabels {
                LINE_HEIGHT * axis.ticklabel_size * pt
            } else {
                0.0
            }
            + axis.label_pad * pt;
        let ux = outward * mid.cos();
        let uy = -outward * mid.sin();
        let style = TextStyle {
            rotation: mid.to_degrees() - 90.0,
            h_align: HAlign::Center,
            v_align: if outward > 0.0 { VAlign::Bottom } else { VAlign::Top },
            ..TextStyle::sized(axis.label_size)
        };
        write_text_block(out, px + ux * reach, py + uy * reach, label, &style, pt)?;
    }
    Ok(())
}

/// Straight edge at the first or last angle; ticks are radii.
fn write_radial_axis(
    out: &mut String,
    layout: &FrameLayout,
    side: AxisSide,
    pt: f64,
) -> fmt::Result {
    let axis = layout.spec.axis(side);
    if !axis.visible {
        return Ok(());
    }
    let (t0, t1) = layout.spec.theta_range;
    let (r0, r1) = layout.spec.r_range;
    let theta = if side == AxisSide::Left { t0 } else { t1 };

    // Outward normal in screen space (y down)
    let (nx, ny) = if side == AxisSide::Left {
        (theta.sin(), theta.cos())
    } else {
        (-theta.sin(), -theta.cos())
    };

    let (sx, sy) = layout.data_to_px(theta, r0);
    let (ex, ey) = layout.data_to_px(theta, r1);
    writeln!(
        out,
        r#"<path d="M{:.2} {:.2} L{:.2} {:.2}" fill="none" {}/>"#,
        sx,
        sy,
        ex,
        ey,
        line_attrs(&spine_style(), pt)
    )?;

    let tick_len = axis.tick_size * pt;
    let pad = axis.ticklabel_pad * pt;
    let label_px = axis.ticklabel_size * pt;
    let label_style = TextStyle::sized(axis.ticklabel_size);
    let eps = 1e-9;
    let mut widest: f64 = 0.0;

    for tick in axis.ticks.iter().filter(|t| t.value >= r0 - eps && t.value <= r1 + eps) {
        let (px, py) = layout.data_to_px(theta, tick.value);
        writeln!(
            out,
            r#"<path d="M{:.2} {:.2} L{:.2} {:.2}" {}/>"#,
            px,
            py,
            px - nx * tick_len,
            py - ny * tick_len,
            line_attrs(&spine_style(), pt)
        )?;
        if axis.show_ticklabels {
            let (h, v) = align_away(nx, ny);
            let style = label_style.clone().with_h_align(h).with_v_align(v);
            write_text_block(out, px + nx * pad, py + ny * pad, &tick.label, &style, pt)?;
            widest = widest.max(estimate_width(&tick.label, label_px));
        }
    }

    if let Some(label) = &axis.label {
        let mid = (r0 + r1) / 2.0;
        let (px, py) = layout.data_to_px(theta, mid);
        let extent = if axis.show_ticklabels {
            nx.abs() * widest + ny.abs() * LINE_HEIGHT * label_px
        } else {
            0.0
        };
        let reach = pad + extent + axis.label_pad * pt;

        let mut rotation = theta.to_degrees();
        if rotation > 90.0 + 1e-9 {
            rotation -= 180.0;
        }
        // Text "up" in screen space after a counter-clockwise rotation
        let rad = rotation.to_radians();
        let (up_x, up_y) = (-rad.sin(), -rad.cos());
        let v_align = if up_x * nx + up_y * ny > 0.0 {
            VAlign::Bottom
        } else {
            VAlign::Top
        };
        let style = TextStyle {
            rotation,
            h_align: HAlign::Center,
            v_align,
            ..TextStyle::sized(axis.label_size)
        };
        write_text_block(out, px + nx * reach, py + ny * reach, label, &style, pt)?;
    }
    Ok(())
}

fn legend_corner(loc: LegendLoc, anchor: (f64, f64), size: (f64, f64), pad: f64) -> (f64, f64) {
    let (ax, ay) = anchor;
    let (w, h) = size;
    match loc {
        LegendLoc::UpperRight => (ax - pad - w, ay + pad),
        LegendLoc::UpperLeft => (ax + pad, ay + pad),
        LegendLoc::LowerLeft => (ax + pad, ay - pad - h),
        LegendLoc::LowerRight => (ax - pad - w, ay - pad - h),
        LegendLoc::Center => (ax - w / 2.0, ay - h / 2.0),
    }
}

fn format_error(_: fmt::Error) -> VizError {
    VizError::Render("failed to format SVG element".to_string())
}

impl Surface for SvgSurface {
    fn add_frame(&mut self, spec: &FrameSpec) -> VizResult<FrameId> {
        let layout = FrameLayout::new(spec, &self.config)?;
        tracing::debug!(
            frame = self.frames.len(),
            left = layout.left,
            top = layout.top,
            width = layout.width,
            height = layout.height,
            "Added frame"
        );
        self.frames.push(layout);
        Ok(FrameId(self.frames.len() - 1))
    }

    fn update_frame(&mut self, frame: FrameId, spec: &FrameSpec) -> VizResult<()> {
        let layout = self.layout_mut(frame)?;
        let theta_range = layout.spec.theta_range;
        let r_range = layout.spec.r_range;
        let subplot = layout.spec.subplot;
        layout.spec = FrameSpec {
            theta_range,
            r_range,
            subplot,
            ..spec.clone()
        };
        Ok(())
    }

    fn plot(&mut self, frame: FrameId, path: &[Coord], style: &LineStyle) -> VizResult<ArtistId> {
        let pt = self.config.pt_to_px();
        let layout = self.layout_mut(frame)?;
        let points = layout.project_path(path);
        let clipped = path.iter().any(Coord::is_clipped);

        let mut body = String::new();
        writeln!(
            body,
            r#"<path d="{}" fill="none" stroke-linecap="butt" {}/>"#,
            path_data(&points),
            line_attrs(style, pt)
        )
        .map_err(format_error)?;
        layout.push(Layer::Lines, clipped, body);

        tracing::debug!(frame = frame.0, vertices = points.len(), "Plotted path");
        Ok(self.next_id())
    }

    fn scatter(
        &mut self,
        frame: FrameId,
        points: &[Coord],
        marker: &MarkerStyle,
    ) -> VizResult<ArtistId> {
        let pt = self.config.pt_to_px();
        let radius = marker.radius_pt() * pt;
        let layout = self.layout_mut(frame)?;

        let mut clipped_body = String::new();
        let mut free_body = String::new();
        for &coord in points {
            let (x, y) = layout.project(coord);
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let body = if coord.is_clipped() {
                &mut clipped_body
            } else {
                &mut free_body
            };
            write_marker(body, x, y, radius, marker, pt).map_err(format_error)?;
        }
        if !clipped_body.is_empty() {
            layout.push(Layer::Markers, true, clipped_body);
        }
        if !free_body.is_empty() {
            layout.push(Layer::Markers, false, free_body);
        }

        tracing::debug!(
            frame = frame.0,
            count = points.len(),
            marker = marker.shape.code(),
            size = marker.size,
            "Scattered markers"
        );
        Ok(self.next_id())
    }

    fn text(&mut self, frame: FrameId, item: &TextItem) -> VizResult<ArtistId> {
        let pt = self.config.pt_to_px();
        let layout = self.layout_mut(frame)?;
        let (x, y) = layout.project(item.at);
        let (x, y) = (x + item.offset_px.0, y - item.offset_px.1);

        let mut body = String::new();
        match &item.content {
            TextContent::Plain(text) => write_text_block(&mut body, x, y, text, &item.style, pt),
            TextContent::Fraction {
                numerator,
                denominator,
            } => write_fraction(&mut body, x, y, numerator, denominator, &item.style, pt),
        }
        .map_err(format_error)?;
        layout.push(Layer::Text, false, body);

        Ok(self.next_id())
    }

    fn contour(
        &mut self,
        frame: FrameId,
        grid: &PolarGrid,
        levels: &[f64],
        style: &LineStyle,
    ) -> VizResult<ArtistId> {
        if grid.values.len() != grid.thetas.len() * grid.radii.len() {
            return Err(VizError::LengthMismatch {
                name: "grid values".to_string(),
                expected: grid.thetas.len() * grid.radii.len(),
                actual: grid.values.len(),
            });
        }

        let pt = self.config.pt_to_px();
        let contours = polar_contours(grid, levels);
        let layout = self.layout_mut(frame)?;

        let mut body = String::new();
        writeln!(body, r#"<g fill="none" {}>"#, line_attrs(style, pt)).map_err(format_error)?;
        for contour in &contours {
            let points: Vec<(f64, f64)> = contour
                .points
                .iter()
                .map(|&(theta, r)| layout.data_to_px(theta, r))
                .collect();
            if points.len() == 1 {
                // Zero-length stroke with round caps draws a dot
                writeln!(
                    body,
                    r#"<path data-level="{}" d="{} h0" stroke-linecap="round"/>"#,
                    contour.level,
                    path_data(&points)
                )
                .map_err(format_error)?;
                continue;
            }
            let close = if contour.closed { "Z" } else { "" };
            writeln!(
                body,
                r#"<path data-level="{}" d="{}{}"/>"#,
                contour.level,
                path_data(&points),
                close
            )
            .map_err(format_error)?;
        }
        writeln!(body, "</g>").map_err(format_error)?;
        layout.push(Layer::Lines, true, body);

        tracing::debug!(
            frame = frame.0,
            levels = levels.len(),
            polylines = contours.len(),
            "Drew contour set"
        );
        Ok(self.next_id())
    }

    fn legend(&mut self, frame: FrameId, spec: &LegendSpec) -> VizResult<ArtistId> {
        let pt = self.config.pt_to_px();
        let layout = self.layout_mut(frame)?;

        let font_px = spec.font_size * pt;
        let handle_w = 2.0 * font_px;
        let text_pad = 0.8 * font_px;
        let border_pad = 0.4 * font_px;
        let row_gap = 0.5 * font_px;
        let row_h = font_px.max(
            spec.entries
                .iter()
                .map(|e| 2.0 * e.marker.radius_pt() * pt)
                .fold(0.0, f64::max),
        );

        let label_w = spec
            .entries
            .iter()
            .map(|e| estimate_width(&e.label, font_px))
            .fold(0.0, f64::max);
        let n = spec.entries.len() as f64;
        let width = 2.0 * border_pad + handle_w + text_pad + label_w;
        let height = 2.0 * border_pad + n * row_h + (n - 1.0).max(0.0) * row_gap;

        let anchor = layout.axes_to_px(spec.anchor.0, spec.anchor.1);
        let (left, top) = legend_corner(spec.loc, anchor, (width, height), 0.5 * font_px);

        let mut body = String::new();
        let mut write = || -> fmt::Result {
            writeln!(body, r#"<g class="legend">"#)?;
            if spec.frame_on {
                writeln!(
                    body,
                    r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" fill="#ffffff" fill-opacity="0.8" {}/>"##,
                    left,
                    top,
                    width,
                    height,
                    0.2 * font_px,
                    stroke_attr(Color::rgb(0xcc, 0xcc, 0xcc), pt)
                )?;
            }
            for (i, entry) in spec.entries.iter().enumerate() {
                let cy = top + border_pad + i as f64 * (row_h + row_gap) + row_h / 2.0;
                let cx = left + border_pad + handle_w / 2.0;
                write_marker(&mut body, cx, cy, entry.marker.radius_pt() * pt, &entry.marker, pt)?;
                let style = TextStyle::sized(spec.font_size).with_v_align(VAlign::Center);
                write_text_block(
                    &mut body,
                    left + border_pad + handle_w + text_pad,
                    cy,
                    &entry.label,
                    &style,
                    pt,
                )?;
            }
            writeln!(body, "</g>")
        };
        write().map_err(format_error)?;
        layout.push(Layer::Overlay, false, body);

        tracing::debug!(frame = frame.0, entries = spec.entries.len(), "Placed legend");
        Ok(self.next_id())
    }

    fn set_title(&mut self, frame: FrameId, title: &TitleSpec) -> VizResult<ArtistId> {
        let pt = self.config.pt_to_px();
        let layout = self.layout_mut(frame)?;

        let (x, y) = match title.y {
            Some(y) => layout.axes_to_px(0.5, y),
            None => {
                let (x, y) = layout.axes_to_px(0.5, 1.0);
                (x, y - TITLE_PAD * pt)
            }
        };
        let style = TextStyle::sized(title.font_size)
            .with_h_align(HAlign::Center)
            .with_v_align(VAlign::Baseline);

        let mut body = String::new();
        write_text_block(&mut body, x, y, &title.text, &style, pt).map_err(format_error)?;
        layout.push(Layer::Overlay, false, body);

        Ok(self.next_id())
    }
}
