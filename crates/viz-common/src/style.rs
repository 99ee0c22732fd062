//! Drawing styles shared between diagram code and rendering backends.
//!
//! Colors, dash patterns, marker shapes and text styles follow the
//! conventions of the plots they reproduce: sizes are in points, marker
//! sizes are areas in points squared, and dash patterns are on/off
//! lengths in points scaled by the line width.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VizError;

/// An RGBA color.
///
/// Parses from names (`"red"`, `"lightgray"`, `"tab:blue"`), hex strings
/// (`"#RRGGBB"` or `"#RRGGBBAA"`) and `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const NONE: Color = Color::rgba(0, 0, 0, 0);
    /// First entry of the default property cycle.
    pub const DEFAULT_CYCLE: Color = Color::rgb(0x1f, 0x77, 0xb4);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Hex form without alpha, as used in SVG attributes.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a 0..1 opacity.
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl FromStr for Color {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex_color(hex)
                .ok_or_else(|| VizError::invalid("color", format!("invalid hex color '{}'", s)));
        }
        named_color(&trimmed.to_lowercase())
            .ok_or_else(|| VizError::invalid("color", format!("unknown color name '{}'", s)))
    }
}

impl TryFrom<String> for Color {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_hex())
        } else if self.a == 0 {
            write!(f, "none")
        } else {
            write!(f, "{}{:02x}", self.to_hex(), self.a)
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    if !s.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    match s.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "none" | "transparent" => Color::NONE,
        "black" | "k" => Color::BLACK,
        "white" | "w" => Color::WHITE,
        "red" | "r" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "g" => Color::rgb(0, 127, 0),
        "blue" | "b" => Color::rgb(0, 0, 255),
        "yellow" | "y" => Color::rgb(255, 255, 0),
        "cyan" | "c" => Color::rgb(0, 255, 255),
        "magenta" | "m" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "brown" => Color::rgb(165, 42, 42),
        "pink" => Color::rgb(255, 192, 203),
        "navy" => Color::rgb(0, 0, 128),
        "darkgreen" => Color::rgb(0, 100, 0),
        "darkblue" => Color::rgb(0, 0, 139),
        "darkred" => Color::rgb(139, 0, 0),
        "gold" => Color::rgb(255, 215, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "darkgray" | "darkgrey" => Color::rgb(169, 169, 169),
        "lightgray" | "lightgrey" => Color::rgb(211, 211, 211),
        "tab:blue" => Color::rgb(0x1f, 0x77, 0xb4),
        "tab:orange" => Color::rgb(0xff, 0x7f, 0x0e),
        "tab:green" => Color::rgb(0x2c, 0xa0, 0x2c),
        "tab:red" => Color::rgb(0xd6, 0x27, 0x28),
        "tab:purple" => Color::rgb(0x94, 0x67, 0xbd),
        "tab:brown" => Color::rgb(0x8c, 0x56, 0x4b),
        "tab:pink" => Color::rgb(0xe3, 0x77, 0xc2),
        "tab:gray" | "tab:grey" => Color::rgb(0x7f, 0x7f, 0x7f),
        "tab:olive" => Color::rgb(0xbc, 0xbd, 0x22),
        "tab:cyan" => Color::rgb(0x17, 0xbe, 0xcf),
        _ => return None,
    };
    Some(color)
}

/// Dash pattern of a stroked line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// Explicit on/off sequence in points, starting `offset` points in.
    Pattern { offset: f64, on_off: Vec<f64> },
}

impl Dash {
    /// The dash pattern used by reference arcs and grid lines.
    pub fn long_dash() -> Self {
        Dash::Pattern {
            offset: 0.0,
            on_off: vec![9.0, 5.0],
        }
    }

    /// On/off lengths in points for a unit line width.
    pub fn on_off(&self) -> Vec<f64> {
        match self {
            Dash::Solid => Vec::new(),
            Dash::Dashed => vec![3.7, 1.6],
            Dash::Dotted => vec![1.0, 1.65],
            Dash::DashDot => vec![6.4, 1.6, 1.0, 1.6],
            Dash::Pattern { on_off, .. } => on_off.clone(),
        }
    }

    pub fn offset(&self) -> f64 {
        match self {
            Dash::Pattern { offset, .. } => *offset,
            _ => 0.0,
        }
    }
}

/// Stroke style for lines and contours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineStyle {
    pub color: Color,
    /// Width in points
    pub width: f64,
    pub dash: Dash,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.5,
            dash: Dash::Solid,
        }
    }
}

impl LineStyle {
    pub fn new(color: Color, width: f64, dash: Dash) -> Self {
        Self { color, width, dash }
    }
}

/// Marker glyphs, named after their single-character codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarkerShape {
    /// `o`
    #[default]
    Circle,
    /// `^`
    TriangleUp,
    /// `v`
    TriangleDown,
    /// `s`
    Square,
    /// `D`
    Diamond,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `x`
    Cross,
    /// `.`
    Point,
}

impl MarkerShape {
    pub fn code(&self) -> &'static str {
        match self {
            MarkerShape::Circle => "o",
            MarkerShape::TriangleUp => "^",
            MarkerShape::TriangleDown => "v",
            MarkerShape::Square => "s",
            MarkerShape::Diamond => "D",
            MarkerShape::Star => "*",
            MarkerShape::Plus => "+",
            MarkerShape::Cross => "x",
            MarkerShape::Point => ".",
        }
    }

    /// Line-art markers are stroked with the face color instead of filled.
    pub fn is_line_art(&self) -> bool {
        matches!(self, MarkerShape::Plus | MarkerShape::Cross)
    }
}

impl FromStr for MarkerShape {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "o" | "circle" => Ok(MarkerShape::Circle),
            "^" | "triangle_up" => Ok(MarkerShape::TriangleUp),
            "v" | "triangle_down" => Ok(MarkerShape::TriangleDown),
            "s" | "square" => Ok(MarkerShape::Square),
            "D" | "diamond" => Ok(MarkerShape::Diamond),
            "*" | "star" => Ok(MarkerShape::Star),
            "+" | "plus" => Ok(MarkerShape::Plus),
            "x" | "cross" => Ok(MarkerShape::Cross),
            "." | "point" => Ok(MarkerShape::Point),
            other => Err(VizError::invalid(
                "marker",
                format!("unknown marker '{}'", other),
            )),
        }
    }
}

impl TryFrom<String> for MarkerShape {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarkerShape> for String {
    fn from(shape: MarkerShape) -> Self {
        shape.code().to_string()
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Default marker area in points squared.
pub const DEFAULT_MARKER_SIZE: f64 = 36.0;

/// Marker appearance for scatter calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Area in points squared
    pub size: f64,
    pub face: Color,
    /// Edge color; `None` draws no outline
    pub edge: Option<Color>,
    /// Edge width in points
    pub line_width: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            shape: MarkerShape::Circle,
            size: DEFAULT_MARKER_SIZE,
            face: Color::DEFAULT_CYCLE,
            edge: None,
            line_width: 1.0,
        }
    }
}

impl MarkerStyle {
    /// Marker radius in points (half the side of the bounding square).
    pub fn radius_pt(&self) -> f64 {
        self.size.max(0.0).sqrt() / 2.0
    }

    /// The color that identifies this marker in legends and labels.
    pub fn key_color(&self) -> Color {
        if self.face.is_transparent() {
            self.edge.unwrap_or(Color::BLACK)
        } else {
            self.face
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    #[default]
    Baseline,
}

/// Text appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// Size in points
    pub font_size: f64,
    pub color: Color,
    pub h_align: HAlign,
    pub v_align: VAlign,
    /// Counter-clockwise rotation in degrees
    pub rotation: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            color: Color::BLACK,
            h_align: HAlign::Left,
            v_align: VAlign::Baseline,
            rotation: 0.0,
        }
    }
}

impl TextStyle {
    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_v_align(mut self, v_align: VAlign) -> Self {
        self.v_align = v_align;
        self
    }

    pub fn with_h_align(mut self, h_align: HAlign) -> Self {
        self.h_align = h_align;
        self
    }
}
