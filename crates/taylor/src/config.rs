//! Diagram and sample-set configuration.
//!
//! Every option a diagram call recognizes is a named field with a
//! default. Configuration loaded from files rejects unknown keys.

use serde::{Deserialize, Serialize};
use viz_common::{Color, MarkerShape, SubplotSpec, VizError, VizResult};

/// Frame fonts and paddings, all in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    pub ticklabel_size: f64,
    pub axislabel_size: f64,
    pub tick_size: f64,
    pub ticklabel_pad: f64,
    pub axislabel_pad: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            ticklabel_size: 16.0,
            axislabel_size: 18.0,
            tick_size: 10.0,
            ticklabel_pad: 8.0,
            axislabel_pad: 6.0,
        }
    }
}

/// Construction parameters of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
    /// Reference standard deviation; must equal one of `std_levels` exactly
    pub refstd: f64,
    /// Radial extent (min, max)
    pub std_range: (f64, f64),
    /// Radial tick positions
    pub std_levels: Vec<f64>,
    /// Label drawn at the `refstd` tick
    pub reference_label: String,
    pub subplot: SubplotSpec,
    pub fonts: FontConfig,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            refstd: 1.0,
            std_range: (0.0, 1.65),
            std_levels: (0..=6).map(|i| i as f64 * 0.25).collect(),
            reference_label: "REF".to_string(),
            subplot: SubplotSpec::default(),
            fonts: FontConfig::default(),
        }
    }
}

impl DiagramConfig {
    pub fn validate(&self) -> VizResult<()> {
        if !self.refstd.is_finite() || self.refstd <= 0.0 {
            return Err(VizError::invalid(
                "refstd",
                format!("must be a positive number, got {}", self.refstd),
            ));
        }

        let (min, max) = self.std_range;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min >= max {
            return Err(VizError::invalid(
                "std_range",
                format!("expected 0 <= min < max, got ({}, {})", min, max),
            ));
        }

        if self.std_levels.is_empty() {
            return Err(VizError::invalid("std_levels", "at least one level is required"));
        }
        for pair in self.std_levels.windows(2) {
            if !(pair[0] < pair[1]) {
                return Err(VizError::invalid(
                    "std_levels",
                    format!("levels must be strictly increasing ({} then {})", pair[0], pair[1]),
                ));
            }
        }
        if let Some(&level) = self
            .std_levels
            .iter()
            .find(|&&level| !level.is_finite() || level < min || level > max)
        {
            return Err(VizError::invalid(
                "std_levels",
                format!("level {} lies outside std_range ({}, {})", level, min, max),
            ));
        }

        // Exact match: the reference label replaces one existing tick
        if !self.std_levels.iter().any(|&level| level == self.refstd) {
            return Err(VizError::invalid(
                "refstd",
                format!(
                    "{} is not one of the std_levels {:?}",
                    self.refstd, self.std_levels
                ),
            ));
        }

        Ok(())
    }
}

/// Options of one `add_model_set` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSetOptions {
    /// Legend label of the set
    pub label: Option<String>,
    /// Marker color, also used for the point labels
    pub color: Option<Color>,
    /// Marker outline; used for labels when `color` is unset
    pub edge_color: Option<Color>,
    /// Marker fill; used for labels when `color` and `edge_color` are unset
    pub face_color: Option<Color>,
    pub marker: Option<MarkerShape>,
    /// Marker area in points squared
    pub size: Option<f64>,
    /// Point label size in points
    pub font_size: f64,
    /// Point label offset from the marker, in pixels
    pub xytext: (f64, f64),
    pub annotate: bool,
    /// Move points outside the frame to the outlier shelf
    pub outlier_handling: bool,
    /// Derive marker size and shape from `bias`
    pub bias_on: bool,
    /// Percent bias per point; required when `bias_on`
    pub bias: Option<Vec<f64>>,
}

impl Default for ModelSetOptions {
    fn default() -> Self {
        Self {
            label: None,
            color: None,
            edge_color: None,
            face_color: None,
            marker: None,
            size: None,
            font_size: 14.0,
            xytext: (-5.0, 7.0),
            annotate: true,
            outlier_handling: false,
            bias_on: false,
            bias: None,
        }
    }
}

impl ModelSetOptions {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn marker(mut self, marker: MarkerShape) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn outlier_handling(mut self, enabled: bool) -> Self {
        self.outlier_handling = enabled;
        self
    }

    /// Enable bias-driven markers with the given per-point bias.
    pub fn with_bias(mut self, bias: Vec<f64>) -> Self {
        self.bias_on = true;
        self.bias = Some(bias);
        self
    }

    /// Color that identifies the set in labels and legends.
    pub fn key_color(&self) -> Option<Color> {
        self.color.or(self.edge_color).or(self.face_color)
    }
}

/// The style subset of [`ModelSetOptions`], with every field optional.
///
/// Used to layer per-set styling over shared defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetStyle {
    pub label: Option<String>,
    pub color: Option<Color>,
    pub marker: Option<MarkerShape>,
    pub size: Option<f64>,
    pub font_size: Option<f64>,
}

impl SetStyle {
    /// Field-wise overlay: a field set in `over` wins, otherwise `base` is kept.
    pub fn merge(base: &SetStyle, over: &SetStyle) -> SetStyle {
        SetStyle {
            label: over.label.clone().or_else(|| base.label.clone()),
            color: over.color.or(base.color),
            marker: over.marker.or(base.marker),
            size: over.size.or(base.size),
            font_size: over.font_size.or(base.font_size),
        }
    }

    /// Copy every set field onto `options`.
    pub fn apply_to(&self, mut options: ModelSetOptions) -> ModelSetOptions {
        if let Some(label) = &self.label {
            options.label = Some(label.clone());
        }
        if let Some(color) = self.color {
            options.color = Some(color);
        }
        if let Some(marker) = self.marker {
            options.marker = Some(marker);
        }
        if let Some(size) = self.size {
            options.size = Some(size);
        }
        if let Some(font_size) = self.font_size {
            options.font_size = font_size;
        }
        options
    }
}
