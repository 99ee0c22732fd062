//! Plot description files.
//!
//! A plot file describes one Taylor diagram: the figure, the diagram
//! frame, shared sample-set styling, the sample sets themselves and any
//! decorations. YAML (`.yaml`, `.yml`) and JSON (`.json`) are accepted;
//! unknown keys are rejected.
//!
//! A set with `bias` takes its marker shape and size from the bias values,
//! so neither `defaults` nor its own `style` may set `marker` or `size`.
//!
//! ```yaml
//! diagram:
//!   refstd: 1.0
//! defaults:
//!   font_size: 13
//! title:
//!   text: Model comparison
//! model_sets:
//!   - stddev: [1.230, 0.988, 1.092]
//!     corrcoef: [0.958, 0.973, 0.740]
//!     style: { label: Model A, color: red }
//!   - stddev: [1.129, 0.996, 1.016]
//!     corrcoef: [0.963, 0.975, 0.801]
//!     bias: [2.0, -12.0, 25.0]
//!     style: { label: Model B, color: blue }
//! contours:
//!   levels: [0.5, 1.0]
//! legend: {}
//! ```

use anyhow::{bail, Context, Result};
use renderer::{FigureConfig, SvgSurface};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use taylor::{
    corr_grid_style, major_grid_style, std_grid_style, ContourOptions, DiagramConfig, FontSizes,
    GridAxis, LegendOptions, ModelNameOptions, ModelSetOptions, SetStyle, TaylorDiagram,
    TitleOptions,
};
use tracing::{debug, info};
use viz_common::{LineStyle, Surface, VizResult};

// ============================================================================
// File layout
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotFile {
    pub figure: FigureConfig,
    pub diagram: DiagramConfig,
    /// Styling every model set starts from
    pub defaults: SetStyle,
    pub title: Option<TitleEntry>,
    pub model_sets: Vec<ModelSetEntry>,
    pub contours: Option<ContourOptions>,
    pub corr_grid: Option<CorrGridEntry>,
    pub std_grid: Option<StdGridEntry>,
    pub grid: Option<MajorGridEntry>,
    pub model_names: Option<ModelNamesEntry>,
    pub bias_legend: bool,
    pub legend: Option<LegendOptions>,
    pub fonts: Option<FontSizes>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleEntry {
    pub text: String,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl TitleEntry {
    fn options(&self) -> TitleOptions {
        let defaults = TitleOptions::default();
        TitleOptions {
            font_size: self.font_size.unwrap_or(defaults.font_size),
            y: self.y,
        }
    }
}

/// One call to `add_model_set`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSetEntry {
    pub stddev: Vec<f64>,
    pub corrcoef: Vec<f64>,
    /// Overrides `defaults` field by field
    #[serde(default)]
    pub style: SetStyle,
    /// Percent bias; its presence turns on bias-driven markers
    #[serde(default)]
    pub bias: Option<Vec<f64>>,
    #[serde(default)]
    pub annotate: Option<bool>,
    #[serde(default)]
    pub outlier_handling: bool,
    #[serde(default)]
    pub xytext: Option<(f64, f64)>,
}

impl ModelSetEntry {
    /// Resolve the call options with `defaults` underneath this entry's style.
    pub fn options(&self, defaults: &SetStyle) -> ModelSetOptions {
        let style = SetStyle::merge(defaults, &self.style);
        let mut options = style.apply_to(ModelSetOptions::default());

        if let Some(annotate) = self.annotate {
            options.annotate = annotate;
        }
        if let Some(xytext) = self.xytext {
            options.xytext = xytext;
        }
        options.outlier_handling = self.outlier_handling;
        if let Some(bias) = &self.bias {
            options = options.with_bias(bias.clone());
        }
        options
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrGridEntry {
    pub values: Vec<f64>,
    #[serde(default = "corr_grid_style")]
    pub style: LineStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StdGridEntry {
    pub values: Vec<f64>,
    #[serde(default = "std_grid_style")]
    pub style: LineStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MajorGridEntry {
    #[serde(default)]
    pub axis: GridAxis,
    #[serde(default = "major_grid_style")]
    pub style: LineStyle,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelNamesEntry {
    pub names: Vec<String>,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
    #[serde(default)]
    pub font_size: Option<f64>,
}

impl ModelNamesEntry {
    fn options(&self) -> ModelNameOptions {
        let mut options = ModelNameOptions::default();
        if let Some(position) = self.position {
            options.position = position;
        }
        if let Some(font_size) = self.font_size {
            options.font_size = font_size;
        }
        options
    }
}

// ============================================================================
// Loading
// ============================================================================

impl PlotFile {
    /// Load a plot file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plot file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json(&content)
                .with_context(|| format!("Failed to parse plot file: {:?}", path)),
            Some("yaml") | Some("yml") => Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse plot file: {:?}", path)),
            _ => bail!(
                "Unsupported plot file extension for {:?} (expected .yaml, .yml or .json)",
                path
            ),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Draw the described diagram onto `surface`.
    pub fn draw<S: Surface>(&self, surface: S) -> VizResult<TaylorDiagram<S>> {
        let mut diagram = TaylorDiagram::with_surface(self.diagram.clone(), surface)?;

        if let Some(grid) = &self.corr_grid {
            diagram.add_corr_grid(&grid.values, &grid.style)?;
        }
        if let Some(grid) = &self.std_grid {
            diagram.add_std_grid(&grid.values, &grid.style)?;
        }
        if let Some(grid) = &self.grid {
            diagram.add_grid(grid.axis, &grid.style)?;
        }
        if let Some(contours) = &self.contours {
            diagram.add_contours(contours)?;
        }

        for (i, entry) in self.model_sets.iter().enumerate() {
            let options = entry.options(&self.defaults);
            debug!(
                set = i,
                label = options.label.as_deref().unwrap_or(""),
                "Drawing model set"
            );
            diagram.add_model_set(&entry.stddev, &entry.corrcoef, &options)?;
        }

        if let Some(names) = &self.model_names {
            diagram.add_model_name(names.names.as_slice(), &names.options())?;
        }
        if self.bias_legend {
            diagram.add_bias_legend()?;
        }
        if let Some(legend) = &self.legend {
            diagram.add_legend(legend)?;
        }
        if let Some(title) = &self.title {
            diagram.add_title(&title.text, &title.options())?;
        }
        if let Some(fonts) = &self.fonts {
            diagram.set_fontsizes_and_pad(fonts)?;
        }

        info!(
            model_sets = self.model_sets.len(),
            outliers = diagram.outlier_count(),
            "Diagram drawn"
        );
        Ok(diagram)
    }

    /// Draw onto a fresh SVG figure built from `figure`.
    pub fn render(&self) -> VizResult<SvgSurface> {
        let surface = SvgSurface::new(self.figure.clone())?;
        Ok(self.draw(surface)?.into_surface())
    }
}
