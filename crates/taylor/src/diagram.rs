//! The diagram session.

use std::f64::consts::FRAC_PI_2;

use renderer::{FigureConfig, SvgSurface};
use viz_common::{ArtistId, Color, Coord, Dash, FrameId, FrameSpec, LineStyle, Surface, VizResult};

use crate::config::DiagramConfig;
use crate::frame;
use crate::samples::LegendHandle;

/// Number of samples along arcs and per axis of the RMS grid.
pub const ARC_SAMPLES: usize = 50;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Arc at constant radius across the whole angular range.
pub(crate) fn arc_path(radius: f64) -> Vec<Coord> {
    linspace(0.0, FRAC_PI_2, ARC_SAMPLES)
        .into_iter()
        .map(|theta| Coord::data(theta, radius))
        .collect()
}

/// A Taylor diagram drawn onto a [`Surface`].
///
/// Every `add_*` call draws immediately. A diagram owns its surface; use
/// [`TaylorDiagram::into_surface`] to export the result or to place a
/// second diagram on the same page. All calls take `&mut self`, so one
/// diagram has one writer at a time.
#[derive(Debug)]
pub struct TaylorDiagram<S: Surface> {
    pub(crate) config: DiagramConfig,
    pub(crate) surface: S,
    pub(crate) frame: FrameId,
    pub(crate) frame_spec: FrameSpec,
    pub(crate) reference_arc: ArtistId,
    pub(crate) legend_handles: Vec<LegendHandle>,
    /// Next free outlier shelf slot; never decreases
    pub(crate) next_outlier_slot: usize,
}

impl TaylorDiagram<SvgSurface> {
    /// A diagram on a fresh 8x8 inch SVG figure.
    pub fn new(config: DiagramConfig) -> VizResult<Self> {
        Self::with_surface(config, SvgSurface::new(FigureConfig::default())?)
    }
}

impl<S: Surface> TaylorDiagram<S> {
    /// Add a diagram frame to `surface` at `config.subplot` and draw the
    /// reference arc.
    pub fn with_surface(config: DiagramConfig, mut surface: S) -> VizResult<Self> {
        config.validate()?;
        let frame_spec = frame::frame_spec(&config)?;
        let frame = surface.add_frame(&frame_spec)?;

        let reference_style = LineStyle::new(Color::BLACK, 1.0, Dash::long_dash());
        let reference_arc = surface.plot(frame, &arc_path(config.refstd), &reference_style)?;

        tracing::debug!(
            refstd = config.refstd,
            std_min = config.std_range.0,
            std_max = config.std_range.1,
            levels = config.std_levels.len(),
            frame = frame.0,
            "Created Taylor diagram"
        );

        Ok(Self {
            config,
            surface,
            frame,
            frame_spec,
            reference_arc,
            legend_handles: Vec::new(),
            next_outlier_slot: 0,
        })
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// The frame as last sent to the surface.
    pub fn frame_spec(&self) -> &FrameSpec {
        &self.frame_spec
    }

    pub fn reference_arc(&self) -> ArtistId {
        self.reference_arc
    }

    /// Legend handles collected so far, one per sample set, in call order.
    pub fn legend_handles(&self) -> &[LegendHandle] {
        &self.legend_handles
    }

    /// Number of outlier shelf slots used so far.
    pub fn outlier_count(&self) -> usize {
        self.next_outlier_slot
    }

    pub(crate) fn std_min(&self) -> f64 {
        self.config.std_range.0
    }

    pub(crate) fn std_max(&self) -> f64 {
        self.config.std_range.1
    }
}
