//! Taylor diagrams.
//!
//! A Taylor diagram summarizes how closely sample series match a
//! reference: standard deviation is the radius, correlation with the
//! reference is the angle (`theta = arccos(corrcoef)`), and the distance
//! to the reference point is the centered RMS difference.
//!
//! ```no_run
//! use taylor::{DiagramConfig, ModelSetOptions, TaylorDiagram};
//!
//! let mut diagram = TaylorDiagram::new(DiagramConfig::default())?;
//! diagram.add_model_set(
//!     &[1.230, 0.988, 1.092],
//!     &[0.958, 0.973, 0.740],
//!     &ModelSetOptions::default().label("Model A"),
//! )?;
//! diagram.add_contours(&Default::default())?;
//! diagram.add_legend(&Default::default())?;
//! diagram.into_surface().save("taylor.png".as_ref())?;
//! # Ok::<(), viz_common::VizError>(())
//! ```

pub mod annotation;
pub mod config;
pub mod diagram;
pub mod frame;
pub mod reference;
pub mod samples;
pub mod stats;

pub use annotation::{
    corr_grid_style, major_grid_style, std_grid_style, FontSizes, GridAxis, LegendOptions,
    ModelNameOptions, TitleOptions,
};
pub use config::{DiagramConfig, FontConfig, ModelSetOptions, SetStyle};
pub use diagram::TaylorDiagram;
pub use frame::to_polar;
pub use reference::{rms, ContourLevels, ContourOptions, ContourSet};
pub use samples::{bias_to_marker_size, LegendHandle, ModelSetArtists, OutlierPlacement};
pub use stats::{taylor_stats, TaylorStats};
