//! Plot rendering backend.
//!
//! Provides:
//! - [`svg::SvgSurface`], a [`viz_common::Surface`] that writes SVG documents
//! - Contour lines (marching squares) and automatic level selection
//! - SVG rasterization and PNG encoding

pub mod contour;
pub mod png;
pub mod svg;

pub use svg::{FigureConfig, SvgSurface};
