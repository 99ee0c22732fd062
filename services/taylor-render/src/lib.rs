//! Taylor diagram renderer.
//!
//! Reads a plot description file and draws the diagram it describes.

pub mod plot_file;

pub use plot_file::PlotFile;
