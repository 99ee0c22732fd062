//! Common types shared across the geocat-viz crates.

pub mod error;
pub mod style;
pub mod surface;

pub use error::{VizError, VizResult};
pub use style::{Color, Dash, HAlign, LineStyle, MarkerShape, MarkerStyle, TextStyle, VAlign};
pub use surface::{
    ArtistId, AxisSide, AxisSpec, Coord, FrameId, FrameSpec, LegendEntry, LegendLoc, LegendSpec,
    PolarGrid, SubplotSpec, Surface, TextContent, TextItem, Tick, TitleSpec,
};
