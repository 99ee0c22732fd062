//! A [`Surface`] that records every call instead of drawing.
//!
//! Tests assert on the recorded commands: how many markers were
//! scattered, where text landed, which levels a contour set used.

use viz_common::{
    ArtistId, Coord, FrameId, FrameSpec, LegendSpec, LineStyle, MarkerStyle, PolarGrid, Surface,
    TextContent, TextItem, TitleSpec, VizError, VizResult,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlotCall {
    pub frame: FrameId,
    pub path: Vec<Coord>,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterCall {
    pub frame: FrameId,
    pub points: Vec<Coord>,
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCall {
    pub frame: FrameId,
    pub item: TextItem,
}

impl TextCall {
    /// The text body, fractions rendered as `numerator/denominator`.
    pub fn content(&self) -> String {
        match &self.item.content {
            TextContent::Plain(text) => text.clone(),
            TextContent::Fraction {
                numerator,
                denominator,
            } => format!("{}/{}", numerator, denominator),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContourCall {
    pub frame: FrameId,
    pub grid: PolarGrid,
    pub levels: Vec<f64>,
    pub style: LineStyle,
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    AddFrame(FrameSpec),
    UpdateFrame { frame: FrameId, spec: FrameSpec },
    Plot(PlotCall),
    Scatter(ScatterCall),
    Text(TextCall),
    Contour(ContourCall),
    Legend { frame: FrameId, spec: LegendSpec },
    Title { frame: FrameId, title: TitleSpec },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    frames: Vec<FrameSpec>,
    next_artist: ArtistId,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of drawing calls (frame management excluded).
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::AddFrame(_) | DrawCommand::UpdateFrame { .. }))
            .count()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Current spec of a frame, after any updates.
    pub fn frame(&self, frame: FrameId) -> Option<&FrameSpec> {
        self.frames.get(frame.0)
    }

    pub fn plots(&self) -> Vec<&PlotCall> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Plot(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn scatters(&self) -> Vec<&ScatterCall> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Scatter(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&TextCall> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Just the text bodies, in call order.
    pub fn text_contents(&self) -> Vec<String> {
        self.texts().iter().map(|t| t.content()).collect()
    }

    pub fn contours(&self) -> Vec<&ContourCall> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Contour(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn legends(&self) -> Vec<&LegendSpec> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Legend { spec, .. } => Some(spec),
                _ => None,
            })
            .collect()
    }

    pub fn titles(&self) -> Vec<&TitleSpec> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Title { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    fn check_frame(&self, frame: FrameId) -> VizResult<()> {
        if frame.0 < self.frames.len() {
            Ok(())
        } else {
            Err(VizError::UnknownFrame(frame.0))
        }
    }

    fn record(&mut self, command: DrawCommand) -> ArtistId {
        self.commands.push(command);
        let id = self.next_artist;
        self.next_artist += 1;
        id
    }
}

impl Surface for RecordingSurface {
    fn add_frame(&mut self, spec: &FrameSpec) -> VizResult<FrameId> {
        self.frames.push(spec.clone());
        self.commands.push(DrawCommand::AddFrame(spec.clone()));
        Ok(FrameId(self.frames.len() - 1))
    }

    fn update_frame(&mut self, frame: FrameId, spec: &FrameSpec) -> VizResult<()> {
        self.check_frame(frame)?;
        self.frames[frame.0] = spec.clone();
        self.commands.push(DrawCommand::UpdateFrame {
            frame,
            spec: spec.clone(),
        });
        Ok(())
    }

    fn plot(&mut self, frame: FrameId, path: &[Coord], style: &LineStyle) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Plot(PlotCall {
            frame,
            path: path.to_vec(),
            style: style.clone(),
        })))
    }

    fn scatter(
        &mut self,
        frame: FrameId,
        points: &[Coord],
        marker: &MarkerStyle,
    ) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Scatter(ScatterCall {
            frame,
            points: points.to_vec(),
            marker: marker.clone(),
        })))
    }

    fn text(&mut self, frame: FrameId, item: &TextItem) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Text(TextCall {
            frame,
            item: item.clone(),
        })))
    }

    fn contour(
        &mut self,
        frame: FrameId,
        grid: &PolarGrid,
        levels: &[f64],
        style: &LineStyle,
    ) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Contour(ContourCall {
            frame,
            grid: grid.clone(),
            levels: levels.to_vec(),
            style: style.clone(),
        })))
    }

    fn legend(&mut self, frame: FrameId, spec: &LegendSpec) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Legend {
            frame,
            spec: spec.clone(),
        }))
    }

    fn set_title(&mut self, frame: FrameId, title: &TitleSpec) -> VizResult<ArtistId> {
        self.check_frame(frame)?;
        Ok(self.record(DrawCommand::Title {
            frame,
            title: title.clone(),
        }))
    }
}
