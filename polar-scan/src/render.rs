use crate::constants::{BACKGROUND_COLOR, FOREGROUND_COLOR, MARKER_RADIUS};
use crate::error::ScannerError;
use crate::projector::Projector;
use polar_scan_data::Snapshot;

/// RGBA, each channel in `[0, 1]`.
pub type Color = [f32; 4];

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: [f64; 2],
        to: [f64; 2],
        color: Color,
    },
    /// Filled circle.
    Circle {
        center: [f64; 2],
        radius: f64,
        color: Color,
    },
}

/// Draw commands for one redraw, in painting order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

/// Where frames end up, e.g. a window.
pub trait DisplaySurface {
    /// True once the user asked to quit.
    fn poll_quit(&mut self) -> bool;
    fn present(&mut self, frame: &Frame) -> Result<(), ScannerError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Drawing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Presented,
    Quit,
}

/// Redraws the whole scan once per accepted sample.
pub struct RenderLoop {
    projector: Projector,
    state: RenderState,
    frames: u64,
}

impl RenderLoop {
    pub fn new(projector: Projector) -> RenderLoop {
        RenderLoop {
            projector,
            state: RenderState::Idle,
            frames: 0,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One ray from the center per angle, then the center marker.
    pub fn compose(&self, snapshot: &Snapshot) -> Frame {
        let center = self.projector.center();
        let mut commands = Vec::with_capacity(snapshot.distances().len() + 2);
        commands.push(DrawCommand::Clear(BACKGROUND_COLOR));
        commands.extend(snapshot.iter().map(|(angle, distance)| DrawCommand::Line {
            from: center,
            to: self.projector.project(angle, distance),
            color: FOREGROUND_COLOR,
        }));
        commands.push(DrawCommand::Circle {
            center,
            radius: MARKER_RADIUS,
            color: FOREGROUND_COLOR,
        });
        Frame { commands }
    }

    /// Checks for quit, then draws and presents `snapshot`.
    pub fn draw<S: DisplaySurface>(
        &mut self,
        snapshot: &Snapshot,
        surface: &mut S,
    ) -> Result<RenderOutcome, ScannerError> {
        if surface.poll_quit() {
            return Ok(RenderOutcome::Quit);
        }

        self.state = RenderState::Drawing;
        let frame = self.compose(snapshot);
        let presented = surface.present(&frame);
        self.state = RenderState::Idle;
        presented?;

        self.frames += 1;
        Ok(RenderOutcome::Presented)
    }
}

/// Discards every frame and never quits. Used when running without a window.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn poll_quit(&mut self) -> bool {
        false
    }

    fn present(&mut self, _frame: &Frame) -> Result<(), ScannerError> {
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySurface {
    pub frames: Vec<Frame>,
    /// Report quit once this many frames were presented.
    pub quit_after: Option<usize>,
}

#[cfg(test)]
impl DisplaySurface for MemorySurface {
    fn poll_quit(&mut self) -> bool {
        self.quit_after
            .map_or(false, |limit| self.frames.len() >= limit)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), ScannerError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
