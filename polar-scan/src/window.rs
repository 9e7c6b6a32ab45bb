use crate::error::ScannerError;
use crate::render::{DisplaySurface, DrawCommand, Frame};
use piston_window::math::Matrix2d;
use piston_window::{
    clear, ellipse, line_from_to, Event, EventLoop, Graphics, Input, PistonWindow, RenderEvent, Window,
    WindowSettings,
};

const MAX_FPS: u64 = 240;
const LINE_RADIUS: f64 = 0.5;
const MSAA_SAMPLES: u8 = 4;

/// A square piston window. Closing it or pressing Esc quits.
pub struct PistonSurface {
    window: PistonWindow,
}

impl PistonSurface {
    pub fn new(title: &str, canvas_size: u32) -> Result<PistonSurface, ScannerError> {
        let mut window: PistonWindow = WindowSettings::new(title, [canvas_size, canvas_size])
            .exit_on_esc(true)
            .resizable(false)
            .samples(MSAA_SAMPLES)
            .build()
            .map_err(|e| ScannerError::Display(e.to_string()))?;
        window.set_max_fps(MAX_FPS);
        Ok(PistonSurface { window })
    }
}

impl DisplaySurface for PistonSurface {
    fn poll_quit(&mut self) -> bool {
        while let Some(input) = self.window.poll_event() {
            if let Event::Input(Input::Close(_), _) = input {
                self.window.set_should_close(true);
            }
        }
        self.window.should_close()
    }

    /// Waits for the next render slot and paints `frame` into it.
    fn present(&mut self, frame: &Frame) -> Result<(), ScannerError> {
        while let Some(event) = self.window.next() {
            if event.render_args().is_some() {
                self.window.draw_2d(&event, |context, graphics, _device| {
                    draw_frame(frame, context.transform, graphics);
                });
                return Ok(());
            }
        }
        // window closed, reported by the next poll_quit
        Ok(())
    }
}

fn draw_frame<G: Graphics>(frame: &Frame, transform: Matrix2d, g: &mut G) {
    for command in &frame.commands {
        match *command {
            DrawCommand::Clear(color) => clear(color, g),
            DrawCommand::Line { from, to, color } => {
                line_from_to(color, LINE_RADIUS, from, to, transform, g)
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                let rect = [
                    center[0] - radius,
                    center[1] - radius,
                    2. * radius,
                    2. * radius,
                ];
                ellipse(color, rect, transform, g)
            }
        }
    }
}
