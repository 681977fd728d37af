use std::io::{self, Write};

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::FrameBuffer;

/// # Display
///
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// This display draws them as text, one character per pixel and one line per row,
/// so a frame can be dumped to a terminal or a log without any windowing system.
pub struct Display {
    on: char,
    off: char,
    border: bool,
}

impl Display {
    /// Creates a display that draws set pixels as `on` and unset pixels as `off`.
    ///
    /// # Arguments
    /// * `on` the character drawn for a set pixel.
    /// * `off` the character drawn for an unset pixel.
    pub fn new(on: char, off: char) -> Self {
        Display {
            on,
            off,
            border: false,
        }
    }

    /// Frame the output with a box so blank edges stay visible
    pub fn with_border(mut self) -> Self {
        self.border = true;
        self
    }

    /// Renders a single Chip-8 FrameBuffer to a string.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer that represents the state of every pixel on the Display.
    pub fn render(&self, frame: &FrameBuffer) -> String {
        let edge = if self.border {
            format!("+{}+\n", "-".repeat(DISPLAY_WIDTH))
        } else {
            String::new()
        };
        let line_len = DISPLAY_WIDTH + if self.border { 3 } else { 1 };
        let mut out = String::with_capacity(edge.len() * 2 + line_len * DISPLAY_HEIGHT);

        out.push_str(&edge);
        for y in 0..DISPLAY_HEIGHT {
            if self.border {
                out.push('|');
            }
            for x in 0..DISPLAY_WIDTH {
                out.push(if frame.pixel(x, y) { self.on } else { self.off });
            }
            if self.border {
                out.push('|');
            }
            out.push('\n');
        }
        out.push_str(&edge);
        out
    }

    /// Renders a frame straight to `writer`
    pub fn draw<W: Write>(&self, frame: &FrameBuffer, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.render(frame).as_bytes())?;
        writer.flush()
    }
}

impl Default for Display {
    fn default() -> Self {
        Display::new('█', ' ')
    }
}

#[cfg(test)]
mod test_display {
    use super::*;

    #[test]
    fn test_renders_blank_frame() {
        let display = Display::new('#', '.');
        let out = display.render(&FrameBuffer::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), DISPLAY_HEIGHT);
        assert!(lines.iter().all(|line| *line == ".".repeat(DISPLAY_WIDTH)));
    }

    #[test]
    fn test_renders_set_pixels() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(0, 1, &[0xA0]);
        let out = Display::new('#', '.').render(&frame);
        let second = out.lines().nth(1).unwrap();
        assert!(second.starts_with("#.#."));
    }

    #[test]
    fn test_renders_border() {
        let out = Display::new('#', '.').with_border().render(&FrameBuffer::new());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), DISPLAY_HEIGHT + 2);
        assert_eq!(lines[0].len(), DISPLAY_WIDTH + 2);
        assert!(lines[1].starts_with('|') && lines[1].ends_with('|'));
    }

    #[test]
    fn test_draws_to_writer() {
        let mut out = Vec::new();
        Display::new('#', '.')
            .draw(&FrameBuffer::new(), &mut out)
            .unwrap();
        assert_eq!(out.len(), (DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
    }
}
