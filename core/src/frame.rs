use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAME_BUFFER_SIZE};

/// Bytes per row of the packed frame buffer
const ROW_BYTES: usize = DISPLAY_WIDTH / 8;

/// # Frame Buffer
/// The contents of a single 64x32 monochrome frame.
///
/// Pixels are packed 8 to a byte in row-major order with the most significant bit of
/// each byte being the leftmost pixel, so the whole frame takes 256 bytes.
///
/// Only `00E0` (clear) and `DXYN` (draw) modify it; displays read it once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [u8; FRAME_BUFFER_SIZE],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [0; FRAME_BUFFER_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [0; FRAME_BUFFER_SIZE];
    }

    /// Whether the pixel at `x`, `y` is set; coordinates wrap around the screen
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (index, mask) = Self::locate(x, y);
        self.pixels[index] & mask != 0
    }

    /// XORs a sprite onto the frame with its top left corner at `x`, `y`
    ///
    /// Each byte of `sprite` is one 8 pixel row. Both the origin and every pixel of the
    /// sprite wrap around the edges of the screen.
    ///
    /// Returns whether any pixel was switched from set to unset.
    ///
    /// # Arguments
    /// * `x` the column of the sprite's leftmost pixel
    /// * `y` the row of the sprite's topmost pixel
    /// * `sprite` the rows of the sprite, top to bottom
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let (index, mask) = Self::locate(x + bit, y + row);
                collision |= self.pixels[index] & mask != 0;
                self.pixels[index] ^= mask;
            }
        }
        collision
    }

    /// Iterates over all 2048 pixels row by row, left to right
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        self.pixels
            .iter()
            .flat_map(|byte| (0..8).map(move |bit| byte & (0x80 >> bit) != 0))
    }

    /// The packed representation, 8 pixels per byte
    pub fn as_bytes(&self) -> &[u8; FRAME_BUFFER_SIZE] {
        &self.pixels
    }

    fn locate(x: usize, y: usize) -> (usize, u8) {
        let x = x % DISPLAY_WIDTH;
        let y = y % DISPLAY_HEIGHT;
        (y * ROW_BYTES + x / 8, 0x80 >> (x % 8))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
