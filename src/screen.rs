use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_SPRITE_ROWS};

/// The FrameBuffer is indexed as [y][x], each pixel is 0 (off) or 1 (on)
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Screen
/// 64x32 monochrome pixels that persist until cleared or drawn over.
///
/// Sprites are XORed onto the frame buffer and wrap around both edges.
/// The screen remembers whether it changed since the last `take_frame` so that renderers
/// only redraw when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    frame_buffer: FrameBuffer,
    dirty: bool,
}

impl Screen {
    pub fn new() -> Self {
        Screen {
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.dirty = true;
    }

    /// XORs `rows` onto the screen with its top left corner at (x, y).
    ///
    /// Each row is 8 pixels wide, most significant bit leftmost. Only the first 15 rows are
    /// drawn. Returns true if any pixel that was on got turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x = usize::from(x) % DISPLAY_WIDTH;
        let y = usize::from(y) % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, byte) in rows.iter().take(MAX_SPRITE_ROWS).enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                let px = (x + bit) % DISPLAY_WIDTH;
                let pixel = (byte >> (7 - bit)) & 1;
                collision |= pixel & self.frame_buffer[py][px] == 1;
                self.frame_buffer[py][px] ^= pixel;
            }
        }

        self.dirty = true;
        collision
    }

    /// A read-only view of every pixel
    pub fn snapshot(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Returns the FrameBuffer if it changed since it was last taken
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.dirty {
            self.dirty = false;
            Some(&self.frame_buffer)
        } else {
            None
        }
    }

    /// The number of pixels that are on
    pub fn lit(&self) -> usize {
        self.frame_buffer
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&pixel| pixel == 1)
            .count()
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}
