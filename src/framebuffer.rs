//! An in-memory image of the display RAM, packed the way the controller expects it: two 4-bit
//! grey levels per byte, high nibble on the left, rows top to bottom. The buffer is kept across
//! flushes so it can be redrawn incrementally.

use itertools::iproduct;

use crate::command::consts::{NUM_PIXEL_COLS, NUM_PIXEL_ROWS};
use crate::error::OutOfBounds;

pub const WIDTH: u16 = NUM_PIXEL_COLS;
pub const HEIGHT: u16 = NUM_PIXEL_ROWS as u16;
/// Bytes per row of pixels.
pub const ROW_BYTES: usize = WIDTH as usize / 2;
pub const BUFFER_SIZE: usize = ROW_BYTES * HEIGHT as usize;
/// Brightest grey level.
pub const MAX_LEVEL: u8 = 0x0F;

#[derive(Clone)]
pub struct FrameBuffer {
    buf: [u8; BUFFER_SIZE],
}

impl FrameBuffer {
    /// A buffer with every pixel dark.
    pub const fn new() -> Self {
        FrameBuffer {
            buf: [0; BUFFER_SIZE],
        }
    }

    /// Byte index and nibble shift holding pixel (x, y). Even columns live in the high nibble.
    fn locate(x: u16, y: u16) -> Result<(usize, u8), OutOfBounds> {
        if x >= WIDTH || y >= HEIGHT {
            return Err(OutOfBounds { x, y });
        }
        let index = y as usize * ROW_BYTES + x as usize / 2;
        let shift = if x % 2 == 0 { 4 } else { 0 };
        Ok((index, shift))
    }

    /// Turn pixel (x, y) fully on.
    pub fn set_pixel(&mut self, x: u16, y: u16) -> Result<(), OutOfBounds> {
        self.set_pixel_level(x, y, MAX_LEVEL)
    }

    /// Set pixel (x, y) to a grey level, clamped to 0-15. The other pixel sharing the byte is
    /// left alone. Out-of-range coordinates are rejected without modifying the buffer.
    pub fn set_pixel_level(&mut self, x: u16, y: u16, level: u8) -> Result<(), OutOfBounds> {
        let (index, shift) = Self::locate(x, y)?;
        let mask = MAX_LEVEL << shift;
        let byte = &mut self.buf[index];
        *byte = (*byte & !mask) | (level.min(MAX_LEVEL) << shift);
        Ok(())
    }

    /// The grey level of pixel (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
        let (index, shift) = Self::locate(x, y).ok()?;
        Some((self.buf[index] >> shift) & MAX_LEVEL)
    }

    /// Every pixel as `(x, y, level)`, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u16, u16, u8)> + '_ {
        iproduct!(0..HEIGHT, 0..WIDTH).map(move |(y, x)| {
            let byte = self.buf[y as usize * ROW_BYTES + x as usize / 2];
            let level = if x % 2 == 0 { byte >> 4 } else { byte & MAX_LEVEL };
            (x, y, level)
        })
    }

    /// Diagnostic stripes: even rows fully on, odd rows fully off, whatever was drawn before.
    pub fn fill_test_pattern(&mut self) {
        for (row, bytes) in self.buf.chunks_mut(ROW_BYTES).enumerate() {
            bytes.fill(if row % 2 == 0 { 0xFF } else { 0x00 });
        }
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The packed bytes of rows `top..=bottom`, which are contiguous in the buffer.
    pub fn rows(&self, top: u8, bottom: u8) -> Option<&[u8]> {
        if top > bottom || bottom as u16 >= HEIGHT {
            return None;
        }
        Some(&self.buf[top as usize * ROW_BYTES..(bottom as usize + 1) * ROW_BYTES])
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
