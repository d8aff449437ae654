//! Region abstraction for drawing into rectangular windows of the display RAM.

use log::debug;

use crate::command::{BufCommand, Command};
use crate::display::PixelCoord;
use crate::error::Error;
use crate::interface;

/// A handle to a rectangular region of a display which can be drawn into.
pub struct Region<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    iface: &'di mut DI,
    top: u8,
    rows: u8,
    buf_left: u8,
    buf_cols: u8,
}

impl<'di, DI> Region<'di, DI>
where
    DI: 'di + interface::DisplayInterface,
{
    /// Construct a new region. This is only called from `Display`, which checks that the region
    /// coordinates are ordered, column-aligned, and within the display RAM.
    pub(super) fn new(iface: &'di mut DI, upper_left: PixelCoord, lower_right: PixelCoord) -> Self {
        Self {
            iface,
            top: upper_left.1 as u8,
            rows: (lower_right.1 - upper_left.1) as u8,
            buf_left: (upper_left.0 / 2) as u8,
            buf_cols: ((lower_right.0 - upper_left.0) / 2) as u8,
        }
    }

    /// Draw packed-pixel image data into the region, such that each byte is two 4-bit gray scale
    /// values of horizontally-adjacent pixels. Pixels are drawn left-to-right and top-to-bottom.
    /// The buffer must hold exactly one byte per column address per row, or the method returns
    /// `Error::InvalidArgument` without sending anything.
    pub fn draw_packed(&mut self, packed_pixels: &[u8]) -> Result<(), Error<DI::Error>> {
        if packed_pixels.len() != self.buf_cols as usize * self.rows as usize {
            return Err(Error::InvalidArgument);
        }
        self.write(packed_pixels).map_err(Error::into_transfer)
    }

    fn write(&mut self, packed_pixels: &[u8]) -> Result<(), Error<DI::Error>> {
        debug!(
            "ssd1362: writing {} bytes to columns {}+{}, rows {}+{}",
            packed_pixels.len(),
            self.buf_left,
            self.buf_cols,
            self.top,
            self.rows
        );
        // Set the row and column address registers, put the display in write mode, and stream.
        Command::SetColumnAddress(self.buf_left, self.buf_left + self.buf_cols - 1)
            .send(self.iface)?;
        Command::SetRowAddress(self.top, self.top + self.rows - 1).send(self.iface)?;
        BufCommand::WriteImageData(packed_pixels).send(self.iface)
    }
}
