//! The main API to the display driver. It brings the controller up, owns the framebuffer, and
//! streams it into display RAM, and hands out `Region` instances for writing image data
//! directly.

pub mod region;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::command::consts::*;
use crate::command::*;
use crate::config::Config;
use crate::display::region::Region;
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::interface;

/// Minimum time to wait after turning the display on before display RAM is written.
pub const POWER_ON_SETTLE_MS: u32 = 150;

/// A pixel coordinate pair of `column` and `row`. `column` must be in the range [0,
/// `consts::PIXEL_COL_MAX`], and `row` must be in the range [0, `consts::PIXEL_ROW_MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelCoord(pub u16, pub u16);

/// Whether the controller has been brought up since the driver took hold of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// Power-on, freshly reset, or after a failed `init`. The register configuration is
    /// unknown and display RAM must not be written.
    Uninitialized,
    /// The full bring-up sequence completed.
    Active,
}

/// A driver for an SSD1362 display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    frame: FrameBuffer,
    state: DisplayState,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver connected to the interface `iface`, with a dark
    /// framebuffer.
    pub fn new(iface: DI) -> Self {
        Display {
            iface,
            frame: FrameBuffer::new(),
            state: DisplayState::Uninitialized,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Reset the controller and run the complete bring-up sequence with the register values in
    /// `config`.
    ///
    /// The sequence always runs from the hardware reset onwards. If any step fails the result is
    /// `Error::Configuration` (or `Error::InvalidArgument` for an out-of-range register value),
    /// the display stays `Uninitialized`, and the only way forward is to call `init` again.
    pub fn init<D: DelayNs>(&mut self, config: Config, delay: &mut D) -> Result<(), Error<DI::Error>> {
        self.state = DisplayState::Uninitialized;
        match self.bring_up(&config, delay) {
            Ok(()) => {
                self.state = DisplayState::Active;
                debug!("ssd1362: controller initialized");
                Ok(())
            }
            Err(e) => {
                let e = e.into_configuration();
                warn!("ssd1362: initialization failed: {}", e);
                Err(e)
            }
        }
    }

    fn bring_up<D: DelayNs>(&mut self, config: &Config, delay: &mut D) -> Result<(), Error<DI::Error>> {
        debug!("ssd1362: resetting controller");
        self.iface.reset(delay).map_err(Error::Interface)?;
        Command::SetCommandLock(false).send(&mut self.iface)?;
        config.send(&mut self.iface)?;
        Command::SetDisplayMode(DisplayMode::Normal).send(&mut self.iface)?;
        Command::DisablePartialDisplay.send(&mut self.iface)?;
        Command::SetSleepMode(false).send(&mut self.iface)?;
        delay.delay_ms(POWER_ON_SETTLE_MS);
        Ok(())
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), Error<DI::Error>> {
        Command::SetSleepMode(enabled).send(&mut self.iface)
    }

    /// Control the master brightness, 0-15.
    pub fn brightness(&mut self, brightness: u8) -> Result<(), Error<DI::Error>> {
        Command::SetMasterContrast(brightness).send(&mut self.iface)
    }

    /// Control the segment drive current.
    pub fn contrast_current(&mut self, current: u8) -> Result<(), Error<DI::Error>> {
        Command::SetContrastCurrent(current).send(&mut self.iface)
    }

    pub fn display_mode(&mut self, mode: DisplayMode) -> Result<(), Error<DI::Error>> {
        Command::SetDisplayMode(mode).send(&mut self.iface)
    }

    /// Set the vertical pan.
    ///
    /// This uses the `Command::SetStartLine` feature to roll the display RAM rows relative to the
    /// active set of COM lines.
    pub fn vertical_pan(&mut self, offset: u8) -> Result<(), Error<DI::Error>> {
        Command::SetStartLine(offset).send(&mut self.iface)
    }

    /// Restrict the active rows to `start..=end`, or make every row active again with `None`.
    pub fn partial_display(&mut self, rows: Option<(u8, u8)>) -> Result<(), Error<DI::Error>> {
        match rows {
            Some((start, end)) => Command::EnablePartialDisplay(start, end).send(&mut self.iface),
            None => Command::DisablePartialDisplay.send(&mut self.iface),
        }
    }

    /// Program and enable a custom gray scale gamma table. See `BufCommand::SetGrayScaleTable`.
    pub fn gray_scale_table(&mut self, table: &[u8; 15]) -> Result<(), Error<DI::Error>> {
        BufCommand::SetGrayScaleTable(table).send(&mut self.iface)?;
        Command::EnableGrayScaleTable.send(&mut self.iface)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// Turn pixel (x, y) of the framebuffer fully on. Nothing is sent until the next flush.
    pub fn set_pixel(&mut self, x: u16, y: u16) -> Result<(), Error<DI::Error>> {
        self.frame.set_pixel(x, y)?;
        Ok(())
    }

    /// Replace the framebuffer contents with alternating bright and dark rows.
    pub fn fill_test_pattern(&mut self) {
        self.frame.fill_test_pattern()
    }

    /// Stream the whole framebuffer into display RAM. The framebuffer is kept, so it can be
    /// modified and flushed again.
    pub fn flush(&mut self) -> Result<(), Error<DI::Error>> {
        self.flush_rows(0, PIXEL_ROW_MAX)
    }

    /// Stream rows `top..=bottom` of the framebuffer into the same rows of display RAM.
    pub fn flush_rows(&mut self, top: u8, bottom: u8) -> Result<(), Error<DI::Error>> {
        self.ensure_active()?;
        let packed = self.frame.rows(top, bottom).ok_or(Error::InvalidArgument)?;
        Region::new(
            &mut self.iface,
            PixelCoord(0, top as u16),
            PixelCoord(NUM_PIXEL_COLS, bottom as u16 + 1),
        )
        .draw_packed(packed)
    }

    /// Construct a rectangular region onto which to draw image data directly, bypassing the
    /// framebuffer. `lower_right` is exclusive.
    ///
    /// The region start and end horizontal coordinates must be even, because pixels can only be
    /// addressed by column address (pairs of pixels), not individually. The region must lie
    /// within the 256x64 display RAM.
    ///
    /// Regions are intended to be short-lived, and mutably borrow the display so clashing writes
    /// are prevented.
    pub fn region(
        &mut self,
        upper_left: PixelCoord,
        lower_right: PixelCoord,
    ) -> Result<Region<'_, DI>, Error<DI::Error>> {
        self.ensure_active()?;
        if upper_left.0 > NUM_PIXEL_COLS
            || lower_right.0 > NUM_PIXEL_COLS
            || upper_left.1 > NUM_PIXEL_ROWS as u16
            || lower_right.1 > NUM_PIXEL_ROWS as u16
            || upper_left.0 >= lower_right.0
            || upper_left.1 >= lower_right.1
            || upper_left.0 % 2 != 0
            || lower_right.0 % 2 != 0
        {
            return Err(Error::InvalidArgument);
        }
        Ok(Region::new(&mut self.iface, upper_left, lower_right))
    }

    /// Give back the interface, and with it the bus and pin handles.
    pub fn release(self) -> DI {
        self.iface
    }

    fn ensure_active(&self) -> Result<(), Error<DI::Error>> {
        match self.state {
            DisplayState::Active => Ok(()),
            DisplayState::Uninitialized => Err(Error::NotInitialized),
        }
    }
}
