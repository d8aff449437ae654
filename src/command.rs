//! The command set for the SSD1362.
//!
//! Note 1: The display RAM of the SSD1362 is arranged in 64 rows and 128 columns, where each
//! column is 2 adjacent pixels (segments) in the row for a total max resolution of 256x64. Each
//! pixel is 4 bits/16 levels of intensity, so each column also refers to exactly one byte.
//! Anywhere there is a "column" address, it refers to a horizontal pair of pixels.
//!
//! Every command is followed by a fixed number of argument bytes. Sending the wrong number
//! desynchronizes the controller's command parser until the next command byte, so argument
//! ranges are checked here before anything reaches the bus.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry of the SSD1362 display RAM.

    pub const NUM_PIXEL_COLS: u16 = 256;
    pub const NUM_PIXEL_ROWS: u8 = 64;
    pub const NUM_BUF_COLS: u8 = (NUM_PIXEL_COLS / 2) as u8;
    pub const PIXEL_COL_MAX: u16 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const BUF_COL_MAX: u8 = NUM_BUF_COLS - 1;
}

use self::consts::*;

/// The address increment orientation when writing image data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncrementAxis {
    /// The column address will increment as image data is written, writing bytes (horizontal
    /// pairs of pixels) from left to right in the range set by `SetColumnAddress`, and then top
    /// to bottom in the range set by `SetRowAddress`.
    Horizontal,
    /// The row address will increment as image data is written, writing bytes from top to
    /// bottom in the range set by `SetRowAddress`, and then left to right in the range set by
    /// `SetColumnAddress`.
    Vertical,
}

/// Setting of column address remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRemap {
    /// Column addresses 0->127 map to segments 0,1->254,255.
    Forward,
    /// Column addresses 0->127 map to segments 254,255->0,1. The pixels within each column keep
    /// their order; `NibbleRemap` controls that.
    Reverse,
}

/// Setting of data nibble remapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NibbleRemap {
    /// Byte 0xAB maps (in L->R order) to pixels B,A.
    Reverse,
    /// Byte 0xAB maps (in L->R order) to pixels A,B, so the high nibble is the left pixel.
    Forward,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan row addresses top to bottom, so that row address 0 is the first row of the
    /// display.
    RowZeroFirst,
    /// COM lines scan row addresses bottom to top, so that row address 0 is the last row of the
    /// display.
    RowZeroLast,
}

/// Setting the layout of the COM lines to the display rows. This is dictated by how the panel
/// wires the OLED matrix to the driver chip; anything other than the correct setting for the
/// module yields a corrupted image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComLayout {
    /// COM lines 0->63 map to display rows 0->63.
    Progressive,
    /// COM lines 0->31 map to *even* display rows 0->62, and COM lines 32->63 map to *odd*
    /// display rows 1->63.
    Interlaced,
    /// Dual COM line mode, used by panels that drive each row from both sides of the glass.
    DualProgressive,
}

/// Setting of the display mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    /// The display is blanked with all pixels turned OFF (to grayscale level 0).
    BlankDark,
    /// The display is blanked with all pixels turned ON (to grayscale level 15).
    BlankBright,
    /// The display operates normally, showing the image in the display RAM.
    Normal,
    /// The display shows the image in the display RAM with the grayscale levels inverted
    /// (level 0->15, 1->14, ..., 15->0).
    Inverse,
}

/// Mode of one of the controller's two general purpose pins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpioMode {
    /// Input disabled, pin floating.
    HiZ,
    InputEnabled,
    OutputLow,
    OutputHigh,
}

impl GpioMode {
    fn bits(self) -> u8 {
        match self {
            GpioMode::HiZ => 0b00,
            GpioMode::InputEnabled => 0b01,
            GpioMode::OutputLow => 0b10,
            GpioMode::OutputHigh => 0b11,
        }
    }
}

/// Source of the controller's internal logic supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VddSource {
    /// Supplied from the VDD pin by an external regulator.
    External,
    /// Generated by the internal regulator (power-on default).
    Internal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Enable the gray scale gamma table (see `BufCommand::SetGrayScaleTable`).
    EnableGrayScaleTable,
    /// Set the column start and end address range when writing to the display RAM. The column
    /// address pointer is reset to the start column address such that `WriteImageData` will begin
    /// writing there. Range is 0-127. (Note 1)
    SetColumnAddress(u8, u8),
    /// Set the row start and end address range when writing to the display RAM. The row address
    /// pointer is reset to the start row address. Range is 0-63.
    SetRowAddress(u8, u8),
    /// Put the controller into RAM read mode.
    EnableReadImageData,
    /// Set the direction of display address increment, column address remapping, data nibble
    /// remapping, COM scan direction, and COM line layout. See documentation for each enum for
    /// details.
    SetRemapping(
        IncrementAxis,
        ColumnRemap,
        NibbleRemap,
        ComScanDirection,
        ComLayout,
    ),
    /// Set the display start line, "rolling" the displayed image upwards within the rows
    /// selected by the MUX ratio. Range is 0-63.
    SetStartLine(u8),
    /// Set the display COM line offset. Like `SetStartLine` but applied *after* the MUX ratio, so
    /// the active rows roll along with the image. Range is 0-63.
    SetDisplayOffset(u8),
    /// Set the display operating mode. See enum for details.
    SetDisplayMode(DisplayMode),
    /// Enable partial display mode, so only rows start..=end are active. Range is 0-63, where
    /// start must be <= end.
    EnablePartialDisplay(u8, u8),
    /// Disable partial display mode.
    DisablePartialDisplay,
    /// Select the VDD regulator.
    SetVddSource(VddSource),
    /// Control sleep mode. Leaving sleep mode turns the display logic on.
    SetSleepMode(bool),
    /// Set the refresh phase lengths. The first phase (reset) can be set from 5-31 DCLKs, and the
    /// second (first pre-charge) can be set from 3-15 DCLKs.
    SetPhaseLengths(u8, u8),
    /// Set the oscillator frequency Fosc (0-15, higher is faster) and the display clock divider
    /// DIVSET (0-10, DCLK = Fosc / 2^n).
    SetClockFoscDivset(u8, u8),
    /// Enable or disable display enhancements "external VSL" and "Enhanced low GS display
    /// quality".
    SetDisplayEnhancements(bool, bool),
    /// Set the modes of GPIO0 and GPIO1.
    SetGpio(GpioMode, GpioMode),
    /// Set the second pre-charge period. Range 0-15 DCLKs.
    SetSecondPrechargePeriod(u8),
    /// Set the gray scale gamma table to the factory default.
    SetDefaultGrayScaleTable,
    /// Set the pre-charge voltage level. Range 0-31.
    SetPreChargeVoltage(u8),
    /// Set the COM deselect voltage level. Range 0-7.
    SetComDeselectVoltage(u8),
    /// Set the contrast current. Range 0-255.
    SetContrastCurrent(u8),
    /// Set the master contrast control, uniformly reducing all grayscale levels by 0-15
    /// sixteenths. Range 0 (maximum dimming) to 15 (normal brightness).
    SetMasterContrast(u8),
    /// Set the MUX ratio, the number of active COM lines and thus of active rows. Range 16-64.
    SetMuxRatio(u8),
    /// Display enhancement B, programmed with its normal setting.
    SetDisplayEnhancementB,
    /// Set whether the command lock is enabled or disabled. Enabling the command lock blocks all
    /// commands except `SetCommandLock`.
    SetCommandLock(bool),
}

pub enum BufCommand<'buf> {
    /// Set the gray scale gamma table. Each byte 0-14 can range from 0-180 and sets the pixel
    /// drive pulse width in DCLKs for grayscale levels 1->15; level 0 cannot be modified. The
    /// gamma settings must monotonically increase.
    SetGrayScaleTable(&'buf [u8]),
    /// Write image data into display RAM, in the order set by the `SetRemapping` `IncrementAxis`
    /// and inside the window set by `SetColumnAddress` and `SetRowAddress`. An empty slice only
    /// puts the controller into write mode, so data can follow in further `send_data` calls.
    WriteImageData(&'buf [u8]),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 2];
        let (cmd, data) = match self {
            Command::EnableGrayScaleTable => ok_command!(arg_buf, 0x00, []),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=BUF_COL_MAX, 0..=BUF_COL_MAX) => ok_command!(arg_buf, 0x15, [start, end]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) => ok_command!(arg_buf, 0x75, [start, end]),
                _ => Err(Error::InvalidArgument),
            },
            Command::EnableReadImageData => ok_command!(arg_buf, 0x5D, []),
            Command::SetRemapping(
                increment_axis,
                column_remap,
                nibble_remap,
                com_scan_direction,
                com_layout,
            ) => {
                let ia = match increment_axis {
                    IncrementAxis::Horizontal => 0x00,
                    IncrementAxis::Vertical => 0x01,
                };
                let cr = match column_remap {
                    ColumnRemap::Forward => 0x00,
                    ColumnRemap::Reverse => 0x02,
                };
                let nr = match nibble_remap {
                    NibbleRemap::Reverse => 0x00,
                    NibbleRemap::Forward => 0x04,
                };
                let csd = match com_scan_direction {
                    ComScanDirection::RowZeroFirst => 0x00,
                    ComScanDirection::RowZeroLast => 0x10,
                };
                let (interlace, dual_com) = match com_layout {
                    ComLayout::Progressive => (0x00, 0x01),
                    ComLayout::Interlaced => (0x20, 0x01),
                    ComLayout::DualProgressive => (0x00, 0x11),
                };
                ok_command!(arg_buf, 0xA0, [ia | cr | nr | csd | interlace, dual_com])
            }
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xA1, [line]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayOffset(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xA2, [line]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayMode(mode) => ok_command!(
                arg_buf,
                match mode {
                    DisplayMode::BlankDark => 0xA4,
                    DisplayMode::BlankBright => 0xA5,
                    DisplayMode::Normal => 0xA6,
                    DisplayMode::Inverse => 0xA7,
                },
                []
            ),
            Command::EnablePartialDisplay(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) if start <= end => {
                    ok_command!(arg_buf, 0xA8, [start, end])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::DisablePartialDisplay => ok_command!(arg_buf, 0xA9, []),
            Command::SetVddSource(source) => ok_command!(
                arg_buf,
                0xAB,
                [match source {
                    VddSource::External => 0x00,
                    VddSource::Internal => 0x01,
                }]
            ),
            Command::SetSleepMode(ena) => ok_command!(arg_buf, if ena { 0xAE } else { 0xAF }, []),
            Command::SetPhaseLengths(phase_1, phase_2) => match (phase_1, phase_2) {
                (5..=31, 3..=15) => {
                    let p1 = (phase_1 - 1) >> 1;
                    let p2 = 0xF0 & (phase_2 << 4);
                    ok_command!(arg_buf, 0xB1, [p1 | p2])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetClockFoscDivset(fosc, divset) => match (fosc, divset) {
                (0..=15, 0..=10) => ok_command!(arg_buf, 0xB3, [fosc << 4 | divset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayEnhancements(ena_external_vsl, ena_enhanced_low_gs_quality) => {
                let vsl = if ena_external_vsl { 0xA0 } else { 0xA2 };
                let gs = if ena_enhanced_low_gs_quality {
                    0xFD
                } else {
                    0xB5
                };
                ok_command!(arg_buf, 0xB4, [vsl, gs])
            }
            Command::SetGpio(gpio0, gpio1) => {
                ok_command!(arg_buf, 0xB5, [gpio1.bits() << 2 | gpio0.bits()])
            }
            Command::SetSecondPrechargePeriod(period) => match period {
                0..=15 => ok_command!(arg_buf, 0xB6, [period]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDefaultGrayScaleTable => ok_command!(arg_buf, 0xB9, []),
            Command::SetPreChargeVoltage(voltage) => match voltage {
                0..=31 => ok_command!(arg_buf, 0xBB, [voltage]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComDeselectVoltage(voltage) => match voltage {
                0..=7 => ok_command!(arg_buf, 0xBE, [voltage]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetContrastCurrent(current) => ok_command!(arg_buf, 0xC1, [current]),
            Command::SetMasterContrast(contrast) => match contrast {
                0..=15 => ok_command!(arg_buf, 0xC7, [contrast]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_PIXEL_ROWS => ok_command!(arg_buf, 0xCA, [ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetDisplayEnhancementB => ok_command!(arg_buf, 0xD1, [0xA2, 0x20]),
            Command::SetCommandLock(ena) => {
                ok_command!(arg_buf, 0xFD, [if ena { 0x16 } else { 0x12 }])
            }
        }?;
        iface.send_command(cmd).map_err(Error::Interface)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data).map_err(Error::Interface)
        }
    }
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (cmd, data) = match self {
            BufCommand::SetGrayScaleTable(table) => {
                // Strictly increasing, and the last (largest) at most 180.
                let ok = table.len() == 15
                    && table.windows(2).all(|w| w[0] < w[1])
                    && table[14] <= 180;
                if ok {
                    Ok((0xB8, table))
                } else {
                    Err(Error::InvalidArgument)
                }
            }
            BufCommand::WriteImageData(buf) => Ok((0x5C, buf)),
        }?;
        iface.send_command(cmd).map_err(Error::Interface)?;
        if data.is_empty() {
            Ok(())
        } else {
            iface.send_data(data).map_err(Error::Interface)
        }
    }
}
