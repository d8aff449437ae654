//! Register values programmed by `Display::init`.
//!
//! Every register in the bring-up sequence is always written, so unlike a "leave at POR default"
//! scheme each field has a concrete value. `Config::default()` holds the values for the 256x64
//! panel this driver targets; builder methods override individual registers.

use crate::command::consts::NUM_PIXEL_ROWS;
use crate::command::*;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// A configuration for the display. Builder methods offer a declarative way to override the
/// value sent for a register during initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    com_scan_direction: ComScanDirection,
    com_layout: ComLayout,
    clock_fosc_divset: (u8, u8),
    mux_ratio: u8,
    display_offset: u8,
    start_line: u8,
    gpio: (GpioMode, GpioMode),
    vdd_source: VddSource,
    display_enhancements: (bool, bool),
    contrast_current: u8,
    master_contrast: u8,
    phase_lengths: (u8, u8),
    precharge_voltage: u8,
    second_precharge_period: u8,
    com_deselect_voltage: u8,
}

impl Config {
    /// Create a new configuration. COM scan direction and COM layout are mandatory because the
    /// display will not function correctly unless they match the panel wiring, so they must be
    /// provided in the constructor. Everything else starts from the defaults.
    pub fn new(com_scan_direction: ComScanDirection, com_layout: ComLayout) -> Self {
        Config {
            com_scan_direction,
            com_layout,
            clock_fosc_divset: (13, 1),
            mux_ratio: NUM_PIXEL_ROWS,
            display_offset: 0,
            start_line: 0,
            gpio: (GpioMode::HiZ, GpioMode::HiZ),
            vdd_source: VddSource::External,
            display_enhancements: (true, false),
            contrast_current: 0x95,
            master_contrast: 0x0F,
            phase_lengths: (9, 7),
            precharge_voltage: 0x1F,
            second_precharge_period: 8,
            com_deselect_voltage: 7,
        }
    }

    /// Configure the display clock frequency and divider. See `Command::SetClockFoscDivset`.
    pub fn clock_fosc_divset(self, fosc: u8, divset: u8) -> Self {
        Self {
            clock_fosc_divset: (fosc, divset),
            ..self
        }
    }

    /// Configure the number of active rows. See `Command::SetMuxRatio`.
    pub fn mux_ratio(self, rows: u8) -> Self {
        Self {
            mux_ratio: rows,
            ..self
        }
    }

    /// Configure the COM line offset. See `Command::SetDisplayOffset`.
    pub fn display_offset(self, offset: u8) -> Self {
        Self {
            display_offset: offset,
            ..self
        }
    }

    /// Configure the RAM row shown on the first display row. See `Command::SetStartLine`.
    pub fn start_line(self, line: u8) -> Self {
        Self {
            start_line: line,
            ..self
        }
    }

    pub fn gpio(self, gpio0: GpioMode, gpio1: GpioMode) -> Self {
        Self {
            gpio: (gpio0, gpio1),
            ..self
        }
    }

    pub fn vdd_source(self, source: VddSource) -> Self {
        Self {
            vdd_source: source,
            ..self
        }
    }

    /// Configure display enhancement features. See `Command::SetDisplayEnhancements`.
    pub fn display_enhancements(self, external_vsl: bool, enhanced_low_gs_quality: bool) -> Self {
        Self {
            display_enhancements: (external_vsl, enhanced_low_gs_quality),
            ..self
        }
    }

    /// Configure display contrast current. See `Command::SetContrastCurrent`.
    pub fn contrast_current(self, current: u8) -> Self {
        Self {
            contrast_current: current,
            ..self
        }
    }

    /// Configure the master brightness, 0-15. See `Command::SetMasterContrast`.
    pub fn master_contrast(self, contrast: u8) -> Self {
        Self {
            master_contrast: contrast,
            ..self
        }
    }

    /// Configure OLED drive phase lengths. See `Command::SetPhaseLengths`.
    pub fn phase_lengths(self, reset: u8, first_precharge: u8) -> Self {
        Self {
            phase_lengths: (reset, first_precharge),
            ..self
        }
    }

    /// Configure OLED drive precharge voltage. See `Command::SetPreChargeVoltage`.
    pub fn precharge_voltage(self, voltage: u8) -> Self {
        Self {
            precharge_voltage: voltage,
            ..self
        }
    }

    /// Configure OLED drive second precharge period length. See
    /// `Command::SetSecondPrechargePeriod`.
    pub fn second_precharge_period(self, period: u8) -> Self {
        Self {
            second_precharge_period: period,
            ..self
        }
    }

    /// Configure OLED drive COM deselect voltage. See `Command::SetComDeselectVoltage`.
    pub fn com_deselect_voltage(self, voltage: u8) -> Self {
        Self {
            com_deselect_voltage: voltage,
            ..self
        }
    }

    /// Transmit the register-programming part of the bring-up sequence, in the order the
    /// controller expects it, to the display at `iface`.
    pub(crate) fn send<DI>(&self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let (fosc, divset) = self.clock_fosc_divset;
        let (gpio0, gpio1) = self.gpio;
        let (external_vsl, enhanced_low_gs) = self.display_enhancements;
        let (reset_phase, precharge_phase) = self.phase_lengths;
        let commands = [
            Command::SetClockFoscDivset(fosc, divset),
            Command::SetMuxRatio(self.mux_ratio),
            Command::SetDisplayOffset(self.display_offset),
            Command::SetStartLine(self.start_line),
            Command::SetRemapping(
                IncrementAxis::Horizontal,
                ColumnRemap::Forward,
                NibbleRemap::Forward,
                self.com_scan_direction,
                self.com_layout,
            ),
            Command::SetGpio(gpio0, gpio1),
            Command::SetVddSource(self.vdd_source),
            Command::SetDisplayEnhancements(external_vsl, enhanced_low_gs),
            Command::SetContrastCurrent(self.contrast_current),
            Command::SetMasterContrast(self.master_contrast),
            Command::SetDefaultGrayScaleTable,
            Command::SetPhaseLengths(reset_phase, precharge_phase),
            Command::SetDisplayEnhancementB,
            Command::SetPreChargeVoltage(self.precharge_voltage),
            Command::SetSecondPrechargePeriod(self.second_precharge_period),
            Command::SetComDeselectVoltage(self.com_deselect_voltage),
        ];
        commands.iter().try_for_each(|c| c.send(iface))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(ComScanDirection::RowZeroLast, ComLayout::DualProgressive)
    }
}
