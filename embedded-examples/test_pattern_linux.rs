//! Full example code for driving an SSD1362 panel from a Linux single-board computer. This runs on
//! a Radxa ROCK Pi 4 with a 256x64 SSD1362 module on `/dev/spidev3.0`, header pin 13 (GPIO3_C5)
//! for D/C, and header pin 11 (GPIO3_C4) for /RESET.
//!
//! Build it as a binary against `linux-embedded-hal` 0.4, `env_logger` and `ctrlc`. It draws the
//! stripe test pattern once and exits with status 0, or 0 early on Ctrl+C; any acquisition or
//! bus failure is printed to stderr and exits with status 1.

use std::error::Error as StdError;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
use ssd1362 as oled;

const SPI_PATH: &str = "/dev/spidev3.0";
const SPI_HZ: u32 = 400_000;
const GPIO_CHIP: &str = "/dev/gpiochip3";
const DC_LINE: u32 = 21;
const RST_LINE: u32 = 20;

type BoxError = Box<dyn StdError>;

fn open_spi() -> Result<SpidevDevice, BoxError> {
    let mut spi = SpidevDevice::open(SPI_PATH)?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0.configure(&options)?;
    Ok(spi)
}

fn output_pin(line: u32, label: &str) -> Result<CdevPin, BoxError> {
    // Both lines start high: D/C idles high and /RESET is not asserted.
    let handle = Chip::new(GPIO_CHIP)?
        .get_line(line)?
        .request(LineRequestFlags::OUTPUT, 1, label)?;
    Ok(CdevPin::new(handle)?)
}

fn main() {
    env_logger::init();

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
            eprintln!("could not install Ctrl+C handler: {}", e);
            process::exit(1);
        }
    }

    // Acquire the bus and both pins. A failure drops whatever was already opened.
    let iface = match oled::SpiInterface::acquire(
        open_spi,
        || output_pin(DC_LINE, "ssd1362-dc"),
        || output_pin(RST_LINE, "ssd1362-reset"),
    ) {
        Ok(iface) => iface,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let mut disp = oled::Display::new(iface);
    let result = oled::run_test_pattern(
        &mut disp,
        oled::Config::new(
            oled::ComScanDirection::RowZeroLast,
            oled::ComLayout::DualProgressive,
        ),
        &mut Delay,
        &cancel,
    );
    if let Err(ref e) = result {
        eprintln!("{}", e);
    }
    let status = oled::exit_code(&result);

    // Close the SPI device and release both GPIO lines before exiting.
    drop(disp.release().release());
    process::exit(status);
}
