//! Driver library for the Solomon Systech SSD1362 dot matrix greyscale OLED display driver.

#![cfg_attr(not(feature = "std"), no_std)]


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod interface;
pub mod session;

// Re-exports for primary API.
pub use command::{consts, ComLayout, ComScanDirection, DisplayMode, GpioMode, VddSource};
pub use config::Config;
pub use display::{Display, DisplayState, PixelCoord};
pub use error::{Error, OutOfBounds};
pub use framebuffer::FrameBuffer;
pub use interface::spi::{InterfaceError, SpiInterface};
pub use interface::{DisplayInterface, Handle};
pub use session::{exit_code, run_test_pattern, Outcome};
