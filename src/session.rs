//! A complete display session: bring the controller up, draw the diagnostic stripes, and flush
//! them, with a cancellation flag consulted between steps.
//!
//! The flag is only read before a step starts. A step already on the bus always runs to
//! completion.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::Config;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// How a session that did not fail came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The cancellation flag was raised before the session finished.
    Interrupted,
}

/// Initialize the display, fill the framebuffer with the test pattern, and flush it.
///
/// `cancel` is checked before each of the three steps; once it reads `true` no further step is
/// started and the session ends with `Outcome::Interrupted`. Errors from any step end the
/// session immediately.
pub fn run_test_pattern<DI, D>(
    display: &mut Display<DI>,
    config: Config,
    delay: &mut D,
    cancel: &AtomicBool,
) -> Result<Outcome, Error<DI::Error>>
where
    DI: DisplayInterface,
    D: DelayNs,
{
    let cancelled = || cancel.load(Ordering::SeqCst);

    if cancelled() {
        return Ok(interrupted("initialization"));
    }
    display.init(config, delay)?;

    if cancelled() {
        return Ok(interrupted("drawing"));
    }
    display.fill_test_pattern();

    if cancelled() {
        return Ok(interrupted("flush"));
    }
    display.flush()?;

    debug!("ssd1362: test pattern flushed");
    Ok(Outcome::Completed)
}

fn interrupted(step: &str) -> Outcome {
    info!("ssd1362: interrupted before {}", step);
    Outcome::Interrupted
}

/// Process exit status for the result of a session: 0 for a clean finish or an interrupt, 1 for
/// any failure.
pub fn exit_code<E>(result: &Result<Outcome, Error<E>>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
