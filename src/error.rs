//! Error types for the driver.
//!
//! Every fallible operation returns [`Error`], generic over the error type `E` of the
//! [`DisplayInterface`](crate::interface::DisplayInterface) in use. Nothing is retried; the
//! variant tells the caller which phase failed so it can decide whether a fresh reset and
//! `Display::init` are needed.

use core::fmt;

use crate::interface::Handle;

/// A pixel coordinate outside the addressable area of the framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: u16,
    pub y: u16,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pixel ({}, {}) is outside the framebuffer", self.x, self.y)
    }
}

impl core::error::Error for OutOfBounds {}

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// A bus or pin handle could not be obtained. Handles acquired before it have already been
    /// released.
    Acquisition(Handle, E),
    /// The bus failed part-way through the initialization sequence. The controller is in an
    /// undefined configuration and must be reset and initialized again from the start.
    Configuration(E),
    /// The bus failed while streaming image data. What reached display RAM is indeterminate.
    Transfer(E),
    /// The bus failed while sending a single command after initialization.
    Interface(E),
    /// A pixel coordinate was rejected before anything was modified.
    OutOfBounds(OutOfBounds),
    /// A command argument was outside the range documented for it. Nothing was sent.
    InvalidArgument,
    /// Display RAM was written before `Display::init` completed.
    NotInitialized,
}

impl<E> Error<E> {
    /// Reclassify a bus failure as having happened during the initialization sequence.
    pub(crate) fn into_configuration(self) -> Self {
        match self {
            Error::Interface(e) => Error::Configuration(e),
            other => other,
        }
    }

    /// Reclassify a bus failure as having happened while streaming image data.
    pub(crate) fn into_transfer(self) -> Self {
        match self {
            Error::Interface(e) => Error::Transfer(e),
            other => other,
        }
    }
}

impl<E> From<OutOfBounds> for Error<E> {
    fn from(oob: OutOfBounds) -> Self {
        Error::OutOfBounds(oob)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Acquisition(handle, e) => write!(f, "failed to acquire {handle}: {e:?}"),
            Error::Configuration(e) => write!(f, "controller configuration failed: {e:?}"),
            Error::Transfer(e) => write!(f, "image data transfer failed: {e:?}"),
            Error::Interface(e) => write!(f, "interface error: {e:?}"),
            Error::OutOfBounds(oob) => fmt::Display::fmt(oob, f),
            Error::InvalidArgument => write!(f, "command argument out of range"),
            Error::NotInitialized => write!(f, "display has not been initialized"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reclassify_interface_errors() {
        assert_eq!(
            Error::Interface(7u8).into_configuration(),
            Error::Configuration(7)
        );
        assert_eq!(Error::Interface(7u8).into_transfer(), Error::Transfer(7));
        assert_eq!(
            Error::<u8>::InvalidArgument.into_transfer(),
            Error::InvalidArgument
        );
        assert_eq!(
            Error::<u8>::NotInitialized.into_configuration(),
            Error::NotInitialized
        );
    }

    #[test]
    fn display_messages() {
        let oob: Error<()> = OutOfBounds { x: 256, y: 3 }.into();
        assert_eq!(
            format!("{}", oob),
            "pixel (256, 3) is outside the framebuffer"
        );
        assert_eq!(
            format!("{}", Error::Acquisition(Handle::Reset, "busy")),
            "failed to acquire reset pin: \"busy\""
        );
    }
}
