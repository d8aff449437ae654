//! The bus transport between the driver and the SSD1362: command bytes, data bytes, and the
//! hardware reset line.

use core::fmt;

use embedded_hal::delay::DelayNs;

/// Length of the reset pulse, and of the hold after it is released, in milliseconds. These are
/// lower bounds; a shorter pulse can leave the controller unresponsive.
pub const RESET_PULSE_MS: u32 = 150;

pub trait DisplayInterface {
    type Error: fmt::Debug;

    /// Send one command byte with the D/C line held low for the whole transfer. The line is
    /// high again when this returns, whether or not the write succeeded.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Send data bytes without touching the D/C line, which idles high between commands.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Pulse the reset line low, release it, and wait for the controller to come back.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;
}

/// The handles a transport owns, named for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Spi,
    DataCommand,
    Reset,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Handle::Spi => "SPI device",
            Handle::DataCommand => "D/C pin",
            Handle::Reset => "reset pin",
        })
    }
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the driver, such that each word on the
    //! SPI bus is 8 bits and a separate D/C GPIO selects between command and data. Chip select is
    //! left to the `SpiDevice`.

    use core::fmt::{self, Debug};

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::OutputPin;
    use embedded_hal::spi::SpiDevice;
    use log::{debug, trace, warn};

    use super::{DisplayInterface, Handle, RESET_PULSE_MS};
    use crate::error::Error;

    /// Largest number of bytes sent in one SPI transaction unless overridden with
    /// `SpiInterface::with_max_transfer`.
    pub const MAX_TRANSFER_SIZE: usize = 4096;

    /// Failure of one of the underlying bus or pin handles.
    #[derive(Debug, PartialEq, Eq)]
    pub enum InterfaceError<SpiErr, PinErr> {
        Spi(SpiErr),
        Pin(PinErr),
    }

    impl<SpiErr: Debug, PinErr: Debug> fmt::Display for InterfaceError<SpiErr, PinErr> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                InterfaceError::Spi(e) => write!(f, "SPI error: {e:?}"),
                InterfaceError::Pin(e) => write!(f, "pin error: {e:?}"),
            }
        }
    }

    impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

    pub struct SpiInterface<SPI, DC, RST> {
        /// The SPI device connected to the SSD1362.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the SSD1362 (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
        /// A GPIO output pin connected to the active-low /RES pin of the SSD1362.
        rst: RST,
        max_transfer: usize,
    }

    impl<SPI, DC, RST> SpiInterface<SPI, DC, RST> {
        /// Create a new SPI interface to communicate with the display driver from handles the
        /// caller has already acquired.
        pub fn new(spi: SPI, dc: DC, rst: RST) -> Self {
            Self {
                spi,
                dc,
                rst,
                max_transfer: MAX_TRANSFER_SIZE,
            }
        }

        /// Acquire the SPI device, the D/C pin and the reset pin in that order. If one of them
        /// cannot be obtained, the handles acquired before it are dropped (and so released) and
        /// the remaining acquisitions are never attempted.
        pub fn acquire<E, FS, FD, FR>(spi: FS, dc: FD, rst: FR) -> Result<Self, Error<E>>
        where
            FS: FnOnce() -> Result<SPI, E>,
            FD: FnOnce() -> Result<DC, E>,
            FR: FnOnce() -> Result<RST, E>,
        {
            let spi = spi().map_err(|e| acquisition_failed(Handle::Spi, e))?;
            let dc = dc().map_err(|e| acquisition_failed(Handle::DataCommand, e))?;
            let rst = rst().map_err(|e| acquisition_failed(Handle::Reset, e))?;
            debug!("ssd1362: acquired SPI device, D/C and reset pins");
            Ok(Self::new(spi, dc, rst))
        }

        /// Limit the number of bytes written per SPI transaction. Larger data writes are split
        /// into consecutive transactions without affecting what the controller receives.
        pub fn with_max_transfer(self, max_transfer: usize) -> Self {
            Self {
                max_transfer: max_transfer.max(1),
                ..self
            }
        }

        /// Give back the SPI device and pins.
        pub fn release(self) -> (SPI, DC, RST) {
            (self.spi, self.dc, self.rst)
        }
    }

    fn acquisition_failed<E>(handle: Handle, e: E) -> Error<E> {
        warn!("ssd1362: could not acquire {}", handle);
        Error::Acquisition(handle, e)
    }

    impl<SPI, DC, RST, PinErr> DisplayInterface for SpiInterface<SPI, DC, RST>
    where
        SPI: SpiDevice,
        DC: OutputPin<Error = PinErr>,
        RST: OutputPin<Error = PinErr>,
        PinErr: Debug,
    {
        type Error = InterfaceError<SPI::Error, PinErr>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(InterfaceError::Pin)?;
            let written = self.spi.write(&[cmd]);
            let restored = self.dc.set_high();
            written.map_err(InterfaceError::Spi)?;
            restored.map_err(InterfaceError::Pin)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            for chunk in buf.chunks(self.max_transfer) {
                trace!("ssd1362: writing {} data bytes", chunk.len());
                self.spi.write(chunk).map_err(InterfaceError::Spi)?;
            }
            Ok(())
        }

        fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
            self.dc.set_high().map_err(InterfaceError::Pin)?;
            self.rst.set_low().map_err(InterfaceError::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
            self.rst.set_high().map_err(InterfaceError::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
            Ok(())
        }
    }
}


#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{self, OutputPin};
    use embedded_hal::spi::{self as hal_spi, Operation, SpiDevice};

    use super::spi::{InterfaceError, SpiInterface};
    use super::*;
    use crate::error::Error;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Event {
        Dc(bool),
        Rst(bool),
        Write(Vec<u8>),
        DelayNs(u64),
    }

    type Timeline = Rc<RefCell<Vec<Event>>>;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct BusFault;

    impl hal_spi::Error for BusFault {
        fn kind(&self) -> hal_spi::ErrorKind {
            hal_spi::ErrorKind::Other
        }
    }

    struct FakeSpi {
        timeline: Timeline,
        fail: bool,
    }

    impl hal_spi::ErrorType for FakeSpi {
        type Error = BusFault;
    }

    impl SpiDevice for FakeSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), BusFault> {
            if self.fail {
                return Err(BusFault);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.timeline.borrow_mut().push(Event::Write(bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    struct FakePin {
        timeline: Timeline,
        event: fn(bool) -> Event,
    }

    impl digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.timeline.borrow_mut().push((self.event)(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.timeline.borrow_mut().push((self.event)(true));
            Ok(())
        }
    }

    struct FakeDelay {
        timeline: Timeline,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.timeline.borrow_mut().push(Event::DelayNs(ns as u64));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.timeline
                .borrow_mut()
                .push(Event::DelayNs(ms as u64 * 1_000_000));
        }
    }

    fn fake_interface(fail: bool) -> (SpiInterface<FakeSpi, FakePin, FakePin>, Timeline) {
        let timeline = Timeline::default();
        let iface = SpiInterface::new(
            FakeSpi {
                timeline: timeline.clone(),
                fail,
            },
            FakePin {
                timeline: timeline.clone(),
                event: Event::Dc,
            },
            FakePin {
                timeline: timeline.clone(),
                event: Event::Rst,
            },
        );
        (iface, timeline)
    }

    #[test]
    fn command_holds_dc_low_for_the_byte() {
        let (mut iface, timeline) = fake_interface(false);
        iface.send_command(0xAF).unwrap();
        assert_eq!(
            *timeline.borrow(),
            [Event::Dc(false), Event::Write(vec![0xAF]), Event::Dc(true)]
        );
    }

    #[test]
    fn failed_command_still_restores_dc() {
        let (mut iface, timeline) = fake_interface(true);
        assert_eq!(
            iface.send_command(0xAF),
            Err(InterfaceError::Spi(BusFault))
        );
        assert_eq!(*timeline.borrow(), [Event::Dc(false), Event::Dc(true)]);
    }

    #[test]
    fn data_is_split_into_default_transactions() {
        let (mut iface, timeline) = fake_interface(false);
        iface.send_data(&[0x5A; 8192]).unwrap();
        assert_eq!(
            *timeline.borrow(),
            [
                Event::Write(vec![0x5A; 4096]),
                Event::Write(vec![0x5A; 4096])
            ]
        );
    }

    #[test]
    fn data_chunking_preserves_bytes() {
        let (iface, timeline) = fake_interface(false);
        let mut iface = iface.with_max_transfer(1000);
        let image = (0..8192).map(|i| i as u8).collect::<Vec<u8>>();
        iface.send_data(&image).unwrap();

        let timeline = timeline.borrow();
        assert_eq!(timeline.len(), 9);
        let mut received = Vec::new();
        for event in timeline.iter() {
            match event {
                Event::Write(bytes) => {
                    assert!(bytes.len() <= 1000);
                    received.extend_from_slice(bytes);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(received, image);
    }

    #[test]
    fn reset_pulse_timing() {
        let (mut iface, timeline) = fake_interface(false);
        let mut delay = FakeDelay {
            timeline: timeline.clone(),
        };
        iface.reset(&mut delay).unwrap();
        assert_eq!(
            *timeline.borrow(),
            [
                Event::Dc(true),
                Event::Rst(false),
                Event::DelayNs(150_000_000),
                Event::Rst(true),
                Event::DelayNs(150_000_000),
            ]
        );
    }

    #[test]
    fn spy_starts_empty_and_shares_its_log() {
        let spy = test_spy::TestSpyInterface::default();
        assert_eq!(spy.writes(), 0);
        let mut handle = spy.split();
        handle.send_command(0xAF).unwrap();
        spy.check(0xAF, &[]);
        assert_eq!(spy.writes(), 1);
    }

    struct Tracked(Rc<Cell<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn acquire_releases_only_what_was_acquired() {
        let released = Rc::new(Cell::new(0));
        let rst_attempted = Cell::new(false);
        let result = SpiInterface::<Tracked, Tracked, Tracked>::acquire(
            || Ok(Tracked(released.clone())),
            || Err("D/C line busy"),
            || {
                rst_attempted.set(true);
                Ok(Tracked(released.clone()))
            },
        );
        assert!(matches!(
            result,
            Err(Error::Acquisition(Handle::DataCommand, "D/C line busy"))
        ));
        assert_eq!(released.get(), 1);
        assert!(!rst_attempted.get());
    }

    #[test]
    fn acquire_and_release_all() {
        let released = Rc::new(Cell::new(0));
        let iface = SpiInterface::<Tracked, Tracked, Tracked>::acquire::<(), _, _, _>(
            || Ok(Tracked(released.clone())),
            || Ok(Tracked(released.clone())),
            || Ok(Tracked(released.clone())),
        )
        .ok()
        .unwrap();
        assert_eq!(released.get(), 0);
        let handles = iface.release();
        assert_eq!(released.get(), 0);
        drop(handles);
        assert_eq!(released.get(), 3);
    }
}
