//! Status LED output - atomic on/off over a GPIO line.
//!
//! Generic over [`embedded_hal::digital::OutputPin`]: the firmware hands
//! in an `embassy_nrf` output (infallible), host tests hand in fakes that
//! refuse writes. The last-commanded state is tracked here and only
//! updated when the pin accepted the write; no other code touches the
//! physical line.

use embedded_hal::digital::OutputPin;

use crate::error::Error;

/// The single indicator LED.
pub struct StatusLed<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap a GPIO line. Call [`StatusLed::configure`] before first use.
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    /// Drive the line to its inactive level and verify it accepts commands.
    ///
    /// A failure here means the LED device is unusable; the indicator
    /// subsystem must stay dormant.
    pub fn configure(&mut self) -> Result<(), Error> {
        self.pin.set_low().map_err(|_| Error::DeviceNotReady)?;
        self.lit = false;
        Ok(())
    }

    pub fn turn_on(&mut self) -> Result<(), Error> {
        self.set(true)
    }

    pub fn turn_off(&mut self) -> Result<(), Error> {
        self.set(false)
    }

    /// Command the LED. On failure the state mirror is left unchanged;
    /// callers log and continue (LED failures are never fatal).
    pub fn set(&mut self, on: bool) -> Result<(), Error> {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        match result {
            Ok(()) => {
                self.lit = on;
                Ok(())
            }
            Err(_) => Err(Error::SetPinFailed),
        }
    }

    /// Last state the pin actually accepted.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
