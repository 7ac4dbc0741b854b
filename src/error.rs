//! Unified error type for kb-status-led.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging; the derive
//! is feature-gated so host tests build without defmt.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The LED line (or the device behind it) is not ready to be driven.
    /// Fatal to the indicator subsystem only: initialization aborts and
    /// the LED is never commanded.
    DeviceNotReady,

    /// A GPIO write to the LED line failed. Transient: logged, the
    /// last-commanded state is assumed unchanged, no retry.
    SetPinFailed,

    /// The indicator worker has already been started. The startup
    /// sequence runs exactly once and is never retried.
    AlreadyRunning,
}
