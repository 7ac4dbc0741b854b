//! Status LED indicator subsystem.
//!
//! A single LED communicates three mutually-prioritized pieces of status:
//!
//! - **Battery level** at boot (1-3 blinks, charge-dependent)
//! - **Connected** (one long pulse when a host link comes up)
//! - **Advertising** (repeating double-blink while disconnected)
//!
//! ## Components
//!
//! - [`machine`]: the pure arbitration/state machine (host-testable)
//! - [`led`]: atomic on/off over a GPIO line
//! - [`worker`]: the dedicated Embassy task that owns the LED and applies
//!   the machine's decisions (embedded only)

pub mod led;
pub mod machine;

#[cfg(feature = "embedded")]
pub mod worker;
