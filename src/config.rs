//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and display
//! enable flags live here so they can be tuned in one place.

// Status LED timing

/// On-time of one short advertising blink (ms).
pub const BLINK_MS: u64 = 200;

/// Gap between the two short advertising blinks (ms).
pub const PAUSE_MS: u64 = 200;

/// Long pause after an advertising double-blink, and the delay before
/// the advertising indicator starts once the battery display finishes (ms).
pub const ADVERTISING_INTERVAL_MS: u64 = 2000;

/// Duration of the single illumination shown when a host connects (ms).
pub const CONNECTED_MS: u64 = 1000;

/// On-time of one battery-level blink at boot (ms).
pub const BATTERY_BLINK_MS: u64 = 300;

/// Off-time between battery-level blinks at boot (ms).
pub const BATTERY_PAUSE_MS: u64 = 300;

// Startup sequencing

/// Delay before the indicator worker starts, letting hardware settle (ms).
pub const STARTUP_SETTLE_MS: u64 = 1;

/// Additional delay before the boot battery reading, so the SAADC
/// measurement is taken on a stable rail (ms).
pub const BATTERY_SETTLE_MS: u64 = 500;

// Display enable flags

/// Show the advertising double-blink pattern while disconnected.
pub const ADVERTISING_DISPLAY_ENABLED: bool = true;

/// Show a single pulse when a host connects.
pub const CONNECTED_DISPLAY_ENABLED: bool = true;

/// Blink out the battery level once at boot.
pub const BATTERY_DISPLAY_ENABLED: bool = true;

// Device role

/// Whether this build is the peripheral half of a split keyboard.
/// Selects which "already connected" query the startup sequencer uses.
pub const SPLIT_PERIPHERAL_ROLE: bool = false;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the actual `embassy_nrf::peripherals::*` types
// are selected in `main.rs`.  Adjust for your custom PCB.
//
//   Status LED     → P0.06

/// BLE device name, also carried in the scan-response data.
pub const BLE_DEVICE_NAME: &str = "KbStatus";
