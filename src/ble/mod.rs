//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising** - presents the device as a HID keyboard (HID +
//!    Battery Service UUIDs, keyboard appearance) while no host link
//!    exists.
//! 2. **GATT Server** - serves the Battery Service on an active link.
//! 3. **Connection events** - each link's lifetime brackets a
//!    `Connected`/`Disconnected` pair on [`CONN_EVENTS`] for the
//!    indicator worker, and updates the live-link flag behind the
//!    role-specific connectivity queries.

pub mod peripheral;

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Connection lifecycle events published for the indicator worker.
#[derive(Clone, Copy, Format)]
pub enum ConnEvent {
    /// A host link came up. `success` is `false` when the underlying
    /// negotiation failed; such events are ignored downstream.
    Connected { success: bool },
    /// The host link dropped.
    Disconnected,
}

/// Queue of connection events awaiting the indicator worker.
pub static CONN_EVENTS: Channel<CriticalSectionRawMutex, ConnEvent, 4> = Channel::new();

/// Live-link flag backing the connectivity queries below.
static CONNECTED: AtomicBool = AtomicBool::new(false);

pub(crate) fn set_link_up(up: bool) {
    CONNECTED.store(up, Ordering::Relaxed);
}

/// Whether the active host profile currently has a live link
/// (standalone keyboards and the central half of a split).
pub fn active_profile_is_connected() -> bool {
    CONNECTED.load(Ordering::Relaxed)
}

/// Whether the link to the central half is up (split peripheral role).
/// This shim tracks a single link either way, so the two queries share
/// the same flag; which one a build consults is decided by
/// [`crate::config::SPLIT_PERIPHERAL_ROLE`].
pub fn peripheral_is_connected() -> bool {
    CONNECTED.load(Ordering::Relaxed)
}
