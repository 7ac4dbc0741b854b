//! Indicator state machine - decides which display owns the LED.
//!
//! Three displays compete for the single status LED:
//!
//! 1. **Battery level** - blocking blink sequence, shown once at boot.
//!    Takes absolute priority while in progress.
//! 2. **Connected pulse** - one blocking illumination when a host connects.
//! 3. **Advertising blink** - a timer-driven double-blink-then-pause
//!    pattern while no connection exists:
//!
//!    ```text
//!    on BLINK_MS → off PAUSE_MS → on BLINK_MS → off ADVERTISING_INTERVAL_MS → repeat
//!    ```
//!
//! The machine is pure: it owns the connection state, the battery-display
//! lock and the blink phase, and every operation returns what the caller
//! must do to the LED and the (single) timer slot. The worker task applies
//! those effects on hardware; host tests apply them to a recording fake.

use crate::config;

/// Number of short blinks in one advertising cycle.
pub const MAX_BLINKS: u8 = 2;

/// Whether a wireless link to the host currently exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Phase of the advertising blink chain.
///
/// `On(n)` / `Off(n)` carry the number of completed on/off pairs in the
/// current cycle (`0..MAX_BLINKS`). `Off(n)` means the LED is dark and the
/// next firing will light it for blink `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    /// Advertising indicator not running.
    Inactive,
    /// LED lit, in blink `n` of the cycle.
    On(u8),
    /// LED dark, blink `n` up next.
    Off(u8),
}

/// Outcome of one timer firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkStep {
    /// Command the LED and fire again after `next_in_ms`.
    Drive { led_on: bool, next_in_ms: u64 },
    /// Force the LED off; the chain halts (no reschedule).
    Halt,
    /// Battery display owns the LED: change nothing, do not reschedule.
    /// The chain resumes only via an explicit [`IndicatorMachine::start_advertising`].
    Suppressed,
}

/// Outcome of a connection-established event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectedAction {
    /// Negotiation failed - treat the event as if it never happened.
    Ignore,
    /// Cancel the timer slot and force the LED off.
    Stop,
    /// As [`ConnectedAction::Stop`], then show the connected pulse.
    StopThenPulse,
}

/// Map a state-of-charge percentage to a boot blink count.
///
/// Boundaries: exactly 70% → 2 blinks, exactly 30% → 1 blink.
pub fn battery_blink_count(percent: u8) -> u8 {
    if percent > 70 {
        3
    } else if percent > 30 {
        2
    } else {
        1
    }
}

/// The indicator's shared state, owned by one worker task.
///
/// Holds the three flags that arbitrate LED ownership: connection state,
/// the battery-display lock, and the advertising blink phase.
pub struct IndicatorMachine {
    connection: ConnectionState,
    battery_display: bool,
    phase: BlinkPhase,
}

impl IndicatorMachine {
    pub const fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            battery_display: false,
            phase: BlinkPhase::Inactive,
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Whether the battery display currently owns the LED.
    pub fn battery_display_active(&self) -> bool {
        self.battery_display
    }

    /// Mark the link as already up (startup already-connected query).
    pub fn set_connected(&mut self) {
        self.connection = ConnectionState::Connected;
    }

    /// Take the battery-display lock and compute the blink count.
    ///
    /// Returns `None` if a battery display is already in progress; the
    /// sequence runs exactly once and may not be re-entered.
    pub fn begin_battery_display(&mut self, percent: u8) -> Option<u8> {
        if self.battery_display {
            return None;
        }
        self.battery_display = true;
        Some(battery_blink_count(percent))
    }

    /// Release the battery-display lock.
    ///
    /// Returns `true` when the caller should wait
    /// `ADVERTISING_INTERVAL_MS` and then start the advertising indicator
    /// (still disconnected, and the advertising display is enabled).
    pub fn finish_battery_display(&mut self) -> bool {
        self.battery_display = false;
        self.connection == ConnectionState::Disconnected && config::ADVERTISING_DISPLAY_ENABLED
    }

    /// Start (or restart) the advertising blink chain.
    ///
    /// No-op while the battery display holds the lock. Otherwise resets
    /// the cycle and returns `true`: the caller schedules an immediate
    /// firing. Restarting while already active resets rather than stacks.
    pub fn start_advertising(&mut self) -> bool {
        if self.battery_display {
            return false;
        }
        self.phase = BlinkPhase::Off(0);
        true
    }

    /// Stop the advertising blink chain.
    ///
    /// The caller cancels any pending firing and forces the LED off.
    /// Safe to call when the chain is not running.
    pub fn stop_advertising(&mut self) {
        self.phase = BlinkPhase::Inactive;
    }

    /// Advance the advertising chain by one timer firing.
    pub fn timer_fired(&mut self) -> BlinkStep {
        // Battery display in progress: abandon the in-flight cycle.
        if self.battery_display {
            return BlinkStep::Suppressed;
        }

        match self.phase {
            BlinkPhase::Inactive => BlinkStep::Halt,
            _ if !config::ADVERTISING_DISPLAY_ENABLED => {
                self.phase = BlinkPhase::Inactive;
                BlinkStep::Halt
            }
            BlinkPhase::On(count) => {
                if count + 1 < MAX_BLINKS {
                    self.phase = BlinkPhase::Off(count + 1);
                    BlinkStep::Drive {
                        led_on: false,
                        next_in_ms: config::PAUSE_MS,
                    }
                } else {
                    // Cycle complete: long pause, then start over.
                    self.phase = BlinkPhase::Off(0);
                    BlinkStep::Drive {
                        led_on: false,
                        next_in_ms: config::ADVERTISING_INTERVAL_MS,
                    }
                }
            }
            BlinkPhase::Off(count) => {
                self.phase = BlinkPhase::On(count);
                BlinkStep::Drive {
                    led_on: true,
                    next_in_ms: config::BLINK_MS,
                }
            }
        }
    }

    /// Handle a connection-established event.
    pub fn on_connected(&mut self, success: bool) -> ConnectedAction {
        if !success {
            return ConnectedAction::Ignore;
        }

        self.connection = ConnectionState::Connected;
        self.stop_advertising();

        if self.battery_display || !config::CONNECTED_DISPLAY_ENABLED {
            ConnectedAction::Stop
        } else {
            ConnectedAction::StopThenPulse
        }
    }

    /// Handle a disconnection event.
    ///
    /// Returns `true` when the caller should schedule an immediate firing
    /// of the (re)started advertising chain.
    pub fn on_disconnected(&mut self) -> bool {
        self.connection = ConnectionState::Disconnected;
        self.start_advertising()
    }
}

impl Default for IndicatorMachine {
    fn default() -> Self {
        Self::new()
    }
}
