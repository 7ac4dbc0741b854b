//! kb-status-led - status LED indicator for a BLE keyboard.
//!
//! The indicator state machine, LED output and battery conversion are
//! pure logic and build on the host (no embedded hardware required); the
//! hardware-facing modules (Embassy worker, SoftDevice peripheral, SAADC
//! sampling) are gated behind the `embedded` feature and only build for
//! the nRF52840 target.
//!
//! Usage: `cargo test` for the host suite, or
//! `cargo build --release --features embedded --target thumbv7em-none-eabihf`
//! for the firmware binary (see `src/main.rs`).

#![cfg_attr(not(test), no_std)]

pub mod battery;
pub mod config;
pub mod error;
pub mod indicator;

#[cfg(feature = "embedded")]
pub mod ble;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - indicator machine, LED output, battery conversion
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::config;
    use crate::error::Error;
    use crate::indicator::led::StatusLed;
    use crate::indicator::machine::{
        battery_blink_count, BlinkPhase, BlinkStep, ConnectedAction, ConnectionState,
        IndicatorMachine, MAX_BLINKS,
    };

    // ════════════════════════════════════════════════════════════════════════
    // Fake GPIO pin
    // ════════════════════════════════════════════════════════════════════════

    #[derive(Debug)]
    struct FakePinError;

    impl embedded_hal::digital::Error for FakePinError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    /// Recording fake pin; `writes` is shared so tests keep a handle after
    /// the pin moves into a `StatusLed`.
    #[derive(Clone, Default)]
    struct FakePin {
        fail: bool,
        writes: Rc<RefCell<Vec<bool>>>,
    }

    impl FakePin {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = FakePinError;
    }

    impl embedded_hal::digital::OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), FakePinError> {
            if self.fail {
                return Err(FakePinError);
            }
            self.writes.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), FakePinError> {
            if self.fail {
                return Err(FakePinError);
            }
            self.writes.borrow_mut().push(true);
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Battery blink count thresholds
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn blink_count_high_charge() {
        assert_eq!(battery_blink_count(71), 3);
        assert_eq!(battery_blink_count(85), 3);
        assert_eq!(battery_blink_count(100), 3);
    }

    #[test]
    fn blink_count_mid_charge() {
        assert_eq!(battery_blink_count(31), 2);
        assert_eq!(battery_blink_count(50), 2);
        assert_eq!(battery_blink_count(70), 2); // boundary: exactly 70 → 2
    }

    #[test]
    fn blink_count_low_charge() {
        assert_eq!(battery_blink_count(0), 1);
        assert_eq!(battery_blink_count(15), 1);
        assert_eq!(battery_blink_count(30), 1); // boundary: exactly 30 → 1
    }

    // ════════════════════════════════════════════════════════════════════════
    // State-of-charge conversion
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn soc_raw_sample_conversion() {
        use crate::battery::soc::raw_to_millivolts;

        assert_eq!(raw_to_millivolts(0), 0);
        assert_eq!(raw_to_millivolts(-5), 0);
        // Full scale (4095) maps just below the 3.6 V reference range.
        assert_eq!(raw_to_millivolts(4095), 3599);
        // 3.3 V rail: raw = 3300 * 4096 / 3600 ≈ 3755.
        assert_eq!(raw_to_millivolts(3755), 3300);
    }

    #[test]
    fn soc_curve_endpoints() {
        use crate::battery::soc::millivolts_to_soc;

        assert_eq!(millivolts_to_soc(4200), 100);
        assert_eq!(millivolts_to_soc(4300), 100);
        assert_eq!(millivolts_to_soc(3450), 0);
        assert_eq!(millivolts_to_soc(3000), 0);
    }

    #[test]
    fn soc_curve_is_monotonic() {
        use crate::battery::soc::millivolts_to_soc;

        let mut last = 0;
        for mv in (3400..=4250).step_by(10) {
            let soc = millivolts_to_soc(mv);
            assert!(soc >= last, "curve dipped at {} mV", mv);
            last = soc;
        }
        assert_eq!(millivolts_to_soc(3700), 34);
        assert_eq!(millivolts_to_soc(4000), 74);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Advertising chain transitions
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn start_resets_chain_and_requests_immediate_firing() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());
        assert_eq!(machine.phase(), BlinkPhase::Off(0));
    }

    #[test]
    fn start_is_a_noop_while_battery_display_holds_the_led() {
        let mut machine = IndicatorMachine::new();
        machine.begin_battery_display(50).unwrap();

        assert!(!machine.start_advertising());
        assert_eq!(machine.phase(), BlinkPhase::Inactive);
    }

    #[test]
    fn chain_produces_double_blink_then_long_pause() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());

        let expected = [
            BlinkStep::Drive { led_on: true, next_in_ms: config::BLINK_MS },
            BlinkStep::Drive { led_on: false, next_in_ms: config::PAUSE_MS },
            BlinkStep::Drive { led_on: true, next_in_ms: config::BLINK_MS },
            BlinkStep::Drive { led_on: false, next_in_ms: config::ADVERTISING_INTERVAL_MS },
        ];
        for step in expected {
            assert_eq!(machine.timer_fired(), step);
        }
        // Cycle wrapped: the count is back at zero.
        assert_eq!(machine.phase(), BlinkPhase::Off(0));
    }

    #[test]
    fn chain_period_matches_the_pattern() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());

        let mut period = 0;
        for _ in 0..(MAX_BLINKS * 2) {
            match machine.timer_fired() {
                BlinkStep::Drive { next_in_ms, .. } => period += next_in_ms,
                other => panic!("chain halted unexpectedly: {:?}", other),
            }
        }
        assert_eq!(
            period,
            2 * config::BLINK_MS + config::PAUSE_MS + config::ADVERTISING_INTERVAL_MS
        );
    }

    #[test]
    fn restart_while_active_resets_the_cycle() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());
        machine.timer_fired();
        machine.timer_fired();
        assert_eq!(machine.phase(), BlinkPhase::Off(1));

        assert!(machine.start_advertising());
        assert_eq!(machine.phase(), BlinkPhase::Off(0));
    }

    #[test]
    fn firing_while_inactive_forces_the_led_off() {
        let mut machine = IndicatorMachine::new();
        assert_eq!(machine.timer_fired(), BlinkStep::Halt);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut machine = IndicatorMachine::new();
        machine.stop_advertising();
        assert_eq!(machine.phase(), BlinkPhase::Inactive);

        machine.start_advertising();
        machine.stop_advertising();
        machine.stop_advertising();
        assert_eq!(machine.phase(), BlinkPhase::Inactive);
        assert_eq!(machine.timer_fired(), BlinkStep::Halt);
    }

    #[test]
    fn firing_under_battery_display_abandons_the_cycle() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());
        machine.timer_fired(); // On(0)

        machine.begin_battery_display(90).unwrap();
        assert_eq!(machine.timer_fired(), BlinkStep::Suppressed);
        // No reschedule and no LED change, however often the stale slot fires.
        assert_eq!(machine.timer_fired(), BlinkStep::Suppressed);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Battery display lock
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn battery_display_runs_once() {
        let mut machine = IndicatorMachine::new();
        assert_eq!(machine.begin_battery_display(85), Some(3));
        assert!(machine.battery_display_active());
        assert_eq!(machine.begin_battery_display(85), None);
    }

    #[test]
    fn finish_kicks_advertising_only_while_disconnected() {
        let mut machine = IndicatorMachine::new();
        machine.begin_battery_display(40).unwrap();
        assert!(machine.finish_battery_display());

        let mut machine = IndicatorMachine::new();
        machine.set_connected();
        machine.begin_battery_display(40).unwrap();
        assert!(!machine.finish_battery_display());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Connection events
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn failed_negotiation_is_ignored() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());
        machine.timer_fired();

        assert_eq!(machine.on_connected(false), ConnectedAction::Ignore);
        assert_eq!(machine.connection(), ConnectionState::Disconnected);
        // The chain carries on untouched.
        assert_eq!(
            machine.timer_fired(),
            BlinkStep::Drive { led_on: false, next_in_ms: config::PAUSE_MS }
        );
    }

    #[test]
    fn connect_stops_the_chain_and_pulses() {
        let mut machine = IndicatorMachine::new();
        assert!(machine.start_advertising());
        machine.timer_fired();

        assert_eq!(machine.on_connected(true), ConnectedAction::StopThenPulse);
        assert_eq!(machine.connection(), ConnectionState::Connected);
        assert_eq!(machine.phase(), BlinkPhase::Inactive);
    }

    #[test]
    fn connect_during_battery_display_skips_the_pulse() {
        let mut machine = IndicatorMachine::new();
        machine.begin_battery_display(50).unwrap();

        assert_eq!(machine.on_connected(true), ConnectedAction::Stop);
        assert_eq!(machine.connection(), ConnectionState::Connected);
    }

    #[test]
    fn disconnect_restarts_advertising_immediately() {
        let mut machine = IndicatorMachine::new();
        machine.set_connected();

        assert!(machine.on_disconnected());
        assert_eq!(machine.connection(), ConnectionState::Disconnected);
        assert_eq!(machine.phase(), BlinkPhase::Off(0));
    }

    #[test]
    fn disconnect_during_battery_display_defers_to_the_lock() {
        let mut machine = IndicatorMachine::new();
        machine.set_connected();
        machine.begin_battery_display(50).unwrap();

        assert!(!machine.on_disconnected());
        assert_eq!(machine.connection(), ConnectionState::Disconnected);
        // The post-display continuation starts the chain instead.
        assert!(machine.finish_battery_display());
    }

    // ════════════════════════════════════════════════════════════════════════
    // LED output
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn led_tracks_last_commanded_state() {
        let pin = FakePin::default();
        let writes = pin.writes.clone();
        let mut led = StatusLed::new(pin);

        led.configure().unwrap();
        assert!(!led.is_lit());

        led.turn_on().unwrap();
        assert!(led.is_lit());
        led.turn_off().unwrap();
        assert!(!led.is_lit());

        assert_eq!(*writes.borrow(), vec![false, true, false]);
    }

    #[test]
    fn led_configure_failure_is_device_not_ready() {
        let mut led = StatusLed::new(FakePin::failing());
        assert_eq!(led.configure(), Err(Error::DeviceNotReady));
    }

    #[test]
    fn led_write_failure_leaves_state_unchanged() {
        let mut led = StatusLed::new(FakePin::failing());
        assert_eq!(led.turn_on(), Err(Error::SetPinFailed));
        assert!(!led.is_lit());
        assert_eq!(led.turn_off(), Err(Error::SetPinFailed));
        assert!(!led.is_lit());
    }
}
