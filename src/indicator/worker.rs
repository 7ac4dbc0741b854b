//! Indicator worker - the dedicated task that owns the status LED.
//!
//! One task holds the [`IndicatorMachine`], the LED and the single timer
//! slot for the advertising blink chain, and receives connection events
//! from the BLE task over a channel. Serializing everything through one
//! owner means the shared flags need no locking, and the blocking display
//! sequences (battery blinks, connected pulse) stall only this task.
//!
//! The timer slot is an `Option<Instant>` deadline: scheduling replaces
//! any pending firing, cancelling clears it, and an immediate start is a
//! deadline of now.

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::Output;
use embassy_nrf::saadc::Saadc;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Duration, Instant, Timer};

use crate::battery;
use crate::ble::{self, ConnEvent};
use crate::config;
use crate::error::Error;
use crate::indicator::led::StatusLed;
use crate::indicator::machine::{BlinkStep, ConnectedAction, IndicatorMachine};

type Led = StatusLed<Output<'static>>;
type ConnEvents = Receiver<'static, CriticalSectionRawMutex, ConnEvent, 4>;

/// Configure the LED and schedule the indicator worker.
///
/// On failure the subsystem stays dormant: the LED is never commanded and
/// the caller is expected to log and continue booting.
pub fn init(spawner: &Spawner, pin: Output<'static>, adc: Saadc<'static, 1>) -> Result<(), Error> {
    let mut led = StatusLed::new(pin);
    led.configure()?;

    spawner
        .spawn(indicator_task(led, adc))
        .map_err(|_| Error::AlreadyRunning)?;

    info!("status LED configured, indicator worker scheduled");
    Ok(())
}

#[embassy_executor::task]
async fn indicator_task(led: Led, adc: Saadc<'static, 1>) -> ! {
    run(led, adc, ble::CONN_EVENTS.receiver()).await
}

async fn run(mut led: Led, mut adc: Saadc<'static, 1>, events: ConnEvents) -> ! {
    // Let drivers settle before commanding anything.
    Timer::after_millis(config::STARTUP_SETTLE_MS).await;
    info!("executing delayed status LED initialization");

    let mut machine = IndicatorMachine::new();

    // Pending firing of the advertising chain; at most one at any time.
    let mut deadline: Option<Instant> = None;

    // Wait a bit for the battery reading to stabilize.
    Timer::after_millis(config::BATTERY_SETTLE_MS).await;

    if config::BATTERY_DISPLAY_ENABLED {
        let percent = battery::state_of_charge(&mut adc).await;
        info!("battery at {}%", percent);

        if let Some(blinks) = machine.begin_battery_display(percent) {
            blink_battery_level(&mut led, blinks).await;
        }
        if machine.finish_battery_display() {
            // Leave the LED dark for one long-pause interval before the
            // advertising pattern takes over.
            Timer::after_millis(config::ADVERTISING_INTERVAL_MS).await;
            if machine.start_advertising() {
                deadline = Some(Instant::now());
            }
        }
    }

    // Check connectivity based on the keyboard role.
    let already_connected = if config::SPLIT_PERIPHERAL_ROLE {
        ble::peripheral_is_connected()
    } else {
        ble::active_profile_is_connected()
    };
    if already_connected {
        machine.set_connected();
    } else if machine.start_advertising() {
        deadline = Some(Instant::now());
    }

    info!("status LED initialization completed");

    loop {
        let event = match deadline {
            Some(at) => match select(events.receive(), Timer::at(at)).await {
                Either::First(event) => event,
                Either::Second(()) => {
                    deadline = None;
                    match machine.timer_fired() {
                        BlinkStep::Drive { led_on, next_in_ms } => {
                            drive(&mut led, led_on);
                            deadline = Some(Instant::now() + Duration::from_millis(next_in_ms));
                        }
                        BlinkStep::Halt => drive(&mut led, false),
                        BlinkStep::Suppressed => {}
                    }
                    continue;
                }
            },
            None => events.receive().await,
        };

        match event {
            ConnEvent::Connected { success } => match machine.on_connected(success) {
                ConnectedAction::Ignore => {}
                ConnectedAction::Stop => {
                    deadline = None;
                    drive(&mut led, false);
                }
                ConnectedAction::StopThenPulse => {
                    deadline = None;
                    drive(&mut led, false);
                    show_connected(&mut led).await;
                }
            },
            ConnEvent::Disconnected => {
                info!("link lost, resuming advertising indicator");
                if machine.on_disconnected() {
                    deadline = Some(Instant::now());
                }
            }
        }
    }
}

/// Blocking battery-level sequence: `blinks` × (on, hold, off, hold).
async fn blink_battery_level(led: &mut Led, blinks: u8) {
    for _ in 0..blinks {
        drive(led, true);
        Timer::after_millis(config::BATTERY_BLINK_MS).await;
        drive(led, false);
        Timer::after_millis(config::BATTERY_PAUSE_MS).await;
    }
}

/// Blocking connected pulse: one illumination of `CONNECTED_MS`.
async fn show_connected(led: &mut Led) {
    drive(led, true);
    Timer::after_millis(config::CONNECTED_MS).await;
    drive(led, false);
}

fn drive(led: &mut Led, on: bool) {
    if let Err(e) = led.set(on) {
        warn!("failed to drive status LED: {}", e);
    }
}
