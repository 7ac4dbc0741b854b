//! kb-status-led firmware entry point.
//!
//! Wires the board together: SoftDevice S140 (BLE peripheral), one-shot
//! SAADC battery measurement, and the status LED indicator worker. The
//! indicator is best-effort: if its hardware is unavailable the failure
//! is logged and the rest of the firmware keeps running without it.
//!
//! Run with: `cargo run --release --features embedded`

#![no_std]
#![no_main]

use defmt::{error, info, unwrap};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::{bind_interrupts, saadc};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

use kb_status_led::ble::peripheral::{self, Server};
use kb_status_led::indicator::worker;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(nrf_config());
    info!("kb-status-led boot");

    let sd = Softdevice::enable(&peripheral::softdevice_config());

    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(peripheral::peripheral_task(sd, server)));

    // One-shot VDD sampling for the boot battery display.
    let channel = saadc::ChannelConfig::single_ended(saadc::VddInput);
    let adc = saadc::Saadc::new(p.SAADC, Irqs, saadc::Config::default(), [channel]);

    // Status LED on P0.06, dark until the worker takes over.
    let led = Output::new(p.P0_06, Level::Low, OutputDrive::Standard);

    // An indicator failure must never block keyboard boot.
    if let Err(e) = worker::init(&spawner, led, adc) {
        error!("status LED subsystem unavailable: {}", e);
    }
}

// The SoftDevice reserves interrupt priorities 0, 1 and 4; keep ours off
// those levels.
fn nrf_config() -> embassy_nrf::config::Config {
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    config
}
