//! Battery subsystem - boot-time state-of-charge measurement.
//!
//! One SAADC sample of the supply rail is taken during the indicator's
//! startup sequence (after [`crate::config::BATTERY_SETTLE_MS`]) and
//! converted to a percentage through [`soc`]. The reading is cached so
//! the GATT Battery Service can report it without re-sampling.

pub mod soc;

#[cfg(feature = "embedded")]
use core::sync::atomic::{AtomicU8, Ordering};

#[cfg(feature = "embedded")]
use embassy_nrf::saadc::Saadc;

#[cfg(feature = "embedded")]
static LAST_SOC: AtomicU8 = AtomicU8::new(0);

/// Measure the supply rail once and convert it to a state of charge.
#[cfg(feature = "embedded")]
pub async fn state_of_charge(adc: &mut Saadc<'_, 1>) -> u8 {
    let mut buf = [0i16; 1];
    adc.sample(&mut buf).await;

    let millivolts = soc::raw_to_millivolts(buf[0]);
    let percent = soc::millivolts_to_soc(millivolts);
    LAST_SOC.store(percent, Ordering::Relaxed);
    percent
}

/// Most recent measurement, for the GATT Battery Service.
#[cfg(feature = "embedded")]
pub fn last_state_of_charge() -> u8 {
    LAST_SOC.load(Ordering::Relaxed)
}
