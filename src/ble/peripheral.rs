//! BLE peripheral - advertising, GATT server, connection lifecycle.
//!
//! The advertise → serve → re-advertise loop is the event source for the
//! indicator: link-up and link-down publish to [`CONN_EVENTS`]. A failed
//! advertise attempt publishes nothing - downstream treats a failed
//! negotiation as if it never happened.

use core::mem;

use defmt::{info, unwrap, warn};
use nrf_softdevice::ble::{gatt_server, peripheral};
use nrf_softdevice::{raw, Softdevice};

use crate::battery;
use crate::ble::{self, ConnEvent, CONN_EVENTS};
use crate::config;

/// GATT Battery Service (0x180F), exposing the boot state-of-charge.
#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    /// Battery Level characteristic (0x2A19).
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
}

// Advertisement payload: flags, HID + Battery Service UUIDs, keyboard
// appearance (0x03C1).
#[rustfmt::skip]
static ADV_DATA: &[u8] = &[
    0x02, 0x01, raw::BLE_GAP_ADV_FLAGS_LE_ONLY_GENERAL_DISC_MODE as u8,
    0x05, 0x03, 0x12, 0x18, 0x0f, 0x18,
    0x03, 0x19, 0xc1, 0x03,
];

// Scan response: complete local name. Must match `config::BLE_DEVICE_NAME`.
#[rustfmt::skip]
static SCAN_DATA: &[u8] = &[
    0x09, 0x09, b'K', b'b', b'S', b't', b'a', b't', b'u', b's',
];

/// SoftDevice configuration for a single-link peripheral.
pub fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: config::BLE_DEVICE_NAME.as_ptr() as _,
            current_len: config::BLE_DEVICE_NAME.len() as u16,
            max_len: config::BLE_DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Advertise, serve GATT, publish connection lifecycle events, repeat.
#[embassy_executor::task]
pub async fn peripheral_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    let events = CONN_EVENTS.sender();

    loop {
        let adv_config = peripheral::Config::default();
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: ADV_DATA,
            scan_data: SCAN_DATA,
        };

        let conn = match peripheral::advertise_connectable(sd, adv, &adv_config).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("advertising failed: {}", e);
                continue;
            }
        };

        info!("host connected");
        ble::set_link_up(true);
        unwrap!(server.bas.battery_level_set(&battery::last_state_of_charge()));
        events.send(ConnEvent::Connected { success: true }).await;

        let disconnect = gatt_server::run(&conn, server, |_| {}).await;
        info!("host disconnected: {}", disconnect);

        ble::set_link_up(false);
        events.send(ConnEvent::Disconnected).await;
    }
}
