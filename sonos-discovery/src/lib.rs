//! Sonos device discovery library
//!
//! Discovers Sonos players on the local network with SSDP and reads their
//! UPnP device descriptions.
//!
//! # Iterator-based Discovery
//!
//! The iterator is lazy: each device is resolved when `next()` is called, so
//! callers looking for one specific player can stop as soon as it shows up.
//!
//! ```no_run
//! use sonos_discovery::{get_iter_with_timeout, DeviceEvent};
//! use std::time::Duration;
//!
//! for event in get_iter_with_timeout(Duration::from_secs(4)) {
//!     match event {
//!         Ok(DeviceEvent::Found(device)) => {
//!             println!("Found: {} ({:?})", device.name, device.serial_number);
//!             break;
//!         }
//!         Err(e) => {
//!             eprintln!("discovery failed: {}", e);
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod device;
mod discovery;
mod error;
mod ssdp;

pub use device::{description_url, fetch_device_description, DeviceDescription};
pub use discovery::DiscoveryIterator;
pub use error::{DiscoveryError, Result};

use std::time::Duration;

/// Information about a discovered Sonos device.
#[derive(Debug, Clone)]
pub struct Device {
    /// Unique device identifier (UDN), e.g., "uuid:RINCON_000E58A0123456"
    pub id: String,
    /// Friendly name of the device
    pub name: String,
    /// Room name where the device is located
    pub room_name: String,
    /// IP address of the device
    pub ip_address: String,
    /// Port number (typically 1400)
    pub port: u16,
    /// Model name (e.g., "Sonos One", "Sonos Play:1")
    pub model_name: String,
    /// Serial number from the description, e.g. "00-0E-58-A0-12-34:5"
    pub serial_number: Option<String>,
}

impl Device {
    /// Base URL for SOAP requests, e.g. `http://192.168.1.100:1400`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.ip_address, self.port)
    }
}

/// Events emitted during device discovery.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A Sonos device was found on the network
    Found(Device),
}

/// Discover all Sonos devices, collecting them once the search window closes.
///
/// The first network fault aborts the search.
pub fn get_with_timeout(timeout: Duration) -> Result<Vec<Device>> {
    get_iter_with_timeout(timeout)
        .map(|event| {
            event.map(|event| match event {
                DeviceEvent::Found(device) => device,
            })
        })
        .collect()
}

/// Get a lazy discovery iterator whose search window is `timeout`.
///
/// If the UDP socket cannot be created the iterator yields that error once.
pub fn get_iter_with_timeout(timeout: Duration) -> DiscoveryIterator {
    DiscoveryIterator::new(timeout).unwrap_or_else(|e| {
        tracing::warn!("discovery unavailable: {}", e);
        DiscoveryIterator::failed(e)
    })
}
