//! Finding players on the network
//!
//! Two strategies. [`discover_by_serial`] scans until a player reports the
//! wanted serial number. The `discover_all_*` and
//! [`discover_specific_by_serial`] helpers stop at the first player found and
//! ask it for the household topology instead, which is faster and
//! deterministic on large networks.

use crate::error::{Error, Result};
use crate::topology::{self, PlayerAddress};
use serde::Serialize;
use sonos_api::SonosActions;
use sonos_discovery::{get_iter_with_timeout, Device, DeviceEvent, DiscoveryError};
use std::time::Duration;
use tracing::{debug, info};

/// Default search window when looking for a serial number
pub const SERIAL_SEARCH_WINDOW: Duration = Duration::from_millis(4000);

/// Source of discovered players
///
/// The iterator ends when the search window closes; a network fault is
/// yielded as `Err`. Dropping it cancels the search.
pub trait PlayerScanner {
    fn scan(
        &self,
        window: Duration,
    ) -> Box<dyn Iterator<Item = std::result::Result<Device, DiscoveryError>> + '_>;
}

/// Scans with SSDP M-SEARCH
#[derive(Debug, Clone, Copy, Default)]
pub struct SsdpScanner;

impl PlayerScanner for SsdpScanner {
    fn scan(
        &self,
        window: Duration,
    ) -> Box<dyn Iterator<Item = std::result::Result<Device, DiscoveryError>> + '_> {
        Box::new(get_iter_with_timeout(window).map(|event| {
            event.map(|event| match event {
                DeviceEvent::Found(device) => device,
            })
        }))
    }
}

/// A selectable player: display label and configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerChoice {
    pub label: String,
    pub value: String,
}

/// Host of the player whose description carries `serial`.
///
/// Serial numbers compare trimmed and case-insensitively. Returns `Ok(None)`
/// when the window closes without a match; a network fault, including a
/// failed description fetch, ends the search with that error.
pub fn discover_by_serial(
    scanner: &dyn PlayerScanner,
    serial: &str,
    window: Duration,
) -> Result<Option<String>> {
    let wanted = serial.trim().to_uppercase();

    for device in scanner.scan(window) {
        let device = device?;
        let found = device
            .serial_number
            .as_deref()
            .map(|serial| serial.trim().to_uppercase());

        debug!(host = %device.ip_address, serial = ?found, "checking player");
        if found.as_deref() == Some(wanted.as_str()) {
            info!(host = %device.ip_address, "found player by serial");
            return Ok(Some(device.ip_address));
        }
    }

    Ok(None)
}

/// Host of the player with `serial`, matched against the household topology
/// of the first player found.
pub fn discover_specific_by_serial(
    scanner: &dyn PlayerScanner,
    actions: &dyn SonosActions,
    serial: &str,
    window: Duration,
) -> Result<String> {
    let first = first_player(scanner, window)?
        .ok_or_else(|| Error::DiscoveryNotFound("could not find any player".to_string()))?;

    let state = actions.zone_group_state(&first.base_url())?;
    topology::sorted_groups(&state)?
        .into_iter()
        .flat_map(|group| group.members)
        .find(|member| topology::match_serial_uuid(serial, &member.uuid))
        .map(|member| member.host_name)
        .ok_or_else(|| {
            Error::DiscoveryNotFound("could not find any player matching serial".to_string())
        })
}

/// Every visible player as `"{host} for {name}"` / host.
///
/// Empty when no player answers within the window.
pub fn discover_all_with_host(
    scanner: &dyn PlayerScanner,
    actions: &dyn SonosActions,
    window: Duration,
) -> Result<Vec<PlayerChoice>> {
    let Some(first) = first_player(scanner, window)? else {
        return Ok(Vec::new());
    };

    Ok(topology::household_members(actions, &first)?
        .into_iter()
        .map(|entry| PlayerChoice {
            label: format!("{} for {}", entry.member.host_name, entry.member.name),
            value: entry.member.host_name,
        })
        .collect())
}

/// Every visible player as `"{serial} for {name}"` / serial.
///
/// Reads each player's description; players without a serial are left out.
pub fn discover_all_with_serial(
    scanner: &dyn PlayerScanner,
    actions: &dyn SonosActions,
    window: Duration,
) -> Result<Vec<PlayerChoice>> {
    let Some(first) = first_player(scanner, window)? else {
        return Ok(Vec::new());
    };

    let mut choices = Vec::new();
    for entry in topology::household_members(actions, &first)? {
        let description = actions.device_description(&entry.member.base_url)?;
        match description.serial_num {
            Some(serial) => choices.push(PlayerChoice {
                label: format!("{} for {}", serial, entry.member.name),
                value: serial,
            }),
            None => debug!(player = %entry.member.name, "player reports no serial number"),
        }
    }
    Ok(choices)
}

fn first_player(scanner: &dyn PlayerScanner, window: Duration) -> Result<Option<PlayerAddress>> {
    match scanner.scan(window).next() {
        Some(device) => {
            let device = device?;
            Ok(Some(PlayerAddress::with_port(device.ip_address, device.port)))
        }
        None => Ok(None),
    }
}
