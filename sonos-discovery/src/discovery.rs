//! Discovery iterator.
//!
//! Sends one SSDP M-SEARCH for ZonePlayers, then lazily turns each response
//! into a [`Device`](crate::Device) by fetching its description. Responses are
//! deduplicated by location and non-Sonos devices are skipped. Dropping the
//! iterator closes the UDP socket, which is how callers cancel a search.
//!
//! A network fault is yielded once as `Err` and ends the iteration; a window
//! that closes without responses simply ends it.

use crate::device::{extract_ip_from_url, extract_port_from_url, fetch_with_client};
use crate::error::{DiscoveryError, Result};
use crate::ssdp::{SsdpClient, SsdpResponse, SsdpResponseIterator, ZONE_PLAYER_URN};
use crate::DeviceEvent;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, trace};

/// Iterator that discovers Sonos devices on the local network.
///
/// ```no_run
/// use sonos_discovery::{get_iter_with_timeout, DeviceEvent};
/// use std::time::Duration;
///
/// for event in get_iter_with_timeout(Duration::from_secs(2)) {
///     match event {
///         Ok(DeviceEvent::Found(device)) => println!("Found: {}", device.name),
///         Err(e) => eprintln!("discovery failed: {}", e),
///     }
/// }
/// ```
pub struct DiscoveryIterator {
    failure: Option<DiscoveryError>,
    pending: Option<SsdpClient>,
    responses: Option<SsdpResponseIterator>,
    seen_locations: HashSet<String>,
    http_client: Option<reqwest::blocking::Client>,
}

impl DiscoveryIterator {
    /// Create a new discovery iterator; `timeout` bounds the SSDP search
    /// window and each description request.
    pub fn new(timeout: Duration) -> Result<Self> {
        let ssdp_client = SsdpClient::new(timeout)?;
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            failure: None,
            pending: Some(ssdp_client),
            responses: None,
            seen_locations: HashSet::new(),
            http_client: Some(http_client),
        })
    }

    /// An iterator that yields `error` once, for a search that could not start.
    pub(crate) fn failed(error: DiscoveryError) -> Self {
        Self {
            failure: Some(error),
            pending: None,
            responses: None,
            seen_locations: HashSet::new(),
            http_client: None,
        }
    }

    /// Cheap pre-filter on SSDP headers before any HTTP request is made
    fn is_likely_sonos(response: &SsdpResponse) -> bool {
        response.urn.contains("ZonePlayer")
            || response.usn.contains("RINCON")
            || response
                .server
                .as_deref()
                .is_some_and(|server| server.to_lowercase().contains("sonos"))
    }

    /// Send the M-SEARCH on first use.
    fn start_search(&mut self) -> Result<()> {
        if let Some(client) = self.pending.take() {
            self.responses = Some(client.search(ZONE_PLAYER_URN)?);
        }
        Ok(())
    }

    /// `Ok(None)` for responses that turn out not to be Sonos players.
    fn resolve(&self, response: &SsdpResponse) -> Result<Option<DeviceEvent>> {
        let Some(http_client) = self.http_client.as_ref() else {
            return Ok(None);
        };

        let description = fetch_with_client(http_client, &response.location)?;
        if !description.is_sonos_device() {
            debug!(location = %response.location, "skipping non-Sonos device");
            return Ok(None);
        }

        let Some(ip_address) = extract_ip_from_url(&response.location) else {
            return Err(DiscoveryError::InvalidDevice(format!(
                "no host in location {}",
                response.location
            )));
        };
        let port = extract_port_from_url(&response.location);
        Ok(Some(DeviceEvent::Found(description.to_device(ip_address, port))))
    }

    fn stop(&mut self, error: DiscoveryError) -> Option<Result<DeviceEvent>> {
        self.responses = None;
        self.http_client = None;
        Some(Err(error))
    }
}

impl Iterator for DiscoveryIterator {
    type Item = Result<DeviceEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.failure.take() {
            return Some(Err(error));
        }
        if let Err(e) = self.start_search() {
            return self.stop(e);
        }

        loop {
            let response = match self.responses.as_mut()?.next()? {
                Ok(response) => response,
                Err(e) => return self.stop(e),
            };

            if !self.seen_locations.insert(response.location.clone()) {
                continue;
            }
            if !Self::is_likely_sonos(&response) {
                trace!(location = %response.location, "ignoring non-Sonos SSDP response");
                continue;
            }

            match self.resolve(&response) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => return self.stop(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_search_yields_error_once() {
        let mut iter = DiscoveryIterator::failed(DiscoveryError::NetworkError(
            "Failed to bind UDP socket: address in use".to_string(),
        ));

        match iter.next() {
            Some(Err(DiscoveryError::NetworkError(msg))) => assert!(msg.contains("bind")),
            other => panic!("expected network error, got {:?}", other),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_sonos_prefilter() {
        let response = |urn: &str, usn: &str, server: Option<&str>| SsdpResponse {
            location: "http://10.0.0.2:1400/xml/device_description.xml".to_string(),
            urn: urn.to_string(),
            usn: usn.to_string(),
            server: server.map(str::to_string),
        };

        let likely = |r: SsdpResponse| DiscoveryIterator::is_likely_sonos(&r);

        assert!(likely(response(ZONE_PLAYER_URN, "uuid:x", None)));
        assert!(likely(response("upnp:rootdevice", "uuid:RINCON_A::x", None)));
        assert!(likely(response("upnp:rootdevice", "uuid:x", Some("Linux UPnP/1.0 Sonos/70.3"))));
        assert!(!likely(response("upnp:rootdevice", "uuid:x", Some("Hue"))));
    }
}
