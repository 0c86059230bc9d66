//! SSDP (Simple Service Discovery Protocol) client
//!
//! Internal to the crate: sends one M-SEARCH for Sonos ZonePlayers and reads
//! responses until the overall search window closes.

use crate::error::{DiscoveryError, Result};
use std::net::UdpSocket;
use std::time::{Duration, Instant};

const SSDP_ADDRESS: &str = "239.255.255.250:1900";

/// Search target for Sonos players.
pub(crate) const ZONE_PLAYER_URN: &str = "urn:schemas-upnp-org:device:ZonePlayer:1";

/// SSDP response containing device information
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SsdpResponse {
    pub location: String,
    pub urn: String,
    pub usn: String,
    pub server: Option<String>,
}

/// SSDP client for device discovery
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    window: Duration,
}

impl SsdpClient {
    /// Create a new SSDP client whose searches last at most `window`
    pub fn new(window: Duration) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e)))?;

        socket
            .set_multicast_loop_v4(true)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e)))?;

        Ok(Self { socket, window })
    }

    /// Send an M-SEARCH request; the returned iterator owns the socket
    pub fn search(self, search_target: &str) -> Result<SsdpResponseIterator> {
        let request = format!(
            "M-SEARCH * HTTP/1.1\r\n\
             HOST: {}\r\n\
             MAN: \"ssdp:discover\"\r\n\
             MX: 1\r\n\
             ST: {}\r\n\
             USER-AGENT: sonos-universal/1.0 UPnP/1.0\r\n\
             \r\n",
            SSDP_ADDRESS, search_target
        );

        self.socket
            .send_to(request.as_bytes(), SSDP_ADDRESS)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        Ok(SsdpResponseIterator {
            socket: self.socket,
            buffer: [0; 2048],
            deadline: Instant::now() + self.window,
            finished: false,
        })
    }
}

/// Iterator over SSDP responses, ending when the search window closes
pub(crate) struct SsdpResponseIterator {
    socket: UdpSocket,
    buffer: [u8; 2048],
    deadline: Instant,
    finished: bool,
}

impl Iterator for SsdpResponseIterator {
    type Item = Result<SsdpResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                self.finished = true;
                break;
            }
            if let Err(e) = self.socket.set_read_timeout(Some(remaining)) {
                self.finished = true;
                return Some(Err(DiscoveryError::NetworkError(format!(
                    "Failed to set read timeout: {}",
                    e
                ))));
            }

            match self.socket.recv_from(&mut self.buffer) {
                Ok((size, _)) => {
                    // skip anything that is not a parseable UTF-8 response
                    let parsed = std::str::from_utf8(&self.buffer[..size])
                        .ok()
                        .and_then(parse_ssdp_response);
                    if let Some(response) = parsed {
                        return Some(Ok(response));
                    }
                }
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    self.finished = true;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(DiscoveryError::NetworkError(format!("Socket error: {}", e))));
                }
            }
        }
        None
    }
}

/// Parse an SSDP response; LOCATION, ST and USN are required
fn parse_ssdp_response(response: &str) -> Option<SsdpResponse> {
    let header = |name: &str| {
        response
            .lines()
            .find_map(|line| extract_header_value(line.trim(), name))
    };

    Some(SsdpResponse {
        location: header("LOCATION:")?,
        urn: header("ST:")?,
        usn: header("USN:")?,
        server: header("SERVER:"),
    })
}

/// Extract the value from a line like "HEADER: value", matching the name case-insensitively
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    let name = line.get(..header.len())?;
    let value = line.get(header.len()..)?;
    if value.is_empty() || !name.eq_ignore_ascii_case(header) {
        return None;
    }
    Some(value.trim().to_string())
}
