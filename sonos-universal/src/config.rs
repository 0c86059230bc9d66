//! Node configuration
//!
//! A node is bound to one player, given either by IP address or by serial
//! number. The address is resolved once at setup; the command and its value
//! may be fixed here or taken from each message.

use crate::discovery::{self, PlayerScanner};
use crate::error::{Error, Result};
use crate::topology::PlayerAddress;
use crate::validation::patterns;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Command value meaning "read the command from each message"
pub const COMMAND_FROM_MESSAGE: &str = "message";

/// Configuration of a [`UniversalNode`](crate::node::UniversalNode)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniversalConfig {
    /// IPv4 address of the player; wins over the serial number when valid
    /// Default: none
    #[serde(rename = "ipaddress")]
    pub ip_address: Option<String>,

    /// Serial number as printed on the player, e.g. `00-0E-58-A0-12-34:5`
    /// Default: none
    #[serde(rename = "serialnum")]
    pub serial_number: Option<String>,

    /// Fixed command, or `message` to read it from every message
    /// Default: "message"
    pub command: String,

    /// Fixed command value, replacing the message's value field when it is a
    /// non-empty string, a number or a boolean
    /// Default: none
    pub state: Option<Value>,

    /// Swap the command and value fields (`payload` carries the command)
    /// Default: false
    pub compatibility_mode: bool,

    /// How long discovery by serial number waits for the player
    /// Default: 4000 ms
    #[serde(rename = "discoveryTimeout")]
    pub discovery_timeout_ms: u64,
}

impl Default for UniversalConfig {
    fn default() -> Self {
        Self {
            ip_address: None,
            serial_number: None,
            command: COMMAND_FROM_MESSAGE.to_string(),
            state: None,
            compatibility_mode: false,
            discovery_timeout_ms: discovery::SERIAL_SEARCH_WINDOW.as_millis() as u64,
        }
    }
}

impl UniversalConfig {
    /// Configuration for the player at `ip_address`
    pub fn with_ip(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: Some(ip_address.into()),
            ..Default::default()
        }
    }

    /// Configuration for the player with `serial_number`
    pub fn with_serial(serial_number: impl Into<String>) -> Self {
        Self {
            serial_number: Some(serial_number.into()),
            ..Default::default()
        }
    }

    /// Read a JSON configuration file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("could not read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Config(format!("config {} is invalid: {}", path.display(), e))
        })
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// Whether the command is read from each message
    pub fn command_from_message(&self) -> bool {
        self.command == COMMAND_FROM_MESSAGE
    }

    /// `(command field, value field)` of inbound messages
    pub fn field_names(&self) -> (&'static str, &'static str) {
        if self.compatibility_mode {
            ("payload", "topic")
        } else {
            ("topic", "payload")
        }
    }

    /// Address of the configured player.
    ///
    /// A valid IP address is used as is. Otherwise a valid serial number is
    /// searched for on the network.
    pub fn resolve_address(&self, scanner: &dyn PlayerScanner) -> Result<PlayerAddress> {
        if let Some(ip) = self.ip_address.as_deref().filter(|ip| patterns::IP.is_match(ip)) {
            return Ok(PlayerAddress::new(ip));
        }

        let Some(serial) = self
            .serial_number
            .as_deref()
            .filter(|serial| patterns::SERIAL.is_match(serial))
        else {
            return Err(Error::Config(
                "both ipaddress and serial number are invalid/missing".to_string(),
            ));
        };

        match discovery::discover_by_serial(scanner, serial, self.discovery_timeout()) {
            Ok(Some(host)) => {
                debug!(host = %host, "OK sonos player was found");
                Ok(PlayerAddress::new(host))
            }
            Ok(None) => Err(Error::Config(
                "could not find any player by serial".to_string(),
            )),
            Err(e) => {
                debug!(error = %e, "discovery by serial failed");
                Err(Error::Config(
                    "could not figure out ip address (discovery)".to_string(),
                ))
            }
        }
    }
}
