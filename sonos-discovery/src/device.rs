//! Device description fetching and parsing.
//!
//! Every Sonos player serves its UPnP device description at
//! `http://{ip}:1400/xml/device_description.xml`. Besides names and model it
//! carries the serial number (`serialNum`) and the list of services the
//! player implements, which is how home theater capability is detected.

use crate::error::{DiscoveryError, Result};
use crate::Device;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Path of the device description on every Sonos player.
pub const DESCRIPTION_PATH: &str = "/xml/device_description.xml";

/// Control URL present only on players with a TV input.
pub const HT_CONTROL_URL: &str = "/HTControl/Control";

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct Root {
    pub device: DeviceDescription,
}

/// Device description of a Sonos player.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub model_description: Option<String>,
    /// Serial number, e.g. `00-0E-58-A0-12-34:5`
    #[serde(default)]
    pub serial_num: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
    #[serde(default)]
    pub zone_type: Option<String>,
    #[serde(rename = "UDN")]
    pub udn: String,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub service_list: ServiceList,
}

/// Services offered by the root device.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceDescription>,
}

/// One entry of the root device's `serviceList`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub service_type: String,
    pub service_id: String,
    #[serde(rename = "controlURL")]
    pub control_url: String,
    #[serde(rename = "eventSubURL", default)]
    pub event_sub_url: Option<String>,
}

impl DeviceDescription {
    /// Parse device description from XML.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed or missing required fields.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))?;

        Ok(root.device)
    }

    /// Convert device description to public Device type.
    pub fn to_device(&self, ip_address: String, port: u16) -> Device {
        Device {
            id: self.udn.clone(),
            name: self.friendly_name.clone(),
            room_name: self
                .room_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            ip_address,
            port,
            model_name: self.model_name.clone(),
            serial_number: self.serial_num.clone(),
        }
    }

    /// Check if this device is a Sonos device.
    ///
    /// Validates by checking manufacturer name and device type.
    pub fn is_sonos_device(&self) -> bool {
        self.manufacturer.to_lowercase().contains("sonos")
            || self.device_type.contains("ZonePlayer")
    }

    /// Whether the root device offers the given control URL.
    pub fn has_control_url(&self, control_url: &str) -> bool {
        self.service_list
            .services
            .iter()
            .any(|service| service.control_url == control_url)
    }

    /// Whether the player has a TV input (offers `/HTControl/Control`).
    pub fn supports_tv(&self) -> bool {
        self.has_control_url(HT_CONTROL_URL)
    }

    /// The UDN without its `uuid:` prefix, i.e. the `RINCON_...` id.
    pub fn rincon(&self) -> &str {
        self.udn.strip_prefix("uuid:").unwrap_or(&self.udn)
    }
}

/// Fetch and parse the device description at `url`.
///
/// `url` is the full description URL; see [`description_url`].
pub fn fetch_device_description(url: &str, timeout: Duration) -> Result<DeviceDescription> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;
    fetch_with_client(&client, url)
}

pub(crate) fn fetch_with_client(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<DeviceDescription> {
    debug!(%url, "fetching device description");

    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            DiscoveryError::Timeout
        } else {
            DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DiscoveryError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let xml = response
        .text()
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to read response body: {}", e)))?;

    DeviceDescription::from_xml(&xml)
}

/// Description URL for a player base URL such as `http://192.168.1.100:1400`.
pub fn description_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), DESCRIPTION_PATH)
}

/// Extract the host from a URL.
///
/// `http://192.168.1.100:1400/xml/device_description.xml` gives `192.168.1.100`.
pub fn extract_ip_from_url(url: &str) -> Option<String> {
    let authority = url.split("//").nth(1)?.split('/').next()?;
    authority.split(':').next().map(|s| s.to_string())
}

/// Extract the port from a URL, defaulting to 1400 when none is given.
pub fn extract_port_from_url(url: &str) -> u16 {
    url.split("//")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .and_then(|authority| authority.split(':').nth(1))
        .and_then(|port| port.parse().ok())
        .unwrap_or(1400)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PLAYBAR_XML: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <specVersion><major>1</major><minor>0</minor></specVersion>
  <device>
    <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
    <friendlyName>192.168.1.60 - Sonos Playbar - RINCON_5CAAFDAE58BD01400</friendlyName>
    <manufacturer>Sonos, Inc.</manufacturer>
    <modelNumber>S9</modelNumber>
    <modelDescription>Sonos Playbar</modelDescription>
    <modelName>Sonos Playbar</modelName>
    <softwareVersion>85.0-64200</softwareVersion>
    <hardwareVersion>1.9.1.10-2.0</hardwareVersion>
    <serialNum>5C-AA-FD-AE-58-BD:7</serialNum>
    <UDN>uuid:RINCON_5CAAFDAE58BD01400</UDN>
    <zoneType>9</zoneType>
    <roomName>TV Room</roomName>
    <displayName>Playbar</displayName>
    <serviceList>
      <service>
        <serviceType>urn:schemas-upnp-org:service:DeviceProperties:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:DeviceProperties</serviceId>
        <controlURL>/DeviceProperties/Control</controlURL>
        <eventSubURL>/DeviceProperties/Event</eventSubURL>
        <SCPDURL>/xml/DeviceProperties1.xml</SCPDURL>
      </service>
      <service>
        <serviceType>urn:schemas-upnp-org:service:HTControl:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:HTControl</serviceId>
        <controlURL>/HTControl/Control</controlURL>
        <eventSubURL>/HTControl/Event</eventSubURL>
        <SCPDURL>/xml/HTControl1.xml</SCPDURL>
      </service>
    </serviceList>
    <deviceList>
      <device>
        <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
        <friendlyName>TV Room - Sonos Playbar Media Renderer</friendlyName>
      </device>
    </deviceList>
  </device>
</root>"#;

    #[rstest]
    #[case("http://192.168.1.100:1400/xml/device_description.xml", Some("192.168.1.100"))]
    #[case("https://10.0.0.5:8080/path", Some("10.0.0.5"))]
    #[case("http://sonos-kitchen/xml", Some("sonos-kitchen"))]
    #[case("invalid-url", None)]
    fn test_extract_ip_from_url(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_ip_from_url(url).as_deref(), expected);
    }

    #[rstest]
    #[case("http://192.168.1.100:1400/xml/device_description.xml", 1400)]
    #[case("http://192.168.1.100:1443/", 1443)]
    #[case("http://192.168.1.100/", 1400)]
    fn test_extract_port_from_url(#[case] url: &str, #[case] expected: u16) {
        assert_eq!(extract_port_from_url(url), expected);
    }

    #[test]
    fn test_device_from_xml_with_services() {
        let device = DeviceDescription::from_xml(PLAYBAR_XML).unwrap();

        assert_eq!(device.model_name, "Sonos Playbar");
        assert_eq!(device.serial_num.as_deref(), Some("5C-AA-FD-AE-58-BD:7"));
        assert_eq!(device.software_version.as_deref(), Some("85.0-64200"));
        assert_eq!(device.zone_type.as_deref(), Some("9"));
        assert_eq!(device.service_list.services.len(), 2);
        assert!(device.supports_tv());
        assert_eq!(device.rincon(), "RINCON_5CAAFDAE58BD01400");
        assert!(device.is_sonos_device());
    }

    #[test]
    fn test_minimal_device_without_services() {
        let xml = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
    <friendlyName>Bedroom</friendlyName>
    <manufacturer>Sonos, Inc.</manufacturer>
    <modelName>Sonos One</modelName>
    <UDN>uuid:RINCON_XYZ789</UDN>
  </device>
</root>"#;

        let device_desc = DeviceDescription::from_xml(xml).unwrap();
        assert!(!device_desc.supports_tv());
        assert_eq!(device_desc.serial_num, None);

        let device = device_desc.to_device("192.168.1.100".to_string(), 1400);
        assert_eq!(device.room_name, "Unknown");
        assert_eq!(device.serial_number, None);
    }

    #[test]
    fn test_not_sonos_device() {
        let xml = r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <device>
    <deviceType>urn:schemas-upnp-org:device:Basic:1</deviceType>
    <friendlyName>Router</friendlyName>
    <manufacturer>Other Company</manufacturer>
    <modelName>Router Model</modelName>
    <UDN>uuid:ROUTER123</UDN>
  </device>
</root>"#;

        let device = DeviceDescription::from_xml(xml).unwrap();
        assert!(!device.is_sonos_device());
    }

    #[test]
    fn test_description_serializes_camel_case() {
        let device = DeviceDescription::from_xml(PLAYBAR_XML).unwrap();
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["serialNum"], "5C-AA-FD-AE-58-BD:7");
        assert_eq!(json["UDN"], "uuid:RINCON_5CAAFDAE58BD01400");
        assert_eq!(json["serviceList"]["service"][1]["controlURL"], "/HTControl/Control");
    }

    #[test]
    fn test_description_url() {
        assert_eq!(
            description_url("http://192.168.1.60:1400/"),
            "http://192.168.1.60:1400/xml/device_description.xml"
        );
    }

    #[test]
    fn test_fetch_device_description_from_server() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", DESCRIPTION_PATH)
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(PLAYBAR_XML)
            .create();

        let url = description_url(&server.url());
        let device = fetch_device_description(&url, Duration::from_secs(2)).unwrap();

        mock.assert();
        assert_eq!(device.room_name.as_deref(), Some("TV Room"));
    }

    #[test]
    fn test_fetch_device_description_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", DESCRIPTION_PATH).with_status(404).create();

        let url = description_url(&server.url());
        match fetch_device_description(&url, Duration::from_secs(2)) {
            Err(DiscoveryError::HttpStatus { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HttpStatus error, got {:?}", other),
        }
    }
}
