use crate::error::{ApiError, Result};

/// Represents the UPnP services of a Sonos player used by this workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// AVTransport service - playback, queue and transport settings
    AVTransport,

    /// RenderingControl service - per-player volume, mute and EQ
    RenderingControl,

    /// GroupRenderingControl service - group-wide volume and mute
    GroupRenderingControl,

    /// ZoneGroupTopology service - household topology
    ZoneGroupTopology,

    /// DeviceProperties service - LED, bonded zones (stereo pairs)
    DeviceProperties,

    /// ContentDirectory service - browsing the queue and Sonos playlists
    ContentDirectory,
}

/// Contains the endpoint and service URI information for a UPnP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// The HTTP control endpoint path (relative to the player base URL)
    pub endpoint: &'static str,

    /// The UPnP service URI used in SOAP requests
    pub service_uri: &'static str,
}

const ALL: [Service; 6] = [
    Service::AVTransport,
    Service::RenderingControl,
    Service::GroupRenderingControl,
    Service::ZoneGroupTopology,
    Service::DeviceProperties,
    Service::ContentDirectory,
];

impl Service {
    /// Get the name of this service as a string
    pub fn name(&self) -> &'static str {
        match self {
            Service::AVTransport => "AVTransport",
            Service::RenderingControl => "RenderingControl",
            Service::GroupRenderingControl => "GroupRenderingControl",
            Service::ZoneGroupTopology => "ZoneGroupTopology",
            Service::DeviceProperties => "DeviceProperties",
            Service::ContentDirectory => "ContentDirectory",
        }
    }

    /// Get the service information (endpoint and URI) for this service
    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::AVTransport => ServiceInfo {
                endpoint: "/MediaRenderer/AVTransport/Control",
                service_uri: "urn:schemas-upnp-org:service:AVTransport:1",
            },
            Service::RenderingControl => ServiceInfo {
                endpoint: "/MediaRenderer/RenderingControl/Control",
                service_uri: "urn:schemas-upnp-org:service:RenderingControl:1",
            },
            Service::GroupRenderingControl => ServiceInfo {
                endpoint: "/MediaRenderer/GroupRenderingControl/Control",
                service_uri: "urn:schemas-upnp-org:service:GroupRenderingControl:1",
            },
            Service::ZoneGroupTopology => ServiceInfo {
                endpoint: "/ZoneGroupTopology/Control",
                service_uri: "urn:schemas-upnp-org:service:ZoneGroupTopology:1",
            },
            Service::DeviceProperties => ServiceInfo {
                endpoint: "/DeviceProperties/Control",
                service_uri: "urn:schemas-upnp-org:service:DeviceProperties:1",
            },
            Service::ContentDirectory => ServiceInfo {
                endpoint: "/MediaServer/ContentDirectory/Control",
                service_uri: "urn:schemas-upnp-org:service:ContentDirectory:1",
            },
        }
    }

    /// Find the service whose control endpoint is `endpoint`
    pub fn from_endpoint(endpoint: &str) -> Option<Service> {
        let normalized = format!("/{}", endpoint.trim_start_matches('/'));
        ALL.into_iter()
            .find(|service| service.info().endpoint == normalized)
    }
}

/// Service URI for an arbitrary control endpoint.
///
/// Known endpoints use the table above. Any other endpoint of the form
/// `/…/{Name}/Control` maps to `urn:schemas-upnp-org:service:{Name}:1`,
/// which covers services such as `/HTControl/Control` or
/// `/MusicServices/Control`.
pub fn service_uri_for_endpoint(endpoint: &str) -> Result<String> {
    if let Some(service) = Service::from_endpoint(endpoint) {
        return Ok(service.info().service_uri.to_string());
    }

    let mut segments = endpoint.trim_matches('/').rsplit('/');
    match (segments.next(), segments.next()) {
        (Some("Control"), Some(name)) if !name.is_empty() => {
            Ok(format!("urn:schemas-upnp-org:service:{}:1", name))
        }
        _ => Err(ApiError::InvalidParameter(format!(
            "endpoint {} is not a control URL",
            endpoint
        ))),
    }
}
