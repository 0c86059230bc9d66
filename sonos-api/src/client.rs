use crate::action::{ActionResponse, SonosActions};
use crate::error::Result;
use crate::service::service_uri_for_endpoint;
use soap_client::SoapClient;
use sonos_discovery::{description_url, fetch_device_description, DeviceDescription};
use std::time::Duration;
use tracing::debug;

/// A client for executing actions against actual players
///
/// Bridges the stateless operation definitions and real network requests:
/// actions go through the `soap-client` crate, device descriptions through
/// `sonos-discovery`.
///
/// ```rust,no_run
/// use sonos_api::{SonosActions, SonosClient};
/// use sonos_api::services::av_transport;
///
/// let client = SonosClient::new();
/// av_transport::play(&client, "http://192.168.1.100:1400", "1".to_string())?;
/// let state = client.zone_group_state("http://192.168.1.100:1400")?;
/// # Ok::<(), sonos_api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SonosClient {
    soap_client: SoapClient,
    description_timeout: Duration,
}

impl SonosClient {
    /// Create a client with the default SOAP timeouts
    pub fn new() -> Self {
        Self::with_soap_client(SoapClient::new())
    }

    /// Create a client with a custom SOAP client
    pub fn with_soap_client(soap_client: SoapClient) -> Self {
        Self {
            soap_client,
            description_timeout: Duration::from_secs(5),
        }
    }
}

impl Default for SonosClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SonosActions for SonosClient {
    fn execute_action(
        &self,
        base_url: &str,
        endpoint: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<ActionResponse> {
        let service_uri = service_uri_for_endpoint(endpoint)?;
        debug!(base_url, endpoint, action, "executing action");

        let element = self
            .soap_client
            .call(base_url, endpoint, &service_uri, action, args)?;

        Ok(ActionResponse::new(soap_client::output_arguments(&element)))
    }

    fn device_description(&self, base_url: &str) -> Result<DeviceDescription> {
        Ok(fetch_device_description(
            &description_url(base_url),
            self.description_timeout,
        )?)
    }
}
