//! The action execution boundary.
//!
//! [`SonosActions`] is the one capability everything above this crate talks
//! to: execute a UPnP action, read a device description, read the household
//! topology. [`SonosClient`](crate::SonosClient) implements it over the
//! network; tests implement it with a recorder.

use crate::error::{ApiError, Result};
use crate::service::Service;
use serde_json::{Map, Value};
use sonos_discovery::DeviceDescription;
use sonos_parser::ZoneGroupState;

/// Output arguments of an executed action, in the order the player sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResponse {
    arguments: Vec<(String, String)>,
}

impl ActionResponse {
    pub fn new(arguments: Vec<(String, String)>) -> Self {
        Self { arguments }
    }

    /// An empty response, as returned by most setters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Value of the named output argument.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the named output argument, failing when the player omitted it.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| ApiError::ParseError(format!("missing output argument {}", name)))
    }

    pub fn arguments(&self) -> &[(String, String)] {
        &self.arguments
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// All output arguments as a JSON object of strings.
    pub fn to_json(&self) -> Map<String, Value> {
        self.arguments
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect()
    }

    /// Collapse the response into one value: `true` when there are no
    /// outputs, the bare value for a single output, an object otherwise.
    pub fn into_value(self) -> Value {
        match self.arguments.len() {
            0 => Value::Bool(true),
            1 => self
                .arguments
                .into_iter()
                .next()
                .map(|(_, value)| Value::String(value))
                .unwrap_or(Value::Bool(true)),
            _ => Value::Object(self.to_json()),
        }
    }
}

/// The external capability every command is built on.
pub trait SonosActions {
    /// Execute `action` on the service at `endpoint` of the player at `base_url`.
    ///
    /// `args` are sent in order; SOAP faults come back as [`ApiError::SoapFault`].
    fn execute_action(
        &self,
        base_url: &str,
        endpoint: &str,
        action: &str,
        args: &[(String, String)],
    ) -> Result<ActionResponse>;

    /// The UPnP device description of the player at `base_url`.
    fn device_description(&self, base_url: &str) -> Result<DeviceDescription>;

    /// The household topology as reported by the player at `base_url`.
    fn zone_group_state(&self, base_url: &str) -> Result<ZoneGroupState> {
        let response = self.execute_action(
            base_url,
            Service::ZoneGroupTopology.info().endpoint,
            "GetZoneGroupState",
            &[],
        )?;
        Ok(ZoneGroupState::from_xml(response.require("ZoneGroupState")?)?)
    }
}
