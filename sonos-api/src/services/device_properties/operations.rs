//! DeviceProperties service operations

use crate::operation::{Validate, ValidationError};
use crate::{define_operation_with_response, define_upnp_operation};
use paste::paste;

fn validate_channel_map(channel_map_set: &str) -> Result<(), ValidationError> {
    // {left}:LF,LF;{right}:RF,RF
    let valid = channel_map_set
        .split(';')
        .filter(|part| !part.is_empty())
        .all(|part| part.starts_with("RINCON_") && part.contains(':'));
    if valid && channel_map_set.contains(';') {
        Ok(())
    } else {
        Err(ValidationError::invalid_value(
            "channel_map_set",
            channel_map_set,
            "expected {left uuid}:LF,LF;{right uuid}:RF,RF",
        ))
    }
}

define_operation_with_response! {
    operation: GetLEDStateOperation,
    action: "GetLEDState",
    service: DeviceProperties,
    fixed: {},
    request: {},
    response: GetLEDStateResponse {
        current_led_state: String => "CurrentLEDState",
    },
}

impl Validate for GetLEDStateOperationRequest {}

define_upnp_operation! {
    operation: SetLEDStateOperation,
    action: "SetLEDState",
    service: DeviceProperties,
    fixed: {},
    request: {
        desired_led_state: String => "DesiredLEDState",
    },
}

impl Validate for SetLEDStateOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        match self.desired_led_state.as_str() {
            "On" | "Off" => Ok(()),
            other => Err(ValidationError::invalid_value(
                "desired_led_state",
                other,
                "LED state must be On or Off",
            )),
        }
    }
}

define_upnp_operation! {
    operation: CreateStereoPairOperation,
    action: "CreateStereoPair",
    service: DeviceProperties,
    fixed: {},
    request: {
        channel_map_set: String => "ChannelMapSet",
    },
}

impl Validate for CreateStereoPairOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_channel_map(&self.channel_map_set)
    }
}

define_upnp_operation! {
    operation: SeparateStereoPairOperation,
    action: "SeparateStereoPair",
    service: DeviceProperties,
    fixed: {},
    request: {
        channel_map_set: String => "ChannelMapSet",
    },
}

impl Validate for SeparateStereoPairOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_channel_map(&self.channel_map_set)
    }
}

pub use create_stereo_pair_operation as create_stereo_pair;
pub use get_l_e_d_state_operation as get_led_state;
pub use separate_stereo_pair_operation as separate_stereo_pair;
pub use set_l_e_d_state_operation as set_led_state;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SonosOperation;

    #[test]
    fn test_led_state_literals() {
        let on = SetLEDStateOperationRequest { desired_led_state: "On".to_string() };
        let lower = SetLEDStateOperationRequest { desired_led_state: "on".to_string() };
        assert!(SetLEDStateOperation::build_args(&on).is_ok());
        assert!(SetLEDStateOperation::build_args(&lower).is_err());
    }

    #[test]
    fn test_stereo_pair_channel_map() {
        let request = CreateStereoPairOperationRequest {
            channel_map_set: "RINCON_A1400:LF,LF;RINCON_B1400:RF,RF".to_string(),
        };
        let args = CreateStereoPairOperation::build_args(&request).unwrap();
        assert_eq!(args, vec![("ChannelMapSet".to_string(), request.channel_map_set.clone())]);

        let single = CreateStereoPairOperationRequest {
            channel_map_set: "RINCON_A1400:LF,LF".to_string(),
        };
        assert!(CreateStereoPairOperation::build_args(&single).is_err());
    }
}
