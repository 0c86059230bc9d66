//! RenderingControl service operations
//!
//! These act on a single player regardless of grouping. Volume, mute and
//! loudness address the `Master` channel; bass, treble and EQ only take the
//! instance.

use crate::operation::{Validate, ValidationError};
use crate::{define_operation_with_response, define_upnp_operation};
use paste::paste;

/// EQ types understood by `GetEQ` / `SetEQ` on home theater players
pub const EQ_TYPES: [&str; 8] = [
    "NightMode",
    "DialogLevel",
    "SubGain",
    "SubEnable",
    "SurroundEnable",
    "SurroundLevel",
    "MusicSurroundLevel",
    "HeightChannelLevel",
];

fn validate_eq_type(eq_type: &str) -> Result<(), ValidationError> {
    if EQ_TYPES.contains(&eq_type) {
        Ok(())
    } else {
        Err(ValidationError::invalid_value("eq_type", eq_type, "unknown EQ type"))
    }
}

// =============================================================================
// VOLUME
// =============================================================================

define_operation_with_response! {
    operation: GetVolumeOperation,
    action: "GetVolume",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {},
    response: GetVolumeResponse {
        current_volume: u16 => "CurrentVolume",
    },
}

impl Validate for GetVolumeOperationRequest {}

define_upnp_operation! {
    operation: SetVolumeOperation,
    action: "SetVolume",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {
        desired_volume: u16 => "DesiredVolume",
    },
}

impl Validate for SetVolumeOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.desired_volume > 100 {
            return Err(ValidationError::range_error("desired_volume", 0, 100, self.desired_volume));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: SetRelativeVolumeOperation,
    action: "SetRelativeVolume",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {
        adjustment: i32 => "Adjustment",
    },
    response: SetRelativeVolumeResponse {
        new_volume: u16 => "NewVolume",
    },
}

impl Validate for SetRelativeVolumeOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if !(-100..=100).contains(&self.adjustment) {
            return Err(ValidationError::range_error("adjustment", -100, 100, self.adjustment));
        }
        Ok(())
    }
}

// =============================================================================
// MUTE AND LOUDNESS
// =============================================================================

define_operation_with_response! {
    operation: GetMuteOperation,
    action: "GetMute",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {},
    response: GetMuteResponse {
        current_mute: String => "CurrentMute",
    },
}

impl Validate for GetMuteOperationRequest {}

define_upnp_operation! {
    operation: SetMuteOperation,
    action: "SetMute",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {
        desired_mute: bool => "DesiredMute",
    },
}

impl Validate for SetMuteOperationRequest {}

define_operation_with_response! {
    operation: GetLoudnessOperation,
    action: "GetLoudness",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {},
    response: GetLoudnessResponse {
        current_loudness: String => "CurrentLoudness",
    },
}

impl Validate for GetLoudnessOperationRequest {}

define_upnp_operation! {
    operation: SetLoudnessOperation,
    action: "SetLoudness",
    service: RenderingControl,
    fixed: { "InstanceID" => "0", "Channel" => "Master" },
    request: {
        desired_loudness: bool => "DesiredLoudness",
    },
}

impl Validate for SetLoudnessOperationRequest {}

// =============================================================================
// BASS, TREBLE AND EQ
// =============================================================================

define_operation_with_response! {
    operation: GetBassOperation,
    action: "GetBass",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetBassResponse {
        current_bass: i16 => "CurrentBass",
    },
}

impl Validate for GetBassOperationRequest {}

define_upnp_operation! {
    operation: SetBassOperation,
    action: "SetBass",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        desired_bass: i16 => "DesiredBass",
    },
}

impl Validate for SetBassOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if !(-10..=10).contains(&self.desired_bass) {
            return Err(ValidationError::range_error("desired_bass", -10, 10, self.desired_bass));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: GetTrebleOperation,
    action: "GetTreble",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetTrebleResponse {
        current_treble: i16 => "CurrentTreble",
    },
}

impl Validate for GetTrebleOperationRequest {}

define_upnp_operation! {
    operation: SetTrebleOperation,
    action: "SetTreble",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        desired_treble: i16 => "DesiredTreble",
    },
}

impl Validate for SetTrebleOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if !(-10..=10).contains(&self.desired_treble) {
            return Err(ValidationError::range_error("desired_treble", -10, 10, self.desired_treble));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: GetEQOperation,
    action: "GetEQ",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        eq_type: String => "EQType",
    },
    response: GetEQResponse {
        current_value: String => "CurrentValue",
    },
}

impl Validate for GetEQOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_eq_type(&self.eq_type)
    }
}

define_upnp_operation! {
    operation: SetEQOperation,
    action: "SetEQ",
    service: RenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        eq_type: String => "EQType",
        desired_value: i32 => "DesiredValue",
    },
}

impl Validate for SetEQOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        validate_eq_type(&self.eq_type)
    }
}

// =============================================================================
// LEGACY ALIASES
// =============================================================================

pub use get_volume_operation as get_volume;
pub use set_relative_volume_operation as set_relative_volume;
pub use set_volume_operation as set_volume;

pub use get_loudness_operation as get_loudness;
pub use get_mute_operation as get_mute;
pub use set_loudness_operation as set_loudness;
pub use set_mute_operation as set_mute;

pub use get_bass_operation as get_bass;
pub use get_e_q_operation as get_eq;
pub use get_treble_operation as get_treble;
pub use set_bass_operation as set_bass;
pub use set_e_q_operation as set_eq;
pub use set_treble_operation as set_treble;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::SonosOperation;
    use rstest::rstest;

    #[test]
    fn test_volume_addresses_master_channel() {
        let args = SetVolumeOperation::build_args(&SetVolumeOperationRequest { desired_volume: 25 }).unwrap();
        assert_eq!(
            args,
            vec![
                ("InstanceID".to_string(), "0".to_string()),
                ("Channel".to_string(), "Master".to_string()),
                ("DesiredVolume".to_string(), "25".to_string()),
            ]
        );
    }

    #[rstest]
    #[case(-11, false)]
    #[case(-10, true)]
    #[case(10, true)]
    #[case(11, false)]
    fn test_bass_range(#[case] value: i16, #[case] valid: bool) {
        let request = SetBassOperationRequest { desired_bass: value };
        assert_eq!(SetBassOperation::build_args(&request).is_ok(), valid);
    }

    #[test]
    fn test_eq_type_checked() {
        let request = SetEQOperationRequest {
            eq_type: "Bass".to_string(),
            desired_value: 1,
        };
        assert!(SetEQOperation::build_args(&request).is_err());

        let request = SetEQOperationRequest {
            eq_type: "SubGain".to_string(),
            desired_value: -15,
        };
        let args = SetEQOperation::build_args(&request).unwrap();
        assert_eq!(args[2], ("DesiredValue".to_string(), "-15".to_string()));
    }
}
