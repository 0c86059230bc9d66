//! GroupRenderingControl service operations

use crate::operation::{Validate, ValidationError};
use crate::{define_operation_with_response, define_upnp_operation};
use paste::paste;

define_operation_with_response! {
    operation: GetGroupVolumeOperation,
    action: "GetGroupVolume",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetGroupVolumeResponse {
        current_volume: u16 => "CurrentVolume",
    },
}

impl Validate for GetGroupVolumeOperationRequest {}

define_upnp_operation! {
    operation: SetGroupVolumeOperation,
    action: "SetGroupVolume",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        desired_volume: u16 => "DesiredVolume",
    },
}

impl Validate for SetGroupVolumeOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.desired_volume > 100 {
            return Err(ValidationError::range_error("desired_volume", 0, 100, self.desired_volume));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: SetRelativeGroupVolumeOperation,
    action: "SetRelativeGroupVolume",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        adjustment: i32 => "Adjustment",
    },
    response: SetRelativeGroupVolumeResponse {
        new_volume: u16 => "NewVolume",
    },
}

impl Validate for SetRelativeGroupVolumeOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if !(-100..=100).contains(&self.adjustment) {
            return Err(ValidationError::range_error("adjustment", -100, 100, self.adjustment));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: GetGroupMuteOperation,
    action: "GetGroupMute",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetGroupMuteResponse {
        current_mute: String => "CurrentMute",
    },
}

impl Validate for GetGroupMuteOperationRequest {}

define_upnp_operation! {
    operation: SetGroupMuteOperation,
    action: "SetGroupMute",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {
        desired_mute: bool => "DesiredMute",
    },
}

impl Validate for SetGroupMuteOperationRequest {}

// Stores the member volumes as the reference for later relative changes
define_upnp_operation! {
    operation: SnapshotGroupVolumeOperation,
    action: "SnapshotGroupVolume",
    service: GroupRenderingControl,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for SnapshotGroupVolumeOperationRequest {}

pub use get_group_mute_operation as get_group_mute;
pub use get_group_volume_operation as get_group_volume;
pub use set_group_mute_operation as set_group_mute;
pub use set_group_volume_operation as set_group_volume;
pub use set_relative_group_volume_operation as set_relative_group_volume;
pub use snapshot_group_volume_operation as snapshot_group_volume;
