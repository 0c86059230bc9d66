//! AVTransport service operations
//!
//! Playback, queue management, transport settings and group coordination.
//! Every action is addressed to instance 0; on a grouped player only the
//! coordinator's transport is meaningful.

use crate::operation::{Validate, ValidationError};
use crate::{define_operation_with_response, define_upnp_operation};
use paste::paste;

/// Play modes accepted by `SetPlayMode`
pub const PLAY_MODES: [&str; 6] = [
    "NORMAL",
    "REPEAT_ONE",
    "REPEAT_ALL",
    "SHUFFLE",
    "SHUFFLE_NOREPEAT",
    "SHUFFLE_REPEAT_ONE",
];

// =============================================================================
// BASIC PLAYBACK CONTROL
// =============================================================================

define_upnp_operation! {
    operation: PlayOperation,
    action: "Play",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        speed: String => "Speed",
    },
}

impl Validate for PlayOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.speed.is_empty() || self.speed.parse::<f32>().is_err() {
            return Err(ValidationError::invalid_value(
                "speed",
                &self.speed,
                "speed must be numeric, usually '1'",
            ));
        }
        Ok(())
    }
}

define_upnp_operation! {
    operation: PauseOperation,
    action: "Pause",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for PauseOperationRequest {}

define_upnp_operation! {
    operation: StopOperation,
    action: "Stop",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for StopOperationRequest {}

define_upnp_operation! {
    operation: NextOperation,
    action: "Next",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for NextOperationRequest {}

define_upnp_operation! {
    operation: PreviousOperation,
    action: "Previous",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for PreviousOperationRequest {}

// =============================================================================
// SEEK AND POSITION
// =============================================================================

define_upnp_operation! {
    operation: SeekOperation,
    action: "Seek",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        unit: String => "Unit",
        target: String => "Target",
    },
}

impl Validate for SeekOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        match self.unit.as_str() {
            "TRACK_NR" | "REL_TIME" | "TIME_DELTA" => Ok(()),
            other => Err(ValidationError::invalid_value(
                "unit",
                other,
                "unit must be TRACK_NR, REL_TIME or TIME_DELTA",
            )),
        }
    }
}

define_operation_with_response! {
    operation: GetPositionInfoOperation,
    action: "GetPositionInfo",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetPositionInfoResponse {
        track: u32 => "Track",
        track_duration: String => "TrackDuration",
        track_meta_data: String => "TrackMetaData",
        track_uri: String => "TrackURI",
        rel_time: String => "RelTime",
    },
}

impl Validate for GetPositionInfoOperationRequest {}

// =============================================================================
// TRANSPORT INFO AND SETTINGS
// =============================================================================

define_operation_with_response! {
    operation: GetTransportInfoOperation,
    action: "GetTransportInfo",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetTransportInfoResponse {
        current_transport_state: String => "CurrentTransportState",
        current_transport_status: String => "CurrentTransportStatus",
        current_speed: String => "CurrentSpeed",
    },
}

impl Validate for GetTransportInfoOperationRequest {}

define_operation_with_response! {
    operation: GetTransportSettingsOperation,
    action: "GetTransportSettings",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetTransportSettingsResponse {
        play_mode: String => "PlayMode",
    },
}

impl Validate for GetTransportSettingsOperationRequest {}

define_operation_with_response! {
    operation: GetCurrentTransportActionsOperation,
    action: "GetCurrentTransportActions",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetCurrentTransportActionsResponse {
        actions: String => "Actions",
    },
}

impl Validate for GetCurrentTransportActionsOperationRequest {}

// =============================================================================
// MEDIA INFO AND URI SETTING
// =============================================================================

define_operation_with_response! {
    operation: GetMediaInfoOperation,
    action: "GetMediaInfo",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetMediaInfoResponse {
        nr_tracks: u32 => "NrTracks",
        media_duration: String => "MediaDuration",
        current_uri: String => "CurrentURI",
        current_uri_meta_data: String => "CurrentURIMetaData",
    },
}

impl Validate for GetMediaInfoOperationRequest {}

define_upnp_operation! {
    operation: SetAVTransportURIOperation,
    action: "SetAVTransportURI",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        current_uri: String => "CurrentURI",
        current_uri_meta_data: String => "CurrentURIMetaData",
    },
}

impl Validate for SetAVTransportURIOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.current_uri.is_empty() {
            return Err(ValidationError::invalid_value(
                "current_uri",
                &self.current_uri,
                "uri must not be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// CROSSFADE AND PLAY MODE
// =============================================================================

define_operation_with_response! {
    operation: GetCrossfadeModeOperation,
    action: "GetCrossfadeMode",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetCrossfadeModeResponse {
        crossfade_mode: String => "CrossfadeMode",
    },
}

impl Validate for GetCrossfadeModeOperationRequest {}

define_upnp_operation! {
    operation: SetCrossfadeModeOperation,
    action: "SetCrossfadeMode",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        crossfade_mode: bool => "CrossfadeMode",
    },
}

impl Validate for SetCrossfadeModeOperationRequest {}

define_upnp_operation! {
    operation: SetPlayModeOperation,
    action: "SetPlayMode",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        new_play_mode: String => "NewPlayMode",
    },
}

impl Validate for SetPlayModeOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        // players reject lower case modes
        if !PLAY_MODES.contains(&self.new_play_mode.as_str()) {
            return Err(ValidationError::invalid_value(
                "new_play_mode",
                &self.new_play_mode,
                "unknown play mode",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// SLEEP TIMER
// =============================================================================

define_upnp_operation! {
    operation: ConfigureSleepTimerOperation,
    action: "ConfigureSleepTimer",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        new_sleep_timer_duration: String => "NewSleepTimerDuration",
    },
}

impl Validate for ConfigureSleepTimerOperationRequest {}

define_operation_with_response! {
    operation: GetRemainingSleepTimerDurationOperation,
    action: "GetRemainingSleepTimerDuration",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
    response: GetRemainingSleepTimerDurationResponse {
        remaining_sleep_timer_duration: String => "RemainingSleepTimerDuration",
    },
}

impl Validate for GetRemainingSleepTimerDurationOperationRequest {}

// =============================================================================
// QUEUE OPERATIONS
// =============================================================================

define_operation_with_response! {
    operation: AddURIToQueueOperation,
    action: "AddURIToQueue",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        enqueued_uri: String => "EnqueuedURI",
        enqueued_uri_meta_data: String => "EnqueuedURIMetaData",
        desired_first_track_number_enqueued: u32 => "DesiredFirstTrackNumberEnqueued",
        enqueue_as_next: bool => "EnqueueAsNext",
    },
    response: AddURIToQueueResponse {
        first_track_number_enqueued: u32 => "FirstTrackNumberEnqueued",
        num_tracks_added: u32 => "NumTracksAdded",
        new_queue_length: u32 => "NewQueueLength",
    },
}

impl Validate for AddURIToQueueOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.enqueued_uri.is_empty() {
            return Err(ValidationError::invalid_value(
                "enqueued_uri",
                &self.enqueued_uri,
                "uri must not be empty",
            ));
        }
        Ok(())
    }
}

define_upnp_operation! {
    operation: RemoveAllTracksFromQueueOperation,
    action: "RemoveAllTracksFromQueue",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for RemoveAllTracksFromQueueOperationRequest {}

define_operation_with_response! {
    operation: RemoveTrackRangeFromQueueOperation,
    action: "RemoveTrackRangeFromQueue",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        update_id: u32 => "UpdateID",
        starting_index: u32 => "StartingIndex",
        number_of_tracks: u32 => "NumberOfTracks",
    },
    response: RemoveTrackRangeFromQueueResponse {
        new_update_id: u32 => "NewUpdateID",
    },
}

impl Validate for RemoveTrackRangeFromQueueOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.starting_index == 0 {
            return Err(ValidationError::range_error(
                "starting_index",
                1,
                u32::MAX,
                self.starting_index,
            ));
        }
        if self.number_of_tracks == 0 {
            return Err(ValidationError::range_error(
                "number_of_tracks",
                1,
                u32::MAX,
                self.number_of_tracks,
            ));
        }
        Ok(())
    }
}

define_operation_with_response! {
    operation: SaveQueueOperation,
    action: "SaveQueue",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        title: String => "Title",
        object_id: String => "ObjectID",
    },
    response: SaveQueueResponse {
        assigned_object_id: String => "AssignedObjectID",
    },
}

impl Validate for SaveQueueOperationRequest {}

// =============================================================================
// GROUP COORDINATION
// =============================================================================

define_upnp_operation! {
    operation: BecomeCoordinatorOfStandaloneGroupOperation,
    action: "BecomeCoordinatorOfStandaloneGroup",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {},
}

impl Validate for BecomeCoordinatorOfStandaloneGroupOperationRequest {}

define_upnp_operation! {
    operation: DelegateGroupCoordinationToOperation,
    action: "DelegateGroupCoordinationTo",
    service: AVTransport,
    fixed: { "InstanceID" => "0" },
    request: {
        new_coordinator: String => "NewCoordinator",
        rejoin_group: bool => "RejoinGroup",
    },
}

impl Validate for DelegateGroupCoordinationToOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if !self.new_coordinator.starts_with("RINCON_") {
            return Err(ValidationError::invalid_value(
                "new_coordinator",
                &self.new_coordinator,
                "coordinator must be a RINCON uuid",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// LEGACY ALIASES
// =============================================================================

// Basic playback
pub use next_operation as next;
pub use pause_operation as pause;
pub use play_operation as play;
pub use previous_operation as previous;
pub use stop_operation as stop;

// Seek and position
pub use get_position_info_operation as get_position_info;
pub use seek_operation as seek;

// Transport info and settings
pub use get_current_transport_actions_operation as get_current_transport_actions;
pub use get_transport_info_operation as get_transport_info;
pub use get_transport_settings_operation as get_transport_settings;

// Media info and URI setting
pub use get_media_info_operation as get_media_info;
pub use set_a_v_transport_u_r_i_operation as set_av_transport_uri;

// Crossfade and play mode
pub use get_crossfade_mode_operation as get_crossfade_mode;
pub use set_crossfade_mode_operation as set_crossfade_mode;
pub use set_play_mode_operation as set_play_mode;

// Sleep timer
pub use configure_sleep_timer_operation as configure_sleep_timer;
pub use get_remaining_sleep_timer_duration_operation as get_remaining_sleep_timer_duration;

// Queue
pub use add_u_r_i_to_queue_operation as add_uri_to_queue;
pub use remove_all_tracks_from_queue_operation as remove_all_tracks_from_queue;
pub use remove_track_range_from_queue_operation as remove_track_range_from_queue;
pub use save_queue_operation as save_queue;

// Group coordination
pub use become_coordinator_of_standalone_group_operation as become_coordinator_of_standalone_group;
pub use delegate_group_coordination_to_operation as delegate_group_coordination_to;
