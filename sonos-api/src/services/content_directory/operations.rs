//! ContentDirectory service operations
//!
//! The queue lives under object id `Q:0`, Sonos playlists under `SQ:`.

use crate::operation::{Validate, ValidationError};
use crate::{define_operation_with_response, define_upnp_operation};
use paste::paste;

/// Object id of the current queue
pub const QUEUE_OBJECT_ID: &str = "Q:0";

/// Object id of the Sonos playlist container
pub const SONOS_PLAYLISTS_OBJECT_ID: &str = "SQ:";

define_operation_with_response! {
    operation: BrowseOperation,
    action: "Browse",
    service: ContentDirectory,
    fixed: {},
    request: {
        object_id: String => "ObjectID",
        browse_flag: String => "BrowseFlag",
        filter: String => "Filter",
        starting_index: u32 => "StartingIndex",
        requested_count: u32 => "RequestedCount",
        sort_criteria: String => "SortCriteria",
    },
    response: BrowseResponse {
        result: String => "Result",
        number_returned: u32 => "NumberReturned",
        total_matches: u32 => "TotalMatches",
        update_id: u32 => "UpdateID",
    },
}

impl Validate for BrowseOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        match self.browse_flag.as_str() {
            "BrowseDirectChildren" | "BrowseMetadata" => Ok(()),
            other => Err(ValidationError::invalid_value(
                "browse_flag",
                other,
                "browse flag must be BrowseDirectChildren or BrowseMetadata",
            )),
        }
    }
}

define_upnp_operation! {
    operation: DestroyObjectOperation,
    action: "DestroyObject",
    service: ContentDirectory,
    fixed: {},
    request: {
        object_id: String => "ObjectID",
    },
}

impl Validate for DestroyObjectOperationRequest {
    fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.object_id.is_empty() {
            return Err(ValidationError::invalid_value(
                "object_id",
                &self.object_id,
                "object id must not be empty",
            ));
        }
        Ok(())
    }
}

pub use browse_operation as browse;
pub use destroy_object_operation as destroy_object;

/// Browse the direct children of `object_id`, all of them, default sort.
pub fn browse_children(
    actions: &dyn crate::action::SonosActions,
    base_url: &str,
    object_id: &str,
) -> crate::error::Result<BrowseResponse> {
    browse(
        actions,
        base_url,
        object_id.to_string(),
        "BrowseDirectChildren".to_string(),
        "*".to_string(),
        0,
        0,
        String::new(),
    )
}
