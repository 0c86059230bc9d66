//! # sonos-parser
//!
//! XML parsing for the payloads Sonos players return inside SOAP responses.
//! Two shapes matter to the rest of the workspace:
//!
//! - the household topology (`GetZoneGroupState`), see [`ZoneGroupState`]
//! - DIDL-Lite documents (queue pages, Sonos playlists, track metadata), see [`DidlLite`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sonos_parser::{DidlLite, ZoneGroupState};
//!
//! let state = ZoneGroupState::from_xml(zone_group_state_text)?;
//! let page = DidlLite::from_xml(browse_result_text)?;
//! ```

pub mod common;
pub mod error;
pub mod services;

pub use error::{ParseError, ParseResult};

pub use common::{DidlLite, DidlObject, DidlResource};

pub use services::zone_group_topology::{ZoneGroup, ZoneGroupMember, ZoneGroupState};
