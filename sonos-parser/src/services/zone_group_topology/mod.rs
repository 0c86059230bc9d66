//! ZoneGroupTopology parsing
//!
//! Any player can report the full household topology, so one
//! `GetZoneGroupState` answer is enough to find every group and member.
//!
//! ```rust,ignore
//! use sonos_parser::services::zone_group_topology::ZoneGroupState;
//!
//! let state = ZoneGroupState::from_xml(&zone_group_state_text)?;
//! for group in state.groups() {
//!     println!("{} coordinates {} members", group.coordinator, group.members.len());
//! }
//! ```

pub mod parser;

pub use parser::{ZoneGroup, ZoneGroupMember, ZoneGroupState, ZoneGroups};
