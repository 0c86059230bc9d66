//! Service-specific parsers organized by UPnP service type
//!
//! - [`zone_group_topology`]: household topology from `GetZoneGroupState`

pub mod zone_group_topology;
