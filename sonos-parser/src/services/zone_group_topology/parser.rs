//! ZoneGroupState parser implementation
//!
//! The `ZoneGroupState` output argument of `GetZoneGroupState` is an XML
//! document of its own. Current firmware wraps the groups in a
//! `<ZoneGroupState>` root; older firmware returns a bare `<ZoneGroups>`.
//! Both shapes parse into [`ZoneGroupState`].

use crate::common::xml_decode;
use crate::error::ParseResult;
use serde::{Deserialize, Serialize};

/// The complete household topology.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename = "ZoneGroupState")]
pub struct ZoneGroupState {
    /// All current zone groups in the household
    #[serde(rename = "ZoneGroups", default)]
    pub zone_groups: ZoneGroups,
}

/// Container for all zone groups.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename = "ZoneGroups")]
pub struct ZoneGroups {
    #[serde(rename = "ZoneGroup", default)]
    pub zone_groups: Vec<ZoneGroup>,
}

/// A single zone group: players playing together under one coordinator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneGroup {
    /// UUID of the coordinating player
    #[serde(rename = "@Coordinator")]
    pub coordinator: String,

    /// Unique identifier for this zone group
    #[serde(rename = "@ID", default)]
    pub id: String,

    /// All players of this group, in the order the player reported them
    #[serde(rename = "ZoneGroupMember", default)]
    pub members: Vec<ZoneGroupMember>,
}

/// A player that is part of a zone group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneGroupMember {
    /// Unique identifier (RINCON_...)
    #[serde(rename = "@UUID")]
    pub uuid: String,

    /// Device description URL, e.g. `http://192.168.4.40:1400/xml/device_description.xml`
    #[serde(rename = "@Location")]
    pub location: String,

    /// User-assigned room name
    #[serde(rename = "@ZoneName")]
    pub zone_name: String,

    /// `"1"` for hidden members such as the second player of a stereo pair
    #[serde(rename = "@Invisible", default)]
    pub invisible: Option<String>,

    /// Stereo pair channel mapping, e.g. `RINCON_A:LF,LF;RINCON_B:RF,RF`
    #[serde(rename = "@ChannelMapSet", default)]
    pub channel_map_set: Option<String>,

    /// Home theater satellite channel mapping
    #[serde(rename = "@HTSatChanMapSet", default)]
    pub ht_sat_chan_map_set: Option<String>,

    #[serde(rename = "@SoftwareVersion", default)]
    pub software_version: Option<String>,
}

impl ZoneGroupState {
    /// Parse the text of the `ZoneGroupState` output argument.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        if xml.contains("<ZoneGroupState") {
            xml_decode::parse(xml)
        } else {
            let zone_groups: ZoneGroups = xml_decode::parse(xml)?;
            Ok(Self { zone_groups })
        }
    }

    /// All zone groups in the household.
    pub fn groups(&self) -> &[ZoneGroup] {
        &self.zone_groups.zone_groups
    }

    /// Find a zone group by coordinator UUID.
    pub fn find_group_by_coordinator(&self, coordinator_uuid: &str) -> Option<&ZoneGroup> {
        self.groups()
            .iter()
            .find(|group| group.coordinator == coordinator_uuid)
    }

    /// Find the zone group that contains a member with the given UUID.
    pub fn find_group_containing(&self, member_uuid: &str) -> Option<&ZoneGroup> {
        self.groups()
            .iter()
            .find(|group| group.members.iter().any(|m| m.uuid == member_uuid))
    }

    /// Total number of members across all groups, invisible ones included.
    pub fn member_count(&self) -> usize {
        self.groups().iter().map(|group| group.members.len()).sum()
    }
}

impl ZoneGroup {
    /// The coordinator's member entry.
    pub fn coordinator_member(&self) -> Option<&ZoneGroupMember> {
        self.members
            .iter()
            .find(|member| member.uuid == self.coordinator)
    }
}

impl ZoneGroupMember {
    /// Whether the member is hidden from listings.
    pub fn is_invisible(&self) -> bool {
        self.invisible.as_deref() == Some("1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"<ZoneGroupState><ZoneGroups><ZoneGroup Coordinator="RINCON_5CAAFDAE58BD01400" ID="RINCON_5CAAFDAE58BD01400:361632566"><ZoneGroupMember UUID="RINCON_5CAAFDAE58BD01400" Location="http://192.168.4.40:1400/xml/device_description.xml" ZoneName="Basement" Icon="" Configuration="1" SoftwareVersion="85.0-64200" HTSatChanMapSet="RINCON_5CAAFDAE58BD01400:LF,RF;RINCON_7828CA128F0001400:RR"><Satellite UUID="RINCON_7828CA128F0001400" Location="http://192.168.4.29:1400/xml/device_description.xml" ZoneName="Basement" Invisible="1"/></ZoneGroupMember></ZoneGroup><ZoneGroup Coordinator="RINCON_000E58A0123401400" ID="RINCON_000E58A0123401400:12"><ZoneGroupMember UUID="RINCON_000E58B0567801400" Location="http://192.168.4.51:1400/xml/device_description.xml" ZoneName="Kitchen" Invisible="1" ChannelMapSet="RINCON_000E58A0123401400:LF,LF;RINCON_000E58B0567801400:RF,RF"/><ZoneGroupMember UUID="RINCON_000E58A0123401400" Location="http://192.168.4.50:1400/xml/device_description.xml" ZoneName="Kitchen" ChannelMapSet="RINCON_000E58A0123401400:LF,LF;RINCON_000E58B0567801400:RF,RF"/></ZoneGroup></ZoneGroups><VanishedDevices></VanishedDevices></ZoneGroupState>"#;

    const BARE: &str = r#"<ZoneGroups><ZoneGroup Coordinator="RINCON_B" ID="RINCON_B:1"><ZoneGroupMember UUID="RINCON_A" Location="http://10.0.0.2:1400/xml/device_description.xml" ZoneName="Office"/><ZoneGroupMember UUID="RINCON_B" Location="http://10.0.0.3:1400/xml/device_description.xml" ZoneName="Living Room"/></ZoneGroup></ZoneGroups>"#;

    #[test]
    fn test_parse_wrapped_zone_group_state() {
        let state = ZoneGroupState::from_xml(WRAPPED).unwrap();

        assert_eq!(state.groups().len(), 2);
        let group = &state.groups()[0];
        assert_eq!(group.coordinator, "RINCON_5CAAFDAE58BD01400");
        assert_eq!(group.id, "RINCON_5CAAFDAE58BD01400:361632566");
        assert_eq!(group.members.len(), 1);
        assert_eq!(group.members[0].zone_name, "Basement");
        assert_eq!(group.members[0].software_version.as_deref(), Some("85.0-64200"));
        assert!(!group.members[0].is_invisible());
    }

    #[test]
    fn test_parse_bare_zone_groups() {
        let state = ZoneGroupState::from_xml(BARE).unwrap();

        assert_eq!(state.groups().len(), 1);
        assert_eq!(state.member_count(), 2);
        let coordinator = state.groups()[0].coordinator_member().unwrap();
        assert_eq!(coordinator.zone_name, "Living Room");
    }

    #[test]
    fn test_stereo_pair_attributes() {
        let state = ZoneGroupState::from_xml(WRAPPED).unwrap();
        let group = state.find_group_by_coordinator("RINCON_000E58A0123401400").unwrap();

        assert!(group.members[0].is_invisible());
        assert!(!group.members[1].is_invisible());
        assert_eq!(
            group.members[1].channel_map_set.as_deref(),
            Some("RINCON_000E58A0123401400:LF,LF;RINCON_000E58B0567801400:RF,RF")
        );
    }

    #[test]
    fn test_find_group_containing_member() {
        let state = ZoneGroupState::from_xml(WRAPPED).unwrap();

        let group = state.find_group_containing("RINCON_000E58B0567801400").unwrap();
        assert_eq!(group.coordinator, "RINCON_000E58A0123401400");
        assert!(state.find_group_containing("RINCON_UNKNOWN").is_none());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(ZoneGroupState::from_xml("<ZoneGroupState><ZoneGroups>").is_err());
        assert!(ZoneGroupState::from_xml("").is_err());
    }
}
