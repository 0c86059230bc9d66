//! Household topology, read fresh for every command
//!
//! Any player can report the whole household, so one `GetZoneGroupState`
//! answer from the node's own player is enough to locate every group and
//! member. Nothing here is cached between commands.

use crate::error::{Error, Result};
use serde::Serialize;
use sonos_api::SonosActions;
use sonos_parser::{ZoneGroup, ZoneGroupMember, ZoneGroupState};
use url::Url;

/// Port every Sonos player serves UPnP on
pub const DEFAULT_PORT: u16 = 1400;

/// Network address of a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAddress {
    pub host: String,
    pub port: u16,
}

impl PlayerAddress {
    /// Address on the default port
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, DEFAULT_PORT)
    }

    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `http://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// One player of a group or household snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub host_name: String,
    pub port: u16,
    pub base_url: String,
    /// `RINCON_...`
    pub uuid: String,
    /// Room name as set in the Sonos app
    pub name: String,
    /// Hidden partner of a stereo pair or home theater setup
    pub invisible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_map_set: Option<String>,
}

impl GroupMember {
    /// Build from a topology entry, taking host and port from its location URL.
    pub fn from_zone_member(member: &ZoneGroupMember) -> Result<Self> {
        let location = Url::parse(&member.location).map_err(|e| {
            Error::InvalidState(format!(
                "player location is invalid >>{} ({})",
                member.location, e
            ))
        })?;
        let host_name = location
            .host_str()
            .ok_or_else(|| {
                Error::InvalidState(format!("player location has no host >>{}", member.location))
            })?
            .to_string();
        let port = location.port().unwrap_or(DEFAULT_PORT);

        Ok(Self {
            base_url: format!("http://{}:{}", host_name, port),
            host_name,
            port,
            uuid: member.uuid.clone(),
            name: member.zone_name.clone(),
            invisible: member.is_invisible(),
            channel_map_set: member.channel_map_set.clone(),
        })
    }

    pub fn address(&self) -> PlayerAddress {
        PlayerAddress::with_port(self.host_name.clone(), self.port)
    }
}

/// One group with its coordinator first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedGroup {
    pub id: String,
    /// Coordinator at index 0, invisible members kept
    pub members: Vec<GroupMember>,
}

impl SortedGroup {
    /// Members shown to users; the coordinator is never invisible.
    pub fn visible_members(&self) -> Vec<GroupMember> {
        self.members
            .iter()
            .filter(|member| !member.invisible)
            .cloned()
            .collect()
    }
}

/// The group addressed by one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSnapshot {
    /// Visible members, coordinator at index 0
    pub members: Vec<GroupMember>,
    /// Index of the addressed player in `members`
    pub player_index: usize,
    pub group_id: String,
    pub group_name: String,
}

impl GroupSnapshot {
    pub fn coordinator(&self) -> &GroupMember {
        &self.members[0]
    }

    pub fn player(&self) -> &GroupMember {
        &self.members[self.player_index]
    }

    pub fn is_standalone(&self) -> bool {
        self.members.len() == 1
    }
}

/// A visible player of the household with its group position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdMember {
    pub member: GroupMember,
    /// Index into [`sorted_groups`]
    pub group_index: usize,
    pub is_coordinator: bool,
}

/// Members of `group`, coordinator first, the others in reported order.
pub fn sorted_group(group: &ZoneGroup) -> Result<SortedGroup> {
    let coordinator = group.coordinator_member().ok_or_else(|| {
        Error::GroupNotFound(format!("coordinator of group {} is missing", group.id))
    })?;

    let mut members = Vec::with_capacity(group.members.len());
    members.push(GroupMember::from_zone_member(coordinator)?);
    for member in group.members.iter().filter(|m| m.uuid != group.coordinator) {
        members.push(GroupMember::from_zone_member(member)?);
    }

    Ok(SortedGroup {
        id: group.id.clone(),
        members,
    })
}

/// Every group of the household, each sorted by [`sorted_group`].
pub fn sorted_groups(state: &ZoneGroupState) -> Result<Vec<SortedGroup>> {
    state.groups().iter().map(sorted_group).collect()
}

/// Display name: the coordinator's name, plus ` + n` for n other visible members.
pub fn group_name(members: &[GroupMember]) -> String {
    let Some(coordinator) = members.first() else {
        return String::new();
    };
    let others = members[1..].iter().filter(|m| !m.invisible).count();
    if others == 0 {
        coordinator.name.clone()
    } else {
        format!("{} + {}", coordinator.name, others)
    }
}

/// Locate the group of `player_name`, or of the anchor player when the name
/// is empty.
///
/// Names are matched exactly against visible members; when several players
/// share a name the first one wins. The anchor is matched by host. An anchor
/// that is itself hidden (the right speaker of a stereo pair) resolves to its
/// visible partner of the same name.
pub fn resolve(
    actions: &dyn SonosActions,
    anchor: &PlayerAddress,
    player_name: &str,
) -> Result<GroupSnapshot> {
    let state = actions.zone_group_state(&anchor.base_url())?;
    let groups = sorted_groups(&state)?;
    resolve_in(&groups, anchor, player_name)
}

/// [`resolve`] against an already fetched topology.
pub fn resolve_in(
    groups: &[SortedGroup],
    anchor: &PlayerAddress,
    player_name: &str,
) -> Result<GroupSnapshot> {
    let (group_index, uuid) = if player_name.is_empty() {
        locate_anchor(groups, anchor)?
    } else {
        locate_by_name(groups, player_name).ok_or_else(|| {
            Error::PlayerNotFound(format!(
                "could not find given player name in any group >>{}",
                player_name
            ))
        })?
    };

    let group = &groups[group_index];
    let members = group.visible_members();
    let player_index = members
        .iter()
        .position(|member| member.uuid == uuid)
        .ok_or_else(|| Error::GroupNotFound(format!("player {} is not visible in its group", uuid)))?;

    Ok(GroupSnapshot {
        group_name: group_name(&members),
        group_id: group.id.clone(),
        members,
        player_index,
    })
}

fn locate_by_name(groups: &[SortedGroup], name: &str) -> Option<(usize, String)> {
    groups.iter().enumerate().find_map(|(index, group)| {
        group
            .members
            .iter()
            .find(|member| !member.invisible && member.name == name)
            .map(|member| (index, member.uuid.clone()))
    })
}

fn locate_anchor(groups: &[SortedGroup], anchor: &PlayerAddress) -> Result<(usize, String)> {
    let at_anchor = |member: &&GroupMember| member.host_name == anchor.host;

    for (index, group) in groups.iter().enumerate() {
        if let Some(member) = group.members.iter().filter(|m| !m.invisible).find(at_anchor) {
            return Ok((index, member.uuid.clone()));
        }
    }

    let hidden_name = groups
        .iter()
        .flat_map(|group| group.members.iter())
        .find(|member| member.invisible && member.host_name == anchor.host)
        .map(|member| member.name.clone());

    hidden_name
        .and_then(|name| locate_by_name(groups, &name))
        .ok_or_else(|| {
            Error::GroupNotFound(format!(
                "could not find group of player at {}",
                anchor.host
            ))
        })
}

/// Every visible player of the household, group by group, coordinators first.
pub fn household_members(
    actions: &dyn SonosActions,
    anchor: &PlayerAddress,
) -> Result<Vec<HouseholdMember>> {
    let state = actions.zone_group_state(&anchor.base_url())?;
    let groups = sorted_groups(&state)?;
    Ok(flatten(&groups))
}

/// [`household_members`] of an already sorted topology.
pub fn flatten(groups: &[SortedGroup]) -> Vec<HouseholdMember> {
    groups
        .iter()
        .enumerate()
        .flat_map(|(group_index, group)| {
            group
                .members
                .iter()
                .enumerate()
                .filter(|(_, member)| !member.invisible)
                .map(move |(member_index, member)| HouseholdMember {
                    member: member.clone(),
                    group_index,
                    is_coordinator: member_index == 0,
                })
        })
        .collect()
}

/// Whether a printed serial number belongs to the player with `uuid`.
///
/// The serial's MAC part without dashes is a prefix of the uuid:
/// `00-0E-58-A0-12-34:5` belongs to `RINCON_000E58A0123401400`.
pub fn match_serial_uuid(serial: &str, uuid: &str) -> bool {
    let Some((mac, _)) = serial.trim().split_once(':') else {
        return false;
    };
    let mac = mac.replace('-', "").to_uppercase();
    if mac.is_empty() {
        return false;
    }
    uuid.strip_prefix("RINCON_")
        .is_some_and(|rest| rest.to_uppercase().starts_with(&mac))
}
