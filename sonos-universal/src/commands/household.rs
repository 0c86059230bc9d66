//! Household commands: grouping, stereo pairs and Sonos playlists
//!
//! Regrouping runs member by member against a fresh topology. Members that
//! are already where they belong are skipped, so repeating a command sends
//! nothing. A failure halfway leaves the household partly regrouped.

use super::{media, CommandContext};
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::topology::{self, GroupMember, SortedGroup};
use crate::validation::{optional_bool, patterns, string_valid_regex};
use serde_json::Value;
use sonos_api::services::{av_transport, content_directory, device_properties};
use std::time::Duration;
use tracing::{debug, info};

/// Time a player needs after leaving its group before others can join it
const BECOME_COORDINATOR_SETTLE: Duration = Duration::from_millis(500);

fn household(ctx: &CommandContext<'_>) -> Result<Vec<SortedGroup>> {
    let state = ctx.actions.zone_group_state(&ctx.anchor.base_url())?;
    topology::sorted_groups(&state)
}

/// `{left}:LF,LF;{right}:RF,RF`
fn channel_map(left_uuid: &str, right_uuid: &str) -> String {
    format!("{}:LF,LF;{}:RF,RF", left_uuid, right_uuid)
}

/// Group the listed players; the first one coordinates.
///
/// When the first player already coordinates a group, that group is reshaped:
/// members not listed leave, listed players from elsewhere join. Otherwise
/// the first player leaves its group and the others join it.
pub fn create_group(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let list = string_valid_regex(msg, ctx.value_field, &patterns::PLAYER_LIST, "player list", None)?;
    let names: Vec<&str> = list.split(',').collect();
    for (index, name) in names.iter().enumerate() {
        if names[..index].contains(name) {
            return Err(Error::InvalidInput(
                "List includes a player multiple times".to_string(),
            ));
        }
    }

    let members = topology::flatten(&household(ctx)?);
    let find = |name: &str| members.iter().find(|entry| entry.member.name == name);
    for name in &names {
        if find(*name).is_none() {
            return Err(Error::PlayerNotFound(format!("Could not find player: {}", name)));
        }
    }
    let Some(coordinator) = find(names[0]) else {
        return Err(Error::PlayerNotFound(format!("Could not find player: {}", names[0])));
    };
    let join_uri = media::group_uri(&coordinator.member.uuid);

    if coordinator.is_coordinator {
        for entry in &members {
            let listed = names.contains(&entry.member.name.as_str());
            let in_group = entry.group_index == coordinator.group_index;
            if !listed && in_group {
                debug!(player = %entry.member.name, "leaving group");
                av_transport::become_coordinator_of_standalone_group(ctx.actions, &entry.member.base_url)?;
            } else if listed && !in_group {
                debug!(player = %entry.member.name, "joining group");
                av_transport::set_av_transport_uri(
                    ctx.actions,
                    &entry.member.base_url,
                    join_uri.clone(),
                    String::new(),
                )?;
            }
        }
    } else {
        av_transport::become_coordinator_of_standalone_group(ctx.actions, &coordinator.member.base_url)?;
        ctx.wait(BECOME_COORDINATOR_SETTLE);
        for name in &names[1..] {
            if let Some(entry) = find(*name) {
                av_transport::set_av_transport_uri(
                    ctx.actions,
                    &entry.member.base_url,
                    join_uri.clone(),
                    String::new(),
                )?;
            }
        }
    }

    info!(coordinator = %coordinator.member.name, size = names.len(), "group created");
    Ok(message::empty())
}

/// Last visible member called `name`.
fn find_member<'a>(groups: &'a [SortedGroup], name: &str) -> Option<&'a GroupMember> {
    groups
        .iter()
        .flat_map(|group| group.members.iter())
        .filter(|member| !member.invisible)
        .rev()
        .find(|member| member.name == name)
}

/// Pair the player named in the value (left) with `playerNameRight`.
pub fn create_stereopair(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let left_name =
        string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "player name left", None)?;
    let right_name =
        string_valid_regex(msg, "playerNameRight", &patterns::ANY_CHAR, "player name right", None)?;

    let groups = household(ctx)?;
    let left = find_member(&groups, &left_name)
        .ok_or_else(|| Error::PlayerNotFound("player name left was not found".to_string()))?;
    let right = find_member(&groups, &right_name)
        .ok_or_else(|| Error::PlayerNotFound("player name right was not found".to_string()))?;

    device_properties::create_stereo_pair(ctx.actions, &left.base_url, channel_map(&left.uuid, &right.uuid))?;
    Ok(message::empty())
}

/// Every group with its visible members, coordinator first.
pub fn get_groups(ctx: &CommandContext<'_>, _msg: &Message) -> Result<Fragment> {
    let groups: Vec<Vec<GroupMember>> = household(ctx)?
        .iter()
        .map(SortedGroup::visible_members)
        .collect();
    message::with_serialized_payload(&groups)
}

pub fn get_sonos_playlists(ctx: &CommandContext<'_>, _msg: &Message) -> Result<Fragment> {
    let playlists = media::get_sonos_playlists(ctx.actions, &ctx.anchor.base_url())?;
    message::with_serialized_payload(&playlists)
}

/// Delete the Sonos playlist with exactly the given title.
///
/// A missing playlist is fine unless `ignoreNotExists` is `false`.
pub fn remove_sonos_playlist(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let title = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "title", None)?;
    let ignore_not_exists = optional_bool(msg, "ignoreNotExists", "ignoreNotExists", true)?;

    let base_url = ctx.anchor.base_url();
    let playlists = media::get_sonos_playlists(ctx.actions, &base_url)?;
    let Some(playlist) = playlists.iter().rev().find(|playlist| playlist.title == title) else {
        if ignore_not_exists {
            debug!(title = %title, "no such playlist, nothing removed");
            return Ok(message::empty());
        }
        return Err(Error::InvalidState(
            "No Sonos playlist title matching search string.".to_string(),
        ));
    };

    content_directory::destroy_object(ctx.actions, &base_url, playlist.id.clone())?;
    Ok(message::empty())
}

/// Every member but the coordinator becomes standalone.
pub fn separate_group(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    for member in &group.members[1..] {
        av_transport::become_coordinator_of_standalone_group(ctx.actions, &member.base_url)?;
    }
    Ok(message::empty())
}

/// Split the stereo pair whose left speaker carries the given name.
pub fn separate_stereopair(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let left_name =
        string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "player name left", None)?;

    let groups = household(ctx)?;
    // both speakers share the name; the left one leads the channel map
    let left = groups
        .iter()
        .flat_map(|group| group.members.iter())
        .filter(|member| member.name == left_name)
        .find(|member| {
            member
                .channel_map_set
                .as_deref()
                .is_some_and(|map| map.starts_with(&member.uuid))
        })
        .ok_or_else(|| Error::PlayerNotFound("player name left was not found".to_string()))?;

    let map = left.channel_map_set.as_deref().unwrap_or_default();
    let (_, right_part) = map.split_once(';').ok_or_else(|| {
        Error::InvalidState("channelmap is in error - could not get right uuid".to_string())
    })?;
    let right_uuid = right_part.replace(":RF,RF", "");
    if right_uuid.is_empty() {
        return Err(Error::PlayerNotFound("player name right was not found".to_string()));
    }

    device_properties::separate_stereo_pair(ctx.actions, &left.base_url, channel_map(&left.uuid, &right_uuid))?;
    Ok(message::empty())
}

/// Whether a player of the given name is part of the household.
pub fn test_player(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let name = match ctx.value(msg) {
        None | Some(Value::Null) => {
            return Err(Error::MissingField(format!(
                "player name (msg.{}) is missing/invalid",
                ctx.value_field
            )))
        }
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(_) => {
            return Err(Error::InvalidInput(format!(
                "player name (msg.{}) is not string or empty",
                ctx.value_field
            )))
        }
    };

    let found = find_member(&household(ctx)?, &name).is_some();
    Ok(message::with_payload(found))
}
