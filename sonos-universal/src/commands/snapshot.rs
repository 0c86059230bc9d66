//! Capture and restore of a group's playback, volume and mute state
//!
//! The snapshot is plain data. `group.create.snap` hands it out as the
//! payload and `group.play.snap` takes it back in, so it has to survive a
//! JSON round trip through the user's flow.

use super::media;
use crate::error::Result;
use crate::topology::GroupMember;
use serde::{Deserialize, Serialize};
use sonos_api::services::{av_transport, rendering_control};
use sonos_api::SonosActions;
use tracing::debug;

/// What to capture besides playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub snap_volumes: bool,
    pub snap_mutestates: bool,
}

/// Volume and mute state of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberState {
    pub player_name: String,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_state: Option<bool>,
}

/// State of a group at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStateSnapshot {
    /// Coordinator first
    pub members: Vec<MemberState>,
    #[serde(default)]
    pub was_playing: bool,
    #[serde(default)]
    pub playback_state: String,
    #[serde(default)]
    pub current_uri: String,
    #[serde(default)]
    pub current_uri_meta_data: String,
    /// Queue position, 1 based; 0 when nothing is queued
    #[serde(default)]
    pub track: u32,
    #[serde(default)]
    pub rel_time: String,
}

/// Capture the state of `members`; `members[0]` must be the coordinator.
pub fn create(
    actions: &dyn SonosActions,
    members: &[GroupMember],
    options: SnapshotOptions,
) -> Result<GroupStateSnapshot> {
    let mut snapshot = GroupStateSnapshot::default();

    if let Some(coordinator) = members.first() {
        let state = media::playback_state(actions, &coordinator.base_url)?;
        snapshot.was_playing = state == "playing" || state == "transitioning";
        snapshot.playback_state = state;

        let media = av_transport::get_media_info(actions, &coordinator.base_url)?;
        snapshot.current_uri = media.current_uri;
        snapshot.current_uri_meta_data = media.current_uri_meta_data;

        let position = av_transport::get_position_info(actions, &coordinator.base_url)?;
        snapshot.track = position.track;
        snapshot.rel_time = position.rel_time;
    }

    for member in members {
        let volume = if options.snap_volumes {
            Some(rendering_control::get_volume(actions, &member.base_url)?.current_volume)
        } else {
            None
        };
        let mute_state = if options.snap_mutestates {
            Some(rendering_control::get_mute(actions, &member.base_url)?.current_mute == "1")
        } else {
            None
        };
        snapshot.members.push(MemberState {
            player_name: member.name.clone(),
            base_url: member.base_url.clone(),
            volume,
            mute_state,
        });
    }

    debug!(members = snapshot.members.len(), was_playing = snapshot.was_playing, "snapshot created");
    Ok(snapshot)
}

/// Put content, position, volumes and mute states back.
///
/// Playback is not resumed; callers decide on `was_playing`.
pub fn restore(
    actions: &dyn SonosActions,
    coordinator_base_url: &str,
    snapshot: &GroupStateSnapshot,
) -> Result<()> {
    if !snapshot.current_uri.is_empty() {
        av_transport::set_av_transport_uri(
            actions,
            coordinator_base_url,
            snapshot.current_uri.clone(),
            snapshot.current_uri_meta_data.clone(),
        )?;

        if snapshot.current_uri.starts_with("x-rincon-queue") && snapshot.track > 0 {
            media::select_track(actions, coordinator_base_url, snapshot.track)?;
            if has_position(&snapshot.rel_time) {
                av_transport::seek(
                    actions,
                    coordinator_base_url,
                    "REL_TIME".to_string(),
                    snapshot.rel_time.clone(),
                )?;
            }
        }
    }

    for member in &snapshot.members {
        if let Some(volume) = member.volume {
            rendering_control::set_volume(actions, &member.base_url, volume)?;
        }
        if let Some(mute) = member.mute_state {
            rendering_control::set_mute(actions, &member.base_url, mute)?;
        }
    }
    Ok(())
}

fn has_position(rel_time: &str) -> bool {
    !rel_time.is_empty() && rel_time != "NOT_IMPLEMENTED" && crate::validation::hhmmss_to_msec(rel_time) > 0
}
