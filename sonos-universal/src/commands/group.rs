//! Group commands
//!
//! These address a whole group through its coordinator, `members[0]` of the
//! resolved snapshot. Volume fan-out after playback is the only place where
//! other members are contacted.

use super::notification::{self, NotificationOptions};
use super::snapshot::{self, GroupStateSnapshot, SnapshotOptions};
use super::{apply_volume, check_same_volume, media, on_off, CommandContext};
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::validation::{
    is_on_off, is_valid_property, optional_bool, patterns,
    string_to_valid_integer, string_valid_regex,
};
use serde_json::{json, Value};
use sonos_api::services::{av_transport, group_rendering_control};
use tracing::debug;

pub fn adjust_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let adjustment =
        string_to_valid_integer(msg, ctx.value_field, -100, 100, "adjust volume", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;

    let response = group_rendering_control::set_relative_group_volume(
        ctx.actions,
        &group.coordinator().base_url,
        adjustment as i32,
    )?;

    let mut fragment = Fragment::new();
    fragment.insert("newVolume".to_string(), json!(response.new_volume));
    Ok(fragment)
}

pub fn cancel_sleeptimer(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::configure_sleep_timer(ctx.actions, &group.coordinator().base_url, String::new())?;
    Ok(message::empty())
}

pub fn clear_queue(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::remove_all_tracks_from_queue(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

pub fn create_snapshot(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let options = SnapshotOptions {
        snap_volumes: optional_bool(msg, "snapVolumes", "snapVolumes indicator", false)?,
        snap_mutestates: optional_bool(msg, "snapMutestates", "snapMutestates indicator", false)?,
    };
    let (_, group) = ctx.resolve_validated(msg)?;

    let snap = snapshot::create(ctx.actions, &group.members, options)?;
    message::with_serialized_payload(&snap)
}

pub fn create_volume_snapshot(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    group_rendering_control::snapshot_group_volume(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

pub fn get_actions(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let response =
        av_transport::get_current_transport_actions(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::with_payload(response.actions))
}

pub fn get_crossfade(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let response = av_transport::get_crossfade_mode(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::with_payload(on_off(&response.crossfade_mode)))
}

pub fn get_members(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    message::with_serialized_payload(&group.members)
}

pub fn get_mute(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let response = group_rendering_control::get_group_mute(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::with_payload(on_off(&response.current_mute)))
}

pub fn get_playbackstate(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let state = media::playback_state(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::with_payload(state))
}

pub fn get_queue(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let queue = media::get_queue(ctx.actions, &group.coordinator().base_url)?;
    message::with_serialized_payload(&queue)
}

pub fn get_sleeptimer(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let response =
        av_transport::get_remaining_sleep_timer_duration(ctx.actions, &group.coordinator().base_url)?;
    let remaining = match response.remaining_sleep_timer_duration.as_str() {
        "" => "no time set".to_string(),
        duration => duration.to_string(),
    };
    Ok(message::with_payload(remaining))
}

/// Playback, volume, mute, content and members in one payload.
pub fn get_state(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();

    let playbackstate = media::playback_state(ctx.actions, &coordinator.base_url)?;
    let mute = group_rendering_control::get_group_mute(ctx.actions, &coordinator.base_url)?;
    let volume = group_rendering_control::get_group_volume(ctx.actions, &coordinator.base_url)?;
    let media_info = av_transport::get_media_info(ctx.actions, &coordinator.base_url)?;
    let settings = av_transport::get_transport_settings(ctx.actions, &coordinator.base_url)?;

    let uri = media_info.current_uri.as_str();
    Ok(message::with_payload(json!({
        "playbackstate": playbackstate,
        "coordinatorName": coordinator.name,
        "volume": volume.current_volume,
        "muteState": on_off(&mute.current_mute),
        "tvActivated": uri.starts_with("x-sonos-htastream"),
        "queueActivated": uri.starts_with("x-rincon-queue"),
        "queueMode": settings.play_mode,
        "members": message::to_json(&group.members)?,
        "size": group.members.len(),
        "id": group.group_id,
        "name": group.group_name,
    })))
}

/// Current track with artist and title split out, plus media and position data.
pub fn get_track_plus(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();

    let mut track = media::current_track(ctx.actions, &coordinator.base_url)?;
    let art_uri = track
        .album_art_uri
        .take()
        .filter(|uri| !uri.is_empty())
        .map(|uri| media::absolute_art_uri(&uri, &coordinator.base_url))
        .unwrap_or_default();
    let (artist, title) = artist_and_title(track.artist.as_deref(), track.title.as_deref());

    let media_info = av_transport::get_media_info(ctx.actions, &coordinator.base_url)?;
    let uri = media_info.current_uri.clone();
    let station_art_uri = if uri.starts_with("x-sonosapi-stream") {
        format!("{}/getaa?s=1&u={}", coordinator.base_url, uri)
    } else {
        String::new()
    };

    let position = av_transport::get_position_info(ctx.actions, &coordinator.base_url)?;
    let mut service_id = media::music_service_id(&uri);
    if service_id.is_empty() {
        service_id = media::music_service_id(&position.track_uri);
    }

    Ok(message::with_payload(json!({
        "trackData": message::to_json(&track)?,
        "artist": artist,
        "title": title,
        "artUri": art_uri,
        "mediaData": {
            "NrTracks": media_info.nr_tracks,
            "MediaDuration": media_info.media_duration,
            "CurrentURI": media_info.current_uri,
            "CurrentURIMetaData": media_info.current_uri_meta_data,
        },
        "queueActivated": uri.starts_with("x-rincon-queue"),
        "radioId": media::radio_id(&uri),
        "serviceName": media::music_service_name(&service_id),
        "serviceId": service_id,
        "stationArtUri": station_art_uri,
        "positionData": {
            "Track": position.track,
            "TrackDuration": position.track_duration,
            "TrackMetaData": position.track_meta_data,
            "TrackURI": position.track_uri,
            "RelTime": position.rel_time,
        },
    })))
}

/// Radio streams report `"artist - title"` as title and no artist.
fn artist_and_title(artist: Option<&str>, title: Option<&str>) -> (String, String) {
    let unknown = || "unknown".to_string();
    let artist = artist.filter(|a| !a.is_empty());
    let title = title.filter(|t| !t.is_empty());

    match (artist, title) {
        (Some(artist), title) => (artist.to_string(), title.map_or_else(unknown, str::to_string)),
        (None, Some(title)) => match title.split_once(" - ") {
            Some((artist, rest)) if !artist.is_empty() => {
                let title = rest.split(" - ").next().unwrap_or_default();
                (artist.to_string(), title.to_string())
            }
            _ => (unknown(), title.to_string()),
        },
        (None, None) => {
            debug!("track reports neither artist nor title");
            (unknown(), unknown())
        }
    }
}

pub fn get_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let response = group_rendering_control::get_group_volume(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::with_payload(response.current_volume))
}

pub fn next_track(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::next(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

pub fn pause(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::pause(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

pub fn play(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;

    media::play(ctx.actions, &group.coordinator().base_url)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

/// Play content exported by another command: `{uri, metadata, queue}`.
pub fn play_export(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let Some(Value::Object(export)) = ctx.value(msg) else {
        return Err(Error::MissingField("uri is missing".to_string()));
    };
    let uri = match export.get("uri") {
        Some(Value::String(uri)) if !uri.is_empty() => uri.clone(),
        _ => return Err(Error::MissingField("uri is missing".to_string())),
    };
    let queue = match export.get("queue") {
        Some(Value::Bool(queue)) => *queue,
        _ => {
            return Err(Error::MissingField(
                "queue identifier is missing".to_string(),
            ))
        }
    };
    let metadata = export
        .get("metadata")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;
    let coordinator = group.coordinator();

    if queue {
        if validated.clear_queue {
            av_transport::remove_all_tracks_from_queue(ctx.actions, &coordinator.base_url)?;
        }
        media::queue(ctx.actions, &coordinator.base_url, &uri, &metadata)?;
        media::select_queue(ctx.actions, &coordinator.base_url, &coordinator.uuid)?;
    } else {
        av_transport::set_av_transport_uri(ctx.actions, &coordinator.base_url, uri, metadata)?;
    }
    media::play(ctx.actions, &coordinator.base_url)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

pub fn play_notification(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let uri = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "uri", None)?;
    let (validated, group) = ctx.resolve_validated(msg)?;

    let options = NotificationOptions {
        uri,
        volume: validated.volume(),
        same_volume: validated.same_volume,
        duration: notification::duration_from_message(msg)?,
    };
    notification::play_group_notification(ctx, &group.members, group.player_index, &options)?;
    Ok(message::empty())
}

pub fn play_queue(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;
    let coordinator = group.coordinator();

    media::require_queue(ctx.actions, &coordinator.base_url)?;
    media::select_queue(ctx.actions, &coordinator.base_url, &coordinator.uuid)?;
    media::play(ctx.actions, &coordinator.base_url)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

/// Restore a snapshot taken with `group.create.snap`.
pub fn play_snapshot(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let value = match ctx.value(msg) {
        Some(value) if is_valid_property(msg, &[ctx.value_field]) => value,
        _ => {
            return Err(Error::MissingField(format!(
                "snapshot (msg.{}) is missing",
                ctx.value_field
            )))
        }
    };
    if !value.is_object() {
        return Err(Error::InvalidInput(format!(
            "snapshot (msg.{}) is not object",
            ctx.value_field
        )));
    }
    let snap: GroupStateSnapshot = serde_json::from_value(value.clone()).map_err(|e| {
        Error::InvalidInput(format!(
            "snapshot (msg.{}) is invalid: {}",
            ctx.value_field, e
        ))
    })?;

    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();
    snapshot::restore(ctx.actions, &coordinator.base_url, &snap)?;
    if snap.was_playing {
        media::play(ctx.actions, &coordinator.base_url)?;
    }
    Ok(message::empty())
}

pub fn play_stream_http(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let uri = string_valid_regex(msg, ctx.value_field, &patterns::HTTP, "uri", None)?;
    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;
    let coordinator = group.coordinator();

    av_transport::set_av_transport_uri(
        ctx.actions,
        &coordinator.base_url,
        format!("x-rincon-mp3radio://{}", uri),
        String::new(),
    )?;
    media::play(ctx.actions, &coordinator.base_url)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

pub fn play_track(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;
    let coordinator = group.coordinator();

    let length = media::require_queue(ctx.actions, &coordinator.base_url)?;
    let position =
        string_to_valid_integer(msg, ctx.value_field, 1, length as i64, "position in queue", None)?;

    media::select_queue(ctx.actions, &coordinator.base_url, &coordinator.uuid)?;
    media::select_track(ctx.actions, &coordinator.base_url, position as u32)?;
    media::play(ctx.actions, &coordinator.base_url)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

pub fn play_tunein(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let radio_id = string_valid_regex(msg, ctx.value_field, &patterns::RADIO_ID, "radio id", None)?;
    let (validated, group) = ctx.resolve_validated(msg)?;
    check_same_volume(&validated, &group)?;

    media::play_tunein(ctx.actions, &group.coordinator().base_url, &radio_id)?;
    apply_volume(ctx, &validated, &group)?;
    Ok(message::empty())
}

pub fn previous_track(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::previous(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

pub fn queue_uri(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let uri = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "uri", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    media::queue(ctx.actions, &group.coordinator().base_url, &uri, "")?;
    Ok(message::empty())
}

pub fn queue_uri_spotify(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let spotify_uri =
        string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "spotify uri", None)?;
    let (uri, metadata) = media::spotify_queue_item(&spotify_uri)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    media::queue(ctx.actions, &group.coordinator().base_url, &uri, &metadata)?;
    Ok(message::empty())
}

/// Remove `numberOfTracks` (default 1) tracks starting at the given position.
pub fn remove_tracks(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();

    let length = media::require_queue(ctx.actions, &coordinator.base_url)? as i64;
    let position = string_to_valid_integer(msg, ctx.value_field, 1, length, "position in queue", None)?;
    let count = string_to_valid_integer(msg, "numberOfTracks", 1, length, "number of tracks", Some(1))?;

    av_transport::remove_track_range_from_queue(
        ctx.actions,
        &coordinator.base_url,
        0,
        position as u32,
        count as u32,
    )?;
    Ok(message::empty())
}

pub fn save_queue(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let title = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "title", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();

    media::require_queue(ctx.actions, &coordinator.base_url)?;
    let saved = av_transport::save_queue(ctx.actions, &coordinator.base_url, title, String::new())?;
    debug!(object_id = %saved.assigned_object_id, "queue saved");
    Ok(message::empty())
}

pub fn seek(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let target = string_valid_regex(msg, ctx.value_field, &patterns::TIME, "seek time", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::seek(ctx.actions, &group.coordinator().base_url, "REL_TIME".to_string(), target)?;
    Ok(message::empty())
}

pub fn seek_delta(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let target =
        string_valid_regex(msg, ctx.value_field, &patterns::TIME_DELTA, "relative seek time", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::seek(ctx.actions, &group.coordinator().base_url, "TIME_DELTA".to_string(), target)?;
    Ok(message::empty())
}

pub fn set_crossfade(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let on = is_on_off(msg, ctx.value_field, "crossfade state")?;
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::set_crossfade_mode(ctx.actions, &group.coordinator().base_url, on)?;
    Ok(message::empty())
}

pub fn set_mute(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let mute = is_on_off(msg, ctx.value_field, "mute state")?;
    let (_, group) = ctx.resolve_validated(msg)?;
    group_rendering_control::set_group_mute(ctx.actions, &group.coordinator().base_url, mute)?;
    Ok(message::empty())
}

/// Set the play mode; only allowed while the queue is playing.
pub fn set_queuemode(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let mode = string_valid_regex(msg, ctx.value_field, &patterns::QUEUE_MODES, "queue mode", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    let coordinator = group.coordinator();

    media::require_queue(ctx.actions, &coordinator.base_url)?;
    let media_info = av_transport::get_media_info(ctx.actions, &coordinator.base_url)?;
    if media_info.current_uri.is_empty() {
        return Err(Error::InvalidState("CurrentUri is invalid".to_string()));
    }
    if !media_info.current_uri.starts_with("x-rincon-queue") {
        return Err(Error::InvalidState("queue is not activated".to_string()));
    }

    av_transport::set_play_mode(ctx.actions, &coordinator.base_url, mode.to_uppercase())?;
    Ok(message::empty())
}

pub fn set_sleeptimer(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let duration = string_valid_regex(msg, ctx.value_field, &patterns::TIME, "timer duration", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::configure_sleep_timer(ctx.actions, &group.coordinator().base_url, duration)?;
    Ok(message::empty())
}

pub fn set_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let volume = string_to_valid_integer(msg, ctx.value_field, 0, 100, "new volume", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    group_rendering_control::set_group_volume(
        ctx.actions,
        &group.coordinator().base_url,
        volume as u16,
    )?;
    Ok(message::empty())
}

pub fn stop(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    av_transport::stop(ctx.actions, &group.coordinator().base_url)?;
    Ok(message::empty())
}

/// Pause when playing, play otherwise.
pub fn toggle_playback(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let base_url = &group.coordinator().base_url;

    if media::playback_state(ctx.actions, base_url)? == "playing" {
        av_transport::pause(ctx.actions, base_url)?;
    } else {
        media::play(ctx.actions, base_url)?;
    }
    Ok(message::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Queen"), Some("Bohemian Rhapsody"), "Queen", "Bohemian Rhapsody")]
    #[case(None, Some("Queen - Bohemian Rhapsody"), "Queen", "Bohemian Rhapsody")]
    #[case(None, Some("Morning News"), "unknown", "Morning News")]
    #[case(Some("Queen"), None, "Queen", "unknown")]
    #[case(None, None, "unknown", "unknown")]
    #[case(Some(""), Some(""), "unknown", "unknown")]
    fn test_artist_and_title(
        #[case] artist: Option<&str>,
        #[case] title: Option<&str>,
        #[case] expected_artist: &str,
        #[case] expected_title: &str,
    ) {
        assert_eq!(
            artist_and_title(artist, title),
            (expected_artist.to_string(), expected_title.to_string())
        );
    }
}
