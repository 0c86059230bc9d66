//! Notification playback
//!
//! A notification interrupts whatever the group plays, waits for the
//! notification to finish and puts the previous state back. The previous
//! state is restored even when playing the notification or waiting fails.

use super::snapshot::{self, SnapshotOptions};
use super::{media, CommandContext};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::topology::GroupMember;
use crate::validation::{hhmmss_to_msec, is_valid_property, patterns};
use serde_json::Value;
use sonos_api::services::{av_transport, rendering_control};
use std::time::Duration;
use tracing::{debug, warn};

/// Used when the duration is neither given nor readable from the player
pub const DEFAULT_DURATION: &str = "00:00:05";

/// Added to a detected track duration so the end is not cut off
const AUTOMATIC_DURATION_MARGIN: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationDuration {
    /// Read the track duration from the player, fall back to the given one
    Automatic(Duration),
    Fixed(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub uri: String,
    pub volume: Option<u16>,
    /// Group notifications only: volume on every member or the addressed one
    pub same_volume: bool,
    pub duration: NotificationDuration,
}

/// Read the optional `duration` field (`hh:mm:ss`).
pub fn duration_from_message(msg: &Message) -> Result<NotificationDuration> {
    if !is_valid_property(msg, &["duration"]) {
        return Ok(NotificationDuration::Automatic(Duration::from_millis(
            hhmmss_to_msec(DEFAULT_DURATION),
        )));
    }
    let Some(Value::String(duration)) = msg.get("duration") else {
        return Err(Error::InvalidInput(
            "duration (msg.duration) is not a string".to_string(),
        ));
    };
    if !patterns::TIME.is_match(duration) {
        return Err(Error::InvalidInput(
            "duration (msg.duration) is not format hh:mm:ss".to_string(),
        ));
    }
    Ok(NotificationDuration::Fixed(Duration::from_millis(hhmmss_to_msec(duration))))
}

/// Play a notification on a whole group, coordinator at `members[0]`.
pub fn play_group_notification(
    ctx: &CommandContext<'_>,
    members: &[GroupMember],
    player_index: usize,
    options: &NotificationOptions,
) -> Result<()> {
    let coordinator = &members[0];
    let snap = snapshot::create(
        ctx.actions,
        members,
        SnapshotOptions {
            snap_volumes: options.volume.is_some(),
            snap_mutestates: false,
        },
    )?;

    let targets: Vec<&GroupMember> = if options.same_volume {
        members.iter().collect()
    } else {
        vec![&members[player_index]]
    };
    let played = play_and_wait(ctx, coordinator, &targets, options);

    let restored = snapshot::restore(ctx.actions, &coordinator.base_url, &snap).and_then(|_| {
        if snap.was_playing {
            media::play(ctx.actions, &coordinator.base_url)
        } else {
            Ok(())
        }
    });
    if let Err(e) = &restored {
        warn!(player = %coordinator.name, "could not restore group after notification: {}", e);
    }

    played.and(restored)
}

/// Play a notification on one joiner only; it rejoins its group afterwards.
pub fn play_joiner_notification(
    ctx: &CommandContext<'_>,
    coordinator: &GroupMember,
    joiner: &GroupMember,
    options: &NotificationOptions,
) -> Result<()> {
    let previous_volume = match options.volume {
        Some(_) => Some(rendering_control::get_volume(ctx.actions, &joiner.base_url)?.current_volume),
        None => None,
    };

    let played = play_and_wait(ctx, joiner, &[joiner], options);

    let restored = av_transport::set_av_transport_uri(
        ctx.actions,
        &joiner.base_url,
        media::group_uri(&coordinator.uuid),
        String::new(),
    )
    .map_err(Error::from)
    .and_then(|_| match previous_volume {
        Some(volume) => Ok(rendering_control::set_volume(ctx.actions, &joiner.base_url, volume)?),
        None => Ok(()),
    });
    if let Err(e) = &restored {
        warn!(player = %joiner.name, "could not rejoin group after notification: {}", e);
    }

    played.and(restored)
}

fn play_and_wait(
    ctx: &CommandContext<'_>,
    player: &GroupMember,
    volume_targets: &[&GroupMember],
    options: &NotificationOptions,
) -> Result<()> {
    av_transport::set_av_transport_uri(
        ctx.actions,
        &player.base_url,
        options.uri.clone(),
        String::new(),
    )?;
    if let Some(volume) = options.volume {
        for target in volume_targets {
            rendering_control::set_volume(ctx.actions, &target.base_url, volume)?;
        }
    }
    media::play(ctx.actions, &player.base_url)?;

    let wait = match &options.duration {
        NotificationDuration::Fixed(duration) => *duration,
        NotificationDuration::Automatic(fallback) => {
            let position = av_transport::get_position_info(ctx.actions, &player.base_url)?;
            match hhmmss_to_msec(&position.track_duration) {
                0 => *fallback,
                msec => Duration::from_millis(msec) + AUTOMATIC_DURATION_MARGIN,
            }
        }
    };
    debug!(player = %player.name, wait_ms = wait.as_millis() as u64, "playing notification");
    ctx.wait(wait);
    Ok(())
}
