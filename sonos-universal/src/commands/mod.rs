//! The command table
//!
//! Every command is a plain function with the same signature. It reads its
//! fields from the inbound message, resolves the addressed group, runs its
//! actions one after another and returns the fragment merged into the
//! outbound message. A failure stops the handler where it is; actions
//! already sent are not undone.

pub mod coordinator;
pub mod group;
pub mod household;
pub mod joiner;
pub mod media;
pub mod notification;
pub mod player;
pub mod snapshot;

use crate::error::{Error, Result};
use crate::message::Message;
use crate::topology::{self, GroupSnapshot, PlayerAddress};
use crate::validation::{self, ValidatedGroupProperties};
use serde_json::Value;
use sonos_api::services::rendering_control;
use sonos_api::SonosActions;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

pub use crate::message::Fragment;

/// Command namespaces; a command without one is a group command
pub const NAMESPACES: [&str; 5] = ["coordinator", "group", "household", "joiner", "player"];

/// Everything a handler needs besides the message
pub struct CommandContext<'a> {
    /// Action execution against players
    pub actions: &'a dyn SonosActions,
    /// The node's own player; topology is read from it
    pub anchor: &'a PlayerAddress,
    /// The resolved command, lower case with namespace
    pub command: &'a str,
    /// Field holding the command's main argument (`payload` by default)
    pub value_field: &'a str,
    /// Field holding the command (`topic` by default)
    pub command_field: &'a str,
    /// Blocking wait, `std::thread::sleep` outside of tests
    pub delay: fn(Duration),
}

impl<'a> CommandContext<'a> {
    /// The command's main argument
    pub fn value<'m>(&self, msg: &'m Message) -> Option<&'m Value> {
        msg.get(self.value_field)
    }

    /// Group of `player_name`, or of the node's player when empty.
    pub fn resolve(&self, player_name: &str) -> Result<GroupSnapshot> {
        topology::resolve(self.actions, self.anchor, player_name)
    }

    /// Validate the common fields and resolve the addressed group.
    pub fn resolve_validated(&self, msg: &Message) -> Result<(ValidatedGroupProperties, GroupSnapshot)> {
        let validated = validation::validated_group_properties(msg)?;
        let snapshot = self.resolve(&validated.player_name)?;
        Ok((validated, snapshot))
    }

    pub fn wait(&self, duration: Duration) {
        (self.delay)(duration)
    }
}

/// Signature shared by all commands
pub type Handler = fn(&CommandContext<'_>, &Message) -> Result<Fragment>;

macro_rules! command_table {
    ($($name:literal => $handler:path),* $(,)?) => {{
        let mut table: HashMap<&'static str, Handler> = HashMap::new();
        $(table.insert($name, $handler);)*
        table
    }};
}

static COMMAND_TABLE: LazyLock<HashMap<&'static str, Handler>> = LazyLock::new(|| {
    command_table! {
        "coordinator.delegate" => coordinator::delegate,

        "group.adjust.volume" => group::adjust_volume,
        "group.cancel.sleeptimer" => group::cancel_sleeptimer,
        "group.clear.queue" => group::clear_queue,
        "group.create.snap" => group::create_snapshot,
        "group.create.volumesnap" => group::create_volume_snapshot,
        "group.get.actions" => group::get_actions,
        "group.get.crossfade" => group::get_crossfade,
        "group.get.members" => group::get_members,
        "group.get.mutestate" => group::get_mute,
        "group.get.playbackstate" => group::get_playbackstate,
        "group.get.queue" => group::get_queue,
        "group.get.sleeptimer" => group::get_sleeptimer,
        "group.get.state" => group::get_state,
        "group.get.trackplus" => group::get_track_plus,
        "group.get.volume" => group::get_volume,
        "group.next.track" => group::next_track,
        "group.pause" => group::pause,
        "group.play" => group::play,
        "group.play.export" => group::play_export,
        "group.play.notification" => group::play_notification,
        "group.play.queue" => group::play_queue,
        "group.play.snap" => group::play_snapshot,
        "group.play.streamhttp" => group::play_stream_http,
        "group.play.track" => group::play_track,
        "group.play.tunein" => group::play_tunein,
        "group.previous.track" => group::previous_track,
        "group.queue.uri" => group::queue_uri,
        "group.queue.urispotify" => group::queue_uri_spotify,
        "group.remove.tracks" => group::remove_tracks,
        "group.save.queue" => group::save_queue,
        "group.seek" => group::seek,
        "group.seek.delta" => group::seek_delta,
        "group.set.crossfade" => group::set_crossfade,
        "group.set.mutestate" => group::set_mute,
        "group.set.queuemode" => group::set_queuemode,
        "group.set.sleeptimer" => group::set_sleeptimer,
        "group.set.volume" => group::set_volume,
        "group.stop" => group::stop,
        "group.toggle.playback" => group::toggle_playback,

        "household.create.group" => household::create_group,
        "household.create.stereopair" => household::create_stereopair,
        "household.get.groups" => household::get_groups,
        "household.get.sonosplaylists" => household::get_sonos_playlists,
        "household.remove.sonosplaylist" => household::remove_sonos_playlist,
        "household.separate.group" => household::separate_group,
        "household.separate.stereopair" => household::separate_stereopair,
        "household.test.player" => household::test_player,

        "joiner.play.notification" => joiner::play_notification,

        "player.adjust.volume" => player::adjust_volume,
        "player.become.standalone" => player::become_standalone,
        "player.execute.action" => player::execute_action,
        "player.get.bass" => player::get_bass,
        "player.get.dialoglevel" => player::get_eq,
        "player.get.led" => player::get_led,
        "player.get.loudness" => player::get_loudness,
        "player.get.mutestate" => player::get_mute,
        "player.get.nightmode" => player::get_eq,
        "player.get.properties" => player::get_properties,
        "player.get.queue" => player::get_queue,
        "player.get.role" => player::get_role,
        "player.get.subgain" => player::get_eq,
        "player.get.treble" => player::get_treble,
        "player.get.volume" => player::get_volume,
        "player.join.group" => player::join_group,
        "player.leave.group" => player::leave_group,
        "player.play.avtransport" => player::play_avtransport,
        "player.play.tv" => player::play_tv,
        "player.set.bass" => player::set_bass,
        "player.set.dialoglevel" => player::set_eq,
        "player.set.led" => player::set_led,
        "player.set.loudness" => player::set_loudness,
        "player.set.mutestate" => player::set_mute,
        "player.set.nightmode" => player::set_eq,
        "player.set.subgain" => player::set_eq,
        "player.set.treble" => player::set_treble,
        "player.set.volume" => player::set_volume,
    }
});

/// Lower-case the command and add the `group.` namespace when it has none.
pub fn resolve_command(raw: &str) -> String {
    let command = raw.trim().to_lowercase();
    let has_namespace = NAMESPACES
        .iter()
        .any(|namespace| command.strip_prefix(namespace).is_some_and(|rest| rest.starts_with('.')));
    if has_namespace {
        command
    } else {
        format!("group.{}", command)
    }
}

/// Handler of a resolved command.
pub fn lookup(command: &str) -> Option<Handler> {
    COMMAND_TABLE.get(command).copied()
}

/// All commands, sorted.
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<_> = COMMAND_TABLE.keys().copied().collect();
    names.sort_unstable();
    names
}

/// `on` for the player's `"1"`, `off` for anything else
pub fn on_off(value: &str) -> &'static str {
    if value == "1" {
        "on"
    } else {
        "off"
    }
}

/// `sameVolume: false` only makes sense with someone else to differ from.
pub fn check_same_volume(validated: &ValidatedGroupProperties, snapshot: &GroupSnapshot) -> Result<()> {
    if !validated.same_volume && snapshot.is_standalone() {
        return Err(Error::InvalidInput(
            "msg.sameVolume is nonsense: player is standalone".to_string(),
        ));
    }
    Ok(())
}

/// Set the requested volume after playback started: on every member with
/// `sameVolume`, else on the addressed player only.
pub fn apply_volume(
    ctx: &CommandContext<'_>,
    validated: &ValidatedGroupProperties,
    snapshot: &GroupSnapshot,
) -> Result<()> {
    let Some(volume) = validated.volume() else {
        return Ok(());
    };

    if validated.same_volume {
        for member in &snapshot.members {
            rendering_control::set_volume(ctx.actions, &member.base_url, volume)?;
        }
    } else {
        rendering_control::set_volume(ctx.actions, &snapshot.player().base_url, volume)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("play", "group.play")]
    #[case("Play", "group.play")]
    #[case("player.get.volume", "player.get.volume")]
    #[case("PLAYER.GET.VOLUME", "player.get.volume")]
    #[case("coordinator.delegate", "coordinator.delegate")]
    #[case("household.get.groups", "household.get.groups")]
    #[case("get.volume", "group.get.volume")]
    #[case("players.get.volume", "group.players.get.volume")]
    #[case("bogus.command", "group.bogus.command")]
    fn test_resolve_command(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(resolve_command(raw), expected);
    }

    #[test]
    fn test_every_command_is_namespaced_lower_case() {
        let names = command_names();
        assert_eq!(names.len(), 77);
        for name in names {
            assert_eq!(name, name.to_lowercase());
            assert_eq!(resolve_command(name), name);
            assert!(lookup(name).is_some());
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(lookup(&resolve_command("bogus.command")).is_none());
        assert!(lookup(&resolve_command("play")).is_some());
    }

    #[rstest]
    #[case("1", "on")]
    #[case("0", "off")]
    #[case("", "off")]
    fn test_on_off(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(on_off(value), expected);
    }
}
