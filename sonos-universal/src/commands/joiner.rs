//! Joiner commands

use super::notification::{self, NotificationOptions};
use super::CommandContext;
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::validation::{patterns, string_valid_regex};

/// Play a notification on one joiner while the rest of its group keeps playing.
///
/// `sameVolume` is ignored; only the joiner's volume is touched.
pub fn play_notification(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let uri = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "uri", None)?;
    let (validated, group) = ctx.resolve_validated(msg)?;
    if group.player_index == 0 {
        return Err(Error::InvalidState(
            "player (msg.player/node) is not a joiner".to_string(),
        ));
    }

    let options = NotificationOptions {
        uri,
        volume: validated.volume(),
        same_volume: false,
        duration: notification::duration_from_message(msg)?,
    };
    notification::play_joiner_notification(ctx, group.coordinator(), group.player(), &options)?;
    Ok(message::empty())
}
