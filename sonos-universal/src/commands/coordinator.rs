//! Coordinator commands

use super::CommandContext;
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::validation::{patterns, string_valid_regex};
use sonos_api::services::av_transport;
use tracing::info;

/// Hand coordination to another member of the same group.
///
/// The addressed player must coordinate; it stays in the group.
pub fn delegate(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let new_name = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "player name", None)?;
    let (_, group) = ctx.resolve_validated(msg)?;
    if group.player_index != 0 {
        return Err(Error::InvalidState("Player must be coordinator".to_string()));
    }

    let new_index = group
        .members
        .iter()
        .position(|member| member.name == new_name)
        .ok_or_else(|| {
            Error::PlayerNotFound("Could not find player name in current group".to_string())
        })?;
    if new_index == 0 {
        return Err(Error::InvalidInput(
            "New coordinator must be different from current coordinator".to_string(),
        ));
    }

    let new_coordinator = &group.members[new_index];
    av_transport::delegate_group_coordination_to(
        ctx.actions,
        &group.player().base_url,
        new_coordinator.uuid.clone(),
        true,
    )?;
    info!(from = %group.player().name, to = %new_coordinator.name, "coordination delegated");
    Ok(message::empty())
}
