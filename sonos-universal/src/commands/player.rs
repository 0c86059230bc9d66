//! Player commands
//!
//! These act on the addressed player alone, `members[player_index]` of the
//! resolved group, regardless of whether it coordinates.

use super::{media, on_off, CommandContext};
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::topology::GroupMember;
use crate::validation::{
    is_on_off, patterns, string_to_valid_integer, string_valid_regex,
};
use serde_json::Value;
use sonos_api::services::{av_transport, device_properties, rendering_control};
use sonos_api::ApiError;
use tracing::debug;

/// Home theater EQ setting addressed by a `player.get.*` / `player.set.*` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EqSetting {
    NightMode,
    DialogLevel,
    SubGain,
}

impl EqSetting {
    fn from_command(command: &str) -> Option<Self> {
        match command.rsplit('.').next()? {
            "nightmode" => Some(EqSetting::NightMode),
            "dialoglevel" => Some(EqSetting::DialogLevel),
            "subgain" => Some(EqSetting::SubGain),
            _ => None,
        }
    }

    fn eq_type(self) -> &'static str {
        match self {
            EqSetting::NightMode => "NightMode",
            EqSetting::DialogLevel => "DialogLevel",
            EqSetting::SubGain => "SubGain",
        }
    }

    fn meaning(self) -> &'static str {
        match self {
            EqSetting::NightMode => "nightmode",
            EqSetting::DialogLevel => "dialoglevel",
            EqSetting::SubGain => "subgain",
        }
    }
}

fn addressed_player(ctx: &CommandContext<'_>, msg: &Message) -> Result<GroupMember> {
    let (_, group) = ctx.resolve_validated(msg)?;
    Ok(group.player().clone())
}

/// EQ settings exist on home theater models only.
fn require_tv_model(ctx: &CommandContext<'_>, player: &GroupMember) -> Result<()> {
    let description = ctx.actions.device_description(&player.base_url)?;
    if description.model_name.is_empty() {
        return Err(Error::InvalidState("Sonos player model name undefined".to_string()));
    }
    if !patterns::PLAYERS_WITH_TV.contains(&description.model_name.as_str()) {
        return Err(Error::InvalidState("Selected player does not support TV".to_string()));
    }
    Ok(())
}

pub fn adjust_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let adjustment =
        string_to_valid_integer(msg, ctx.value_field, -100, 100, "adjust volume", None)?;
    let player = addressed_player(ctx, msg)?;
    let response =
        rendering_control::set_relative_volume(ctx.actions, &player.base_url, adjustment as i32)?;
    debug!(player = %player.name, volume = response.new_volume, "volume adjusted");
    Ok(message::empty())
}

pub fn become_standalone(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    av_transport::become_coordinator_of_standalone_group(ctx.actions, &player.base_url)?;
    Ok(message::empty())
}

/// Run any action: the value is `{endpoint, action, inArgs}`.
///
/// `inArgs` is sent in the given field order; booleans become `1` / `0`.
pub fn execute_action(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let Some(Value::Object(request)) = ctx.value(msg) else {
        return Err(Error::MissingField(format!(
            "action request (msg.{}) is missing/invalid",
            ctx.value_field
        )));
    };
    let text = |name: &str| match request.get(name) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(Error::MissingField(format!(
            "{} (msg.{}.{}) is missing/invalid",
            name, ctx.value_field, name
        ))),
    };
    let endpoint = text("endpoint")?;
    let action = text("action")?;

    let mut args = Vec::new();
    match request.get("inArgs") {
        None | Some(Value::Null) => {}
        Some(Value::Object(in_args)) => {
            for (name, value) in in_args {
                let value = match value {
                    Value::String(text) => text.clone(),
                    Value::Bool(true) => "1".to_string(),
                    Value::Bool(false) => "0".to_string(),
                    Value::Number(number) => number.to_string(),
                    other => {
                        return Err(Error::InvalidInput(format!(
                            "inArgs (msg.{}.inArgs.{}) is not a scalar >>{}",
                            ctx.value_field, name, other
                        )))
                    }
                };
                args.push((name.clone(), value));
            }
        }
        Some(_) => {
            return Err(Error::InvalidInput(format!(
                "inArgs (msg.{}.inArgs) is not object",
                ctx.value_field
            )))
        }
    }

    let player = addressed_player(ctx, msg)?;
    let response = ctx.actions.execute_action(&player.base_url, &endpoint, &action, &args)?;
    Ok(message::with_payload(response.into_value()))
}

pub fn get_bass(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = rendering_control::get_bass(ctx.actions, &player.base_url)?;
    Ok(message::with_payload(response.current_bass))
}

/// Night mode and dialog level as `on` / `off`, sub gain as its number.
pub fn get_eq(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let setting = EqSetting::from_command(ctx.command)
        .ok_or_else(|| Error::UnknownCommand(format!("command is invalid >>{}", ctx.command)))?;
    let player = addressed_player(ctx, msg)?;
    require_tv_model(ctx, &player)?;

    let response = rendering_control::get_eq(ctx.actions, &player.base_url, setting.eq_type().to_string())?;
    if response.current_value.is_empty() {
        return Err(Error::InvalidState("player response is undefined".to_string()));
    }
    let value = match setting {
        EqSetting::SubGain => response.current_value,
        _ => on_off(&response.current_value).to_string(),
    };
    Ok(message::with_payload(value))
}

pub fn get_led(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = device_properties::get_led_state(ctx.actions, &player.base_url)?;
    if response.current_led_state.is_empty() {
        return Err(Error::InvalidState("player response is undefined".to_string()));
    }
    Ok(message::with_payload(response.current_led_state.to_lowercase()))
}

pub fn get_loudness(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = rendering_control::get_loudness(ctx.actions, &player.base_url)?;
    if response.current_loudness.is_empty() {
        return Err(Error::InvalidState("player response is undefined".to_string()));
    }
    Ok(message::with_payload(on_off(&response.current_loudness)))
}

pub fn get_mute(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = rendering_control::get_mute(ctx.actions, &player.base_url)?;
    Ok(message::with_payload(on_off(&response.current_mute)))
}

/// The device description plus `uuid` and `playerName`.
pub fn get_properties(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let description = ctx.actions.device_description(&player.base_url)?;

    let mut properties = match serde_json::to_value(&description) {
        Ok(Value::Object(properties)) => properties,
        Ok(_) | Err(_) => {
            return Err(Error::Api(ApiError::ParseError(
                "device description is not an object".to_string(),
            )))
        }
    };
    properties.insert("uuid".to_string(), Value::String(description.rincon().to_string()));
    properties.insert(
        "playerName".to_string(),
        description.room_name.clone().map_or(Value::Null, Value::String),
    );
    Ok(message::with_payload(Value::Object(properties)))
}

pub fn get_queue(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let queue = media::get_queue(ctx.actions, &player.base_url)?;
    message::with_serialized_payload(&queue)
}

/// `standalone`, `coordinator` or `joiner`, with the player's name.
pub fn get_role(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (_, group) = ctx.resolve_validated(msg)?;
    let role = if group.is_standalone() {
        "standalone"
    } else if group.player_index == 0 {
        "coordinator"
    } else {
        "joiner"
    };

    let mut fragment = message::with_payload(role);
    fragment.insert("playerName".to_string(), Value::String(group.player().name.clone()));
    Ok(fragment)
}

pub fn get_treble(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = rendering_control::get_treble(ctx.actions, &player.base_url)?;
    Ok(message::with_payload(response.current_treble))
}

pub fn get_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    let response = rendering_control::get_volume(ctx.actions, &player.base_url)?;
    Ok(message::with_payload(response.current_volume))
}

/// Join the group of the player named in the value.
///
/// Nothing is sent when the addressed player already coordinates that group.
pub fn join_group(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let target_name =
        string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "group player name", None)?;
    let target = ctx.resolve(&target_name)?;
    let (_, joiner_group) = ctx.resolve_validated(msg)?;

    let joiner = joiner_group.player();
    let coordinator = target.coordinator();
    if joiner.name != coordinator.name {
        av_transport::set_av_transport_uri(
            ctx.actions,
            &joiner.base_url,
            media::group_uri(&coordinator.uuid),
            String::new(),
        )?;
    } else {
        debug!(player = %joiner.name, "already coordinator of the target group");
    }
    Ok(message::empty())
}

pub fn leave_group(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let player = addressed_player(ctx, msg)?;
    av_transport::become_coordinator_of_standalone_group(ctx.actions, &player.base_url)?;
    Ok(message::empty())
}

/// Set any transport URI (line-in, another group's stream, ...) and play it.
pub fn play_avtransport(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let uri = string_valid_regex(msg, ctx.value_field, &patterns::ANY_CHAR, "uri", None)?;
    let (validated, group) = ctx.resolve_validated(msg)?;
    let player = group.player();

    av_transport::set_av_transport_uri(ctx.actions, &player.base_url, uri, String::new())?;
    media::play(ctx.actions, &player.base_url)?;
    if let Some(volume) = validated.volume() {
        rendering_control::set_volume(ctx.actions, &player.base_url, volume)?;
    }
    Ok(message::empty())
}

/// Switch a home theater player to its TV input.
pub fn play_tv(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let (validated, group) = ctx.resolve_validated(msg)?;
    let player = group.player();

    let description = ctx.actions.device_description(&player.base_url)?;
    if !description.supports_tv() {
        return Err(Error::InvalidState("Sonos player is not TV enabled".to_string()));
    }

    av_transport::set_av_transport_uri(
        ctx.actions,
        &player.base_url,
        format!("x-sonos-htastream:{}:spdif", description.rincon()),
        String::new(),
    )?;
    if let Some(volume) = validated.volume() {
        rendering_control::set_volume(ctx.actions, &player.base_url, volume)?;
    }
    Ok(message::empty())
}

pub fn set_bass(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let bass = string_to_valid_integer(msg, ctx.value_field, -10, 10, "set bass", None)?;
    let player = addressed_player(ctx, msg)?;
    rendering_control::set_bass(ctx.actions, &player.base_url, bass as i16)?;
    Ok(message::empty())
}

/// Night mode and dialog level take `on` / `off`, sub gain `-15..=15`.
pub fn set_eq(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let setting = EqSetting::from_command(ctx.command)
        .ok_or_else(|| Error::UnknownCommand(format!("command is invalid >>{}", ctx.command)))?;
    let player = addressed_player(ctx, msg)?;
    require_tv_model(ctx, &player)?;

    let value = match setting {
        EqSetting::SubGain => {
            string_to_valid_integer(msg, ctx.value_field, -15, 15, setting.meaning(), None)? as i32
        }
        _ => i32::from(is_on_off(msg, ctx.value_field, setting.meaning())?),
    };
    rendering_control::set_eq(ctx.actions, &player.base_url, setting.eq_type().to_string(), value)?;
    Ok(message::empty())
}

pub fn set_led(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let on = is_on_off(msg, ctx.value_field, "led state")?;
    let player = addressed_player(ctx, msg)?;
    let state = if on { "On" } else { "Off" };
    device_properties::set_led_state(ctx.actions, &player.base_url, state.to_string())?;
    Ok(message::empty())
}

pub fn set_loudness(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let on = is_on_off(msg, ctx.value_field, "loudness state")?;
    let player = addressed_player(ctx, msg)?;
    rendering_control::set_loudness(ctx.actions, &player.base_url, on)?;
    Ok(message::empty())
}

pub fn set_mute(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let mute = is_on_off(msg, ctx.value_field, "mute state")?;
    let player = addressed_player(ctx, msg)?;
    rendering_control::set_mute(ctx.actions, &player.base_url, mute)?;
    Ok(message::empty())
}

pub fn set_treble(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let treble = string_to_valid_integer(msg, ctx.value_field, -10, 10, "set treble", None)?;
    let player = addressed_player(ctx, msg)?;
    rendering_control::set_treble(ctx.actions, &player.base_url, treble as i16)?;
    Ok(message::empty())
}

/// Only `playerName` is read besides the value; `volume` and `sameVolume`
/// are not validated here.
pub fn set_volume(ctx: &CommandContext<'_>, msg: &Message) -> Result<Fragment> {
    let volume = string_to_valid_integer(msg, ctx.value_field, 0, 100, "volume", None)?;
    let player_name =
        string_valid_regex(msg, "playerName", &patterns::ANY_CHAR, "player name", Some(""))?;
    let group = ctx.resolve(&player_name)?;
    rendering_control::set_volume(ctx.actions, &group.player().base_url, volume as u16)?;
    Ok(message::empty())
}
