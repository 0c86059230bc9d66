//! Validation and coercion of message fields
//!
//! Every check reads one field of the inbound message, raises an error whose
//! text names the field and its meaning, and has no other side effects.
//! Absent fields are a [`MissingField`](Error::MissingField) error unless a
//! default is supplied; defaults are returned as given, without range checks,
//! so sentinels such as `-1` for "volume not set" pass through.

pub mod html;
pub mod patterns;

pub use html::{decode_html, encode_html};

use crate::error::{Error, Result};
use crate::message::Message;
use regex::Regex;
use serde_json::Value;

/// Whether a value is present and not `null`
///
/// JSON numbers are always finite, so there is no NaN case to reject.
pub fn is_truthy(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// [`is_truthy`] and additionally not the empty string
pub fn is_truthy_and_not_empty_string(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        other => is_truthy(other),
    }
}

fn lookup<'a>(msg: &'a Message, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = msg.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

/// Whether the nested field at `path` exists and is not `null`
pub fn is_valid_property(msg: &Message, path: &[&str]) -> bool {
    is_truthy(lookup(msg, path))
}

/// Whether the nested field at `path` exists, is not `null` and not `""`
pub fn is_valid_property_not_empty_string(msg: &Message, path: &[&str]) -> bool {
    is_truthy_and_not_empty_string(lookup(msg, path))
}

fn missing(field: &str, meaning: &str) -> Error {
    Error::MissingField(format!("{} ({}) is missing/invalid", meaning, field))
}

/// Coerce `"on"` / `"off"` (any case) to a boolean.
pub fn is_on_off(msg: &Message, field: &str, meaning: &str) -> Result<bool> {
    if !is_valid_property(msg, &[field]) {
        return Err(missing(field, meaning));
    }
    let value = match msg.get(field) {
        Some(Value::String(value)) => value.to_lowercase(),
        _ => {
            return Err(Error::InvalidInput(format!(
                "{} ({}) is not string",
                meaning, field
            )))
        }
    };
    match value.as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "{} ({}) is not on/off",
            meaning, field
        ))),
    }
}

/// Coerce a number or a signed string of up to three digits to an integer
/// in `min..=max`.
///
/// `min` must be less than `max`. An absent field yields `default`, which is
/// not range checked; without a default the field is required.
pub fn string_to_valid_integer(
    msg: &Message,
    field: &str,
    min: i64,
    max: i64,
    meaning: &str,
    default: Option<i64>,
) -> Result<i64> {
    if min >= max {
        return Err(Error::InvalidInput(format!(
            "{} max must be greater then min",
            meaning
        )));
    }

    if !is_valid_property(msg, &[field]) {
        return default.ok_or_else(|| missing(field, meaning));
    }

    let value = match msg.get(field) {
        Some(Value::Number(number)) => integral(number).ok_or_else(|| {
            Error::InvalidInput(format!("{} (msg.{}) is not integer", meaning, field))
        })?,
        Some(Value::String(text)) => {
            if !patterns::SIGNED_3_DIGITS.is_match(text) {
                return Err(Error::InvalidInput(format!(
                    "{} (msg.{} >>{}) is not 3 signed digits only",
                    meaning, field, text
                )));
            }
            text.parse::<i64>().map_err(|_| {
                Error::InvalidInput(format!(
                    "{} (msg.{} >>{}) is not 3 signed digits only",
                    meaning, field, text
                ))
            })?
        }
        _ => {
            return Err(Error::InvalidInput(format!(
                "{} (msg.{}) is not type string/number",
                meaning, field
            )))
        }
    };

    if !(min..=max).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} (msg.{} >>{}) is out of range",
            meaning, field, value
        )));
    }
    Ok(value)
}

/// Integral value of a JSON number; `5.0` counts, `5.5` does not.
fn integral(number: &serde_json::Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Require a string field matching `regex`.
///
/// An absent field yields `default`; without a default the field is required.
pub fn string_valid_regex(
    msg: &Message,
    field: &str,
    regex: &Regex,
    meaning: &str,
    default: Option<&str>,
) -> Result<String> {
    if !is_valid_property(msg, &[field]) {
        return default
            .map(str::to_string)
            .ok_or_else(|| missing(field, meaning));
    }

    let value = match msg.get(field) {
        Some(Value::String(value)) => value,
        _ => {
            return Err(Error::InvalidInput(format!(
                "{} ({}) is not type string",
                meaning, field
            )))
        }
    };

    if !regex.is_match(value) {
        return Err(Error::InvalidInput(format!(
            "{} ({} >>{}) has wrong syntax - Regular expression- see documentation",
            meaning, field, value
        )));
    }
    Ok(value.clone())
}

/// Optional boolean field, `default` when absent.
pub fn optional_bool(msg: &Message, field: &str, meaning: &str, default: bool) -> Result<bool> {
    if !is_valid_property(msg, &[field]) {
        return Ok(default);
    }
    msg.get(field).and_then(Value::as_bool).ok_or_else(|| {
        Error::InvalidInput(format!("{} (msg.{}) is not boolean", meaning, field))
    })
}

/// Milliseconds of a `hh:mm:ss` string.
///
/// No bounds are checked; validate the format with [`patterns::TIME`] first.
/// Non-numeric parts count as zero.
pub fn hhmmss_to_msec(hhmmss: &str) -> u64 {
    let mut parts = hhmmss
        .split(':')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0));
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    let seconds = parts.next().unwrap_or(0);
    (hours * 3600 + minutes * 60 + seconds) * 1000
}

/// Common optional fields of a request, defaulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedGroupProperties {
    /// Target player, `""` for the node's own player
    pub player_name: String,
    /// New volume in `0..=100`, `-1` to leave volumes alone
    pub volume: i64,
    /// Apply the volume to every group member, not only the addressed one
    pub same_volume: bool,
    /// Clear the queue before adding to it
    pub clear_queue: bool,
}

impl ValidatedGroupProperties {
    /// The volume to set, if any
    pub fn volume(&self) -> Option<u16> {
        u16::try_from(self.volume).ok()
    }
}

/// Validate `playerName`, `volume`, `sameVolume` and `clearQueue`.
///
/// `sameVolume: true` without a volume is rejected as contradictory.
pub fn validated_group_properties(msg: &Message) -> Result<ValidatedGroupProperties> {
    let player_name =
        string_valid_regex(msg, "playerName", &patterns::ANY_CHAR, "player name", Some(""))?;
    let volume = string_to_valid_integer(msg, "volume", 0, 100, "volume", Some(-1))?;

    let mut same_volume = true;
    if is_valid_property(msg, &["sameVolume"]) {
        same_volume = msg
            .get("sameVolume")
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                Error::InvalidInput("sameVolume (msg.sameVolume) is not boolean".to_string())
            })?;
        if volume == -1 && same_volume {
            return Err(Error::InvalidInput(
                "sameVolume (msg.sameVolume) is true but msg.volume is not specified".to_string(),
            ));
        }
    }

    let clear_queue = optional_bool(msg, "clearQueue", "clearQueue", true)?;

    Ok(ValidatedGroupProperties {
        player_name,
        volume,
        same_volume,
        clear_queue,
    })
}
