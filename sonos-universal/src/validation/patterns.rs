//! Patterns message fields and configuration are checked against

use regex::Regex;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// `hh:mm:ss`, hours 00 to 19
pub static TIME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(([0-1][0-9]):([0-5][0-9]):([0-5][0-9]))$"));

/// [`TIME`] with an optional sign, for relative seeks
pub static TIME_DELTA: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([-+]?([0-1][0-9]):([0-5][0-9]):([0-5][0-9]))$"));

/// Dotted quad IPv4 address
pub static IP: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])$",
    )
});

pub static HTTP: LazyLock<Regex> = LazyLock::new(|| compile(r"^(http|https)://.+$"));

/// Player serial number as printed on the device, e.g. `00-0E-58-A0-12-34:5`
pub static SERIAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([0-9a-fA-F][0-9a-fA-F]-){5}[0-9a-fA-F][0-9a-fA-F]:"));

/// TuneIn station id, e.g. `s24896`
pub static RADIO_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"^(s[0-9]+)$"));

/// Up to three digits with optional sign
pub static SIGNED_3_DIGITS: LazyLock<Regex> = LazyLock::new(|| compile(r"^[-+]?\d{1,3}$"));

/// At least one character
pub static ANY_CHAR: LazyLock<Regex> = LazyLock::new(|| compile(r".+"));

/// Play modes, any case
pub static QUEUE_MODES: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^(NORMAL|REPEAT_ONE|REPEAT_ALL|SHUFFLE|SHUFFLE_NOREPEAT|SHUFFLE_REPEAT_ONE)$")
});

/// Comma separated player names
pub static PLAYER_LIST: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^[\p{L}0-9]+([: -._]?[\p{L}0-9]+)*(,[\p{L}0-9]+([: -._]?[\p{L}0-9])*)*$")
});

/// Models with a TV input and home theater EQ
pub const PLAYERS_WITH_TV: [&str; 4] = ["Sonos Beam", "Sonos Playbar", "Sonos Playbase", "Sonos Arc"];
