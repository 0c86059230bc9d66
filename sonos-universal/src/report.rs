//! Turning command outcomes into a status line and a log entry
//!
//! Every failure is reduced to a short label for display and a detail string
//! for the log. Classification never fails itself.

use crate::error::Error;
use serde::Serialize;
use sonos_api::ApiError;
use tracing::{debug, error};

/// UPnP error codes and their meaning, device and AVTransport ranges
const UPNP_ERROR_CODES: &[(u16, &str)] = &[
    (401, "Invalid action"),
    (402, "Invalid arguments"),
    (404, "Invalid var"),
    (501, "Action failed"),
    (600, "Argument value invalid"),
    (601, "Argument value out of range"),
    (602, "Optional action not implemented"),
    (603, "Out of memory"),
    (604, "Human intervention required"),
    (605, "String argument too long"),
    (606, "Action not authorized"),
    (607, "Signature failure"),
    (608, "Signature missing"),
    (609, "Not encrypted"),
    (610, "Invalid sequence"),
    (611, "Invalid control URL"),
    (612, "No such session"),
    (701, "Transition not available"),
    (702, "No contents"),
    (703, "Read error"),
    (704, "Format not supported for playback"),
    (705, "Transport is locked"),
    (706, "Write error"),
    (707, "Media is protected or not writable"),
    (708, "Format not supported for recording"),
    (709, "Media is full"),
    (710, "Seek mode not supported"),
    (711, "Illegal seek target"),
    (712, "Play mode not supported"),
    (713, "Record quality not supported"),
    (714, "Illegal MIME-Type"),
    (715, "Content busy"),
    (716, "Resource not found"),
    (717, "Play speed not supported"),
    (718, "Invalid InstanceID"),
];

/// Text of a UPnP error code, `unknown error` for codes not in the table.
pub fn upnp_error_text(code: u16) -> &'static str {
    UPNP_ERROR_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
        .unwrap_or("unknown error")
}

/// A classified failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Shown in the status line
    pub short: String,
    /// Logged next to `short`
    pub details: String,
}

impl Failure {
    fn new(short: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            details: details.into(),
        }
    }
}

/// Reduce an error to a short label and details.
pub fn classify(err: &Error) -> Failure {
    if let Some(own) = err.own_message() {
        return Failure::new(own, "none");
    }

    match err {
        Error::Api(ApiError::ConnectionRefused(_)) => {
            Failure::new("Player refused to connect", "Validate players ip address")
        }
        Error::Api(ApiError::HostUnreachable(_)) => Failure::new(
            "Player is unreachable",
            "Validate players ip address / power on",
        ),
        Error::Api(ApiError::Timeout(_)) => Failure::new(
            "Request timed out",
            "Validate players IP address / power on",
        ),
        Error::Api(ApiError::SoapFault(code)) => Failure::new(
            format!("statusCode 500 & upnpError {}", code),
            upnp_error_text(*code),
        ),
        other => Failure::new(other.to_string(), format!("{:?}", other)),
    }
}

/// Colour of the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    Green,
    Red,
}

/// What a host shows next to the node after each message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub fill: Fill,
    pub shape: &'static str,
    pub text: String,
}

/// Status after a successful command.
pub fn success(command: &str) -> Status {
    debug!("OK: {}", command);
    Status {
        fill: Fill::Green,
        shape: "dot",
        text: format!("ok:{}", command),
    }
}

/// Log the failure of `command` and build its status.
pub fn failure(command: &str, err: &Error) -> (Failure, Status) {
    let failure = classify(err);
    error!(command, details = %failure.details, "{}:{}", command, failure.short);

    let status = Status {
        fill: Fill::Red,
        shape: "dot",
        text: format!("error: {} - {}", command, failure.short),
    };
    (failure, status)
}
