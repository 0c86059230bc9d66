//! Typed operations over the action boundary
//!
//! Each UPnP action the workspace uses is declared once with the macros in
//! [`macros`]. A declaration yields a request struct, a [`SonosOperation`]
//! impl that turns the request into ordered SOAP arguments and reads the
//! typed response back, and a convenience function taking
//! `(&dyn SonosActions, base_url, fields...)`.

pub mod macros;

use crate::action::{ActionResponse, SonosActions};
use crate::error::{ApiError, Result};
use crate::service::Service;

/// Base trait for all typed Sonos operations
pub trait SonosOperation {
    /// The request type for this operation
    type Request: Validate;

    /// The typed response
    type Response;

    /// The UPnP service this operation belongs to
    const SERVICE: Service;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Build the ordered `(name, value)` arguments for the SOAP body
    fn build_args(request: &Self::Request) -> std::result::Result<Vec<(String, String)>, ValidationError>;

    /// Read the typed response from the action's output arguments
    fn parse_response(response: &ActionResponse) -> Result<Self::Response>;
}

/// Validate the request, send it, parse the answer.
pub fn execute<Op: SonosOperation>(
    actions: &dyn SonosActions,
    base_url: &str,
    request: &Op::Request,
) -> Result<Op::Response> {
    let args = Op::build_args(request)?;
    let response = actions.execute_action(base_url, Op::SERVICE.info().endpoint, Op::ACTION, &args)?;
    Op::parse_response(&response)
}

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl std::fmt::Display,
        max: impl std::fmt::Display,
        value: impl std::fmt::Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Request-side checks run before anything is sent.
pub trait Validate {
    fn validate_basic(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

/// Conversion of a request field into its SOAP argument text.
pub trait ActionArg {
    fn to_arg(&self) -> String;
}

impl ActionArg for String {
    fn to_arg(&self) -> String {
        self.clone()
    }
}

impl ActionArg for bool {
    fn to_arg(&self) -> String {
        let text = if *self { "1" } else { "0" };
        text.to_string()
    }
}

macro_rules! numeric_action_arg {
    ($($t:ty),*) => {
        $(impl ActionArg for $t {
            fn to_arg(&self) -> String {
                self.to_string()
            }
        })*
    };
}

numeric_action_arg!(u8, u16, u32, i16, i32);

/// Conversion of an output argument's text into a typed response field.
pub trait FromArg: Sized {
    fn from_arg(name: &str, value: &str) -> Result<Self>;
}

impl FromArg for String {
    fn from_arg(_name: &str, value: &str) -> Result<Self> {
        Ok(value.to_string())
    }
}

impl FromArg for bool {
    fn from_arg(name: &str, value: &str) -> Result<Self> {
        match value {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" => Ok(false),
            other => Err(ApiError::ParseError(format!("{} is not a boolean: {}", name, other))),
        }
    }
}

macro_rules! numeric_from_arg {
    ($($t:ty),*) => {
        $(impl FromArg for $t {
            fn from_arg(name: &str, value: &str) -> Result<Self> {
                value.trim().parse().map_err(|_| {
                    ApiError::ParseError(format!("{} is not a number: {}", name, value))
                })
            }
        })*
    };
}

numeric_from_arg!(u8, u16, u32, i16, i32);
