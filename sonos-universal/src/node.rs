//! The message-driven node
//!
//! A [`UniversalNode`] is bound to one player at setup. Each inbound message
//! runs through `Received -> CommandResolved -> Validated -> TopologyResolved
//! -> ActionsExecuted -> ResultShaped` and ends in an [`Outcome`]: the
//! outbound message with a green status, or a classified failure with a red
//! status and nothing sent on.

use crate::commands::{self, CommandContext};
use crate::config::UniversalConfig;
use crate::discovery::PlayerScanner;
use crate::error::{Error, Result};
use crate::message::{self, Fragment, Message};
use crate::report::{self, Failure, Status};
use crate::topology::PlayerAddress;
use crate::validation::is_valid_property_not_empty_string;
use serde_json::Value;
use sonos_api::SonosActions;
use std::time::Duration;
use tracing::{debug, info};

/// Field the resolved command is stored in, since get commands in
/// compatibility mode overwrite the command field with their result
pub const COMMAND_RECORD_FIELD: &str = "universalCmd";

/// Reported as the command when a message fails before one is resolved
const UNRESOLVED_COMMAND: &str = "processing input msg";

/// Result of processing one message
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command ran; `message` goes on downstream
    Sent { message: Message, status: Status },
    /// The command failed; nothing goes downstream
    Failed { failure: Failure, status: Status },
}

impl Outcome {
    pub fn status(&self) -> &Status {
        match self {
            Outcome::Sent { status, .. } | Outcome::Failed { status, .. } => status,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Outcome::Sent { .. })
    }
}

pub struct UniversalNode {
    config: UniversalConfig,
    anchor: PlayerAddress,
    actions: Box<dyn SonosActions>,
    delay: fn(Duration),
}

impl UniversalNode {
    /// Resolve the configured player and bind a node to it.
    pub fn setup(
        config: UniversalConfig,
        scanner: &dyn PlayerScanner,
        actions: Box<dyn SonosActions>,
    ) -> Result<Self> {
        let anchor = config.resolve_address(scanner)?;
        debug!(player = %anchor.base_url(), "node bound to player");
        Ok(Self::with_anchor(config, anchor, actions))
    }

    /// Bind a node to a known player address.
    pub fn with_anchor(
        config: UniversalConfig,
        anchor: PlayerAddress,
        actions: Box<dyn SonosActions>,
    ) -> Self {
        Self {
            config,
            anchor,
            actions,
            delay: std::thread::sleep,
        }
    }

    /// Replace the blocking wait used between actions.
    pub fn with_delay(mut self, delay: fn(Duration)) -> Self {
        self.delay = delay;
        self
    }

    pub fn anchor(&self) -> &PlayerAddress {
        &self.anchor
    }

    pub fn config(&self) -> &UniversalConfig {
        &self.config
    }

    /// Run the command a message asks for.
    pub fn process(&self, mut msg: Message) -> Outcome {
        debug!("node - msg received");
        match self.dispatch(&mut msg) {
            Ok(fragment) => {
                message::merge(&mut msg, fragment);
                let command = recorded_command(&msg).unwrap_or(UNRESOLVED_COMMAND).to_string();
                info!(command = %command, "command succeeded");
                Outcome::Sent {
                    status: report::success(&command),
                    message: msg,
                }
            }
            Err(err) => {
                let command = recorded_command(&msg).unwrap_or(UNRESOLVED_COMMAND);
                let (failure, status) = report::failure(command, &err);
                Outcome::Failed { failure, status }
            }
        }
    }

    fn dispatch(&self, msg: &mut Message) -> Result<Fragment> {
        let (command_field, value_field) = self.config.field_names();

        let raw = if self.config.command_from_message() {
            if !is_valid_property_not_empty_string(msg, &[command_field]) {
                return Err(Error::MissingField("command is undefined/invalid".to_string()));
            }
            match &msg[command_field] {
                Value::String(command) => command.clone(),
                other => other.to_string(),
            }
        } else {
            self.config.command.clone()
        };
        let command = commands::resolve_command(&raw);

        msg.insert(COMMAND_RECORD_FIELD.to_string(), Value::String(command.clone()));
        msg.insert(command_field.to_string(), Value::String(command.clone()));

        if let Some(state) = self.config.state.as_ref().filter(|state| is_usable_state(state)) {
            msg.insert(value_field.to_string(), state.clone());
        }

        let handler = commands::lookup(&command)
            .ok_or_else(|| Error::UnknownCommand(format!("command is invalid >>{} ", command)))?;

        debug!(command = %command, player = %self.anchor.base_url(), "dispatching");
        let ctx = CommandContext {
            actions: self.actions.as_ref(),
            anchor: &self.anchor,
            command: &command,
            value_field,
            command_field,
            delay: self.delay,
        };
        handler(&ctx, msg)
    }
}

fn recorded_command(msg: &Message) -> Option<&str> {
    msg.get(COMMAND_RECORD_FIELD).and_then(Value::as_str)
}

/// A configured state overrides the message value only when it is a
/// non-empty string, a number or a boolean.
fn is_usable_state(state: &Value) -> bool {
    match state {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) | Value::Bool(_) => true,
        _ => false,
    }
}
