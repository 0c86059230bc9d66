//! Message-driven control of Sonos households
//!
//! One node is bound to one player. Each inbound JSON message names a command
//! (`group.play`, `player.set.volume`, `household.create.group`, ...) and its
//! arguments; the node resolves the household topology, runs the UPnP actions
//! the command needs and merges the result into the outbound message.
//!
//! # Architecture
//!
//! ```text
//! message → node → command table → handler → SonosActions → player
//!                                     ↓
//!                  validation / topology / media helpers
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use serde_json::json;
//! use sonos_api::SonosClient;
//! use sonos_universal::{message, SsdpScanner, UniversalConfig, UniversalNode, Outcome};
//!
//! let config = UniversalConfig::with_ip("192.168.178.35");
//! let node = UniversalNode::setup(config, &SsdpScanner, Box::new(SonosClient::new()))?;
//!
//! let msg = message::from_value(json!({ "topic": "group.get.volume", "playerName": "Kitchen" }))?;
//! match node.process(msg) {
//!     Outcome::Sent { message, .. } => println!("volume: {}", message["payload"]),
//!     Outcome::Failed { status, .. } => eprintln!("{}", status.text),
//! }
//! # Ok::<(), sonos_universal::Error>(())
//! ```

pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod message;
pub mod node;
pub mod report;
pub mod topology;
pub mod validation;

pub use config::UniversalConfig;
pub use discovery::{PlayerChoice, PlayerScanner, SsdpScanner};
pub use error::{Error, Result};
pub use logging::{init_logging, init_logging_from_env, LoggingMode};
pub use message::{Fragment, Message};
pub use node::{Outcome, UniversalNode};
pub use report::{Failure, Status};
pub use topology::{GroupMember, GroupSnapshot, PlayerAddress};
