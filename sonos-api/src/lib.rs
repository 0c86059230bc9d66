//! High-level Sonos API for device control
//!
//! This crate is the action boundary the rest of the workspace is built on.
//! It uses the private `soap-client` crate for low-level SOAP communication
//! and `sonos-discovery` for device descriptions.
//!
//! # Executing actions
//!
//! Everything goes through the [`SonosActions`] trait. [`SonosClient`] is the
//! network implementation; tests substitute a recorder.
//!
//! ```rust,no_run
//! use sonos_api::{SonosActions, SonosClient};
//! use sonos_api::services::{av_transport, group_rendering_control};
//!
//! let client = SonosClient::new();
//! let base_url = "http://192.168.1.100:1400";
//!
//! // typed operations
//! av_transport::play(&client, base_url, "1".to_string())?;
//! let volume = group_rendering_control::get_group_volume(&client, base_url)?;
//!
//! // raw action, output arguments in player order
//! let response = client.execute_action(
//!     base_url,
//!     "/MediaRenderer/AVTransport/Control",
//!     "GetTransportInfo",
//!     &[("InstanceID".to_string(), "0".to_string())],
//! )?;
//! # Ok::<(), sonos_api::ApiError>(())
//! ```

pub mod action;
pub mod client;
pub mod error;
pub mod operation;
pub mod service;
pub mod services;

pub use action::{ActionResponse, SonosActions};
pub use client::SonosClient;
pub use error::{ApiError, Result};
pub use operation::{SonosOperation, Validate, ValidationError};
pub use service::{Service, ServiceInfo};

pub use sonos_discovery::DeviceDescription;
pub use sonos_parser::{ZoneGroup, ZoneGroupMember, ZoneGroupState};
