//! Shared parsing utilities and data structures
//!
//! - [`xml_decode`]: namespace stripping and serde helpers
//! - [`didl`]: DIDL-Lite structures for queues, playlists and track metadata

pub mod didl;
pub mod xml_decode;

pub use didl::{DidlLite, DidlObject, DidlResource};
