//! ContentDirectory service for browsing the queue and Sonos playlists

pub mod operations;

pub use operations::*;
