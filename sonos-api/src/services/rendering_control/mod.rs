//! RenderingControl service for per-player volume, mute, loudness and EQ

pub mod operations;

pub use operations::*;
