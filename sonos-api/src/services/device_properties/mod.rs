//! DeviceProperties service: LED state and stereo pair bonding

pub mod operations;

pub use operations::*;
