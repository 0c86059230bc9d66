//! Service modules with typed UPnP operations
//!
//! Each service module declares its operations with the macros in
//! [`crate::operation::macros`] and re-exports short convenience functions
//! (`av_transport::play`, `rendering_control::set_volume`, ...).

pub mod av_transport;
pub mod content_directory;
pub mod device_properties;
pub mod group_rendering_control;
pub mod rendering_control;
