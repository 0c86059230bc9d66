//! GroupRenderingControl service for group-wide volume and mute
//!
//! Only the group coordinator answers these actions; addressing a joiner
//! yields a SOAP fault.

pub mod operations;

pub use operations::*;
