//! AVTransport service for playback control, the queue and group coordination
//!
//! ```rust,ignore
//! use sonos_api::services::av_transport;
//!
//! av_transport::play(&client, "http://192.168.1.100:1400", "1".to_string())?;
//! let info = av_transport::get_transport_info(&client, "http://192.168.1.100:1400")?;
//! ```

pub mod operations;

pub use operations::*;
