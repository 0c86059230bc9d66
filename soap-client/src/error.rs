//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// Network or HTTP communication error that has no more specific kind
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The player actively refused the TCP connection
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// No route to the player
    #[error("Host unreachable: {0}")]
    HostUnreachable(String),

    /// Connect or read timeout elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// SOAP fault returned by the player, carrying the UPnP error code
    #[error("SOAP fault: error code {0}")]
    Fault(u16),
}

impl SoapError {
    /// Classify a low-level I/O error by its kind and message.
    pub(crate) fn from_io(error: &std::io::Error, context: String) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::ConnectionRefused => SoapError::ConnectionRefused(context),
            ErrorKind::TimedOut | ErrorKind::WouldBlock => SoapError::Timeout(context),
            _ => {
                let text = error.to_string().to_lowercase();
                if text.contains("unreachable") || text.contains("no route to host") {
                    SoapError::HostUnreachable(context)
                } else {
                    SoapError::Network(context)
                }
            }
        }
    }
}
