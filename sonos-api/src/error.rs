use soap_client::SoapError;
use sonos_discovery::DiscoveryError;
use sonos_parser::ParseError;
use thiserror::Error;

/// High-level API errors for Sonos operations
///
/// Transport failures keep their kind (refused, unreachable, timed out) so
/// callers can give specific advice; SOAP faults keep the UPnP error code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error without a more specific kind
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The player refused the TCP connection
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// No route to the player
    #[error("Host unreachable: {0}")]
    HostUnreachable(String),

    /// The request timed out
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Response parsing error
    ///
    /// The player answered but the content (SOAP envelope, embedded XML,
    /// output argument) could not be read as expected.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SOAP fault returned by the player, carrying the UPnP error code
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// Invalid parameter value, rejected before anything is sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Device-specific problem, e.g. an unexpected device description
    #[error("Device error: {0}")]
    DeviceError(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::NetworkError(msg),
            SoapError::ConnectionRefused(msg) => ApiError::ConnectionRefused(msg),
            SoapError::HostUnreachable(msg) => ApiError::HostUnreachable(msg),
            SoapError::Timeout(msg) => ApiError::Timeout(msg),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(error: ParseError) -> Self {
        ApiError::ParseError(error.to_string())
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(error: DiscoveryError) -> Self {
        match error {
            DiscoveryError::NetworkError(msg) => ApiError::NetworkError(msg),
            DiscoveryError::Timeout => ApiError::Timeout("device description".to_string()),
            DiscoveryError::ParseError(msg) => ApiError::ParseError(msg),
            other @ DiscoveryError::HttpStatus { .. } => ApiError::DeviceError(other.to_string()),
            DiscoveryError::InvalidDevice(msg) => ApiError::DeviceError(msg),
        }
    }
}

impl From<crate::operation::ValidationError> for ApiError {
    fn from(error: crate::operation::ValidationError) -> Self {
        ApiError::InvalidParameter(error.to_string())
    }
}
