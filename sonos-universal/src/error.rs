use sonos_api::ApiError;
use sonos_discovery::DiscoveryError;
use thiserror::Error;

/// Prefix of every error raised by this crate itself
///
/// The reporting layer uses it to tell our own errors apart from transport
/// and player failures, and strips it before display.
pub const PACKAGE_PREFIX: &str = "sonos-universal: ";

/// Errors of command processing
#[derive(Debug, Error)]
pub enum Error {
    /// A required message field is absent
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    MissingField(String),

    /// A message field has the wrong type or fails its pattern or range
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    InvalidInput(String),

    /// No player of that name in the household
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    PlayerNotFound(String),

    /// The addressed player is not part of any group
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    GroupNotFound(String),

    /// Inputs are fine but the players are not in a state the command needs
    /// (empty queue, standalone player, missing TV input, ...)
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    InvalidState(String),

    /// The command is not in the command table
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    UnknownCommand(String),

    /// Discovery finished cleanly without finding the player
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    DiscoveryNotFound(String),

    /// Node configuration could not be used
    #[error("{}{}", PACKAGE_PREFIX, .0)]
    Config(String),

    /// An action against a player failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The discovery transport failed
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl Error {
    /// Message of an error raised by this crate, without the package prefix
    ///
    /// Returns `None` for wrapped player, transport and discovery errors.
    pub fn own_message(&self) -> Option<&str> {
        match self {
            Error::MissingField(msg)
            | Error::InvalidInput(msg)
            | Error::PlayerNotFound(msg)
            | Error::GroupNotFound(msg)
            | Error::InvalidState(msg)
            | Error::UnknownCommand(msg)
            | Error::DiscoveryNotFound(msg)
            | Error::Config(msg) => Some(msg),
            Error::Api(_) | Error::Discovery(_) => None,
        }
    }
}

/// Type alias for results of command processing
pub type Result<T> = std::result::Result<T, Error>;
