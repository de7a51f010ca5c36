//! Error types for connector operations.
//!
//! Every public connector operation returns [`ConnectorError`]. Identity SDK
//! implementations report failures through [`SdkError`], which the connector
//! wraps according to the phase the failure happened in.

use thiserror::Error;

use crate::chains::ChainId;

/// Failures reported by an identity SDK implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("Popup closed before authentication completed")]
    PopupClosed,
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors that can occur during connector operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// No session handle exists yet; call `activate` first.
    #[error("OreId connector is not activated")]
    NotActivated,
    /// A session handle exists but popup authentication has not succeeded.
    #[error("OreId session is not authenticated")]
    NotAuthenticated,
    /// Every chain account is custodial (naive resolution).
    #[error("No active user found")]
    NoActiveAccount,
    /// No chain account satisfies the custody and chain-support predicates.
    #[error("No chain account on a supported chain (supported: {supported:?})")]
    UnsupportedChain { supported: Vec<ChainId> },
    #[error("Identity SDK initialization failed: {0}")]
    SdkInitialization(SdkError),
    #[error("Authentication failed: {0}")]
    Authentication(SdkError),
    /// The selected account's network has no chain id mapping.
    #[error("Unknown chain network: {0}")]
    UnknownNetworkMapping(String),
    #[error("Identity SDK call failed: {0}")]
    Sdk(SdkError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;
