//! Wallet connector contract.
//!
//! A front end picks one connector at runtime (by name, see
//! [`crate::registry::ConnectorRegistry`]) and drives it through the
//! [`Connector`] trait without knowing which wallet backend sits behind it.

pub mod oreid;

use std::sync::Arc;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::chains::ChainId;
use crate::error::Result;
use crate::provider::Eip1193;
use crate::types::ConnectorUpdate;

pub use oreid::{OreIdConnector, OreIdConnectorArgs, ORE_ID_CONNECTOR_NAME};

/// Lifecycle of a connector's session handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No session handle.
    Uninitialized,
    /// Handle built and initialized, login not completed.
    Initialized,
    /// Popup login succeeded.
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Uninitialized => write!(f, "uninitialized"),
            SessionState::Initialized => write!(f, "initialized"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Generic wallet connector.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Registry key.
    fn name(&self) -> &'static str;

    fn supported_chain_ids(&self) -> Vec<ChainId>;

    async fn state(&self) -> SessionState;

    /// Connect and return the active account with its chain id.
    async fn activate(&self) -> Result<ConnectorUpdate>;

    async fn get_provider(&self) -> Result<Arc<dyn Eip1193>>;

    async fn get_chain_id(&self) -> Result<ChainId>;

    /// `Ok(None)` means a session exists but no account qualifies.
    async fn get_account(&self) -> Result<Option<String>>;

    async fn deactivate(&self) -> Result<()>;
}
