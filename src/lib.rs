//! # oreid-connector
//!
//! Wallet connector for the ORE ID identity SDK.
//!
//! ORE ID signs users in through a social-login popup and keeps custody of
//! their keys. This crate exposes it behind the same connector contract a
//! dapp front end uses for any other wallet: activate, read the account and
//! chain id, get an EIP-1193 provider, deactivate.
//!
//! ## Features
//!
//! - **Lazy Session**: the SDK handle is built and initialized on first activation
//! - **Popup Auth**: login goes through a pluggable [`sdk::IdentitySdk`]
//! - **Account Resolution**: custodial accounts filtered, chain support enforced
//! - **Connector Registry**: connectors selected at runtime by name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oreid_connector::{
//!     AuthProvider, ChainAccountRecord, ChainId, Connector, OreIdConnector,
//!     OreIdConnectorArgs, OreIdOptions, ScriptedSdkFactory,
//! };
//!
//! # async fn run() -> oreid_connector::Result<()> {
//! let factory = ScriptedSdkFactory::with_chain_accounts(vec![
//!     ChainAccountRecord::new("0x5b38da6a701c568545dcfcb03fcb875f56beddc4", "eth_goerli"),
//! ]);
//! let connector = OreIdConnector::new(
//!     Arc::new(factory),
//!     OreIdConnectorArgs::new(OreIdOptions::new("t_app"), AuthProvider::Google, [ChainId::GOERLI]),
//! );
//!
//! let update = connector.activate().await?;
//! assert_eq!(update.chain_id, ChainId::GOERLI);
//! connector.deactivate().await?;
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod chains;
pub mod config;
pub mod connectors;
pub mod error;
pub mod provider;
pub mod registry;
pub mod resolution;
pub mod sdk;
pub mod types;

// Re-export connector surface
pub use connectors::{Connector, OreIdConnector, OreIdConnectorArgs, SessionState, ORE_ID_CONNECTOR_NAME};
pub use registry::ConnectorRegistry;
pub use provider::{Eip1193, OreIdProvider, ProviderError, RequestArguments};
pub use sdk::{IdentitySdk, IdentitySdkFactory, ScriptedSdkFactory};

// Re-export chain mapping and resolution
pub use chains::{chain_id_for_network, ChainId};
pub use resolution::{resolve_active_account, ResolutionPolicy};

// Re-export types
pub use config::ConnectorConfig;
pub use error::{ConnectorError, Result, SdkError};
pub use types::{AuthProvider, ChainAccountRecord, ConnectorUpdate, OreIdOptions, Permission, UserData};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
