//! EIP-1193 provider surface.
//!
//! Dapps talk to a connected wallet through `request({ method, params })`.
//! The ORE ID provider answers the account and chain queries from the session
//! handle. It has no node connection, so everything else is reported as an
//! unsupported method.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::chains::ChainId;
use crate::error::{ConnectorError, SdkError};
use crate::resolution::{resolve_active_account, select_active_record, ResolutionPolicy};
use crate::sdk::IdentitySdk;

/// JSON-RPC request object passed to [`Eip1193::request`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: None,
        }
    }
}

/// Provider error carrying an EIP-1193 error code.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub const USER_REJECTED: i64 = 4001;
    pub const UNAUTHORIZED: i64 = 4100;
    pub const UNSUPPORTED_METHOD: i64 = 4200;
    pub const DISCONNECTED: i64 = 4900;
    /// Connected, but not to the chain the account lives on.
    pub const CHAIN_DISCONNECTED: i64 = 4901;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unsupported_method(method: &str) -> Self {
        Self::new(Self::UNSUPPORTED_METHOD, format!("Unsupported method: {}", method))
    }
}

impl From<ConnectorError> for ProviderError {
    fn from(err: ConnectorError) -> Self {
        let code = match &err {
            ConnectorError::Authentication(SdkError::PopupClosed) => Self::USER_REJECTED,
            ConnectorError::NotActivated | ConnectorError::NotAuthenticated => Self::UNAUTHORIZED,
            ConnectorError::NoActiveAccount | ConnectorError::UnsupportedChain { .. } => {
                Self::UNAUTHORIZED
            }
            ConnectorError::UnknownNetworkMapping(_) => Self::CHAIN_DISCONNECTED,
            _ => Self::DISCONNECTED,
        };
        Self::new(code, err.to_string())
    }
}

/// Minimal EIP-1193 request interface.
#[async_trait]
pub trait Eip1193: Send + Sync {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError>;
}

/// EIP-1193 view over an ORE ID session handle.
pub struct OreIdProvider {
    sdk: Arc<dyn IdentitySdk>,
    policy: ResolutionPolicy,
    supported: BTreeSet<ChainId>,
}

impl OreIdProvider {
    pub fn new(
        sdk: Arc<dyn IdentitySdk>,
        policy: ResolutionPolicy,
        supported: BTreeSet<ChainId>,
    ) -> Self {
        Self {
            sdk,
            policy,
            supported,
        }
    }

    async fn accounts(&self) -> Result<Vec<String>, ProviderError> {
        let user = self
            .sdk
            .user_data()
            .await
            .map_err(|e| ProviderError::new(ProviderError::DISCONNECTED, e.to_string()))?;
        match select_active_record(&user.chain_accounts, &self.policy, &self.supported) {
            Ok(record) => Ok(vec![record.chain_account.clone()]),
            Err(ConnectorError::NoActiveAccount | ConnectorError::UnsupportedChain { .. }) => {
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let user = self
            .sdk
            .user_data()
            .await
            .map_err(|e| ProviderError::new(ProviderError::DISCONNECTED, e.to_string()))?;
        let update = resolve_active_account(&user.chain_accounts, &self.policy, &self.supported)?;
        Ok(update.chain_id)
    }
}

#[async_trait]
impl Eip1193 for OreIdProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderError> {
        debug!(method = %args.method, "provider request");
        match args.method.as_str() {
            "eth_accounts" => Ok(json!(self.accounts().await?)),
            "eth_requestAccounts" => {
                let accounts = self.accounts().await?;
                if accounts.is_empty() {
                    return Err(ProviderError::new(
                        ProviderError::UNAUTHORIZED,
                        "No account available on a supported chain",
                    ));
                }
                Ok(json!(accounts))
            }
            "eth_chainId" => Ok(json!(self.chain_id().await?.to_hex())),
            "net_version" => Ok(json!(self.chain_id().await?.to_string())),
            other => Err(ProviderError::unsupported_method(other)),
        }
    }
}
