//! Connector configuration.
//!
//! Read from environment variables, or from any key lookup in tests.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chains::ChainId;
use crate::connectors::OreIdConnectorArgs;
use crate::error::{ConnectorError, Result};
use crate::resolution::ResolutionPolicy;
use crate::types::{AuthProvider, OreIdOptions};

/// ORE ID application identifier (required).
pub const ENV_APP_ID: &str = "OREID_APP_ID";

/// Login provider name, e.g. `google`.
pub const ENV_AUTH_PROVIDER: &str = "OREID_AUTH_PROVIDER";

/// Comma separated chain ids, e.g. `1,5,137`.
pub const ENV_SUPPORTED_CHAIN_IDS: &str = "OREID_SUPPORTED_CHAIN_IDS";

/// `constrained` or `naive`.
pub const ENV_RESOLUTION_POLICY: &str = "OREID_RESOLUTION_POLICY";

/// Popup transport plugin name.
pub const ENV_POPUP_PLUGIN: &str = "OREID_POPUP_PLUGIN";

pub const DEFAULT_POPUP_PLUGIN: &str = "web_popup";

/// Named resolution policy preset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Constrained,
    Naive,
}

impl PolicyKind {
    pub fn to_policy(self) -> ResolutionPolicy {
        match self {
            PolicyKind::Constrained => ResolutionPolicy::constrained(),
            PolicyKind::Naive => ResolutionPolicy::naive(),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constrained" => Ok(PolicyKind::Constrained),
            "naive" => Ok(PolicyKind::Naive),
            other => Err(ConnectorError::Config(format!("Unknown resolution policy: {}", other))),
        }
    }
}

/// Everything needed to build an ORE ID connector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnectorConfig")]
pub struct ConnectorConfig {
    pub app_id: String,
    pub auth_provider: AuthProvider,
    pub supported_chain_ids: Vec<ChainId>,
    pub policy: PolicyKind,
    pub popup_plugin: String,
}

/// Deserialized form, checked by [`ConnectorConfig::validate`].
#[derive(Deserialize)]
struct RawConnectorConfig {
    app_id: String,
    #[serde(default = "default_auth_provider")]
    auth_provider: AuthProvider,
    #[serde(default = "default_supported_chain_ids")]
    supported_chain_ids: Vec<ChainId>,
    #[serde(default)]
    policy: PolicyKind,
    #[serde(default = "default_popup_plugin")]
    popup_plugin: String,
}

impl TryFrom<RawConnectorConfig> for ConnectorConfig {
    type Error = ConnectorError;

    fn try_from(raw: RawConnectorConfig) -> Result<Self> {
        let config = Self {
            app_id: raw.app_id,
            auth_provider: raw.auth_provider,
            supported_chain_ids: raw.supported_chain_ids,
            policy: raw.policy,
            popup_plugin: raw.popup_plugin,
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_auth_provider() -> AuthProvider {
    AuthProvider::Google
}

fn default_supported_chain_ids() -> Vec<ChainId> {
    vec![ChainId::GOERLI]
}

fn default_popup_plugin() -> String {
    DEFAULT_POPUP_PLUGIN.into()
}

impl ConnectorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset and blank values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = get(ENV_APP_ID)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| ConnectorError::Config(format!("{} not set", ENV_APP_ID)))?;

        let auth_provider = match get(ENV_AUTH_PROVIDER) {
            Some(v) => v.parse()?,
            None => default_auth_provider(),
        };

        let supported_chain_ids = match get(ENV_SUPPORTED_CHAIN_IDS) {
            Some(v) => parse_chain_ids(&v)?,
            None => default_supported_chain_ids(),
        };

        let policy = match get(ENV_RESOLUTION_POLICY) {
            Some(v) => v.parse()?,
            None => PolicyKind::default(),
        };

        let popup_plugin = get(ENV_POPUP_PLUGIN)
            .map(|v| v.trim().to_string())
            .unwrap_or_else(default_popup_plugin);

        let config = Self {
            app_id,
            auth_provider,
            supported_chain_ids,
            policy,
            popup_plugin,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no connector could activate with.
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(ConnectorError::Config(format!("{} not set", ENV_APP_ID)));
        }
        if self.supported_chain_ids.is_empty() {
            return Err(ConnectorError::Config(
                "At least one supported chain id is required".into(),
            ));
        }
        Ok(())
    }

    pub fn oreid_options(&self) -> OreIdOptions {
        OreIdOptions::new(self.app_id.clone()).with_popup(self.popup_plugin.clone())
    }

    pub fn connector_args(&self) -> OreIdConnectorArgs {
        OreIdConnectorArgs::new(
            self.oreid_options(),
            self.auth_provider,
            self.supported_chain_ids.iter().copied(),
        )
        .with_policy(self.policy.to_policy())
    }
}

/// Parse a comma separated list of positive chain ids.
pub fn parse_chain_ids(list: &str) -> Result<Vec<ChainId>> {
    let ids = list
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let raw: u64 = part
                .parse()
                .map_err(|_| ConnectorError::Config(format!("Invalid chain id: {}", part)))?;
            ChainId::try_from(raw).map_err(|e| ConnectorError::Config(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    if ids.is_empty() {
        return Err(ConnectorError::Config(
            "At least one supported chain id is required".into(),
        ));
    }
    Ok(ids)
}
