//! Data types shared between the identity SDK seam and the connector.
//!
//! Records coming from the SDK deserialize from its camelCase JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chains::{chain_id_for_network, ChainId};
use crate::error::ConnectorError;

/// Custody descriptor attached to a chain account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// The private key lives outside ORE ID custody.
    #[serde(default)]
    pub private_key_stored_externally: bool,
}

/// One blockchain address held by the authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAccountRecord {
    pub chain_account: String,
    pub chain_network: String,
    #[serde(default)]
    pub default_permission: Permission,
}

impl ChainAccountRecord {
    pub fn new(chain_account: impl Into<String>, chain_network: impl Into<String>) -> Self {
        Self {
            chain_account: chain_account.into(),
            chain_network: chain_network.into(),
            default_permission: Permission::default(),
        }
    }

    pub fn with_external_key(mut self, stored_externally: bool) -> Self {
        self.default_permission.private_key_stored_externally = stored_externally;
        self
    }

    /// Chain id of this record's network, if mapped.
    pub fn chain_id(&self) -> Option<ChainId> {
        chain_id_for_network(&self.chain_network)
    }
}

/// User record returned by the identity SDK after authentication.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// In SDK order; resolution never re-sorts.
    #[serde(default)]
    pub chain_accounts: Vec<ChainAccountRecord>,
}

impl UserData {
    pub fn with_chain_accounts(chain_accounts: Vec<ChainAccountRecord>) -> Self {
        Self {
            chain_accounts,
            ..Self::default()
        }
    }
}

/// Result of a successful activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorUpdate {
    pub account: String,
    pub chain_id: ChainId,
}

/// Login provider shown in the ORE ID popup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Apple,
    Discord,
    Email,
    Facebook,
    Github,
    Google,
    Kakao,
    Line,
    Linkedin,
    Phone,
    Twitch,
    Twitter,
}

impl AuthProvider {
    pub const ALL: [AuthProvider; 12] = [
        AuthProvider::Apple,
        AuthProvider::Discord,
        AuthProvider::Email,
        AuthProvider::Facebook,
        AuthProvider::Github,
        AuthProvider::Google,
        AuthProvider::Kakao,
        AuthProvider::Line,
        AuthProvider::Linkedin,
        AuthProvider::Phone,
        AuthProvider::Twitch,
        AuthProvider::Twitter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Apple => "apple",
            AuthProvider::Discord => "discord",
            AuthProvider::Email => "email",
            AuthProvider::Facebook => "facebook",
            AuthProvider::Github => "github",
            AuthProvider::Google => "google",
            AuthProvider::Kakao => "kakao",
            AuthProvider::Line => "line",
            AuthProvider::Linkedin => "linkedin",
            AuthProvider::Phone => "phone",
            AuthProvider::Twitch => "twitch",
            AuthProvider::Twitter => "twitter",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConnectorError::Config(format!("Unknown auth provider: {}", s)))
    }
}

/// Plugins handed to the SDK at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSet {
    /// Popup transport plugin name (e.g. `web_popup`).
    #[serde(default)]
    pub popup: Option<String>,
}

/// Options bundle used to construct the identity SDK.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreIdOptions {
    pub app_id: String,
    #[serde(default)]
    pub plugins: PluginSet,
}

impl OreIdOptions {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            plugins: PluginSet::default(),
        }
    }

    pub fn with_popup(mut self, plugin: impl Into<String>) -> Self {
        self.plugins.popup = Some(plugin.into());
        self
    }
}
