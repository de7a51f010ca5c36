//! ORE ID connector.
//!
//! Lazily builds an identity SDK session, drives the popup login and resolves
//! the user's chain accounts into the single account a dapp sees.
//!
//! # Lifecycle
//!
//! - `activate` builds and initializes the handle once, then runs the popup.
//!   A failed `init()` leaves no handle behind. A failed popup keeps the
//!   initialized handle so `activate` can simply be retried.
//! - `deactivate` logs out and drops the handle; the next `activate` builds a
//!   fresh one.
//! - Concurrent `activate` calls are serialized; later callers reuse the
//!   handle the first one built.
//! - A `deactivate` that lands while the popup is open wins: the pending
//!   `activate` logs the orphaned handle out again and fails with
//!   `NotActivated`.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{Connector, SessionState};
use crate::chains::ChainId;
use crate::error::{ConnectorError, Result};
use crate::provider::{Eip1193, OreIdProvider};
use crate::resolution::{resolve_active_account, select_active_record, ResolutionPolicy};
use crate::sdk::{IdentitySdk, IdentitySdkFactory};
use crate::types::{AuthProvider, ConnectorUpdate, OreIdOptions};

/// Registry key of the ORE ID connector.
pub const ORE_ID_CONNECTOR_NAME: &str = "oreid";

/// Construction arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OreIdConnectorArgs {
    pub oreid_options: OreIdOptions,
    pub auth_provider: AuthProvider,
    pub supported_chain_ids: Vec<ChainId>,
    pub policy: ResolutionPolicy,
}

impl OreIdConnectorArgs {
    /// Arguments with the default (constrained) resolution policy.
    pub fn new(
        oreid_options: OreIdOptions,
        auth_provider: AuthProvider,
        supported_chain_ids: impl IntoIterator<Item = ChainId>,
    ) -> Self {
        Self {
            oreid_options,
            auth_provider,
            supported_chain_ids: supported_chain_ids.into_iter().collect(),
            policy: ResolutionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }
}

struct Session {
    sdk: Arc<dyn IdentitySdk>,
    authenticated: bool,
}

/// Connector backed by the ORE ID identity SDK.
pub struct OreIdConnector {
    factory: Arc<dyn IdentitySdkFactory>,
    oreid_options: OreIdOptions,
    auth_provider: AuthProvider,
    supported_chain_ids: BTreeSet<ChainId>,
    policy: ResolutionPolicy,
    session: RwLock<Option<Session>>,
    // held for the whole of `activate`
    activation: Mutex<()>,
}

impl OreIdConnector {
    pub fn new(factory: Arc<dyn IdentitySdkFactory>, args: OreIdConnectorArgs) -> Self {
        Self {
            factory,
            oreid_options: args.oreid_options,
            auth_provider: args.auth_provider,
            supported_chain_ids: args.supported_chain_ids.into_iter().collect(),
            policy: args.policy,
            session: RwLock::new(None),
            activation: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    pub fn auth_provider(&self) -> AuthProvider {
        self.auth_provider
    }

    /// Existing handle, or a freshly built and initialized one.
    async fn ensure_session(&self) -> Result<Arc<dyn IdentitySdk>> {
        if let Some(session) = self.session.read().await.as_ref() {
            debug!("reusing identity session");
            return Ok(session.sdk.clone());
        }

        debug!(app_id = %self.oreid_options.app_id, "constructing identity session");
        let sdk = self.factory.create(&self.oreid_options).map_err(|e| {
            warn!(error = %e, "identity SDK construction failed");
            ConnectorError::SdkInitialization(e)
        })?;
        sdk.init().await.map_err(|e| {
            warn!(error = %e, "identity SDK initialization failed");
            ConnectorError::SdkInitialization(e)
        })?;

        *self.session.write().await = Some(Session {
            sdk: sdk.clone(),
            authenticated: false,
        });
        debug!(state = %SessionState::Initialized, "session state changed");
        Ok(sdk)
    }

    /// Records the popup outcome. Returns `false` when the stored session no
    /// longer holds `sdk`.
    async fn record_login(&self, sdk: &Arc<dyn IdentitySdk>, authenticated: bool) -> bool {
        let mut session = self.session.write().await;
        match session.as_mut() {
            Some(session) if Arc::ptr_eq(&session.sdk, sdk) => {
                session.authenticated = authenticated;
                true
            }
            _ => false,
        }
    }

    async fn authenticated_sdk(&self) -> Result<Arc<dyn IdentitySdk>> {
        let session = self.session.read().await;
        match session.as_ref() {
            None => Err(ConnectorError::NotActivated),
            Some(session) if !session.authenticated => Err(ConnectorError::NotAuthenticated),
            Some(session) => Ok(session.sdk.clone()),
        }
    }

    async fn resolve(&self, sdk: &Arc<dyn IdentitySdk>) -> Result<ConnectorUpdate> {
        let user = sdk.user_data().await.map_err(ConnectorError::Sdk)?;
        resolve_active_account(&user.chain_accounts, &self.policy, &self.supported_chain_ids)
    }
}

#[async_trait]
impl Connector for OreIdConnector {
    fn name(&self) -> &'static str {
        ORE_ID_CONNECTOR_NAME
    }

    fn supported_chain_ids(&self) -> Vec<ChainId> {
        self.supported_chain_ids.iter().copied().collect()
    }

    async fn state(&self) -> SessionState {
        let session = self.session.read().await;
        match session.as_ref() {
            None => SessionState::Uninitialized,
            Some(session) if session.authenticated => SessionState::Authenticated,
            Some(_) => SessionState::Initialized,
        }
    }

    async fn activate(&self) -> Result<ConnectorUpdate> {
        let _activation = self.activation.lock().await;
        let sdk = self.ensure_session().await?;

        info!(provider = %self.auth_provider, "starting popup authentication");
        if let Err(e) = sdk.popup_auth(self.auth_provider).await {
            warn!(error = %e, "popup authentication failed");
            self.record_login(&sdk, false).await;
            return Err(ConnectorError::Authentication(e));
        }
        if !self.record_login(&sdk, true).await {
            warn!("connector deactivated during popup authentication");
            if let Err(e) = sdk.logout().await {
                warn!(error = %e, "logout of detached identity session failed");
            }
            return Err(ConnectorError::NotActivated);
        }
        debug!(state = %SessionState::Authenticated, "session state changed");

        let update = self.resolve(&sdk).await?;
        info!(account = %update.account, chain_id = %update.chain_id, "connector activated");
        Ok(update)
    }

    async fn get_provider(&self) -> Result<Arc<dyn Eip1193>> {
        let sdk = match self.session.read().await.as_ref() {
            Some(session) => session.sdk.clone(),
            None => return Err(ConnectorError::NotActivated),
        };
        Ok(Arc::new(OreIdProvider::new(
            sdk,
            self.policy.clone(),
            self.supported_chain_ids.clone(),
        )))
    }

    async fn get_chain_id(&self) -> Result<ChainId> {
        let sdk = self.authenticated_sdk().await?;
        Ok(self.resolve(&sdk).await?.chain_id)
    }

    async fn get_account(&self) -> Result<Option<String>> {
        let sdk = self.authenticated_sdk().await?;
        let user = sdk.user_data().await.map_err(ConnectorError::Sdk)?;
        match select_active_record(&user.chain_accounts, &self.policy, &self.supported_chain_ids) {
            Ok(record) => Ok(Some(record.chain_account.clone())),
            Err(ConnectorError::NoActiveAccount | ConnectorError::UnsupportedChain { .. }) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn deactivate(&self) -> Result<()> {
        let mut session = self.session.write().await;
        let current = session.as_ref().ok_or(ConnectorError::NotActivated)?;
        current.sdk.logout().await.map_err(|e| {
            warn!(error = %e, "identity SDK logout failed");
            ConnectorError::Sdk(e)
        })?;
        *session = None;
        info!("connector deactivated");
        Ok(())
    }
}
