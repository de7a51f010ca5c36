//! In-memory identity SDK.
//!
//! Serves a fixed user record and counts every call. Used by the demo binary
//! and the test suites in place of a real popup transport.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{IdentitySdk, IdentitySdkFactory};
use crate::error::SdkError;
use crate::types::{AuthProvider, ChainAccountRecord, OreIdOptions, UserData};

/// Call counters shared by a factory and every handle it builds.
#[derive(Debug, Default)]
pub struct SdkStats {
    constructions: AtomicUsize,
    init_calls: AtomicUsize,
    auth_calls: AtomicUsize,
    user_data_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl SdkStats {
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn user_data_calls(&self) -> usize {
        self.user_data_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

/// Handle produced by [`ScriptedSdkFactory`].
pub struct ScriptedSdk {
    user: UserData,
    init_failure: Option<SdkError>,
    auth_failures: Arc<Mutex<VecDeque<SdkError>>>,
    auth_delay: Option<Duration>,
    authenticated: AtomicBool,
    stats: Arc<SdkStats>,
}

impl ScriptedSdk {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentitySdk for ScriptedSdk {
    async fn init(&self) -> Result<(), SdkError> {
        self.stats.init_calls.fetch_add(1, Ordering::SeqCst);
        match &self.init_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn popup_auth(&self, _provider: AuthProvider) -> Result<(), SdkError> {
        self.stats.auth_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.auth_delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .auth_failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        if let Some(err) = failure {
            return Err(err);
        }

        self.authenticated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn user_data(&self) -> Result<UserData, SdkError> {
        self.stats.user_data_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_authenticated() {
            return Err(SdkError::Rejected("User is not logged in".into()));
        }
        Ok(self.user.clone())
    }

    async fn logout(&self) -> Result<(), SdkError> {
        self.stats.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.authenticated.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Factory for [`ScriptedSdk`] handles.
///
/// Queued authentication failures are shared across handles, so a failure
/// scripted before a logout is still consumed by the rebuilt handle.
pub struct ScriptedSdkFactory {
    user: UserData,
    init_failure: Option<SdkError>,
    auth_failures: Arc<Mutex<VecDeque<SdkError>>>,
    auth_delay: Option<Duration>,
    stats: Arc<SdkStats>,
}

impl ScriptedSdkFactory {
    pub fn new(user: UserData) -> Self {
        Self {
            user,
            init_failure: None,
            auth_failures: Arc::new(Mutex::new(VecDeque::new())),
            auth_delay: None,
            stats: Arc::new(SdkStats::default()),
        }
    }

    pub fn with_chain_accounts(records: Vec<ChainAccountRecord>) -> Self {
        Self::new(UserData::with_chain_accounts(records))
    }

    /// Every `init()` fails with `err`.
    pub fn fail_init(mut self, err: SdkError) -> Self {
        self.init_failure = Some(err);
        self
    }

    /// The next `popup_auth()` fails with `err`.
    pub fn fail_next_auth(self, err: SdkError) -> Self {
        self.auth_failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(err);
        self
    }

    /// Simulate the user taking `delay` to finish the popup.
    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = Some(delay);
        self
    }

    pub fn stats(&self) -> Arc<SdkStats> {
        self.stats.clone()
    }
}

impl IdentitySdkFactory for ScriptedSdkFactory {
    fn create(&self, _options: &OreIdOptions) -> Result<Arc<dyn IdentitySdk>, SdkError> {
        self.stats.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ScriptedSdk {
            user: self.user.clone(),
            init_failure: self.init_failure.clone(),
            auth_failures: self.auth_failures.clone(),
            auth_delay: self.auth_delay,
            authenticated: AtomicBool::new(false),
            stats: self.stats.clone(),
        }))
    }
}
