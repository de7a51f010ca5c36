//! Identity SDK seam.
//!
//! The connector never talks to ORE ID directly. It drives an [`IdentitySdk`]
//! session handle built by an [`IdentitySdkFactory`], so the popup transport
//! (browser window, embedded webview, test double) stays pluggable.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SdkError;
use crate::types::{AuthProvider, OreIdOptions, UserData};

pub use memory::{ScriptedSdk, ScriptedSdkFactory, SdkStats};

/// A live handle to the identity SDK.
#[async_trait]
pub trait IdentitySdk: Send + Sync {
    /// One-time SDK initialization.
    async fn init(&self) -> Result<(), SdkError>;

    /// Run the interactive popup login. No timeout is applied by callers;
    /// the call resolves when the user finishes or closes the popup.
    async fn popup_auth(&self, provider: AuthProvider) -> Result<(), SdkError>;

    /// Fetch the authenticated user's record.
    async fn user_data(&self) -> Result<UserData, SdkError>;

    async fn logout(&self) -> Result<(), SdkError>;
}

/// Builds session handles from an options bundle.
pub trait IdentitySdkFactory: Send + Sync {
    fn create(&self, options: &OreIdOptions) -> Result<Arc<dyn IdentitySdk>, SdkError>;
}

impl<F> IdentitySdkFactory for F
where
    F: Fn(&OreIdOptions) -> Result<Arc<dyn IdentitySdk>, SdkError> + Send + Sync,
{
    fn create(&self, options: &OreIdOptions) -> Result<Arc<dyn IdentitySdk>, SdkError> {
        self(options)
    }
}
