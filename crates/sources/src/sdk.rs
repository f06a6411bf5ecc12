//! SDK-style binding.
//!
//! Vendor SDKs expose a stateful capability surface: initialize once, tell
//! the SDK who the user is and where they are, then ask it for content.
//! [`TargetedContentSdk`] captures that surface; [`SdkContentSource`] adapts
//! any implementation to the [`ContentSource`] seam the session drives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};
use waypoint_core::{
    ContentItem, ContentRequest, ContentSource, FetchError, Platform, TriggerPoint, VerifiedUser,
};

use crate::http::HttpContentSource;

/// Settings handed to [`TargetedContentSdk::initialize`].
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub organization_code: String,
    pub api_base_url: String,
    pub platform: Platform,
    pub content_types: Vec<String>,
    pub request_timeout: Duration,
    pub button_class_name: Option<String>,
    pub view_class_name: Option<String>,
}

impl SdkConfig {
    pub fn from_app_config(
        config: &waypoint_config::AppConfig,
    ) -> Result<Self, waypoint_config::ConfigError> {
        Ok(Self {
            organization_code: config.organization_code()?.to_string(),
            api_base_url: config.api_base_url.clone(),
            platform: config.platform,
            content_types: config.content_types.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            button_class_name: config.button_class_name.clone(),
            view_class_name: config.view_class_name.clone(),
        })
    }
}

/// Capability interface of a targeted content SDK.
#[async_trait]
pub trait TargetedContentSdk: Send + Sync {
    /// Configure the SDK. Must be called before content can be checked.
    async fn initialize(&self, config: SdkConfig) -> Result<(), FetchError>;

    /// Set or clear the current user.
    async fn set_user(&self, user: Option<VerifiedUser>);

    /// Record the trigger point the user is at, or `None` for a content-free view.
    async fn set_context(&self, trigger_point: Option<TriggerPoint>);

    /// Ask for the content of a trigger point for the current user.
    async fn check_for_content(
        &self,
        trigger_point: &TriggerPoint,
    ) -> Result<Vec<ContentItem>, FetchError>;
}

struct Initialized {
    config: SdkConfig,
    transport: Arc<dyn ContentSource>,
}

/// In-process SDK implementation.
///
/// Holds the SDK state (configuration, user, context) and delegates the
/// actual request to a transport, HTTP by default.
pub struct EmbeddedSdk {
    injected_transport: Option<Arc<dyn ContentSource>>,
    state: RwLock<Option<Initialized>>,
    user: RwLock<Option<VerifiedUser>>,
    context: RwLock<Option<TriggerPoint>>,
}

impl EmbeddedSdk {
    /// An SDK that builds an HTTP transport on initialize.
    pub fn new() -> Self {
        Self {
            injected_transport: None,
            state: RwLock::new(None),
            user: RwLock::new(None),
            context: RwLock::new(None),
        }
    }

    /// An SDK that uses the given transport instead of HTTP.
    pub fn with_transport(transport: Arc<dyn ContentSource>) -> Self {
        Self {
            injected_transport: Some(transport),
            ..Self::new()
        }
    }

    /// The trigger point last set via [`TargetedContentSdk::set_context`].
    pub async fn context(&self) -> Option<TriggerPoint> {
        self.context.read().await.clone()
    }

    /// The user last set via [`TargetedContentSdk::set_user`].
    pub async fn user(&self) -> Option<VerifiedUser> {
        self.user.read().await.clone()
    }
}

impl Default for EmbeddedSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TargetedContentSdk for EmbeddedSdk {
    async fn initialize(&self, config: SdkConfig) -> Result<(), FetchError> {
        let transport: Arc<dyn ContentSource> = match &self.injected_transport {
            Some(t) => t.clone(),
            None => Arc::new(HttpContentSource::new(
                &config.api_base_url,
                &config.organization_code,
                config.request_timeout,
            )?),
        };
        info!(
            organization = %config.organization_code,
            transport = transport.name(),
            "SDK initialized"
        );
        *self.state.write().await = Some(Initialized { config, transport });
        Ok(())
    }

    async fn set_user(&self, user: Option<VerifiedUser>) {
        match &user {
            Some(u) => debug!(user = %u.identity, "SDK user set"),
            None => debug!("SDK user cleared"),
        }
        *self.user.write().await = user;
    }

    async fn set_context(&self, trigger_point: Option<TriggerPoint>) {
        *self.context.write().await = trigger_point;
    }

    async fn check_for_content(
        &self,
        trigger_point: &TriggerPoint,
    ) -> Result<Vec<ContentItem>, FetchError> {
        let (transport, platform, content_types) = {
            let state = self.state.read().await;
            let init = state
                .as_ref()
                .ok_or_else(|| FetchError::NotReady("SDK is not initialized".into()))?;
            (
                init.transport.clone(),
                init.config.platform,
                init.config.content_types.clone(),
            )
        };

        let user = self
            .user
            .read()
            .await
            .clone()
            .ok_or_else(|| FetchError::NotReady("no user is set".into()))?;

        let request = ContentRequest {
            identity: user.identity,
            token: user.token,
            trigger_point: trigger_point.clone(),
            platform,
            content_types,
        };
        transport.request_content(&request).await
    }
}

/// Adapts a [`TargetedContentSdk`] to the [`ContentSource`] seam.
pub struct SdkContentSource<S> {
    sdk: S,
}

impl<S: TargetedContentSdk> SdkContentSource<S> {
    /// Wrap an SDK that has already been initialized.
    pub fn new(sdk: S) -> Self {
        Self { sdk }
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }
}

#[async_trait]
impl<S: TargetedContentSdk> ContentSource for SdkContentSource<S> {
    fn name(&self) -> &str {
        "sdk"
    }

    async fn request_content(
        &self,
        request: &ContentRequest,
    ) -> Result<Vec<ContentItem>, FetchError> {
        // The SDK reads the user from its own state; the request's pair is
        // what the session correlates the response against.
        self.sdk.check_for_content(&request.trigger_point).await
    }

    async fn identify(&self, user: Option<&VerifiedUser>) {
        self.sdk.set_user(user.cloned()).await;
    }

    async fn set_context(&self, trigger_point: Option<&TriggerPoint>) {
        self.sdk.set_context(trigger_point.cloned()).await;
    }
}
