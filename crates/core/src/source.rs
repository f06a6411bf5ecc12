//! ContentSource trait - the abstraction over content delivery backends.
//!
//! A ContentSource knows how to ask the targeted content service for the
//! items relevant to a trigger point. Bindings: direct HTTP, SDK-style
//! capability interface, in-memory catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::error::FetchError;
use crate::identity::{UserIdentity, VerificationToken, VerifiedUser};
use crate::trigger::TriggerPoint;

/// Platform the content is requested for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("unknown platform '{other}' (expected desktop or mobile)")),
        }
    }
}

/// One request for content at a trigger point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub identity: UserIdentity,
    pub token: VerificationToken,
    pub trigger_point: TriggerPoint,
    pub platform: Platform,
    pub content_types: Vec<String>,
}

/// The core ContentSource trait.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable binding name (e.g., "http", "sdk", "static").
    fn name(&self) -> &str;

    /// Request the content items for a trigger point.
    async fn request_content(
        &self,
        request: &ContentRequest,
    ) -> Result<Vec<ContentItem>, FetchError>;

    /// Inform the source that the signed-in user changed.
    ///
    /// `None` means the user is now anonymous. Stateless bindings ignore it.
    async fn identify(&self, _user: Option<&VerifiedUser>) {}

    /// Inform the source of the trigger point the user is now at.
    ///
    /// `None` means a content-free view.
    async fn set_context(&self, _trigger_point: Option<&TriggerPoint>) {}
}
