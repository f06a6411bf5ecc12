//! Content items returned by the targeted content service.
//!
//! The wire format is camelCase JSON, e.g.:
//!
//! ```json
//! {
//!   "triggerPoint": "account-view",
//!   "viewUrl": "https://content.example/v/123",
//!   "presentationType": "button-triggered",
//!   "buttonConfig": {
//!     "title": "See tour",
//!     "textColor": "#fff",
//!     "backgroundColor": "#000",
//!     "borderRadius": 8
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::trigger::TriggerPoint;

/// How a content item wants to be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationType {
    /// Shown automatically as an overlay.
    #[default]
    Popup,
    /// Shown on demand behind a styled affordance.
    ButtonTriggered,
    /// Embedded directly in the page.
    Inline,
    /// A type this client does not know. Kept in the data, never classified.
    #[serde(other)]
    Unknown,
}

impl PresentationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popup => "popup",
            Self::ButtonTriggered => "button-triggered",
            Self::Inline => "inline",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PresentationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which presentation surface renders the classified content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Popup overlay, button affordance, and inline embed channels.
    #[default]
    Classified,
    /// The first item, whatever its classification, embedded inline.
    Simple,
}

/// Styling for the affordance of a `button-triggered` item.
///
/// Every field is optional on the wire; missing ones decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonConfig {
    pub title: String,
    pub text_color: String,
    pub background_color: String,
    pub border_radius: u32,
}

/// One unit of targeted content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// The trigger point this item was delivered for
    pub trigger_point: TriggerPoint,

    /// URL of the hosted view, when the item is URL-backed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,

    /// Presentation classification (absent on the wire means popup)
    #[serde(default)]
    pub presentation_type: PresentationType,

    /// Affordance styling, only meaningful for `button-triggered` items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_config: Option<ButtonConfig>,

    /// Any other vendor fields, kept as the renderable payload
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentItem {
    /// A URL-backed popup item.
    pub fn popup(trigger_point: impl Into<TriggerPoint>, view_url: impl Into<String>) -> Self {
        Self {
            trigger_point: trigger_point.into(),
            view_url: Some(view_url.into()),
            presentation_type: PresentationType::Popup,
            button_config: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A URL-backed inline item.
    pub fn inline(trigger_point: impl Into<TriggerPoint>, view_url: impl Into<String>) -> Self {
        Self {
            presentation_type: PresentationType::Inline,
            ..Self::popup(trigger_point, view_url)
        }
    }

    /// A URL-backed button-triggered item with its affordance styling.
    pub fn button_triggered(
        trigger_point: impl Into<TriggerPoint>,
        view_url: impl Into<String>,
        button: ButtonConfig,
    ) -> Self {
        Self {
            presentation_type: PresentationType::ButtonTriggered,
            button_config: Some(button),
            ..Self::popup(trigger_point, view_url)
        }
    }

    /// Short human-readable reference to what this item renders.
    pub fn view_reference(&self) -> String {
        match &self.view_url {
            Some(url) => url.clone(),
            None if !self.extra.is_empty() => {
                serde_json::Value::Object(self.extra.clone()).to_string()
            }
            None => "<empty view>".into(),
        }
    }
}
