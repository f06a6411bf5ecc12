//! Trigger points and the navigation table that resolves views to them.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A named application location that may have targeted content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerPoint(String);

impl TriggerPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TriggerPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TriggerPoint {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TriggerPoint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single navigable view and the trigger point it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub trigger_point: Option<TriggerPoint>,
}

/// Ordered table of navigable views.
///
/// Every trigger point is a view of the same name. Additional views may map
/// to a different trigger point or to none at all (content-free views).
/// The first trigger point is the default location after sign-in and
/// sign-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTable {
    views: Vec<View>,
}

impl ViewTable {
    /// Build a table from the ordered trigger points plus extra views.
    ///
    /// Extra views that share a name with a trigger point override its
    /// mapping. Fails when no trigger point is given.
    pub fn new(
        trigger_points: impl IntoIterator<Item = TriggerPoint>,
        extra_views: impl IntoIterator<Item = (String, Option<TriggerPoint>)>,
    ) -> Result<Self, Error> {
        let mut views: Vec<View> = trigger_points
            .into_iter()
            .map(|tp| View {
                name: tp.as_str().to_string(),
                trigger_point: Some(tp),
            })
            .collect();

        if views.is_empty() {
            return Err(Error::Config {
                message: "at least one trigger point is required".into(),
            });
        }

        for (name, trigger_point) in extra_views {
            match views.iter_mut().find(|v| v.name == name) {
                Some(existing) => existing.trigger_point = trigger_point,
                None => views.push(View { name, trigger_point }),
            }
        }

        Ok(Self { views })
    }

    /// The name of the view selected after sign-in or sign-out.
    pub fn default_view(&self) -> &str {
        &self.views[0].name
    }

    /// The trigger point of the default view.
    pub fn default_trigger_point(&self) -> Option<&TriggerPoint> {
        self.views[0].trigger_point.as_ref()
    }

    /// Resolve a view name.
    ///
    /// Returns `None` for unknown views and `Some(None)` for views that have
    /// no trigger point.
    pub fn resolve(&self, view: &str) -> Option<Option<&TriggerPoint>> {
        self.views
            .iter()
            .find(|v| v.name == view)
            .map(|v| v.trigger_point.as_ref())
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }
}

impl Default for ViewTable {
    /// The demo navigation: three trigger points plus one content-free page.
    fn default() -> Self {
        Self {
            views: vec![
                View { name: "account-view".into(), trigger_point: Some("account-view".into()) },
                View { name: "payments".into(), trigger_point: Some("payments".into()) },
                View { name: "transfers".into(), trigger_point: Some("transfers".into()) },
                View { name: "no-trigger-point-page".into(), trigger_point: None },
            ],
        }
    }
}
