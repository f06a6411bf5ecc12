//! Session event system - decoupled communication between the session and
//! whatever presents its state.
//!
//! The session publishes an event for every transition. Presentation
//! surfaces, loggers, and tests subscribe and react without being wired
//! into the state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::content::PresentationType;
use crate::trigger::TriggerPoint;

/// All session events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A user signed in and was verified
    UserChanged {
        identity: String,
        token_fingerprint: String,
        timestamp: DateTime<Utc>,
    },

    /// The user signed out; collaborators should treat the client as anonymous
    UserCleared { timestamp: DateTime<Utc> },

    /// A content request was issued
    FetchStarted {
        request_id: String,
        generation: u64,
        trigger_point: TriggerPoint,
        timestamp: DateTime<Utc>,
    },

    /// The current view has no trigger point, so nothing was requested
    ContentFreeView { view: String, timestamp: DateTime<Utc> },

    /// Fresh content was applied to the session
    ContentApplied {
        trigger_point: TriggerPoint,
        item_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A content request failed; the session degraded to no content
    FetchFailed {
        trigger_point: TriggerPoint,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A response arrived for a superseded request and was dropped
    StaleResponseDiscarded {
        request_id: String,
        trigger_point: TriggerPoint,
        timestamp: DateTime<Utc>,
    },

    /// An overlay or embed was shown or dismissed by the user
    PresentationChanged {
        channel: PresentationType,
        visible: bool,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for session events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<SessionEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SessionEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
