//! Shared test fixtures for the session crate.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use waypoint_core::{
    ContentItem, ContentRequest, ContentSource, FetchError, TriggerPoint, VerifiedUser, ViewTable,
};
use waypoint_security::HmacVerifier;

use crate::session::{Session, SessionOptions};

/// A call the session made on its content source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Identify(Option<String>),
    SetContext(Option<TriggerPoint>),
    Request { user: String, trigger_point: TriggerPoint },
}

struct Reply {
    result: Result<Vec<ContentItem>, FetchError>,
    delay: Duration,
}

/// A content source with a scripted reply per trigger point.
///
/// Unscripted trigger points answer with no content immediately.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<TriggerPoint, Reply>>,
    panics: Mutex<HashSet<TriggerPoint>>,
    calls: Mutex<Vec<SourceCall>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, trigger_point: &str, items: Vec<ContentItem>, delay: Duration) {
        self.replies.lock().unwrap().insert(
            trigger_point.into(),
            Reply { result: Ok(items), delay },
        );
    }

    pub fn fail(&self, trigger_point: &str, error: FetchError) {
        self.replies.lock().unwrap().insert(
            trigger_point.into(),
            Reply { result: Err(error), delay: Duration::ZERO },
        );
    }

    /// Make requests for `trigger_point` panic inside the source.
    pub fn panic_on(&self, trigger_point: &str) {
        self.panics.lock().unwrap().insert(trigger_point.into());
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<TriggerPoint> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SourceCall::Request { trigger_point, .. } => Some(trigger_point),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_content(
        &self,
        request: &ContentRequest,
    ) -> Result<Vec<ContentItem>, FetchError> {
        self.calls.lock().unwrap().push(SourceCall::Request {
            user: request.identity.to_string(),
            trigger_point: request.trigger_point.clone(),
        });
        let panics = self.panics.lock().unwrap().contains(&request.trigger_point);
        if panics {
            panic!("scripted panic for {}", request.trigger_point);
        }
        let (result, delay) = match self.replies.lock().unwrap().get(&request.trigger_point) {
            Some(reply) => (reply.result.clone(), reply.delay),
            None => (Ok(Vec::new()), Duration::ZERO),
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn identify(&self, user: Option<&VerifiedUser>) {
        self.calls
            .lock()
            .unwrap()
            .push(SourceCall::Identify(user.map(|u| u.identity.to_string())));
    }

    async fn set_context(&self, trigger_point: Option<&TriggerPoint>) {
        self.calls
            .lock()
            .unwrap()
            .push(SourceCall::SetContext(trigger_point.cloned()));
    }
}

/// A session over the demo view table that does not fetch on sign-in.
pub fn demo_session() -> Session {
    Session::new(
        Arc::new(HmacVerifier::new("test-secret")),
        ViewTable::default(),
        SessionOptions {
            fetch_on_sign_in: false,
            ..SessionOptions::default()
        },
    )
}
