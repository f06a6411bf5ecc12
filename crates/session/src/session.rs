//! The trigger-point session state machine.
//!
//! States:
//!
//! ```text
//!            sign_in                 navigate / refresh
//! SignedOut ────────► Idle ─────────────────────────────► Fetching
//!     ▲                │                                   │    ▲
//!     │ sign_out       │ navigate to content-free view     │    │ navigate
//!     │                ▼                                   ▼    │
//!     └──────────── Ready ◄──── fetch_succeeded / fetch_failed ─┘
//! ```
//!
//! Every operation is synchronous and returns the [`Effect`]s the caller must
//! carry out against the content source. Fetch responses come back through
//! [`Session::apply`] together with the [`FetchTicket`] they were issued for;
//! a ticket that is no longer current is discarded unapplied.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use waypoint_core::{
    ContentItem, ContentRequest, EventBus, FetchError, IdentityVerifier, Platform,
    PresentationMode, PresentationType, SessionError, SessionEvent, TriggerPoint, UserIdentity,
    VerificationToken, VerifiedUser, ViewTable,
};

use crate::classify::{Classified, classify};
use crate::presentation::{PresentationState, SurfaceView};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    /// Signed in, nothing requested yet
    Idle,
    /// A content request is outstanding
    Fetching,
    /// Content resolved, possibly empty
    Ready,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignedOut => "signed-out",
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlates a response with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request_id: Uuid,
    pub identity: UserIdentity,
    pub trigger_point: TriggerPoint,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Tell the content source who the user is (`None` = anonymous)
    Identify(Option<VerifiedUser>),
    /// Tell the content source where the user is (`None` = content-free view)
    SetContext(Option<TriggerPoint>),
    /// Request content, then hand the result to [`Session::apply`]
    Fetch {
        ticket: FetchTicket,
        request: ContentRequest,
    },
}

/// What happened to a response handed to [`Session::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Items stored; session is `Ready`
    Applied { items: usize },
    /// Request failed; session is `Ready` with no content
    Failed,
    /// Response belonged to a superseded request and was dropped
    Stale,
}

/// Static settings of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub platform: Platform,
    pub content_types: Vec<String>,
    pub presentation_mode: PresentationMode,
    /// Request content for the default trigger point right after sign-in
    pub fetch_on_sign_in: bool,
}

impl SessionOptions {
    pub fn from_config(config: &waypoint_config::AppConfig) -> Self {
        Self {
            platform: config.platform,
            content_types: config.content_types.clone(),
            presentation_mode: config.presentation_mode,
            fetch_on_sign_in: config.fetch_on_sign_in,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Desktop,
            content_types: vec!["featurette".into()],
            presentation_mode: PresentationMode::Classified,
            fetch_on_sign_in: true,
        }
    }
}

/// The trigger-point session.
pub struct Session {
    verifier: Arc<dyn IdentityVerifier>,
    views: ViewTable,
    options: SessionOptions,
    events: Arc<EventBus>,

    state: SessionState,
    user: Option<VerifiedUser>,
    view: String,
    trigger_point: Option<TriggerPoint>,
    content: Vec<ContentItem>,
    classified: Classified,
    presentation: PresentationState,
    generation: u64,
    pending: Option<FetchTicket>,
}

impl Session {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        views: ViewTable,
        options: SessionOptions,
    ) -> Self {
        let view = views.default_view().to_string();
        let trigger_point = views.default_trigger_point().cloned();
        Self {
            verifier,
            views,
            options,
            events: Arc::new(EventBus::default()),
            state: SessionState::SignedOut,
            user: None,
            view,
            trigger_point,
            content: Vec::new(),
            classified: Classified::default(),
            presentation: PresentationState::default(),
            generation: 0,
            pending: None,
        }
    }

    /// Publish to a shared event bus instead of a private one.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    // --- Accessors ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&VerifiedUser> {
        self.user.as_ref()
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.user.as_ref().map(|u| &u.identity)
    }

    pub fn token(&self) -> Option<&VerificationToken> {
        self.user.as_ref().map(|u| &u.token)
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn trigger_point(&self) -> Option<&TriggerPoint> {
        self.trigger_point.as_ref()
    }

    pub fn views(&self) -> &ViewTable {
        &self.views
    }

    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    pub fn classified(&self) -> &Classified {
        &self.classified
    }

    pub fn presentation(&self) -> PresentationState {
        self.presentation
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// The ticket of the outstanding request, if any.
    pub fn pending(&self) -> Option<&FetchTicket> {
        self.pending.as_ref()
    }

    /// What the presentation surface should show right now.
    pub fn surface(&self) -> SurfaceView<'_> {
        SurfaceView::render(
            self.options.presentation_mode,
            &self.content,
            &self.classified,
            &self.presentation,
        )
    }

    // --- Identity ---

    /// Sign a user in and select the default view.
    pub fn sign_in(&mut self, id: &str) -> Result<Vec<Effect>, SessionError> {
        if let Some(current) = &self.user {
            return Err(SessionError::AlreadySignedIn(current.identity.to_string()));
        }
        let identity = UserIdentity::new(id)?;
        let token = self.verifier.verify(&identity);
        let user = VerifiedUser { identity, token };

        info!(user = %user.identity, "Signed in");
        self.events.publish(SessionEvent::UserChanged {
            identity: user.identity.to_string(),
            token_fingerprint: user.token.fingerprint().to_string(),
            timestamp: Utc::now(),
        });

        self.user = Some(user.clone());
        self.reset_navigation();
        self.state = SessionState::Idle;

        let mut effects = vec![Effect::Identify(Some(user))];
        if self.options.fetch_on_sign_in {
            effects.extend(self.begin_fetch());
        }
        Ok(effects)
    }

    /// Sign the current user out, dropping all content and any outstanding request.
    pub fn sign_out(&mut self) -> Result<Vec<Effect>, SessionError> {
        let user = self.user.take().ok_or(SessionError::NotSignedIn)?;

        // Invalidate whatever is in flight
        self.generation += 1;
        self.pending = None;
        self.reset_navigation();
        self.state = SessionState::SignedOut;

        info!(user = %user.identity, "Signed out");
        self.events.publish(SessionEvent::UserCleared { timestamp: Utc::now() });

        Ok(vec![Effect::Identify(None), Effect::SetContext(None)])
    }

    // --- Navigation ---

    /// Navigate to a view and request its content.
    pub fn navigate(&mut self, view: &str) -> Result<Vec<Effect>, SessionError> {
        if self.user.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        let trigger_point = self
            .views
            .resolve(view)
            .ok_or_else(|| SessionError::UnknownView(view.to_string()))?
            .cloned();

        debug!(view, trigger_point = ?trigger_point, "Navigating");
        self.view = view.to_string();
        self.trigger_point = trigger_point;
        Ok(self.begin_fetch())
    }

    /// Request content for the current view again.
    pub fn refresh(&mut self) -> Result<Vec<Effect>, SessionError> {
        if self.user.is_none() {
            return Err(SessionError::NotSignedIn);
        }
        Ok(self.begin_fetch())
    }

    // --- Fetch results ---

    /// Apply the result of a request.
    ///
    /// The result is applied only if `ticket` is the outstanding one and
    /// still matches the current (identity, trigger point) pair.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ContentItem>, FetchError>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(
                request_id = %ticket.request_id,
                trigger_point = %ticket.trigger_point,
                generation = ticket.generation,
                current_generation = self.generation,
                "Discarding stale content response"
            );
            self.events.publish(SessionEvent::StaleResponseDiscarded {
                request_id: ticket.request_id.to_string(),
                trigger_point: ticket.trigger_point.clone(),
                timestamp: Utc::now(),
            });
            return FetchOutcome::Stale;
        }

        self.pending = None;
        self.state = SessionState::Ready;
        self.presentation = PresentationState::default();

        match result {
            Ok(items) => {
                let count = items.len();
                self.classified = classify(&items);
                self.content = items;
                info!(trigger_point = %ticket.trigger_point, items = count, "Content applied");
                self.events.publish(SessionEvent::ContentApplied {
                    trigger_point: ticket.trigger_point.clone(),
                    item_count: count,
                    timestamp: Utc::now(),
                });
                FetchOutcome::Applied { items: count }
            }
            Err(e) => {
                self.clear_content();
                warn!(trigger_point = %ticket.trigger_point, error = %e, "Content request failed");
                self.events.publish(SessionEvent::FetchFailed {
                    trigger_point: ticket.trigger_point.clone(),
                    error_message: e.to_string(),
                    timestamp: Utc::now(),
                });
                FetchOutcome::Failed
            }
        }
    }

    pub fn fetch_succeeded(&mut self, ticket: &FetchTicket, items: Vec<ContentItem>) -> FetchOutcome {
        self.apply(ticket, Ok(items))
    }

    pub fn fetch_failed(&mut self, ticket: &FetchTicket, error: FetchError) -> FetchOutcome {
        self.apply(ticket, Err(error))
    }

    /// Whether a response for `ticket` would be applied now.
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
            && ticket.generation == self.generation
            && self.identity() == Some(&ticket.identity)
            && self.trigger_point.as_ref() == Some(&ticket.trigger_point)
    }

    // --- Presentation actions ---

    /// Dismiss the popup until the next applied fetch.
    pub fn close_popup(&mut self) -> Result<(), SessionError> {
        self.require_bucket(PresentationType::Popup)?;
        self.set_visibility(PresentationType::Popup, false);
        Ok(())
    }

    /// Activate the button affordance.
    pub fn open_button_overlay(&mut self) -> Result<(), SessionError> {
        self.require_bucket(PresentationType::ButtonTriggered)?;
        self.set_visibility(PresentationType::ButtonTriggered, true);
        Ok(())
    }

    /// Collapse the button overlay back to the affordance.
    pub fn close_button_overlay(&mut self) -> Result<(), SessionError> {
        self.require_bucket(PresentationType::ButtonTriggered)?;
        self.set_visibility(PresentationType::ButtonTriggered, false);
        Ok(())
    }

    /// Hide the inline embed until the next applied fetch.
    pub fn hide_inline(&mut self) -> Result<(), SessionError> {
        self.require_ready()?;
        let has_inline = match self.options.presentation_mode {
            PresentationMode::Simple => !self.content.is_empty(),
            PresentationMode::Classified => self.classified.top(PresentationType::Inline).is_some(),
        };
        if !has_inline {
            return Err(SessionError::NoContent(PresentationType::Inline));
        }
        self.set_visibility(PresentationType::Inline, false);
        Ok(())
    }

    // --- Internals ---

    /// Move into `Fetching` (or straight to `Ready` for a content-free view).
    fn begin_fetch(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.clear_content();
        self.presentation = PresentationState::default();

        let Some(user) = self.user.clone() else {
            return Vec::new();
        };

        let Some(trigger_point) = self.trigger_point.clone() else {
            self.pending = None;
            self.state = SessionState::Ready;
            debug!(view = %self.view, "View has no trigger point, skipping fetch");
            self.events.publish(SessionEvent::ContentFreeView {
                view: self.view.clone(),
                timestamp: Utc::now(),
            });
            return vec![Effect::SetContext(None)];
        };

        let ticket = FetchTicket {
            generation: self.generation,
            request_id: Uuid::new_v4(),
            identity: user.identity.clone(),
            trigger_point: trigger_point.clone(),
        };
        let request = ContentRequest {
            identity: user.identity,
            token: user.token,
            trigger_point: trigger_point.clone(),
            platform: self.options.platform,
            content_types: self.options.content_types.clone(),
        };

        self.pending = Some(ticket.clone());
        self.state = SessionState::Fetching;
        debug!(
            request_id = %ticket.request_id,
            generation = ticket.generation,
            trigger_point = %trigger_point,
            "Requesting content"
        );
        self.events.publish(SessionEvent::FetchStarted {
            request_id: ticket.request_id.to_string(),
            generation: ticket.generation,
            trigger_point: trigger_point.clone(),
            timestamp: Utc::now(),
        });

        vec![
            Effect::SetContext(Some(trigger_point)),
            Effect::Fetch { ticket, request },
        ]
    }

    fn reset_navigation(&mut self) {
        self.view = self.views.default_view().to_string();
        self.trigger_point = self.views.default_trigger_point().cloned();
        self.clear_content();
        self.presentation = PresentationState::default();
    }

    fn clear_content(&mut self) {
        self.content.clear();
        self.classified = Classified::default();
    }

    fn require_ready(&self) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::NotReady(self.state.as_str()));
        }
        Ok(())
    }

    fn require_bucket(&self, kind: PresentationType) -> Result<(), SessionError> {
        self.require_ready()?;
        if self.options.presentation_mode == PresentationMode::Simple
            || self.classified.top(kind).is_none()
        {
            return Err(SessionError::NoContent(kind));
        }
        Ok(())
    }

    fn set_visibility(&mut self, channel: PresentationType, visible: bool) {
        let slot = match channel {
            PresentationType::Popup => &mut self.presentation.popup_visible,
            PresentationType::ButtonTriggered => &mut self.presentation.button_overlay_open,
            PresentationType::Inline => &mut self.presentation.inline_visible,
            PresentationType::Unknown => return,
        };
        if *slot == visible {
            return;
        }
        *slot = visible;
        debug!(channel = %channel, visible, "Presentation changed");
        self.events.publish(SessionEvent::PresentationChanged {
            channel,
            visible,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::ButtonConfig;
    use waypoint_security::HmacVerifier;

    fn session() -> Session {
        Session::new(
            Arc::new(HmacVerifier::new("test-secret")),
            ViewTable::default(),
            SessionOptions {
                fetch_on_sign_in: false,
                ..SessionOptions::default()
            },
        )
    }

    fn fetch_ticket(effects: &[Effect]) -> FetchTicket {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Fetch { ticket, .. } => Some(ticket.clone()),
                _ => None,
            })
            .expect("expected a fetch effect")
    }

    fn has_fetch(effects: &[Effect]) -> bool {
        effects.iter().any(|e| matches!(e, Effect::Fetch { .. }))
    }

    fn tour_button() -> ButtonConfig {
        ButtonConfig {
            title: "See tour".into(),
            text_color: "#fff".into(),
            background_color: "#000".into(),
            border_radius: 8,
        }
    }

    #[test]
    fn starts_signed_out_at_default_view() {
        let s = session();
        assert_eq!(s.state(), SessionState::SignedOut);
        assert_eq!(s.view(), "account-view");
        assert!(s.identity().is_none());
    }

    #[test]
    fn sign_in_verifies_and_goes_idle() {
        let mut s = session();
        let effects = s.sign_in("u1").unwrap();

        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.identity().unwrap().as_str(), "u1");
        assert_eq!(
            s.token().unwrap().as_str(),
            waypoint_security::hash_user_id("u1", "test-secret")
        );
        assert_eq!(s.trigger_point().unwrap().as_str(), "account-view");
        assert!(matches!(&effects[0], Effect::Identify(Some(u)) if u.identity.as_str() == "u1"));
        assert!(!has_fetch(&effects));
    }

    #[test]
    fn sign_in_can_fetch_default_trigger_point() {
        let mut s = Session::new(
            Arc::new(HmacVerifier::new("k")),
            ViewTable::default(),
            SessionOptions::default(),
        );
        let effects = s.sign_in("u1").unwrap();
        assert_eq!(s.state(), SessionState::Fetching);
        assert_eq!(fetch_ticket(&effects).trigger_point.as_str(), "account-view");
    }

    #[test]
    fn sign_in_rejections() {
        let mut s = session();
        assert_eq!(s.sign_in("").unwrap_err(), SessionError::EmptyIdentity);
        assert_eq!(s.state(), SessionState::SignedOut);

        s.sign_in("u1").unwrap();
        assert_eq!(
            s.sign_in("u2").unwrap_err(),
            SessionError::AlreadySignedIn("u1".into())
        );
        assert_eq!(s.identity().unwrap().as_str(), "u1");
    }

    #[test]
    fn operations_require_sign_in() {
        let mut s = session();
        assert_eq!(s.navigate("payments").unwrap_err(), SessionError::NotSignedIn);
        assert_eq!(s.refresh().unwrap_err(), SessionError::NotSignedIn);
        assert_eq!(s.sign_out().unwrap_err(), SessionError::NotSignedIn);
    }

    #[test]
    fn unknown_view_leaves_state_untouched() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        assert_eq!(
            s.navigate("settings").unwrap_err(),
            SessionError::UnknownView("settings".into())
        );
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.view(), "account-view");
    }

    #[test]
    fn scenario_popup_shown_then_closed() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let effects = s.navigate("payments").unwrap();
        assert_eq!(s.state(), SessionState::Fetching);
        let ticket = fetch_ticket(&effects);

        let outcome =
            s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/v1")]);
        assert_eq!(outcome, FetchOutcome::Applied { items: 1 });
        assert_eq!(s.state(), SessionState::Ready);

        let overlay = s.surface().popup_overlay.expect("popup overlay shown");
        assert_eq!(overlay.item.view_url.as_deref(), Some("https://x/v1"));

        s.close_popup().unwrap();
        assert!(s.surface().popup_overlay.is_none());
        assert_eq!(
            s.classified().top(PresentationType::Popup).unwrap().view_url.as_deref(),
            Some("https://x/v1")
        );

        // Re-fetching resets dismissal
        let ticket = fetch_ticket(&s.refresh().unwrap());
        s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/v1")]);
        assert!(s.surface().popup_overlay.is_some());
    }

    #[test]
    fn scenario_content_free_view_skips_fetch() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let effects = s.navigate("no-trigger-point-page").unwrap();

        assert!(!has_fetch(&effects));
        assert_eq!(effects, vec![Effect::SetContext(None)]);
        assert_eq!(s.state(), SessionState::Ready);
        assert!(s.content().is_empty());
        assert!(s.pending().is_none());
        assert!(s.surface().is_empty());
    }

    #[test]
    fn scenario_fetch_failure_degrades_to_nothing() {
        let mut s = session();
        s.sign_in("u2").unwrap();
        let ticket = fetch_ticket(&s.refresh().unwrap());

        let outcome = s.fetch_failed(
            &ticket,
            FetchError::Status {
                status_code: 500,
                message: "boom".into(),
            },
        );
        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(s.state(), SessionState::Ready);
        assert!(s.content().is_empty());
        assert!(s.surface().is_empty());
    }

    #[test]
    fn scenario_button_triggered_collapsed_until_activated() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("account-view").unwrap());
        s.fetch_succeeded(
            &ticket,
            vec![ContentItem::button_triggered("account-view", "https://x/tour", tour_button())],
        );

        let view = s.surface();
        let button = view.button.expect("affordance rendered");
        assert_eq!(button.style, Some(&tour_button()));
        assert!(!button.expanded);
        assert!(view.button_overlay.is_none());
        assert!(view.popup_overlay.is_none());

        s.open_button_overlay().unwrap();
        assert!(s.surface().button_overlay.is_some());

        s.close_button_overlay().unwrap();
        let view = s.surface();
        assert!(view.button_overlay.is_none());
        assert!(view.button.is_some());
    }

    #[test]
    fn navigate_clears_content_immediately() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("payments").unwrap());
        s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/v1")]);
        assert!(!s.surface().is_empty());

        s.navigate("transfers").unwrap();
        assert_eq!(s.state(), SessionState::Fetching);
        assert!(s.content().is_empty());
        assert!(s.classified().is_empty());
        assert!(s.surface().is_empty());
    }

    #[test]
    fn late_response_for_superseded_trigger_point_is_discarded() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let p1 = fetch_ticket(&s.navigate("payments").unwrap());
        let p2 = fetch_ticket(&s.navigate("transfers").unwrap());

        // P1 resolves after P2 was issued
        let outcome = s.fetch_succeeded(&p1, vec![ContentItem::popup("payments", "https://x/old")]);
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(s.state(), SessionState::Fetching);
        assert!(s.content().is_empty());

        let outcome =
            s.fetch_succeeded(&p2, vec![ContentItem::popup("transfers", "https://x/new")]);
        assert_eq!(outcome, FetchOutcome::Applied { items: 1 });

        // Arriving after P2 is applied changes nothing either
        assert_eq!(
            s.fetch_succeeded(&p1, vec![ContentItem::popup("payments", "https://x/old")]),
            FetchOutcome::Stale
        );
        assert_eq!(s.content()[0].view_url.as_deref(), Some("https://x/new"));
    }

    #[test]
    fn returning_to_same_trigger_point_still_discards_older_ticket() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let first = fetch_ticket(&s.navigate("payments").unwrap());
        s.navigate("transfers").unwrap();
        let second = fetch_ticket(&s.navigate("payments").unwrap());

        assert_eq!(s.fetch_failed(&first, FetchError::Network("x".into())), FetchOutcome::Stale);
        assert!(s.is_current(&second));
    }

    #[test]
    fn sign_out_resets_everything_and_invalidates_in_flight() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("transfers").unwrap());

        let effects = s.sign_out().unwrap();
        assert_eq!(effects, vec![Effect::Identify(None), Effect::SetContext(None)]);
        assert_eq!(s.state(), SessionState::SignedOut);
        assert_eq!(s.view(), "account-view");
        assert_eq!(s.trigger_point().unwrap().as_str(), "account-view");
        assert!(s.token().is_none());
        assert!(s.content().is_empty());

        assert_eq!(
            s.fetch_succeeded(&ticket, vec![ContentItem::popup("transfers", "https://x")]),
            FetchOutcome::Stale
        );
        assert!(s.content().is_empty());
    }

    #[test]
    fn response_for_previous_user_is_discarded() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("payments").unwrap());
        s.sign_out().unwrap();
        s.sign_in("u2").unwrap();
        s.navigate("payments").unwrap();

        assert_eq!(
            s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/u1")]),
            FetchOutcome::Stale
        );
    }

    #[test]
    fn presentation_actions_need_ready_state_and_content() {
        let mut s = session();
        s.sign_in("u1").unwrap();
        assert_eq!(s.close_popup().unwrap_err(), SessionError::NotReady("idle"));

        let ticket = fetch_ticket(&s.navigate("payments").unwrap());
        assert_eq!(s.close_popup().unwrap_err(), SessionError::NotReady("fetching"));

        s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/v1")]);
        assert_eq!(
            s.open_button_overlay().unwrap_err(),
            SessionError::NoContent(PresentationType::ButtonTriggered)
        );
        assert_eq!(
            s.hide_inline().unwrap_err(),
            SessionError::NoContent(PresentationType::Inline)
        );
    }

    #[test]
    fn simple_mode_hides_first_item() {
        let mut s = Session::new(
            Arc::new(HmacVerifier::new("k")),
            ViewTable::default(),
            SessionOptions {
                presentation_mode: PresentationMode::Simple,
                fetch_on_sign_in: false,
                ..SessionOptions::default()
            },
        );
        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("payments").unwrap());
        s.fetch_succeeded(&ticket, vec![ContentItem::popup("payments", "https://x/v1")]);

        assert!(s.surface().inline.is_some());
        assert_eq!(
            s.close_popup().unwrap_err(),
            SessionError::NoContent(PresentationType::Popup)
        );
        s.hide_inline().unwrap();
        assert!(s.surface().is_empty());
    }

    #[tokio::test]
    async fn publishes_transitions() {
        let bus = Arc::new(EventBus::new(32));
        let mut rx = bus.subscribe();
        let mut s = session().with_event_bus(bus);

        s.sign_in("u1").unwrap();
        let ticket = fetch_ticket(&s.navigate("payments").unwrap());
        s.fetch_failed(&ticket, FetchError::Network("down".into()));

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push(match event.as_ref() {
                SessionEvent::UserChanged { .. } => "user_changed",
                SessionEvent::FetchStarted { .. } => "fetch_started",
                SessionEvent::FetchFailed { .. } => "fetch_failed",
                _ => "other",
            });
        }
        assert_eq!(kinds, vec!["user_changed", "fetch_started", "fetch_failed"]);
    }
}
