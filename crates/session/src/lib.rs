//! # Waypoint Session
//!
//! The trigger-point session: who the user is, where they are, and what
//! content is on screen.
//!
//! [`Session`] is a synchronous state machine that returns the [`Effect`]s a
//! transition requires. [`SessionDriver`] executes those effects against a
//! [`ContentSource`](waypoint_core::ContentSource), running every fetch as
//! its own task and feeding responses back through the session's staleness
//! check.

pub mod classify;
pub mod driver;
pub mod presentation;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use classify::{Classified, classify};
pub use driver::{Completion, SessionDriver};
pub use presentation::{
    Affordance, DEFAULT_BUTTON_TITLE, InlineEmbed, Overlay, PresentationState, SurfaceView,
};
pub use session::{Effect, FetchOutcome, FetchTicket, Session, SessionOptions, SessionState};
