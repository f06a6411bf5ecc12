//! # Waypoint Core
//!
//! Domain types, traits, and error definitions for the Waypoint targeted
//! content client. This crate has **no transport dependencies** - it defines
//! the domain model that the sources, session, and CLI crates build on.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here:
//! - [`ContentSource`] - "ask for content relevant to a trigger point"
//! - [`IdentityVerifier`] - keyed hash binding a token to a user identity
//!
//! Implementations live in their respective crates, so the session state
//! machine can be tested against in-memory stubs.

pub mod content;
pub mod error;
pub mod event;
pub mod identity;
pub mod source;
pub mod trigger;

// Re-export key types at crate root for ergonomics
pub use content::{ButtonConfig, ContentItem, PresentationMode, PresentationType};
pub use error::{Error, FetchError, Result, SessionError};
pub use event::{EventBus, SessionEvent};
pub use identity::{IdentityVerifier, UserIdentity, VerificationToken, VerifiedUser};
pub use source::{ContentRequest, ContentSource, Platform};
pub use trigger::{TriggerPoint, ViewTable};
