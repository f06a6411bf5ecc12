//! Security module for Waypoint - user id verification.
//!
//! Provides:
//! - **Verification**: HMAC-SHA256 tokens binding a user id to a shared secret

pub mod verifier;

pub use verifier::{HmacVerifier, hash_user_id};
