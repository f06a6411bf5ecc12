//! HMAC-SHA256 identity verification.
//!
//! The token for a user id is the lowercase hex HMAC-SHA256 digest of the id,
//! keyed with the organization's signing secret. In production the token is
//! computed server-side and handed to the client; the secret must never be
//! shipped to or stored on the client.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;
use waypoint_core::{IdentityVerifier, UserIdentity, VerificationToken};

type HmacSha256 = Hmac<Sha256>;

/// Compute the verification hash of a user id.
pub fn hash_user_id(user_id: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(user_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// [`IdentityVerifier`] backed by a shared signing secret.
pub struct HmacVerifier {
    secret: String,
}

impl HmacVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl IdentityVerifier for HmacVerifier {
    fn verify(&self, identity: &UserIdentity) -> VerificationToken {
        let token = VerificationToken::new(hash_user_id(identity.as_str(), &self.secret));
        debug!(user = %identity, token = token.fingerprint(), "Computed verification token");
        token
    }
}

impl std::fmt::Debug for HmacVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
