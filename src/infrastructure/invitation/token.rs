//! Invitation token generation
//!
//! Generates cryptographically secure single-use invitation tokens with
//! hashing. The raw token is shown once; only the digest is stored and
//! it doubles as the invitation's record key.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Result of generating a new invitation token
#[derive(Debug, Clone)]
pub struct GeneratedToken {
    /// The full token (only shown once at creation)
    pub token: String,
    /// The hashed token for storage
    pub digest: String,
}

/// Generator for secure invitation tokens
#[derive(Debug, Clone)]
pub struct InvitationTokenGenerator {
    /// Prefix for all generated tokens (e.g., "inv_")
    prefix: String,
    /// Number of random bytes to generate
    token_bytes: usize,
}

impl InvitationTokenGenerator {
    /// Create a new token generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            token_bytes: 32,
        }
    }

    /// Generate a new invitation token
    pub fn generate(&self) -> GeneratedToken {
        let mut random_bytes = vec![0u8; self.token_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        let token = format!("{}{}", self.prefix, encoded);
        let digest = self.digest(&token);

        GeneratedToken { token, digest }
    }

    /// Hash a token for storage and lookup.
    ///
    /// The digest is the invitation's record key, so presenting a token
    /// resolves to at most one row and no raw token is ever compared at
    /// rest.
    pub fn digest(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        format!("sha256${}", URL_SAFE_NO_PAD.encode(result))
    }
}

impl Default for InvitationTokenGenerator {
    fn default() -> Self {
        Self::new("inv_")
    }
}
