use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a rendered credential digest, in hex characters.
pub const DIGEST_HEX_LEN: usize = 64;

/// One-way verifier of a secret: unsalted SHA-256 rendered as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CredentialDigest(String);

impl CredentialDigest {
    /// Parses a digest produced elsewhere. Only the exact form [`digest`]
    /// renders is accepted: 64 lowercase hex characters. Comparison is
    /// case-sensitive, so an uppercase rendering is not the same credential.
    pub fn from_hex(value: &str) -> Option<Self> {
        let well_formed = value.len() == DIGEST_HEX_LEN
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CredentialDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Hashes `secret` (as UTF-8) into its credential digest.
pub fn digest(secret: &str) -> CredentialDigest {
    let hash = Sha256::digest(secret.as_bytes());
    CredentialDigest(hex::encode(hash))
}
