use crate::MIN_KEY_BITS;
use std::fmt;
use zeroize::Zeroize;

/// What `register` does when the id or display name is already taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Accept the duplicate; lookups return the first match.
    #[default]
    Allow,
    /// Refuse with [`crate::Error::DuplicateParticipant`].
    Reject,
}

/// A participant registered when the chat core starts.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedParticipant {
    pub id: String,
    pub display_name: String,
    pub secret: String,
}

impl SeedParticipant {
    pub fn new(id: &str, display_name: &str, secret: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            secret: secret.to_string(),
        }
    }
}

impl Drop for SeedParticipant {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for SeedParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedParticipant")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// RSA modulus size for participant key pairs.
    pub key_bits: usize,
    pub duplicate_policy: DuplicatePolicy,
    /// Registered in order at startup.
    pub seed_participants: Vec<SeedParticipant>,
}

impl ChatConfig {
    /// Default configuration preloaded with the demo accounts.
    pub fn demo() -> Self {
        Self {
            seed_participants: vec![
                SeedParticipant::new("1", "admin", "admin123"),
                SeedParticipant::new("2", "alice", "password"),
                SeedParticipant::new("3", "bob", "123456"),
                SeedParticipant::new("4", "charlie", "secure"),
            ],
            ..Self::default()
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            key_bits: MIN_KEY_BITS,
            duplicate_policy: DuplicatePolicy::Allow,
            seed_participants: Vec::new(),
        }
    }
}
