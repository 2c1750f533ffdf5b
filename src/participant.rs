use crate::{CredentialDigest, KeyPair, ParticipantPrivateKey, ParticipantPublicKey};
use std::fmt;

/// A registered identity: caller-assigned id, display name, credential
/// verifier and the key pair generated at registration.
///
/// Participants are immutable once registered.
#[derive(Clone, Debug)]
pub struct Participant {
    id: String,
    display_name: String,
    credential_digest: CredentialDigest,
    key_pair: KeyPair,
}

impl Participant {
    pub(crate) fn new(
        id: String,
        display_name: String,
        credential_digest: CredentialDigest,
        key_pair: KeyPair,
    ) -> Self {
        Self {
            id,
            display_name,
            credential_digest,
            key_pair,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn credential_digest(&self) -> &CredentialDigest {
        &self.credential_digest
    }

    pub fn public_key(&self) -> &ParticipantPublicKey {
        self.key_pair.public_key()
    }

    pub fn private_key(&self) -> &ParticipantPrivateKey {
        self.key_pair.private_key()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}
