use crate::{
    CredentialDigest, CryptoService, DuplicatePolicy, Error, Participant, Subscribers, digest,
};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Raised to registry observers after every successful registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Registered { id: String, display_name: String },
}

/// Owns every registered participant, in registration order.
///
/// Lookups scan linearly and return the first match, so duplicate ids or
/// display names (accepted under [`DuplicatePolicy::Allow`]) resolve to the
/// earliest registration.
#[derive(Debug)]
pub struct Registry {
    crypto: CryptoService,
    duplicate_policy: DuplicatePolicy,
    participants: RwLock<Vec<Arc<Participant>>>,
    subscribers: Subscribers<RegistryEvent>,
}

impl Registry {
    pub fn new(crypto: CryptoService, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            crypto,
            duplicate_policy,
            participants: RwLock::new(Vec::new()),
            subscribers: Subscribers::new(),
        }
    }

    /// Registers a participant, generating its key pair.
    ///
    /// Only the digest of `raw_secret` is kept. Observers may register
    /// further participants from inside the notification; those are
    /// announced after the current one.
    pub fn register(
        &self,
        id: &str,
        display_name: &str,
        raw_secret: &str,
    ) -> Result<Arc<Participant>, Error> {
        // Fail before key generation; re-checked once the write is serialized.
        self.check_duplicate(id, display_name)?;

        let credential_digest = digest(raw_secret);
        let key_pair = self.crypto.generate_key_pair()?;

        self.subscribers.publish(|| {
            self.check_duplicate(id, display_name)?;

            let participant = Arc::new(Participant::new(
                id.to_string(),
                display_name.to_string(),
                credential_digest,
                key_pair,
            ));
            self.participants
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::clone(&participant));

            info!(id, display_name, "participant registered");

            let event = RegistryEvent::Registered {
                id: id.to_string(),
                display_name: display_name.to_string(),
            };
            Ok((participant, event))
        })
    }

    /// Returns the first participant named `display_name` whose stored digest
    /// equals `secret_digest`. The caller digests the secret.
    pub fn authenticate(
        &self,
        display_name: &str,
        secret_digest: &CredentialDigest,
    ) -> Result<Arc<Participant>, Error> {
        let found = self.find_first(|p| {
            p.display_name() == display_name && p.credential_digest() == secret_digest
        });

        match found {
            Some(participant) => {
                debug!(display_name, "participant authenticated");
                Ok(participant)
            }
            None => {
                warn!(display_name, "authentication failed");
                Err(Error::CredentialMismatch)
            }
        }
    }

    /// Like [`Registry::authenticate`], but matches on the participant id.
    pub fn verify_credentials(
        &self,
        id: &str,
        secret_digest: &CredentialDigest,
    ) -> Result<Arc<Participant>, Error> {
        match self.find_first(|p| p.id() == id && p.credential_digest() == secret_digest) {
            Some(participant) => {
                debug!(id, "participant credentials verified");
                Ok(participant)
            }
            None => {
                warn!(id, "credential check failed");
                Err(Error::CredentialMismatch)
            }
        }
    }

    pub fn find_by_display_name(&self, display_name: &str) -> Option<Arc<Participant>> {
        self.find_first(|p| p.display_name() == display_name)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<Participant>> {
        self.find_first(|p| p.id() == id)
    }

    /// All participants in registration order.
    pub fn list_all(&self) -> Vec<Arc<Participant>> {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everyone `viewer` can address: all participants not sharing its display name.
    pub fn contacts_for(&self, viewer: &Participant) -> Vec<Arc<Participant>> {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| p.display_name() != viewer.display_name())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to [`RegistryEvent`]s.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&RegistryEvent) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.subscribers.subscribe(observer);
    }

    fn check_duplicate(&self, id: &str, display_name: &str) -> Result<(), Error> {
        if self.duplicate_policy == DuplicatePolicy::Allow {
            return Ok(());
        }
        if self.find_by_id(id).is_some() {
            return Err(Error::DuplicateParticipant(format!("id {id}")));
        }
        if self.find_by_display_name(display_name).is_some() {
            return Err(Error::DuplicateParticipant(format!(
                "display name {display_name}"
            )));
        }
        Ok(())
    }

    fn find_first<P>(&self, predicate: P) -> Option<Arc<Participant>>
    where
        P: Fn(&Participant) -> bool,
    {
        self.participants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|p| predicate(p))
            .cloned()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(CryptoService::default(), DuplicatePolicy::default())
    }
}
