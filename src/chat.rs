use crate::{
    ChatConfig, CryptoService, Error, MessageGateway, MessageStore, Participant, Registry, digest,
};
use std::sync::Arc;
use tracing::info;

/// The chat core, built once at startup and handed to every collaborator.
///
/// Holds the participant registry, the shared message store and the gateway
/// that writes to it.
#[derive(Clone, Debug)]
pub struct SecureChat {
    registry: Arc<Registry>,
    gateway: MessageGateway,
}

impl SecureChat {
    /// Builds the core and registers `config.seed_participants` in order.
    pub fn new(config: ChatConfig) -> Result<Self, Error> {
        let crypto = CryptoService::new(config.key_bits)?;
        let registry = Arc::new(Registry::new(crypto.clone(), config.duplicate_policy));
        let gateway = MessageGateway::new(crypto, Arc::new(MessageStore::new()));

        for seed in &config.seed_participants {
            registry.register(&seed.id, &seed.display_name, &seed.secret)?;
        }
        if !config.seed_participants.is_empty() {
            info!(count = config.seed_participants.len(), "seeded participants");
        }

        Ok(Self { registry, gateway })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        self.gateway.store()
    }

    pub fn gateway(&self) -> &MessageGateway {
        &self.gateway
    }

    /// Digests `raw_secret` and authenticates by display name.
    pub fn login(&self, display_name: &str, raw_secret: &str) -> Result<Arc<Participant>, Error> {
        self.registry.authenticate(display_name, &digest(raw_secret))
    }
}
