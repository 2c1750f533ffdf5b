use crate::{CryptoService, Error, Message, MessageStore, Participant};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Returned by [`MessageGateway::render`] when the recipient cannot decrypt.
pub const UNABLE_TO_DECRYPT: &str = "[Unable to decrypt message]";

/// One entry of a participant's conversation view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationLine {
    /// Sent by the viewer; carries the retained plaintext.
    Outgoing { receiver: String, text: String },
    /// Addressed to the viewer; carries the rendered text.
    Incoming { sender: String, text: String },
}

/// Encrypts outgoing messages for their receiver and gates reads so only the
/// receiver sees decrypted content.
#[derive(Clone, Debug)]
pub struct MessageGateway {
    crypto: CryptoService,
    store: Arc<MessageStore>,
}

impl MessageGateway {
    pub fn new(crypto: CryptoService, store: Arc<MessageStore>) -> Self {
        Self { crypto, store }
    }

    pub fn store(&self) -> &Arc<MessageStore> {
        &self.store
    }

    /// Encrypts `plaintext` under the receiver's public key and appends the
    /// message. Nothing is recorded if encryption fails.
    pub fn send(
        &self,
        sender: &Participant,
        receiver: &Participant,
        plaintext: &str,
    ) -> Result<Arc<Message>, Error> {
        let ciphertext = self
            .crypto
            .encrypt(plaintext, receiver.public_key())
            .inspect_err(|err| {
                warn!(sender = sender.id(), receiver = receiver.id(), error = %err, "send failed");
            })?;
        let ciphertext_len = ciphertext.len();

        let message = self.store.append(
            sender.display_name(),
            receiver.display_name(),
            plaintext,
            ciphertext,
        );

        info!(
            sender = sender.id(),
            receiver = receiver.id(),
            ciphertext_len,
            "message sent"
        );

        Ok(message)
    }

    /// Renders `message` for `viewer`.
    ///
    /// The receiver gets the decrypted text, or [`UNABLE_TO_DECRYPT`] if
    /// decryption fails. Anyone else, the sender included, gets the
    /// ciphertext unchanged.
    pub fn render(&self, message: &Message, viewer: &Participant) -> String {
        if viewer.display_name() != message.receiver() {
            debug!(viewer = viewer.id(), "viewer is not the receiver");
            return message.ciphertext().to_string();
        }

        match self.crypto.decrypt(message.ciphertext(), viewer.private_key()) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                warn!(viewer = viewer.id(), error = %err, "could not decrypt message");
                UNABLE_TO_DECRYPT.to_string()
            }
        }
    }

    /// The viewer's conversation, oldest first: its own messages as sent, and
    /// messages addressed to it as rendered. Other traffic is skipped.
    pub fn conversation_for(&self, viewer: &Participant) -> Vec<ConversationLine> {
        self.store
            .all_messages()
            .iter()
            .filter_map(|message| {
                if message.sender() == viewer.display_name() {
                    Some(ConversationLine::Outgoing {
                        receiver: message.receiver().to_string(),
                        text: message.plaintext().to_string(),
                    })
                } else if message.receiver() == viewer.display_name() {
                    Some(ConversationLine::Incoming {
                        sender: message.sender().to_string(),
                        text: self.render(message, viewer),
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}
