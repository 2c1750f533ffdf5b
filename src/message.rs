use std::fmt;

/// A message as recorded by the store.
///
/// Both the sender's plaintext and the ciphertext under the receiver's public
/// key are retained. The plaintext copy is not protected at rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    sender: String,
    receiver: String,
    plaintext: String,
    ciphertext: String,
}

impl Message {
    pub(crate) fn new(
        sender: String,
        receiver: String,
        plaintext: String,
        ciphertext: String,
    ) -> Self {
        Self {
            sender,
            receiver,
            plaintext,
            ciphertext,
        }
    }

    /// Display name of the sender at send time.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Display name of the intended receiver at send time.
    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// Base64 ciphertext under the receiver's public key.
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plaintext)
    }
}
