/// Errors raised by the registry, the crypto service and the message gateway.
///
/// Messages never carry plaintext, secrets or key material.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    /// Key pair generation failed while registering a participant.
    #[error("Registration failed: {0}")]
    Registration(String),

    /// No participant matched the supplied name and credential digest.
    #[error("Credential mismatch")]
    CredentialMismatch,

    /// Encryption under a public key failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption under a private key failed.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// A participant with the same id or display name already exists.
    #[error("Participant already registered: {0}")]
    DuplicateParticipant(String),

    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An observer rejected a change notification.
    #[error("Observer failed: {0}")]
    Observer(String),
}
