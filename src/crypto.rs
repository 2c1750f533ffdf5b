use crate::Error;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroize;

/// Smallest modulus accepted for participant key pairs.
pub const MIN_KEY_BITS: usize = 2048;

/// PKCS#1 v1.5 encryption padding overhead, in bytes.
const PKCS1_V15_OVERHEAD: usize = 11;

fn engine() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::STANDARD
}

/// The public half of a participant's RSA key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantPublicKey(RsaPublicKey);

impl ParticipantPublicKey {
    /// Size of the modulus in bits.
    pub fn bits(&self) -> usize {
        self.0.size() * 8
    }

    /// Largest plaintext, in bytes, that fits in a single encrypted block.
    pub fn max_payload(&self) -> usize {
        self.0.size().saturating_sub(PKCS1_V15_OVERHEAD)
    }

    /// Encodes the key as Base64 SubjectPublicKeyInfo DER.
    pub fn to_base64_der(&self) -> Result<String, Error> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|_| Error::Encryption("public key could not be encoded".to_string()))?;
        Ok(engine().encode(der.as_bytes()))
    }

    /// Decodes a key produced by [`ParticipantPublicKey::to_base64_der`].
    ///
    /// Keys with a modulus below [`MIN_KEY_BITS`] are rejected.
    pub fn from_base64_der(encoded: &str) -> Result<Self, Error> {
        let der = engine()
            .decode(encoded)
            .map_err(|_| Error::Encryption("invalid public key".to_string()))?;
        let key = Self(
            RsaPublicKey::from_public_key_der(&der)
                .map_err(|_| Error::Encryption("invalid public key".to_string()))?,
        );
        if key.bits() < MIN_KEY_BITS {
            return Err(Error::Encryption(format!(
                "public key of {} bits is below the {MIN_KEY_BITS}-bit minimum",
                key.bits()
            )));
        }
        Ok(key)
    }
}

/// The private half of a participant's RSA key pair. Zeroized on drop.
#[derive(Clone)]
pub struct ParticipantPrivateKey(RsaPrivateKey);

impl ParticipantPrivateKey {
    pub fn public_key(&self) -> ParticipantPublicKey {
        ParticipantPublicKey(self.0.to_public_key())
    }
}

impl fmt::Debug for ParticipantPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ParticipantPrivateKey(..)")
    }
}

impl From<RsaPrivateKey> for ParticipantPrivateKey {
    fn from(value: RsaPrivateKey) -> Self {
        Self(value)
    }
}

/// A participant's key pair. Generated once and never rotated.
#[derive(Clone, Debug)]
pub struct KeyPair {
    public: ParticipantPublicKey,
    private: ParticipantPrivateKey,
}

impl KeyPair {
    pub fn public_key(&self) -> &ParticipantPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &ParticipantPrivateKey {
        &self.private
    }
}

impl From<RsaPrivateKey> for KeyPair {
    fn from(value: RsaPrivateKey) -> Self {
        let private = ParticipantPrivateKey::from(value);
        Self {
            public: private.public_key(),
            private,
        }
    }
}

/// Generates key pairs and performs single-block RSA encryption with
/// PKCS#1 v1.5 padding. Ciphertexts are Base64 (standard alphabet).
#[derive(Clone, Debug)]
pub struct CryptoService {
    key_bits: usize,
}

impl CryptoService {
    /// Creates a service producing `key_bits`-bit keys.
    pub fn new(key_bits: usize) -> Result<Self, Error> {
        if key_bits < MIN_KEY_BITS {
            return Err(Error::Config(format!(
                "key size of {key_bits} bits is below the {MIN_KEY_BITS}-bit minimum"
            )));
        }
        Ok(Self { key_bits })
    }

    pub fn key_bits(&self) -> usize {
        self.key_bits
    }

    /// Generates a fresh, independent key pair.
    pub fn generate_key_pair(&self) -> Result<KeyPair, Error> {
        let private = RsaPrivateKey::new(&mut OsRng, self.key_bits)
            .map_err(|e| Error::Registration(format!("key generation failed: {e}")))?;
        Ok(KeyPair::from(private))
    }

    /// Encrypts `plaintext` under `public_key`.
    ///
    /// Padding is randomized, so two encryptions of the same plaintext differ.
    /// Plaintexts longer than [`ParticipantPublicKey::max_payload`] bytes are
    /// rejected rather than truncated.
    pub fn encrypt(
        &self,
        plaintext: &str,
        public_key: &ParticipantPublicKey,
    ) -> Result<String, Error> {
        let payload = plaintext.as_bytes();
        let capacity = public_key.max_payload();
        if payload.len() > capacity {
            return Err(Error::Encryption(format!(
                "payload of {} bytes exceeds the {capacity}-byte capacity of the key",
                payload.len()
            )));
        }

        let ciphertext = public_key
            .0
            .encrypt(&mut OsRng, Pkcs1v15Encrypt, payload)
            .map_err(|_| Error::Encryption("public key rejected the payload".to_string()))?;

        Ok(engine().encode(ciphertext))
    }

    /// Recovers the plaintext of `ciphertext` with `private_key`.
    pub fn decrypt(
        &self,
        ciphertext: &str,
        private_key: &ParticipantPrivateKey,
    ) -> Result<String, Error> {
        let bytes = engine()
            .decode(ciphertext)
            .map_err(|_| Error::Decryption("ciphertext is not valid Base64".to_string()))?;

        let decrypted = private_key
            .0
            .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, &bytes)
            .map_err(|_| {
                Error::Decryption("ciphertext does not match the private key".to_string())
            })?;

        String::from_utf8(decrypted).map_err(|err| {
            let mut bytes = err.into_bytes();
            bytes.zeroize();
            Error::Decryption("decrypted payload is not valid UTF-8".to_string())
        })
    }
}

impl Default for CryptoService {
    fn default() -> Self {
        Self {
            key_bits: MIN_KEY_BITS,
        }
    }
}
