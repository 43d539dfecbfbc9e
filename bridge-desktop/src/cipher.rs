//! Credential encryption using AES-256-GCM

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::error::{BridgeError, Result};
use std::fmt;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Symmetric cipher for credential values.
///
/// Stored form is `base64(nonce || ciphertext || tag)`. A fresh nonce is
/// drawn for every call to [`CredentialCipher::encrypt`].
#[derive(Clone)]
pub struct CredentialCipher {
    key_bytes: [u8; 32],
}

impl CredentialCipher {
    /// Create from a 32-byte key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key_bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            BridgeError::Credential(format!(
                "Invalid key length {}. Expected 32 bytes for AES-256.",
                bytes.len()
            ))
        })?;
        Ok(Self { key_bytes })
    }

    /// Create from a 64-character hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| BridgeError::Credential(format!("Invalid hex key: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Generate a random key.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(key.as_slice());
        Self { key_bytes }
    }

    /// Hex form of the key, for operators provisioning configuration.
    pub fn to_hex(&self) -> String {
        hex::encode(self.key_bytes)
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.key_bytes)
            .map_err(|e| BridgeError::Credential(format!("Invalid key: {}", e)))
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| BridgeError::Credential(format!("Encryption failed: {}", e)))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let sealed = STANDARD
            .decode(encoded)
            .map_err(|e| BridgeError::Credential(format!("Invalid encoding: {}", e)))?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(BridgeError::Credential(
                "Invalid ciphertext: too short".to_string(),
            ));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher()?
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| BridgeError::Credential(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext)
            .map_err(|e| BridgeError::Credential(format!("Invalid UTF-8: {}", e)))
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("key_bytes", &"[REDACTED]")
            .finish()
    }
}
