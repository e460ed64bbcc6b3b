//! Passphrase-encrypted private key documents.
//!
//! A keystore is a JSON document holding a private key encrypted with
//! AES-256-GCM under a key derived from the passphrase with Argon2id. The KDF
//! parameters and salt travel with the document so a keystore written with
//! one parameter set can always be opened later.

use aes_gcm::aead::{Aead, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce};
use alloy_primitives::{Address, Bytes};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::error::KeystoreError;

/// Current keystore document version.
pub const KEYSTORE_VERSION: u32 = 1;

/// AES-256-GCM nonce size in bytes.
const NONCE_SIZE: usize = 12;

/// Argon2id salt size in bytes.
const SALT_SIZE: usize = 16;

const KDF_NAME: &str = "argon2id";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MiB, 3 passes, 4 lanes.
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Serialized keystore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    /// Address of the encrypted key, checked again after decryption.
    pub address: Address,
    pub crypto: KeystoreCrypto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub kdf: String,
    pub kdfparams: StoredKdfParams,
    /// `nonce (12 bytes) || ciphertext || tag`.
    pub ciphertext: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredKdfParams {
    #[serde(flatten)]
    pub params: KdfParams,
    pub salt: Bytes,
}

impl Keystore {
    /// Encrypts `private_key` under `passphrase`.
    pub fn encrypt(
        private_key: &[u8],
        address: Address,
        passphrase: &[u8],
        params: KdfParams,
    ) -> Result<Self, KeystoreError> {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let mut key = derive_key(passphrase, &salt, params)?;
        let ciphertext = encrypt(private_key, &key);
        key.zeroize();

        Ok(Self {
            version: KEYSTORE_VERSION,
            address,
            crypto: KeystoreCrypto {
                kdf: KDF_NAME.to_string(),
                kdfparams: StoredKdfParams {
                    params,
                    salt: Bytes::copy_from_slice(&salt),
                },
                ciphertext: Bytes::from(ciphertext?),
            },
        })
    }

    /// Decrypts the private key. A wrong passphrase fails the GCM tag check.
    pub fn decrypt(&self, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>, KeystoreError> {
        if self.version != KEYSTORE_VERSION {
            return Err(KeystoreError::InvalidFormat(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.crypto.kdf != KDF_NAME {
            return Err(KeystoreError::InvalidFormat(format!(
                "unsupported kdf {}",
                self.crypto.kdf
            )));
        }

        let salt = self.crypto.kdfparams.salt.as_ref();
        let mut key = derive_key(passphrase, salt, self.crypto.kdfparams.params)?;
        let plaintext = decrypt(&self.crypto.ciphertext, &key);
        key.zeroize();

        plaintext.map(Zeroizing::new)
    }

    pub fn to_json(&self) -> Result<String, KeystoreError> {
        serde_json::to_string(self)
            .map_err(|e| KeystoreError::InvalidFormat(format!("serialization failed: {e}")))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, KeystoreError> {
        serde_json::from_slice(bytes)
            .map_err(|e| KeystoreError::InvalidFormat(format!("deserialization failed: {e}")))
    }
}

fn derive_key(passphrase: &[u8], salt: &[u8], params: KdfParams) -> Result<[u8; 32], KeystoreError> {
    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| KeystoreError::KdfFailed(format!("invalid argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut output = [0u8; 32];
    argon2
        .hash_password_into(passphrase, salt, &mut output)
        .map_err(|e| KeystoreError::KdfFailed(format!("argon2 hash failed: {e}")))?;

    Ok(output)
}

fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>, KeystoreError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| KeystoreError::EncryptionFailed(e.to_string()))?;

    let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

fn decrypt(ciphertext_with_nonce: &[u8], key: &[u8; 32]) -> Result<Vec<u8>, KeystoreError> {
    if ciphertext_with_nonce.len() < NONCE_SIZE {
        return Err(KeystoreError::InvalidFormat(format!(
            "ciphertext too short: expected at least {} bytes, got {}",
            NONCE_SIZE,
            ciphertext_with_nonce.len()
        )));
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| KeystoreError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests do not spend seconds in Argon2.
    pub(crate) const FAST_KDF: KdfParams = KdfParams {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    };

    fn sample_key() -> Vec<u8> {
        (1u8..=32).collect()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = sample_key();
        let keystore = Keystore::encrypt(&key, Address::ZERO, b"passphrase", FAST_KDF).unwrap();

        let decrypted = keystore.decrypt(b"passphrase").unwrap();
        assert_eq!(decrypted.as_slice(), key.as_slice());
    }

    #[test]
    fn wrong_passphrase_fails() {
        let keystore =
            Keystore::encrypt(&sample_key(), Address::ZERO, b"correct", FAST_KDF).unwrap();

        match keystore.decrypt(b"wrong") {
            Err(KeystoreError::DecryptionFailed(_)) => {}
            other => panic!("expected DecryptionFailed, got {:?}", other),
        }
    }

    #[test]
    fn ciphertext_layout_has_nonce_and_tag() {
        let keystore = Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        assert_eq!(keystore.crypto.ciphertext.len(), NONCE_SIZE + 32 + 16);
        assert_eq!(keystore.crypto.kdfparams.salt.len(), SALT_SIZE);
    }

    #[test]
    fn same_key_encrypts_differently() {
        let a = Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        let b = Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        assert_ne!(a.crypto.ciphertext, b.crypto.ciphertext);
    }

    #[test]
    fn json_roundtrip_preserves_params() {
        let keystore = Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        let json = keystore.to_json().unwrap();
        assert!(json.contains("\"kdf\":\"argon2id\""));
        assert!(json.contains("\"memory_kib\":256"));

        let parsed = Keystore::from_json(json.as_bytes()).unwrap();
        assert_eq!(parsed.crypto.kdfparams.params, FAST_KDF);
        assert_eq!(parsed.decrypt(b"pw").unwrap().as_slice(), sample_key().as_slice());
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let mut keystore =
            Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        keystore.crypto.ciphertext = Bytes::from_static(&[0u8; 5]);

        match keystore.decrypt(b"pw") {
            Err(KeystoreError::InvalidFormat(msg)) => assert!(msg.contains("too short")),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn unknown_kdf_is_rejected() {
        let mut keystore =
            Keystore::encrypt(&sample_key(), Address::ZERO, b"pw", FAST_KDF).unwrap();
        keystore.crypto.kdf = "scrypt".into();
        assert!(matches!(
            keystore.decrypt(b"pw"),
            Err(KeystoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn garbage_json_is_rejected() {
        assert!(Keystore::from_json(b"not json").is_err());
    }

    #[test]
    fn default_params_match_argon2id_profile() {
        let params = KdfParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }
}
