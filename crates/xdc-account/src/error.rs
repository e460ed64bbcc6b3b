use thiserror::Error;

/// Account lifecycle and signing errors.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("failed to create account: {0}")]
    CreateAccount(String),

    #[error("failed to load account: {0}")]
    LoadAccount(String),

    #[error("signing error: {0}")]
    Sign(String),
}

/// Keystore encryption and decoding errors.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("key derivation failed: {0}")]
    KdfFailed(String),

    #[error("invalid keystore: {0}")]
    InvalidFormat(String),

    #[error("keystore address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: String, actual: String },
}

/// Errors raised by a [`KeyStorage`](crate::storage::KeyStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no key stored")]
    Empty,

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Address parsing and derivation errors.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
