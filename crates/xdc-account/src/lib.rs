//! Account keys for XDC-family networks.
//!
//! This crate provides:
//! - Key pairs with eagerly derived addresses ([`Account`])
//! - Raw, personal-message and EIP-712 typed-data signing
//! - Passphrase-encrypted keystores (Argon2id + AES-256-GCM)
//! - Pluggable key storage backends
//! - Legacy (EIP-155) transaction signing
//! - `0x` / `xdc` address text forms

pub mod account;
pub mod address;
pub mod error;
pub mod keystore;
pub mod network;
pub mod signature;
pub mod storage;
pub mod transaction;

pub use account::Account;
pub use error::{AccountError, AddressError, KeystoreError, StorageError};
pub use keystore::KdfParams;
pub use network::Network;
pub use storage::{FileKeyStorage, KeyStorage, MemoryKeyStorage};
pub use transaction::{SignedTransaction, Transaction};
