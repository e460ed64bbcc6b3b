use std::fmt;

use alloy_dyn_abi::TypedData;
use alloy_primitives::Address;
use k256::ecdsa::SigningKey;
use rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};
use sha3::{Digest, Keccak256};

use crate::address::{pubkey_to_address, to_checksum};
use crate::error::{AccountError, KeystoreError};
use crate::keystore::{KdfParams, Keystore};
use crate::network::Network;
use crate::signature::{hash_personal_message, normalize_recovery_byte, sign_digest};
use crate::storage::KeyStorage;
use crate::transaction::{SignedTransaction, Transaction};

/// A secp256k1 key pair and the address derived from it.
///
/// The public key and address are computed once at construction; nothing
/// about an `Account` changes afterwards, so it can be shared freely across
/// threads.
pub struct Account {
    signing_key: SigningKey,
    /// Uncompressed public key without the `0x04` SEC1 tag.
    public_key: [u8; 64],
    address: Address,
}

impl Account {
    /// Builds an account from a raw 32-byte private key.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, AccountError> {
        if private_key.len() != 32 {
            return Err(AccountError::LoadAccount(format!(
                "private key must be 32 bytes, got {}",
                private_key.len()
            )));
        }

        let signing_key = SigningKey::from_slice(private_key)
            .map_err(|e| AccountError::LoadAccount(format!("invalid private key: {e}")))?;
        Self::from_signing_key(signing_key)
    }

    fn from_signing_key(signing_key: SigningKey) -> Result<Self, AccountError> {
        let encoded = signing_key.verifying_key().to_encoded_point(false);
        let mut public_key = [0u8; 64];
        public_key.copy_from_slice(&encoded.as_bytes()[1..]);

        let address = pubkey_to_address(&public_key)
            .map_err(|e| AccountError::LoadAccount(e.to_string()))?;

        Ok(Self {
            signing_key,
            public_key,
            address,
        })
    }

    /// Loads an account from a passphrase-encrypted keystore.
    pub fn load(storage: &dyn KeyStorage, passphrase: &SecretString) -> Result<Self, AccountError> {
        let document = storage
            .load_private_key()
            .map_err(|e| AccountError::LoadAccount(e.to_string()))?;

        let keystore = Keystore::from_json(&document).map_err(load_error)?;
        let private_key = keystore
            .decrypt(passphrase.expose_secret().as_bytes())
            .map_err(load_error)?;

        let account = Self::from_private_key(&private_key)?;
        if account.address != keystore.address {
            return Err(load_error(KeystoreError::AddressMismatch {
                expected: to_checksum(&keystore.address),
                actual: to_checksum(&account.address),
            }));
        }

        tracing::debug!(address = %account.address, "loaded keystore account");
        Ok(account)
    }

    /// Loads an account whose storage holds the bare 32-byte private key.
    ///
    /// Prefer [`Account::load`]; this exists for applications that manage
    /// their own protection of the key material.
    pub fn load_raw(storage: &dyn KeyStorage) -> Result<Self, AccountError> {
        let private_key = storage
            .load_private_key()
            .map_err(|e| AccountError::LoadAccount(e.to_string()))?;
        Self::from_private_key(&private_key)
    }

    /// Generates a new key, stores it encrypted, and loads it back.
    pub fn create(storage: &dyn KeyStorage, passphrase: &SecretString) -> Result<Self, AccountError> {
        Self::create_with_params(storage, passphrase, KdfParams::default())
    }

    /// Like [`Account::create`] with explicit Argon2id cost parameters.
    ///
    /// The returned account is read back through [`Account::load`], so the
    /// stored and in-memory keys are the same bytes.
    pub fn create_with_params(
        storage: &dyn KeyStorage,
        passphrase: &SecretString,
        params: KdfParams,
    ) -> Result<Self, AccountError> {
        let generated = Self::from_signing_key(SigningKey::random(&mut OsRng))
            .map_err(|e| AccountError::CreateAccount(e.to_string()))?;

        let keystore = Keystore::encrypt(
            &generated.signing_key.to_bytes(),
            generated.address,
            passphrase.expose_secret().as_bytes(),
            params,
        )
        .map_err(create_error)?;
        let document = keystore.to_json().map_err(create_error)?;

        storage
            .store_private_key(document.as_bytes())
            .map_err(|e| AccountError::CreateAccount(e.to_string()))?;

        let account = Self::load(storage, passphrase)
            .map_err(|e| AccountError::CreateAccount(e.to_string()))?;
        tracing::debug!(address = %account.address, "created keystore account");
        Ok(account)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `0x`-prefixed hex of the 64-byte public key.
    pub fn public_key(&self) -> String {
        format!("0x{}", hex::encode(self.public_key))
    }

    /// `0x`-prefixed hex of the private key.
    pub fn private_key(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// Signs `payload`, hashing it with Keccak-256 first when `hash_first` is
    /// set. Without hashing the payload must already be a 32-byte digest.
    ///
    /// Returns `r || s || v` with the raw recovery id (`0` or `1`) in `v`.
    pub fn sign(&self, payload: &[u8], hash_first: bool) -> Result<Vec<u8>, AccountError> {
        if hash_first {
            sign_digest(&self.signing_key, &Keccak256::digest(payload))
        } else {
            sign_digest(&self.signing_key, payload)
        }
    }

    /// Hashes and signs arbitrary bytes.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>, AccountError> {
        self.sign(data, true)
    }

    /// Decodes a hex string (with or without `0x`), then hashes and signs it.
    pub fn sign_hex(&self, hex_data: &str) -> Result<Vec<u8>, AccountError> {
        let data = decode_hex(hex_data)?;
        self.sign(&data, true)
    }

    /// Signs a hex-encoded 32-byte digest as-is.
    pub fn sign_hash(&self, hash: &str) -> Result<Vec<u8>, AccountError> {
        let digest = decode_hex(hash)?;
        self.sign(&digest, false)
    }

    /// Signs a 32-byte digest as-is.
    pub fn sign_message(&self, digest: &[u8]) -> Result<Vec<u8>, AccountError> {
        self.sign(digest, false)
    }

    /// Hashes and signs the UTF-8 bytes of `message`.
    pub fn sign_utf8(&self, message: &str) -> Result<Vec<u8>, AccountError> {
        self.sign(message.as_bytes(), true)
    }

    /// Personal-message signature using the default network prefix.
    pub fn sign_personal_message(&self, message: &[u8]) -> Result<String, AccountError> {
        self.sign_personal_message_for(&Network::default(), message)
    }

    /// Signs `keccak256("\x19<Network> Signed Message:\n" + len + message)`
    /// and returns the hex signature with `v` in `{27, 28}`.
    pub fn sign_personal_message_for(
        &self,
        network: &Network,
        message: &[u8],
    ) -> Result<String, AccountError> {
        let hash = hash_personal_message(network, message);
        let signed = self.sign_message(hash.as_slice())?;
        let normalized = normalize_recovery_byte(signed)?;
        Ok(format!("0x{}", hex::encode(normalized)))
    }

    /// Signs the EIP-712 signing hash of `typed_data`, returning the hex
    /// signature with `v` in `{27, 28}`.
    pub fn sign_typed_data(&self, typed_data: &TypedData) -> Result<String, AccountError> {
        let hash = typed_data
            .eip712_signing_hash()
            .map_err(|e| AccountError::Sign(format!("typed data hash failed: {e}")))?;
        let signed = self.sign_message(hash.as_slice())?;
        let normalized = normalize_recovery_byte(signed)?;
        Ok(format!("0x{}", hex::encode(normalized)))
    }

    /// Signs a fully populated legacy transaction.
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, AccountError> {
        tx.sign_with(&self.signing_key)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

fn decode_hex(text: &str) -> Result<Vec<u8>, AccountError> {
    let stripped = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(stripped).map_err(|e| AccountError::Sign(format!("invalid hex input: {e}")))
}

fn load_error(e: KeystoreError) -> AccountError {
    tracing::debug!(error = %e, "keystore load failed");
    AccountError::LoadAccount(e.to_string())
}

fn create_error(e: KeystoreError) -> AccountError {
    AccountError::CreateAccount(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::tests::FAST_KDF;
    use crate::signature::recover_address;
    use crate::storage::MemoryKeyStorage;

    const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

    fn key_one() -> Account {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        Account::from_private_key(&privkey).unwrap()
    }

    fn passphrase(text: &str) -> SecretString {
        SecretString::from(text.to_string())
    }

    #[test]
    fn derives_known_address() {
        assert_eq!(to_checksum(&key_one().address()), KEY_ONE_ADDRESS);
    }

    #[test]
    fn hex_accessors_have_expected_lengths() {
        let account = key_one();
        assert_eq!(account.public_key().len(), 2 + 128);
        assert_eq!(
            account.private_key(),
            format!("0x{}01", "0".repeat(62))
        );
    }

    #[test]
    fn debug_hides_private_key() {
        let debug = format!("{:?}", key_one());
        assert!(debug.contains("address"));
        assert!(!debug.contains("signing_key"));
    }

    #[test]
    fn rejects_zero_and_short_keys() {
        assert!(Account::from_private_key(&[0u8; 32]).is_err());
        assert!(Account::from_private_key(&[1u8; 16]).is_err());
    }

    #[test]
    fn sign_without_hash_requires_digest() {
        let account = key_one();
        assert!(matches!(
            account.sign(b"not a digest", false),
            Err(AccountError::Sign(_))
        ));
        assert!(account.sign(b"any length is fine", true).is_ok());
    }

    #[test]
    fn sign_hex_matches_sign_data() {
        let account = key_one();
        let from_hex = account.sign_hex("0xdeadbeef").unwrap();
        let from_bytes = account.sign_data(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        assert_eq!(from_hex, from_bytes);
        assert_eq!(account.sign_hex("deadbeef").unwrap(), from_bytes);
    }

    #[test]
    fn sign_hex_rejects_malformed_input() {
        assert!(matches!(
            key_one().sign_hex("0xnot-hex"),
            Err(AccountError::Sign(_))
        ));
    }

    #[test]
    fn sign_hash_signs_digest_unhashed() {
        let account = key_one();
        let digest = [0x11u8; 32];
        let from_text = account.sign_hash(&format!("0x{}", hex::encode(digest))).unwrap();
        assert_eq!(from_text, account.sign_message(&digest).unwrap());
        assert_eq!(recover_address(&digest, &from_text).unwrap(), account.address());
    }

    #[test]
    fn sign_utf8_hashes_message() {
        let account = key_one();
        let sig = account.sign_utf8("hello").unwrap();
        let digest = Keccak256::digest(b"hello");
        assert_eq!(recover_address(&digest, &sig).unwrap(), account.address());
    }

    #[test]
    fn personal_message_recovers_to_signer() {
        let account = key_one();
        for message in [&b""[..], b"hello", b"a much longer message with spaces"] {
            let sig_hex = account.sign_personal_message(message).unwrap();
            let sig = hex::decode(sig_hex.trim_start_matches("0x")).unwrap();

            assert!(sig[64] == 27 || sig[64] == 28);
            let hash = hash_personal_message(&Network::default(), message);
            assert_eq!(recover_address(hash.as_slice(), &sig).unwrap(), account.address());
        }
    }

    #[test]
    fn personal_message_prefix_depends_on_network() {
        let account = key_one();
        let custom = Network {
            message_prefix: "Ethereum".into(),
            ..Network::default()
        };
        assert_ne!(
            account.sign_personal_message(b"hi").unwrap(),
            account.sign_personal_message_for(&custom, b"hi").unwrap()
        );
    }

    #[test]
    fn typed_data_signature_recovers() {
        let json = r#"{
            "types": {
                "EIP712Domain": [
                    {"name": "name", "type": "string"},
                    {"name": "version", "type": "string"},
                    {"name": "chainId", "type": "uint256"},
                    {"name": "verifyingContract", "type": "address"}
                ],
                "Person": [
                    {"name": "name", "type": "string"},
                    {"name": "wallet", "type": "address"}
                ],
                "Mail": [
                    {"name": "from", "type": "Person"},
                    {"name": "to", "type": "Person"},
                    {"name": "contents", "type": "string"}
                ]
            },
            "primaryType": "Mail",
            "domain": {
                "name": "Ether Mail",
                "version": "1",
                "chainId": 1,
                "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
            },
            "message": {
                "from": {"name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"},
                "to": {"name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"},
                "contents": "Hello, Bob!"
            }
        }"#;
        let typed: TypedData = serde_json::from_str(json).unwrap();
        let account = key_one();

        let sig_hex = account.sign_typed_data(&typed).unwrap();
        let sig = hex::decode(sig_hex.trim_start_matches("0x")).unwrap();
        assert!(sig[64] == 27 || sig[64] == 28);

        let hash = typed.eip712_signing_hash().unwrap();
        assert_eq!(recover_address(hash.as_slice(), &sig).unwrap(), account.address());
    }

    #[test]
    fn create_then_load_yields_same_account() {
        let storage = MemoryKeyStorage::new();
        let pass = passphrase("correct horse");

        let created = Account::create_with_params(&storage, &pass, FAST_KDF).unwrap();
        let first = Account::load(&storage, &pass).unwrap();
        let second = Account::load(&storage, &pass).unwrap();

        assert_eq!(created.address(), first.address());
        assert_eq!(first.address(), second.address());
        assert_eq!(created.private_key(), second.private_key());
    }

    #[test]
    fn wrong_passphrase_fails_every_time() {
        let storage = MemoryKeyStorage::new();
        Account::create_with_params(&storage, &passphrase("right"), FAST_KDF).unwrap();

        for _ in 0..2 {
            match Account::load(&storage, &passphrase("wrong")) {
                Err(AccountError::LoadAccount(_)) => {}
                other => panic!("expected LoadAccount, got {:?}", other),
            }
        }
    }

    #[test]
    fn load_from_empty_storage_fails() {
        let storage = MemoryKeyStorage::new();
        assert!(matches!(
            Account::load(&storage, &passphrase("pw")),
            Err(AccountError::LoadAccount(_))
        ));
        assert!(matches!(
            Account::load_raw(&storage),
            Err(AccountError::LoadAccount(_))
        ));
    }

    #[test]
    fn load_rejects_tampered_address() {
        let storage = MemoryKeyStorage::new();
        let pass = passphrase("pw");
        Account::create_with_params(&storage, &pass, FAST_KDF).unwrap();

        let mut keystore = Keystore::from_json(&storage.load_private_key().unwrap()).unwrap();
        keystore.address = Address::repeat_byte(0x11);
        storage
            .store_private_key(keystore.to_json().unwrap().as_bytes())
            .unwrap();

        match Account::load(&storage, &pass) {
            Err(AccountError::LoadAccount(msg)) => assert!(msg.contains("mismatch")),
            other => panic!("expected LoadAccount, got {:?}", other),
        }
    }

    #[test]
    fn load_raw_reads_bare_key() {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        let storage = MemoryKeyStorage::with_key(&privkey);

        let account = Account::load_raw(&storage).unwrap();
        assert_eq!(to_checksum(&account.address()), KEY_ONE_ADDRESS);
    }

    #[test]
    fn create_fails_with_invalid_kdf_params() {
        let storage = MemoryKeyStorage::new();
        let params = KdfParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(
            Account::create_with_params(&storage, &passphrase("pw"), params),
            Err(AccountError::CreateAccount(_))
        ));
    }
}
