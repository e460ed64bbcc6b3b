use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::SigningKey;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::AccountError;
use crate::signature::sign_digest;

/// An outbound transaction as built by the call pipeline.
///
/// Nonce, gas and chain id may be left empty by the builder and filled in by
/// the transport before signing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub nonce: Option<u64>,
    pub gas_price: Option<U256>,
    pub gas_limit: Option<U256>,
    pub chain_id: Option<u64>,
}

/// A signed legacy (EIP-155) transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw_tx: Bytes,
    /// Keccak-256 of `raw_tx`.
    pub tx_hash: B256,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw_tx))
    }
}

/// `[nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]`
#[derive(RlpEncodable)]
struct UnsignedLegacyFields {
    nonce: u64,
    gas_price: U256,
    gas_limit: U256,
    to: Address,
    value: U256,
    data: Bytes,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

/// `[nonce, gasPrice, gasLimit, to, value, data, v, r, s]`
#[derive(RlpEncodable)]
struct SignedLegacyFields {
    nonce: u64,
    gas_price: U256,
    gas_limit: U256,
    to: Address,
    value: U256,
    data: Bytes,
    v: u64,
    r: U256,
    s: U256,
}

struct Filled {
    nonce: u64,
    gas_price: U256,
    gas_limit: U256,
    chain_id: u64,
}

impl Transaction {
    fn filled(&self) -> Result<Filled, AccountError> {
        let missing = |field: &str| AccountError::Sign(format!("transaction is missing {field}"));
        Ok(Filled {
            nonce: self.nonce.ok_or_else(|| missing("nonce"))?,
            gas_price: self.gas_price.ok_or_else(|| missing("gas price"))?,
            gas_limit: self.gas_limit.ok_or_else(|| missing("gas limit"))?,
            chain_id: self.chain_id.ok_or_else(|| missing("chain id"))?,
        })
    }

    /// The EIP-155 signing payload.
    pub fn signing_payload(&self) -> Result<Vec<u8>, AccountError> {
        let filled = self.filled()?;
        let fields = UnsignedLegacyFields {
            nonce: filled.nonce,
            gas_price: filled.gas_price,
            gas_limit: filled.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            chain_id: filled.chain_id,
            empty_r: 0,
            empty_s: 0,
        };

        let mut buf = Vec::new();
        fields.encode(&mut buf);
        Ok(buf)
    }

    /// Signs with `key`, encoding `v = recovery_id + 35 + 2 * chain_id`.
    pub(crate) fn sign_with(&self, key: &SigningKey) -> Result<SignedTransaction, AccountError> {
        let filled = self.filled()?;
        let digest = Keccak256::digest(self.signing_payload()?);
        let sig = sign_digest(key, &digest)?;

        let fields = SignedLegacyFields {
            nonce: filled.nonce,
            gas_price: filled.gas_price,
            gas_limit: filled.gas_limit,
            to: self.to,
            value: self.value,
            data: self.data.clone(),
            v: u64::from(sig[64]) + 35 + 2 * filled.chain_id,
            r: U256::from_be_slice(&sig[..32]),
            s: U256::from_be_slice(&sig[32..64]),
        };

        let mut raw_tx = Vec::new();
        fields.encode(&mut raw_tx);
        let tx_hash = B256::from_slice(&Keccak256::digest(&raw_tx));

        Ok(SignedTransaction {
            raw_tx: raw_tx.into(),
            tx_hash,
        })
    }
}
