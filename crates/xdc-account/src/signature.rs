use alloy_primitives::{Address, B256};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};

use crate::address::pubkey_to_address;
use crate::error::AccountError;
use crate::network::Network;

/// Length of a recoverable signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset added to the raw recovery id by the legacy `v` encoding.
const LEGACY_V_OFFSET: u8 = 27;

/// Signs a 32-byte digest, returning `r || s || v` with raw `v` in `{0, 1}`.
///
/// k256 signs deterministically (RFC 6979) and normalizes `s` to the lower
/// half of the curve order.
pub fn sign_digest(key: &SigningKey, digest: &[u8]) -> Result<Vec<u8>, AccountError> {
    if digest.len() != 32 {
        return Err(AccountError::Sign(format!(
            "digest must be 32 bytes, got {}",
            digest.len()
        )));
    }

    let (signature, recovery_id): (Signature, RecoveryId) = key
        .sign_prehash(digest)
        .map_err(|e| AccountError::Sign(e.to_string()))?;

    let mut sig = Vec::with_capacity(SIGNATURE_LENGTH);
    sig.extend_from_slice(&signature.r().to_bytes());
    sig.extend_from_slice(&signature.s().to_bytes());
    sig.push(recovery_id.to_byte());
    Ok(sig)
}

/// Rewrites the trailing recovery byte into the legacy `{27, 28}` range.
///
/// A signature without a trailing byte is rejected rather than defaulted.
pub fn normalize_recovery_byte(mut signature: Vec<u8>) -> Result<Vec<u8>, AccountError> {
    let mut last = signature
        .pop()
        .ok_or_else(|| AccountError::Sign("signature has no recovery byte".into()))?;

    if last < LEGACY_V_OFFSET {
        last += LEGACY_V_OFFSET;
    }

    signature.push(last);
    Ok(signature)
}

/// Keccak-256 of the network's personal-message preamble followed by `message`.
pub fn hash_personal_message(network: &Network, message: &[u8]) -> B256 {
    let prefix = network.personal_message_prefix(message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message);
    B256::from_slice(&hasher.finalize())
}

/// Recovers the signer address from a 32-byte digest and a 65-byte signature.
///
/// Both raw (`0`/`1`) and legacy (`27`/`28`) recovery bytes are accepted.
pub fn recover_address(digest: &[u8], signature: &[u8]) -> Result<Address, AccountError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(AccountError::Sign(format!(
            "signature must be {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    if digest.len() != 32 {
        return Err(AccountError::Sign("digest must be 32 bytes".into()));
    }

    let v = signature[64];
    let recovery_byte = if v >= LEGACY_V_OFFSET { v - LEGACY_V_OFFSET } else { v };

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| AccountError::Sign(format!("invalid signature: {e}")))?;
    let recid = RecoveryId::from_byte(recovery_byte)
        .ok_or_else(|| AccountError::Sign(format!("invalid recovery id {v}")))?;

    let recovered = VerifyingKey::recover_from_prehash(digest, &sig, recid)
        .map_err(|e| AccountError::Sign(format!("recovery failed: {e}")))?;

    pubkey_to_address(recovered.to_encoded_point(false).as_bytes())
        .map_err(|e| AccountError::Sign(e.to_string()))
}
