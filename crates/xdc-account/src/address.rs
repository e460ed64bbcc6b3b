use alloy_primitives::Address;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, PublicKey};
use sha3::{Digest, Keccak256};

use crate::error::AddressError;

/// Text prefix used by XDC wallets and explorers in place of `0x`.
pub const XDC_PREFIX: &str = "xdc";

/// Derives an account address from a secp256k1 public key.
///
/// Accepts the 64-byte raw form (`x || y`), the 65-byte uncompressed SEC1
/// form (`0x04 || x || y`) or the 33-byte compressed form. The address is the
/// last 20 bytes of the Keccak-256 hash of the raw 64-byte key.
pub fn pubkey_to_address(pubkey: &[u8]) -> Result<Address, AddressError> {
    let raw = match pubkey.len() {
        64 => {
            let mut raw = [0u8; 64];
            raw.copy_from_slice(pubkey);
            raw
        }
        65 => {
            if pubkey[0] != 0x04 {
                return Err(AddressError::InvalidPublicKey(
                    "uncompressed key must start with 0x04".into(),
                ));
            }
            let mut raw = [0u8; 64];
            raw.copy_from_slice(&pubkey[1..]);
            raw
        }
        33 => decompress(pubkey)?,
        other => {
            return Err(AddressError::InvalidPublicKey(format!(
                "expected 33, 64 or 65 bytes, got {other}"
            )))
        }
    };

    let hash = Keccak256::digest(raw);
    Ok(Address::from_slice(&hash[12..]))
}

fn decompress(compressed: &[u8]) -> Result<[u8; 64], AddressError> {
    let encoded = EncodedPoint::from_bytes(compressed).map_err(|e| {
        AddressError::InvalidPublicKey(format!("invalid compressed key encoding: {e}"))
    })?;

    let pubkey: Option<PublicKey> = PublicKey::from_encoded_point(&encoded).into();
    let pubkey = pubkey.ok_or_else(|| {
        AddressError::InvalidPublicKey("point is not on the secp256k1 curve".into())
    })?;

    let uncompressed = pubkey.to_encoded_point(false);
    let mut raw = [0u8; 64];
    raw.copy_from_slice(&uncompressed.as_bytes()[1..]);
    Ok(raw)
}

/// Parses an address written with a `0x` or `xdc` prefix.
///
/// All-lowercase and all-uppercase inputs are accepted as-is. Mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn parse_address(text: &str) -> Result<Address, AddressError> {
    let hex_part = strip_prefix(text).ok_or_else(|| {
        AddressError::InvalidAddress(format!("address must start with 0x or xdc: {text}"))
    })?;

    if hex_part.len() != 40 {
        return Err(AddressError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| AddressError::InvalidAddress(format!("invalid hex: {e}")))?;
    let address = Address::from_slice(&bytes);

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if !is_all_lower && !is_all_upper && checksum_hex(&address) != hex_part {
        return Err(AddressError::InvalidAddress(format!(
            "checksum mismatch for {text}"
        )));
    }

    Ok(address)
}

fn strip_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix(XDC_PREFIX))
        .or_else(|| text.strip_prefix("XDC"))
}

/// Formats an address with EIP-55 mixed-case checksum and a `0x` prefix.
pub fn to_checksum(address: &Address) -> String {
    format!("0x{}", checksum_hex(address))
}

/// Formats an address the way XDC explorers display it: `xdc` followed by the
/// checksummed hex digits.
pub fn to_xdc_string(address: &Address) -> String {
    format!("{XDC_PREFIX}{}", checksum_hex(address))
}

/// EIP-55 checksum of the 40 hex digits, without prefix.
fn checksum_hex(address: &Address) -> String {
    let lower = hex::encode(address.as_slice());
    let hash = Keccak256::digest(lower.as_bytes());

    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            // Nibble i of the hash decides the case of character i.
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    fn key_one_pubkey(compressed: bool) -> Vec<u8> {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        let secret = SecretKey::from_bytes((&privkey).into()).expect("valid private key");
        secret
            .public_key()
            .to_encoded_point(compressed)
            .as_bytes()
            .to_vec()
    }

    #[test]
    fn eip55_checksum_known_addresses() {
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let parsed = parse_address(&expected.to_lowercase()).unwrap();
            assert_eq!(&to_checksum(&parsed), expected);
        }
    }

    #[test]
    fn pubkey_to_address_known_vector() {
        let uncompressed = key_one_pubkey(false);
        let address = pubkey_to_address(&uncompressed).unwrap();
        assert_eq!(
            to_checksum(&address),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn raw_and_compressed_keys_agree() {
        let uncompressed = key_one_pubkey(false);
        let compressed = key_one_pubkey(true);

        let from_raw = pubkey_to_address(&uncompressed[1..]).unwrap();
        let from_compressed = pubkey_to_address(&compressed).unwrap();
        assert_eq!(from_raw, from_compressed);
    }

    #[test]
    fn invalid_uncompressed_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x03;
        assert!(pubkey_to_address(&key).is_err());
    }

    #[test]
    fn wrong_key_length_errors() {
        assert!(pubkey_to_address(&[0u8; 20]).is_err());
    }

    #[test]
    fn parse_xdc_prefix() {
        let from_xdc = parse_address("xdc5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let from_hex = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(from_xdc, from_hex);
    }

    #[test]
    fn xdc_string_round_trips() {
        let address = parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let text = to_xdc_string(&address);
        assert_eq!(text, "xdc5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(parse_address(&text).unwrap(), address);
    }

    #[test]
    fn parse_accepts_all_uppercase() {
        assert!(parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").is_ok());
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let result = parse_address("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_short_and_unprefixed() {
        assert!(parse_address("0x5aAeb6053F").is_err());
        assert!(parse_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
        assert!(parse_address("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }
}
