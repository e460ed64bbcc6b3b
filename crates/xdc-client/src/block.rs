use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A block reference for `eth_call` and `eth_getLogs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Block {
    #[default]
    Latest,
    Earliest,
    Pending,
    Number(u64),
}

impl Block {
    /// The JSON-RPC form: a tag name or a `0x` hex quantity.
    pub fn as_rpc_param(&self) -> String {
        match self {
            Block::Latest => "latest".to_string(),
            Block::Earliest => "earliest".to_string(),
            Block::Pending => "pending".to_string(),
            Block::Number(n) => format!("{n:#x}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_rpc_param())
    }
}

impl From<u64> for Block {
    fn from(number: u64) -> Self {
        Block::Number(number)
    }
}

/// Whether `text` is an optionally negative run of ASCII decimal digits.
pub fn is_numeric(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

impl FromStr for Block {
    type Err = String;

    /// Accepts a tag name, decimal digits, or a `0x` hex quantity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => return Ok(Block::Latest),
            "earliest" => return Ok(Block::Earliest),
            "pending" => return Ok(Block::Pending),
            _ => {}
        }

        if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u64::from_str_radix(hex_digits, 16)
                .map(Block::Number)
                .map_err(|e| format!("invalid hex block number {s}: {e}"));
        }

        if is_numeric(s) {
            return s
                .parse::<u64>()
                .map(Block::Number)
                .map_err(|e| format!("invalid block number {s}: {e}"));
        }

        Err(format!("unrecognized block reference: {s}"))
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_rpc_param())
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
