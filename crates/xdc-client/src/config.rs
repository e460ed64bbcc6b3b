use std::path::Path;

use serde::{Deserialize, Serialize};
use xdc_account::Network;

use crate::block::Block;
use crate::error::ConfigError;

/// Client settings. Missing fields fall back to XDC mainnet and `latest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub network: Network,
    /// Block used by read-only calls that do not name one.
    pub default_block: Block,
}

impl ClientConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            default_block: Block::Latest,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
