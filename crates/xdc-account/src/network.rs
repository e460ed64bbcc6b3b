use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Definition of an XDC-family network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub chain_id: u64,
    pub name: Cow<'static, str>,
    /// Name embedded in the personal-message prefix
    /// (`"\x19<message_prefix> Signed Message:\n"`).
    pub message_prefix: Cow<'static, str>,
    pub rpc_url: Cow<'static, str>,
    pub explorer_url: Cow<'static, str>,
    pub is_testnet: bool,
}

/// XDC Network mainnet (chain ID 50).
pub const XDC_MAINNET: Network = Network {
    chain_id: 50,
    name: Cow::Borrowed("XDC Mainnet"),
    message_prefix: Cow::Borrowed("Xinfin"),
    rpc_url: Cow::Borrowed("https://rpc.xinfin.network"),
    explorer_url: Cow::Borrowed("https://xdcscan.com"),
    is_testnet: false,
};

/// XDC Apothem testnet (chain ID 51).
pub const APOTHEM: Network = Network {
    chain_id: 51,
    name: Cow::Borrowed("XDC Apothem"),
    message_prefix: Cow::Borrowed("Xinfin"),
    rpc_url: Cow::Borrowed("https://rpc.apothem.network"),
    explorer_url: Cow::Borrowed("https://apothem.xdcscan.io"),
    is_testnet: true,
};

const ALL_NETWORKS: &[&Network] = &[&XDC_MAINNET, &APOTHEM];

impl Network {
    /// Builds the personal-message preamble for a message of `len` bytes.
    pub fn personal_message_prefix(&self, len: usize) -> String {
        format!("\x19{} Signed Message:\n{len}", self.message_prefix)
    }
}

impl Default for Network {
    fn default() -> Self {
        XDC_MAINNET
    }
}

/// Returns the preset for a given chain ID, or `None` if unknown.
pub fn get_network(chain_id: u64) -> Option<&'static Network> {
    ALL_NETWORKS
        .iter()
        .find(|n| n.chain_id == chain_id)
        .copied()
}

/// Returns all network presets.
pub fn known_networks() -> Vec<&'static Network> {
    ALL_NETWORKS.to_vec()
}
