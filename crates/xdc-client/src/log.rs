//! Log entries and `eth_getLogs` queries.

use alloy_primitives::{Address, Bytes, B256, U64};
use serde::{Deserialize, Serialize};

use crate::block::Block;

/// A log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Contract address that emitted the log
    pub address: Address,
    /// Topic 0 is the event signature, the rest are indexed parameters
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_index: Option<U64>,
    #[serde(default)]
    pub removed: bool,
}

impl Log {
    /// A log with no block context.
    pub fn new(address: Address, topics: Vec<B256>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
            block_number: None,
            block_hash: None,
            transaction_hash: None,
            transaction_index: None,
            log_index: None,
            removed: false,
        }
    }

    pub fn signature(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// One topic position in a log query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicFilter {
    Exact(B256),
    /// Matches any of the listed hashes.
    AnyOf(Vec<B256>),
}

impl From<B256> for TopicFilter {
    fn from(topic: B256) -> Self {
        TopicFilter::Exact(topic)
    }
}

impl From<Vec<B256>> for TopicFilter {
    fn from(topics: Vec<B256>) -> Self {
        TopicFilter::AnyOf(topics)
    }
}

/// Parameters of an `eth_getLogs` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    #[serde(rename = "address", skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
    /// Positional topic constraints; `None` matches anything at that position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<Option<TopicFilter>>>,
    pub from_block: Block,
    pub to_block: Block,
}

impl LogQuery {
    pub fn new(from_block: Block, to_block: Block) -> Self {
        Self {
            from_block,
            to_block,
            ..Self::default()
        }
    }

    pub fn addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    pub fn topics(mut self, topics: Vec<Option<TopicFilter>>) -> Self {
        self.topics = Some(topics);
        self
    }
}
