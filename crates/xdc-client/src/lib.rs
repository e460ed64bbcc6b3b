//! Contract calls and event decoding for XDC-family networks.
//!
//! - [`Client::execute`] / [`Client::call`]: typed function calls over a [`Transport`]
//! - [`demux`]: split raw logs into typed events and leftovers
//! - [`erc20`]: token call builders

pub mod abi;
pub mod block;
pub mod client;
pub mod config;
pub mod demux;
pub mod erc20;
pub mod error;
pub mod event;
pub mod log;
pub mod transport;

pub use abi::{AbiResponse, FunctionCall};
pub use block::Block;
pub use client::Client;
pub use config::ClientConfig;
pub use demux::{demux, decode_log, EventBatch, Unprocessed, UnprocessedReason};
pub use error::{AbiError, ClientError, ConfigError, EventDecodeError, TransportError};
pub use event::{AbiEvent, DecodedEvent, EventFilter, EventParam, EventType};
pub use log::{Log, LogQuery, TopicFilter};
pub use transport::Transport;
