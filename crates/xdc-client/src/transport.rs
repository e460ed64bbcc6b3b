use alloy_primitives::{Bytes, B256};
use async_trait::async_trait;
use xdc_account::{Account, Transaction};

use crate::block::Block;
use crate::error::TransportError;
use crate::log::{Log, LogQuery};

/// The RPC surface the client needs from a node connection.
///
/// Implementations own nonce and gas estimation for submitted transactions.
/// `Ok(None)` means the node answered without a result.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Signs `tx` with `account` and submits it, returning the transaction hash.
    async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        account: &Account,
    ) -> Result<Option<B256>, TransportError>;

    /// Read-only execution of `tx` against the state at `block`.
    async fn call(&self, tx: &Transaction, block: Block) -> Result<Option<Bytes>, TransportError>;

    async fn get_logs(&self, query: &LogQuery) -> Result<Option<Vec<Log>>, TransportError>;
}
