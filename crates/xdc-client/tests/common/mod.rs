//! A scripted in-memory transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use alloy_primitives::{Bytes, B256, U256};
use async_trait::async_trait;
use xdc_account::{Account, Transaction};
use xdc_client::{Block, Log, LogQuery, Transport, TransportError};

/// Replays queued results and records every request.
///
/// With nothing queued, `send_raw_transaction` signs the transaction with
/// nonce 0 and returns its real hash, `call` answers `None` and `get_logs`
/// answers `Some(vec![])`.
#[derive(Default)]
pub struct MockTransport {
    send_results: Mutex<VecDeque<Result<Option<B256>, TransportError>>>,
    call_results: Mutex<VecDeque<Result<Option<Bytes>, TransportError>>>,
    log_results: Mutex<VecDeque<Result<Option<Vec<Log>>, TransportError>>>,
    pub sent: Mutex<Vec<Transaction>>,
    pub calls: Mutex<Vec<(Transaction, Block)>>,
    pub queries: Mutex<Vec<LogQuery>>,
}

impl MockTransport {
    pub fn push_send(&self, result: Result<Option<B256>, TransportError>) {
        self.send_results.lock().unwrap().push_back(result);
    }

    pub fn push_call(&self, result: Result<Option<Bytes>, TransportError>) {
        self.call_results.lock().unwrap().push_back(result);
    }

    pub fn push_logs(&self, result: Result<Option<Vec<Log>>, TransportError>) {
        self.log_results.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_raw_transaction(
        &self,
        tx: &Transaction,
        account: &Account,
    ) -> Result<Option<B256>, TransportError> {
        self.sent.lock().unwrap().push(tx.clone());
        if let Some(result) = self.send_results.lock().unwrap().pop_front() {
            return result;
        }

        let mut filled = tx.clone();
        filled.nonce.get_or_insert(0);
        filled.gas_price.get_or_insert(U256::from(250_000_000u64));
        filled.gas_limit.get_or_insert(U256::from(100_000u64));
        let signed = account
            .sign_transaction(&filled)
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?;
        Ok(Some(signed.tx_hash))
    }

    async fn call(&self, tx: &Transaction, block: Block) -> Result<Option<Bytes>, TransportError> {
        self.calls.lock().unwrap().push((tx.clone(), block));
        self.call_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Option<Vec<Log>>, TransportError> {
        self.queries.lock().unwrap().push(query.clone());
        self.log_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Some(Vec::new())))
    }
}
