use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Bytes, B256};
use xdc_account::{Account, Transaction};

use crate::abi::{decode_sequence, AbiResponse, FunctionCall};
use crate::block::Block;
use crate::config::ClientConfig;
use crate::demux::{demux, EventBatch};
use crate::error::ClientError;
use crate::event::{EventFilter, EventType};
use crate::log::LogQuery;
use crate::transport::Transport;

/// Contract calls and event queries over a [`Transport`].
pub struct Client<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_transaction(&self, call: &FunctionCall) -> Result<Transaction, ClientError> {
        call.transaction(Some(self.config.chain_id()))
            .map_err(|e| ClientError::Encode(e.to_string()))
    }

    /// Signs and submits `call`, returning the transaction hash.
    pub async fn execute(&self, call: &FunctionCall, account: &Account) -> Result<B256, ClientError> {
        let mut tx = self.build_transaction(call)?;
        tx.from.get_or_insert(account.address());

        tracing::debug!(
            contract = %call.contract,
            function = %call.name,
            from = %account.address(),
            "submitting transaction"
        );

        match self.transport.send_raw_transaction(&tx, account).await {
            Ok(Some(hash)) => Ok(hash),
            Ok(None) => {
                tracing::warn!(function = %call.name, "node returned no transaction hash");
                Err(ClientError::UnexpectedReturnValue(format!(
                    "no transaction hash for {}",
                    call.name
                )))
            }
            Err(e) => {
                tracing::warn!(function = %call.name, error = %e, "transaction submission failed");
                Err(ClientError::UnexpectedReturnValue(e.to_string()))
            }
        }
    }

    /// Read-only call decoded as `R`. `block` defaults to the configured block.
    pub async fn call<R: AbiResponse>(
        &self,
        call: &FunctionCall,
        block: Option<Block>,
    ) -> Result<R, ClientError> {
        let data = self.probe(call, block).await?;
        R::decode(&data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Read-only call decoded against ad-hoc return types.
    pub async fn call_dynamic(
        &self,
        call: &FunctionCall,
        types: &[DynSolType],
        block: Option<Block>,
    ) -> Result<Vec<DynSolValue>, ClientError> {
        let data = self.probe(call, block).await?;
        let values = decode_sequence(types, &data).map_err(|e| ClientError::Decode(e.to_string()))?;
        if values.len() != types.len() {
            return Err(ClientError::Decode(format!(
                "expected {} values, got {}",
                types.len(),
                values.len()
            )));
        }
        Ok(values)
    }

    async fn probe(&self, call: &FunctionCall, block: Option<Block>) -> Result<Bytes, ClientError> {
        let tx = self.build_transaction(call)?;
        let block = block.unwrap_or(self.config.default_block);

        tracing::debug!(
            contract = %call.contract,
            function = %call.name,
            %block,
            "calling contract"
        );

        match self.transport.call(&tx, block).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(ClientError::UnexpectedReturnValue(format!(
                "no return data for {}",
                call.name
            ))),
            Err(e) => {
                tracing::warn!(function = %call.name, error = %e, "call failed");
                Err(ClientError::UnexpectedReturnValue(e.to_string()))
            }
        }
    }

    /// Fetches logs for `query` and demultiplexes them through `filters`.
    ///
    /// Transport errors abort with no partial results.
    pub async fn get_events<E>(
        &self,
        query: &LogQuery,
        filters: &[EventFilter<E>],
    ) -> Result<EventBatch<E>, ClientError> {
        let logs = self.transport.get_logs(query).await.map_err(|e| {
            tracing::warn!(error = %e, "log query failed");
            ClientError::Transport(e)
        })?;

        match logs {
            Some(logs) => Ok(demux(filters, &logs)),
            None => {
                tracing::debug!("node returned no logs");
                Ok(EventBatch::default())
            }
        }
    }

    /// Like [`get_events`](Self::get_events) with every type unrestricted.
    pub async fn get_events_for_types<E>(
        &self,
        query: &LogQuery,
        types: Vec<EventType<E>>,
    ) -> Result<EventBatch<E>, ClientError> {
        let filters: Vec<_> = types.into_iter().map(EventFilter::unrestricted).collect();
        self.get_events(query, &filters).await
    }
}
