//! Splits a batch of logs into decoded events and leftovers.

use std::collections::HashMap;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::B256;
use tracing::{debug, trace};

use crate::abi::decode_sequence;
use crate::error::EventDecodeError;
use crate::event::{EventFilter, EventType};
use crate::log::Log;

/// Why a log produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnprocessedReason {
    /// No registered filter for the log's first topic.
    NoMatchingFilter,
    /// A filter matched the signature but not the emitting address.
    SenderNotAllowed,
    Decode(EventDecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unprocessed {
    pub log: Log,
    pub reason: UnprocessedReason,
}

/// Result of demultiplexing one log batch.
#[derive(Debug, Clone)]
pub struct EventBatch<E> {
    /// In source-log order, then filter registration order.
    pub events: Vec<E>,
    pub unprocessed: Vec<Unprocessed>,
}

impl<E> Default for EventBatch<E> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            unprocessed: Vec::new(),
        }
    }
}

impl<E> EventBatch<E> {
    pub fn unprocessed_logs(&self) -> impl Iterator<Item = &Log> {
        self.unprocessed.iter().map(|u| &u.log)
    }
}

/// Matches every log against the filters registered for its signature.
///
/// A log yields one event per filter that accepts and decodes it, and one
/// unprocessed entry per filter that does not. Logs with no filter at all
/// are reported once as [`UnprocessedReason::NoMatchingFilter`].
pub fn demux<E>(filters: &[EventFilter<E>], logs: &[Log]) -> EventBatch<E> {
    let mut by_signature: HashMap<B256, Vec<&EventFilter<E>>> = HashMap::new();
    for filter in filters {
        by_signature
            .entry(filter.event.signature())
            .or_default()
            .push(filter);
    }

    let mut batch = EventBatch::default();
    for log in logs {
        let candidates = log
            .signature()
            .and_then(|signature| by_signature.get(signature));

        let Some(candidates) = candidates else {
            trace!(address = %log.address, "no filter for log");
            batch.unprocessed.push(Unprocessed {
                log: log.clone(),
                reason: UnprocessedReason::NoMatchingFilter,
            });
            continue;
        };

        for filter in candidates {
            if !filter.allows(&log.address) {
                debug!(
                    event = filter.event.name(),
                    address = %log.address,
                    "sender not allowed"
                );
                batch.unprocessed.push(Unprocessed {
                    log: log.clone(),
                    reason: UnprocessedReason::SenderNotAllowed,
                });
                continue;
            }

            match decode_log(&filter.event, log) {
                Ok(event) => batch.events.push(event),
                Err(e) => {
                    debug!(event = filter.event.name(), address = %log.address, error = %e, "log not decoded");
                    batch.unprocessed.push(Unprocessed {
                        log: log.clone(),
                        reason: UnprocessedReason::Decode(e),
                    });
                }
            }
        }
    }

    debug!(
        logs = logs.len(),
        events = batch.events.len(),
        unprocessed = batch.unprocessed.len(),
        "demultiplexed logs"
    );
    batch
}

/// Decodes `log` under one event type.
pub fn decode_log<E>(event: &EventType<E>, log: &Log) -> Result<E, EventDecodeError> {
    let (indexed, body): (Vec<_>, Vec<_>) = event.params().iter().partition(|p| p.indexed);

    let body_types: Vec<DynSolType> = body.iter().map(|p| p.ty.clone()).collect();
    let data = decode_sequence(&body_types, &log.data)
        .map_err(|e| EventDecodeError::Data(e.to_string()))?;
    if data.len() != body_types.len() {
        return Err(EventDecodeError::FieldCount {
            expected: body_types.len(),
            actual: data.len(),
        });
    }

    let expected_topics = 1 + indexed.len();
    if log.topics.len() != expected_topics {
        return Err(EventDecodeError::TopicCount {
            expected: expected_topics,
            actual: log.topics.len(),
        });
    }

    let topics = indexed
        .iter()
        .zip(&log.topics[1..])
        .enumerate()
        .map(|(i, (param, topic))| {
            if param.is_hashed_topic() {
                return Ok(DynSolValue::FixedBytes(*topic, 32));
            }
            param
                .ty
                .abi_decode(topic.as_slice())
                .map_err(|e| EventDecodeError::Topic {
                    index: i + 1,
                    reason: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match event.construct(topics, data, log) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(EventDecodeError::Rejected),
        Err(reason) => Err(EventDecodeError::Construct(reason)),
    }
}
