//! Event type descriptors and filters.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256};
use sha3::{Digest, Keccak256};

use crate::abi::parse_type;
use crate::error::AbiError;
use crate::log::Log;

/// Builds a typed event from decoded topic values, decoded data values and
/// the source log. `Ok(None)` rejects the log.
pub type EventConstructor<E> =
    dyn Fn(Vec<DynSolValue>, Vec<DynSolValue>, &Log) -> Result<Option<E>, String> + Send + Sync;

/// One declared event parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParam {
    pub ty: DynSolType,
    pub indexed: bool,
}

impl EventParam {
    /// A parameter carried in a topic.
    pub fn indexed(ty: DynSolType) -> Self {
        Self { ty, indexed: true }
    }

    /// A parameter carried in the data blob.
    pub fn data(ty: DynSolType) -> Self {
        Self { ty, indexed: false }
    }

    /// Parses a Solidity type name, e.g. `EventParam::parse("address", true)`.
    pub fn parse(ty: &str, indexed: bool) -> Result<Self, AbiError> {
        Ok(Self {
            ty: parse_type(ty)?,
            indexed,
        })
    }

    /// Whether an indexed value of this type is stored as its Keccak-256 hash.
    pub fn is_hashed_topic(&self) -> bool {
        !matches!(
            self.ty,
            DynSolType::Address
                | DynSolType::Bool
                | DynSolType::Int(_)
                | DynSolType::Uint(_)
                | DynSolType::FixedBytes(_)
                | DynSolType::Function
        )
    }
}

/// Keccak-256 of `name(type1,type2,...)`.
pub fn event_signature(name: &str, params: &[EventParam]) -> B256 {
    let types = params
        .iter()
        .map(|p| p.ty.sol_type_name())
        .collect::<Vec<_>>()
        .join(",");
    B256::from_slice(&Keccak256::digest(format!("{name}({types})").as_bytes()))
}

/// An event declared at compile time.
pub trait AbiEvent: Sized {
    const NAME: &'static str;

    /// Declared parameters in signature order.
    fn params() -> Vec<EventParam>;

    fn from_fields(
        topics: Vec<DynSolValue>,
        data: Vec<DynSolValue>,
        log: &Log,
    ) -> Result<Option<Self>, String>;
}

/// An event decoded without a caller-defined type.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEvent {
    pub name: String,
    pub signature: B256,
    /// Indexed values followed by data values.
    pub fields: Vec<DynSolValue>,
    pub log: Log,
}

/// Describes how to recognise and build one event type `E`.
pub struct EventType<E> {
    name: String,
    params: Vec<EventParam>,
    signature: B256,
    constructor: Arc<EventConstructor<E>>,
}

impl<E> EventType<E> {
    pub fn with_constructor<F>(name: impl Into<String>, params: Vec<EventParam>, constructor: F) -> Self
    where
        F: Fn(Vec<DynSolValue>, Vec<DynSolValue>, &Log) -> Result<Option<E>, String>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        let signature = event_signature(&name, &params);
        Self {
            name,
            params,
            signature,
            constructor: Arc::new(constructor),
        }
    }

    /// Descriptor for a type implementing [`AbiEvent`].
    pub fn of<T>() -> Self
    where
        T: AbiEvent + Into<E> + 'static,
    {
        Self::with_constructor(T::NAME, T::params(), |topics, data, log| {
            T::from_fields(topics, data, log).map(|event| event.map(Into::into))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[EventParam] {
        &self.params
    }

    pub fn signature(&self) -> B256 {
        self.signature
    }

    pub(crate) fn construct(
        &self,
        topics: Vec<DynSolValue>,
        data: Vec<DynSolValue>,
        log: &Log,
    ) -> Result<Option<E>, String> {
        (self.constructor)(topics, data, log)
    }
}

impl EventType<DecodedEvent> {
    /// Generic descriptor producing [`DecodedEvent`]s.
    pub fn new(name: impl Into<String>, params: Vec<EventParam>) -> Self {
        let name = name.into();
        let signature = event_signature(&name, &params);
        let event_name = name.clone();
        Self::with_constructor(name, params, move |topics, data, log| {
            let mut fields = topics;
            fields.extend(data);
            Ok(Some(DecodedEvent {
                name: event_name.clone(),
                signature,
                fields,
                log: log.clone(),
            }))
        })
    }
}

impl<E> Clone for EventType<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            signature: self.signature,
            constructor: Arc::clone(&self.constructor),
        }
    }
}

impl<E> fmt::Debug for EventType<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventType")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// An event type plus the contract addresses allowed to emit it.
#[derive(Debug, Clone)]
pub struct EventFilter<E> {
    pub event: EventType<E>,
    /// Empty means any sender.
    pub allowed_senders: HashSet<Address>,
}

impl<E> EventFilter<E> {
    pub fn new(event: EventType<E>, allowed_senders: impl IntoIterator<Item = Address>) -> Self {
        Self {
            event,
            allowed_senders: allowed_senders.into_iter().collect(),
        }
    }

    pub fn unrestricted(event: EventType<E>) -> Self {
        Self::new(event, [])
    }

    pub fn allows(&self, sender: &Address) -> bool {
        self.allowed_senders.is_empty() || self.allowed_senders.contains(sender)
    }
}
