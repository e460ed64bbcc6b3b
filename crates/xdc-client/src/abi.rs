//! Function-call encoding and typed response decoding.
//!
//! Value-level ABI work is delegated to `alloy-dyn-abi`; this module only
//! fixes how a call is named, selected and turned into a [`Transaction`].

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Bytes, B256, U256};
use sha3::{Digest, Keccak256};
use xdc_account::Transaction;

use crate::error::AbiError;

/// An ABI-typed contract function call.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub params: Vec<DynSolValue>,
    pub contract: Address,
    pub from: Option<Address>,
    pub gas_price: Option<U256>,
    pub gas_limit: Option<U256>,
    pub value: U256,
}

impl FunctionCall {
    pub fn new(contract: Address, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            contract,
            from: None,
            gas_price: None,
            gas_limit: None,
            value: U256::ZERO,
        }
    }

    pub fn arg(mut self, value: impl Into<DynSolValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn from(mut self, sender: Address) -> Self {
        self.from = Some(sender);
        self
    }

    pub fn gas_price(mut self, price: U256) -> Self {
        self.gas_price = Some(price);
        self
    }

    pub fn gas_limit(mut self, limit: U256) -> Self {
        self.gas_limit = Some(limit);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> Result<String, AbiError> {
        let types = self
            .params
            .iter()
            .map(|p| {
                p.sol_type_name()
                    .map(|name| name.into_owned())
                    .ok_or_else(|| AbiError::UntypedValue(format!("{p:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}({})", self.name, types.join(",")))
    }

    /// First four bytes of the Keccak-256 of the signature.
    pub fn selector(&self) -> Result<[u8; 4], AbiError> {
        let hash = Keccak256::digest(self.signature()?.as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash[..4]);
        Ok(selector)
    }

    /// `selector || abi_encode_params(params)`.
    pub fn encode(&self) -> Result<Vec<u8>, AbiError> {
        let selector = self.selector()?;
        let args = DynSolValue::Tuple(self.params.clone()).abi_encode_params();

        let mut data = Vec::with_capacity(4 + args.len());
        data.extend_from_slice(&selector);
        data.extend_from_slice(&args);
        Ok(data)
    }

    /// Builds the transaction for this call. Nonce is left for the transport.
    pub fn transaction(&self, chain_id: Option<u64>) -> Result<Transaction, AbiError> {
        Ok(Transaction {
            from: self.from,
            to: self.contract,
            value: self.value,
            data: Bytes::from(self.encode()?),
            nonce: None,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            chain_id,
        })
    }
}

/// Parses a Solidity type string such as `uint256` or `(address,bool)[]`.
pub fn parse_type(ty: &str) -> Result<DynSolType, AbiError> {
    DynSolType::parse(ty).map_err(|e| AbiError::InvalidType {
        ty: ty.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes `data` as one ABI-encoded tuple of `types`, returning its members.
pub fn decode_sequence(types: &[DynSolType], data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    if types.is_empty() {
        return Ok(Vec::new());
    }

    let decoded = DynSolType::Tuple(types.to_vec())
        .abi_decode_sequence(data)
        .map_err(|e| AbiError::Decode(e.to_string()))?;

    Ok(match decoded {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    })
}

/// A typed return value of a contract read.
pub trait AbiResponse: Sized {
    /// Declared return types, in order.
    fn types() -> Vec<DynSolType>;

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError>;

    fn decode(data: &[u8]) -> Result<Self, AbiError> {
        let types = Self::types();
        let values = decode_sequence(&types, data)?;
        if values.len() != types.len() {
            return Err(AbiError::ValueCount {
                expected: types.len(),
                actual: values.len(),
            });
        }
        Self::from_values(values)
    }
}

fn single(values: Vec<DynSolValue>) -> Result<DynSolValue, AbiError> {
    let actual = values.len();
    let mut iter = values.into_iter();
    match (iter.next(), iter.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(AbiError::ValueCount {
            expected: 1,
            actual,
        }),
    }
}

fn mismatch(expected: &str, actual: &DynSolValue) -> AbiError {
    AbiError::ValueType {
        expected: expected.to_string(),
        actual: format!("{actual:?}"),
    }
}

impl AbiResponse for U256 {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::Uint(256)]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        value
            .as_uint()
            .map(|(n, _)| n)
            .ok_or_else(|| mismatch("uint256", &value))
    }
}

impl AbiResponse for Address {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::Address]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        value.as_address().ok_or_else(|| mismatch("address", &value))
    }
}

impl AbiResponse for bool {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::Bool]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        value.as_bool().ok_or_else(|| mismatch("bool", &value))
    }
}

impl AbiResponse for String {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::String]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch("string", &value))
    }
}

impl AbiResponse for Bytes {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::Bytes]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        value
            .as_bytes()
            .map(Bytes::copy_from_slice)
            .ok_or_else(|| mismatch("bytes", &value))
    }
}

impl AbiResponse for B256 {
    fn types() -> Vec<DynSolType> {
        vec![DynSolType::FixedBytes(32)]
    }

    fn from_values(values: Vec<DynSolValue>) -> Result<Self, AbiError> {
        let value = single(values)?;
        match value.as_fixed_bytes() {
            Some((bytes, 32)) => Ok(B256::from_slice(bytes)),
            _ => Err(mismatch("bytes32", &value)),
        }
    }
}
