use thiserror::Error;

/// Call pipeline and event query errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("encoding error: {0}")]
    Encode(String),

    #[error("decoding error: {0}")]
    Decode(String),

    #[error("unexpected return value: {0}")]
    UnexpectedReturnValue(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// ABI type parsing and value conversion errors.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("invalid type {ty}: {reason}")]
    InvalidType { ty: String, reason: String },

    #[error("value has no canonical type name: {0}")]
    UntypedValue(String),

    #[error("expected {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("expected {expected}, got {actual}")]
    ValueType { expected: String, actual: String },

    #[error("decoding failed: {0}")]
    Decode(String),
}

/// Why a log could not be decoded under one event filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventDecodeError {
    #[error("data decoding failed: {0}")]
    Data(String),

    #[error("expected {expected} data fields, got {actual}")]
    FieldCount { expected: usize, actual: usize },

    #[error("expected {expected} topics, got {actual}")]
    TopicCount { expected: usize, actual: usize },

    #[error("topic {index} decoding failed: {reason}")]
    Topic { index: usize, reason: String },

    #[error("event construction failed: {0}")]
    Construct(String),

    #[error("event constructor rejected the log")]
    Rejected,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
