//! Error types for Strand planning.

use alloy_primitives::Address;
use thiserror::Error;

use crate::types::CommandType;

/// Reasons the ABI codec rejects a literal against its parameter type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The literal is not of the declared parameter type.
    #[error("expected a value of type {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// Dynamic types have no fixed-width state encoding.
    #[error("dynamic type {0} cannot be passed as a literal")]
    DynamicType(String),

    /// The literal does not fit the declared width.
    #[error("value {value} does not fit in {ty}")]
    OutOfRange { value: String, ty: String },

    /// A textual literal could not be parsed as the declared type.
    #[error("cannot parse {input:?} as {ty}: {message}")]
    Parse {
        input: String,
        ty: String,
        message: String,
    },
}

/// Main error type for Strand operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The method is not part of the contract's registry.
    #[error("Method not found: {method} on contract {contract}")]
    MethodNotFound { contract: Address, method: String },

    /// A bare method name matched several overloads of the same arity.
    #[error("Ambiguous method: {method} matches {candidates} overloads on contract {contract}")]
    AmbiguousMethod {
        contract: Address,
        method: String,
        candidates: usize,
    },

    /// An ABI definition or signature could not be understood.
    #[error("Invalid ABI: {0}")]
    InvalidAbi(String),

    /// A literal argument was rejected by the ABI codec.
    #[error("Failed to encode argument {argument} of command {command}: {source}")]
    Encode {
        command: usize,
        argument: usize,
        #[source]
        source: EncodeError,
    },

    /// The number of arguments differs from the method's inputs.
    #[error("Command {command} expects {expected} arguments, got {got}")]
    ArgumentCountMismatch {
        command: usize,
        expected: usize,
        got: usize,
    },

    /// The command word only has room for a fixed number of input slots.
    #[error("Command {command} has {count} arguments, at most {max} are supported")]
    TooManyArguments {
        command: usize,
        count: usize,
        max: usize,
    },

    /// The state table ran out of addressable slots.
    #[error("State slot overflow: command {command} needs more than {limit} slots")]
    SlotOverflow { command: usize, limit: usize },

    /// A return handle does not refer to an earlier command of this planner.
    #[error("Dangling reference in argument {argument} of command {command}")]
    DanglingReference { command: usize, argument: usize },

    /// The command mode has no encoding.
    #[error("Command {command} uses unsupported mode {kind}")]
    Unsupported { command: usize, kind: CommandType },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlanError {
    /// Returns the index of the offending command, if the error is tied to one.
    pub fn command_index(&self) -> Option<usize> {
        match self {
            PlanError::Encode { command, .. }
            | PlanError::ArgumentCountMismatch { command, .. }
            | PlanError::TooManyArguments { command, .. }
            | PlanError::SlotOverflow { command, .. }
            | PlanError::DanglingReference { command, .. }
            | PlanError::Unsupported { command, .. } => Some(*command),
            _ => None,
        }
    }
}

/// Convenience Result type for Strand operations.
pub type Result<T> = std::result::Result<T, PlanError>;

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Serialization(err.to_string())
    }
}
