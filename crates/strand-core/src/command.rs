//! Commands and the values passed to them.
//!
//! A [`Command`] is one external call: a target address, a resolved
//! [`Method`] and an ordered argument list. Each argument is either a
//! [`Literal`] or a [`ReturnHandle`] naming an earlier command of the same
//! planner, whose return value flows in at execution time.

use std::fmt;
use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::abi::{Literal, Method};
use crate::types::CommandType;

/// Opaque reference to the return value of a command added to a planner.
///
/// Handles are only meaningful to the planner that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnHandle {
    planner: Uuid,
    index: usize,
}

impl ReturnHandle {
    /// Handle for the command at `index` of the planner identified by `planner`.
    pub fn new(planner: Uuid, index: usize) -> Self {
        Self { planner, index }
    }

    pub fn planner(&self) -> Uuid {
        self.planner
    }

    /// Position of the producing command in program order.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ReturnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ret#{}", self.index)
    }
}

/// An argument passed to a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Literal(Literal),
    Return(ReturnHandle),
}

impl Value {
    /// Textual literal, parsed against the parameter type during planning.
    pub fn text(input: impl Into<String>) -> Self {
        Value::Literal(Literal::Text(input.into()))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    pub fn as_return(&self) -> Option<ReturnHandle> {
        match self {
            Value::Return(handle) => Some(*handle),
            Value::Literal(_) => None,
        }
    }
}

impl From<ReturnHandle> for Value {
    fn from(handle: ReturnHandle) -> Self {
        Value::Return(handle)
    }
}

impl From<&ReturnHandle> for Value {
    fn from(handle: &ReturnHandle) -> Self {
        Value::Return(*handle)
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        Value::Literal(literal)
    }
}

impl From<DynSolValue> for Value {
    fn from(value: DynSolValue) -> Self {
        Value::Literal(Literal::Value(value))
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        DynSolValue::Uint(value, 256).into()
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        U256::from(value).into()
    }
}

impl From<u128> for Value {
    fn from(value: u128) -> Self {
        U256::from(value).into()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        DynSolValue::Bool(value).into()
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        DynSolValue::Address(value).into()
    }
}

impl From<B256> for Value {
    fn from(value: B256) -> Self {
        DynSolValue::FixedBytes(value, 32).into()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}

/// Build a `Vec<Value>` from heterogeneous arguments.
///
/// ```ignore
/// let sum = planner.add(math.call("add", args![1u64, prev])?);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// A single external call description. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandType,
    address: Address,
    method: Arc<Method>,
    args: Vec<Value>,
}

impl Command {
    /// Create a regular call command.
    pub fn new(address: Address, method: Arc<Method>, args: Vec<Value>) -> Self {
        Self {
            kind: CommandType::Call,
            address,
            method,
            args,
        }
    }

    /// Execute the call in the VM's own context.
    ///
    /// Delegate calls are representable but the planner does not encode them yet.
    pub fn delegate(self) -> Self {
        self.with_kind(CommandType::DelegateCall)
    }

    pub fn with_kind(mut self, kind: CommandType) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> CommandType {
        self.kind
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.address, self.method.name())?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                Value::Return(handle) => write!(f, "{handle}")?,
                Value::Literal(Literal::Text(text)) => write!(f, "{text:?}")?,
                Value::Literal(Literal::Value(value)) => write!(f, "{value:?}")?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_method() -> Arc<Method> {
        Arc::new(Method::from_signature("add(uint256,uint256)").unwrap())
    }

    #[test]
    fn test_args_macro() {
        let handle = ReturnHandle::new(Uuid::new_v4(), 0);
        let args = args![1u64, handle, "0x02", true];

        assert_eq!(args.len(), 4);
        assert_eq!(args[0], Value::from(U256::from(1)));
        assert_eq!(args[1].as_return(), Some(handle));
        assert_eq!(args[2], Value::text("0x02"));
        assert!(args[3].is_literal());
        assert!(args![].is_empty());
    }

    #[test]
    fn test_delegate_switches_mode() {
        let command = Command::new(Address::ZERO, add_method(), args![1u64, 2u64]);
        assert_eq!(command.kind(), CommandType::Call);

        let command = command.delegate();
        assert_eq!(command.kind(), CommandType::DelegateCall);
        assert_eq!(command.args().len(), 2);
    }

    #[test]
    fn test_display() {
        let handle = ReturnHandle::new(Uuid::new_v4(), 3);
        let command = Command::new(Address::ZERO, add_method(), args![handle, "5"]);
        assert!(command.to_string().ends_with(".add(ret#3, \"5\")"));
    }
}
