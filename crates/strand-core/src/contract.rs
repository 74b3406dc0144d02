//! Contracts: an address bound to a registry of callable methods.

use std::sync::Arc;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Address;
use serde::Deserialize;

use crate::abi::Method;
use crate::command::{Command, Value};
use crate::error::{PlanError, Result};

/// A deployed contract the planner can call into.
#[derive(Debug, Clone)]
pub struct Contract {
    address: Address,
    methods: Vec<Arc<Method>>,
}

/// JSON ABI as emitted on its own or wrapped in a build artifact.
#[derive(Deserialize)]
#[serde(untagged)]
enum AbiSource {
    Artifact { abi: JsonAbi },
    Bare(JsonAbi),
}

impl Contract {
    /// Create a contract with an empty method registry.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            methods: Vec::new(),
        }
    }

    /// Register a method, replacing any method with the same signature.
    pub fn with_method(mut self, method: Method) -> Self {
        let signature = method.signature();
        let method = Arc::new(method);
        match self
            .methods
            .iter_mut()
            .find(|existing| existing.signature() == signature)
        {
            Some(existing) => *existing = method,
            None => self.methods.push(method),
        }
        self
    }

    /// Register a method by signature, e.g. `add(uint256,uint256)`.
    pub fn with_signature(self, signature: &str) -> Result<Self> {
        Ok(self.with_method(Method::from_signature(signature)?))
    }

    /// Build the registry from every function of a JSON ABI.
    pub fn from_abi(address: Address, abi: &JsonAbi) -> Result<Self> {
        let methods = abi
            .functions()
            .map(|function| Method::from_function(function).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { address, methods })
    }

    /// Parse a JSON ABI, either a bare array or an artifact with an `abi` field.
    pub fn from_json(address: Address, json: &str) -> Result<Self> {
        let abi = match serde_json::from_str::<AbiSource>(json)? {
            AbiSource::Artifact { abi } | AbiSource::Bare(abi) => abi,
        };
        Self::from_abi(address, &abi)
    }

    /// Address the contract is deployed at.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Registered methods, in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|method| &**method)
    }

    /// Look up a method by name or full signature.
    pub fn method(&self, key: &str) -> Result<&Method> {
        self.resolve(key, None).map(|method| &**method)
    }

    /// Build a call command to `key`, a method name or full signature.
    ///
    /// An overloaded name is narrowed to the overload taking `args.len()` inputs.
    pub fn call(&self, key: &str, args: Vec<Value>) -> Result<Command> {
        let method = self.resolve(key, Some(args.len()))?;
        Ok(Command::new(self.address, Arc::clone(method), args))
    }

    fn resolve(&self, key: &str, arity: Option<usize>) -> Result<&Arc<Method>> {
        let mut candidates: Vec<&Arc<Method>> = if key.contains('(') {
            let signature = Method::from_signature(key)?.signature();
            self.methods
                .iter()
                .filter(|method| method.signature() == signature)
                .collect()
        } else {
            self.methods
                .iter()
                .filter(|method| method.name() == key)
                .collect()
        };

        if let Some(arity) = arity {
            if candidates.len() > 1 {
                candidates.retain(|method| method.inputs().len() == arity);
            }
        }

        match candidates.as_slice() {
            [] => Err(PlanError::MethodNotFound {
                contract: self.address,
                method: key.to_string(),
            }),
            [method] => Ok(*method),
            _ => Err(PlanError::AmbiguousMethod {
                contract: self.address,
                method: key.to_string(),
                candidates: candidates.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use alloy_dyn_abi::DynSolType;
    use alloy_primitives::{address, Selector};

    const MATH_ABI: &str = r#"[
        {
            "type": "function",
            "name": "add",
            "inputs": [
                {"name": "a", "type": "uint256", "internalType": "uint256"},
                {"name": "b", "type": "uint256", "internalType": "uint256"}
            ],
            "outputs": [{"name": "", "type": "uint256", "internalType": "uint256"}],
            "stateMutability": "pure"
        },
        {
            "type": "function",
            "name": "sum",
            "inputs": [{"name": "a", "type": "uint256", "internalType": "uint256"}],
            "outputs": [{"name": "", "type": "uint256", "internalType": "uint256"}],
            "stateMutability": "pure"
        },
        {
            "type": "function",
            "name": "sum",
            "inputs": [
                {"name": "a", "type": "uint256", "internalType": "uint256"},
                {"name": "b", "type": "uint256", "internalType": "uint256"}
            ],
            "outputs": [{"name": "", "type": "uint256", "internalType": "uint256"}],
            "stateMutability": "pure"
        }
    ]"#;

    fn math() -> Contract {
        Contract::from_json(address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"), MATH_ABI).unwrap()
    }

    #[test]
    fn test_from_json() {
        let contract = math();
        assert_eq!(contract.methods().count(), 3);

        let add = contract.method("add").unwrap();
        assert_eq!(add.selector(), Selector::new([0x77, 0x16, 0x02, 0xf7]));
        assert_eq!(add.inputs().len(), 2);
    }

    #[test]
    fn test_from_artifact_json() {
        let artifact = format!(r#"{{"contractName": "Math", "abi": {MATH_ABI}}}"#);
        let contract = Contract::from_json(Address::ZERO, &artifact).unwrap();
        assert_eq!(contract.methods().count(), 3);
    }

    #[test]
    fn test_invalid_json() {
        let result = Contract::from_json(Address::ZERO, "{\"abi\": 5}");
        assert!(matches!(result, Err(PlanError::Serialization(_))));
    }

    #[test]
    fn test_call_builds_command() {
        let contract = math();
        let command = contract.call("add", args![1u64, 2u64]).unwrap();

        assert_eq!(command.address(), contract.address());
        assert_eq!(command.method().name(), "add");
        assert_eq!(command.args().len(), 2);
    }

    #[test]
    fn test_method_not_found() {
        let result = math().call("mul", args![1u64, 2u64]);
        assert!(matches!(
            result,
            Err(PlanError::MethodNotFound { ref method, .. }) if method == "mul"
        ));
    }

    #[test]
    fn test_overloads() {
        let contract = math();

        let one = contract.call("sum", args![1u64]).unwrap();
        assert_eq!(one.method().inputs().len(), 1);

        let two = contract.call("sum", args![1u64, 2u64]).unwrap();
        assert_eq!(two.method().inputs().len(), 2);

        assert!(matches!(
            contract.method("sum"),
            Err(PlanError::AmbiguousMethod { candidates: 2, .. })
        ));

        let by_signature = contract.method("sum(uint256)").unwrap();
        assert_eq!(by_signature.signature(), "sum(uint256)");
    }

    #[test]
    fn test_with_signature() {
        let contract = Contract::new(Address::ZERO)
            .with_signature("logUint(uint256)")
            .unwrap()
            .with_signature("sender()")
            .unwrap();

        assert!(contract.method("logUint").is_ok());
        assert!(contract.method("sender").unwrap().inputs().is_empty());
    }

    #[test]
    fn test_reregistering_signature_replaces_method() {
        let selector = Selector::new([0xde, 0xad, 0xbe, 0xef]);
        let contract = Contract::new(Address::ZERO)
            .with_signature("add(uint256,uint256)")
            .unwrap()
            .with_signature("add(uint,uint)")
            .unwrap()
            .with_method(Method::with_selector(
                "add",
                selector,
                vec![DynSolType::Uint(256), DynSolType::Uint(256)],
            ));

        assert_eq!(contract.methods().count(), 1);
        assert_eq!(contract.method("add").unwrap().selector(), selector);
        assert!(contract.call("add", args![1u64, 2u64]).is_ok());
    }
}
