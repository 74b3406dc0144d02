//! Method descriptors and the literal encoding contract.
//!
//! Parameter types and values come from the alloy ABI codec. A literal is
//! encoded once, against the declared type of the parameter it is passed to,
//! and the resulting bytes become a state table entry.

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::{keccak256, Bytes, Selector};

use crate::error::{EncodeError, PlanError, Result};

/// A literal argument, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A typed value.
    Value(DynSolValue),
    /// Text parsed against the parameter type at planning time (e.g. `"42"`, `"0xdead..."`).
    Text(String),
}

/// A callable method: name, 4-byte selector and ordered input types.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    name: String,
    selector: Selector,
    inputs: Vec<DynSolType>,
}

impl Method {
    /// Create a method, deriving the selector from its canonical signature.
    pub fn new(name: impl Into<String>, inputs: Vec<DynSolType>) -> Self {
        let name = name.into();
        let selector = selector_of(&signature_of(&name, &inputs));
        Self {
            name,
            selector,
            inputs,
        }
    }

    /// Create a method with an explicit selector.
    pub fn with_selector(
        name: impl Into<String>,
        selector: Selector,
        inputs: Vec<DynSolType>,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            inputs,
        }
    }

    /// Parse a signature such as `add(uint256,uint256)`.
    ///
    /// Type aliases are canonicalised before hashing, so `add(uint,uint)`
    /// yields the same selector as `add(uint256,uint256)`.
    pub fn from_signature(signature: &str) -> Result<Self> {
        let signature = signature.trim();
        let open = signature
            .find('(')
            .ok_or_else(|| PlanError::InvalidAbi(format!("missing parameter list in {signature:?}")))?;

        let name = signature[..open].trim();
        if name.is_empty() {
            return Err(PlanError::InvalidAbi(format!(
                "missing method name in {signature:?}"
            )));
        }

        let params = &signature[open..];
        let inputs = if params.replace(' ', "") == "()" {
            Vec::new()
        } else {
            match DynSolType::parse(params)
                .map_err(|err| PlanError::InvalidAbi(format!("{signature}: {err}")))?
            {
                DynSolType::Tuple(types) => types,
                other => {
                    return Err(PlanError::InvalidAbi(format!(
                        "{signature}: expected a parameter list, got {}",
                        other.sol_type_name()
                    )))
                }
            }
        };

        Ok(Self::new(name, inputs))
    }

    /// Build a method from a JSON ABI function entry.
    pub fn from_function(function: &Function) -> Result<Self> {
        let inputs = function
            .inputs
            .iter()
            .map(|param| {
                param
                    .resolve()
                    .map_err(|err| PlanError::InvalidAbi(format!("{}: {err}", function.name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_selector(
            function.name.clone(),
            function.selector(),
            inputs,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    pub fn inputs(&self) -> &[DynSolType] {
        &self.inputs
    }

    /// Canonical signature, e.g. `add(uint256,uint256)`.
    pub fn signature(&self) -> String {
        signature_of(&self.name, &self.inputs)
    }
}

fn signature_of(name: &str, inputs: &[DynSolType]) -> String {
    let params: Vec<_> = inputs.iter().map(|ty| ty.sol_type_name()).collect();
    format!("{name}({})", params.join(","))
}

fn selector_of(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::new([hash[0], hash[1], hash[2], hash[3]])
}

/// Encode a literal against its declared parameter type.
pub fn encode_literal(ty: &DynSolType, literal: &Literal) -> std::result::Result<Bytes, EncodeError> {
    if ty.is_dynamic() {
        return Err(EncodeError::DynamicType(ty.sol_type_name().into_owned()));
    }

    let value = match literal {
        Literal::Text(input) => ty.coerce_str(input).map_err(|err| EncodeError::Parse {
            input: input.clone(),
            ty: ty.sol_type_name().into_owned(),
            message: err.to_string(),
        })?,
        Literal::Value(value) => coerce(ty, value)?,
    };

    Ok(Bytes::from(value.abi_encode()))
}

/// Fit a typed value to the parameter type, widening or narrowing unsigned integers that fit.
fn coerce(ty: &DynSolType, value: &DynSolValue) -> std::result::Result<DynSolValue, EncodeError> {
    if ty.matches(value) {
        return Ok(value.clone());
    }

    match (ty, value) {
        (DynSolType::Uint(bits), DynSolValue::Uint(n, _)) => {
            if n.bit_len() <= *bits {
                Ok(DynSolValue::Uint(*n, *bits))
            } else {
                Err(EncodeError::OutOfRange {
                    value: n.to_string(),
                    ty: ty.sol_type_name().into_owned(),
                })
            }
        }
        _ => Err(EncodeError::TypeMismatch {
            expected: ty.sol_type_name().into_owned(),
            found: value
                .as_type()
                .map(|found| found.sol_type_name().into_owned())
                .unwrap_or_else(|| format!("{value:?}")),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    #[test]
    fn test_selector_from_signature() {
        let add = Method::from_signature("add(uint256,uint256)").unwrap();
        assert_eq!(add.name(), "add");
        assert_eq!(add.selector(), Selector::new([0x77, 0x16, 0x02, 0xf7]));
        assert_eq!(add.inputs(), &[DynSolType::Uint(256), DynSolType::Uint(256)]);

        let transfer = Method::from_signature("transfer(address,uint256)").unwrap();
        assert_eq!(transfer.selector(), Selector::new([0xa9, 0x05, 0x9c, 0xbb]));
    }

    #[test]
    fn test_signature_aliases_are_canonicalised() {
        let method = Method::from_signature("add(uint,uint)").unwrap();
        assert_eq!(method.signature(), "add(uint256,uint256)");
        assert_eq!(method.selector(), Selector::new([0x77, 0x16, 0x02, 0xf7]));
    }

    #[test]
    fn test_no_argument_signature() {
        let method = Method::from_signature("sender()").unwrap();
        assert!(method.inputs().is_empty());
        assert_eq!(method.signature(), "sender()");
    }

    #[test]
    fn test_invalid_signatures() {
        assert!(matches!(
            Method::from_signature("add"),
            Err(PlanError::InvalidAbi(_))
        ));
        assert!(matches!(
            Method::from_signature("(uint256)"),
            Err(PlanError::InvalidAbi(_))
        ));
    }

    #[test]
    fn test_encode_uint_literal() {
        let bytes = encode_literal(
            &DynSolType::Uint(256),
            &Literal::Value(DynSolValue::from(U256::from(7))),
        )
        .unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 7);
        assert!(bytes[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_resizes_fitting_uint() {
        let narrow = Literal::Value(DynSolValue::Uint(U256::from(200), 256));
        let bytes = encode_literal(&DynSolType::Uint(8), &narrow).unwrap();
        assert_eq!(bytes[31], 200);

        let too_wide = Literal::Value(DynSolValue::Uint(U256::from(300), 256));
        assert!(matches!(
            encode_literal(&DynSolType::Uint(8), &too_wide),
            Err(EncodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_encode_text_literal() {
        let from_text = encode_literal(&DynSolType::Uint(256), &Literal::Text("10".into())).unwrap();
        let from_value = encode_literal(
            &DynSolType::Uint(256),
            &Literal::Value(DynSolValue::from(U256::from(10))),
        )
        .unwrap();
        assert_eq!(from_text, from_value);

        assert!(matches!(
            encode_literal(&DynSolType::Uint(256), &Literal::Text("ten".into())),
            Err(EncodeError::Parse { .. })
        ));
    }

    #[test]
    fn test_encode_rejects_mismatch_and_dynamic() {
        let address = Literal::Value(DynSolValue::from(Address::ZERO));
        assert!(matches!(
            encode_literal(&DynSolType::Bool, &address),
            Err(EncodeError::TypeMismatch { .. })
        ));

        assert_eq!(
            encode_literal(&DynSolType::String, &Literal::Text("hi".into())),
            Err(EncodeError::DynamicType("string".to_string()))
        );
    }
}
