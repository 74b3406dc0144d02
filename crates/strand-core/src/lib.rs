//! # Strand Core
//!
//! Commands, values and plan artifacts for the Strand call sequencer.
//!
//! This crate provides the building blocks consumed by the planner:
//! - [`Contract`] / [`Method`] - call targets and their ABI
//! - [`Command`] / [`Value`] - a call and its literal or return-value arguments
//! - [`Plan`] / [`CommandWord`] - the compiled command words and state table
//! - [`PlanError`] - error taxonomy

pub mod abi;
pub mod command;
pub mod contract;
pub mod error;
pub mod plan;
pub mod types;

// Re-exports for convenience
pub use abi::{encode_literal, Literal, Method};
pub use command::{Command, ReturnHandle, Value};
pub use contract::Contract;
pub use error::{EncodeError, PlanError, Result};
pub use plan::{CommandWord, Plan};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::abi::{Literal, Method};
    pub use crate::args;
    pub use crate::command::{Command, ReturnHandle, Value};
    pub use crate::contract::Contract;
    pub use crate::error::{PlanError, Result};
    pub use crate::plan::{CommandWord, Plan};
}
