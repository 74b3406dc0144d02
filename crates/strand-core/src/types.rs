//! Common types shared by commands and plans.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index into the state table.
pub type Slot = u8;

/// Sentinel for an unused input slot or an absent return slot.
pub const UNUSED_SLOT: Slot = 0xff;

/// Number of input slots in a command word.
pub const MAX_INPUTS: usize = 6;

/// Number of addressable state slots; `UNUSED_SLOT` is never allocated.
pub const MAX_STATE_SLOTS: usize = UNUSED_SLOT as usize;

/// Execution mode of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// A regular external call.
    #[default]
    Call,
    /// A call executed in the VM's own context.
    DelegateCall,
    /// A call whose return value replaces the whole state.
    RawCall,
    /// A call that receives a nested plan.
    SubPlan,
}

impl CommandType {
    /// Flags byte emitted for this mode, if the mode has an encoding.
    pub fn flags(&self) -> Option<u8> {
        match self {
            CommandType::Call => Some(0x00),
            _ => None,
        }
    }

    /// Returns true if commands of this mode can be planned.
    pub fn is_supported(&self) -> bool {
        self.flags().is_some()
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandType::Call => "CALL",
            CommandType::DelegateCall => "DELEGATECALL",
            CommandType::RawCall => "RAWCALL",
            CommandType::SubPlan => "SUBPLAN",
        };
        f.write_str(name)
    }
}
