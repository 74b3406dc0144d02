//! Planner output: command words and the state table.
//!
//! Each command is packed into a 32-byte word:
//!
//! | offset | width | field        |
//! |-------:|------:|--------------|
//! | 0      | 4     | selector     |
//! | 4      | 1     | flags        |
//! | 5      | 6     | input slots  |
//! | 11     | 1     | output slot  |
//! | 12     | 20    | target       |
//!
//! Unused input slots and an absent output are [`UNUSED_SLOT`].

use alloy_primitives::{hex, Address, Bytes, Selector, B256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{Slot, MAX_INPUTS, UNUSED_SLOT};

const FLAGS_OFFSET: usize = 4;
const INPUTS_OFFSET: usize = 5;
const OUTPUT_OFFSET: usize = INPUTS_OFFSET + MAX_INPUTS;
const TARGET_OFFSET: usize = OUTPUT_OFFSET + 1;

/// Structured view of a 32-byte command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandWord {
    pub selector: Selector,
    pub flags: u8,
    pub inputs: [Slot; MAX_INPUTS],
    pub output: Slot,
    pub target: Address,
}

impl CommandWord {
    /// Pack into the wire layout.
    pub fn encode(&self) -> B256 {
        let mut word = [0u8; 32];
        word[..FLAGS_OFFSET].copy_from_slice(self.selector.as_slice());
        word[FLAGS_OFFSET] = self.flags;
        word[INPUTS_OFFSET..OUTPUT_OFFSET].copy_from_slice(&self.inputs);
        word[OUTPUT_OFFSET] = self.output;
        word[TARGET_OFFSET..].copy_from_slice(self.target.as_slice());
        B256::from(word)
    }

    /// Unpack a word produced by [`CommandWord::encode`].
    pub fn decode(word: &B256) -> Self {
        let mut inputs = [UNUSED_SLOT; MAX_INPUTS];
        inputs.copy_from_slice(&word[INPUTS_OFFSET..OUTPUT_OFFSET]);

        Self {
            selector: Selector::from_slice(&word[..FLAGS_OFFSET]),
            flags: word[FLAGS_OFFSET],
            inputs,
            output: word[OUTPUT_OFFSET],
            target: Address::from_slice(&word[TARGET_OFFSET..]),
        }
    }

    /// Input slots actually used, in argument order.
    pub fn used_inputs(&self) -> impl Iterator<Item = Slot> + '_ {
        self.inputs
            .iter()
            .copied()
            .take_while(|slot| *slot != UNUSED_SLOT)
    }

    /// Slot receiving the return value, if any.
    pub fn output_slot(&self) -> Option<Slot> {
        (self.output != UNUSED_SLOT).then_some(self.output)
    }
}

/// A compiled plan, ready to be passed to the VM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// One word per command, in program order.
    pub commands: Vec<B256>,

    /// Initial state; slot `i` of a command word indexes `state[i]`.
    pub state: Vec<Bytes>,
}

impl Plan {
    pub fn new(commands: Vec<B256>, state: Vec<Bytes>) -> Self {
        Self { commands, state }
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Decoded view of every command word.
    pub fn words(&self) -> impl Iterator<Item = CommandWord> + '_ {
        self.commands.iter().map(CommandWord::decode)
    }

    /// SHA-256 fingerprint over the commands and state, hex-encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.commands.len() as u64).to_be_bytes());
        for word in &self.commands {
            hasher.update(word.as_slice());
        }
        hasher.update((self.state.len() as u64).to_be_bytes());
        for entry in &self.state {
            hasher.update((entry.len() as u64).to_be_bytes());
            hasher.update(entry.as_ref());
        }
        hex::encode(hasher.finalize())
    }
}
