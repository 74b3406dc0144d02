//! Command word encoding.

use alloy_primitives::B256;
use strand_core::{Command, CommandWord, PlanError, Result, Slot, MAX_INPUTS, UNUSED_SLOT};

use crate::analysis::Analysis;
use crate::dag::VertexId;

/// Encode one word per command, using the slots assigned by the allocator.
pub fn encode_commands(commands: &[Command], analysis: &Analysis) -> Result<Vec<B256>> {
    commands
        .iter()
        .zip(&analysis.commands)
        .enumerate()
        .map(|(index, (command, resolved))| {
            if command.args().len() > MAX_INPUTS {
                return Err(PlanError::TooManyArguments {
                    command: index,
                    count: command.args().len(),
                    max: MAX_INPUTS,
                });
            }

            // Callers may encode without going through analysis.
            let flags = command.kind().flags().ok_or(PlanError::Unsupported {
                command: index,
                kind: command.kind(),
            })?;

            let mut inputs = [UNUSED_SLOT; MAX_INPUTS];
            for (input, &arg) in inputs.iter_mut().zip(&resolved.args) {
                *input = slot_of(analysis, arg)?;
            }

            let output = match resolved.ret {
                Some(ret) => slot_of(analysis, ret)?,
                None => UNUSED_SLOT,
            };

            let word = CommandWord {
                selector: command.method().selector(),
                flags,
                inputs,
                output,
                target: command.address(),
            };
            Ok(word.encode())
        })
        .collect()
}

fn slot_of(analysis: &Analysis, id: VertexId) -> Result<Slot> {
    analysis
        .dag
        .vertex(id)
        .slot()
        .ok_or_else(|| PlanError::Internal(format!("vertex {id} was never assigned a slot")))
}
