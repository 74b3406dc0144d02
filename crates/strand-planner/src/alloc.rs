//! State slot allocation.
//!
//! Literals take the lowest slots, in order of first appearance. Return
//! values are then assigned in program order, reusing slots freed by values
//! whose last reader has run. Freed slots are handed out first-in first-out.

use std::collections::{HashSet, VecDeque};

use alloy_primitives::Bytes;
use strand_core::{PlanError, Result, Slot, MAX_STATE_SLOTS};
use tracing::debug;

use crate::analysis::{Analysis, VertexKind};
use crate::dag::VertexId;
use crate::planner::PlannerConfig;

/// Placeholder for a return slot; the VM overwrites it during execution.
const RETURN_PLACEHOLDER: &[u8] = &[0x00];

/// Growable state table bounded by a slot limit.
#[derive(Debug, Clone)]
pub struct StateTable {
    entries: Vec<Bytes>,
    limit: usize,
}

impl StateTable {
    /// Create an empty table holding at most `limit` entries (never more than 255).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.min(MAX_STATE_SLOTS),
        }
    }

    /// Append an entry on behalf of `command` and return its slot.
    pub fn reserve(&mut self, bytes: Bytes, command: usize) -> Result<Slot> {
        if self.entries.len() >= self.limit {
            return Err(PlanError::SlotOverflow {
                command,
                limit: self.limit,
            });
        }
        let slot = self.entries.len() as Slot;
        self.entries.push(bytes);
        Ok(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Bytes> {
        self.entries
    }
}

/// Assign a slot to every vertex that needs one and return the initial state.
pub fn allocate(analysis: &mut Analysis, config: &PlannerConfig) -> Result<Vec<Bytes>> {
    let mut state = StateTable::new(config.max_slots);
    allocate_literals(analysis, &mut state)?;
    allocate_returns(analysis, &mut state, config.reuse_slots)?;
    Ok(state.into_entries())
}

fn allocate_literals(analysis: &mut Analysis, state: &mut StateTable) -> Result<()> {
    let Analysis { dag, commands } = analysis;

    for (index, command) in commands.iter().enumerate() {
        for &arg in &command.args {
            let vertex = dag.vertex_mut(arg);
            if let (VertexKind::Literal(bytes), None) = (&vertex.kind, vertex.slot) {
                vertex.slot = Some(state.reserve(bytes.clone(), index)?);
            }
        }
    }
    Ok(())
}

fn allocate_returns(analysis: &mut Analysis, state: &mut StateTable, reuse: bool) -> Result<()> {
    let Analysis { dag, commands } = analysis;
    let mut free: VecDeque<Slot> = VecDeque::new();
    let mut done: HashSet<VertexId> = HashSet::new();

    for (index, command) in commands.iter().enumerate() {
        let Some(ret) = command.ret else {
            continue;
        };

        let slot = match free.pop_front() {
            Some(slot) => {
                debug!("Command {index} reuses slot {slot} for its return value");
                slot
            }
            None => state.reserve(Bytes::from_static(RETURN_PLACEHOLDER), index)?,
        };
        dag.vertex_mut(ret).slot = Some(slot);

        if reuse {
            // A value dies here once every other consumer in the graph has run.
            // Readers whose own return is never consumed have no vertex, hence
            // the extra check on the last reader.
            for input in dag.inbound(ret) {
                let vertex = dag.vertex(input);
                let consumed = dag
                    .outbound(input)
                    .all(|out| out == ret || done.contains(&out));
                if !consumed || vertex.last_reader > index {
                    continue;
                }
                if let Some(freed) = vertex.slot {
                    debug!("Slot {freed} ({input}) is free after command {index}");
                    free.push_back(freed);
                }
            }
        }

        done.insert(ret);
    }
    Ok(())
}
