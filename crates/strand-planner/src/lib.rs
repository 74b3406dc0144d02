//! # Strand Planner
//!
//! Compiles a sequence of [`Command`](strand_core::Command)s into the command
//! words and state table executed by the sequencer VM.
//!
//! Planning runs three passes over the program:
//! 1. [`analysis`] resolves arguments into a value-flow [`dag`],
//! 2. [`alloc`] assigns state slots, reusing the slots of dead values,
//! 3. [`encode`] packs each command into a 32-byte word.

pub mod alloc;
pub mod analysis;
pub mod dag;
pub mod encode;
pub mod planner;

pub use dag::{Dag, VertexId};
pub use planner::{Planner, PlannerConfig};
pub use strand_core::prelude;
