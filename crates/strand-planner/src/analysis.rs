//! Dependency analysis: resolves every argument to a vertex of the value-flow graph.
//!
//! Literals are encoded and interned by their bytes. A command's return
//! vertex is created lazily, the first time a later command consumes its
//! handle, and only then linked to the command's own argument vertices. A
//! return nobody consumes never enters the graph and never gets a slot.

use std::collections::HashMap;

use alloy_primitives::Bytes;
use strand_core::{encode_literal, Command, PlanError, Result, Slot, Value};
use tracing::trace;
use uuid::Uuid;

use crate::dag::{Dag, VertexId};

/// What a vertex stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexKind {
    /// An encoded literal, shared by every argument with the same bytes.
    Literal(Bytes),
    /// The return value of the command at this index.
    Return { command: usize },
}

/// A value in the graph, with its assigned state slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub kind: VertexKind,
    /// Set during slot allocation.
    pub slot: Option<Slot>,
    /// Index of the last command that reads this value.
    pub last_reader: usize,
}

impl Vertex {
    fn new(kind: VertexKind, first_reader: usize) -> Self {
        Self {
            kind,
            slot: None,
            last_reader: first_reader,
        }
    }

    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, VertexKind::Literal(_))
    }
}

/// A command with its arguments resolved to vertices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub args: Vec<VertexId>,
    /// Present only if some later command consumes the return value.
    pub ret: Option<VertexId>,
}

/// Result of the dependency pass.
#[derive(Debug, Default)]
pub struct Analysis {
    pub dag: Dag<Vertex>,
    pub commands: Vec<ResolvedCommand>,
}

/// Build the value-flow graph for `commands`, issued by the planner `planner`.
pub fn analyze(planner: Uuid, commands: &[Command]) -> Result<Analysis> {
    let mut dag = Dag::new();
    let mut resolved: Vec<ResolvedCommand> = Vec::with_capacity(commands.len());
    let mut literals: HashMap<Bytes, VertexId> = HashMap::new();

    for (index, command) in commands.iter().enumerate() {
        if !command.kind().is_supported() {
            return Err(PlanError::Unsupported {
                command: index,
                kind: command.kind(),
            });
        }

        let inputs = command.method().inputs();
        if inputs.len() != command.args().len() {
            return Err(PlanError::ArgumentCountMismatch {
                command: index,
                expected: inputs.len(),
                got: command.args().len(),
            });
        }

        let mut args = Vec::with_capacity(command.args().len());
        for (argument, (value, ty)) in command.args().iter().zip(inputs).enumerate() {
            let vertex = match value {
                Value::Return(handle) => {
                    if handle.planner() != planner || handle.index() >= index {
                        return Err(PlanError::DanglingReference {
                            command: index,
                            argument,
                        });
                    }
                    let producer = &mut resolved[handle.index()];
                    match producer.ret {
                        Some(ret) => ret,
                        None => {
                            let ret = dag.add_vertex(Vertex::new(
                                VertexKind::Return {
                                    command: handle.index(),
                                },
                                index,
                            ));
                            for &input in &producer.args {
                                dag.add_edge(input, ret);
                            }
                            producer.ret = Some(ret);
                            ret
                        }
                    }
                }
                Value::Literal(literal) => {
                    let bytes = encode_literal(ty, literal).map_err(|source| PlanError::Encode {
                        command: index,
                        argument,
                        source,
                    })?;
                    match literals.get(&bytes) {
                        Some(&id) => {
                            trace!("Literal for argument {argument} of command {index} interned as {id}");
                            id
                        }
                        None => {
                            let id = dag.add_vertex(Vertex::new(
                                VertexKind::Literal(bytes.clone()),
                                index,
                            ));
                            literals.insert(bytes, id);
                            id
                        }
                    }
                }
            };

            dag.vertex_mut(vertex).last_reader = index;
            args.push(vertex);
        }

        resolved.push(ResolvedCommand { args, ret: None });
    }

    Ok(Analysis {
        dag,
        commands: resolved,
    })
}
