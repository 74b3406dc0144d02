//! Planner and configuration.

use serde::{Deserialize, Serialize};
use strand_core::{Command, Plan, Result, ReturnHandle, MAX_STATE_SLOTS};
use tracing::{debug, info};
use uuid::Uuid;

use crate::alloc::allocate;
use crate::analysis::analyze;
use crate::encode::encode_commands;

/// Configuration for the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Reuse the slots of dead values for later return values.
    pub reuse_slots: bool,

    /// Maximum number of state table entries (capped at 255).
    pub max_slots: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reuse_slots: true,
            max_slots: MAX_STATE_SLOTS,
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Collects commands in program order and compiles them into a [`Plan`].
#[derive(Debug)]
pub struct Planner {
    id: Uuid,
    config: PlannerConfig,
    commands: Vec<Command>,
}

impl Planner {
    /// Create a new planner with default configuration.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    /// Create a new planner with custom configuration.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            commands: Vec::new(),
        }
    }

    /// Identity stamped into every handle this planner issues.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Append a command; its return value can be passed to later commands.
    pub fn add(&mut self, command: Command) -> ReturnHandle {
        let handle = ReturnHandle::new(self.id, self.commands.len());
        debug!("Added command {}: {}", handle.index(), command);
        self.commands.push(command);
        handle
    }

    /// Commands added so far, in program order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands added so far.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command has been added yet.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get the current configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Update the configuration.
    pub fn set_config(&mut self, config: PlannerConfig) {
        self.config = config;
    }

    /// Compile the commands into command words and an initial state table.
    ///
    /// Planning is deterministic: the same commands always yield the same
    /// plan, or the same error.
    pub fn plan(&self) -> Result<Plan> {
        info!("Planning {} commands", self.commands.len());

        let mut analysis = analyze(self.id, &self.commands)?;
        debug!(
            "Value graph has {} vertices and {} edges",
            analysis.dag.len(),
            analysis.dag.edge_count()
        );

        let state = allocate(&mut analysis, &self.config)?;
        let commands = encode_commands(&self.commands, &analysis)?;

        let plan = Plan::new(commands, state);
        info!(
            "Planned {} commands with {} state slots ({})",
            plan.len(),
            plan.state.len(),
            plan.digest()
        );
        Ok(plan)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone is a new planner: it gets a fresh identity, so handles issued by
/// either copy after the split are dangling in the other.
impl Clone for Planner {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            config: self.config.clone(),
            commands: self.commands.clone(),
        }
    }
}
