//! Evaluation driver shared by both machines
//!
//! [`Machine`] is the seam between an engine and everything that drives it:
//! a single-step transition, a completion test, an optional collector and a
//! read-only [`StateView`] for display. [`Interpreter`] runs any machine to
//! completion under a step budget and records every intermediate state so the
//! run can be replayed forward and backward.

use super::constants::{DEFAULT_MAX_STEPS, DEFAULT_SNAPSHOT_LIMIT};
use super::errors::EvalError;
use crate::snapshot::{Snapshot, SnapshotManager};
use log::{debug, info, trace, warn};

/// Display-ready description of one machine state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateView {
    /// Stack entries, top first
    pub stack: Vec<String>,
    /// Saved contexts, most recent first
    pub dump: Vec<String>,
    /// Pending instructions (empty for the graph reducer)
    pub code: Vec<String>,
    /// Live heap nodes in address order
    pub heap: Vec<String>,
    /// Printed values
    pub output: Vec<String>,
    /// Final value once the machine has stopped
    pub result: Option<String>,
    /// Global whose code or body is being entered
    pub active: Option<String>,
    pub steps: usize,
}

/// A steppable abstract machine
pub trait Machine {
    type State: Snapshot;

    /// Short engine name used in logs and titles
    const NAME: &'static str;

    fn is_final(state: &Self::State) -> bool;

    /// Perform one transition
    fn step(state: &mut Self::State) -> Result<(), EvalError>;

    /// Run the garbage collector, if the machine has one
    fn collect(_state: &mut Self::State) -> Result<(), EvalError> {
        Ok(())
    }

    fn view(state: &Self::State) -> StateView;
}

/// Limits and switches for a run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_steps: usize,
    pub snapshot_limit: usize,
    /// Collect garbage every N steps
    pub gc_interval: Option<usize>,
    pub record_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_steps: DEFAULT_MAX_STEPS,
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
            gc_interval: None,
            record_history: false,
        }
    }
}

pub struct Interpreter<M: Machine> {
    state: M::State,
    config: EngineConfig,
    snapshot_manager: SnapshotManager<M::State>,
    history_position: usize,
    steps_taken: usize,
    finished: bool,
    error: Option<EvalError>,
}

impl<M: Machine> Interpreter<M> {
    pub fn new(initial: M::State, config: EngineConfig) -> Self {
        let snapshot_manager = SnapshotManager::new(config.snapshot_limit);
        let mut interpreter = Interpreter {
            state: initial,
            config,
            snapshot_manager,
            history_position: 0,
            steps_taken: 0,
            finished: false,
            error: None,
        };
        if interpreter.config.record_history {
            // an initial state larger than the whole budget just means no history
            if let Err(e) = interpreter.take_snapshot() {
                warn!("{}: {}", M::NAME, e);
                interpreter.config.record_history = false;
            }
        }
        interpreter
    }

    /// Run until the machine reaches a final state or fails.
    ///
    /// On failure the states recorded so far stay available for replay.
    pub fn run(&mut self) -> Result<(), EvalError> {
        let result = self.run_inner();
        self.history_position = self.snapshot_manager.len().saturating_sub(1);
        match &result {
            Ok(()) => info!("{}: finished after {} steps", M::NAME, self.steps_taken),
            Err(e) => {
                info!("{}: failed after {} steps: {}", M::NAME, self.steps_taken, e);
                self.error = Some(e.clone());
            }
        }
        result
    }

    fn run_inner(&mut self) -> Result<(), EvalError> {
        while !M::is_final(&self.state) {
            if self.steps_taken >= self.config.max_steps {
                return Err(EvalError::StepLimitExceeded {
                    limit: self.config.max_steps,
                });
            }

            M::step(&mut self.state)?;
            self.steps_taken += 1;
            trace!("{}: step {}", M::NAME, self.steps_taken);

            if let Some(interval) = self.config.gc_interval {
                if interval > 0 && self.steps_taken % interval == 0 {
                    M::collect(&mut self.state)?;
                    debug!("{}: collected garbage at step {}", M::NAME, self.steps_taken);
                }
            }

            if self.config.record_history {
                self.take_snapshot()?;
            }
        }
        self.finished = true;
        Ok(())
    }

    fn take_snapshot(&mut self) -> Result<(), EvalError> {
        self.snapshot_manager
            .push(self.state.clone())
            .map_err(|(current, limit)| EvalError::SnapshotLimitExceeded { current, limit })
    }

    /// Move one recorded state back
    pub fn step_backward(&mut self) -> Result<(), EvalError> {
        if self.history_position == 0 {
            return Err(EvalError::HistoryUnavailable {
                message: "Already at the first recorded state",
            });
        }
        self.history_position -= 1;
        Ok(())
    }

    /// Move one recorded state forward
    pub fn step_forward(&mut self) -> Result<(), EvalError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(EvalError::HistoryUnavailable {
                message: "No more recorded states (evaluation finished)",
            });
        }
        self.history_position += 1;
        Ok(())
    }

    pub fn rewind_to_start(&mut self) -> Result<(), EvalError> {
        if self.snapshot_manager.is_empty() {
            return Err(EvalError::HistoryUnavailable {
                message: "No history recorded",
            });
        }
        self.history_position = 0;
        Ok(())
    }

    pub fn jump_to_end(&mut self) {
        self.history_position = self.snapshot_manager.len().saturating_sub(1);
    }

    // ========== Getter methods for UI ==========

    /// The recorded state at the history cursor, or the live state when
    /// nothing was recorded
    pub fn current(&self) -> &M::State {
        self.snapshot_manager
            .get(self.history_position)
            .unwrap_or(&self.state)
    }

    /// The live (most recent) state
    pub fn state(&self) -> &M::State {
        &self.state
    }

    pub fn into_state(self) -> M::State {
        self.state
    }

    pub fn history(&self) -> impl Iterator<Item = &M::State> {
        self.snapshot_manager.iter()
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn error(&self) -> Option<&EvalError> {
        self.error.as_ref()
    }
}
