//! Bounded undo/redo stack.
//!
//! `past` holds executed commands oldest first; `future` holds undone
//! commands with the most recently undone at the front. A command whose
//! action fails is put back exactly where it was, so a failure never
//! changes what `can_undo`/`can_redo` report.

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::command::Command;
use crate::config::{DEFAULT_MAX_STACK_SIZE, MIN_MAX_STACK_SIZE};

/// Which side of a command was running when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandPhase {
    Execute,
    Undo,
    Redo,
}

impl fmt::Display for CommandPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Execute => "execute",
            Self::Undo => "undo",
            Self::Redo => "redo",
        })
    }
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("command '{label}' failed to {phase}: {source}")]
    CommandFailed {
        label: String,
        phase: CommandPhase,
        #[source]
        source: anyhow::Error,
    },
}

impl HistoryError {
    fn failed(command: &Command, phase: CommandPhase, source: anyhow::Error) -> Self {
        let label = command.label().unwrap_or("unlabeled").to_string();
        Self::CommandFailed {
            label,
            phase,
            source,
        }
    }
}

pub struct HistoryStack {
    past: VecDeque<Command>,
    future: VecDeque<Command>,
    max_stack_size: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK_SIZE)
    }
}

impl HistoryStack {
    /// `max_stack_size` below one is clamped to one.
    pub fn new(max_stack_size: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_stack_size: max_stack_size.max(MIN_MAX_STACK_SIZE),
        }
    }

    /// Runs `command` and records it. Clears the redo side.
    pub fn execute(&mut self, mut command: Command) -> Result<(), HistoryError> {
        if let Err(source) = command.run_execute() {
            return Err(HistoryError::failed(&command, CommandPhase::Execute, source));
        }

        self.future.clear();
        self.push_past(command);
        Ok(())
    }

    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, HistoryError> {
        let Some(mut command) = self.past.pop_back() else {
            return Ok(false);
        };

        match command.run_undo() {
            Ok(()) => {
                debug!(command = ?command.label(), "Undid command");
                self.future.push_front(command);
                Ok(true)
            }
            Err(source) => {
                let err = HistoryError::failed(&command, CommandPhase::Undo, source);
                self.past.push_back(command);
                Err(err)
            }
        }
    }

    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, HistoryError> {
        let Some(mut command) = self.future.pop_front() else {
            return Ok(false);
        };

        match command.run_execute() {
            Ok(()) => {
                debug!(command = ?command.label(), "Redid command");
                self.push_past(command);
                Ok(true)
            }
            Err(source) => {
                let err = HistoryError::failed(&command, CommandPhase::Redo, source);
                self.future.push_front(command);
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.past.back().and_then(Command::label)
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.future.front().and_then(Command::label)
    }

    pub fn len_past(&self) -> usize {
        self.past.len()
    }

    pub fn len_future(&self) -> usize {
        self.future.len()
    }

    pub fn max_stack_size(&self) -> usize {
        self.max_stack_size
    }

    /// Applies a new limit and trims the oldest entries right away.
    ///
    /// Returns how many commands were evicted.
    pub fn set_max_stack_size(&mut self, max_stack_size: usize) -> usize {
        self.max_stack_size = max_stack_size.max(MIN_MAX_STACK_SIZE);
        let evicted = self.trim();
        if evicted > 0 {
            debug!(
                evicted,
                max_stack_size = self.max_stack_size,
                "Trimmed history after limit change"
            );
        }
        evicted
    }

    fn push_past(&mut self, command: Command) {
        self.past.push_back(command);
        self.trim();
    }

    fn trim(&mut self) -> usize {
        let excess = self.past.len().saturating_sub(self.max_stack_size);
        self.past.drain(..excess);
        excess
    }
}

impl fmt::Debug for HistoryStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStack")
            .field("past", &self.past.len())
            .field("future", &self.future.len())
            .field("max_stack_size", &self.max_stack_size)
            .finish()
    }
}
