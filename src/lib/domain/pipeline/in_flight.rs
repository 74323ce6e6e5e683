//! In-flight action tracking

use std::collections::HashSet;

use super::{Action, PipelineError};

/// The set of actions currently running for one draft
#[derive(Debug, Default)]
pub(crate) struct InFlight(HashSet<Action>);

impl InFlight {
    pub(crate) fn is_running(&self, action: Action) -> bool {
        self.0.contains(&action)
    }

    /// Fails with the first of `actions` that is running
    pub(crate) fn ensure_idle(&self, actions: &[Action]) -> Result<(), PipelineError> {
        match actions.iter().find(|action| self.is_running(**action)) {
            Some(action) => Err(PipelineError::ActionInProgress(*action)),
            None => Ok(()),
        }
    }

    pub(crate) fn start(&mut self, action: Action) -> Result<(), PipelineError> {
        if !self.0.insert(action) {
            return Err(PipelineError::ActionInProgress(action));
        }

        Ok(())
    }

    pub(crate) fn finish(&mut self, action: Action) -> Result<(), PipelineError> {
        if !self.0.remove(&action) {
            return Err(PipelineError::NotStarted(action));
        }

        Ok(())
    }
}
