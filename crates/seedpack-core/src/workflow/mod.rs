//! Configure → Review → Deploy stepper.
//!
//! The [`Stepper`] owns the selection policy and the current stage. Moving
//! forward asks the policy first; selections can only change while
//! configuring.

use tracing::debug;

use crate::error::{SelectionError, TransitionError};
use crate::policy::{ComponentSelectionPolicy, ComponentView};
use crate::types::WorkflowStage;

/// How a stage is shown in the stepper header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug)]
pub struct Stepper {
    policy: ComponentSelectionPolicy,
    current: WorkflowStage,
}

impl Stepper {
    /// Start at Configure.
    pub fn new(policy: ComponentSelectionPolicy) -> Self {
        Self {
            policy,
            current: WorkflowStage::Configure,
        }
    }

    pub fn current_stage(&self) -> WorkflowStage {
        self.current
    }

    pub fn policy(&self) -> &ComponentSelectionPolicy {
        &self.policy
    }

    pub fn into_policy(self) -> ComponentSelectionPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> Vec<ComponentView<'_>> {
        self.policy.snapshot()
    }

    /// Toggle a component. Only allowed while configuring.
    pub fn toggle(&mut self, name: &str) -> Result<bool, SelectionError> {
        if self.current != WorkflowStage::Configure {
            return Err(SelectionError::StageLocked(self.current));
        }
        self.policy.toggle(name)
    }

    /// Replace the optional selection. Only allowed while configuring.
    pub fn select_optional<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SelectionError> {
        if self.current != WorkflowStage::Configure {
            return Err(SelectionError::StageLocked(self.current));
        }
        self.policy.select_optional(names)
    }

    /// Details can be opened in any stage.
    pub fn toggle_expanded(&mut self, name: &str) -> Result<bool, SelectionError> {
        self.policy.toggle_expanded(name)
    }

    pub fn can_advance(&self) -> bool {
        self.policy.can_advance(self.current)
    }

    /// Move to the next stage if the policy allows it.
    pub fn advance(&mut self) -> Result<WorkflowStage, TransitionError> {
        let next = self
            .current
            .next()
            .ok_or(TransitionError::AtFinalStage(self.current))?;
        if !self.policy.can_advance(self.current) {
            return Err(TransitionError::Blocked { from: self.current });
        }

        debug!(from = %self.current, to = %next, "Advancing workflow");
        self.current = next;
        Ok(next)
    }

    /// Return to the previous stage. Always allowed except from Configure.
    pub fn back(&mut self) -> Result<WorkflowStage, TransitionError> {
        let previous = self
            .current
            .previous()
            .ok_or(TransitionError::AtFirstStage(self.current))?;
        self.current = previous;
        Ok(previous)
    }

    /// Every stage with its status, in order.
    pub fn steps(&self) -> Vec<(WorkflowStage, StepStatus)> {
        WorkflowStage::all()
            .iter()
            .map(|&stage| {
                let status = match stage.cmp(&self.current) {
                    std::cmp::Ordering::Less => StepStatus::Complete,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Upcoming,
                };
                (stage, status)
            })
            .collect()
    }
}
