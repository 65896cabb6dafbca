//! Pluggable checks consulted before the workflow advances.

use super::ComponentView;
use crate::types::WorkflowStage;

/// Decides whether the workflow may leave `from` given the current selection.
pub trait AdvanceRule: Send + Sync {
    fn allows(&self, from: WorkflowStage, snapshot: &[ComponentView<'_>]) -> bool;
}

impl<F> AdvanceRule for F
where
    F: Fn(WorkflowStage, &[ComponentView<'_>]) -> bool + Send + Sync,
{
    fn allows(&self, from: WorkflowStage, snapshot: &[ComponentView<'_>]) -> bool {
        self(from, snapshot)
    }
}

/// Requires at least `min` checked components before leaving Configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumSelection(pub usize);

impl AdvanceRule for MinimumSelection {
    fn allows(&self, from: WorkflowStage, snapshot: &[ComponentView<'_>]) -> bool {
        if from != WorkflowStage::Configure {
            return true;
        }
        snapshot.iter().filter(|view| view.state.checked).count() >= self.0
    }
}
