//! Shared core types used across the policy and workflow layers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stages of the package workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    /// Choosing which optional components to deploy.
    Configure,
    /// Read-only summary of the selection.
    Review,
    /// Submitting the selection to the backend.
    Deploy,
}

impl WorkflowStage {
    /// 1-based position shown in the stepper header.
    pub const fn step_number(self) -> u8 {
        match self {
            Self::Configure => 1,
            Self::Review => 2,
            Self::Deploy => 3,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Configure => Some(Self::Review),
            Self::Review => Some(Self::Deploy),
            Self::Deploy => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Configure => None,
            Self::Review => Some(Self::Configure),
            Self::Deploy => Some(Self::Review),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Configure => "Configure",
            Self::Review => "Review",
            Self::Deploy => "Deploy",
        }
    }

    pub const fn all() -> &'static [Self] {
        &[Self::Configure, Self::Review, Self::Deploy]
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_strictly_ordered() {
        assert!(WorkflowStage::Configure < WorkflowStage::Review);
        assert!(WorkflowStage::Review < WorkflowStage::Deploy);
        for pair in WorkflowStage::all().windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert_eq!(pair[1].previous(), Some(pair[0]));
        }
        assert_eq!(WorkflowStage::Deploy.next(), None);
        assert_eq!(WorkflowStage::Configure.previous(), None);
    }

    #[test]
    fn step_numbers_start_at_one() {
        assert_eq!(WorkflowStage::Configure.step_number(), 1);
        assert_eq!(WorkflowStage::Deploy.step_number(), 3);
        assert_eq!(WorkflowStage::Review.to_string(), "Review");
    }
}
