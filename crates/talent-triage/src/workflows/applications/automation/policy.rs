use serde::{Deserialize, Serialize};

use super::super::domain::BatchAction;
use super::config::AutomationConfig;

/// Outcome of checking one score against a job's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationAction {
    None,
    AutoShortlist,
    AutoReject,
}

impl AutomationAction {
    pub const fn label(self) -> &'static str {
        match self {
            AutomationAction::None => "none",
            AutomationAction::AutoShortlist => "auto_shortlist",
            AutomationAction::AutoReject => "auto_reject",
        }
    }

    /// Status transition the action implies, if any.
    pub const fn batch_action(self) -> Option<BatchAction> {
        match self {
            AutomationAction::None => None,
            AutomationAction::AutoShortlist => Some(BatchAction::Shortlisted),
            AutomationAction::AutoReject => Some(BatchAction::Rejected),
        }
    }
}

/// Reject is checked before shortlist, so overlapping thresholds resolve to a rejection.
pub fn decide(score: u8, config: &AutomationConfig) -> AutomationAction {
    if config.auto_reject_enabled && score <= config.auto_reject_threshold {
        return AutomationAction::AutoReject;
    }

    if config.auto_shortlist_enabled && score >= config.auto_shortlist_threshold {
        return AutomationAction::AutoShortlist;
    }

    AutomationAction::None
}
