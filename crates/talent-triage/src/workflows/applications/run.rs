use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::automation::AutomationAction;
use super::batch::BucketFailure;
use super::domain::{ApplicationRef, JobId};

/// One application to score during an automation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageSubmission {
    pub application_id: ApplicationRef,
    #[serde(default)]
    pub resume_text: String,
}

/// Body of an automation run request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRunRequest {
    #[serde(default)]
    pub applications: Vec<TriageSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageDecision {
    pub application_id: ApplicationRef,
    pub overall_score: u8,
    pub action: AutomationAction,
}

/// Summary of an automation pass over a job's applications.
///
/// `shortlisted` and `rejected` count rows the store actually updated, which can be lower than
/// the number of matching decisions when ids do not belong to the job or a bucket fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRunReport {
    pub job_id: JobId,
    pub evaluated_at: DateTime<Utc>,
    pub decisions: Vec<TriageDecision>,
    pub shortlisted: usize,
    pub rejected: usize,
    pub untouched: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BucketFailure>,
}

impl AutomationRunReport {
    pub fn decided(&self, action: AutomationAction) -> impl Iterator<Item = &ApplicationRef> + '_ {
        self.decisions
            .iter()
            .filter(move |decision| decision.action == action)
            .map(|decision| &decision.application_id)
    }
}
