use serde::{Deserialize, Serialize};

use super::automation::AutomationConfig;
use super::domain::{ApplicationKind, ApplicationRef, ApplicationStatus, BatchAction, JobId, JobPosting};
use crate::workflows::matching::MatchResult;

/// Storage abstraction over both application variants.
pub trait ApplicationStore: Send + Sync {
    /// Set `status` on every `kind` row whose id is in `ids` and whose job is `job_id`, as a single
    /// bulk operation. Returns the ids of the rows matched by the filter, in `ids` order; rows
    /// already holding `status` are included but otherwise untouched.
    fn bulk_update_status(
        &self,
        kind: ApplicationKind,
        job_id: &JobId,
        ids: &[String],
        status: ApplicationStatus,
    ) -> Result<Vec<String>, RepositoryError>;

    /// Persist a fresh analysis. Returns `false` when no such application exists under the job.
    fn record_analysis(
        &self,
        application: &ApplicationRef,
        job_id: &JobId,
        analysis: &MatchResult,
    ) -> Result<bool, RepositoryError>;
}

/// Job postings and the automation configuration they own.
pub trait JobRepository: Send + Sync {
    fn find_job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn automation_config(&self, job_id: &JobId)
        -> Result<Option<AutomationConfig>, RepositoryError>;
    /// Update the row keyed by `config.job_id` if present, insert it otherwise.
    fn upsert_automation_config(
        &self,
        config: AutomationConfig,
    ) -> Result<AutomationConfig, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for candidate-facing status notices (e-mail adapters and the like).
///
/// Implementations must only enqueue; delivery happens outside the caller's request.
pub trait NotificationSender: Send + Sync {
    fn schedule(&self, notice: StatusNotice) -> Result<(), NotificationError>;
}

/// Notice payload describing which applications moved to which status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusNotice {
    pub job_id: JobId,
    pub application_ids: Vec<ApplicationRef>,
    pub action: BatchAction,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
