use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::automation::{
    decide, AutomationAction, AutomationConfig, AutomationSettings, ThresholdOutOfRange,
};
use super::batch::{self, BatchActionOutcome, BatchPlan};
use super::domain::{
    BatchAction, JobId, JobPosting, RecruiterId, UnknownBatchAction, UnrecognizedApplicationId,
};
use super::repository::{
    ApplicationStore, JobRepository, NotificationSender, RepositoryError, StatusNotice,
};
use super::run::{AutomationRunReport, TriageDecision, TriageSubmission};
use crate::workflows::matching::{MatchEngine, MatchResult, ScoreInput, ScoreInputError};

/// Body of a batch status request as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(default)]
    pub application_ids: Vec<String>,
    #[serde(default)]
    pub action: Option<String>,
}

impl BatchRequest {
    pub fn new<I, S>(application_ids: I, action: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            application_ids: application_ids.into_iter().map(Into::into).collect(),
            action: Some(action.into()),
        }
    }

    /// Check the request shape in precondition order: ids present, action present and known,
    /// every id carrying a variant prefix.
    pub fn validate(&self) -> Result<(BatchPlan, BatchAction), InputError> {
        if self.application_ids.is_empty() {
            return Err(InputError::EmptyApplicationIds);
        }
        let action = self
            .action
            .as_deref()
            .filter(|action| !action.trim().is_empty())
            .ok_or(InputError::MissingAction)?
            .parse::<BatchAction>()?;
        let plan = BatchPlan::parse(&self.application_ids)?;
        Ok((plan, action))
    }
}

/// Caller mistakes rejected before any computation or store access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("resumeText is required")]
    MissingResumeText,
    #[error("jobDescriptionText is required")]
    MissingJobDescription,
    #[error("applicationIds must not be empty")]
    EmptyApplicationIds,
    #[error("action is required")]
    MissingAction,
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("application id '{0}' must start with 'candidate-' or 'public-'")]
    UnrecognizedApplicationId(String),
    #[error("{field} must be between 0 and 100 (got {value})")]
    ThresholdOutOfRange { field: &'static str, value: i64 },
    #[error("applications must not be empty")]
    EmptySubmissions,
}

impl From<ScoreInputError> for InputError {
    fn from(value: ScoreInputError) -> Self {
        match value {
            ScoreInputError::MissingResumeText => Self::MissingResumeText,
            ScoreInputError::MissingJobDescription => Self::MissingJobDescription,
        }
    }
}

impl From<UnknownBatchAction> for InputError {
    fn from(value: UnknownBatchAction) -> Self {
        Self::UnknownAction(value.0)
    }
}

impl From<UnrecognizedApplicationId> for InputError {
    fn from(value: UnrecognizedApplicationId) -> Self {
        Self::UnrecognizedApplicationId(value.0)
    }
}

impl From<ThresholdOutOfRange> for InputError {
    fn from(value: ThresholdOutOfRange) -> Self {
        Self::ThresholdOutOfRange {
            field: value.field,
            value: value.value,
        }
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error(transparent)]
    Input(#[from] InputError),
    /// Also returned when the job exists but belongs to another recruiter.
    #[error("job '{0}' not found")]
    JobNotFound(JobId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ScoreInputError> for TriageError {
    fn from(value: ScoreInputError) -> Self {
        Self::Input(value.into())
    }
}

/// Service composing the match engine, automation policy, and batch orchestrator.
pub struct TriageService<A, J, N> {
    engine: MatchEngine,
    applications: Arc<A>,
    jobs: Arc<J>,
    notifier: Arc<N>,
}

impl<A, J, N> TriageService<A, J, N>
where
    A: ApplicationStore + 'static,
    J: JobRepository + 'static,
    N: NotificationSender + 'static,
{
    pub fn new(engine: MatchEngine, applications: Arc<A>, jobs: Arc<J>, notifier: Arc<N>) -> Self {
        Self {
            engine,
            applications,
            jobs,
            notifier,
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Score a resume against a job description.
    pub fn score(&self, input: &ScoreInput) -> Result<MatchResult, TriageError> {
        Ok(self.engine.score_input(input)?)
    }

    fn authorize(&self, requester: &RecruiterId, job_id: &JobId) -> Result<JobPosting, TriageError> {
        match self.jobs.find_job(job_id)? {
            Some(posting) if posting.is_owned_by(requester) => Ok(posting),
            Some(_) => {
                debug!(%job_id, %requester, "requester does not own job; reporting not found");
                Err(TriageError::JobNotFound(job_id.clone()))
            }
            None => Err(TriageError::JobNotFound(job_id.clone())),
        }
    }

    fn stored_config(&self, job_id: &JobId) -> Result<AutomationConfig, TriageError> {
        Ok(self
            .jobs
            .automation_config(job_id)?
            .unwrap_or_else(|| AutomationConfig::disabled(job_id.clone())))
    }

    /// Current automation settings, falling back to the all-disabled defaults.
    pub fn automation_config(
        &self,
        requester: &RecruiterId,
        job_id: &JobId,
    ) -> Result<AutomationConfig, TriageError> {
        self.authorize(requester, job_id)?;
        self.stored_config(job_id)
    }

    /// Merge `settings` onto the stored configuration (or the defaults) and upsert it.
    pub fn configure_automation(
        &self,
        requester: &RecruiterId,
        job_id: &JobId,
        settings: &AutomationSettings,
    ) -> Result<AutomationConfig, TriageError> {
        // Range errors surface before any store access.
        settings
            .apply_to(AutomationConfig::disabled(job_id.clone()))
            .map_err(InputError::from)?;

        self.authorize(requester, job_id)?;
        let mut config = settings
            .apply_to(self.stored_config(job_id)?)
            .map_err(InputError::from)?;
        config.updated_at = Some(Utc::now());

        let stored = self.jobs.upsert_automation_config(config)?;
        info!(
            %job_id,
            auto_reject = stored.auto_reject_enabled,
            reject_threshold = stored.auto_reject_threshold,
            auto_shortlist = stored.auto_shortlist_enabled,
            shortlist_threshold = stored.auto_shortlist_threshold,
            "automation configuration saved"
        );
        Ok(stored)
    }

    /// Decide what the job's automation would do with `score`.
    pub fn decide(
        &self,
        requester: &RecruiterId,
        job_id: &JobId,
        score: u8,
    ) -> Result<AutomationAction, TriageError> {
        let config = self.automation_config(requester, job_id)?;
        Ok(decide(score, &config))
    }

    /// Apply a status action to applications of both variants under one job.
    pub fn apply_batch_action(
        &self,
        requester: &RecruiterId,
        job_id: &JobId,
        request: &BatchRequest,
    ) -> Result<BatchActionOutcome, TriageError> {
        let (plan, action) = request.validate()?;
        self.authorize(requester, job_id)?;

        let outcome = self.transition(job_id, &plan, action);
        info!(
            %job_id,
            action = action.label(),
            requested = plan.len(),
            updated = outcome.updated_count,
            failed_buckets = outcome.failures.len(),
            "batch status action applied"
        );
        Ok(outcome)
    }

    fn transition(&self, job_id: &JobId, plan: &BatchPlan, action: BatchAction) -> BatchActionOutcome {
        if plan.is_empty() {
            return BatchActionOutcome::empty(action);
        }

        let outcome = batch::execute(self.applications.as_ref(), job_id, plan, action);
        if action == BatchAction::Rejected {
            self.schedule_notice(job_id, &outcome);
        }
        outcome
    }

    /// Fire-and-forget; failures are logged and never change the batch result.
    /// Only rows the job-scoped update matched are notified.
    fn schedule_notice(&self, job_id: &JobId, outcome: &BatchActionOutcome) {
        if outcome.updated.is_empty() {
            return;
        }

        let action = outcome.action;
        let notice = StatusNotice {
            job_id: job_id.clone(),
            application_ids: outcome.updated.clone(),
            action,
        };
        if let Err(error) = self.notifier.schedule(notice) {
            warn!(%job_id, action = action.label(), %error, "failed to schedule status notice");
        }
    }

    /// Score each submission against the job, store the analysis, and apply automatic
    /// shortlist/reject decisions through the batch orchestrator.
    pub fn run_automation(
        &self,
        requester: &RecruiterId,
        job_id: &JobId,
        submissions: &[TriageSubmission],
    ) -> Result<AutomationRunReport, TriageError> {
        if submissions.is_empty() {
            return Err(InputError::EmptySubmissions.into());
        }
        let posting = self.authorize(requester, job_id)?;
        let config = self.stored_config(job_id)?;

        let mut decisions = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let analysis = self
                .engine
                .score(&submission.resume_text, &posting.description);

            match self
                .applications
                .record_analysis(&submission.application_id, job_id, &analysis)
            {
                Ok(true) => {}
                Ok(false) => debug!(
                    %job_id,
                    application_id = %submission.application_id,
                    "no application under job to attach analysis to"
                ),
                Err(error) => warn!(
                    %job_id,
                    application_id = %submission.application_id,
                    %error,
                    "failed to store analysis"
                ),
            }

            decisions.push(TriageDecision {
                application_id: submission.application_id.clone(),
                overall_score: analysis.overall_score,
                action: decide(analysis.overall_score, &config),
            });
        }

        let plan_for = |wanted: AutomationAction| {
            BatchPlan::partition(
                decisions
                    .iter()
                    .filter(|decision| decision.action == wanted)
                    .map(|decision| &decision.application_id),
            )
        };
        let shortlist = self.transition(
            job_id,
            &plan_for(AutomationAction::AutoShortlist),
            BatchAction::Shortlisted,
        );
        let reject = self.transition(
            job_id,
            &plan_for(AutomationAction::AutoReject),
            BatchAction::Rejected,
        );
        let untouched = decisions
            .iter()
            .filter(|decision| decision.action == AutomationAction::None)
            .count();

        info!(
            %job_id,
            evaluated = decisions.len(),
            shortlisted = shortlist.updated_count,
            rejected = reject.updated_count,
            untouched,
            "automation run complete"
        );

        Ok(AutomationRunReport {
            job_id: job_id.clone(),
            evaluated_at: Utc::now(),
            decisions,
            shortlisted: shortlist.updated_count,
            rejected: reject.updated_count,
            untouched,
            failures: shortlist.failures.into_iter().chain(reject.failures).collect(),
        })
    }
}
