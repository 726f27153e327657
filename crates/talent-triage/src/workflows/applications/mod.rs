//! Recruiter-side application triage.
//!
//! Applications live in two stores (registered candidates and anonymous public submissions) and
//! are addressed on the wire as `candidate-<id>` / `public-<id>`. The service scores them with
//! the matching engine, applies per-job automation thresholds, and moves them through the
//! pipeline in job-scoped batches.

pub mod automation;
pub mod batch;
pub mod domain;
pub mod repository;
pub mod router;
mod run;
pub mod service;

#[cfg(test)]
mod tests;

pub use automation::{decide, AutomationAction, AutomationConfig, AutomationSettings};
pub use batch::{BatchActionOutcome, BatchPlan, BucketFailure};
pub use domain::{
    Application, ApplicationKind, ApplicationRef, ApplicationStatus, BatchAction,
    CandidateApplication, JobId, JobPosting, PublicApplication, RecruiterId,
};
pub use repository::{
    ApplicationStore, JobRepository, NotificationError, NotificationSender, RepositoryError,
    StatusNotice,
};
pub use router::{triage_router, RECRUITER_HEADER};
pub use run::{AutomationRunReport, AutomationRunRequest, TriageDecision, TriageSubmission};
pub use service::{BatchRequest, InputError, TriageError, TriageService};
