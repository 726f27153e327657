use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::applications::automation::AutomationConfig;
use crate::workflows::applications::domain::{
    Application, ApplicationKind, ApplicationRef, ApplicationStatus, CandidateApplication, JobId,
    JobPosting, PublicApplication, RecruiterId,
};
use crate::workflows::applications::repository::{
    ApplicationStore, JobRepository, NotificationError, NotificationSender, RepositoryError,
    StatusNotice,
};
use crate::workflows::applications::{triage_router, TriageService};
use crate::workflows::matching::{MatchEngine, MatchResult};

pub(super) const JOB_DESCRIPTION: &str = "Senior Software Engineer — React, Node.js, AWS, Docker";

/// Scores 92 against [`JOB_DESCRIPTION`].
pub(super) const STRONG_RESUME: &str =
    "Senior engineer with 8 years experience in React, Node.js, AWS, Docker and Git. Bachelor degree in computer science";
/// Scores 76 against [`JOB_DESCRIPTION`].
pub(super) const MEDIUM_RESUME: &str =
    "Senior engineer with 6 years experience in React, Node.js, AWS";
/// Scores 23 against [`JOB_DESCRIPTION`].
pub(super) const WEAK_RESUME: &str = "Barista with 1 year experience";

pub(super) fn job_id() -> JobId {
    JobId("job-1".to_string())
}

pub(super) fn other_job_id() -> JobId {
    JobId("job-2".to_string())
}

pub(super) fn owner() -> RecruiterId {
    RecruiterId("recruiter-1".to_string())
}

pub(super) fn stranger() -> RecruiterId {
    RecruiterId("recruiter-9".to_string())
}

pub(super) fn applied_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
}

pub(super) fn candidate(id: &str, job: &JobId) -> Application {
    Application::Candidate(CandidateApplication {
        id: id.to_string(),
        job_id: job.clone(),
        user_id: format!("user-{id}"),
        status: ApplicationStatus::Submitted,
        applied_at: applied_at(),
        status_changed_at: None,
        ai_analysis: None,
    })
}

pub(super) fn public(id: &str, job: &JobId) -> Application {
    Application::Public(PublicApplication {
        id: id.to_string(),
        job_id: job.clone(),
        applicant_name: format!("Applicant {id}"),
        email: format!("applicant{id}@example.com"),
        status: ApplicationStatus::Submitted,
        applied_at: applied_at(),
        status_changed_at: None,
        ai_analysis: None,
    })
}

/// candidate-1, public-2, candidate-3 under job-1; candidate-4 under job-2.
pub(super) fn seeded_store() -> MemoryApplicationStore {
    MemoryApplicationStore::with(vec![
        candidate("1", &job_id()),
        public("2", &job_id()),
        candidate("3", &job_id()),
        candidate("4", &other_job_id()),
    ])
}

pub(super) fn seeded_jobs() -> MemoryJobs {
    let jobs = MemoryJobs::default();
    jobs.insert(JobPosting {
        job_id: job_id(),
        recruiter_id: owner(),
        title: "Senior Software Engineer".to_string(),
        description: JOB_DESCRIPTION.to_string(),
    });
    jobs.insert(JobPosting {
        job_id: other_job_id(),
        recruiter_id: owner(),
        title: "Data Analyst".to_string(),
        description: "Junior data analyst with SQL and Python".to_string(),
    });
    jobs
}

pub(super) fn enabled_config() -> AutomationConfig {
    AutomationConfig {
        auto_reject_enabled: true,
        auto_reject_threshold: 60,
        auto_shortlist_enabled: true,
        auto_shortlist_threshold: 80,
        ..AutomationConfig::disabled(job_id())
    }
}

pub(super) type MemoryService = TriageService<MemoryApplicationStore, MemoryJobs, MemoryNotifier>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryApplicationStore>,
    Arc<MemoryJobs>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(seeded_store());
    let (service, jobs, notifier) = service_with(store.clone());
    (service, store, jobs, notifier)
}

pub(super) fn service_with<A>(
    store: Arc<A>,
) -> (
    TriageService<A, MemoryJobs, MemoryNotifier>,
    Arc<MemoryJobs>,
    Arc<MemoryNotifier>,
)
where
    A: ApplicationStore + 'static,
{
    let jobs = Arc::new(seeded_jobs());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = TriageService::new(
        MatchEngine::default(),
        store,
        jobs.clone(),
        notifier.clone(),
    );
    (service, jobs, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplicationStore {
    applications: Arc<Mutex<Vec<Application>>>,
}

impl MemoryApplicationStore {
    pub(super) fn with(applications: Vec<Application>) -> Self {
        Self {
            applications: Arc::new(Mutex::new(applications)),
        }
    }

    pub(super) fn get(&self, reference: &ApplicationRef) -> Option<Application> {
        self.applications
            .lock()
            .expect("store mutex poisoned")
            .iter()
            .find(|application| &application.reference() == reference)
            .cloned()
    }

    pub(super) fn status(&self, reference: &ApplicationRef) -> Option<ApplicationStatus> {
        self.get(reference).map(|application| application.status())
    }
}

impl ApplicationStore for MemoryApplicationStore {
    fn bulk_update_status(
        &self,
        kind: ApplicationKind,
        job_id: &JobId,
        ids: &[String],
        status: ApplicationStatus,
    ) -> Result<Vec<String>, RepositoryError> {
        let now = Utc::now();
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        let mut matched = Vec::new();
        for id in ids {
            let row = guard.iter_mut().find(|application| {
                let reference = application.reference();
                reference.kind == kind && &reference.id == id && application.belongs_to(job_id)
            });
            if let Some(application) = row {
                application.set_status(status, now);
                matched.push(id.clone());
            }
        }
        Ok(matched)
    }

    fn record_analysis(
        &self,
        reference: &ApplicationRef,
        job_id: &JobId,
        analysis: &MatchResult,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.applications.lock().expect("store mutex poisoned");
        match guard
            .iter_mut()
            .find(|application| &application.reference() == reference && application.belongs_to(job_id))
        {
            Some(application) => {
                application.record_analysis(analysis.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Delegates to the inner store except for bulk updates of `failing` applications.
pub(super) struct FailingStore {
    pub(super) inner: MemoryApplicationStore,
    pub(super) failing: ApplicationKind,
}

impl ApplicationStore for FailingStore {
    fn bulk_update_status(
        &self,
        kind: ApplicationKind,
        job_id: &JobId,
        ids: &[String],
        status: ApplicationStatus,
    ) -> Result<Vec<String>, RepositoryError> {
        if kind == self.failing {
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        self.inner.bulk_update_status(kind, job_id, ids, status)
    }

    fn record_analysis(
        &self,
        reference: &ApplicationRef,
        job_id: &JobId,
        analysis: &MatchResult,
    ) -> Result<bool, RepositoryError> {
        self.inner.record_analysis(reference, job_id, analysis)
    }
}

#[derive(Default)]
pub(super) struct MemoryJobs {
    postings: Mutex<HashMap<JobId, JobPosting>>,
    configs: Mutex<HashMap<JobId, AutomationConfig>>,
}

impl MemoryJobs {
    pub(super) fn insert(&self, posting: JobPosting) {
        self.postings
            .lock()
            .expect("jobs mutex poisoned")
            .insert(posting.job_id.clone(), posting);
    }

    pub(super) fn stored_config(&self, job_id: &JobId) -> Option<AutomationConfig> {
        self.configs
            .lock()
            .expect("config mutex poisoned")
            .get(job_id)
            .cloned()
    }
}

impl JobRepository for MemoryJobs {
    fn find_job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self
            .postings
            .lock()
            .expect("jobs mutex poisoned")
            .get(job_id)
            .cloned())
    }

    fn automation_config(
        &self,
        job_id: &JobId,
    ) -> Result<Option<AutomationConfig>, RepositoryError> {
        Ok(self.stored_config(job_id))
    }

    fn upsert_automation_config(
        &self,
        config: AutomationConfig,
    ) -> Result<AutomationConfig, RepositoryError> {
        self.configs
            .lock()
            .expect("config mutex poisoned")
            .insert(config.job_id.clone(), config.clone());
        Ok(config)
    }
}

pub(super) struct UnavailableJobs;

impl JobRepository for UnavailableJobs {
    fn find_job(&self, _job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn automation_config(
        &self,
        _job_id: &JobId,
    ) -> Result<Option<AutomationConfig>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_automation_config(
        &self,
        _config: AutomationConfig,
    ) -> Result<AutomationConfig, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<StatusNotice>>,
    offline: bool,
}

impl MemoryNotifier {
    pub(super) fn offline() -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            offline: true,
        }
    }

    pub(super) fn notices(&self) -> Vec<StatusNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSender for MemoryNotifier {
    fn schedule(&self, notice: StatusNotice) -> Result<(), NotificationError> {
        if self.offline {
            return Err(NotificationError::Transport("smtp relay down".to_string()));
        }
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) fn router_for(service: MemoryService) -> axum::Router {
    triage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
