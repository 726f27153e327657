use chrono::{Duration, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_triage::workflows::applications::{
    Application, ApplicationKind, ApplicationRef, ApplicationStatus, ApplicationStore,
    AutomationConfig, CandidateApplication, JobId, JobPosting, JobRepository, NotificationError,
    NotificationSender, PublicApplication, RecruiterId, RepositoryError, StatusNotice,
    TriageService,
};
use talent_triage::workflows::matching::{MatchEngine, MatchResult, SkillVocabulary, VocabularyError};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub(crate) type InMemoryTriageService =
    TriageService<InMemoryApplicationStore, InMemoryJobDirectory, ChannelNotificationSender>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the engine from an explicit vocabulary document, or the bundled one.
pub(crate) fn match_engine(vocabulary_path: Option<&Path>) -> Result<MatchEngine, VocabularyError> {
    let vocabulary = match vocabulary_path {
        Some(path) => SkillVocabulary::from_path(path)?,
        None => SkillVocabulary::standard(),
    };
    info!(
        version = vocabulary.version(),
        skills = vocabulary.len(),
        "skill vocabulary loaded"
    );
    Ok(MatchEngine::new(vocabulary))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationStore {
    records: Arc<Mutex<HashMap<ApplicationRef, Application>>>,
}

impl InMemoryApplicationStore {
    pub(crate) fn seeded(applications: impl IntoIterator<Item = Application>) -> Self {
        let records = applications
            .into_iter()
            .map(|application| (application.reference(), application))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(crate) fn fetch(&self, reference: &ApplicationRef) -> Option<Application> {
        let guard = self.records.lock().expect("store mutex poisoned");
        guard.get(reference).cloned()
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn bulk_update_status(
        &self,
        kind: ApplicationKind,
        job_id: &JobId,
        ids: &[String],
        status: ApplicationStatus,
    ) -> Result<Vec<String>, RepositoryError> {
        let now = Utc::now();
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let mut matched = Vec::new();
        for id in ids {
            let reference = ApplicationRef {
                kind,
                id: id.clone(),
            };
            if let Some(application) = guard
                .get_mut(&reference)
                .filter(|application| application.belongs_to(job_id))
            {
                application.set_status(status, now);
                matched.push(id.clone());
            }
        }
        Ok(matched)
    }

    fn record_analysis(
        &self,
        application: &ApplicationRef,
        job_id: &JobId,
        analysis: &MatchResult,
    ) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        match guard
            .get_mut(application)
            .filter(|stored| stored.belongs_to(job_id))
        {
            Some(stored) => {
                stored.record_analysis(analysis.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub(crate) struct InMemoryJobDirectory {
    postings: Mutex<HashMap<JobId, JobPosting>>,
    automation: Mutex<HashMap<JobId, AutomationConfig>>,
}

impl InMemoryJobDirectory {
    pub(crate) fn seeded(postings: impl IntoIterator<Item = JobPosting>) -> Self {
        let directory = Self::default();
        {
            let mut guard = directory.postings.lock().expect("jobs mutex poisoned");
            for posting in postings {
                guard.insert(posting.job_id.clone(), posting);
            }
        }
        directory
    }
}

impl JobRepository for InMemoryJobDirectory {
    fn find_job(&self, job_id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.postings.lock().expect("jobs mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn automation_config(
        &self,
        job_id: &JobId,
    ) -> Result<Option<AutomationConfig>, RepositoryError> {
        let guard = self.automation.lock().expect("automation mutex poisoned");
        Ok(guard.get(job_id).cloned())
    }

    fn upsert_automation_config(
        &self,
        config: AutomationConfig,
    ) -> Result<AutomationConfig, RepositoryError> {
        let mut guard = self.automation.lock().expect("automation mutex poisoned");
        guard.insert(config.job_id.clone(), config.clone());
        Ok(config)
    }
}

/// Queues notices on an unbounded channel; a separate consumer performs delivery.
#[derive(Clone)]
pub(crate) struct ChannelNotificationSender {
    queue: mpsc::UnboundedSender<StatusNotice>,
}

impl ChannelNotificationSender {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<StatusNotice>) {
        let (queue, receiver) = mpsc::unbounded_channel();
        (Self { queue }, receiver)
    }

    /// Sender whose notices are drained by a background task that logs each delivery.
    pub(crate) fn spawn_delivery() -> Self {
        let (sender, mut receiver) = Self::channel();
        tokio::spawn(async move {
            while let Some(notice) = receiver.recv().await {
                info!(
                    job_id = %notice.job_id,
                    action = notice.action.label(),
                    recipients = notice.application_ids.len(),
                    "status notice delivered"
                );
            }
            warn!("status notice queue closed");
        });
        sender
    }
}

impl NotificationSender for ChannelNotificationSender {
    fn schedule(&self, notice: StatusNotice) -> Result<(), NotificationError> {
        self.queue
            .send(notice)
            .map_err(|_| NotificationError::Transport("notice queue closed".to_string()))
    }
}

pub(crate) fn demo_recruiter() -> RecruiterId {
    RecruiterId("recruiter-demo".to_string())
}

pub(crate) fn demo_job() -> JobPosting {
    JobPosting {
        job_id: JobId("job-demo".to_string()),
        recruiter_id: demo_recruiter(),
        title: "Senior Platform Engineer".to_string(),
        description: "Senior platform engineer to run our AWS, Kubernetes and Terraform estate. \
                      Strong Python or Golang, Docker, CI/CD and Linux expected."
            .to_string(),
    }
}

/// Sample intake for the demo job: two candidate-account and two public submissions.
pub(crate) fn demo_applications() -> Vec<Application> {
    let job_id = demo_job().job_id;
    let opened = Utc.with_ymd_and_hms(2025, 4, 7, 8, 0, 0).unwrap();

    let candidate = |id: &str, hours: i64| {
        Application::Candidate(CandidateApplication {
            id: id.to_string(),
            job_id: job_id.clone(),
            user_id: format!("user-{id}"),
            status: ApplicationStatus::Submitted,
            applied_at: opened + Duration::hours(hours),
            status_changed_at: None,
            ai_analysis: None,
        })
    };
    let public = |id: &str, name: &str, hours: i64| {
        Application::Public(PublicApplication {
            id: id.to_string(),
            job_id: job_id.clone(),
            applicant_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            status: ApplicationStatus::Submitted,
            applied_at: opened + Duration::hours(hours),
            status_changed_at: None,
            ai_analysis: None,
        })
    };

    vec![
        candidate("101", 2),
        candidate("102", 5),
        public("201", "Rosa Diaz", 9),
        public("202", "Sam Okafor", 30),
    ]
}

/// Resume texts keyed by the wire id of each demo application.
pub(crate) fn demo_resumes() -> Vec<(ApplicationRef, &'static str)> {
    vec![
        (
            ApplicationRef::candidate("101"),
            "Lead SRE, 9 years running AWS and Kubernetes with Terraform, Docker, Python, \
             Golang, CI/CD and Linux. MSc Computer Science.",
        ),
        (
            ApplicationRef::candidate("102"),
            "Backend developer, 4 years of Python and Docker on Linux. Bachelor degree.",
        ),
        (
            ApplicationRef::public("201"),
            "Platform engineer with 6 years on AWS, Kubernetes, Docker and Golang.",
        ),
        (
            ApplicationRef::public("202"),
            "Graphic designer, 2 years with Figma and illustration.",
        ),
    ]
}

pub(crate) fn build_service(
    engine: MatchEngine,
    notifier: ChannelNotificationSender,
    seed_demo_data: bool,
) -> (InMemoryTriageService, Arc<InMemoryApplicationStore>) {
    let (store, jobs) = if seed_demo_data {
        (
            InMemoryApplicationStore::seeded(demo_applications()),
            InMemoryJobDirectory::seeded([demo_job()]),
        )
    } else {
        (
            InMemoryApplicationStore::default(),
            InMemoryJobDirectory::default(),
        )
    };
    let store = Arc::new(store);
    let service = TriageService::new(engine, store.clone(), Arc::new(jobs), Arc::new(notifier));
    (service, store)
}
