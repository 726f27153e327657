use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::workflows::matching::MatchResult;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the recruiter profile issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecruiterId(pub String);

impl fmt::Display for RecruiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view of a job posting as exposed by the job directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub job_id: JobId,
    pub recruiter_id: RecruiterId,
    pub title: String,
    pub description: String,
}

impl JobPosting {
    pub fn is_owned_by(&self, recruiter: &RecruiterId) -> bool {
        &self.recruiter_id == recruiter
    }
}

/// The two storage shapes an application can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// Submitted by a registered candidate account.
    Candidate,
    /// Anonymous submission tied only to the job.
    Public,
}

impl ApplicationKind {
    pub const ALL: [ApplicationKind; 2] = [ApplicationKind::Candidate, ApplicationKind::Public];

    pub const fn prefix(self) -> &'static str {
        match self {
            ApplicationKind::Candidate => "candidate-",
            ApplicationKind::Public => "public-",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationKind::Candidate => "candidate",
            ApplicationKind::Public => "public",
        }
    }
}

/// Variant-qualified application identifier.
///
/// Clients see `candidate-<id>` or `public-<id>`; internally the kind and the store-level id are
/// kept apart so nothing downstream branches on string prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApplicationRef {
    pub kind: ApplicationKind,
    pub id: String,
}

impl ApplicationRef {
    pub fn candidate(id: impl Into<String>) -> Self {
        Self {
            kind: ApplicationKind::Candidate,
            id: id.into(),
        }
    }

    pub fn public(id: impl Into<String>) -> Self {
        Self {
            kind: ApplicationKind::Public,
            id: id.into(),
        }
    }
}

impl fmt::Display for ApplicationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application id '{0}' must start with 'candidate-' or 'public-'")]
pub struct UnrecognizedApplicationId(pub String);

impl FromStr for ApplicationRef {
    type Err = UnrecognizedApplicationId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        ApplicationKind::ALL
            .into_iter()
            .find_map(|kind| {
                trimmed
                    .strip_prefix(kind.prefix())
                    .filter(|id| !id.is_empty())
                    .map(|id| ApplicationRef {
                        kind,
                        id: id.to_string(),
                    })
            })
            .ok_or_else(|| UnrecognizedApplicationId(raw.to_string()))
    }
}

impl Serialize for ApplicationRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApplicationRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Status tracked across the hiring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Reviewing,
    Shortlisted,
    Rejected,
    Interview,
    Offer,
    Hired,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }
}

/// Status transitions a recruiter may apply to a batch of applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Shortlisted,
    Rejected,
    Interview,
    Offer,
    Hired,
    Withdrawn,
}

impl BatchAction {
    pub const ALL: [BatchAction; 6] = [
        BatchAction::Shortlisted,
        BatchAction::Rejected,
        BatchAction::Interview,
        BatchAction::Offer,
        BatchAction::Hired,
        BatchAction::Withdrawn,
    ];

    pub const fn target_status(self) -> ApplicationStatus {
        match self {
            BatchAction::Shortlisted => ApplicationStatus::Shortlisted,
            BatchAction::Rejected => ApplicationStatus::Rejected,
            BatchAction::Interview => ApplicationStatus::Interview,
            BatchAction::Offer => ApplicationStatus::Offer,
            BatchAction::Hired => ApplicationStatus::Hired,
            BatchAction::Withdrawn => ApplicationStatus::Withdrawn,
        }
    }

    pub const fn label(self) -> &'static str {
        self.target_status().label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownBatchAction(pub String);

impl FromStr for BatchAction {
    type Err = UnknownBatchAction;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        BatchAction::ALL
            .into_iter()
            .find(|action| action.label() == wanted)
            .ok_or_else(|| UnknownBatchAction(raw.to_string()))
    }
}

/// Application submitted through a registered candidate account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplication {
    pub id: String,
    pub job_id: JobId,
    pub user_id: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status_changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_analysis: Option<MatchResult>,
}

/// Anonymous application tied only to the job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicApplication {
    pub id: String,
    pub job_id: JobId,
    pub applicant_name: String,
    pub email: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status_changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ai_analysis: Option<MatchResult>,
}

/// Either application variant behind one operation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Application {
    Candidate(CandidateApplication),
    Public(PublicApplication),
}

impl Application {
    pub fn kind(&self) -> ApplicationKind {
        match self {
            Application::Candidate(_) => ApplicationKind::Candidate,
            Application::Public(_) => ApplicationKind::Public,
        }
    }

    pub fn reference(&self) -> ApplicationRef {
        match self {
            Application::Candidate(application) => ApplicationRef::candidate(&application.id),
            Application::Public(application) => ApplicationRef::public(&application.id),
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            Application::Candidate(application) => &application.job_id,
            Application::Public(application) => &application.job_id,
        }
    }

    pub fn belongs_to(&self, job_id: &JobId) -> bool {
        self.job_id() == job_id
    }

    pub fn status(&self) -> ApplicationStatus {
        match self {
            Application::Candidate(application) => application.status,
            Application::Public(application) => application.status,
        }
    }

    /// Returns `true` when the status actually changed.
    pub fn set_status(&mut self, status: ApplicationStatus, at: DateTime<Utc>) -> bool {
        let (current, changed_at) = match self {
            Application::Candidate(application) => {
                (&mut application.status, &mut application.status_changed_at)
            }
            Application::Public(application) => {
                (&mut application.status, &mut application.status_changed_at)
            }
        };

        if *current == status {
            return false;
        }
        *current = status;
        *changed_at = Some(at);
        true
    }

    pub fn ai_analysis(&self) -> Option<&MatchResult> {
        match self {
            Application::Candidate(application) => application.ai_analysis.as_ref(),
            Application::Public(application) => application.ai_analysis.as_ref(),
        }
    }

    pub fn record_analysis(&mut self, analysis: MatchResult) {
        match self {
            Application::Candidate(application) => application.ai_analysis = Some(analysis),
            Application::Public(application) => application.ai_analysis = Some(analysis),
        }
    }
}
