use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{ApplicationKind, ApplicationRef, BatchAction, JobId, UnrecognizedApplicationId};
use super::repository::{ApplicationStore, RepositoryError};

/// Application ids of one request grouped by variant, prefixes already stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    candidate: Vec<String>,
    public: Vec<String>,
}

impl BatchPlan {
    /// Group references by kind, keeping first-seen order and dropping duplicates.
    pub fn partition<'a, I>(references: I) -> Self
    where
        I: IntoIterator<Item = &'a ApplicationRef>,
    {
        let mut plan = BatchPlan::default();
        for reference in references {
            let bucket = plan.bucket_mut(reference.kind);
            if !bucket.contains(&reference.id) {
                bucket.push(reference.id.clone());
            }
        }
        plan
    }

    /// Parse wire ids; a single unprefixed id rejects the whole request.
    pub fn parse<I, S>(raw_ids: I) -> Result<Self, UnrecognizedApplicationId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let references = raw_ids
            .into_iter()
            .map(|raw| raw.as_ref().parse::<ApplicationRef>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::partition(&references))
    }

    fn bucket_mut(&mut self, kind: ApplicationKind) -> &mut Vec<String> {
        match kind {
            ApplicationKind::Candidate => &mut self.candidate,
            ApplicationKind::Public => &mut self.public,
        }
    }

    pub fn bucket(&self, kind: ApplicationKind) -> &[String] {
        match kind {
            ApplicationKind::Candidate => &self.candidate,
            ApplicationKind::Public => &self.public,
        }
    }

    /// Non-empty buckets only.
    pub fn buckets(&self) -> impl Iterator<Item = (ApplicationKind, &[String])> + '_ {
        ApplicationKind::ALL
            .into_iter()
            .map(|kind| (kind, self.bucket(kind)))
            .filter(|(_, ids)| !ids.is_empty())
    }

    pub fn len(&self) -> usize {
        self.candidate.len() + self.public.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn references(&self) -> Vec<ApplicationRef> {
        self.buckets()
            .flat_map(|(kind, ids)| {
                ids.iter().map(move |id| ApplicationRef {
                    kind,
                    id: id.clone(),
                })
            })
            .collect()
    }
}

/// A bucket whose bulk update failed and was left out of the count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketFailure {
    pub kind: ApplicationKind,
    pub requested: usize,
    pub error: String,
}

/// Aggregate of one batch status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchActionOutcome {
    pub updated_count: usize,
    pub action: BatchAction,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<BucketFailure>,
    /// Rows the job-scoped updates matched; `updated_count` is its length.
    #[serde(skip)]
    pub updated: Vec<ApplicationRef>,
}

impl BatchActionOutcome {
    pub fn empty(action: BatchAction) -> Self {
        Self {
            updated_count: 0,
            action,
            failures: Vec::new(),
            updated: Vec::new(),
        }
    }

    /// Sum successful buckets and collect the failed ones.
    pub(crate) fn combine<I>(action: BatchAction, results: I) -> Self
    where
        I: IntoIterator<Item = (ApplicationKind, usize, Result<Vec<String>, RepositoryError>)>,
    {
        results.into_iter().fold(
            Self::empty(action),
            |mut outcome, (kind, requested, result)| {
                match result {
                    Ok(matched) => {
                        outcome.updated_count += matched.len();
                        outcome
                            .updated
                            .extend(matched.into_iter().map(|id| ApplicationRef { kind, id }));
                    }
                    Err(error) => outcome.failures.push(BucketFailure {
                        kind,
                        requested,
                        error: error.to_string(),
                    }),
                }
                outcome
            },
        )
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Issue one job-scoped bulk update per non-empty bucket.
pub(crate) fn execute<S>(
    store: &S,
    job_id: &JobId,
    plan: &BatchPlan,
    action: BatchAction,
) -> BatchActionOutcome
where
    S: ApplicationStore + ?Sized,
{
    let status = action.target_status();
    let results = plan.buckets().map(|(kind, ids)| {
        let result = store.bulk_update_status(kind, job_id, ids, status);
        match &result {
            Ok(matched) => debug!(
                job_id = %job_id,
                kind = kind.label(),
                requested = ids.len(),
                updated = matched.len(),
                "bucket status update applied"
            ),
            Err(error) => warn!(
                job_id = %job_id,
                kind = kind.label(),
                requested = ids.len(),
                %error,
                "bucket status update failed; continuing with remaining buckets"
            ),
        }
        (kind, ids.len(), result)
    });

    BatchActionOutcome::combine(action, results)
}
