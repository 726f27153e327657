use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::JobId;

pub const DEFAULT_AUTO_REJECT_THRESHOLD: u8 = 60;
pub const DEFAULT_AUTO_SHORTLIST_THRESHOLD: u8 = 80;

/// Per-job thresholds that let scores change statuses without review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    pub job_id: JobId,
    pub auto_reject_enabled: bool,
    pub auto_reject_threshold: u8,
    pub auto_shortlist_enabled: bool,
    pub auto_shortlist_threshold: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AutomationConfig {
    /// Configuration assumed for jobs that never stored one.
    pub fn disabled(job_id: JobId) -> Self {
        Self {
            job_id,
            auto_reject_enabled: false,
            auto_reject_threshold: DEFAULT_AUTO_REJECT_THRESHOLD,
            auto_shortlist_enabled: false,
            auto_shortlist_threshold: DEFAULT_AUTO_SHORTLIST_THRESHOLD,
            updated_at: None,
        }
    }
}

/// Partial configuration write; omitted fields keep their stored (or default) value.
///
/// Thresholds arrive as wide integers so out-of-range values surface as input errors instead
/// of decoding failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSettings {
    #[serde(default)]
    pub auto_reject_enabled: Option<bool>,
    #[serde(default)]
    pub auto_reject_threshold: Option<i64>,
    #[serde(default)]
    pub auto_shortlist_enabled: Option<bool>,
    #[serde(default)]
    pub auto_shortlist_threshold: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be between 0 and 100 (got {value})")]
pub struct ThresholdOutOfRange {
    pub field: &'static str,
    pub value: i64,
}

fn threshold(field: &'static str, value: i64) -> Result<u8, ThresholdOutOfRange> {
    u8::try_from(value)
        .ok()
        .filter(|threshold| *threshold <= 100)
        .ok_or(ThresholdOutOfRange { field, value })
}

impl AutomationSettings {
    /// Validate every supplied field, then merge onto `base`.
    pub fn apply_to(&self, base: AutomationConfig) -> Result<AutomationConfig, ThresholdOutOfRange> {
        let reject_threshold = self
            .auto_reject_threshold
            .map(|value| threshold("autoRejectThreshold", value))
            .transpose()?;
        let shortlist_threshold = self
            .auto_shortlist_threshold
            .map(|value| threshold("autoShortlistThreshold", value))
            .transpose()?;

        Ok(AutomationConfig {
            auto_reject_enabled: self.auto_reject_enabled.unwrap_or(base.auto_reject_enabled),
            auto_reject_threshold: reject_threshold.unwrap_or(base.auto_reject_threshold),
            auto_shortlist_enabled: self
                .auto_shortlist_enabled
                .unwrap_or(base.auto_shortlist_enabled),
            auto_shortlist_threshold: shortlist_threshold.unwrap_or(base.auto_shortlist_threshold),
            ..base
        })
    }
}
