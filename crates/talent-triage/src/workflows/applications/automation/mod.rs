mod config;
mod policy;

pub use config::{
    AutomationConfig, AutomationSettings, ThresholdOutOfRange, DEFAULT_AUTO_REJECT_THRESHOLD,
    DEFAULT_AUTO_SHORTLIST_THRESHOLD,
};
pub use policy::{decide, AutomationAction};
