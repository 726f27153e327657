use super::common::*;
use crate::workflows::applications::automation::{
    decide, AutomationAction, AutomationConfig, AutomationSettings,
    DEFAULT_AUTO_REJECT_THRESHOLD, DEFAULT_AUTO_SHORTLIST_THRESHOLD,
};
use crate::workflows::applications::domain::BatchAction;
use crate::workflows::applications::{InputError, TriageError};

#[test]
fn decide_maps_scores_onto_thresholds() {
    let config = enabled_config();

    assert_eq!(decide(55, &config), AutomationAction::AutoReject);
    assert_eq!(decide(85, &config), AutomationAction::AutoShortlist);
    assert_eq!(decide(70, &config), AutomationAction::None);
}

#[test]
fn decide_treats_thresholds_as_inclusive() {
    let config = enabled_config();

    assert_eq!(decide(60, &config), AutomationAction::AutoReject);
    assert_eq!(decide(80, &config), AutomationAction::AutoShortlist);
    assert_eq!(decide(61, &config), AutomationAction::None);
    assert_eq!(decide(79, &config), AutomationAction::None);
}

#[test]
fn decide_never_acts_when_both_rules_are_disabled() {
    let config = AutomationConfig::disabled(job_id());

    for score in 0..=100 {
        assert_eq!(decide(score, &config), AutomationAction::None, "score {score}");
    }
}

#[test]
fn overlapping_thresholds_resolve_to_reject() {
    let config = AutomationConfig {
        auto_reject_threshold: 85,
        auto_shortlist_threshold: 70,
        ..enabled_config()
    };

    assert_eq!(decide(75, &config), AutomationAction::AutoReject);
    assert_eq!(decide(90, &config), AutomationAction::AutoShortlist);
}

#[test]
fn single_rule_configs_only_fire_their_own_action() {
    let reject_only = AutomationConfig {
        auto_shortlist_enabled: false,
        ..enabled_config()
    };
    assert_eq!(decide(95, &reject_only), AutomationAction::None);
    assert_eq!(decide(10, &reject_only), AutomationAction::AutoReject);

    let shortlist_only = AutomationConfig {
        auto_reject_enabled: false,
        ..enabled_config()
    };
    assert_eq!(decide(10, &shortlist_only), AutomationAction::None);
    assert_eq!(decide(95, &shortlist_only), AutomationAction::AutoShortlist);
}

#[test]
fn actions_map_to_batch_transitions() {
    assert_eq!(AutomationAction::None.batch_action(), None);
    assert_eq!(
        AutomationAction::AutoShortlist.batch_action(),
        Some(BatchAction::Shortlisted)
    );
    assert_eq!(
        AutomationAction::AutoReject.batch_action(),
        Some(BatchAction::Rejected)
    );
    assert_eq!(AutomationAction::AutoReject.label(), "auto_reject");
}

#[test]
fn settings_merge_keeps_omitted_fields() {
    let settings = AutomationSettings {
        auto_reject_enabled: Some(true),
        auto_reject_threshold: Some(45),
        ..AutomationSettings::default()
    };

    let merged = settings
        .apply_to(AutomationConfig::disabled(job_id()))
        .expect("thresholds in range");

    assert!(merged.auto_reject_enabled);
    assert_eq!(merged.auto_reject_threshold, 45);
    assert!(!merged.auto_shortlist_enabled);
    assert_eq!(merged.auto_shortlist_threshold, DEFAULT_AUTO_SHORTLIST_THRESHOLD);
}

#[test]
fn settings_reject_out_of_range_thresholds() {
    for value in [-1, 101, 1_000] {
        let settings = AutomationSettings {
            auto_shortlist_threshold: Some(value),
            ..AutomationSettings::default()
        };
        let error = settings
            .apply_to(AutomationConfig::disabled(job_id()))
            .expect_err("out of range");
        assert_eq!(error.field, "autoShortlistThreshold");
        assert_eq!(error.value, value);
    }
}

#[test]
fn config_reads_fall_back_to_disabled_defaults() {
    let (service, _, _, _) = build_service();

    let config = service
        .automation_config(&owner(), &job_id())
        .expect("owner can read config");

    assert_eq!(config, AutomationConfig::disabled(job_id()));
    assert_eq!(config.auto_reject_threshold, DEFAULT_AUTO_REJECT_THRESHOLD);
    assert_eq!(
        service.decide(&owner(), &job_id(), 5).expect("decides"),
        AutomationAction::None
    );
}

#[test]
fn configure_upserts_and_merges_partial_updates() {
    let (service, _, jobs, _) = build_service();

    let first = service
        .configure_automation(
            &owner(),
            &job_id(),
            &AutomationSettings {
                auto_reject_enabled: Some(true),
                auto_reject_threshold: Some(50),
                ..AutomationSettings::default()
            },
        )
        .expect("first write");
    assert!(first.updated_at.is_some());

    let second = service
        .configure_automation(
            &owner(),
            &job_id(),
            &AutomationSettings {
                auto_shortlist_enabled: Some(true),
                ..AutomationSettings::default()
            },
        )
        .expect("second write");

    assert!(second.auto_reject_enabled);
    assert_eq!(second.auto_reject_threshold, 50);
    assert!(second.auto_shortlist_enabled);
    assert_eq!(second.auto_shortlist_threshold, DEFAULT_AUTO_SHORTLIST_THRESHOLD);
    assert_eq!(jobs.stored_config(&job_id()), Some(second.clone()));
    assert_eq!(
        service.decide(&owner(), &job_id(), 40).expect("decides"),
        AutomationAction::AutoReject
    );
}

#[test]
fn configure_rejects_bad_thresholds_without_writing() {
    let (service, _, jobs, _) = build_service();

    let error = service
        .configure_automation(
            &owner(),
            &job_id(),
            &AutomationSettings {
                auto_reject_threshold: Some(140),
                ..AutomationSettings::default()
            },
        )
        .expect_err("out of range");

    match error {
        TriageError::Input(InputError::ThresholdOutOfRange { field, value }) => {
            assert_eq!(field, "autoRejectThreshold");
            assert_eq!(value, 140);
        }
        other => panic!("expected threshold error, got {other:?}"),
    }
    assert!(jobs.stored_config(&job_id()).is_none());
}

#[test]
fn configure_hides_jobs_owned_by_other_recruiters() {
    let (service, _, jobs, _) = build_service();

    let error = service
        .configure_automation(&stranger(), &job_id(), &AutomationSettings::default())
        .expect_err("not the owner");

    assert!(matches!(error, TriageError::JobNotFound(ref id) if *id == job_id()));
    assert!(jobs.stored_config(&job_id()).is_none());
}
