use crate::infra::{
    build_service, demo_job, demo_recruiter, demo_resumes, match_engine,
    ChannelNotificationSender, InMemoryApplicationStore,
};
use clap::Args;
use std::path::PathBuf;
use talent_triage::error::AppError;
use talent_triage::workflows::applications::{
    ApplicationRef, AutomationAction, AutomationRunReport, AutomationSettings, BatchRequest,
    TriageError, TriageSubmission,
};
use talent_triage::workflows::matching::{MatchResult, ScoreInput};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Plain-text resume to score
    #[arg(long)]
    pub(crate) resume: PathBuf,
    /// Plain-text job description to score against
    #[arg(long)]
    pub(crate) job: PathBuf,
    /// Skill vocabulary document (JSON with `version` and `skills`). Defaults to the bundled list.
    #[arg(long)]
    pub(crate) vocabulary: Option<PathBuf>,
    /// Print the raw match result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Scores at or below this value are rejected automatically
    #[arg(long, default_value_t = 60)]
    pub(crate) reject_threshold: i64,
    /// Scores at or above this value are shortlisted automatically
    #[arg(long, default_value_t = 80)]
    pub(crate) shortlist_threshold: i64,
    /// Stop after the automation run instead of moving the shortlist to interviews
    #[arg(long)]
    pub(crate) skip_batch: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            reject_threshold: 60,
            shortlist_threshold: 80,
            skip_batch: false,
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        resume,
        job,
        vocabulary,
        json,
    } = args;

    let engine = match_engine(vocabulary.as_deref())?;
    let input = ScoreInput::new(
        std::fs::read_to_string(&resume)?,
        std::fs::read_to_string(&job)?,
    );
    let result = engine.score_input(&input).map_err(TriageError::from)?;

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{}", body),
            Err(err) => println!("Match result unavailable: {}", err),
        }
    } else {
        println!(
            "Match for {} against {} (vocabulary {})",
            resume.display(),
            job.display(),
            engine.vocabulary().version()
        );
        render_match(&result);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        reject_threshold,
        shortlist_threshold,
        skip_batch,
    } = args;

    let engine = match_engine(None)?;
    let (notifier, mut notices) = ChannelNotificationSender::channel();
    let (service, store) = build_service(engine, notifier, true);
    let job = demo_job();
    let recruiter = demo_recruiter();

    println!("Talent triage demo");
    println!("Job {}: {}", job.job_id, job.title);
    println!("Description: {}", job.description);

    println!("\nResume scoring");
    for (reference, resume) in demo_resumes() {
        match service.score(&ScoreInput::new(resume, job.description.as_str())) {
            Ok(result) => {
                println!("\n{}", reference);
                render_match(&result);
            }
            Err(err) => println!("- {}: scoring unavailable: {}", reference, err),
        }
    }

    let settings = AutomationSettings {
        auto_reject_enabled: Some(true),
        auto_reject_threshold: Some(reject_threshold),
        auto_shortlist_enabled: Some(true),
        auto_shortlist_threshold: Some(shortlist_threshold),
    };
    let config = match service.configure_automation(&recruiter, &job.job_id, &settings) {
        Ok(config) => config,
        Err(err) => {
            println!("\nAutomation not configured: {}", err);
            return Ok(());
        }
    };
    println!(
        "\nAutomation: reject <= {} | shortlist >= {}",
        config.auto_reject_threshold, config.auto_shortlist_threshold
    );

    let submissions: Vec<TriageSubmission> = demo_resumes()
        .into_iter()
        .map(|(application_id, resume)| TriageSubmission {
            application_id,
            resume_text: resume.to_string(),
        })
        .collect();
    let report = match service.run_automation(&recruiter, &job.job_id, &submissions) {
        Ok(report) => report,
        Err(err) => {
            println!("  Automation run failed: {}", err);
            return Ok(());
        }
    };
    render_run(&report);

    if !skip_batch {
        let shortlist: Vec<String> = report
            .decided(AutomationAction::AutoShortlist)
            .map(ApplicationRef::to_string)
            .collect();
        if shortlist.is_empty() {
            println!("\nNo shortlisted applications to invite");
        } else {
            let request = BatchRequest::new(shortlist, "interview");
            match service.apply_batch_action(&recruiter, &job.job_id, &request) {
                Ok(outcome) => println!(
                    "\nMoved {} shortlisted application(s) to {}",
                    outcome.updated_count,
                    outcome.action.label()
                ),
                Err(err) => println!("\nBatch update failed: {}", err),
            }
        }
    }

    render_statuses(&store, &submissions);

    let mut scheduled = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        scheduled.push(notice);
    }
    if scheduled.is_empty() {
        println!("\nStatus notices: none scheduled");
    } else {
        println!("\nStatus notices");
        for notice in scheduled {
            let recipients: Vec<String> = notice
                .application_ids
                .iter()
                .map(ApplicationRef::to_string)
                .collect();
            println!("- {} -> {}", notice.action.label(), recipients.join(", "));
        }
    }

    Ok(())
}

fn render_match(result: &MatchResult) {
    println!(
        "  Overall {} | skills {} | experience {} | education {}",
        result.overall_score, result.skills_match, result.experience_match, result.education_match
    );
    if !result.matched_skills.is_empty() {
        println!("  Matched: {}", result.matched_skills.join(", "));
    }
    if !result.missing_skills.is_empty() {
        println!("  Missing: {}", result.missing_skills.join(", "));
    }
    for recommendation in &result.recommendations {
        println!("  * {}", recommendation);
    }
}

fn render_run(report: &AutomationRunReport) {
    println!("\nAutomation run ({})", report.evaluated_at.format("%Y-%m-%d %H:%M UTC"));
    for decision in &report.decisions {
        println!(
            "- {}: score {} -> {}",
            decision.application_id,
            decision.overall_score,
            decision.action.label()
        );
    }
    println!(
        "Shortlisted {} | rejected {} | untouched {}",
        report.shortlisted, report.rejected, report.untouched
    );
    for failure in &report.failures {
        println!(
            "  ! {} bucket ({} ids) failed: {}",
            failure.kind.label(),
            failure.requested,
            failure.error
        );
    }
}

fn render_statuses(store: &InMemoryApplicationStore, submissions: &[TriageSubmission]) {
    println!("\nPipeline");
    for submission in submissions {
        match store.fetch(&submission.application_id) {
            Some(application) => println!(
                "- {}: {}",
                submission.application_id,
                application.status().label()
            ),
            None => println!("- {}: not found", submission.application_id),
        }
    }
}
