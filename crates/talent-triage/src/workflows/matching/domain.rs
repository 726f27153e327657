use serde::{Deserialize, Serialize};

/// Raw scoring request as received from callers.
///
/// Both fields are optional on the wire so that an omitted field is reported as an input error
/// rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description_text: Option<String>,
}

impl ScoreInput {
    pub fn new(resume_text: impl Into<String>, job_description_text: impl Into<String>) -> Self {
        Self {
            resume_text: Some(resume_text.into()),
            job_description_text: Some(job_description_text.into()),
        }
    }

    /// Borrow both texts, rejecting missing or blank values.
    pub fn texts(&self) -> Result<(&str, &str), ScoreInputError> {
        let resume = self
            .resume_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or(ScoreInputError::MissingResumeText)?;
        let job = self
            .job_description_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or(ScoreInputError::MissingJobDescription)?;
        Ok((resume, job))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreInputError {
    #[error("resumeText is required")]
    MissingResumeText,
    #[error("jobDescriptionText is required")]
    MissingJobDescription,
}

/// Composite alignment between one resume and one job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub overall_score: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub education_match: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Seniority the job description asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityLevel {
    Senior,
    Mid,
    Junior,
    Unspecified,
}

/// Highest credential found in a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    None,
    Diploma,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const fn score(self) -> u8 {
        match self {
            EducationLevel::Doctorate => 95,
            EducationLevel::Master => 90,
            EducationLevel::Bachelor => 80,
            EducationLevel::Diploma => 70,
            EducationLevel::None => 60,
        }
    }
}
