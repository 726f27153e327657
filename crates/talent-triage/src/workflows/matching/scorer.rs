use std::sync::OnceLock;

use regex::Regex;

use super::domain::{EducationLevel, MatchResult, SeniorityLevel};
use super::vocabulary::{SkillMatcher, SkillSet};

const NEUTRAL_SKILLS_SCORE: u8 = 60;
const MAX_COUNTED_YEARS: u32 = 40;
const MAX_UPSKILL_SUGGESTIONS: usize = 7;

const SKILLS_WEIGHT: f64 = 0.5;
const EXPERIENCE_WEIGHT: f64 = 0.35;
const EDUCATION_WEIGHT: f64 = 0.15;

pub(crate) const IMPACT_RECOMMENDATION: &str =
    "Highlight measurable impact from past roles (scope, metrics, outcomes) to strengthen experience alignment";
pub(crate) const CERTIFICATION_RECOMMENDATION: &str =
    "Consider relevant certifications or coursework to strengthen your educational profile";
pub(crate) const KEYWORD_RECOMMENDATION: &str =
    "Mirror key terms from the job description in your resume so screening tools recognise your skills";
pub(crate) const STRONG_MATCH_RECOMMENDATION: &str =
    "Strong match: your profile aligns well with this role, proceed with the application";

struct Patterns {
    years: Regex,
    senior: Regex,
    mid: Regex,
    junior: Regex,
    doctorate: Regex,
    master: Regex,
    bachelor: Regex,
    diploma: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let compile = |pattern: &str| Regex::new(pattern).expect("static pattern compiles");
        Patterns {
            years: compile(r"(\d+)[+\s-]*years?"),
            senior: compile(r"\b(?:senior|lead|principal|staff)\b"),
            mid: compile(r"\b(?:mid|intermediate)\b"),
            junior: compile(r"\b(?:junior|entry)\b"),
            doctorate: compile(r"\b(?:ph\.?d|doctorate|doctoral)\b"),
            // Bare "masters" also names roles (scrum masters), so a degree context is required.
            master: compile(
                r"\b(?:master(?:['’]?s)?\s+degree|master(?:['’]s|s)\s+in|master of|msc|m\.sc)\b",
            ),
            bachelor: compile(r"\b(?:bachelor['’]?s?|bsc|b\.sc|degree)\b"),
            diploma: compile(r"\b(?:diploma|certificate)\b"),
        }
    })
}

fn percentage(part: usize, whole: usize) -> u8 {
    ((part as f64 * 100.0) / whole as f64).round() as u8
}

pub(crate) fn skills_match(matched: &SkillSet, required: &SkillSet) -> u8 {
    if required.is_empty() {
        NEUTRAL_SKILLS_SCORE
    } else {
        percentage(matched.len(), required.len())
    }
}

/// Largest "N years" figure in the resume, capped at 40.
pub(crate) fn years_of_experience(resume: &str) -> u32 {
    let lowered = resume.to_lowercase();
    patterns()
        .years
        .captures_iter(&lowered)
        .map(|captures| {
            captures[1]
                .parse::<u32>()
                .map_or(MAX_COUNTED_YEARS, |years| years.min(MAX_COUNTED_YEARS))
        })
        .max()
        .unwrap_or(0)
}

/// Senior signals win over mid and junior ones regardless of where they appear.
pub(crate) fn requested_seniority(job_description: &str) -> SeniorityLevel {
    let lowered = job_description.to_lowercase();
    let patterns = patterns();
    if patterns.senior.is_match(&lowered) {
        SeniorityLevel::Senior
    } else if patterns.mid.is_match(&lowered) {
        SeniorityLevel::Mid
    } else if patterns.junior.is_match(&lowered) {
        SeniorityLevel::Junior
    } else {
        SeniorityLevel::Unspecified
    }
}

pub(crate) fn experience_match(years: u32, seniority: SeniorityLevel) -> u8 {
    let score = match seniority {
        SeniorityLevel::Senior => match years {
            5.. => 85,
            3..=4 => 65,
            _ => 40,
        },
        SeniorityLevel::Mid => match years {
            3.. => 85,
            1..=2 => 70,
            _ => 45,
        },
        SeniorityLevel::Junior => match years {
            0..=2 => 85,
            3..=4 => 70,
            _ => 55,
        },
        SeniorityLevel::Unspecified => years.saturating_mul(6).saturating_add(50).min(90),
    };
    score.clamp(30, 95) as u8
}

/// First matching tier wins, checked from the highest credential down.
pub(crate) fn education_level(resume: &str) -> EducationLevel {
    let lowered = resume.to_lowercase();
    let patterns = patterns();
    if patterns.doctorate.is_match(&lowered) {
        EducationLevel::Doctorate
    } else if patterns.master.is_match(&lowered) {
        EducationLevel::Master
    } else if patterns.bachelor.is_match(&lowered) {
        EducationLevel::Bachelor
    } else if patterns.diploma.is_match(&lowered) {
        EducationLevel::Diploma
    } else {
        EducationLevel::None
    }
}

pub(crate) fn overall_score(skills: u8, experience: u8, education: u8) -> u8 {
    let weighted = f64::from(skills) * SKILLS_WEIGHT
        + f64::from(experience) * EXPERIENCE_WEIGHT
        + f64::from(education) * EDUCATION_WEIGHT;
    weighted.round().clamp(0.0, 100.0) as u8
}

pub(crate) fn recommendations(
    missing: &SkillSet,
    skills: u8,
    experience: u8,
    education: u8,
) -> Vec<String> {
    let mut advice = Vec::new();

    if !missing.is_empty() {
        let focus: Vec<&str> = missing.iter().take(MAX_UPSKILL_SUGGESTIONS).collect();
        advice.push(format!(
            "Build hands-on experience with {} to cover this role's requirements",
            focus.join(", ")
        ));
    }
    if experience < 70 {
        advice.push(IMPACT_RECOMMENDATION.to_string());
    }
    if education < 75 {
        advice.push(CERTIFICATION_RECOMMENDATION.to_string());
    }
    if skills < 75 {
        advice.push(KEYWORD_RECOMMENDATION.to_string());
    }
    if advice.is_empty() {
        advice.push(STRONG_MATCH_RECOMMENDATION.to_string());
    }

    advice
}

pub(crate) fn score_texts(matcher: &dyn SkillMatcher, resume: &str, job: &str) -> MatchResult {
    let required = matcher.extract(job);
    let offered = matcher.extract(resume);

    let matched = required.intersection(&offered);
    let missing = required.difference(&offered);

    let skills = skills_match(&matched, &required);
    let experience = experience_match(years_of_experience(resume), requested_seniority(job));
    let education = education_level(resume).score();

    MatchResult {
        overall_score: overall_score(skills, experience, education),
        skills_match: skills,
        experience_match: experience,
        education_match: education,
        recommendations: recommendations(&missing, skills, experience, education),
        matched_skills: matched.into_vec(),
        missing_skills: missing.into_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_takes_the_largest_capped_figure() {
        assert_eq!(years_of_experience("3 years at Acme, then 7+ years at Initech"), 7);
        assert_eq!(years_of_experience("a 5-year stint"), 5);
        assert_eq!(years_of_experience("65 years of combined team experience"), 40);
        assert_eq!(years_of_experience("99999999999999 years"), 40);
        assert_eq!(years_of_experience("fresh graduate"), 0);
    }

    #[test]
    fn seniority_prefers_senior_signals() {
        assert_eq!(
            requested_seniority("Junior or Senior developers welcome"),
            SeniorityLevel::Senior
        );
        assert_eq!(requested_seniority("Tech Lead, payments"), SeniorityLevel::Senior);
        assert_eq!(requested_seniority("Mid-level backend role"), SeniorityLevel::Mid);
        assert_eq!(requested_seniority("Entry-level analyst"), SeniorityLevel::Junior);
        assert_eq!(
            requested_seniority("Leadership skills and staffing experience"),
            SeniorityLevel::Unspecified
        );
    }

    #[test]
    fn experience_tiers_follow_requested_seniority() {
        assert_eq!(experience_match(6, SeniorityLevel::Senior), 85);
        assert_eq!(experience_match(3, SeniorityLevel::Senior), 65);
        assert_eq!(experience_match(2, SeniorityLevel::Senior), 40);
        assert_eq!(experience_match(4, SeniorityLevel::Mid), 85);
        assert_eq!(experience_match(1, SeniorityLevel::Mid), 70);
        assert_eq!(experience_match(0, SeniorityLevel::Mid), 45);
        assert_eq!(experience_match(1, SeniorityLevel::Junior), 85);
        assert_eq!(experience_match(4, SeniorityLevel::Junior), 70);
        assert_eq!(experience_match(12, SeniorityLevel::Junior), 55);
        assert_eq!(experience_match(0, SeniorityLevel::Unspecified), 50);
        assert_eq!(experience_match(5, SeniorityLevel::Unspecified), 80);
        assert_eq!(experience_match(40, SeniorityLevel::Unspecified), 90);
    }

    #[test]
    fn education_first_tier_wins() {
        assert_eq!(
            education_level("PhD in physics, BSc in maths"),
            EducationLevel::Doctorate
        );
        assert_eq!(education_level("Master's in CS"), EducationLevel::Master);
        assert_eq!(education_level("MSc Data Science"), EducationLevel::Master);
        assert_eq!(
            education_level("Masters degree, distributed systems"),
            EducationLevel::Master
        );
        assert_eq!(education_level("Bachelor of Arts"), EducationLevel::Bachelor);
        assert_eq!(education_level("degree in economics"), EducationLevel::Bachelor);
        assert_eq!(education_level("AWS certificate holder"), EducationLevel::Diploma);
        assert_eq!(education_level("self taught"), EducationLevel::None);
        assert_eq!(EducationLevel::None.score(), 60);
    }

    #[test]
    fn role_titles_are_not_read_as_a_masters_degree() {
        assert_eq!(
            education_level("Certified Scrum Masters coach"),
            EducationLevel::None
        );
        assert_eq!(
            education_level("Scrum Master in a fintech team, bachelor's in economics"),
            EducationLevel::Bachelor
        );
    }

    #[test]
    fn overall_uses_weighted_rounding() {
        assert_eq!(overall_score(75, 85, 60), 76);
        assert_eq!(overall_score(100, 85, 90), 93);
        assert_eq!(overall_score(0, 40, 60), 23);
    }

    #[test]
    fn recommendations_cap_upskill_list_at_seven() {
        let missing: SkillSet = [
            "python", "java", "golang", "rust", "ruby", "php", "swift", "kotlin",
        ]
        .map(String::from)
        .into_iter()
        .collect();

        let advice = recommendations(&missing, 0, 85, 90);
        assert_eq!(advice.len(), 2);
        assert!(advice[0].contains("python, java, golang, rust, ruby, php, swift"));
        assert!(!advice[0].contains("kotlin"));
        assert_eq!(advice[1], KEYWORD_RECOMMENDATION);
    }

    #[test]
    fn strong_match_fallback_only_when_nothing_else_fires() {
        let advice = recommendations(&SkillSet::new(), 100, 85, 80);
        assert_eq!(advice, vec![STRONG_MATCH_RECOMMENDATION.to_string()]);
    }
}
