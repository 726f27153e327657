//! Resume to job-description matching.
//!
//! Text is normalized into tokens, tokens are mapped onto a versioned skill vocabulary, and the
//! scorer combines skill overlap with experience and education heuristics into a [`MatchResult`].

pub mod domain;
mod normalizer;
mod scorer;
pub mod vocabulary;

use std::sync::Arc;

pub use domain::{EducationLevel, MatchResult, ScoreInput, ScoreInputError, SeniorityLevel};
pub use normalizer::normalize;
pub use vocabulary::{
    SkillMatcher, SkillSet, SkillVocabulary, TokenSkillMatcher, VocabularyError,
    STANDARD_VOCABULARY_VERSION,
};

/// Stateless scorer shared across requests.
#[derive(Clone)]
pub struct MatchEngine {
    matcher: Arc<dyn SkillMatcher>,
}

impl MatchEngine {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self::with_matcher(Arc::new(TokenSkillMatcher::new(vocabulary)))
    }

    pub fn with_matcher(matcher: Arc<dyn SkillMatcher>) -> Self {
        Self { matcher }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        self.matcher.vocabulary()
    }

    pub fn extract_skills(&self, text: &str) -> SkillSet {
        self.matcher.extract(text)
    }

    pub fn score(&self, resume: &str, job_description: &str) -> MatchResult {
        scorer::score_texts(self.matcher.as_ref(), resume, job_description)
    }

    /// Validate a wire request before scoring it.
    pub fn score_input(&self, input: &ScoreInput) -> Result<MatchResult, ScoreInputError> {
        let (resume, job) = input.texts()?;
        Ok(self.score(resume, job))
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(SkillVocabulary::standard())
    }
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("vocabulary", &self.vocabulary().version())
            .finish()
    }
}
