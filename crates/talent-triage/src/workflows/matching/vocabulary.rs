use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::normalizer::normalize;

pub const STANDARD_VOCABULARY_VERSION: &str = "2024.1";

const STANDARD_SKILLS: &[&str] = &[
    // Languages
    "javascript",
    "typescript",
    "python",
    "java",
    "golang",
    "rust",
    "ruby",
    "php",
    "c++",
    "c#",
    "swift",
    "kotlin",
    "sql",
    // Data stores
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "graphql",
    // Frameworks
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "django",
    "flask",
    "spring boot",
    "html",
    "css",
    // Platform
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "ci/cd",
    "git",
    "linux",
    "microservices",
    // Practice
    "machine learning",
    "data analysis",
    "agile",
    "scrum",
];

/// Versioned list of canonical skill names recognised by the extractor.
///
/// Entries are stored in their normalized form (lower-case, tokens joined by a single space),
/// so `"Node.js"` and `" node.js "` collapse to the same skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillVocabulary {
    version: String,
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VocabularyDocument {
    version: String,
    skills: Vec<String>,
}

impl SkillVocabulary {
    pub fn standard() -> Self {
        Self {
            version: STANDARD_VOCABULARY_VERSION.to_string(),
            skills: STANDARD_SKILLS.iter().map(|skill| skill.to_string()).collect(),
        }
    }

    pub fn new<I, S>(version: impl Into<String>, skills: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let version = version.into();
        let mut canonical: Vec<String> = Vec::new();
        for skill in skills {
            let normalized = normalize(skill.as_ref()).join(" ");
            if !normalized.is_empty() && !canonical.contains(&normalized) {
                canonical.push(normalized);
            }
        }

        if canonical.is_empty() {
            return Err(VocabularyError::Empty { version });
        }

        Ok(Self {
            version,
            skills: canonical,
        })
    }

    /// Load a `{ "version": "...", "skills": [...] }` document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, VocabularyError> {
        let document: VocabularyDocument = serde_json::from_reader(reader)?;
        Self::new(document.version, document.skills)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VocabularyError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read skill vocabulary: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid skill vocabulary document: {0}")]
    Format(#[from] serde_json::Error),
    #[error("skill vocabulary '{version}' has no usable entries")]
    Empty { version: String },
}

/// Ordered, duplicate-free collection of canonical skill names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the skill was already present.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        if self.contains(&skill) {
            return false;
        }
        self.0.push(skill);
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|existing| existing == skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Skills of `self` also present in `other`, in `self` order.
    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        self.iter()
            .filter(|skill| other.contains(skill))
            .map(str::to_string)
            .collect()
    }

    /// Skills of `self` absent from `other`, in `self` order.
    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        self.iter()
            .filter(|skill| !other.contains(skill))
            .map(str::to_string)
            .collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

/// Maps free text onto a set of known skills.
pub trait SkillMatcher: Send + Sync {
    fn extract(&self, text: &str) -> SkillSet;

    fn vocabulary(&self) -> &SkillVocabulary;
}

/// Exact-token matcher with a dot-insensitive fallback (`nodejs` finds `node.js`).
///
/// Multi-word skills are matched over sliding windows of adjacent tokens. No other
/// punctuation is folded, so `c#`, `c++`, and `ci/cd` must appear verbatim.
#[derive(Debug, Clone)]
pub struct TokenSkillMatcher {
    vocabulary: SkillVocabulary,
    exact: HashMap<String, usize>,
    dotless: HashMap<String, usize>,
    max_window: usize,
}

fn strip_dots(value: &str) -> String {
    value.replace('.', "")
}

impl TokenSkillMatcher {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        let mut exact = HashMap::new();
        let mut dotless = HashMap::new();
        let mut max_window = 1;

        for (index, skill) in vocabulary.skills().iter().enumerate() {
            exact.entry(skill.clone()).or_insert(index);
            dotless.entry(strip_dots(skill)).or_insert(index);
            max_window = max_window.max(skill.split(' ').count());
        }

        Self {
            vocabulary,
            exact,
            dotless,
            max_window,
        }
    }

    fn lookup(&self, phrase: &str) -> Option<usize> {
        self.exact
            .get(phrase)
            .or_else(|| self.dotless.get(&strip_dots(phrase)))
            .copied()
    }
}

impl Default for TokenSkillMatcher {
    fn default() -> Self {
        Self::new(SkillVocabulary::standard())
    }
}

impl SkillMatcher for TokenSkillMatcher {
    fn extract(&self, text: &str) -> SkillSet {
        let tokens = normalize(text);
        let mut hits = vec![false; self.vocabulary.len()];

        for window in 1..=self.max_window.min(tokens.len()) {
            for phrase in tokens.windows(window) {
                if let Some(index) = self.lookup(&phrase.join(" ")) {
                    hits[index] = true;
                }
            }
        }

        self.vocabulary
            .skills()
            .iter()
            .zip(hits)
            .filter(|(_, hit)| *hit)
            .map(|(skill, _)| skill.clone())
            .collect()
    }

    fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }
}
