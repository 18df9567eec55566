use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechAnalysis {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub grammar_issues: Vec<String>,
    pub vocabulary_enhancements: Vec<String>,
}

impl SpeechAnalysis {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.improvements.is_empty()
            && self.grammar_issues.is_empty()
            && self.vocabulary_enhancements.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Speech {
    pub id: usize,
    pub user_id: usize,
    pub title: String,
    pub original_draft: String,
    pub improved_version: String,
    pub ai_suggestions: String,
    pub analysis: SpeechAnalysis,
    pub practice_count: usize,
    pub last_practiced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpeech {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_draft: String,
    #[serde(default)]
    pub improved_version: Option<String>,
    #[serde(default)]
    pub ai_suggestions: Option<String>,
    #[serde(default)]
    pub analysis: Option<SpeechAnalysis>,
}

impl NewSpeech {
    /// Title and draft must both carry some non-whitespace text.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.original_draft.trim().is_empty()
    }
}

/// Partial update: absent or empty fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_draft: Option<String>,
    #[serde(default)]
    pub improved_version: Option<String>,
    #[serde(default)]
    pub ai_suggestions: Option<String>,
    #[serde(default)]
    pub analysis: Option<SpeechAnalysis>,
}

impl SpeechUpdate {
    pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}
