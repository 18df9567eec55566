use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest score a practice session can carry.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScore {
    pub score: u32,
    #[serde(default)]
    pub feedback: String,
}

/// Per-criterion scores. A criterion the coach did not grade stays `None`
/// and is left out of criterion analytics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedScores {
    pub clarity: Option<CriterionScore>,
    pub pace: Option<CriterionScore>,
    pub filler_words: Option<CriterionScore>,
    pub vocabulary: Option<CriterionScore>,
    pub structure: Option<CriterionScore>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Clarity,
    Pace,
    Vocabulary,
    Structure,
    FillerWords,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Clarity,
        Criterion::Pace,
        Criterion::Vocabulary,
        Criterion::Structure,
        Criterion::FillerWords,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Criterion::Clarity => "clarity",
            Criterion::Pace => "pace",
            Criterion::Vocabulary => "vocabulary",
            Criterion::Structure => "structure",
            Criterion::FillerWords => "fillerWords",
        }
    }
}

impl DetailedScores {
    pub fn get(&self, criterion: Criterion) -> Option<&CriterionScore> {
        match criterion {
            Criterion::Clarity => self.clarity.as_ref(),
            Criterion::Pace => self.pace.as_ref(),
            Criterion::Vocabulary => self.vocabulary.as_ref(),
            Criterion::Structure => self.structure.as_ref(),
            Criterion::FillerWords => self.filler_words.as_ref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMetrics {
    pub word_count: u32,
    pub sentence_count: u32,
    pub filler_word_count: u32,
    pub words_per_minute: Option<u32>,
    /// Seconds.
    pub duration: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionFeedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub overall_feedback: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceResult {
    pub id: usize,
    pub session_id: usize,
    pub sentence_text: String,
    pub sentence_index: i64,
    pub attempts: u32,
    pub scores: Vec<u32>,
    pub best_score: Option<u32>,
    pub last_score: Option<u32>,
    pub flagged_as_difficult: bool,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarIssue {
    pub id: usize,
    pub issue: String,
    pub suggestion: Option<String>,
    pub sentence: Option<String>,
    pub resolved: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: usize,
    pub word: String,
    pub definition: Option<String>,
    pub usage: Option<String>,
    pub date_added: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrammarIssue {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub sentence: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVocabularyEntry {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: usize,
    pub user_id: usize,
    pub speech_id: Option<usize>,
    pub speech_title: Option<String>,
    pub transcript: String,
    pub score: u32,
    pub detailed_scores: DetailedScores,
    pub metrics: SessionMetrics,
    pub feedback: SessionFeedback,
    pub sentence_results: Vec<SentenceResult>,
    pub grammar_issues: Vec<GrammarIssue>,
    pub vocabulary_learned: Vec<VocabularyEntry>,
    pub practice_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct NewPracticeSession {
    /// Only honoured when the speech belongs to the same user.
    pub speech_id: Option<usize>,
    pub transcript: String,
    pub score: u32,
    pub detailed_scores: DetailedScores,
    pub metrics: SessionMetrics,
    pub feedback: SessionFeedback,
    pub grammar_issues: Vec<NewGrammarIssue>,
    pub vocabulary_learned: Vec<NewVocabularyEntry>,
    /// Defaults to the insertion time.
    pub practice_date: Option<DateTime<Utc>>,
}

/// One scored attempt at a single sentence of a speech.
#[derive(Clone, Debug)]
pub struct SentenceAttempt {
    pub speech_id: Option<usize>,
    pub sentence_text: String,
    pub sentence_index: i64,
    pub score: u32,
    pub flag_as_difficult: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceUpdate {
    #[serde(default)]
    pub flag_as_difficult: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug)]
pub enum SentenceUpdateOutcome {
    SessionNotFound,
    SentenceNotFound,
    Updated(SentenceResult),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultSentence {
    pub id: usize,
    pub text: String,
    pub sentence_index: i64,
    pub attempts: u32,
    pub scores: Vec<u32>,
    pub best_score: Option<u32>,
    pub last_score: Option<u32>,
    pub notes: Option<String>,
    pub speech_title: String,
    pub speech_id: Option<usize>,
    pub session_id: usize,
    pub last_practiced: DateTime<Utc>,
}

/// Flat summary served by the history endpoint older clients read.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySessionSummary {
    pub id: usize,
    pub user_id: usize,
    pub speech_id: Option<usize>,
    pub transcript: String,
    pub feedback: Option<String>,
    pub score: u32,
    pub word_count: u32,
    pub sentence_count: u32,
    pub date: DateTime<Utc>,
}

impl From<&PracticeSession> for LegacySessionSummary {
    fn from(session: &PracticeSession) -> Self {
        LegacySessionSummary {
            id: session.id,
            user_id: session.user_id,
            speech_id: session.speech_id,
            transcript: session.transcript.clone(),
            feedback: session.feedback.overall_feedback.clone(),
            score: session.score,
            word_count: session.metrics.word_count,
            sentence_count: session.metrics.sentence_count,
            date: session.practice_date,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOrder {
    OldestFirst,
    NewestFirst,
}
