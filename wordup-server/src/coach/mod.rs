//! Coaching: local transcript statistics, prompt shaping for the LLM and
//! tolerant parsing of whatever the model replies.

mod coach_service;
pub mod llm;
mod parsing;
mod prompts;
mod session_mapping;
mod text_stats;

pub use coach_service::{Coach, CoachFeedback, ImprovedSpeech, EMPTY_REPLY_MESSAGE};
pub use llm::{CompletionOptions, GeminiProvider, LlmError, LlmProvider};
pub use parsing::{
    extract_json_object, parse_improver_response, FeedbackOutcome, ImproverResponse,
    GENERAL_SECTION, VERSION_HEADINGS,
};
pub use prompts::{feedback_prompt, improver_prompt, AnalysisType};
pub use session_mapping::session_from_feedback;
pub use text_stats::{
    count_filler_words, count_sentences, count_words, TranscriptStats, FILLER_WORDS,
};
