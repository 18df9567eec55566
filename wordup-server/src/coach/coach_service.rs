use super::llm::{CompletionOptions, LlmError, LlmProvider};
use super::parsing::{parse_improver_response, FeedbackOutcome, ImproverResponse};
use super::prompts::{
    feedback_prompt, improver_prompt, AnalysisType, FEEDBACK_TEMPERATURE, IMPROVER_TEMPERATURE,
};
use super::text_stats::TranscriptStats;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const EMPTY_REPLY_MESSAGE: &str = "The AI model did not return any content.";

#[derive(Debug)]
pub struct CoachFeedback {
    pub stats: TranscriptStats,
    pub outcome: FeedbackOutcome,
}

#[derive(Debug)]
pub struct ImprovedSpeech {
    pub text: String,
    pub parsed: ImproverResponse,
}

/// Shapes coaching requests for the configured LLM. Without a provider
/// every request fails with `LlmError::NotConfigured`.
#[derive(Clone)]
pub struct Coach {
    llm: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl Coach {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// `provider/model` of the configured LLM.
    pub fn describe(&self) -> Option<String> {
        self.llm
            .as_ref()
            .map(|llm| format!("{}/{}", llm.name(), llm.model()))
    }

    fn provider(&self) -> Result<&Arc<dyn LlmProvider>, LlmError> {
        self.llm.as_ref().ok_or(LlmError::NotConfigured)
    }

    /// Scores a transcript. The transcript is trimmed before counting and
    /// prompting.
    pub async fn feedback(&self, transcript: &str) -> Result<CoachFeedback, LlmError> {
        let provider = self.provider()?;
        let transcript = transcript.trim();
        let stats = TranscriptStats::of(transcript);

        debug!(
            provider = provider.name(),
            model = provider.model(),
            words = stats.word_count,
            fillers = stats.filler_word_count,
            "Requesting speech feedback"
        );
        let options = CompletionOptions {
            temperature: FEEDBACK_TEMPERATURE,
            top_k: Some(32),
            top_p: Some(0.95),
            max_tokens: None,
            timeout: self.timeout,
        };
        let reply = provider
            .complete(&feedback_prompt(transcript, &stats), &options)
            .await?;

        let outcome = FeedbackOutcome::from_reply(reply);
        if let FeedbackOutcome::Raw(_) = outcome {
            info!("Feedback reply was not valid JSON, returning it as raw text");
        }
        Ok(CoachFeedback { stats, outcome })
    }

    pub async fn improve(
        &self,
        draft: &str,
        analysis_type: AnalysisType,
    ) -> Result<ImprovedSpeech, LlmError> {
        let provider = self.provider()?;
        debug!(
            provider = provider.name(),
            model = provider.model(),
            analysis_type = analysis_type.as_str(),
            "Requesting speech improvement"
        );
        let options = CompletionOptions {
            temperature: IMPROVER_TEMPERATURE,
            top_k: Some(40),
            top_p: Some(0.95),
            max_tokens: None,
            timeout: self.timeout,
        };
        let text = provider
            .complete(&improver_prompt(analysis_type, draft.trim()), &options)
            .await?;

        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(EMPTY_REPLY_MESSAGE.to_string()));
        }
        let parsed = parse_improver_response(&text);
        Ok(ImprovedSpeech { text, parsed })
    }
}
