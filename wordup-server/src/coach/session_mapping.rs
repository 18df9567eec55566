use super::text_stats::TranscriptStats;
use crate::practice::{
    CriterionScore, DetailedScores, NewPracticeSession, SessionFeedback, SessionMetrics, MAX_SCORE,
    MIN_SCORE,
};
use serde_json::Value;

/// Reads a count or score the model may have written as a number or as a
/// numeric string such as `"45"` or `"45 seconds"`.
fn lenient_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok()
        }
        _ => None,
    };
    number.filter(|n| n.is_finite() && *n >= 0.0)
}

fn lenient_u32(value: Option<&Value>) -> Option<u32> {
    lenient_number(value).map(|n| n.round().min(u32::MAX as f64) as u32)
}

fn clamp_score(value: Option<&Value>) -> Option<u32> {
    lenient_number(value).map(|n| n.clamp(MIN_SCORE, MAX_SCORE).round() as u32)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn criterion(metrics: Option<&Value>, key: &str) -> Option<CriterionScore> {
    let entry = metrics?.get(key)?;
    Some(CriterionScore {
        score: clamp_score(entry.get("score"))?,
        feedback: entry
            .get("feedback")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

/// Turns a structured coaching reply into a session to store. Counts the
/// model left out are taken from the locally computed stats, and the whole
/// reply is kept as the overall feedback.
pub fn session_from_feedback(
    feedback: &Value,
    transcript: &str,
    speech_id: Option<usize>,
    duration: Option<u32>,
    local_stats: &TranscriptStats,
) -> NewPracticeSession {
    let metrics = feedback.get("metrics");
    let stats = feedback.get("stats");
    let stat = |key: &str| stats.and_then(|s| s.get(key));

    NewPracticeSession {
        speech_id,
        transcript: transcript.to_string(),
        score: clamp_score(feedback.get("overallScore")).unwrap_or(0),
        detailed_scores: DetailedScores {
            clarity: criterion(metrics, "clarity"),
            pace: criterion(metrics, "pace"),
            filler_words: criterion(metrics, "fillerWords"),
            vocabulary: criterion(metrics, "vocabulary"),
            structure: criterion(metrics, "structure"),
        },
        metrics: SessionMetrics {
            word_count: lenient_u32(stat("wordCount")).unwrap_or(local_stats.word_count as u32),
            sentence_count: lenient_u32(stat("sentenceCount"))
                .unwrap_or(local_stats.sentence_count as u32),
            filler_word_count: lenient_u32(stat("fillerWordCount"))
                .unwrap_or(local_stats.filler_word_count as u32),
            words_per_minute: lenient_u32(stat("wordsPerMinute")),
            duration: duration.or_else(|| lenient_u32(stat("duration"))),
        },
        feedback: SessionFeedback {
            strengths: string_list(feedback.get("strengths")),
            improvements: string_list(feedback.get("improvements")),
            overall_feedback: Some(feedback.to_string()),
        },
        ..Default::default()
    }
}
