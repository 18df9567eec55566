use super::report::round_half_up;
use super::streaks::{current_streak, practiced_days};
use crate::practice::PracticeSession;
use chrono::{DateTime, Utc};
use serde::Serialize;

const RECENT_SESSIONS: usize = 5;

/// Headline numbers of the practice dashboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStats {
    pub total_practices: usize,
    pub first_score: i64,
    pub latest_score: i64,
    pub best_score: i64,
    pub average_score: i64,
    pub improvement: i64,
    pub total_words: u64,
    pub avg_filler_words: i64,
    pub practice_streak: usize,
    /// Newest first.
    pub recent_sessions: Vec<PracticeSession>,
}

impl PracticeStats {
    pub fn compute(sessions: &[PracticeSession], now: DateTime<Utc>) -> Self {
        let mut sorted: Vec<&PracticeSession> = sessions.iter().collect();
        sorted.sort_by_key(|s| (s.practice_date, s.id));

        let total = sorted.len();
        let first_score = sorted.first().map(|s| s.score as i64).unwrap_or(0);
        let latest_score = sorted.last().map(|s| s.score as i64).unwrap_or(0);
        let best_score = sorted.iter().map(|s| s.score as i64).max().unwrap_or(0);
        let mean = |sum: u64| {
            if total == 0 {
                0
            } else {
                round_half_up(sum as f64 / total as f64)
            }
        };
        let days = practiced_days(sorted.iter().map(|s| s.practice_date.date_naive()));

        PracticeStats {
            total_practices: total,
            first_score,
            latest_score,
            best_score,
            average_score: mean(sorted.iter().map(|s| s.score as u64).sum()),
            improvement: latest_score - first_score,
            total_words: sorted.iter().map(|s| s.metrics.word_count as u64).sum(),
            avg_filler_words: mean(sorted.iter().map(|s| s.metrics.filler_word_count as u64).sum()),
            practice_streak: current_streak(&days, now.date_naive()),
            recent_sessions: sorted
                .iter()
                .rev()
                .take(RECENT_SESSIONS)
                .map(|s| (*s).clone())
                .collect(),
        }
    }
}
