use super::achievements::{self, Achievement, AchievementInputs};
use super::streaks::{best_streak, current_streak, practiced_days};
use crate::practice::{Criterion, PracticeSession};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Sessions per week considered ideal. Practicing this often, or more,
/// yields a consistency score of 100.
pub const IDEAL_PRACTICES_PER_WEEK: usize = 4;

/// Improvement rate buckets over the chronological history hold this many
/// sessions each.
pub const IMPROVEMENT_CHUNK_SIZE: usize = 10;

pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn classify(score: i64) -> Self {
        if score >= 85 {
            SkillLevel::Expert
        } else if score >= 70 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub practice: usize,
    pub score: i64,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionTrendPoint {
    pub practice: usize,
    pub score: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionProgress {
    pub current: i64,
    pub best: i64,
    pub improvement: i64,
    pub trend: Vec<CriterionTrendPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePoint {
    pub practice: usize,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsTrends {
    pub words_per_minute: Vec<ValuePoint>,
    pub filler_word_count: Vec<ValuePoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBucket {
    pub period: String,
    pub sessions: usize,
    pub first_score: i64,
    pub last_score: i64,
    pub improvement: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementRate {
    /// Consecutive chunks of [`IMPROVEMENT_CHUNK_SIZE`] sessions.
    pub trend: Vec<RateBucket>,
    /// ISO weeks, labelled `YYYY-Www`.
    pub weekly: Vec<RateBucket>,
    /// Mean improvement over the chunk buckets.
    pub average: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpent {
    pub seconds: u64,
    pub formatted: String,
}

impl TimeSpent {
    pub fn from_seconds(seconds: u64) -> Self {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        let secs = seconds % 60;
        let formatted = if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, secs)
        } else {
            format!("{}s", secs)
        };
        TimeSpent { seconds, formatted }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub total_practices: usize,
    pub first_score: i64,
    pub latest_score: i64,
    pub best_score: i64,
    pub average_score: i64,
    pub improvement: i64,
    pub improvement_percent: i64,
    pub improvement_trend: Vec<TrendPoint>,
    pub criteria_progress: Option<BTreeMap<Criterion, CriterionProgress>>,
    pub metrics_trends: Option<MetricsTrends>,
    pub consistency_score: i64,
    pub practices_per_week: usize,
    pub practices_per_month: usize,
    pub current_streak: usize,
    pub best_streak: usize,
    pub improvement_rate: ImprovementRate,
    pub skill_level: SkillLevel,
    pub achievements: Vec<Achievement>,
    pub total_time_spent: TimeSpent,
}

/// Sessions practiced on one of the `days` UTC days ending with `today`.
pub(crate) fn count_in_last_days(sessions: &[&PracticeSession], today: NaiveDate, days: u64) -> usize {
    let Some(first_day) = today.checked_sub_days(Days::new(days.saturating_sub(1))) else {
        return sessions.len();
    };
    sessions
        .iter()
        .map(|s| s.practice_date.date_naive())
        .filter(|d| *d >= first_day && *d <= today)
        .count()
}

fn rate_bucket(period: String, sessions: &[&PracticeSession]) -> Option<RateBucket> {
    if sessions.len() < 2 {
        return None;
    }
    let first_score = sessions.first()?.score as i64;
    let last_score = sessions.last()?.score as i64;
    Some(RateBucket {
        period,
        sessions: sessions.len(),
        first_score,
        last_score,
        improvement: last_score - first_score,
    })
}

fn improvement_rate(sessions: &[&PracticeSession]) -> ImprovementRate {
    let trend = sessions
        .chunks(IMPROVEMENT_CHUNK_SIZE)
        .enumerate()
        .filter_map(|(idx, chunk)| {
            let start = idx * IMPROVEMENT_CHUNK_SIZE + 1;
            let end = start + chunk.len() - 1;
            rate_bucket(format!("Sessions {}-{}", start, end), chunk)
        })
        .collect::<Vec<_>>();

    let mut weeks: BTreeMap<(i32, u32), Vec<&PracticeSession>> = BTreeMap::new();
    for session in sessions.iter().copied() {
        let week = session.practice_date.iso_week();
        weeks
            .entry((week.year(), week.week()))
            .or_default()
            .push(session);
    }
    let weekly = weeks
        .into_iter()
        .filter_map(|((year, week), bucket)| {
            rate_bucket(format!("{}-W{:02}", year, week), &bucket)
        })
        .collect::<Vec<_>>();

    let average = if trend.is_empty() {
        0
    } else {
        round_half_up(
            trend.iter().map(|b| b.improvement as f64).sum::<f64>() / trend.len() as f64,
        )
    };

    ImprovementRate {
        trend,
        weekly,
        average,
    }
}

fn criteria_progress(
    sessions: &[&PracticeSession],
) -> Option<BTreeMap<Criterion, CriterionProgress>> {
    let mut progress = BTreeMap::new();
    for criterion in Criterion::ALL {
        let trend = sessions
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| {
                s.detailed_scores
                    .get(criterion)
                    .map(|c| CriterionTrendPoint {
                        practice: idx + 1,
                        score: c.score as i64,
                    })
            })
            .collect::<Vec<_>>();
        let (Some(first), Some(last)) = (trend.first(), trend.last()) else {
            continue;
        };
        let best = trend.iter().map(|p| p.score).max().unwrap_or(last.score);
        progress.insert(
            criterion,
            CriterionProgress {
                current: last.score,
                best,
                improvement: last.score - first.score,
                trend: trend.clone(),
            },
        );
    }
    if progress.is_empty() {
        None
    } else {
        Some(progress)
    }
}

fn metrics_trends(sessions: &[&PracticeSession]) -> Option<MetricsTrends> {
    if sessions.is_empty() {
        return None;
    }
    let words_per_minute = sessions
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| {
            s.metrics.words_per_minute.map(|value| ValuePoint {
                practice: idx + 1,
                value,
            })
        })
        .collect();
    let filler_word_count = sessions
        .iter()
        .enumerate()
        .map(|(idx, s)| ValuePoint {
            practice: idx + 1,
            value: s.metrics.filler_word_count,
        })
        .collect();
    Some(MetricsTrends {
        words_per_minute,
        filler_word_count,
    })
}

impl ProgressReport {
    /// Summarizes a user's practice history as seen at `now`. The input order
    /// does not matter, sessions are sorted chronologically first.
    pub fn compute(sessions: &[PracticeSession], now: DateTime<Utc>) -> Self {
        let mut sorted: Vec<&PracticeSession> = sessions.iter().collect();
        sorted.sort_by_key(|s| (s.practice_date, s.id));
        let today = now.date_naive();

        let scores = sorted.iter().map(|s| s.score as i64).collect::<Vec<_>>();
        let total_practices = sorted.len();
        let first_score = scores.first().copied().unwrap_or(0);
        let latest_score = scores.last().copied().unwrap_or(0);
        let best_score = scores.iter().copied().max().unwrap_or(0);
        let average_score = if scores.is_empty() {
            0
        } else {
            round_half_up(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
        };
        let improvement = latest_score - first_score;
        let improvement_percent = if first_score > 0 {
            round_half_up(improvement as f64 / first_score as f64 * 100.0)
        } else {
            0
        };

        let improvement_trend = sorted
            .iter()
            .enumerate()
            .map(|(idx, s)| TrendPoint {
                practice: idx + 1,
                score: s.score as i64,
                date: s.practice_date,
            })
            .collect();

        let practices_per_week = count_in_last_days(&sorted, today, 7);
        let practices_per_month = count_in_last_days(&sorted, today, 30);
        let consistency_score = round_half_up(
            practices_per_week as f64 / IDEAL_PRACTICES_PER_WEEK as f64 * 100.0,
        )
        .min(100);

        let days = practiced_days(sorted.iter().map(|s| s.practice_date.date_naive()));
        let current_streak = current_streak(&days, today);
        let best_streak = best_streak(&days);

        let skill_level = if total_practices == 0 {
            SkillLevel::Beginner
        } else {
            SkillLevel::classify(average_score.max(latest_score))
        };

        let achievements = achievements::evaluate(&AchievementInputs {
            total_practices,
            best_score,
            improvement,
            best_streak,
        });

        let total_seconds: u64 = sorted
            .iter()
            .filter_map(|s| s.metrics.duration)
            .map(u64::from)
            .sum();

        ProgressReport {
            total_practices,
            first_score,
            latest_score,
            best_score,
            average_score,
            improvement,
            improvement_percent,
            improvement_trend,
            criteria_progress: criteria_progress(&sorted),
            metrics_trends: metrics_trends(&sorted),
            consistency_score,
            practices_per_week,
            practices_per_month,
            current_streak,
            best_streak,
            improvement_rate: improvement_rate(&sorted),
            skill_level,
            achievements,
            total_time_spent: TimeSpent::from_seconds(total_seconds),
        }
    }
}
