use super::report::round_half_up;
use crate::practice::PracticeSession;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Days covered by the practice heatmap, seven full weeks.
pub const CALENDAR_DAYS: u64 = 49;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: usize,
    pub avg_score: i64,
}

/// One entry per UTC day, oldest first, ending with today.
pub fn calendar(sessions: &[PracticeSession], now: DateTime<Utc>) -> Vec<CalendarDay> {
    let mut per_day: HashMap<NaiveDate, (usize, u64)> = HashMap::new();
    for session in sessions {
        let entry = per_day.entry(session.practice_date.date_naive()).or_default();
        entry.0 += 1;
        entry.1 += session.score as u64;
    }

    let today = now.date_naive();
    (0..CALENDAR_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|day| {
            let (count, total) = per_day.get(&day).copied().unwrap_or_default();
            CalendarDay {
                date: day.format("%Y-%m-%d").to_string(),
                count,
                avg_score: if count == 0 {
                    0
                } else {
                    round_half_up(total as f64 / count as f64)
                },
            }
        })
        .collect()
}
