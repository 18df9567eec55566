//! Dashboard analytics over a user's practice history. Everything here is a
//! pure function of the session list and the current time.

pub mod achievements;
mod calendar;
mod practice_stats;
mod report;
mod streaks;

pub use achievements::Achievement;
pub use calendar::{calendar, CalendarDay, CALENDAR_DAYS};
pub use practice_stats::PracticeStats;
pub use report::{
    round_half_up, ImprovementRate, ProgressReport, SkillLevel, TimeSpent,
    IDEAL_PRACTICES_PER_WEEK, IMPROVEMENT_CHUNK_SIZE,
};
pub use streaks::{best_streak, current_streak, practiced_days};
