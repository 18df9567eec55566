use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Distinct practiced days, several sessions on one day count once.
pub fn practiced_days<I: IntoIterator<Item = NaiveDate>>(days: I) -> BTreeSet<NaiveDate> {
    days.into_iter().collect()
}

/// Consecutive practiced days ending today, or yesterday when today has no
/// practice yet. Zero when the latest practice is older than yesterday.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> usize {
    let Some(latest) = days.range(..=today).next_back().copied() else {
        return 0;
    };
    let yesterday = today.checked_sub_days(Days::new(1));
    if latest != today && Some(latest) != yesterday {
        return 0;
    }

    let mut streak = 0;
    let mut expected = Some(latest);
    for day in days.range(..=latest).rev() {
        if Some(*day) != expected {
            break;
        }
        streak += 1;
        expected = day.checked_sub_days(Days::new(1));
    }
    streak
}

/// Longest run of consecutive practiced days anywhere in the history.
pub fn best_streak(days: &BTreeSet<NaiveDate>) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous.and_then(|p| p.checked_add_days(Days::new(1))) {
            Some(next) if next == *day => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset_from_today: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(offset_from_today)).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn gap_breaks_current_streak() {
        let days = practiced_days([day(0), day(1), day(2), day(5)]);

        assert_eq!(current_streak(&days, today()), 3);
        assert_eq!(best_streak(&days), 3);
    }

    #[test]
    fn streak_may_end_yesterday() {
        let days = practiced_days([day(1), day(2)]);
        assert_eq!(current_streak(&days, today()), 2);

        let stale = practiced_days([day(2), day(3), day(4), day(5)]);
        assert_eq!(current_streak(&stale, today()), 0);
        assert_eq!(best_streak(&stale), 4);
    }

    #[test]
    fn same_day_sessions_count_once() {
        let days = practiced_days([day(0), day(0), day(0), day(1)]);
        assert_eq!(days.len(), 2);
        assert_eq!(current_streak(&days, today()), 2);
        assert_eq!(best_streak(&days), 2);
    }

    #[test]
    fn empty_history_has_no_streak() {
        let days = practiced_days(Vec::<NaiveDate>::new());
        assert_eq!(current_streak(&days, today()), 0);
        assert_eq!(best_streak(&days), 0);
    }

    #[test]
    fn best_streak_can_lie_in_the_past() {
        let days = practiced_days([day(0), day(10), day(11), day(12), day(13)]);
        assert_eq!(current_streak(&days, today()), 1);
        assert_eq!(best_streak(&days), 4);
    }
}
