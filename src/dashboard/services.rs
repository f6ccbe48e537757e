use std::collections::{BTreeMap, HashSet};

use time::{Date, Duration, OffsetDateTime, UtcOffset};

use super::dto::{DashboardStats, DayBalance};
use crate::completions::repo_types::{DietPlanCompletion, WorkoutCompletion};

pub const BALANCE_DAYS: i64 = 7;

fn utc_day(at: OffsetDateTime) -> Date {
    at.to_offset(UtcOffset::UTC).date()
}

fn month_start(today: Date) -> Date {
    today.replace_day(1).unwrap_or(today)
}

/// Earliest instant the dashboard needs completions from: the start of the
/// month or of the balance week, whichever is older.
pub fn window_start(now: OffsetDateTime) -> OffsetDateTime {
    let today = utc_day(now);
    let week_start = today - Duration::days(BALANCE_DAYS - 1);
    month_start(today).min(week_start).midnight().assume_utc()
}

/// Consecutive workout days ending today, or yesterday when nothing has
/// been logged yet today.
pub fn current_streak(workout_days: &[Date], today: Date) -> u32 {
    let days: HashSet<Date> = workout_days.iter().copied().collect();
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.previous_day() {
            Some(y) if days.contains(&y) => y,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.previous_day() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Burned and consumed calories per UTC day for the week ending today,
/// oldest day first.
pub fn weekly_balance(
    workouts: &[WorkoutCompletion],
    diets: &[DietPlanCompletion],
    today: Date,
) -> Vec<DayBalance> {
    let first = today - Duration::days(BALANCE_DAYS - 1);
    let mut days: BTreeMap<Date, (i64, i64)> = (0..BALANCE_DAYS)
        .map(|i| (first + Duration::days(i), (0, 0)))
        .collect();

    for w in workouts {
        if let Some(slot) = days.get_mut(&utc_day(w.completed_at)) {
            slot.0 += i64::from(w.calories_burned);
        }
    }
    for d in diets {
        if let Some(slot) = days.get_mut(&utc_day(d.completed_at)) {
            slot.1 += i64::from(d.calories_consumed);
        }
    }

    days.into_iter()
        .map(|(date, (burned, consumed))| DayBalance {
            date: date.to_string(),
            burned,
            consumed,
            net: consumed - burned,
        })
        .collect()
}

pub fn build_stats(
    workouts_completed: i64,
    workout_days: &[Date],
    workouts: &[WorkoutCompletion],
    diets: &[DietPlanCompletion],
    now: OffsetDateTime,
) -> DashboardStats {
    let today = utc_day(now);
    let this_month = month_start(today)..=today;

    let calories_burned_this_month = workouts
        .iter()
        .filter(|w| this_month.contains(&utc_day(w.completed_at)))
        .map(|w| i64::from(w.calories_burned))
        .sum();
    let calories_consumed_this_month = diets
        .iter()
        .filter(|d| this_month.contains(&utc_day(d.completed_at)))
        .map(|d| i64::from(d.calories_consumed))
        .sum();

    DashboardStats {
        workouts_completed,
        current_streak_days: current_streak(workout_days, today),
        calories_burned_this_month,
        calories_consumed_this_month,
        weekly_balance: weekly_balance(workouts, diets, today),
    }
}
