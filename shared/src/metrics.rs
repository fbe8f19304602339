//! Derived progress metrics
//!
//! Everything here is a pure function of (state, today): no side effects,
//! no clock reads, no caching. Identical inputs always produce identical
//! output, which is what makes these directly unit-testable.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{HabitCounters, UserProfile};

/// Daily water target in glasses
pub const WATER_TARGET_GLASSES: i32 = 8;

/// Daily step target
pub const STEPS_TARGET: u64 = 10_000;

/// Hard cap on streak walking; longer histories count as capped
pub const STREAK_CAP_DAYS: u32 = 365;

// ============================================================================
// Daily progress
// ============================================================================

/// Overall daily progress in [0, 1]
///
/// Mean of three components, each clamped to [0, 1]: workout done today,
/// water vs target, steps vs target.
pub fn daily_progress(profile: &UserProfile, counters: &HabitCounters, today: NaiveDate) -> f64 {
    let workout_done = if profile.completed_on(today) { 1.0 } else { 0.0 };
    let water_score = (counters.water as f64 / WATER_TARGET_GLASSES as f64).clamp(0.0, 1.0);
    let steps_score = (counters.steps as f64 / STEPS_TARGET as f64).clamp(0.0, 1.0);

    (workout_done + water_score + steps_score) / 3.0
}

/// Deterministic coaching line for the home screen
///
/// Names the first lagging component in workout -> water -> steps order,
/// or celebrates when everything is maxed.
pub fn daily_insight(profile: &UserProfile, counters: &HabitCounters, today: NaiveDate) -> String {
    let progress = daily_progress(profile, counters, today);
    if progress >= 1.0 {
        return "Ultimate Daily Goal Achieved! Your biological optimization is at peak capacity. \
                Rest and recover well."
            .to_string();
    }

    let hint = if !profile.completed_on(today) {
        "Complete your workout session"
    } else if counters.water < WATER_TARGET_GLASSES {
        "Hydrate more"
    } else {
        "Hit your step goal"
    };

    format!(
        "You're {}% through today's evolution. {} to reach 100%.",
        (progress * 100.0).round() as i64,
        hint
    )
}

/// Compact step count for display: "842" below 1000, "4.2k" above
pub fn steps_display(steps: u64) -> String {
    if steps >= 1000 {
        format!("{:.1}k", steps as f64 / 1000.0)
    } else {
        steps.to_string()
    }
}

// ============================================================================
// Streak
// ============================================================================

/// Count of consecutive completed days ending at today or yesterday
///
/// A day without a completion yet (today) does not break an existing
/// streak, but a two-day-old gap ends it. Capped at [`STREAK_CAP_DAYS`].
pub fn current_streak(profile: &UserProfile, today: NaiveDate) -> u32 {
    if profile.completion_history.is_empty() {
        return 0;
    }

    let yesterday = match today.pred_opt() {
        Some(d) => d,
        None => return 0,
    };

    let anchor = if profile.completed_on(today) {
        today
    } else if profile.completed_on(yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    let mut cursor = anchor;
    while streak < STREAK_CAP_DAYS && profile.completed_on(cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(d) => d,
            None => break,
        };
    }
    streak
}

// ============================================================================
// Monthly calendar grid
// ============================================================================

/// One real day in the month grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    /// Day-of-month number, 1-based
    pub day: u32,
    pub date: NaiveDate,
    /// Whether a workout was completed on this day
    pub active: bool,
    pub is_today: bool,
}

/// Calendar grid for a month: leading `None` slots align day 1 to a
/// Sunday-start week, then one cell per real day.
///
/// Total: returns an empty grid for an invalid year/month.
pub fn month_grid(
    profile: &UserProfile,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Vec<Option<DayCell>> {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return Vec::new(),
    };

    let leading = first.weekday().num_days_from_sunday();
    let mut cells: Vec<Option<DayCell>> = (0..leading).map(|_| None).collect();

    let mut cursor = first;
    while cursor.month() == month {
        cells.push(Some(DayCell {
            day: cursor.day(),
            date: cursor,
            active: profile.completed_on(cursor),
            is_today: cursor == today,
        }));
        cursor = match cursor.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }

    cells
}

// ============================================================================
// Monthly calories
// ============================================================================

/// Sum of session calories within today's calendar month and year
pub fn monthly_calories(profile: &UserProfile, today: NaiveDate) -> f64 {
    profile
        .session_history
        .iter()
        .filter(|s| s.date.month() == today.month() && s.date.year() == today.year())
        .map(|s| s.calories)
        .sum()
}

// ============================================================================
// Rank
// ============================================================================

/// Gamification tier derived from lifetime completion count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Rank {
    pub fn label(&self) -> &'static str {
        match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
        }
    }
}

/// Rank for a completion count; thresholds are exclusive
pub fn rank_for(completions: usize) -> Rank {
    if completions > 20 {
        Rank::Platinum
    } else if completions > 10 {
        Rank::Gold
    } else if completions > 5 {
        Rank::Silver
    } else {
        Rank::Bronze
    }
}

/// Rank tier for a profile
pub fn rank(profile: &UserProfile) -> Rank {
    rank_for(profile.completion_history.len())
}
