//! AuraFit Shared Library
//!
//! Shared data models, pure derived-metrics functions, and validation
//! helpers used by the client crate and its tests.

pub mod metrics;
pub mod models;
pub mod validation;

// Re-export commonly used items
pub use metrics::{
    current_streak, daily_insight, daily_progress, month_grid, monthly_calories, rank, rank_for,
    DayCell, Rank, STEPS_TARGET, STREAK_CAP_DAYS, WATER_TARGET_GLASSES,
};
pub use models::{
    seed_workouts, CompletedSession, DailyWorkout, DietPlan, Exercise, ExperienceLevel,
    FitnessGoal, Gender, HabitCounters, Macros, Meal, MealType, Recipe, UserProfile,
    WorkoutEnvironment, DEFAULT_SLEEP_HOURS, SLEEP_MAX_HOURS, WATER_MAX_GLASSES,
};
