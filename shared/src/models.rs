//! Data models for the AuraFit client
//!
//! Serialized field names match the JSON the store has always held
//! (camelCase, enums in snake_case), so existing on-disk state keeps
//! loading across releases.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Water glasses can never exceed this in a single day
pub const WATER_MAX_GLASSES: i32 = 15;

/// Sleep hours are capped at a full day
pub const SLEEP_MAX_HOURS: f64 = 24.0;

/// Sleep hours seeded on a fresh day
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;

/// Gender for profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Training goal driving plan generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    FatLoss,
    MuscleGain,
    Maintain,
}

impl FitnessGoal {
    /// Human-readable description used in AI prompts
    pub fn description(&self) -> &'static str {
        match self {
            FitnessGoal::FatLoss => "fat loss",
            FitnessGoal::MuscleGain => "muscle gain",
            FitnessGoal::Maintain => "maintenance",
        }
    }
}

/// Preferred workout environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutEnvironment {
    Home,
    Gym,
}

impl WorkoutEnvironment {
    pub fn description(&self) -> &'static str {
        match self {
            WorkoutEnvironment::Home => "home",
            WorkoutEnvironment::Gym => "gym",
        }
    }
}

/// Training experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn description(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

/// One finished workout session, recorded at completion time
///
/// Immutable once appended. `workout_id` is a back-reference to the log
/// entry that produced it, not ownership: deleting the entry later keeps
/// the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub date: NaiveDate,
    pub calories: f64,
    pub workout_id: String,
}

/// A single exercise inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    /// Rep target: may be a count ("12") or time-based ("45s")
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A plan unit in the workout log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWorkout {
    /// Unique within the log, assigned by whoever admits the entry
    pub id: String,
    pub title: String,
    /// Display string ("45 min")
    pub duration: String,
    /// Calorie target credited on completion
    pub calories: f64,
    pub exercises: Vec<Exercise>,
    /// Monotonic: flips false -> true exactly once, never reverts
    pub completed: bool,
}

/// Meal slot within a diet plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub dish: String,
    pub recipe: Recipe,
}

/// Macro-nutrient breakdown in grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// AI-generated diet plan, stored verbatim once saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: String,
    pub title: String,
    pub meals: Vec<Meal>,
    pub calories: f64,
    pub macros: Macros,
    #[serde(rename = "dateGenerated")]
    pub generated_at: DateTime<Utc>,
}

/// User identity and goal configuration
///
/// `completion_history` is a duplicate-free list of calendar days on which
/// at least one workout was completed; membership is its only semantic.
/// `session_history` is append-only in completion order. Both fields were
/// added after the first release, so they default to empty when absent in
/// stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    #[serde(rename = "height")]
    pub height_cm: f64,
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub gender: Gender,
    pub goal: FitnessGoal,
    pub workout_type: WorkoutEnvironment,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub completion_history: Vec<NaiveDate>,
    #[serde(default)]
    pub session_history: Vec<CompletedSession>,
    #[serde(default)]
    pub saved_diets: Vec<DietPlan>,
}

impl UserProfile {
    /// Whether a workout was completed on the given day
    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completion_history.contains(&date)
    }

    /// Add a day to the completion history, keeping it duplicate-free.
    /// Returns true when the day was newly inserted.
    pub fn mark_completed(&mut self, date: NaiveDate) -> bool {
        if self.completed_on(date) {
            return false;
        }
        self.completion_history.push(date);
        true
    }

    /// Built-in first-run profile
    pub fn seed() -> Self {
        Self {
            name: "Alex Rivera".to_string(),
            age: 28,
            height_cm: 175.0,
            weight_kg: 72.0,
            gender: Gender::Male,
            goal: FitnessGoal::MuscleGain,
            workout_type: WorkoutEnvironment::Gym,
            experience_level: ExperienceLevel::Intermediate,
            completion_history: Vec::new(),
            session_history: Vec::new(),
            saved_diets: Vec::new(),
        }
    }
}

/// Per-day habit counters
///
/// Day-scoped: the repository discards water/steps and reseeds sleep on
/// the first load of a new calendar day. `Default` is the fresh-day state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCounters {
    /// Glasses of water, clamped to [0, WATER_MAX_GLASSES]
    pub water: i32,
    /// Hours slept
    pub sleep: f64,
    /// Step count, only ever increases within a day
    pub steps: u64,
}

impl Default for HabitCounters {
    fn default() -> Self {
        Self {
            water: 0,
            sleep: DEFAULT_SLEEP_HOURS,
            steps: 0,
        }
    }
}

impl HabitCounters {
    /// Adjust water by a delta, clamped into [0, WATER_MAX_GLASSES]
    pub fn adjust_water(&mut self, delta: i32) {
        self.water = self.water.saturating_add(delta).clamp(0, WATER_MAX_GLASSES);
    }

    /// Increase steps, saturating on overflow
    pub fn add_steps(&mut self, delta: u64) {
        self.steps = self.steps.saturating_add(delta);
    }

    /// Set sleep hours directly, clamped into [0, SLEEP_MAX_HOURS].
    /// Non-finite input is ignored.
    pub fn set_sleep(&mut self, hours: f64) {
        if hours.is_finite() {
            self.sleep = hours.clamp(0.0, SLEEP_MAX_HOURS);
        }
    }
}

/// Built-in workout log seeded on first run
pub fn seed_workouts() -> Vec<DailyWorkout> {
    vec![
        DailyWorkout {
            id: "1".to_string(),
            title: "Power Push Day".to_string(),
            duration: "45 min".to_string(),
            calories: 320.0,
            completed: false,
            exercises: vec![
                Exercise {
                    name: "Bench Press".to_string(),
                    sets: 4,
                    reps: "8-10".to_string(),
                    weight: Some(60.0),
                    notes: None,
                },
                Exercise {
                    name: "Overhead Press".to_string(),
                    sets: 3,
                    reps: "10-12".to_string(),
                    weight: Some(40.0),
                    notes: None,
                },
                Exercise {
                    name: "Lateral Raises".to_string(),
                    sets: 3,
                    reps: "15".to_string(),
                    weight: Some(8.0),
                    notes: None,
                },
                Exercise {
                    name: "Tricep Pushdowns".to_string(),
                    sets: 3,
                    reps: "12".to_string(),
                    weight: Some(20.0),
                    notes: None,
                },
            ],
        },
        DailyWorkout {
            id: "2".to_string(),
            title: "HIIT Core Flow".to_string(),
            duration: "25 min".to_string(),
            calories: 210.0,
            completed: true,
            exercises: vec![
                Exercise {
                    name: "Mountain Climbers".to_string(),
                    sets: 3,
                    reps: "45s".to_string(),
                    weight: None,
                    notes: None,
                },
                Exercise {
                    name: "Plank Holds".to_string(),
                    sets: 3,
                    reps: "60s".to_string(),
                    weight: None,
                    notes: None,
                },
                Exercise {
                    name: "Russian Twists".to_string(),
                    sets: 3,
                    reps: "20".to_string(),
                    weight: None,
                    notes: None,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_profile_serde_field_names() {
        let profile = UserProfile::seed();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Alex Rivera");
        assert_eq!(json["height"], 175.0);
        assert_eq!(json["weight"], 72.0);
        assert_eq!(json["gender"], "male");
        assert_eq!(json["goal"], "muscle_gain");
        assert_eq!(json["workoutType"], "gym");
        assert_eq!(json["experienceLevel"], "intermediate");
        assert!(json["completionHistory"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_profile_loads_without_optional_histories() {
        // Stored JSON from before sessionHistory/savedDiets existed
        let json = r#"{
            "name": "Sam",
            "age": 30,
            "height": 180,
            "weight": 80,
            "gender": "other",
            "goal": "fat_loss",
            "workoutType": "home",
            "experienceLevel": "beginner",
            "completionHistory": ["2025-06-01"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.completion_history, vec![date("2025-06-01")]);
        assert!(profile.session_history.is_empty());
        assert!(profile.saved_diets.is_empty());
    }

    #[test]
    fn test_mark_completed_is_duplicate_free() {
        let mut profile = UserProfile::seed();
        assert!(profile.mark_completed(date("2025-06-01")));
        assert!(!profile.mark_completed(date("2025-06-01")));
        assert_eq!(profile.completion_history.len(), 1);
    }

    #[test]
    fn test_water_clamps_at_both_ends() {
        let mut counters = HabitCounters {
            water: WATER_MAX_GLASSES,
            ..HabitCounters::default()
        };
        counters.adjust_water(1);
        assert_eq!(counters.water, WATER_MAX_GLASSES);

        counters.water = 0;
        counters.adjust_water(-1);
        assert_eq!(counters.water, 0);
    }

    #[test]
    fn test_sleep_ignores_non_finite() {
        let mut counters = HabitCounters::default();
        counters.set_sleep(f64::NAN);
        assert_eq!(counters.sleep, DEFAULT_SLEEP_HOURS);
        counters.set_sleep(30.0);
        assert_eq!(counters.sleep, SLEEP_MAX_HOURS);
        counters.set_sleep(6.5);
        assert_eq!(counters.sleep, 6.5);
    }

    #[test]
    fn test_meal_type_serializes_title_case() {
        let json = serde_json::to_string(&MealType::Breakfast).unwrap();
        assert_eq!(json, "\"Breakfast\"");
    }

    #[test]
    fn test_seed_workouts_have_unique_ids() {
        let log = seed_workouts();
        assert_eq!(log.len(), 2);
        assert_ne!(log[0].id, log[1].id);
        assert!(!log[0].completed);
        assert!(log[1].completed);
    }

    #[test]
    fn test_workout_round_trips_through_json() {
        let log = seed_workouts();
        let json = serde_json::to_string(&log).unwrap();
        let back: Vec<DailyWorkout> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
