//! Session commands
//!
//! Every state mutation funnels through here: merge onto the current
//! repository snapshot, persist the whole aggregate, return a
//! well-defined outcome. Invalid input is a silent no-op that preserves
//! the prior state; nothing in this module panics or propagates an
//! error past its boundary.

use tracing::{debug, warn};
use uuid::Uuid;

use aurafit_shared::validation::{
    validate_age, validate_height_cm, validate_name, validate_weight_kg,
};
use aurafit_shared::{
    CompletedSession, DailyWorkout, DietPlan, ExperienceLevel, FitnessGoal, Gender, UserProfile,
    WorkoutEnvironment,
};

use crate::ai::{GeneratedDietPlan, GeneratedWorkout};
use crate::clock::Clock;
use crate::repository::StateRepository;
use crate::store::KeyValueStore;

/// Screen the presentation layer should show after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Workouts,
    Coach,
    Progress,
    Settings,
}

/// Presentation-layer signal emitted by a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationSignal {
    /// The selected-workout detail view should close
    pub clear_selection: bool,
    pub navigate_to: Screen,
}

/// Outcome of [`SessionCommands::complete_workout`]
#[derive(Debug, Clone, PartialEq)]
pub enum CompleteOutcome {
    /// Unknown id: nothing changed
    NotFound,
    /// Entry was already completed: no session or history appended
    AlreadyCompleted { signal: PresentationSignal },
    /// Entry flipped to completed; exactly one session was recorded
    Completed {
        session: CompletedSession,
        signal: PresentationSignal,
    },
}

/// Partial profile edit; absent fields keep their prior value
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub gender: Option<Gender>,
    pub goal: Option<FitnessGoal>,
    pub workout_type: Option<WorkoutEnvironment>,
    pub experience_level: Option<ExperienceLevel>,
}

/// One habit-counter adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HabitAdjustment {
    /// Water delta in glasses, clamped into the valid range
    Water { delta: i32 },
    /// Step increment; saturating, never decreases
    Steps { delta: u64 },
    /// Sleep hours set directly
    Sleep { hours: f64 },
}

/// Business-logic entry points over the state repository
pub struct SessionCommands;

impl SessionCommands {
    /// Mark a workout completed and credit today's session
    ///
    /// Idempotent per id: re-invoking on an already-completed entry
    /// appends nothing. Persists the workout log and the profile; the two
    /// writes are not transactional, which is acceptable because both
    /// happen before control returns.
    pub fn complete_workout<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        id: &str,
    ) -> CompleteOutcome {
        let today = repo.today();
        let signal = PresentationSignal {
            clear_selection: true,
            navigate_to: Screen::Progress,
        };

        let Some(entry) = repo.workouts().iter().find(|w| w.id == id) else {
            debug!(id, "Complete requested for unknown workout");
            return CompleteOutcome::NotFound;
        };
        if entry.completed {
            debug!(id, "Workout already completed, ignoring");
            return CompleteOutcome::AlreadyCompleted { signal };
        }
        let calories = entry.calories;

        let workouts = repo
            .workouts()
            .iter()
            .cloned()
            .map(|mut w| {
                if w.id == id {
                    w.completed = true;
                }
                w
            })
            .collect();
        persist_log(repo, workouts);

        let session = CompletedSession {
            date: today,
            calories,
            workout_id: id.to_string(),
        };
        let mut profile = repo.profile().clone();
        profile.mark_completed(today);
        profile.session_history.push(session.clone());
        persist_profile(repo, profile);

        debug!(id, %today, calories, "Workout completed");
        CompleteOutcome::Completed { session, signal }
    }

    /// Prepend new entries to the log (most-recent-first ordering)
    ///
    /// Ids are caller-assigned; entries whose id already exists in the
    /// log, or repeats within the batch, are skipped to keep ids unique.
    /// Returns how many entries were admitted.
    pub fn add_workouts<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        entries: Vec<DailyWorkout>,
    ) -> usize {
        let mut admitted: Vec<DailyWorkout> = Vec::with_capacity(entries.len());
        for entry in entries {
            let duplicate = repo.workouts().iter().any(|w| w.id == entry.id)
                || admitted.iter().any(|w| w.id == entry.id);
            if duplicate {
                warn!(id = %entry.id, "Skipping workout with duplicate id");
                continue;
            }
            admitted.push(entry);
        }
        if admitted.is_empty() {
            return 0;
        }

        let count = admitted.len();
        let mut next = admitted;
        next.extend(repo.workouts().iter().cloned());
        persist_log(repo, next);
        count
    }

    /// Assign fresh ids to AI-generated workouts and admit them to the log
    ///
    /// Returns the admitted entries' ids in log order.
    pub fn save_generated_workouts<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        generated: Vec<GeneratedWorkout>,
    ) -> Vec<String> {
        let entries: Vec<DailyWorkout> = generated
            .into_iter()
            .map(|g| g.into_workout(Uuid::new_v4().to_string()))
            .collect();
        let ids: Vec<String> = entries.iter().map(|w| w.id.clone()).collect();
        Self::add_workouts(repo, entries);
        ids
    }

    /// Remove a workout by id; unknown id leaves the log unchanged.
    /// Completion history is a permanent record and is never touched here.
    pub fn delete_workout<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        id: &str,
    ) -> bool {
        if !repo.workouts().iter().any(|w| w.id == id) {
            debug!(id, "Delete requested for unknown workout");
            return false;
        }
        let next = repo
            .workouts()
            .iter()
            .filter(|w| w.id != id)
            .cloned()
            .collect();
        persist_log(repo, next);
        true
    }

    /// Shallow-merge profile fields onto the snapshot
    ///
    /// Each supplied field is validated independently; a field that fails
    /// validation is dropped (prior value preserved) while the rest still
    /// apply. Returns how many fields were applied.
    pub fn update_profile<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        update: ProfileUpdate,
    ) -> usize {
        let mut profile = repo.profile().clone();
        let mut applied = 0;

        if let Some(name) = update.name {
            match validate_name(&name) {
                Ok(()) => {
                    profile.name = name.trim().to_string();
                    applied += 1;
                }
                Err(reason) => debug!(reason, "Rejected name update"),
            }
        }
        if let Some(age) = update.age {
            match validate_age(age) {
                Ok(()) => {
                    profile.age = age;
                    applied += 1;
                }
                Err(reason) => debug!(reason, "Rejected age update"),
            }
        }
        if let Some(height) = update.height_cm {
            match validate_height_cm(height) {
                Ok(()) => {
                    profile.height_cm = height;
                    applied += 1;
                }
                Err(reason) => debug!(reason, "Rejected height update"),
            }
        }
        if let Some(weight) = update.weight_kg {
            match validate_weight_kg(weight) {
                Ok(()) => {
                    profile.weight_kg = weight;
                    applied += 1;
                }
                Err(reason) => debug!(reason, "Rejected weight update"),
            }
        }
        if let Some(gender) = update.gender {
            profile.gender = gender;
            applied += 1;
        }
        if let Some(goal) = update.goal {
            profile.goal = goal;
            applied += 1;
        }
        if let Some(workout_type) = update.workout_type {
            profile.workout_type = workout_type;
            applied += 1;
        }
        if let Some(level) = update.experience_level {
            profile.experience_level = level;
            applied += 1;
        }

        if applied > 0 {
            persist_profile(repo, profile);
        }
        applied
    }

    /// Apply one habit adjustment and persist the counters
    pub fn adjust_habit<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        adjustment: HabitAdjustment,
    ) {
        let mut counters = repo.counters().clone();
        match adjustment {
            HabitAdjustment::Water { delta } => counters.adjust_water(delta),
            HabitAdjustment::Steps { delta } => counters.add_steps(delta),
            HabitAdjustment::Sleep { hours } => counters.set_sleep(hours),
        }
        if let Err(e) = repo.save_habit_counters(counters) {
            warn!(error = %e, "Failed to persist habit counters");
        }
    }

    /// Admit an AI-generated diet plan to the profile's saved list
    ///
    /// The command layer is the id authority: a fresh id and generation
    /// timestamp are assigned on receipt. Returns the stored plan.
    pub fn save_diet_plan<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        generated: GeneratedDietPlan,
    ) -> DietPlan {
        let plan = generated.into_plan(Uuid::new_v4().to_string(), repo.now());

        let mut profile = repo.profile().clone();
        profile.saved_diets.insert(0, plan.clone());
        persist_profile(repo, profile);
        plan
    }

    /// Remove a saved diet plan by id; unknown id is a no-op
    pub fn delete_diet_plan<S: KeyValueStore, C: Clock>(
        repo: &mut StateRepository<S, C>,
        id: &str,
    ) -> bool {
        if !repo.profile().saved_diets.iter().any(|d| d.id == id) {
            return false;
        }
        let mut profile = repo.profile().clone();
        profile.saved_diets.retain(|d| d.id != id);
        persist_profile(repo, profile);
        true
    }
}

/// Persist a workout log, keeping the in-memory snapshot authoritative
/// even when the store write fails (last write wins on the next save)
fn persist_log<S: KeyValueStore, C: Clock>(
    repo: &mut StateRepository<S, C>,
    workouts: Vec<DailyWorkout>,
) {
    if let Err(e) = repo.save_workout_log(workouts) {
        warn!(error = %e, "Failed to persist workout log");
    }
}

fn persist_profile<S: KeyValueStore, C: Clock>(
    repo: &mut StateRepository<S, C>,
    profile: UserProfile,
) {
    if let Err(e) = repo.save_profile(profile) {
        warn!(error = %e, "Failed to persist profile");
    }
}
