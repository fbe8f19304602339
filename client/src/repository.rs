//! State repository
//!
//! Owns the three persisted aggregates (profile, workout log, habit
//! counters) as an in-memory snapshot loaded from the durable store.
//! All mutation funnels through the session commands; the repository
//! itself only loads, merges, and persists whole aggregates.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use aurafit_shared::{seed_workouts, DailyWorkout, HabitCounters, UserProfile};

use crate::clock::Clock;
use crate::error::StoreError;
use crate::store::{
    KeyValueStore, HABIT_COUNTERS_KEY, HABIT_LAST_UPDATE_KEY, PROFILE_KEY, WORKOUT_LOG_KEY,
};

/// In-memory snapshot of all persisted state, bound to a store and clock
pub struct StateRepository<S, C> {
    store: S,
    clock: C,
    profile: UserProfile,
    workouts: Vec<DailyWorkout>,
    counters: HabitCounters,
}

impl<S: KeyValueStore, C: Clock> StateRepository<S, C> {
    /// Load all aggregates from the store, falling back to built-in seed
    /// values when a key is absent or unparsable. A parse failure is never
    /// an error to the caller; the prior value is simply unrecoverable and
    /// defaults take its place.
    ///
    /// Habit counters go through the daily-reset rule: a missing or stale
    /// `habit_last_update_day` marker discards the stored counters and
    /// seeds a fresh day. The check runs only here: a process kept alive
    /// across midnight does not reset until its next load.
    pub fn load(store: S, clock: C) -> Self {
        let profile = read_aggregate(&store, PROFILE_KEY).unwrap_or_else(UserProfile::seed);
        let workouts = read_aggregate(&store, WORKOUT_LOG_KEY).unwrap_or_else(seed_workouts);

        let mut repo = Self {
            store,
            clock,
            profile,
            workouts,
            counters: HabitCounters::default(),
        };
        repo.load_counters_with_daily_reset();
        repo
    }

    /// Apply the 2-state daily-reset rule
    ///
    /// FRESH-TODAY (marker == today): stored counters load verbatim.
    /// STALE (marker absent or != today, including a future marker):
    /// counters reset to the fresh-day state and marker moves to today.
    /// Permanent logs (completion/session history) are untouched.
    fn load_counters_with_daily_reset(&mut self) {
        let today = self.clock.today();
        let marker: Option<NaiveDate> = read_aggregate(&self.store, HABIT_LAST_UPDATE_KEY);

        let stored: Option<HabitCounters> = read_aggregate(&self.store, HABIT_COUNTERS_KEY);
        match (marker, stored) {
            (Some(day), Some(counters)) if day == today => {
                debug!(%today, "Habit counters fresh for today");
                self.counters = counters;
            }
            (marker, _) => {
                debug!(?marker, %today, "Stale habit counters, resetting for new day");
                self.counters = HabitCounters::default();
                if let Err(e) = self.persist_counters_and_marker(today) {
                    warn!(error = %e, "Failed to persist daily reset");
                }
            }
        }
    }

    fn persist_counters_and_marker(&mut self, today: NaiveDate) -> Result<(), StoreError> {
        write_aggregate(&mut self.store, HABIT_COUNTERS_KEY, &self.counters)?;
        write_aggregate(&mut self.store, HABIT_LAST_UPDATE_KEY, &today)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn workouts(&self) -> &[DailyWorkout] {
        &self.workouts
    }

    pub fn counters(&self) -> &HabitCounters {
        &self.counters
    }

    /// The clock's current calendar day
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The clock's current instant
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Replace the profile snapshot and write the whole aggregate
    pub fn save_profile(&mut self, profile: UserProfile) -> Result<(), StoreError> {
        self.profile = profile;
        write_aggregate(&mut self.store, PROFILE_KEY, &self.profile)
    }

    /// Replace the workout-log snapshot and write the whole aggregate
    pub fn save_workout_log(&mut self, workouts: Vec<DailyWorkout>) -> Result<(), StoreError> {
        self.workouts = workouts;
        write_aggregate(&mut self.store, WORKOUT_LOG_KEY, &self.workouts)
    }

    /// Replace the habit-counter snapshot and write the whole aggregate,
    /// refreshing the daily marker
    pub fn save_habit_counters(&mut self, counters: HabitCounters) -> Result<(), StoreError> {
        self.counters = counters;
        let today = self.clock.today();
        self.persist_counters_and_marker(today)
    }
}

/// Read and parse one aggregate; absent or corrupt values become `None`
/// (logged, never surfaced)
fn read_aggregate<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Store read failed, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Stored JSON unparsable, using defaults");
            None
        }
    }
}

fn write_aggregate<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::store::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn clock(s: &str) -> FixedClock {
        FixedClock(date(s))
    }

    #[test]
    fn test_first_run_seeds_defaults() {
        let repo = StateRepository::load(MemoryStore::new(), clock("2025-06-15"));
        assert_eq!(repo.profile().name, "Alex Rivera");
        assert_eq!(repo.workouts().len(), 2);
        assert_eq!(repo.counters().water, 0);
        assert_eq!(repo.counters().sleep, 7.0);
    }

    #[test]
    fn test_corrupt_profile_falls_back_to_seed() {
        let mut store = MemoryStore::new();
        store.insert_raw(PROFILE_KEY, "{not json at all");
        store.insert_raw(WORKOUT_LOG_KEY, "also broken");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert_eq!(repo.profile().name, "Alex Rivera");
        assert_eq!(repo.workouts().len(), 2);
    }

    #[test]
    fn test_load_reads_stored_aggregates() {
        let mut store = MemoryStore::new();
        let mut profile = UserProfile::seed();
        profile.name = "Sam".to_string();
        store.insert_raw(PROFILE_KEY, &serde_json::to_string(&profile).unwrap());
        store.insert_raw(WORKOUT_LOG_KEY, "[]");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert_eq!(repo.profile().name, "Sam");
        assert!(repo.workouts().is_empty());
    }

    #[test]
    fn test_daily_reset_on_stale_marker() {
        let mut store = MemoryStore::new();
        let stale = HabitCounters {
            water: 6,
            sleep: 5.5,
            steps: 4200,
        };
        store.insert_raw(HABIT_COUNTERS_KEY, &serde_json::to_string(&stale).unwrap());
        store.insert_raw(HABIT_LAST_UPDATE_KEY, "\"2025-06-14\"");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert_eq!(repo.counters().water, 0);
        assert_eq!(repo.counters().steps, 0);
        assert_eq!(repo.counters().sleep, 7.0);

        // Marker moved to today and the reset counters were persisted
        let marker: NaiveDate =
            read_aggregate(&repo.store, HABIT_LAST_UPDATE_KEY).unwrap();
        assert_eq!(marker, date("2025-06-15"));
        let stored: HabitCounters = read_aggregate(&repo.store, HABIT_COUNTERS_KEY).unwrap();
        assert_eq!(stored, HabitCounters::default());
    }

    #[test]
    fn test_counters_kept_when_marker_is_today() {
        let mut store = MemoryStore::new();
        let todays = HabitCounters {
            water: 3,
            sleep: 8.0,
            steps: 1500,
        };
        store.insert_raw(HABIT_COUNTERS_KEY, &serde_json::to_string(&todays).unwrap());
        store.insert_raw(HABIT_LAST_UPDATE_KEY, "\"2025-06-15\"");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert_eq!(repo.counters(), &todays);
    }

    #[test]
    fn test_future_marker_counts_as_stale() {
        // Clock anomaly: marker ahead of today still triggers a reset
        let mut store = MemoryStore::new();
        let counters = HabitCounters {
            water: 6,
            sleep: 7.0,
            steps: 900,
        };
        store.insert_raw(
            HABIT_COUNTERS_KEY,
            &serde_json::to_string(&counters).unwrap(),
        );
        store.insert_raw(HABIT_LAST_UPDATE_KEY, "\"2025-06-20\"");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert_eq!(repo.counters().water, 0);
        assert_eq!(repo.counters().steps, 0);
    }

    #[test]
    fn test_reset_does_not_touch_permanent_logs() {
        let mut store = MemoryStore::new();
        let mut profile = UserProfile::seed();
        profile.mark_completed(date("2025-06-10"));
        store.insert_raw(PROFILE_KEY, &serde_json::to_string(&profile).unwrap());
        store.insert_raw(HABIT_LAST_UPDATE_KEY, "\"2025-06-14\"");

        let repo = StateRepository::load(store, clock("2025-06-15"));
        assert!(repo.profile().completed_on(date("2025-06-10")));
    }

    #[test]
    fn test_save_profile_writes_whole_aggregate() {
        let mut repo = StateRepository::load(MemoryStore::new(), clock("2025-06-15"));
        let mut profile = repo.profile().clone();
        profile.name = "Jordan".to_string();
        repo.save_profile(profile).unwrap();

        let stored: UserProfile = read_aggregate(&repo.store, PROFILE_KEY).unwrap();
        assert_eq!(stored.name, "Jordan");
        // Untouched fields came along with the write
        assert_eq!(stored.age, 28);
    }

    #[test]
    fn test_save_counters_refreshes_marker() {
        let mut repo = StateRepository::load(MemoryStore::new(), clock("2025-06-15"));
        let mut counters = repo.counters().clone();
        counters.adjust_water(2);
        repo.save_habit_counters(counters).unwrap();

        let marker: NaiveDate = read_aggregate(&repo.store, HABIT_LAST_UPDATE_KEY).unwrap();
        assert_eq!(marker, date("2025-06-15"));
        let stored: HabitCounters = read_aggregate(&repo.store, HABIT_COUNTERS_KEY).unwrap();
        assert_eq!(stored.water, 2);
    }
}
