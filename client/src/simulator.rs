//! Background step simulator
//!
//! Stands in for a pedometer: on each tick there is a 20% chance the
//! step counter advances by 1 to 3 steps. Increments go through the
//! habit-counter path so they persist like any other adjustment.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::repository::StateRepository;
use crate::store::KeyValueStore;

/// Probability of a step burst per tick
const STEP_CHANCE: f64 = 0.2;

/// Roll for one tick: `Some(1..=3)` steps with [`STEP_CHANCE`] probability
pub fn simulated_increment(rng: &mut impl Rng) -> Option<u64> {
    if rng.gen_bool(STEP_CHANCE) {
        Some(rng.gen_range(1..=3))
    } else {
        None
    }
}

/// Spawn the simulator loop on the runtime
///
/// The task holds the repository lock only for the duration of one
/// increment and runs until the handle is aborted or dropped by the
/// caller.
pub fn spawn_step_simulator<S, C>(
    repo: Arc<Mutex<StateRepository<S, C>>>,
    tick: Duration,
) -> JoinHandle<()>
where
    S: KeyValueStore + Send + 'static,
    C: Clock + Send + 'static,
{
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(tick);
        // First tick fires immediately; skip it so the counter starts flat
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Some(steps) = simulated_increment(&mut rng) {
                let mut repo = repo.lock().await;
                let mut counters = repo.counters().clone();
                counters.add_steps(steps);
                debug!(steps, total = counters.steps, "Simulated step burst");
                if let Err(e) = repo.save_habit_counters(counters) {
                    warn!(error = %e, "Failed to persist simulated steps");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_increment_is_none_or_small_burst(seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..50 {
                if let Some(steps) = simulated_increment(&mut rng) {
                    prop_assert!((1..=3).contains(&steps));
                }
            }
        }
    }

    #[test]
    fn test_increment_rate_near_one_in_five() {
        let mut rng = StdRng::seed_from_u64(42);
        let hits = (0..10_000)
            .filter(|_| simulated_increment(&mut rng).is_some())
            .count();
        // 20% chance with generous tolerance
        assert!((1500..=2500).contains(&hits), "hit rate was {hits}/10000");
    }
}
