//! AuraFit client binary
//!
//! A personal fitness companion: daily habit tracking, a workout log
//! with streaks and ranks, and an AI coach for advice and plan
//! generation.
//!
//! ## Architecture
//!
//! The binary is a thin dispatch layer:
//! - Store: durable key-value persistence (one JSON file per aggregate)
//! - Repository: in-memory state snapshot with daily-reset on load
//! - Commands: all state mutation
//! - Metrics: pure derived values (progress, streaks, calendar, rank)
//! - AI: Gemini-backed coach client

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Datelike;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aurafit_client::ai::{CoachClient, DietRequest};
use aurafit_client::clock::SystemClock;
use aurafit_client::commands::{CompleteOutcome, HabitAdjustment, SessionCommands};
use aurafit_client::config::AppConfig;
use aurafit_client::repository::StateRepository;
use aurafit_client::simulator::spawn_step_simulator;
use aurafit_client::store::FileStore;
use aurafit_shared::metrics::{
    current_streak, daily_insight, daily_progress, month_grid, monthly_calories, rank,
    steps_display,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting AuraFit");

    let store = match &config.store.data_dir {
        Some(dir) => FileStore::open(dir)?,
        None => FileStore::open_default()?,
    };
    let mut repo = StateRepository::load(store, SystemClock);

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("status");

    match command {
        "status" => print_status(&repo),
        "workouts" => print_workouts(&repo),
        "calendar" => print_calendar(&repo),
        "water" => {
            let delta: i32 = parse_arg(&args, 1, "water <delta>")?;
            SessionCommands::adjust_habit(&mut repo, HabitAdjustment::Water { delta });
            println!("Water: {} glasses", repo.counters().water);
        }
        "steps" => {
            let delta: u64 = parse_arg(&args, 1, "steps <count>")?;
            SessionCommands::adjust_habit(&mut repo, HabitAdjustment::Steps { delta });
            println!("Steps: {}", steps_display(repo.counters().steps));
        }
        "sleep" => {
            let hours: f64 = parse_arg(&args, 1, "sleep <hours>")?;
            SessionCommands::adjust_habit(&mut repo, HabitAdjustment::Sleep { hours });
            println!("Sleep: {:.1}h", repo.counters().sleep);
        }
        "complete" => {
            let id = args.get(1).map(String::as_str).unwrap_or_default();
            match SessionCommands::complete_workout(&mut repo, id) {
                CompleteOutcome::Completed { session, .. } => {
                    println!("Completed! {} kcal credited.", session.calories);
                    println!("Current streak: {} days", current_streak(repo.profile(), repo.today()));
                }
                CompleteOutcome::AlreadyCompleted { .. } => {
                    println!("Already completed today.");
                }
                CompleteOutcome::NotFound => println!("No workout with id '{id}'."),
            }
        }
        "delete" => {
            let id = args.get(1).map(String::as_str).unwrap_or_default();
            if SessionCommands::delete_workout(&mut repo, id) {
                println!("Deleted workout '{id}'.");
            } else {
                println!("No workout with id '{id}'.");
            }
        }
        "chat" => {
            let message = args[1..].join(" ");
            let coach = CoachClient::from_config(&config.ai)?;
            let reply = coach.chat_advice_or_fallback(&message, repo.profile()).await;
            println!("{reply}");
        }
        "plan" => {
            let request = args[1..].join(" ");
            let coach = CoachClient::from_config(&config.ai)?;
            let generated = coach.generate_workout_plan(&request, repo.profile()).await?;
            let ids = SessionCommands::save_generated_workouts(&mut repo, generated);
            println!("Added {} workout(s) to your log.", ids.len());
            print_workouts(&repo);
        }
        "diet" => {
            let goal_weight: f64 = parse_arg(&args, 1, "diet <goal-weight-kg> [veg] [ingredients...]")?;
            let vegetarian = args.get(2).map(String::as_str) == Some("veg");
            let ingredients_from = if vegetarian { 3 } else { 2 };
            let request = DietRequest {
                current_weight_kg: repo.profile().weight_kg,
                goal_weight_kg: goal_weight,
                goal_type: if goal_weight < repo.profile().weight_kg {
                    "Fat Cut".to_string()
                } else {
                    "Muscle Gain".to_string()
                },
                vegetarian,
                available_ingredients: args.get(ingredients_from..).unwrap_or_default().join(", "),
            };
            let coach = CoachClient::from_config(&config.ai)?;
            let generated = coach.generate_diet_plan(repo.profile(), &request).await?;
            let plan = SessionCommands::save_diet_plan(&mut repo, generated);
            print_diet_plan(&plan);
        }
        "simulate" => {
            run_simulator(repo, &config).await?;
        }
        other => {
            warn!(command = other, "Unknown command");
            print_usage();
        }
    }

    Ok(())
}

/// Keep the process alive with the step simulator running until Ctrl+C
async fn run_simulator(repo: StateRepository<FileStore, SystemClock>, config: &AppConfig) -> Result<()> {
    if !config.simulator.enabled {
        println!("Simulator is disabled in configuration.");
        return Ok(());
    }
    let shared = Arc::new(Mutex::new(repo));
    let handle = spawn_step_simulator(
        Arc::clone(&shared),
        Duration::from_secs(config.simulator.tick_secs),
    );
    println!("Simulating steps every {}s. Ctrl+C to stop.", config.simulator.tick_secs);

    shutdown_signal().await;
    handle.abort();

    let repo = shared.lock().await;
    println!("Final count: {} steps", steps_display(repo.counters().steps));
    Ok(())
}

fn print_status(repo: &StateRepository<FileStore, SystemClock>) {
    let profile = repo.profile();
    let counters = repo.counters();
    let today = repo.today();

    let progress = daily_progress(profile, counters, today);
    println!("{} ({})", profile.name, rank(profile).label());
    println!("Daily progress: {}%", (progress * 100.0).round());
    println!(
        "Water {}/8 · Steps {} · Sleep {:.1}h",
        counters.water,
        steps_display(counters.steps),
        counters.sleep
    );
    println!("Streak: {} days", current_streak(profile, today));
    println!(
        "Calories this month: {:.0} kcal",
        monthly_calories(profile, today)
    );
    println!();
    println!("{}", daily_insight(profile, counters, today));
}

fn print_workouts(repo: &StateRepository<FileStore, SystemClock>) {
    for workout in repo.workouts() {
        let mark = if workout.completed { "x" } else { " " };
        println!(
            "[{mark}] {}  {} ({}, {:.0} kcal)",
            workout.id, workout.title, workout.duration, workout.calories
        );
    }
}

fn print_calendar(repo: &StateRepository<FileStore, SystemClock>) {
    let today = repo.today();
    println!("{} {}", today.format("%B"), today.year());
    println!("Su Mo Tu We Th Fr Sa");
    let grid = month_grid(repo.profile(), today.year(), today.month(), today);
    for (i, cell) in grid.iter().enumerate() {
        match cell {
            Some(c) if c.active => print!(" #"),
            Some(c) if c.is_today => print!(" o"),
            Some(c) => print!("{:2}", c.day),
            None => print!("  "),
        }
        if i % 7 == 6 {
            println!();
        } else {
            print!(" ");
        }
    }
    println!();
}

fn print_diet_plan(plan: &aurafit_shared::DietPlan) {
    println!("{} ({:.0} kcal)", plan.title, plan.calories);
    println!(
        "Protein {:.0}g · Carbs {:.0}g · Fats {:.0}g",
        plan.macros.protein, plan.macros.carbs, plan.macros.fats
    );
    for meal in &plan.meals {
        println!("  {:?}: {}", meal.meal_type, meal.dish);
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, usage: &str) -> Result<T> {
    args.get(index)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("usage: aurafit {usage}"))
}

fn print_usage() {
    println!("usage: aurafit [status|workouts|calendar|water|steps|sleep|complete|delete|chat|plan|diet|simulate]");
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "aurafit_client=info,aurafit=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
