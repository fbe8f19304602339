//! AuraFit client library
//!
//! This library exposes the client modules for use in tests and the
//! binary: the persistent store, state repository, session commands,
//! AI coach client, and the background step simulator.

pub mod ai;
pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod repository;
pub mod simulator;
pub mod store;
