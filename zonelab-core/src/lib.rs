//! ZoneLab Core — deterministic bar-by-bar zone detection and single-position engine.
//!
//! This crate contains:
//! - Domain types (bars, positions, closed positions, entry zones, boxes)
//! - Price-level arithmetic (floor-anchored ladder, psychological multiples)
//! - Zone classifiers (level crossing, psychological box)
//! - Two engines sharing one step shape: level ladder and psychological box
//! - Append-only event log and per-bar history
//! - Run fingerprints and a seeded synthetic bar source
//!
//! ```no_run
//! use zonelab_core::{config::EngineConfig, data::random_walk, engine::run};
//!
//! let bars = random_walk(500, 42, 2000.0);
//! let output = run(&bars, &EngineConfig::default())?;
//! println!("{} trades, digest {}", output.positions_closed.len(), output.digest());
//! # Ok::<(), zonelab_core::error::EngineError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod levels;

pub use config::{BoxConfig, ConfigError, EngineConfig, LadderConfig};
pub use engine::{run, RunOutput, RunSummary, Session};
pub use error::EngineError;
