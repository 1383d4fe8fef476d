//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! # FixedUpdate phases (`SimulationSet`)
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Command intake and the paced year runner. These decide
//!   whether a year is due this tick and with which configuration.
//! * **Simulation** – The year advance itself.
//! * **PostSim** – Aggregation and reporting: market stats and the state
//!   hash. These only *read* the market and never mutate it.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Command queue and year scheduling.
    PreSim,
    /// Advancing the market by a year.
    Simulation,
    /// Stats and hashing.
    PostSim,
}
