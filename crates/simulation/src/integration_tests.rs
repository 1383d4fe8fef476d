//! Integration tests for the housing market using the `TestMarket` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and drive
//! the market through its command queue, the same path the CLI and the agent
//! protocol use.
