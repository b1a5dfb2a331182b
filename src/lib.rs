//! cropwatch library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is a headless driver. Renderers and input
//! layers embed these plugins, send the command events from `shared`, and
//! read `snapshot::LatestSnapshot`.

pub mod shared;
pub mod input;
pub mod data;
pub mod clock;
pub mod farming;
pub mod economy;
pub mod animals;
pub mod agents;
pub mod snapshot;
