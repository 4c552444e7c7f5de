//! Headless Blob Survival simulation.
//!
//! Blobs wander a rectangular world, burning mass to move and to sense,
//! and regain it by eating food. Each blob's speed multiplier and sensing
//! radius are steered every tick by a fuzzy [`blob_driver::Controller`].
//!
//! # Modules
//!
//! - [`config`] -- `blob-config.yaml` structures and validation
//! - [`world`] -- World bounds, food placement, sighting, spawning
//! - [`blob`] -- Blob physiology and movement
//! - [`runner`] -- The tick loop and run report
//! - [`error`] -- Error types ([`EngineError`])

pub mod blob;
pub mod config;
pub mod error;
pub mod runner;
pub mod world;

pub use config::SimConfig;
pub use error::EngineError;
pub use runner::{EndReason, LogObserver, RunReport, Simulation, TickObserver, TickSummary};
