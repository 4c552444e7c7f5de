//! The tick loop.
//!
//! [`Simulation`] owns the world and the blobs, each blob with its own
//! [`Controller`] over one shared engine. A tick moves every blob, lets
//! every surviving blob eat the food under its hitbox, then maybe spawns
//! one food item. The run stops when every blob has starved or after
//! `world.max_ticks` ticks.

use std::f64::consts::TAU;
use std::sync::Arc;

use blob_driver::Controller;
use serde::Serialize;
use tracing::{info, trace, warn};

use crate::blob::{Blob, BlobReport, Step};
use crate::config::SimConfig;
use crate::error::EngineError;
use crate::world::World;

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every blob starved.
    Extinction,
    /// `world.max_ticks` ticks ran.
    MaxTicksReached,
}

/// State after one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick that just ran, starting at 1.
    pub tick: u64,
    /// Blobs still alive.
    pub blobs_alive: u32,
    /// Food on the map.
    pub food_on_map: usize,
    /// Food eaten this tick.
    pub food_eaten: u32,
    /// Whether a food item spawned this tick.
    pub food_spawned: bool,
    /// Mean mass of the living blobs, if any.
    pub mean_mass: Option<f64>,
}

/// Callback invoked after each tick completes.
pub trait TickObserver {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, blobs: &[Blob]);
}

/// Logs a progress line every `interval` ticks.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    interval: u64,
}

impl LogObserver {
    /// Log every `interval` ticks; 0 logs nothing.
    pub const fn new(interval: u64) -> Self {
        Self { interval }
    }
}

impl TickObserver for LogObserver {
    fn on_tick(&mut self, summary: &TickSummary, blobs: &[Blob]) {
        if summary.tick.checked_rem(self.interval) != Some(0) {
            return;
        }
        info!(
            tick = summary.tick,
            blobs_alive = summary.blobs_alive,
            food_on_map = summary.food_on_map,
            mean_mass = summary.mean_mass,
            "Simulation progress"
        );
        for blob in blobs.iter().filter(|b| b.is_alive()) {
            trace!(
                blob = blob.id(),
                mass = blob.mass(),
                sense = blob.sense(),
                speed_multiplier = blob.speed_multiplier(),
                "Blob state"
            );
        }
    }
}

/// Result of a run, printed as JSON by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Seed the run was started with.
    pub seed: u64,
    /// Why the run ended.
    pub end_reason: EndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Food left on the map.
    pub food_remaining: usize,
    /// Food items spawned during the run.
    pub food_spawned: u64,
    /// Per-blob summaries.
    pub blobs: Vec<BlobReport>,
}

/// A configured simulation.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    world: World,
    blobs: Vec<Blob>,
    controllers: Vec<Controller>,
    tick: u64,
}

impl Simulation {
    /// Validate `config`, build the shared controller engine, place the
    /// initial food, and spawn the blobs at the world centre with headings
    /// spread evenly around the circle.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] for a bad simulation
    /// parameter and [`EngineError::Driver`] for a bad driver section.
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let shared = Controller::new(&config.driver)?;
        let engine = Arc::clone(shared.engine());

        let world = World::new(&config.world, &config.food)?;
        let centre = world.centre();
        let count = config.blob.count;

        let blobs = (0..count)
            .map(|id| {
                let heading = TAU * f64::from(id) / f64::from(count);
                Blob::new(id, centre, heading, &config.blob)
            })
            .collect();
        let controllers = (0..count)
            .map(|_| Controller::from_engine(Arc::clone(&engine)))
            .collect();

        info!(
            seed = config.world.seed,
            blobs = count,
            food = world.food().len(),
            rules = engine.rules().len(),
            "Simulation initialized"
        );

        Ok(Self {
            config,
            world,
            blobs,
            controllers,
            tick: 0,
        })
    }

    /// The blobs.
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// The world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Ticks executed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Propagates controller contract violations.
    pub fn step(&mut self) -> Result<TickSummary, EngineError> {
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        for (blob, controller) in self.blobs.iter_mut().zip(&self.controllers) {
            if let Step::Moved {
                food_in_sight,
                corrections,
            } = blob.step(tick, &self.world, controller, &self.config.blob)?
            {
                trace!(
                    tick,
                    blob = blob.id(),
                    food_in_sight,
                    delta_speed = corrections.delta_speed_multiplier,
                    delta_sense = corrections.delta_sense,
                    "Blob moved"
                );
            }
        }

        let mut food_eaten: u32 = 0;
        for blob in self.blobs.iter_mut().filter(|b| b.is_alive()) {
            let eaten = self.world.eat_within(&blob.hitbox(&self.config.blob));
            blob.eat(eaten, self.config.food.energy);
            food_eaten = food_eaten.saturating_add(eaten);
        }

        let food_spawned = self.world.maybe_spawn(&self.config.food);

        Ok(TickSummary {
            tick,
            blobs_alive: self.alive(),
            food_on_map: self.world.food().len(),
            food_eaten,
            food_spawned,
            mean_mass: self.mean_mass(),
        })
    }

    /// Run until extinction or the tick limit.
    ///
    /// # Errors
    ///
    /// Propagates controller contract violations.
    pub fn run(&mut self, observer: &mut dyn TickObserver) -> Result<RunReport, EngineError> {
        let max_ticks = self.config.world.max_ticks;
        info!(max_ticks, "Simulation starting");

        let end_reason = loop {
            if self.alive() == 0 {
                info!(tick = self.tick, "All blobs starved");
                break EndReason::Extinction;
            }
            if self.tick >= max_ticks {
                info!(tick = self.tick, max_ticks, "Tick limit reached");
                break EndReason::MaxTicksReached;
            }
            let summary = self.step()?;
            observer.on_tick(&summary, &self.blobs);
        };

        Ok(self.report(end_reason))
    }

    /// Summarize the run so far.
    pub fn report(&self, end_reason: EndReason) -> RunReport {
        RunReport {
            seed: self.config.world.seed,
            end_reason,
            total_ticks: self.tick,
            food_remaining: self.world.food().len(),
            food_spawned: self.world.food_spawned(),
            blobs: self.blobs.iter().map(Blob::report).collect(),
        }
    }

    fn alive(&self) -> u32 {
        let alive = self.blobs.iter().filter(|b| b.is_alive()).count();
        u32::try_from(alive).unwrap_or(u32::MAX)
    }

    fn mean_mass(&self) -> Option<f64> {
        let alive = self.alive();
        if alive == 0 {
            return None;
        }
        let total: f64 = self
            .blobs
            .iter()
            .filter(|b| b.is_alive())
            .map(Blob::mass)
            .sum();
        Some(total / f64::from(alive))
    }
}

/// Log the end of a run.
pub fn log_simulation_end(report: &RunReport) {
    let survivors = report.blobs.iter().filter(|b| b.alive).count();
    info!(
        reason = ?report.end_reason,
        total_ticks = report.total_ticks,
        survivors,
        food_remaining = report.food_remaining,
        food_spawned = report.food_spawned,
        "Simulation ended"
    );
    if report.total_ticks == 0 {
        warn!("Simulation ended with no ticks executed");
    }
}
