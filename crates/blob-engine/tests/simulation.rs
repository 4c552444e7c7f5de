//! Whole-run checks of the simulation with the shipped configuration.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::path::Path;

use blob_engine::blob::Blob;
use blob_engine::{EndReason, SimConfig, Simulation, TickObserver, TickSummary};

struct Totals {
    ticks: u64,
    eaten: u64,
    spawned: u64,
    max_food: usize,
}

impl TickObserver for Totals {
    fn on_tick(&mut self, summary: &TickSummary, blobs: &[Blob]) {
        self.ticks += 1;
        self.eaten += u64::from(summary.food_eaten);
        self.spawned += u64::from(summary.food_spawned);
        self.max_food = self.max_food.max(summary.food_on_map);
        for blob in blobs.iter().filter(|b| b.is_alive()) {
            assert!(blob.sense() >= 0.0);
            assert!(blob.speed_multiplier() >= 0.0);
            assert!(blob.mass() > 0.0);
        }
    }
}

fn shipped_config() -> SimConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../blob-config.yaml");
    SimConfig::from_file(&path).unwrap()
}

#[test]
fn shipped_config_is_the_default() {
    assert_eq!(shipped_config(), SimConfig::default());
}

#[test]
fn default_run_is_consistent() {
    let mut config = shipped_config();
    config.world.max_ticks = 2000;
    config.blob.count = 3;

    let mut totals = Totals {
        ticks: 0,
        eaten: 0,
        spawned: 0,
        max_food: 0,
    };
    let mut simulation = Simulation::new(config).unwrap();
    let report = simulation.run(&mut totals).unwrap();

    assert_eq!(report.total_ticks, totals.ticks);
    assert_eq!(report.food_spawned, totals.spawned);
    assert!(totals.max_food <= 100);

    // Food is conserved: initial + spawned = eaten + remaining.
    let eaten: u64 = report.blobs.iter().map(|b| u64::from(b.food_eaten)).sum();
    assert_eq!(eaten, totals.eaten);
    assert_eq!(10 + report.food_spawned, eaten + u64::try_from(report.food_remaining).unwrap());

    match report.end_reason {
        EndReason::MaxTicksReached => {
            assert_eq!(report.total_ticks, 2000);
            assert!(report.blobs.iter().any(|b| b.alive));
        }
        EndReason::Extinction => {
            assert!(report.total_ticks <= 2000);
            assert!(report.blobs.iter().all(|b| !b.alive));
        }
    }
}

#[test]
fn legacy_rules_run_too() {
    let mut config = shipped_config();
    config.world.max_ticks = 200;
    config.driver.rule_set = blob_driver::RuleSet::Legacy;
    let report = Simulation::new(config)
        .unwrap()
        .run(&mut blob_engine::LogObserver::new(0))
        .unwrap();
    assert!(report.total_ticks > 0);
}
