//! Blob physiology and movement.
//!
//! Every tick a living blob:
//!
//! 1. Recomputes its speed as `speed_coef * multiplier / mass`
//! 2. Pays for moving (`speed^2 * mass / moving_efficiency`) and sensing
//!    (`sense_energy_multiplier * sense`) out of its mass
//! 3. Dies if its mass reached zero
//! 4. Counts the food within its sensing radius and turns towards the nearest
//! 5. Asks its controller for corrections and applies them
//! 6. Moves, bouncing off walls within `min(sense, boundary)` when no food
//!    is in sight
//!
//! Eating happens afterwards, once every blob has moved.

use std::f64::consts::{PI, TAU};

use blob_driver::{Controller, Corrections, DriverError};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::BlobConfig;
use crate::world::{Hitbox, Position, Sighting, World};

/// One blob.
#[derive(Debug, Clone)]
pub struct Blob {
    id: u32,
    position: Position,
    heading: f64,
    mass: f64,
    sense: f64,
    speed_multiplier: f64,
    speed: f64,
    food_eaten: u32,
    distance_travelled: f64,
    died_at: Option<u64>,
}

/// What happened to a blob during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The blob moved.
    Moved {
        /// Food items it could see.
        food_in_sight: u32,
        /// Corrections its controller returned.
        corrections: Corrections,
    },
    /// The blob starved this tick.
    Died,
    /// The blob was already dead.
    Dead,
}

/// End-of-run summary of one blob.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlobReport {
    /// Blob index.
    pub id: u32,
    /// Whether the blob survived the run.
    pub alive: bool,
    /// Tick the blob starved on, if it did.
    pub died_at_tick: Option<u64>,
    /// Final mass.
    pub mass: f64,
    /// Final sensing radius.
    pub sense: f64,
    /// Final speed multiplier.
    pub speed_multiplier: f64,
    /// Food items eaten.
    pub food_eaten: u32,
    /// Total path length.
    pub distance_travelled: f64,
}

impl Blob {
    /// A fresh blob at `position`, facing `heading` radians.
    pub const fn new(id: u32, position: Position, heading: f64, config: &BlobConfig) -> Self {
        Self {
            id,
            position,
            heading,
            mass: config.initial_mass,
            sense: config.initial_sense,
            speed_multiplier: config.initial_speed_multiplier,
            speed: config.speed_coef * config.initial_speed_multiplier / config.initial_mass,
            food_eaten: 0,
            distance_travelled: 0.0,
            died_at: None,
        }
    }

    /// Blob index.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Heading in radians, counter-clockwise from the positive x axis.
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Current mass.
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Current sensing radius.
    pub const fn sense(&self) -> f64 {
        self.sense
    }

    /// Current speed multiplier.
    pub const fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Speed of the last step.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the blob is still alive.
    pub const fn is_alive(&self) -> bool {
        self.died_at.is_none()
    }

    /// Body scale, `scaling * mass^(1/3)`.
    pub fn scale(&self, config: &BlobConfig) -> f64 {
        config.scaling * self.mass.max(0.0).cbrt()
    }

    /// The blob's current hitbox.
    pub fn hitbox(&self, config: &BlobConfig) -> Hitbox {
        let scale = self.scale(config);
        Hitbox {
            centre: self.position,
            half_width: config.hitbox_half_width * scale,
            half_height: config.hitbox_half_height * scale,
        }
    }

    /// Advance the blob by one tick.
    ///
    /// # Errors
    ///
    /// Propagates controller contract violations.
    pub fn step(
        &mut self,
        tick: u64,
        world: &World,
        controller: &Controller,
        config: &BlobConfig,
    ) -> Result<Step, DriverError> {
        if !self.is_alive() {
            return Ok(Step::Dead);
        }

        self.speed = config.speed_coef * self.speed_multiplier / self.mass;
        let speed_cost = self.speed * self.speed * self.mass / config.moving_efficiency;
        let sense_cost = config.sense_energy_multiplier * self.sense;
        self.mass -= speed_cost + sense_cost;

        if self.mass <= 0.0 {
            self.died_at = Some(tick);
            info!(blob = self.id, tick, "Blob starved");
            return Ok(Step::Died);
        }

        let Sighting {
            count: food_in_sight,
            nearest,
        } = world.sight(self.position, self.sense);
        if let Some(target) = nearest {
            let dx = target.x - self.position.x;
            let dy = target.y - self.position.y;
            if dx != 0.0 || dy != 0.0 {
                self.heading = dy.atan2(dx);
            }
        }

        let corrections = controller.tick(self.mass, self.speed, self.sense, food_in_sight)?;
        self.speed_multiplier = (self.speed_multiplier + corrections.delta_speed_multiplier).max(0.0);
        self.sense = (self.sense + corrections.delta_sense).max(0.0);

        let (sin, cos) = self.heading.sin_cos();
        self.position.x += cos * self.speed;
        self.position.y += sin * self.speed;
        self.distance_travelled += self.speed;

        if nearest.is_none() {
            self.bounce(world);
        }

        Ok(Step::Moved {
            food_in_sight,
            corrections,
        })
    }

    /// Reflect the heading off any wall the blob is closing in on.
    fn bounce(&mut self, world: &World) {
        let margin = self.sense.min(boundary_distance(world));
        let (sin, cos) = self.heading.sin_cos();
        let p = self.position;

        let x_out = (p.x < margin && cos < 0.0) || (p.x > world.width() - margin && cos > 0.0);
        let y_out = (p.y < margin && sin < 0.0) || (p.y > world.height() - margin && sin > 0.0);

        if x_out {
            self.heading = PI - self.heading;
        }
        if y_out {
            self.heading = -self.heading;
        }
        if x_out || y_out {
            self.heading = self.heading.rem_euclid(TAU);
            debug!(blob = self.id, x = p.x, y = p.y, heading = self.heading, "Blob bounced");
        }
    }

    /// Add the energy of `count` eaten food items.
    pub fn eat(&mut self, count: u32, energy: f64) {
        if count == 0 {
            return;
        }
        self.mass += f64::from(count) * energy;
        self.food_eaten = self.food_eaten.saturating_add(count);
        debug!(blob = self.id, count, mass = self.mass, "Blob ate");
    }

    /// End-of-run summary.
    pub const fn report(&self) -> BlobReport {
        BlobReport {
            id: self.id,
            alive: self.is_alive(),
            died_at_tick: self.died_at,
            mass: self.mass,
            sense: self.sense,
            speed_multiplier: self.speed_multiplier,
            food_eaten: self.food_eaten,
            distance_travelled: self.distance_travelled,
        }
    }
}

/// Distance from a wall at which a wandering blob turns around.
pub fn boundary_distance(world: &World) -> f64 {
    world.width().max(world.height()) / 12.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{FoodConfig, WorldConfig};

    fn empty_world() -> World {
        let mut world = World::new(&WorldConfig::default(), &FoodConfig::default()).unwrap();
        world.clear_food();
        world
    }

    fn blob_at(x: f64, y: f64, heading: f64) -> Blob {
        Blob::new(0, Position::new(x, y), heading, &BlobConfig::default())
    }

    #[test]
    fn new_blob_matches_configuration() {
        let blob = blob_at(540.0, 360.0, 0.0);
        assert!((blob.mass() - 20.0).abs() < f64::EPSILON);
        assert!((blob.sense() - 150.0).abs() < f64::EPSILON);
        assert!((blob.speed() - 0.75).abs() < f64::EPSILON);
        assert!(blob.is_alive());
    }

    #[test]
    fn step_charges_movement_and_sensing() {
        let world = empty_world();
        let controller = Controller::sample().unwrap();
        let config = BlobConfig::default();
        let mut blob = blob_at(540.0, 360.0, 0.0);

        blob.step(1, &world, &controller, &config).unwrap();

        // speed 15 / 20 = 0.75, cost 0.75^2 * 20 / 1000 + 0.00005 * 150
        let expected = 20.0 - (0.011_25 + 0.007_5);
        assert!((blob.mass() - expected).abs() < 1e-12);
        assert!((blob.position().x - 540.75).abs() < 1e-12);
        assert!((blob.position().y - 360.0).abs() < 1e-12);
    }

    #[test]
    fn step_turns_towards_nearest_visible_food() {
        let mut world = empty_world();
        world.place_food(Position::new(540.0, 460.0));
        world.place_food(Position::new(100.0, 100.0));
        let controller = Controller::sample().unwrap();
        let mut blob = blob_at(540.0, 360.0, 0.0);

        let step = blob.step(1, &world, &controller, &BlobConfig::default()).unwrap();

        assert!(matches!(step, Step::Moved { food_in_sight: 1, .. }));
        assert!((blob.heading() - PI / 2.0).abs() < 1e-12);
        assert!(blob.position().y > 360.0);
    }

    #[test]
    fn corrections_never_drive_sense_or_multiplier_negative() {
        let world = empty_world();
        let controller = Controller::sample().unwrap();
        let config = BlobConfig {
            initial_sense: 0.0,
            initial_speed_multiplier: 0.0,
            ..BlobConfig::default()
        };
        let mut blob = Blob::new(0, Position::new(540.0, 360.0), 0.0, &config);
        for tick in 1..=50 {
            blob.step(tick, &world, &controller, &config).unwrap();
            assert!(blob.sense() >= 0.0);
            assert!(blob.speed_multiplier() >= 0.0);
        }
    }

    #[test]
    fn starving_blob_dies_and_stays_dead() {
        let world = empty_world();
        let controller = Controller::sample().unwrap();
        let config = BlobConfig {
            initial_mass: 0.001,
            ..BlobConfig::default()
        };
        let mut blob = Blob::new(3, Position::new(540.0, 360.0), 0.0, &config);

        assert_eq!(blob.step(7, &world, &controller, &config).unwrap(), Step::Died);
        assert!(!blob.is_alive());
        assert_eq!(blob.step(8, &world, &controller, &config).unwrap(), Step::Dead);

        let report = blob.report();
        assert_eq!(report.id, 3);
        assert_eq!(report.died_at_tick, Some(7));
        assert!(!report.alive);
    }

    #[test]
    fn wandering_blob_bounces_off_walls() {
        let world = empty_world();
        let controller = Controller::sample().unwrap();
        let config = BlobConfig::default();

        // Heading left, already inside the margin.
        let mut blob = blob_at(10.0, 360.0, PI);
        blob.step(1, &world, &controller, &config).unwrap();
        assert!(blob.heading().cos() > 0.0);

        // Heading up-right near the top edge.
        let mut blob = blob_at(540.0, 715.0, PI / 4.0);
        blob.step(1, &world, &controller, &config).unwrap();
        assert!(blob.heading().sin() < 0.0);
        assert!(blob.heading().cos() > 0.0);
    }

    #[test]
    fn blob_in_open_field_keeps_heading() {
        let world = empty_world();
        let controller = Controller::sample().unwrap();
        let mut blob = blob_at(540.0, 360.0, 1.0);
        blob.step(1, &world, &controller, &BlobConfig::default()).unwrap();
        assert!((blob.heading() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hitbox_grows_with_mass() {
        let config = BlobConfig::default();
        let mut blob = blob_at(0.0, 0.0, 0.0);
        let small = blob.hitbox(&config);
        blob.eat(2, 4.0);
        let large = blob.hitbox(&config);

        assert!(large.half_width > small.half_width);
        // scale 0.1 * 20^(1/3)
        assert!((small.half_width - 200.0 * 0.1 * 20f64.cbrt()).abs() < 1e-12);
        assert!((small.half_height / small.half_width - 1.5).abs() < 1e-12);
        assert_eq!(blob.report().food_eaten, 2);
        assert!((blob.mass() - 28.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_distance_uses_the_longer_side() {
        assert!((boundary_distance(&empty_world()) - 90.0).abs() < f64::EPSILON);
    }
}
