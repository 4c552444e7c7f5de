//! The rectangular world and its food.
//!
//! Food items are points. Placement and spawning draw from one seeded
//! [`StdRng`], so a run is reproducible from `world.seed`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::{FoodConfig, WorldConfig, positive};
use crate::error::EngineError;

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// Horizontal coordinate, 0 at the left edge.
    pub x: f64,
    /// Vertical coordinate, 0 at the bottom edge.
    pub y: f64,
}

impl Position {
    /// Build a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box centred on a blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Centre of the box.
    pub centre: Position,
    /// Half the box width.
    pub half_width: f64,
    /// Half the box height.
    pub half_height: f64,
}

impl Hitbox {
    /// Whether `point` lies inside or on the box.
    pub fn contains(&self, point: Position) -> bool {
        (point.x - self.centre.x).abs() <= self.half_width
            && (point.y - self.centre.y).abs() <= self.half_height
    }
}

/// Food items a blob can see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Items within the sensing radius.
    pub count: u32,
    /// The closest of them.
    pub nearest: Option<Position>,
}

/// World state shared by every blob.
#[derive(Debug, Clone)]
pub struct World {
    width: f64,
    height: f64,
    food: Vec<Position>,
    food_spawned: u64,
    rng: StdRng,
}

impl World {
    /// Create a world and place the initial food.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidParameter`] if the width or height is
    /// not finite and positive.
    pub fn new(world: &WorldConfig, food: &FoodConfig) -> Result<Self, EngineError> {
        positive("world.width", world.width)?;
        positive("world.height", world.height)?;
        let mut created = Self {
            width: world.width,
            height: world.height,
            food: Vec::new(),
            food_spawned: 0,
            rng: StdRng::seed_from_u64(world.seed),
        };
        for _ in 0..food.initial_count {
            created.spawn_food();
        }
        Ok(created)
    }

    /// World width.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The world centre.
    pub const fn centre(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Food currently on the map.
    pub fn food(&self) -> &[Position] {
        &self.food
    }

    /// Food items spawned during the run, the initial ones excluded.
    pub const fn food_spawned(&self) -> u64 {
        self.food_spawned
    }

    /// Count the food within `radius` of `from` and find the nearest item.
    ///
    /// Ties keep the item placed first.
    pub fn sight(&self, from: Position, radius: f64) -> Sighting {
        let mut count: u32 = 0;
        let mut nearest: Option<(f64, Position)> = None;
        for &item in &self.food {
            let distance = from.distance(item);
            if distance > radius {
                continue;
            }
            count = count.saturating_add(1);
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, item));
            }
        }
        Sighting {
            count,
            nearest: nearest.map(|(_, item)| item),
        }
    }

    /// Remove every food item inside `hitbox`, returning how many were eaten.
    pub fn eat_within(&mut self, hitbox: &Hitbox) -> u32 {
        let before = self.food.len();
        self.food.retain(|&item| !hitbox.contains(item));
        let eaten = before.saturating_sub(self.food.len());
        u32::try_from(eaten).unwrap_or(u32::MAX)
    }

    /// Spawn one item with probability `spawn_chance * (1 - count / max_count)`.
    ///
    /// Returns whether an item was spawned.
    pub fn maybe_spawn(&mut self, food: &FoodConfig) -> bool {
        let chance = spawn_probability(food, self.food.len());
        let roll: f64 = self.rng.random();
        if roll < chance {
            self.spawn_food();
            self.food_spawned = self.food_spawned.saturating_add(1);
            debug!(food = self.food.len(), chance, "Food spawned");
            true
        } else {
            false
        }
    }

    fn spawn_food(&mut self) {
        let x = self.rng.random_range(0.0..self.width);
        let y = self.rng.random_range(0.0..self.height);
        self.food.push(Position::new(x, y));
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, item: Position) {
        self.food.push(item);
    }

    #[cfg(test)]
    pub(crate) fn clear_food(&mut self) {
        self.food.clear();
    }
}

/// Spawn probability for a map holding `count` items.
///
/// Falls linearly from `spawn_chance` on an empty map to 0 at `max_count`,
/// and stays at 0 beyond it.
#[allow(clippy::cast_precision_loss)]
pub fn spawn_probability(food: &FoodConfig, count: usize) -> f64 {
    let fill = count as f64 / f64::from(food.max_count.max(1));
    (food.spawn_chance * (1.0 - fill)).max(0.0)
}
