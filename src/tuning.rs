//! Data-driven game balance
//!
//! Every rule constant the match controller consults lives here so a run can
//! be rebalanced from a JSON file without touching the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Lives & scoring ===
    pub starting_lives: u8,
    pub max_lives: u8,
    /// Bonus awarded when a wave is cleared
    pub wave_bonus: u64,
    /// Grace period at the start of every wave (seconds)
    pub wave_start_delay: f32,

    // === Player ===
    /// Player movement speed (units/second)
    pub player_speed: f32,
    /// Minimum time between player shots (seconds)
    pub player_fire_cooldown: f32,

    // === Projectiles ===
    pub projectile_speed: f32,

    // === Enemy fire director ===
    /// Global enemy-fire threshold is drawn uniformly from this range (seconds)
    pub enemy_fire_min: f32,
    pub enemy_fire_max: f32,
    /// Cap on simultaneous enemy projectiles
    pub max_enemy_projectiles: usize,

    // === Power-ups ===
    pub powerup_spawn_interval: f32,
    pub powerup_lifetime: f32,
    pub max_powerups: usize,
    /// Spawn inset from the arena edges
    pub powerup_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: 160.0,
            arena_height: 192.0,

            starting_lives: 3,
            max_lives: 5,
            wave_bonus: 500,
            wave_start_delay: 1.0,

            player_speed: 50.0,
            player_fire_cooldown: 0.3,

            projectile_speed: 100.0,

            enemy_fire_min: 1.0,
            enemy_fire_max: 3.0,
            max_enemy_projectiles: 3,

            powerup_spawn_interval: 20.0,
            powerup_lifetime: 15.0,
            max_powerups: 2,
            powerup_margin: 20.0,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults on any error.
    ///
    /// Missing fields take their default values.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Tuning>(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning.sanitized()
                }
                Err(e) => {
                    log::warn!("Malformed tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Repair values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let finite = |value: f32, default: f32| if value.is_finite() { value } else { default };
        self.arena_width = finite(self.arena_width, defaults.arena_width);
        self.arena_height = finite(self.arena_height, defaults.arena_height);
        self.wave_start_delay = finite(self.wave_start_delay, defaults.wave_start_delay);
        self.player_speed = finite(self.player_speed, defaults.player_speed);
        self.player_fire_cooldown = finite(self.player_fire_cooldown, defaults.player_fire_cooldown);
        self.projectile_speed = finite(self.projectile_speed, defaults.projectile_speed);
        self.enemy_fire_min = finite(self.enemy_fire_min, defaults.enemy_fire_min);
        self.enemy_fire_max = finite(self.enemy_fire_max, defaults.enemy_fire_max);
        self.powerup_spawn_interval =
            finite(self.powerup_spawn_interval, defaults.powerup_spawn_interval);
        self.powerup_lifetime = finite(self.powerup_lifetime, defaults.powerup_lifetime);
        self.powerup_margin = finite(self.powerup_margin, defaults.powerup_margin);

        self.max_lives = self.max_lives.max(1);
        self.starting_lives = self.starting_lives.clamp(1, self.max_lives);
        self.enemy_fire_min = self.enemy_fire_min.max(0.0);
        // random_range panics on an empty range
        if self.enemy_fire_max <= self.enemy_fire_min {
            self.enemy_fire_max = self.enemy_fire_min + 0.001;
        }
        let min_extent = 2.0 * self.powerup_margin + crate::consts::POWERUP_SIZE;
        if self.arena_width <= min_extent || self.arena_height <= min_extent {
            self.powerup_margin = 0.0;
        }
        self.wave_start_delay = self.wave_start_delay.max(0.0);
        self
    }

    /// Fixed player spawn coordinate (top-left of the tank box)
    pub fn player_spawn(&self) -> glam::Vec2 {
        glam::Vec2::new(
            self.arena_width / 2.0,
            self.arena_height - crate::consts::PLAYER_SPAWN_BOTTOM_OFFSET,
        )
    }
}
