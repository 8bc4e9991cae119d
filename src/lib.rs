//! Tank Destroyer - A retro arena tank shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, projectiles, waves, collisions)
//! - `input`: Action-level input abstraction consumed by the simulation
//! - `audio`: Fire-and-forget sound effect sink and tone scheduler
//! - `highscores` / `persistence`: Ranked leaderboard and its backing store
//! - `tuning` / `settings`: Data-driven game balance and player preferences
//! - `session`: Top-level object wiring the simulation to its collaborators

pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreResult};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Fixed entity geometry (logical pixels)
pub mod consts {
    /// Tank bounding box (player and enemies)
    pub const TANK_SIZE: f32 = 8.0;
    /// Projectile bounding box, centered on the projectile position
    pub const PROJECTILE_SIZE: f32 = 2.0;
    /// Obstacle bounding box
    pub const OBSTACLE_SIZE: f32 = 16.0;
    /// Power-up bounding box
    pub const POWERUP_SIZE: f32 = 8.0;

    /// Player spawn is centered horizontally, this far above the bottom edge
    pub const PLAYER_SPAWN_BOTTOM_OFFSET: f32 = 20.0;

    /// Enemies reconsider direction when this close to an arena edge
    pub const ENEMY_BOUNDARY_MARGIN: f32 = 5.0;
    /// Enemy direction-change interval range (seconds)
    pub const ENEMY_TURN_INTERVAL_MIN: f32 = 1.0;
    pub const ENEMY_TURN_INTERVAL_MAX: f32 = 3.0;
    /// Chance a smart enemy chases the player when it turns
    pub const SMART_CHASE_CHANCE: f64 = 0.6;
    /// Chance a non-smart enemy aims at the player's quadrant
    pub const QUADRANT_AIM_CHANCE: f64 = 0.3;

    /// Fixed enemy spawn points, filled in order
    pub const SPAWN_POSITIONS: [(f32, f32); 8] = [
        (20.0, 20.0),
        (60.0, 20.0),
        (100.0, 20.0),
        (140.0, 20.0),
        (20.0, 40.0),
        (140.0, 40.0),
        (40.0, 60.0),
        (120.0, 60.0),
    ];

    /// Static obstacle layout
    pub const OBSTACLE_POSITIONS: [(f32, f32); 6] = [
        (40.0, 60.0),
        (120.0, 60.0),
        (20.0, 120.0),
        (80.0, 100.0),
        (140.0, 120.0),
        (60.0, 140.0),
    ];
}

/// Clamp a box's top-left corner so the whole box stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: Vec2, arena_w: f32, arena_h: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (arena_w - size.x).max(0.0)),
        pos.y.clamp(0.0, (arena_h - size.y).max(0.0)),
    )
}
