//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the match state
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod actor;
pub mod collision;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod wave;

pub use actor::{Direction, Enemy, EnemyKind, Player};
pub use collision::{Rect, overlaps};
pub use powerup::{PowerUp, PowerUpKind, PowerUpSpawner};
pub use projectile::{Owner, Projectile};
pub use state::{GameEvent, GamePhase, GameState, Obstacle};
pub use tick::tick;
pub use wave::{MAX_WAVE_ENEMIES, WaveComposition};
