//! Wave director: how many of which enemy each wave gets, and where they start

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Enemy, EnemyKind};
use crate::consts::SPAWN_POSITIONS;

/// Maximum enemies a single wave can field
pub const MAX_WAVE_ENEMIES: u32 = SPAWN_POSITIONS.len() as u32;

/// Requested enemy counts for one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WaveComposition {
    pub basic: u32,
    pub smart: u32,
    pub fast: u32,
}

impl WaveComposition {
    pub fn total(&self) -> u32 {
        self.basic + self.smart + self.fast
    }

    /// Kinds in spawn order: all basic, then smart, then fast
    pub fn kinds(&self) -> impl Iterator<Item = EnemyKind> + '_ {
        std::iter::repeat_n(EnemyKind::Basic, self.basic as usize)
            .chain(std::iter::repeat_n(EnemyKind::Smart, self.smart as usize))
            .chain(std::iter::repeat_n(EnemyKind::Fast, self.fast as usize))
    }
}

/// Enemy composition for a wave (1-based)
///
/// Basic tanks grow from 2 to 4, smart tanks join at wave 3 and fast tanks at
/// wave 4. When the request overflows the spawn points, basic tanks give way
/// first but never drop below one.
pub fn composition(wave: u32) -> WaveComposition {
    let mut basic = (2 + wave / 2).min(4);
    let smart = wave.saturating_sub(2);
    let fast = wave.saturating_sub(1) / 3;

    if basic + smart + fast > MAX_WAVE_ENEMIES {
        basic = MAX_WAVE_ENEMIES.saturating_sub(smart + fast).max(1);
    }

    WaveComposition { basic, smart, fast }
}

/// Place a wave's enemies on the fixed spawn points, in order.
///
/// Stops when the spawn points run out, so the result may be shorter than
/// `composition.total()`. Callers must count what was actually spawned.
pub fn spawn<R: Rng + ?Sized>(composition: &WaveComposition, rng: &mut R) -> Vec<Enemy> {
    composition
        .kinds()
        .zip(SPAWN_POSITIONS.iter())
        .map(|(kind, &(x, y))| Enemy::new(kind, Vec2::new(x, y), rng))
        .collect()
}
