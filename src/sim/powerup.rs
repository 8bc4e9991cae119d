//! Collectible power-ups and their spawn policy

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::POWERUP_SIZE;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Restores one life, up to the cap
    #[default]
    LifeRestore,
}

/// A power-up lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    /// Seconds since spawn
    pub age: f32,
    pub lifetime: f32,
    /// Set once: either picked up or expired
    pub collected: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, lifetime: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(POWERUP_SIZE),
            kind,
            age: 0.0,
            lifetime,
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    /// Age the power-up; it expires (counts as collected) past its lifetime
    pub fn update(&mut self, dt: f32) {
        if self.collected {
            return;
        }
        self.age += dt;
        if self.age > self.lifetime {
            self.collected = true;
        }
    }

    /// Pick up the power-up. Yields its kind exactly once.
    pub fn collect(&mut self) -> Option<PowerUpKind> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.kind)
    }
}

/// Periodic power-up spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpSpawner {
    /// Time accumulated toward the next spawn
    pub timer: f32,
    pub interval: f32,
    /// Maximum uncollected power-ups on the field
    pub max_active: usize,
    /// Inset from the arena edges
    pub margin: f32,
    pub lifetime: f32,
}

impl PowerUpSpawner {
    pub fn new(interval: f32, max_active: usize, margin: f32, lifetime: f32) -> Self {
        Self {
            timer: 0.0,
            interval,
            max_active,
            margin,
            lifetime,
        }
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// Advance the spawn clock, age live power-ups and drop collected ones.
    ///
    /// Returns the spawned power-up's position, if one spawned this frame.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        powerups: &mut Vec<PowerUp>,
        arena_w: f32,
        arena_h: f32,
        rng: &mut R,
    ) -> Option<Vec2> {
        self.timer += dt;

        let mut spawned = None;
        let active = powerups.iter().filter(|p| !p.collected).count();
        if self.timer >= self.interval && active < self.max_active {
            let pos = self.random_position(arena_w, arena_h, rng);
            powerups.push(PowerUp::new(pos, PowerUpKind::LifeRestore, self.lifetime));
            self.timer = 0.0;
            log::debug!("Power-up spawned at ({:.1}, {:.1})", pos.x, pos.y);
            spawned = Some(pos);
        }

        for powerup in powerups.iter_mut() {
            powerup.update(dt);
        }
        powerups.retain(|p| !p.collected);

        spawned
    }

    /// Uniform position with the whole box inset by `margin`
    fn random_position<R: Rng + ?Sized>(&self, arena_w: f32, arena_h: f32, rng: &mut R) -> Vec2 {
        let span_x = (arena_w - self.margin * 2.0 - POWERUP_SIZE).max(0.0);
        let span_y = (arena_h - self.margin * 2.0 - POWERUP_SIZE).max(0.0);
        Vec2::new(
            self.margin + rng.random::<f32>() * span_x,
            self.margin + rng.random::<f32>() * span_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawner() -> PowerUpSpawner {
        PowerUpSpawner::new(20.0, 2, 20.0, 15.0)
    }

    #[test]
    fn test_collect_once() {
        let mut p = PowerUp::new(Vec2::new(50.0, 50.0), PowerUpKind::LifeRestore, 15.0);
        assert_eq!(p.collect(), Some(PowerUpKind::LifeRestore));
        assert!(p.collected);
        assert_eq!(p.collect(), None);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut p = PowerUp::new(Vec2::new(50.0, 50.0), PowerUpKind::LifeRestore, 15.0);
        p.update(15.0);
        assert!(!p.collected);
        p.update(0.1);
        assert!(p.collected);
        // Expired power-ups can't be picked up
        assert_eq!(p.collect(), None);
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = spawner();
        let mut powerups = Vec::new();

        assert!(s.update(19.5, &mut powerups, 160.0, 192.0, &mut rng).is_none());
        assert!(powerups.is_empty());

        let pos = s.update(0.5, &mut powerups, 160.0, 192.0, &mut rng).expect("spawn");
        assert_eq!(powerups.len(), 1);
        assert!(pos.x >= 20.0 && pos.x <= 160.0 - 20.0 - POWERUP_SIZE);
        assert!(pos.y >= 20.0 && pos.y <= 192.0 - 20.0 - POWERUP_SIZE);
        assert_eq!(s.timer, 0.0);
    }

    #[test]
    fn test_spawn_cap() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = PowerUpSpawner::new(1.0, 2, 20.0, 100.0);
        let mut powerups = Vec::new();
        for _ in 0..10 {
            s.update(1.0, &mut powerups, 160.0, 192.0, &mut rng);
        }
        assert_eq!(powerups.len(), 2);
    }

    #[test]
    fn test_expired_removed() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut s = spawner();
        let mut powerups = vec![PowerUp::new(Vec2::new(50.0, 50.0), PowerUpKind::LifeRestore, 1.0)];
        s.update(0.5, &mut powerups, 160.0, 192.0, &mut rng);
        assert_eq!(powerups.len(), 1);
        s.update(0.6, &mut powerups, 160.0, 192.0, &mut rng);
        assert!(powerups.is_empty());
    }
}
