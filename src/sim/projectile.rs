//! Tank shells

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::PROJECTILE_SIZE;

/// Who fired a projectile; decides which actors it can damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile in flight. Only `pos` changes after firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Center of the projectile
    pub pos: Vec2,
    /// Direction of travel (scaled by `speed`)
    pub vel: Vec2,
    pub speed: f32,
    pub owner: Owner,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, speed: f32, owner: Owner) -> Self {
        Self {
            pos,
            vel,
            speed,
            owner,
        }
    }

    /// Integrate position by `vel * speed * dt`
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * self.speed * dt;
    }

    /// True once the projectile has left `[0, w] x [0, h]`
    #[inline]
    pub fn is_out_of_bounds(&self, arena_w: f32, arena_h: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > arena_w || self.pos.y < 0.0 || self.pos.y > arena_h
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }
}
