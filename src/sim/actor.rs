//! Tanks: the player and the four enemy kinds
//!
//! Randomized AI decisions are split in two: a thin wrapper draws the rolls
//! from the caller's RNG, and a pure function turns those rolls into a
//! decision. Tests drive the pure half directly.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::projectile::{Owner, Projectile};
use crate::clamp_to_arena;
use crate::consts::*;
use crate::input::{Action, InputState};

/// Cardinal facing (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit axis vector
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }

    pub fn rotate_cw(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn rotate_ccw(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    /// Uniformly random cardinal
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// The player's tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Hull facing, follows movement
    pub facing: Direction,
    /// Aim direction, steered independently of the hull
    pub turret: Direction,
    pub speed: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    pub cooldown_duration: f32,
    pub projectile_speed: f32,
    /// Whether the tank moved during the last update
    #[serde(skip)]
    pub moved: bool,
    /// Rotate buttons held last frame (turret turns once per press)
    #[serde(skip)]
    held_cw: bool,
    #[serde(skip)]
    held_ccw: bool,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32, cooldown_duration: f32, projectile_speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(TANK_SIZE),
            facing: Direction::Up,
            turret: Direction::Up,
            speed,
            fire_cooldown: 0.0,
            cooldown_duration,
            projectile_speed,
            moved: false,
            held_cw: false,
            held_ccw: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Apply one frame of input
    pub fn update<I: InputState + ?Sized>(
        &mut self,
        dt: f32,
        input: &I,
        arena_w: f32,
        arena_h: f32,
    ) {
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        }

        // Later checks win the facing, matching the order keys are polled
        let mut dir = Vec2::ZERO;
        if input.is_action_active(Action::MoveUp) {
            dir.y = -1.0;
            self.facing = Direction::Up;
        }
        if input.is_action_active(Action::MoveDown) {
            dir.y = 1.0;
            self.facing = Direction::Down;
        }
        if input.is_action_active(Action::MoveLeft) {
            dir.x = -1.0;
            self.facing = Direction::Left;
        }
        if input.is_action_active(Action::MoveRight) {
            dir.x = 1.0;
            self.facing = Direction::Right;
        }

        if dir.x != 0.0 && dir.y != 0.0 {
            dir *= std::f32::consts::FRAC_1_SQRT_2;
        }

        let before = self.pos;
        self.pos = clamp_to_arena(self.pos + dir * self.speed * dt, self.size, arena_w, arena_h);
        self.moved = self.pos != before;

        let cw = input.is_action_active(Action::RotateTurretCw);
        let ccw = input.is_action_active(Action::RotateTurretCcw);
        if ccw && !self.held_ccw {
            self.turret = self.turret.rotate_ccw();
        }
        if cw && !self.held_cw {
            self.turret = self.turret.rotate_cw();
        }
        self.held_cw = cw;
        self.held_ccw = ccw;
    }

    /// Fire a shell from the turret-facing edge, or `None` while reloading
    pub fn fire(&mut self) -> Option<Projectile> {
        if self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = self.cooldown_duration;

        let axis = self.turret.vector();
        let muzzle = self.center() + axis * self.size / 2.0;
        Some(Projectile::new(muzzle, axis, self.projectile_speed, Owner::Player))
    }

    /// Return to the spawn point (after being hit)
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.moved = false;
    }
}

/// Enemy tank kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
    Smart,
    Fast,
    Heavy,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Smart => "smart",
            EnemyKind::Fast => "fast",
            EnemyKind::Heavy => "heavy",
        }
    }

    /// Movement speed (units/second)
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Basic => 20.0,
            EnemyKind::Smart => 25.0,
            EnemyKind::Fast => 40.0,
            EnemyKind::Heavy => 15.0,
        }
    }

    pub fn max_health(&self) -> u8 {
        match self {
            EnemyKind::Heavy => 2,
            _ => 1,
        }
    }

    /// Fire interval is drawn from this range at creation (seconds)
    pub fn fire_interval_range(&self) -> (f32, f32) {
        match self {
            EnemyKind::Basic => (2.0, 5.0),
            EnemyKind::Smart => (1.5, 3.5),
            EnemyKind::Fast => (3.0, 5.0),
            EnemyKind::Heavy => (1.0, 3.0),
        }
    }

    pub fn score_value(&self) -> u64 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Fast => 150,
            EnemyKind::Smart => 200,
            EnemyKind::Heavy => 300,
        }
    }

    /// Body color (0xRRGGBB) for the renderer
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Basic => 0xFF0000,
            EnemyKind::Smart => 0xFFFF00,
            EnemyKind::Fast => 0xFF8800,
            EnemyKind::Heavy => 0x800080,
        }
    }
}

/// An enemy tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    pub speed: f32,
    pub health: u8,
    pub destroyed: bool,
    /// Time since the last direction change
    pub move_timer: f32,
    /// Time between direction changes, re-drawn on every change
    pub turn_interval: f32,
    pub fire_cooldown: f32,
    pub fire_interval: f32,
    /// Whether the tank moved during the last update
    #[serde(skip)]
    pub moved: bool,
}

impl Enemy {
    /// Create an enemy with randomized heading and timers
    pub fn new<R: Rng + ?Sized>(kind: EnemyKind, pos: Vec2, rng: &mut R) -> Self {
        let (fire_min, fire_max) = kind.fire_interval_range();
        Self {
            kind,
            pos,
            size: Vec2::splat(TANK_SIZE),
            direction: Direction::random(rng),
            speed: kind.speed(),
            health: kind.max_health(),
            destroyed: false,
            move_timer: 0.0,
            turn_interval: rng.random_range(ENEMY_TURN_INTERVAL_MIN..ENEMY_TURN_INTERVAL_MAX),
            fire_cooldown: 0.0,
            fire_interval: rng.random_range(fire_min..fire_max),
            moved: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn score_value(&self) -> u64 {
        self.kind.score_value()
    }

    /// True when within the boundary margin of any arena edge
    pub fn is_at_boundary(&self, arena_w: f32, arena_h: f32) -> bool {
        self.pos.x <= ENEMY_BOUNDARY_MARGIN
            || self.pos.x >= arena_w - self.size.x - ENEMY_BOUNDARY_MARGIN
            || self.pos.y <= ENEMY_BOUNDARY_MARGIN
            || self.pos.y >= arena_h - self.size.y - ENEMY_BOUNDARY_MARGIN
    }

    /// Advance AI and movement by one frame. `target` is the player's center.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        target: Vec2,
        arena_w: f32,
        arena_h: f32,
        rng: &mut R,
    ) {
        if self.destroyed {
            return;
        }

        if self.fire_cooldown > 0.0 {
            self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        }

        self.move_timer += dt;
        if self.move_timer > self.turn_interval || self.is_at_boundary(arena_w, arena_h) {
            self.change_direction(target, rng);
            self.move_timer = 0.0;
            self.turn_interval = rng.random_range(ENEMY_TURN_INTERVAL_MIN..ENEMY_TURN_INTERVAL_MAX);
        }

        let before = self.pos;
        let step = self.direction.vector() * self.speed * dt;
        self.pos = clamp_to_arena(self.pos + step, self.size, arena_w, arena_h);
        self.moved = self.pos != before;
    }

    /// Reconsider heading using the kind's policy
    pub fn change_direction<R: Rng + ?Sized>(&mut self, target: Vec2, rng: &mut R) {
        let chase_roll: f64 = rng.random();
        let fallback = Direction::random(rng);
        self.direction = self.choose_direction(target, chase_roll, fallback);
    }

    /// Pure heading policy. `chase_roll` is uniform in [0, 1).
    pub fn choose_direction(&self, target: Vec2, chase_roll: f64, fallback: Direction) -> Direction {
        if self.kind == EnemyKind::Smart && chase_roll < SMART_CHASE_CHANCE {
            self.chase_direction(target)
        } else {
            fallback
        }
    }

    /// Greedy single-axis chase: close the larger gap first
    pub fn chase_direction(&self, target: Vec2) -> Direction {
        let delta = target - self.center();
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Fire at `target` (the player's center), or `None` while reloading
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        target: Vec2,
        projectile_speed: f32,
        rng: &mut R,
    ) -> Option<Projectile> {
        if self.destroyed || self.fire_cooldown > 0.0 {
            return None;
        }
        self.fire_cooldown = self.fire_interval;

        let quadrant_roll: f64 = rng.random();
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let vel = self.aim(target, quadrant_roll, angle);
        Some(Projectile::new(self.center(), vel, projectile_speed, Owner::Enemy))
    }

    /// Pure aiming policy.
    ///
    /// Smart tanks aim straight at the target. Everyone else lobs toward the
    /// target's quadrant with probability 0.3, otherwise fires at `angle`.
    pub fn aim(&self, target: Vec2, quadrant_roll: f64, angle: f32) -> Vec2 {
        let origin = self.center();
        if self.kind == EnemyKind::Smart {
            let to_target = target - origin;
            // Stacked on the target: fall back to the current heading
            return to_target
                .try_normalize()
                .unwrap_or_else(|| self.direction.vector());
        }

        if quadrant_roll < QUADRANT_AIM_CHANCE {
            Vec2::new(
                if target.x > origin.x { 0.5 } else { -0.5 },
                if target.y > origin.y { 0.5 } else { -0.5 },
            )
        } else {
            Vec2::new(angle.cos(), angle.sin())
        }
    }

    /// Apply one hit. Returns true only on the hit that destroys the tank.
    pub fn take_damage(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.destroyed = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TickInput;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const W: f32 = 160.0;
    const H: f32 = 192.0;

    fn player() -> Player {
        Player::new(Vec2::new(80.0, 100.0), 50.0, 0.3, 100.0)
    }

    fn enemy(kind: EnemyKind, pos: Vec2) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(7);
        Enemy::new(kind, pos, &mut rng)
    }

    #[test]
    fn test_direction_rotation() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_cw().rotate_ccw(), dir);
            assert_eq!(dir.rotate_cw().rotate_cw().rotate_cw().rotate_cw(), dir);
        }
        assert_eq!(Direction::Up.rotate_cw(), Direction::Right);
        assert_eq!(Direction::Up.rotate_ccw(), Direction::Left);
    }

    #[test]
    fn test_player_moves_and_faces() {
        let mut p = player();
        let input = TickInput::from_actions(&[Action::MoveRight]);
        p.update(1.0, &input, W, H);
        assert_eq!(p.pos, Vec2::new(130.0, 100.0));
        assert_eq!(p.facing, Direction::Right);
        assert!(p.moved);
    }

    #[test]
    fn test_player_diagonal_preserves_speed() {
        let mut p = player();
        let input = TickInput::from_actions(&[Action::MoveUp, Action::MoveLeft]);
        let start = p.pos;
        p.update(0.5, &input, W, H);
        let travelled = (p.pos - start).length();
        assert!((travelled - 25.0).abs() < 1e-3);
        // Left is polled after up
        assert_eq!(p.facing, Direction::Left);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut p = player();
        let input = TickInput::from_actions(&[Action::MoveDown, Action::MoveRight]);
        p.update(10.0, &input, W, H);
        assert_eq!(p.pos, Vec2::new(W - TANK_SIZE, H - TANK_SIZE));
    }

    #[test]
    fn test_turret_rotates_once_per_press() {
        let mut p = player();
        let held = TickInput::from_actions(&[Action::RotateTurretCw]);
        p.update(0.016, &held, W, H);
        p.update(0.016, &held, W, H);
        assert_eq!(p.turret, Direction::Right);
        p.update(0.016, &TickInput::default(), W, H);
        p.update(0.016, &held, W, H);
        assert_eq!(p.turret, Direction::Down);
        // Hull facing is independent of the turret
        assert_eq!(p.facing, Direction::Up);
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut p = player();
        p.turret = Direction::Right;
        let shot = p.fire().expect("first shot");
        assert_eq!(shot.vel, Vec2::X);
        assert_eq!(shot.owner, Owner::Player);
        // Muzzle at right edge midpoint
        assert_eq!(shot.pos, Vec2::new(88.0, 104.0));

        assert!(p.fire().is_none());
        p.update(0.31, &TickInput::default(), W, H);
        assert!(p.fire().is_some());
    }

    #[test]
    fn test_enemy_kind_table() {
        assert_eq!(EnemyKind::Heavy.max_health(), 2);
        assert_eq!(EnemyKind::Basic.max_health(), 1);
        assert_eq!(EnemyKind::Basic.score_value(), 100);
        assert_eq!(EnemyKind::Fast.score_value(), 150);
        assert_eq!(EnemyKind::Smart.score_value(), 200);
        assert_eq!(EnemyKind::Heavy.score_value(), 300);
    }

    #[test]
    fn test_enemy_intervals_in_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for kind in [EnemyKind::Basic, EnemyKind::Smart, EnemyKind::Fast, EnemyKind::Heavy] {
            for _ in 0..50 {
                let e = Enemy::new(kind, Vec2::new(50.0, 50.0), &mut rng);
                let (lo, hi) = kind.fire_interval_range();
                assert!(e.fire_interval >= lo && e.fire_interval < hi);
                assert!(e.turn_interval >= 1.0 && e.turn_interval < 3.0);
            }
        }
    }

    #[test]
    fn test_take_damage_destroys_once() {
        let mut heavy = enemy(EnemyKind::Heavy, Vec2::new(50.0, 50.0));
        assert!(!heavy.take_damage());
        assert_eq!(heavy.health, 1);
        assert!(!heavy.destroyed);
        assert!(heavy.take_damage());
        assert_eq!(heavy.health, 0);
        assert!(heavy.destroyed);
        // Further hits are ignored
        assert!(!heavy.take_damage());
        assert_eq!(heavy.health, 0);
    }

    #[test]
    fn test_smart_chase_policy() {
        let smart = enemy(EnemyKind::Smart, Vec2::new(20.0, 20.0));
        let target = Vec2::new(100.0, 40.0);
        assert_eq!(smart.choose_direction(target, 0.1, Direction::Up), Direction::Right);
        // Roll above the chase chance takes the random fallback
        assert_eq!(smart.choose_direction(target, 0.9, Direction::Up), Direction::Up);

        let below = Vec2::new(30.0, 150.0);
        assert_eq!(smart.chase_direction(below), Direction::Down);
    }

    #[test]
    fn test_basic_never_chases() {
        let basic = enemy(EnemyKind::Basic, Vec2::new(20.0, 20.0));
        let target = Vec2::new(100.0, 40.0);
        assert_eq!(basic.choose_direction(target, 0.0, Direction::Left), Direction::Left);
    }

    #[test]
    fn test_smart_aims_exactly() {
        let smart = enemy(EnemyKind::Smart, Vec2::new(20.0, 20.0));
        let target = smart.center() + Vec2::new(30.0, 40.0);
        let vel = smart.aim(target, 0.99, 0.0);
        assert!((vel - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_basic_quadrant_and_random_aim() {
        let basic = enemy(EnemyKind::Basic, Vec2::new(20.0, 20.0));
        let target = Vec2::new(0.0, 100.0);
        assert_eq!(basic.aim(target, 0.1, 0.0), Vec2::new(-0.5, 0.5));
        let random = basic.aim(target, 0.5, std::f32::consts::FRAC_PI_2);
        assert!((random - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_enemy_fire_cooldown() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut e = Enemy::new(EnemyKind::Basic, Vec2::new(50.0, 50.0), &mut rng);
        assert!(e.fire(Vec2::new(80.0, 170.0), 100.0, &mut rng).is_some());
        assert!(e.fire_cooldown >= 2.0);
        assert!(e.fire(Vec2::new(80.0, 170.0), 100.0, &mut rng).is_none());
    }

    #[test]
    fn test_is_at_boundary_edges() {
        let margin = ENEMY_BOUNDARY_MARGIN;
        let far = W - TANK_SIZE - margin;
        assert!(enemy(EnemyKind::Basic, Vec2::new(margin, 100.0)).is_at_boundary(W, H));
        assert!(enemy(EnemyKind::Basic, Vec2::new(far, 100.0)).is_at_boundary(W, H));
        assert!(enemy(EnemyKind::Basic, Vec2::new(80.0, margin)).is_at_boundary(W, H));
        assert!(enemy(EnemyKind::Basic, Vec2::new(80.0, H - TANK_SIZE - margin)).is_at_boundary(W, H));
        assert!(!enemy(EnemyKind::Basic, Vec2::new(margin + 1.0, 100.0)).is_at_boundary(W, H));
        assert!(!enemy(EnemyKind::Basic, Vec2::new(far - 1.0, 100.0)).is_at_boundary(W, H));
    }

    #[test]
    fn test_enemy_turns_at_boundary() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut e = enemy(EnemyKind::Basic, Vec2::new(3.0, 100.0));
        e.move_timer = 0.5;
        // Out of the drawable range, so a re-draw is visible
        e.turn_interval = 10.0;

        e.update(0.016, Vec2::new(80.0, 170.0), W, H, &mut rng);
        assert_eq!(e.move_timer, 0.0);
        assert!((ENEMY_TURN_INTERVAL_MIN..ENEMY_TURN_INTERVAL_MAX).contains(&e.turn_interval));

        // Away from the edges the timer just accumulates
        let mut e = enemy(EnemyKind::Basic, Vec2::new(80.0, 100.0));
        e.move_timer = 0.5;
        e.turn_interval = 10.0;
        e.update(0.016, Vec2::new(80.0, 170.0), W, H, &mut rng);
        assert!((e.move_timer - 0.516).abs() < 1e-6);
        assert_eq!(e.turn_interval, 10.0);
    }

    #[test]
    fn test_enemy_stays_in_arena() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut e = Enemy::new(EnemyKind::Fast, Vec2::new(2.0, 2.0), &mut rng);
        for _ in 0..2000 {
            e.update(0.016, Vec2::new(80.0, 170.0), W, H, &mut rng);
            assert!(e.pos.x >= 0.0 && e.pos.x <= W - TANK_SIZE);
            assert!(e.pos.y >= 0.0 && e.pos.y <= H - TANK_SIZE);
        }
    }
}
