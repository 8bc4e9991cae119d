//! Match state: everything the per-frame update reads and writes
//!
//! The renderer gets `&GameState`; only `tick` and `restart` mutate it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Enemy, EnemyKind, Player};
use super::collision::Rect;
use super::powerup::{PowerUp, PowerUpKind, PowerUpSpawner};
use super::projectile::Projectile;
use super::wave::{self, WaveComposition};
use crate::consts::{OBSTACLE_POSITIONS, OBSTACLE_SIZE};
use crate::tuning::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Grace period before a wave becomes interactive
    WaveStart,
    /// Full simulation
    Playing,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Things that happened during a tick, for audio and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted {
        wave: u32,
        requested: WaveComposition,
        spawned: u32,
    },
    PlayerMoved,
    EnemyMoved(EnemyKind),
    PlayerFired,
    EnemyFired(EnemyKind),
    EnemyDestroyed {
        kind: EnemyKind,
        points: u64,
    },
    PlayerHit {
        lives_left: u8,
    },
    PowerUpSpawned,
    PowerUpCollected(PowerUpKind),
    WaveComplete {
        wave: u32,
        bonus: u64,
    },
    GameOver {
        score: u64,
        wave: u32,
    },
}

/// A static wall block; stops projectiles, not tanks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(pos: Vec2) -> Self {
        Self {
            rect: Rect::at(pos, Vec2::splat(OBSTACLE_SIZE)),
        }
    }
}

/// Complete match state (deterministic for a given seed and delta sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,

    pub phase: GamePhase,
    /// Seconds left in the wave-start grace period
    pub wave_start_timer: f32,
    /// Current wave (1-based)
    pub wave: u32,
    pub score: u64,
    pub lives: u8,
    /// Enemies of this wave not yet destroyed (counts deployed tanks only)
    pub remaining_enemies: u32,
    /// What the current wave asked for
    pub composition: WaveComposition,
    /// Frames simulated in the Playing phase
    pub frame: u64,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<PowerUp>,
    pub powerup_spawner: PowerUpSpawner,

    /// Time since an enemy was last given the chance to fire
    pub enemy_fire_timer: f32,
    pub enemy_fire_threshold: f32,

    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given seed, already in wave 1
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::new(
            tuning.player_spawn(),
            tuning.player_speed,
            tuning.player_fire_cooldown,
            tuning.projectile_speed,
        );
        let powerup_spawner = PowerUpSpawner::new(
            tuning.powerup_spawn_interval,
            tuning.max_powerups,
            tuning.powerup_margin,
            tuning.powerup_lifetime,
        );
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::WaveStart,
            wave_start_timer: 0.0,
            wave: 1,
            score: 0,
            lives: tuning.starting_lives,
            remaining_enemies: 0,
            composition: WaveComposition::default(),
            frame: 0,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            powerup_spawner,
            enemy_fire_timer: 0.0,
            enemy_fire_threshold: 0.0,
            events: Vec::new(),
            tuning,
        };
        state.restart();
        state
    }

    /// Throw away the current run and start again from wave 1.
    ///
    /// The RNG stream carries on, so consecutive runs differ.
    pub fn restart(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.wave = 1;
        self.frame = 0;

        self.enemies.clear();
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
        self.powerups.clear();
        self.powerup_spawner.reset();
        self.events.clear();

        self.player = Player::new(
            self.tuning.player_spawn(),
            self.tuning.player_speed,
            self.tuning.player_fire_cooldown,
            self.tuning.projectile_speed,
        );
        self.obstacles = OBSTACLE_POSITIONS
            .iter()
            .map(|&(x, y)| Obstacle::new(Vec2::new(x, y)))
            .collect();

        self.enemy_fire_timer = 0.0;
        self.enemy_fire_threshold = self.roll_enemy_fire_threshold();

        log::info!("Match (re)started, seed {}", self.seed);
        self.start_wave();
    }

    /// Enter the current wave's grace period. Enemies arrive when it ends.
    pub(crate) fn start_wave(&mut self) {
        self.phase = GamePhase::WaveStart;
        self.wave_start_timer = self.tuning.wave_start_delay;
        self.composition = wave::composition(self.wave);
        self.enemies.clear();
        self.remaining_enemies = 0;

        log::info!(
            "Starting wave {}: {} basic, {} smart, {} fast",
            self.wave,
            self.composition.basic,
            self.composition.smart,
            self.composition.fast
        );
    }

    /// Grace period over: place the wave's enemies and start playing
    pub(crate) fn deploy_wave(&mut self) {
        self.enemies = wave::spawn(&self.composition, &mut self.rng);
        // Authoritative count is what actually spawned, not what was asked for
        self.remaining_enemies = self.enemies.len() as u32;
        if self.composition.total() > self.remaining_enemies {
            log::debug!(
                "Wave {} requested {} enemies but only {} spawn points",
                self.wave,
                self.composition.total(),
                self.remaining_enemies
            );
        }

        self.wave_start_timer = 0.0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave,
            requested: self.composition,
            spawned: self.remaining_enemies,
        });
    }

    pub(crate) fn roll_enemy_fire_threshold(&mut self) -> f32 {
        self.rng
            .random_range(self.tuning.enemy_fire_min..self.tuning.enemy_fire_max)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_wave_starting(&self) -> bool {
        self.phase == GamePhase::WaveStart
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn arena_size(&self) -> (f32, f32) {
        (self.tuning.arena_width, self.tuning.arena_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345, Tuning::default());
        assert_eq!(state.phase, GamePhase::WaveStart);
        assert_eq!(state.wave_start_timer, 1.0);
        assert_eq!(state.wave, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.composition.total(), 2);
        assert!(state.enemies.is_empty());
        assert_eq!(state.obstacles.len(), 6);
        assert_eq!(state.player.pos, Vec2::new(80.0, 172.0));
        assert!((1.0..3.0).contains(&state.enemy_fire_threshold));
    }

    #[test]
    fn test_deploy_wave() {
        let mut state = GameState::new(1, Tuning::default());
        state.deploy_wave();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.remaining_enemies, 2);
        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::WaveStarted { wave: 1, spawned: 2, .. }]
        ));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(99, Tuning::default());
        state.score = 4200;
        state.lives = 0;
        state.wave = 7;
        state.phase = GamePhase::GameOver;
        state.player.pos = Vec2::new(3.0, 3.0);
        state.player_projectiles.push(Projectile::new(
            Vec2::new(10.0, 10.0),
            Vec2::Y,
            100.0,
            super::super::projectile::Owner::Player,
        ));
        state.powerups.push(PowerUp::new(Vec2::new(40.0, 40.0), PowerUpKind::LifeRestore, 15.0));
        state.powerup_spawner.timer = 12.0;

        state.restart();

        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.wave, 1);
        assert_eq!(state.phase, GamePhase::WaveStart);
        assert!(state.player_projectiles.is_empty());
        assert!(state.enemy_projectiles.is_empty());
        assert!(state.powerups.is_empty());
        assert_eq!(state.powerup_spawner.timer, 0.0);
        assert_eq!(state.obstacles.len(), 6);
        assert_eq!(state.player.pos, state.tuning.player_spawn());
        // Enemies only arrive once the grace period ends
        assert!(state.enemies.is_empty());
        assert_eq!(state.composition.total(), 2);
    }

    #[test]
    fn test_configured_starting_lives() {
        let tuning = Tuning {
            starting_lives: 4,
            ..Default::default()
        };
        let state = GameState::new(5, tuning);
        assert_eq!(state.lives, 4);
    }
}
