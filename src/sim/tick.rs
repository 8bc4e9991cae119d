//! Per-frame simulation step
//!
//! Core game loop that advances the match by one variable delta. The order of
//! the steps below is part of the contract: replaying the same deltas and
//! inputs from the same seed reproduces the same match.

use rand::Rng;

use super::collision::{Rect, overlaps};
use super::powerup::PowerUpKind;
use super::state::{GameEvent, GamePhase, GameState};
use crate::input::{Action, InputState};

/// Advance the match by `dt` seconds
pub fn tick<I: InputState + ?Sized>(state: &mut GameState, input: &I, dt: f32) {
    let dt = dt.max(0.0);

    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::WaveStart => {
            // Grace period: nothing moves, input is ignored
            state.wave_start_timer -= dt;
            if state.wave_start_timer <= 0.0 {
                state.deploy_wave();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.frame += 1;

    update_player(state, input, dt);
    update_enemies(state, dt);
    enemy_fire(state, dt);
    advance_projectiles(state, dt);

    resolve_player_shots(state);
    resolve_enemy_shots(state);
    resolve_powerup_pickups(state);
    resolve_obstacle_hits(state);

    update_powerups(state, dt);

    check_wave_complete(state);
    check_game_over(state);
}

fn update_player<I: InputState + ?Sized>(state: &mut GameState, input: &I, dt: f32) {
    let (w, h) = state.arena_size();
    state.player.update(dt, input, w, h);
    if state.player.moved {
        state.events.push(GameEvent::PlayerMoved);
    }

    // Only one player shell may be in flight at a time
    if input.is_action_active(Action::Fire) && state.player_projectiles.is_empty() {
        if let Some(shot) = state.player.fire() {
            state.player_projectiles.push(shot);
            state.events.push(GameEvent::PlayerFired);
        }
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let (w, h) = state.arena_size();
    let target = state.player.center();
    for enemy in &mut state.enemies {
        enemy.update(dt, target, w, h, &mut state.rng);
        if enemy.moved {
            state.events.push(GameEvent::EnemyMoved(enemy.kind));
        }
    }
}

/// One randomly chosen enemy gets a chance to fire every 1-3 seconds
fn enemy_fire(state: &mut GameState, dt: f32) {
    state.enemy_fire_timer += dt;
    if state.enemy_fire_timer <= state.enemy_fire_threshold {
        return;
    }
    state.enemy_fire_timer = 0.0;
    state.enemy_fire_threshold = state.roll_enemy_fire_threshold();

    if state.enemies.is_empty() || state.enemy_projectiles.len() >= state.tuning.max_enemy_projectiles {
        return;
    }

    let index = state.rng.random_range(0..state.enemies.len());
    let target = state.player.center();
    let speed = state.tuning.projectile_speed;
    let shooter = &mut state.enemies[index];
    if let Some(shot) = shooter.fire(target, speed, &mut state.rng) {
        state.events.push(GameEvent::EnemyFired(shooter.kind));
        state.enemy_projectiles.push(shot);
    }
}

fn advance_projectiles(state: &mut GameState, dt: f32) {
    let (w, h) = state.arena_size();
    for shot in state
        .player_projectiles
        .iter_mut()
        .chain(state.enemy_projectiles.iter_mut())
    {
        shot.advance(dt);
    }
    state.player_projectiles.retain(|p| !p.is_out_of_bounds(w, h));
    state.enemy_projectiles.retain(|p| !p.is_out_of_bounds(w, h));
}

/// Player shells vs enemy tanks
fn resolve_player_shots(state: &mut GameState) {
    let mut spent = vec![false; state.player_projectiles.len()];

    for (i, shot) in state.player_projectiles.iter().enumerate() {
        let shot_rect = shot.rect();
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| !e.destroyed && overlaps(shot_rect, e.rect()))
        else {
            continue;
        };

        spent[i] = true;
        if enemy.take_damage() {
            let points = enemy.score_value();
            state.score += points;
            state.remaining_enemies = state.remaining_enemies.saturating_sub(1);
            log::debug!(
                "Enemy destroyed ({}), {} remaining",
                enemy.kind.as_str(),
                state.remaining_enemies
            );
            state.events.push(GameEvent::EnemyDestroyed {
                kind: enemy.kind,
                points,
            });
        }
    }

    compact(&mut state.player_projectiles, &spent);
    state.enemies.retain(|e| !e.destroyed);
}

/// Enemy shells vs the player: lose a life, respawn at the start point
fn resolve_enemy_shots(state: &mut GameState) {
    let spawn = state.tuning.player_spawn();
    let mut spent = vec![false; state.enemy_projectiles.len()];

    for (i, shot) in state.enemy_projectiles.iter().enumerate() {
        if !overlaps(shot.rect(), state.player.rect()) {
            continue;
        }
        spent[i] = true;
        state.lives = state.lives.saturating_sub(1);
        state.player.reset_to(spawn);
        log::debug!("Player hit, {} lives left", state.lives);
        state.events.push(GameEvent::PlayerHit {
            lives_left: state.lives,
        });
    }

    compact(&mut state.enemy_projectiles, &spent);
}

fn resolve_powerup_pickups(state: &mut GameState) {
    let player_rect = state.player.rect();
    let max_lives = state.tuning.max_lives;

    for powerup in &mut state.powerups {
        if powerup.collected || !overlaps(player_rect, powerup.rect()) {
            continue;
        }
        if let Some(kind) = powerup.collect() {
            match kind {
                PowerUpKind::LifeRestore => {
                    state.lives = state.lives.saturating_add(1).min(max_lives);
                }
            }
            log::debug!("Power-up collected: {:?}, lives {}", kind, state.lives);
            state.events.push(GameEvent::PowerUpCollected(kind));
        }
    }
}

/// Any shell that touches an obstacle is absorbed
fn resolve_obstacle_hits(state: &mut GameState) {
    let obstacles = &state.obstacles;
    let blocked = |rect: Rect| obstacles.iter().any(|o| overlaps(rect, o.rect));
    state.player_projectiles.retain(|p| !blocked(p.rect()));
    state.enemy_projectiles.retain(|p| !blocked(p.rect()));
}

fn update_powerups(state: &mut GameState, dt: f32) {
    let (w, h) = state.arena_size();
    let spawned = state
        .powerup_spawner
        .update(dt, &mut state.powerups, w, h, &mut state.rng);
    if spawned.is_some() {
        state.events.push(GameEvent::PowerUpSpawned);
    }
}

fn check_wave_complete(state: &mut GameState) {
    // Runs before the game-over check, so a clear on the final frame still counts
    if !state.enemies.is_empty() || state.remaining_enemies > 0 {
        return;
    }

    let bonus = state.tuning.wave_bonus;
    state.score += bonus;
    log::info!("Wave {} complete, +{} bonus", state.wave, bonus);
    state.events.push(GameEvent::WaveComplete {
        wave: state.wave,
        bonus,
    });

    state.wave += 1;
    state.start_wave();
}

fn check_game_over(state: &mut GameState) {
    if state.lives > 0 || state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    log::info!("Game over: score {}, wave {}", state.score, state.wave);
    state.events.push(GameEvent::GameOver {
        score: state.score,
        wave: state.wave,
    });
}

/// Drop every item whose flag is set, preserving order
fn compact<T>(items: &mut Vec<T>, spent: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !spent[index];
        index += 1;
        keep
    });
}
