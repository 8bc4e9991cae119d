//! Top-level game session
//!
//! Owns the match and its collaborators (audio, leaderboard storage) and
//! routes simulation events to them once per frame.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{AudioSink, SoundEffect};
use crate::highscores::{HighScores, ScoreResult};
use crate::input::InputState;
use crate::persistence::ScoreStore;
use crate::sim::{GameEvent, GameState, tick};
use crate::tuning::Tuning;

pub struct Session {
    state: GameState,
    audio: Box<dyn AudioSink>,
    store: Box<dyn ScoreStore>,
    scores: HighScores,
    player_name: String,
    paused: bool,
    /// Score already recorded for the current run
    recorded: bool,
    last_result: Option<ScoreResult>,
}

impl Session {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        player_name: impl Into<String>,
        mut audio: Box<dyn AudioSink>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let scores = HighScores::load_from(store.as_ref());
        audio.play(SoundEffect::StartupMelody);
        Self {
            state: GameState::new(seed, tuning),
            audio,
            store,
            scores,
            player_name: player_name.into(),
            paused: false,
            recorded: false,
            last_result: None,
        }
    }

    /// Run one frame: simulate, play sounds, and record the score when the
    /// run ends. Returns the frame's events.
    pub fn frame<I: InputState + ?Sized>(&mut self, dt: f32, input: &I) -> Vec<GameEvent> {
        let events = if self.paused {
            Vec::new()
        } else {
            tick(&mut self.state, input, dt);
            self.state.drain_events()
        };

        for event in &events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            if let GameEvent::GameOver { score, .. } = event {
                self.record(*score);
            }
        }
        self.audio.advance(dt);

        events
    }

    fn record(&mut self, score: u64) {
        if self.recorded {
            return;
        }
        self.recorded = true;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        let result = self.scores.record_score(&self.player_name, score, timestamp);
        if result.made_leaderboard {
            log::info!(
                "{} placed #{} with {}",
                self.player_name,
                result.rank.unwrap_or_default(),
                score
            );
        }
        if let Err(err) = self.scores.save_to(self.store.as_mut()) {
            log::warn!("Failed to save high scores: {}", err);
        }
        self.last_result = Some(result);
    }

    /// Start a fresh run
    pub fn restart(&mut self) {
        self.state.restart();
        self.recorded = false;
        self.last_result = None;
        self.paused = false;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn leaderboard(&self) -> &HighScores {
        &self.scores
    }

    /// Result of recording the finished run, once it has ended
    pub fn last_result(&self) -> Option<&ScoreResult> {
        self.last_result.as_ref()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }
}
