//! Audio system
//!
//! Procedurally described retro sound effects - no external files needed!
//! Effects become square-wave tones (or noise bursts) on a small scheduling
//! queue; a playback backend pulls the released tones each frame.

use std::collections::HashMap;

use crate::settings::Settings;
use crate::sim::{EnemyKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player tank moved
    PlayerMove,
    /// Enemy tank moved (pitch depends on the kind)
    EnemyMove(EnemyKind),
    PlayerFire,
    EnemyFire,
    /// Enemy destroyed - explosion
    EnemyDestroyed(EnemyKind),
    /// Player lost a life
    PlayerHit,
    /// Power-up collected
    PowerUpCollected,
    /// Wave cleared
    WaveComplete,
    GameOver,
    /// Arcade startup jingle
    StartupMelody,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerMoved => Some(Self::PlayerMove),
            GameEvent::EnemyMoved(kind) => Some(Self::EnemyMove(*kind)),
            GameEvent::PlayerFired => Some(Self::PlayerFire),
            GameEvent::EnemyFired(_) => Some(Self::EnemyFire),
            GameEvent::EnemyDestroyed { kind, .. } => Some(Self::EnemyDestroyed(*kind)),
            GameEvent::PlayerHit { .. } => Some(Self::PlayerHit),
            GameEvent::PowerUpCollected(_) => Some(Self::PowerUpCollected),
            GameEvent::WaveComplete { .. } => Some(Self::WaveComplete),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            GameEvent::WaveStarted { .. } | GameEvent::PowerUpSpawned => None,
        }
    }

    fn is_music(self) -> bool {
        matches!(self, SoundEffect::StartupMelody)
    }
}

/// Anything that can be told to play sounds
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Advance the sink's own clock
    fn advance(&mut self, _dt: f32) {}
}

/// Silent sink for when there is no audio
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Noise,
}

/// One note for the playback backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Start frequency (Hz)
    pub freq: f32,
    /// Exponential sweep target over the tone's duration
    pub sweep_to: Option<f32>,
    /// Seconds
    pub duration: f32,
    /// Final gain, settings already applied
    pub volume: f32,
}

impl Tone {
    fn square(freq: f32, duration: f32, volume: f32) -> Self {
        Self {
            waveform: Waveform::Square,
            freq,
            sweep_to: None,
            duration,
            volume,
        }
    }

    fn sweep(mut self, to: f32) -> Self {
        self.sweep_to = Some(to);
        self
    }
}

/// Minimum seconds between player move sounds
const PLAYER_MOVE_THROTTLE: f32 = 0.2;
/// Minimum seconds between move sounds of the same enemy kind
const ENEMY_MOVE_THROTTLE: f32 = 0.3;

/// Startup jingle: C E G C G C
const STARTUP_MELODY: [(f32, f32); 6] = [
    (262.0, 0.3),
    (330.0, 0.3),
    (392.0, 0.3),
    (523.0, 0.6),
    (392.0, 0.3),
    (523.0, 0.9),
];

/// Audio manager for the game
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Audio clock (seconds)
    clock: f32,
    /// Scheduled tones as (seconds until due, tone), in schedule order
    queue: Vec<(f32, Tone)>,
    /// Tones released by the latest `advance`, until taken or the next advance
    released: Vec<Tone>,
    last_player_move: Option<f32>,
    last_enemy_move: HashMap<EnemyKind, f32>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let mut manager = Self {
            master_volume: 0.0,
            sfx_volume: 0.0,
            music_volume: 0.0,
            muted: false,
            clock: 0.0,
            queue: Vec::new(),
            released: Vec::new(),
            last_player_move: None,
            last_enemy_move: HashMap::new(),
        };
        manager.apply_settings(settings);
        manager
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio. Muting also drops anything still scheduled.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.queue.clear();
        }
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if effect.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        self.master_volume * channel
    }

    /// Tones scheduled but not yet due
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take the tones released by the latest `advance`.
    ///
    /// A backend calls this once per frame, after `advance`. Tones not taken
    /// by then are dropped.
    pub fn take_released(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.released)
    }

    fn schedule(&mut self, delay: f32, tone: Tone) {
        self.queue.push((delay, tone));
    }

    /// Move sounds play at most once per throttle window
    fn throttled(&mut self, effect: SoundEffect) -> bool {
        let last = match effect {
            SoundEffect::PlayerMove => &mut self.last_player_move,
            SoundEffect::EnemyMove(kind) => {
                let clock = self.clock;
                return match self.last_enemy_move.get(&kind) {
                    Some(&t) if clock - t <= ENEMY_MOVE_THROTTLE => true,
                    _ => {
                        self.last_enemy_move.insert(kind, clock);
                        false
                    }
                };
            }
            _ => return false,
        };
        match *last {
            Some(t) if self.clock - t <= PLAYER_MOVE_THROTTLE => true,
            _ => {
                *last = Some(self.clock);
                false
            }
        }
    }

    // === Sound generators ===

    fn enemy_move_pitch(kind: EnemyKind) -> f32 {
        match kind {
            EnemyKind::Basic => 150.0,
            EnemyKind::Smart => 180.0,
            EnemyKind::Fast => 200.0,
            EnemyKind::Heavy => 120.0,
        }
    }

    /// Explosion - noise burst then a falling thud
    fn schedule_explosion(&mut self, vol: f32) {
        self.schedule(
            0.0,
            Tone {
                waveform: Waveform::Noise,
                freq: 0.0,
                sweep_to: None,
                duration: 0.3,
                volume: vol * 0.1,
            },
        );
        self.schedule(0.05, Tone::square(100.0, 0.2, vol * 0.06).sweep(50.0));
    }

    /// Evenly spaced notes of equal length
    fn schedule_arpeggio(&mut self, notes: &[f32], spacing: f32, duration: f32, volume: f32) {
        for (i, &freq) in notes.iter().enumerate() {
            self.schedule(i as f32 * spacing, Tone::square(freq, duration, volume));
        }
    }

    fn schedule_startup(&mut self, vol: f32) {
        let mut at = 0.0;
        for &(freq, duration) in &STARTUP_MELODY {
            self.schedule(at, Tone::square(freq, duration, vol * 0.1));
            at += duration + 0.1;
        }
    }
}

impl AudioSink for AudioManager {
    /// Play a sound effect
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 || self.throttled(effect) {
            return;
        }

        match effect {
            SoundEffect::PlayerMove => self.schedule(0.0, Tone::square(220.0, 0.1, vol * 0.05)),
            SoundEffect::EnemyMove(kind) => {
                let pitch = Self::enemy_move_pitch(kind);
                self.schedule(0.0, Tone::square(pitch, 0.08, vol * 0.03));
            }
            SoundEffect::PlayerFire => self.schedule(0.0, Tone::square(440.0, 0.15, vol * 0.08)),
            SoundEffect::EnemyFire => self.schedule(0.0, Tone::square(330.0, 0.15, vol * 0.08)),
            SoundEffect::EnemyDestroyed(_) => self.schedule_explosion(vol),
            SoundEffect::PlayerHit => {
                self.schedule(0.0, Tone::square(440.0, 1.0, vol * 0.1).sweep(110.0));
            }
            SoundEffect::PowerUpCollected => {
                self.schedule_arpeggio(&[600.0, 800.0, 1000.0], 0.08, 0.2, vol * 0.08);
            }
            SoundEffect::WaveComplete => {
                self.schedule_arpeggio(&[262.0, 330.0, 392.0, 523.0], 0.1, 0.4, vol * 0.08);
            }
            SoundEffect::GameOver => {
                self.schedule_arpeggio(
                    &[523.0, 494.0, 440.0, 392.0, 349.0, 294.0],
                    0.2,
                    0.6,
                    vol * 0.1,
                );
            }
            SoundEffect::StartupMelody => self.schedule_startup(vol),
        }
    }

    /// Run the audio clock and release every tone that has come due
    fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.released.clear();

        let mut due = Vec::new();
        self.queue.retain_mut(|(delay, tone)| {
            *delay -= dt;
            if *delay <= 0.0 {
                due.push(*tone);
                false
            } else {
                true
            }
        });
        if !due.is_empty() {
            log::debug!("Releasing {} tones", due.len());
        }
        self.released.extend(due);
    }
}
