//! Tank Destroyer headless runner
//!
//! Plays an attract-mode match with a simple autopilot, records the score on
//! the leaderboard and prints a summary. Rendering lives in a separate
//! front-end; this binary only drives the simulation.

use std::path::PathBuf;
use std::process::ExitCode;

use tank_destroyer::audio::{AudioManager, AudioSink, SoundEffect};
use tank_destroyer::input::TickInput;
use tank_destroyer::persistence::JsonFileStore;
use tank_destroyer::sim::{Direction, GameEvent, GameState};
use tank_destroyer::{Session, Settings, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Debug)]
struct Cli {
    seed: u64,
    frames: u64,
    name: Option<String>,
    scores: PathBuf,
    tuning: Option<PathBuf>,
    settings: Option<PathBuf>,
}

impl Cli {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);

        let mut seed = 1u64;
        let mut frames = 60 * 60 * 3;
        let mut name = None;
        let mut scores = PathBuf::from("highscores.json");
        let mut tuning = None;
        let mut settings = None;

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| format!("{flag} requires a value"))
            };
            match arg.as_str() {
                "--seed" => {
                    let v = value("--seed")?;
                    seed = v.parse().map_err(|_| format!("invalid --seed value: {v}"))?;
                }
                "--frames" => {
                    let v = value("--frames")?;
                    frames = v.parse().map_err(|_| format!("invalid --frames value: {v}"))?;
                }
                "--name" => name = Some(value("--name")?),
                "--scores" => scores = PathBuf::from(value("--scores")?),
                "--tuning" => tuning = Some(PathBuf::from(value("--tuning")?)),
                "--settings" => settings = Some(PathBuf::from(value("--settings")?)),
                "-h" | "--help" => {
                    println!(
                        "Usage: tank-destroyer [--seed <n>] [--frames <n>] [--name <player>] [--scores <file.json>] [--tuning <file.json>] [--settings <file.json>]"
                    );
                    std::process::exit(0);
                }
                other => return Err(format!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        Ok(Self {
            seed,
            frames,
            name,
            scores,
            tuning,
            settings,
        })
    }
}

/// Audio sink that logs what a speaker would play
struct LoggedAudio(AudioManager);

impl AudioSink for LoggedAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.0.play(effect);
    }

    fn advance(&mut self, dt: f32) {
        self.0.advance(dt);
        for tone in self.0.take_released() {
            log::trace!("tone {:.0} Hz for {:.2}s", tone.freq, tone.duration);
        }
    }
}

/// Drives the player toward the nearest enemy's row or column and shoots
#[derive(Default)]
struct Autopilot {
    rotated_last_frame: bool,
}

impl Autopilot {
    fn input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let me = state.player.center();
        let Some(target) = state
            .enemies
            .iter()
            .map(|e| e.center())
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)))
        else {
            self.rotated_last_frame = false;
            return input;
        };

        let delta = target - me;
        let (aim, slide) = if delta.x.abs() > delta.y.abs() {
            let aim = if delta.x > 0.0 { Direction::Right } else { Direction::Left };
            (aim, delta.y)
        } else {
            let aim = if delta.y > 0.0 { Direction::Down } else { Direction::Up };
            (aim, delta.x)
        };

        // Line up on the minor axis
        if slide.abs() > 2.0 {
            match aim {
                Direction::Left | Direction::Right => {
                    input.up = slide < 0.0;
                    input.down = slide > 0.0;
                }
                Direction::Up | Direction::Down => {
                    input.left = slide < 0.0;
                    input.right = slide > 0.0;
                }
            }
        }

        // Turret turns once per press, so release between presses
        if state.player.turret != aim && !self.rotated_last_frame {
            input.turret_cw = true;
            self.rotated_last_frame = true;
        } else {
            self.rotated_last_frame = false;
        }

        input.fire = state.player.turret == aim;
        input
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let tuning = cli
        .tuning
        .as_deref()
        .map(Tuning::load)
        .unwrap_or_default();
    let settings = cli
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    let name = cli.name.unwrap_or_else(|| settings.player_name.clone());

    log::info!("Tank Destroyer (headless) starting, seed {}", cli.seed);

    let audio = LoggedAudio(AudioManager::new(&settings));
    let store = JsonFileStore::new(&cli.scores);
    let mut session = Session::new(cli.seed, tuning, name, Box::new(audio), Box::new(store));
    let mut pilot = Autopilot::default();

    let mut kills = 0u32;
    for _ in 0..cli.frames {
        let input = pilot.input(session.state());
        let events = session.frame(FRAME_DT, &input);
        kills += events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
            .count() as u32;
        if session.state().is_game_over() {
            break;
        }
    }

    let state = session.state();
    println!(
        "{}: score {}, wave {}, lives {}, {} kills in {} frames",
        session.player_name(),
        state.score,
        state.wave,
        state.lives,
        kills,
        state.frame
    );
    match session.last_result() {
        Some(result) => match result.rank {
            Some(rank) => println!("Leaderboard rank #{rank} (previous best {})", result.previous_best),
            None => println!("Did not make the leaderboard"),
        },
        None => println!("Run still alive when time ran out; score not recorded"),
    }

    println!("Top scores:");
    for (i, entry) in session.leaderboard().top_scores(10).iter().enumerate() {
        println!("{:>2}. {:<12} {:>8}  {}", i + 1, entry.name, entry.score, entry.date);
    }

    ExitCode::SUCCESS
}
