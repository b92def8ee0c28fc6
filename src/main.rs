// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

mod audio;
mod board;
mod config;
mod game;
mod input;
mod schedule;
mod timing;
mod ui;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use config::{load_schedule, Settings, SongWatcher};
use game::{GameRules, Session};
use schedule::{songs, FollowScorer, Schedule, SchedulePlayer};
use ui::{App, Mode};

fn print_usage() {
    println!("WHACK - Reaction-Light Game Simulator");
    println!();
    println!("Usage: whack [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --game              Play the timed reaction game");
    println!("  --play <SONG>       Play along with a song, scoring your presses");
    println!("  --listen [SONG]     Watch a song with tones (default: crab-rave)");
    println!("  --songs             List the built-in songs");
    println!("  --validate <FILE>   Check a YAML song file and exit");
    println!("  --settings <FILE>   Load game/audio settings from a TOML file");
    println!("  --no-audio          Run without opening an audio device");
    println!("  --help              Show this help message");
    println!();
    println!("SONG is a built-in name (see --songs) or a path to a YAML file.");
    println!("YAML songs are watched while playing and hot-reload on save.");
}

fn print_songs() {
    println!("Built-in songs:");
    for name in songs::BUILTIN_NAMES {
        if let Some(schedule) = songs::builtin(name) {
            println!(
                "  {:14} {:14} {:3} notes, loops at {:.1}s",
                name,
                schedule.name(),
                schedule.note_count(),
                schedule.terminator_start() as f64 / 1000.0,
            );
        }
    }
}

fn validate_song(path: &str) -> Result<()> {
    let schedule = load_schedule(path)?;
    println!(
        "{}: ok ({} notes, loops at {}ms)",
        schedule.name(),
        schedule.note_count(),
        schedule.terminator_start(),
    );
    Ok(())
}

/// Resolve a song argument: a built-in name, or a YAML path. Paths come
/// back so the caller can watch them for edits.
fn resolve_song(arg: &str) -> Result<(Schedule, Option<PathBuf>)> {
    if let Some(schedule) = songs::builtin(arg) {
        return Ok((schedule, None));
    }
    let schedule = load_schedule(arg)?;
    Ok((schedule, Some(PathBuf::from(arg))))
}

/// What the simulator should run
enum ModeArg {
    Game,
    Play(String),
    Listen(String),
}

fn run_simulator(mode_arg: ModeArg, settings: Settings, no_audio: bool) -> Result<()> {
    let audio_enabled = settings.audio.enabled && !no_audio;
    let tone = audio::open_sink(
        audio_enabled,
        settings.audio.sample_rate,
        settings.audio.buffer_size,
    );

    let (mode, watcher) = match mode_arg {
        ModeArg::Game => {
            let rules: GameRules = settings.game.to_rules();
            (Mode::Game(Session::new(rules)), None)
        }
        ModeArg::Play(song) => {
            let (schedule, path) = resolve_song(&song)?;
            let watcher = watch_path(path);
            (
                Mode::Play {
                    player: SchedulePlayer::new(schedule),
                    scorer: FollowScorer::new(),
                },
                watcher,
            )
        }
        ModeArg::Listen(song) => {
            let (schedule, path) = resolve_song(&song)?;
            let watcher = watch_path(path);
            (
                Mode::Listen {
                    player: SchedulePlayer::new(schedule),
                },
                watcher,
            )
        }
    };

    let mut app = App::new(mode, tone, watcher)?;
    app.run()?;
    Ok(())
}

/// A watcher over a song path, or nothing when the song is built in.
/// Watch failures are not fatal: the song still plays, it just won't
/// hot-reload.
fn watch_path(path: Option<PathBuf>) -> Option<SongWatcher> {
    let path = path?;
    match SongWatcher::new(&path, None) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            eprintln!("Warning: cannot watch {:?} for edits: {}", path, e);
            None
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("WHACK - Reaction-Light Game Simulator");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let mut mode_arg: Option<ModeArg> = None;
    let mut settings = Settings::default();
    let mut no_audio = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--game" => {
                mode_arg = Some(ModeArg::Game);
            }
            "--play" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --play requires a song name or YAML path");
                    eprintln!("Use --songs to see the built-in names");
                    std::process::exit(1);
                }
                i += 1;
                mode_arg = Some(ModeArg::Play(args[i].clone()));
            }
            "--listen" => {
                let song = if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                    i += 1;
                    args[i].clone()
                } else {
                    "crab-rave".to_string()
                };
                mode_arg = Some(ModeArg::Listen(song));
            }
            "--songs" => {
                print_songs();
                return Ok(());
            }
            "--validate" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --validate requires a YAML file path");
                    std::process::exit(1);
                }
                if let Err(e) = validate_song(&args[i + 1]) {
                    eprintln!("{:#}", e);
                    std::process::exit(1);
                }
                return Ok(());
            }
            "--settings" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --settings requires a TOML file path");
                    std::process::exit(1);
                }
                i += 1;
                settings = Settings::load(&args[i])?;
            }
            "--no-audio" => {
                no_audio = true;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    match mode_arg {
        Some(mode) => run_simulator(mode, settings, no_audio),
        None => {
            eprintln!("Error: pick a mode: --game, --play <SONG>, or --listen [SONG]");
            std::process::exit(1);
        }
    }
}
