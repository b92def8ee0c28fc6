// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Hot reload for song files.
//!
//! Watches a song file (or a directory of them) and emits events when a
//! table changes on disk. Modified files are debounced, re-parsed, and
//! re-validated before anything reaches the player: a bad edit produces a
//! `Rejected` event and playback keeps the table it already has.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::warn;

use crate::schedule::Schedule;

use super::SongFile;

/// Events emitted by the song watcher
#[derive(Debug, Clone)]
pub enum SongEvent {
    /// A song file changed and its table validated cleanly
    Reloaded {
        path: PathBuf,
        schedule: Box<Schedule>,
    },
    /// A song file changed but failed to parse or validate
    Rejected { path: PathBuf, reason: String },
    /// A new file appeared in the watched directory
    Created(PathBuf),
    /// A file disappeared from the watched directory
    Deleted(PathBuf),
}

/// Load a song file and validate it into a schedule
pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule> {
    let song = SongFile::load(path.as_ref())?;
    song.into_schedule()
        .map_err(|e| anyhow!("invalid song table in {:?}: {}", path.as_ref(), e))
}

/// Song file watcher with debouncing and validation
pub struct SongWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<SongEvent>,
    watched_path: PathBuf,
}

impl SongWatcher {
    /// Watch a song file or directory for changes.
    ///
    /// `debounce_ms` collapses bursts of modify notifications from editors
    /// that write in several steps; `None` uses 500 ms.
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(500));

        let (event_tx, event_rx): (Sender<SongEvent>, Receiver<SongEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let bare_watch_path = watched_path.clone();
        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let mut pending_paths: Vec<PathBuf> = Vec::new();

            loop {
                match notify_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(event) => match event.kind {
                        EventKind::Create(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(SongEvent::Created(path));
                            }
                        }
                        EventKind::Remove(_) => {
                            for path in event.paths {
                                let _ = event_tx.send(SongEvent::Deleted(path));
                            }
                        }
                        EventKind::Modify(_) => {
                            for path in event.paths {
                                if !pending_paths.contains(&path) {
                                    pending_paths.push(path);
                                }
                            }
                            last_event_time = Some(Instant::now());
                        }
                        _ => {}
                    },
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let Some(last_time) = last_event_time else {
                            continue;
                        };
                        if last_time.elapsed() < debounce_duration {
                            continue;
                        }
                        for path in pending_paths.drain(..) {
                            if !is_song_path(&path, &bare_watch_path) {
                                continue;
                            }
                            match load_schedule(&path) {
                                Ok(schedule) => {
                                    let _ = event_tx.send(SongEvent::Reloaded {
                                        path,
                                        schedule: Box::new(schedule),
                                    });
                                }
                                Err(e) => {
                                    warn!(?path, %e, "rejected song reload");
                                    let _ = event_tx.send(SongEvent::Rejected {
                                        path,
                                        reason: e.to_string(),
                                    });
                                }
                            }
                        }
                        last_event_time = None;
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        // Watcher was dropped, exit thread
                        break;
                    }
                }
            }
        });

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next song event (non-blocking)
    pub fn try_recv(&self) -> Option<SongEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending song events
    pub fn recv_all(&self) -> Vec<SongEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next song event is received
    pub fn recv(&self) -> Option<SongEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Whether a notification path is worth reloading: a YAML file, or the
/// watched file itself when it carries no extension
fn is_song_path(path: &Path, watched: &Path) -> bool {
    match path.extension() {
        Some(ext) => ext == "yaml" || ext == "yml",
        None => path == watched,
    }
}
