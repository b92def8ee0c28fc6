// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal simulator for the board.
//!
//! Renders the four lane strips, the three score displays, and a status
//! line with ratatui, and feeds keyboard taps into the button matrix. The
//! poll timeout doubles as the system tick, so every mode advances at
//! ~10 ms granularity whether or not keys arrive.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::audio::ToneSink;
use crate::board::{DisplaySink, LightDriver, LightFrame};
use crate::config::{SongEvent, SongWatcher};
use crate::game::lane::{Lane, LaneId, LEDS_PER_LANE};
use crate::game::{Session, SessionEvent, SessionPhase};
use crate::input::{Button, ButtonMatrix, KeyMap};
use crate::schedule::{FollowEvent, FollowScorer, SchedulePlayer};
use crate::timing::{Clock, SystemClock};

/// Tick cadence and event poll timeout
const TICK: Duration = Duration::from_millis(10);

/// How long a status message stays up
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Length of the feedback tone for a follow-mode hit
const FOLLOW_HIT_TONE_MS: u64 = 200;

/// Simulated LED strips. `apply` stages a frame, `show` makes it visible;
/// the renderer only ever reads the shown frame.
#[derive(Debug, Default)]
pub struct SimStrips {
    staged: LightFrame,
    shown: LightFrame,
}

impl SimStrips {
    /// The last flushed frame
    pub fn shown(&self) -> &LightFrame {
        &self.shown
    }
}

impl LightDriver for SimStrips {
    fn apply(&mut self, frame: &LightFrame) {
        self.staged = *frame;
    }

    fn show(&mut self) {
        self.shown = self.staged;
    }
}

/// One simulated seven-segment display surface
#[derive(Debug, Default)]
pub struct SimDisplay {
    text: String,
}

impl SimDisplay {
    /// What the display currently shows
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DisplaySink for SimDisplay {
    fn show_number(&mut self, value: i32) {
        self.text = value.to_string();
    }

    fn show_text(&mut self, text: [char; 4]) {
        self.text = text.iter().collect();
    }
}

/// The board's three displays: current score, best score, best name
#[derive(Debug, Default)]
pub struct DisplayBank {
    pub score: SimDisplay,
    pub best: SimDisplay,
    pub name: SimDisplay,
}

/// Which machine the simulator is driving
pub enum Mode {
    /// Reaction game against the session clock
    Game(Session),
    /// Schedule playback scored against lane presses
    Play {
        player: SchedulePlayer,
        scorer: FollowScorer,
    },
    /// Schedule playback with automatic tones
    Listen { player: SchedulePlayer },
}

impl Mode {
    /// Short label for the status line
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Game(_) => "game",
            Mode::Play { .. } => "play",
            Mode::Listen { .. } => "listen",
        }
    }
}

/// Terminal simulator application
pub struct App {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keymap: KeyMap,
    buttons: ButtonMatrix,
    clock: SystemClock,
    mode: Mode,
    tone: Box<dyn ToneSink>,
    watcher: Option<SongWatcher>,
    strips: SimStrips,
    displays: DisplayBank,
    status_message: Option<String>,
    status_time: Option<Instant>,
    running: bool,
}

impl App {
    /// Set up the terminal and build the app around a mode
    pub fn new(
        mode: Mode,
        tone: Box<dyn ToneSink>,
        watcher: Option<SongWatcher>,
    ) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            keymap: KeyMap::with_defaults(),
            buttons: ButtonMatrix::new(),
            clock: SystemClock::new(),
            mode,
            tone,
            watcher,
            strips: SimStrips::default(),
            displays: DisplayBank::default(),
            status_message: None,
            status_time: None,
            running: true,
        })
    }

    /// Main loop: poll keys, tick the mode, draw. Returns when the user
    /// quits.
    pub fn run(&mut self) -> io::Result<()> {
        // Play and listen modes start the clock immediately; the game
        // waits for a press on its own.
        let now = self.clock.now_ms();
        match &mut self.mode {
            Mode::Play { player, .. } | Mode::Listen { player } => player.start(now),
            Mode::Game(_) => {}
        }

        while self.running {
            let mut tapped: Vec<Button> = Vec::new();

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Release {
                        if let Some(button) = self.handle_key(key.code, key.modifiers) {
                            self.buttons.set_level(button, true);
                            tapped.push(button);
                        }
                    }
                }
            }

            self.apply_song_events();
            self.tick();

            // Key events are taps: the press lasts exactly one tick, so
            // the edge latch sees a clean release before the next one.
            for button in tapped {
                self.buttons.set_level(button, false);
            }

            self.clear_expired_status();
            self.draw()?;
        }

        Ok(())
    }

    /// Map a key to a button line, or act on control keys
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Button> {
        match (code, modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Esc, KeyModifiers::NONE) => {
                self.running = false;
                None
            }
            _ => self.keymap.resolve(code),
        }
    }

    /// Drain the watcher and swap reloaded schedules into the player
    fn apply_song_events(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        let events = watcher.recv_all();
        if events.is_empty() {
            return;
        }

        let now = self.clock.now_ms();
        let mut status = None;
        for song_event in events {
            match song_event {
                SongEvent::Reloaded { schedule, .. } => match &mut self.mode {
                    Mode::Play { player, scorer } => {
                        scorer.reset();
                        status = Some(format!("reloaded {}", schedule.name()));
                        player.replace_schedule(*schedule, now);
                    }
                    Mode::Listen { player } => {
                        status = Some(format!("reloaded {}", schedule.name()));
                        player.replace_schedule(*schedule, now);
                    }
                    Mode::Game(_) => {}
                },
                SongEvent::Rejected { reason, .. } => {
                    status = Some(format!("reload rejected: {reason}"));
                }
                SongEvent::Created(_) | SongEvent::Deleted(_) => {}
            }
        }
        if let Some(message) = status {
            self.set_status(message);
        }
    }

    /// Advance the active mode by one tick and route its output to the
    /// strips, the tone sink, and the displays. Lights always flush before
    /// any display update.
    fn tick(&mut self) {
        let now = self.clock.now_ms();
        let mut status = None;

        match &mut self.mode {
            Mode::Game(session) => {
                let events = session.tick(now, &mut self.buttons);
                let frame = session.light_frame();
                self.strips.apply(&frame);
                self.strips.show();

                for event in events {
                    match event {
                        SessionEvent::Tone { freq_hz, duration_ms } => {
                            self.tone.play(freq_hz, duration_ms);
                        }
                        SessionEvent::HighScoreSaved(high) => {
                            status = Some(format!(
                                "new high score {} by {}",
                                high.score,
                                high.name_string()
                            ));
                        }
                        _ => {}
                    }
                }

                self.displays.score.show_number(session.score());
                self.displays.best.show_number(session.high_score().score);
                match session.phase() {
                    SessionPhase::NameEntry => {
                        self.displays.name.show_text(session.name_entry().chars());
                    }
                    SessionPhase::Expired => {
                        self.displays.name.show_text(['O', 'v', 'e', 'r']);
                    }
                    _ => {
                        self.displays.name.show_text(session.high_score().name);
                    }
                }
            }
            Mode::Play { player, scorer } => {
                let frame = player.tick(now);
                let follow_events = scorer.tick(&frame, &mut self.buttons);
                // Hit notes go dark for their remainder
                let lights = frame.light_frame_where(|n| !scorer.is_hit(n.lane));
                self.strips.apply(&lights);
                self.strips.show();

                for event in follow_events {
                    if let FollowEvent::Hit { lane, .. } = event {
                        self.tone.play(Lane::get(lane).tone_hz, FOLLOW_HIT_TONE_MS);
                    }
                }

                self.displays.score.show_number(scorer.score());
                self.displays.best.show_number(player.loops() as i32);
            }
            Mode::Listen { player } => {
                let frame = player.tick(now);
                let lights = frame.light_frame();
                self.strips.apply(&lights);
                self.strips.show();

                for index in &frame.started {
                    let event = player.schedule().events()[*index];
                    if let Some(lane) = event.lane {
                        self.tone.play(Lane::get(lane).tone_hz, event.duration_ms);
                    }
                }

                self.displays.score.show_number(frame.active.len() as i32);
                self.displays.best.show_number(player.loops() as i32);
            }
        }

        if let Some(message) = status {
            self.set_status(message);
        }
    }

    /// Set a status message that will be displayed temporarily
    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > STATUS_TTL {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Draw the UI
    fn draw(&mut self) -> io::Result<()> {
        let now = self.clock.now_ms();
        let status = self
            .status_message
            .clone()
            .unwrap_or_else(|| status_line(&self.mode, now));
        let cursor = match &self.mode {
            Mode::Game(session) if session.phase() == SessionPhase::NameEntry => {
                Some(session.name_entry().cursor())
            }
            _ => None,
        };

        let shown = *self.strips.shown();
        let displays = &self.displays;

        self.terminal.draw(|frame| {
            let area = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6),  // Lane strips
                    Constraint::Length(3),  // Displays
                    Constraint::Length(1),  // Status
                    Constraint::Min(0),     // Padding
                ])
                .split(area);

            render_lanes(frame, chunks[0], &shown);
            render_displays(frame, chunks[1], displays, cursor);
            render_status_bar(frame, chunks[2], &status);
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// One-line state summary for the bottom of the screen
fn status_line(mode: &Mode, _now_ms: u64) -> String {
    match mode {
        Mode::Game(session) => {
            let phase = match session.phase() {
                SessionPhase::AwaitingStart => "press any lane key to start".to_string(),
                SessionPhase::Active => "go!".to_string(),
                SessionPhase::Expired => "game over, press any key".to_string(),
                SessionPhase::NameEntry => {
                    "new record! arrows edit, lane key saves".to_string()
                }
            };
            format!(" game | {phase} | 1-4/asdf: lanes, arrows: nav, q: quit")
        }
        Mode::Play { player, scorer } => format!(
            " play | {} | score {} | loop {} | 1-4/asdf: lanes, q: quit",
            player.schedule().name(),
            scorer.score(),
            player.loops(),
        ),
        Mode::Listen { player } => format!(
            " listen | {} | loop {} | q: quit",
            player.schedule().name(),
            player.loops(),
        ),
    }
}

/// Ratatui color for a lane cell
fn cell_color(lane: LaneId) -> Color {
    let (r, g, b) = Lane::get(lane).color.rgb();
    Color::Rgb(r, g, b)
}

/// Render the four lane strips
fn render_lanes(frame: &mut Frame, area: Rect, lights: &LightFrame) {
    let block = Block::default().borders(Borders::ALL).title(" Lanes ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    for (row, id) in LaneId::ALL.into_iter().enumerate() {
        if row >= rows.len() {
            break;
        }
        let lane = Lane::get(id);
        let mut spans = vec![Span::styled(
            format!(" {} {:6} ", id.index() + 1, lane.color.to_string()),
            Style::default().fg(Color::DarkGray),
        )];

        // Cell 0 is the scoring end; print it last so the sweep reads
        // right to left, matching the physical strips.
        for index in (0..LEDS_PER_LANE).rev() {
            let span = match lights.get(id, index) {
                Some(_) => Span::styled(
                    " ● ",
                    Style::default()
                        .fg(cell_color(id))
                        .add_modifier(Modifier::BOLD),
                ),
                None => Span::styled(" · ", Style::default().fg(Color::DarkGray)),
            };
            spans.push(span);
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), rows[row]);
    }
}

/// Render the three display surfaces
fn render_displays(frame: &mut Frame, area: Rect, displays: &DisplayBank, cursor: Option<usize>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_display(frame, chunks[0], "Score", displays.score.text(), None);
    render_display(frame, chunks[1], "Best", displays.best.text(), None);
    render_display(frame, chunks[2], "Name", displays.name.text(), cursor);
}

/// Render one display surface; `cursor` highlights a character slot
fn render_display(frame: &mut Frame, area: Rect, title: &str, text: &str, cursor: Option<usize>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match cursor {
        None => Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Some(slot) => {
            let spans = text
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if i == slot {
                        Span::styled(
                            c.to_string(),
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(c.to_string(), Style::default().fg(Color::Cyan))
                    }
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line), inner);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, status: &str) {
    let text = Span::styled(status.to_string(), Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(text), area);
}
