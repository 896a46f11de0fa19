//! TUI module for harp
//!
//! Latched computer-keyboard notes in, live view of the arpeggio out.

mod keyboard;
mod params;
pub mod state;
mod transport;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::{sync::Arc, time::Duration};

use harp::{
    arp::{params::REPEAT_LIMIT_MAX, SharedParams},
    io::midi::{MidiEvent, TimedMidiEvent},
};

use keyboard::{key_offset, render_keyboard};
use params::render_params;
use state::{ControlMessage, UiStateInit, UiStateUpdate};
use transport::render_transport;

/// Velocity of notes played from the computer keyboard
const KEY_VELOCITY: u8 = 100;
const DEFAULT_BASE_NOTE: u8 = 60;
const LOWEST_BASE_NOTE: u8 = 24;
const HIGHEST_BASE_NOTE: u8 = 96;
const FINE_STEP: f32 = 0.05;

/// UI application state
pub struct UiApp {
    params: Arc<SharedParams>,
    /// Keyboard notes to the audio thread
    key_tx: Producer<TimedMidiEvent>,
    control_tx: Producer<ControlMessage>,
    state_rx: Consumer<UiStateUpdate>,
    static_state: UiStateInit,
    current_state: UiStateUpdate,
    /// Keys toggled on; terminals don't report key-up, so notes latch
    latched: [bool; 128],
    base_note: u8,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        params: Arc<SharedParams>,
        key_tx: Producer<TimedMidiEvent>,
        control_tx: Producer<ControlMessage>,
        state_rx: Consumer<UiStateUpdate>,
        static_state: UiStateInit,
    ) -> Self {
        Self {
            params,
            key_tx,
            control_tx,
            state_rx,
            static_state,
            current_state: UiStateUpdate::new(),
            latched: [false; 128],
            base_note: DEFAULT_BASE_NOTE,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_state();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    /// Keep only the latest state
    fn poll_state(&mut self) {
        while let Ok(state) = self.state_rx.pop() {
            self.current_state = state;
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let current = self.params.snapshot();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.send_control(ControlMessage::TogglePlayback);
            }
            KeyCode::Backspace => {
                if self.send_control(ControlMessage::Panic) {
                    self.latched = [false; 128];
                }
            }
            KeyCode::Left => self.params.set_rate(current.rate.prev()),
            KeyCode::Right => self.params.set_rate(current.rate.next()),
            KeyCode::Tab => self.params.set_order(current.order.next()),
            KeyCode::BackTab => self.params.set_order(current.order.prev()),
            KeyCode::Char('-') => self
                .params
                .set_velocity_scale(current.velocity_scale - FINE_STEP),
            KeyCode::Char('=') => self
                .params
                .set_velocity_scale(current.velocity_scale + FINE_STEP),
            KeyCode::Char(',') => self.params.set_note_length(current.note_length - FINE_STEP),
            KeyCode::Char('.') => self.params.set_note_length(current.note_length + FINE_STEP),
            KeyCode::Char('9') => self
                .params
                .set_repeat_limit(current.repeat_limit.saturating_sub(1)),
            KeyCode::Char('0') => self
                .params
                .set_repeat_limit((current.repeat_limit + 1).min(REPEAT_LIMIT_MAX)),
            KeyCode::Char('z') => {
                self.base_note = self.base_note.saturating_sub(12).max(LOWEST_BASE_NOTE)
            }
            KeyCode::Char('x') => self.base_note = (self.base_note + 12).min(HIGHEST_BASE_NOTE),
            KeyCode::Char(c) => {
                if let Some(offset) = key_offset(c) {
                    self.toggle_note(self.base_note + offset);
                }
            }
            _ => {}
        }
    }

    /// Latch or unlatch a key. Nothing changes if the queue is full.
    fn toggle_note(&mut self, note: u8) {
        let held = self.latched[note as usize];
        let event = if held {
            MidiEvent::note_off(note)
        } else {
            MidiEvent::note_on(note, KEY_VELOCITY)
        };
        if self.key_tx.push(TimedMidiEvent::new(0, event)).is_ok() {
            self.latched[note as usize] = !held;
        }
    }

    fn send_control(&mut self, message: ControlMessage) -> bool {
        self.control_tx.push(message).is_ok()
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(7), // Parameters
                Constraint::Length(4), // Keyboard
                Constraint::Min(0),
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        render_transport(frame, chunks[0], &self.static_state, &self.current_state);
        render_params(frame, chunks[1], &self.params.snapshot());
        render_keyboard(
            frame,
            chunks[2],
            self.base_note,
            &self.latched,
            &self.current_state,
        );

        let help = Paragraph::new(
            " [A-K] Notes  [Z/X] Octave  [Space] Play/Pause  [Bksp] Panic  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
