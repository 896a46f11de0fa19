//! Keyboard widget - one octave of latched keys plus what the engine is playing

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::UiStateUpdate;

/// Computer-keyboard layout: home row for white keys, row above for black
pub const KEY_MAP: [(char, u8); 13] = [
    ('a', 0),
    ('w', 1),
    ('s', 2),
    ('e', 3),
    ('d', 4),
    ('f', 5),
    ('t', 6),
    ('g', 7),
    ('y', 8),
    ('h', 9),
    ('u', 10),
    ('j', 11),
    ('k', 12),
];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn key_offset(c: char) -> Option<u8> {
    KEY_MAP
        .iter()
        .find(|(key, _)| *key == c)
        .map(|&(_, offset)| offset)
}

pub fn note_name(note: u8) -> String {
    let octave = (note / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

pub fn render_keyboard(
    frame: &mut Frame,
    area: Rect,
    base_note: u8,
    latched: &[bool; 128],
    dynamic_state: &UiStateUpdate,
) {
    let block = Block::default()
        .title(format!(" Keys (from {}) ", note_name(base_note)))
        .borders(Borders::ALL);

    let sounding = dynamic_state.sounding();
    let keys: Vec<Span> = KEY_MAP
        .iter()
        .map(|&(c, offset)| {
            let note = base_note.saturating_add(offset).min(127);
            let style = if sounding.contains(&note) {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else if latched[note as usize] {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", c.to_ascii_uppercase()), style)
        })
        .collect();

    let playing: Vec<String> = sounding.iter().map(|&n| note_name(n)).collect();
    let status = Line::from(vec![
        Span::styled(
            format!(" Held: {}  ", dynamic_state.held_count),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Step: {}  Repeat: {}  ", dynamic_state.step_index, dynamic_state.repeat_count),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(playing.join(" "), Style::default().fg(Color::Green)),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(keys), status]).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
    }

    #[test]
    fn test_key_offsets() {
        assert_eq!(key_offset('a'), Some(0));
        assert_eq!(key_offset('k'), Some(12));
        assert_eq!(key_offset('q'), None);
    }
}
