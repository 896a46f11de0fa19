//! Transport bar widget - shows BPM, play state, meter and slot progress

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::state::{UiStateInit, UiStateUpdate};

const PROGRESS_WIDTH: usize = 16;

/// Render the transport bar
pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    static_state: &UiStateInit,
    dynamic_state: &UiStateUpdate,
) {
    let block = Block::default().title(" harp ").borders(Borders::ALL);

    let play_symbol = if dynamic_state.is_playing { "▶" } else { "⏸" };
    let play_state_str = if dynamic_state.is_playing { "Playing" } else { "Paused" };

    let sample_rate_khz = static_state.sample_rate / 1000.0;
    let slot_ms = dynamic_state.slot_samples as f64 / static_state.sample_rate as f64 * 1000.0;

    let filled = (dynamic_state.slot_progress() * PROGRESS_WIDTH as f64) as usize;
    let filled = filled.min(PROGRESS_WIDTH);
    let progress = format!(
        "{}{}",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled)
    );

    let mut spans = vec![
        Span::styled(
            format!(" BPM: {:.0}  ", static_state.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state_str),
            Style::default().fg(if dynamic_state.is_playing {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("{}  ", static_state.time_signature),
            Style::default().fg(Color::White),
        ),
        Span::styled(progress, Style::default().fg(Color::Magenta)),
        Span::styled(
            format!("  slot {:.1}ms  ", slot_ms),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:.1}kHz", sample_rate_khz),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if dynamic_state.dropped > 0 {
        spans.push(Span::styled(
            format!("  dropped {}", dynamic_state.dropped),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
