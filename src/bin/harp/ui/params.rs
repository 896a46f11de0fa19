//! Parameter panel - current arpeggio settings and the keys that change them

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use harp::ArpParams;

pub fn render_params(frame: &mut Frame, area: Rect, params: &ArpParams) {
    let block = Block::default().title(" Arpeggio ").borders(Borders::ALL);

    let repeats = match params.repeat_limit {
        0 => "∞".to_string(),
        n => n.to_string(),
    };
    let rows = [
        ("Rate", params.rate.label().to_string(), "←/→"),
        ("Order", params.order.label().to_string(), "Tab/Shift-Tab"),
        (
            "Velocity",
            format!("{:.0}%", params.velocity_scale * 100.0),
            "-/=",
        ),
        ("Length", format!("{:.2}", params.note_length), ",/."),
        ("Repeats", repeats, "9/0"),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(name, value, keys)| {
            Line::from(vec![
                Span::styled(format!(" {:<10}", name), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<14}", value),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(keys, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
