// src/ui/widgets/player_panel.rs
//! Player information panel widget.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::viz::settings::VisualizerSettings;

/// Render the player information panel.
#[allow(clippy::too_many_arguments)]
pub fn render_player_panel(
    f: &mut Frame<'_>,
    area: Rect,
    track_name: Option<&str>,
    elapsed: u64,
    is_playing: bool,
    is_paused: bool,
    volume: u8,
    muted: bool,
    settings: &VisualizerSettings,
) {
    let title = "2: Player";
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let mut lines = match track_name {
        Some(name) => vec![
            format!("Track: {}", name),
            format!("Elapsed: {:02}:{:02}", elapsed / 60, elapsed % 60),
        ],
        None => vec!["No track playing".to_string()],
    };
    lines.push(format!(
        "Style: {}   Palette: {}   Glow: {}",
        settings.style.as_str(),
        settings.color_palette.as_str(),
        if settings.glow_enabled { "on" } else { "off" }
    ));
    f.render_widget(
        Paragraph::new(lines.join("\n")).wrap(Wrap { trim: true }),
        inner[0],
    );

    // Playback control buttons
    let play_pause_icon = if !is_playing {
        Span::styled(" ⏵ ", Style::default().fg(Color::Gray))
    } else if is_paused {
        Span::styled(" ⏵ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ⏸ ", Style::default().fg(Color::Green))
    };

    let controls = Line::from(vec![
        Span::styled(" ⏮ ", Style::default().fg(Color::Cyan)), // Previous (p/<)
        Span::raw(" "),
        Span::styled(" ⏹ ", Style::default().fg(Color::Red)), // Stop (s)
        Span::raw(" "),
        play_pause_icon, // Play/Pause (space)
        Span::raw(" "),
        Span::styled(" ⏭ ", Style::default().fg(Color::Cyan)), // Next (n/>)
    ]);

    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        inner[1],
    );

    // Volume gauge; mute shows as an emptied bar so the slider position is
    // not lost.
    let ratio = if muted { 0.0 } else { volume as f64 / 100.0 };
    let label = if muted {
        "muted".to_string()
    } else {
        format!("vol {}%", volume)
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC),
            )
            .ratio(ratio)
            .label(label),
        inner[2],
    );
}
