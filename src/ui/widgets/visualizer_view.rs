// src/ui/widgets/visualizer_view.rs
//! Terminal presentation of the visualizer's drawing surface.
//!
//! Each terminal cell shows two vertically stacked pixels through the upper
//! half block: foreground carries the top pixel, background the bottom one.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::render::{Canvas, Rgb};
use crate::viz::Visualizer;

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn canvas_lines(canvas: &Canvas, cols: u16, rows: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(rows as usize);
    for row in 0..rows as usize {
        let mut spans = Vec::with_capacity(cols as usize);
        for col in 0..cols as usize {
            let top = canvas.pixel(col, row * 2).unwrap_or(Rgb::new(0, 0, 0));
            let bottom = canvas
                .pixel(col, row * 2 + 1)
                .unwrap_or(Rgb::new(0, 0, 0));
            spans.push(Span::styled(
                "▀",
                Style::default().fg(to_color(top)).bg(to_color(bottom)),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Render the visualizer pane: the live canvas while rendering, the loading
/// overlay during graph acquisition, and a hint otherwise.
pub fn render_visualizer(f: &mut Frame<'_>, area: Rect, engine: &Visualizer) {
    let block = Block::default().borders(Borders::ALL).title("3: Visualizer");
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if engine.is_active() {
        if let Some(canvas) = engine.canvas() {
            f.render_widget(
                Paragraph::new(canvas_lines(canvas, inner.width, inner.height)),
                inner,
            );
            return;
        }
    }

    let message = if engine.overlay_visible() {
        "⏳ Preparing audio engine..."
    } else {
        "Play a track to start the visualizer"
    };
    let centered = Rect::new(
        inner.x,
        inner.y + inner.height / 2,
        inner.width,
        1.min(inner.height),
    );
    f.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        centered,
    );
}
