// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Visibility state for UI sections.
#[derive(Debug, Clone, Copy)]
pub struct SectionVisibility {
    pub files: bool,
    pub player: bool,
    pub visualizer: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            files: true,
            player: true,
            visualizer: true,
        }
    }
}

impl SectionVisibility {
    /// Toggle a section by number (1-3).
    pub fn toggle(&mut self, section: usize) {
        match section {
            1 => self.files = !self.files,
            2 => self.player = !self.player,
            3 => self.visualizer = !self.visualizer,
            _ => {}
        }
    }
}

/// Computed layout areas for rendering.
pub struct ComputedLayout {
    /// Bottom visualizer area (if visible)
    pub visualizer_area: Option<Rect>,
    /// Column areas within the main area
    pub columns: Vec<Rect>,
    /// Order of sections in columns
    pub section_order: Vec<&'static str>,
}

/// Compute the layout based on total area and section visibility.
pub fn compute_layout(area: Rect, visibility: &SectionVisibility) -> ComputedLayout {
    // The visualizer takes the bottom half of the terminal when enabled;
    // otherwise the browser and player get the whole area.
    let (main_area, visualizer_area) = if visibility.visualizer {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (vertical_chunks[0], Some(vertical_chunks[1]))
    } else {
        (area, None)
    };

    // Build column weights dynamically based on visible sections
    let mut section_order = Vec::new();
    let mut weights = Vec::new();

    if visibility.files {
        section_order.push("files");
        weights.push(40u16);
    }
    if visibility.player {
        section_order.push("player");
        weights.push(60u16);
    }

    let columns: Vec<Rect> = if !weights.is_empty() {
        let sum: u16 = weights.iter().copied().sum();
        let constraints: Vec<Constraint> = weights
            .into_iter()
            .map(|w| Constraint::Percentage((w as u32 * 100 / sum as u32) as u16))
            .collect();
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(main_area)
            .iter()
            .cloned()
            .collect()
    } else {
        // If no columns visible, create a single full-width column
        vec![main_area]
    };

    ComputedLayout {
        visualizer_area,
        columns,
        section_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiding_the_visualizer_frees_the_bottom_half() {
        let area = Rect::new(0, 0, 100, 40);
        let mut visibility = SectionVisibility::default();
        let layout = compute_layout(area, &visibility);
        assert!(layout.visualizer_area.is_some());

        visibility.toggle(3);
        let layout = compute_layout(area, &visibility);
        assert!(layout.visualizer_area.is_none());
        assert_eq!(layout.columns.len(), 2);
    }

    #[test]
    fn all_columns_hidden_leaves_one_full_width_area() {
        let area = Rect::new(0, 0, 100, 40);
        let visibility = SectionVisibility {
            files: false,
            player: false,
            visualizer: false,
        };
        let layout = compute_layout(area, &visibility);
        assert_eq!(layout.columns, vec![area]);
        assert!(layout.section_order.is_empty());
    }
}
