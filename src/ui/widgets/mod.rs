// src/ui/widgets/mod.rs
//! Custom widgets for the prism UI.

pub mod file_list;
pub mod player_panel;
pub mod visualizer_view;

// Re-export widget rendering functions
pub use file_list::render_file_list;
pub use player_panel::render_player_panel;
pub use visualizer_view::render_visualizer;
