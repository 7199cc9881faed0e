// src/app/state.rs
//! Application state management.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, widgets::ListState};
use tracing::warn;

use crate::{
    audio::{MusicPlayer, VolumeSync},
    config,
    fs::{Entry, load_entries, tail_path},
    ui::{
        keybindings::{NavigationAction, key_to_action},
        layout::{SectionVisibility, compute_layout},
        widgets::{render_file_list, render_player_panel, render_visualizer},
    },
    viz::{EngineOptions, SettingsUpdate, Visualizer},
};

const VOLUME_STEP: u8 = 5;
const DEFAULT_VOLUME: u8 = 70;

/// Main application state.
pub struct App {
    /// Current directory being browsed
    pub current_dir: PathBuf,
    /// Directory entries
    pub entries: Vec<Entry>,
    /// List widget state
    pub state: ListState,
    /// Currently selected index
    pub selected: usize,

    /// Music player instance, shared with the visualizer engine as its
    /// media host
    pub player: Arc<MusicPlayer>,
    /// Elapsed playback time in seconds
    pub elapsed: u64,
    /// Index of currently playing track in entries (if any)
    pub current_track_index: Option<usize>,

    /// Visualizer engine
    pub engine: Visualizer,
    /// Mirrors the volume slider and mute onto the graph's gain stage
    volume_sync: VolumeSync,
    /// Volume slider position, 0..=100
    pub volume: u8,

    /// Section visibility state
    pub visibility: SectionVisibility,
}

impl App {
    /// Create a new application instance.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut state = ListState::default();
        state.select(Some(0));

        let player = Arc::new(MusicPlayer::new());
        player.set_volume_percent(DEFAULT_VOLUME);

        let mut engine = Visualizer::new(player.clone(), EngineOptions::default());
        engine.update_settings(&config::load_settings().into());
        let volume_sync = VolumeSync::new(engine.graph().gain());

        Ok(Self {
            current_dir: cwd.clone(),
            entries: load_entries(&cwd),
            state,
            selected: 0,

            player,
            elapsed: 0,
            current_track_index: None,

            engine,
            volume_sync,
            volume: DEFAULT_VOLUME,
            visibility: SectionVisibility::default(),
        })
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let action = key_to_action(&key);

        match action {
            NavigationAction::ToggleSection(d) => {
                self.visibility.toggle(d);
            }
            NavigationAction::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            NavigationAction::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            NavigationAction::Enter => {
                if !self.entries.is_empty() {
                    let entry = &self.entries[self.selected];
                    if entry.is_dir {
                        self.current_dir.push(&entry.name);
                        self.entries = load_entries(&self.current_dir);
                        self.selected = 0;
                    } else if entry.is_audio {
                        self.play_entry(self.selected);
                    }
                }
            }
            NavigationAction::TogglePause => {
                if self.player.is_paused() {
                    self.player.resume();
                } else {
                    self.player.pause();
                }
            }
            NavigationAction::Stop => {
                self.player.stop();
                self.elapsed = 0;
                self.current_track_index = None;
            }
            NavigationAction::NextTrack => {
                self.play_adjacent_track(1);
            }
            NavigationAction::PreviousTrack => {
                self.play_adjacent_track(-1);
            }
            NavigationAction::VolumeUp => {
                self.set_volume(self.volume.saturating_add(VOLUME_STEP).min(100));
            }
            NavigationAction::VolumeDown => {
                self.set_volume(self.volume.saturating_sub(VOLUME_STEP));
            }
            NavigationAction::ToggleMute => {
                let muted = !self.volume_sync.is_muted();
                self.volume_sync.on_mute_changed(muted);
            }
            NavigationAction::CycleStyle => {
                let style = self.engine.settings().style.cycle();
                self.engine.update_settings(&SettingsUpdate {
                    style: Some(style),
                    ..Default::default()
                });
                self.persist_settings();
            }
            NavigationAction::CyclePalette => {
                let palette = self.engine.settings().color_palette.cycle();
                self.engine.update_settings(&SettingsUpdate {
                    color_palette: Some(palette),
                    ..Default::default()
                });
                self.persist_settings();
            }
            NavigationAction::ToggleGlow => {
                let glow = !self.engine.settings().glow_enabled;
                self.engine.update_settings(&SettingsUpdate {
                    glow_enabled: Some(glow),
                    ..Default::default()
                });
                self.persist_settings();
            }
            NavigationAction::Back => {
                if self.current_dir.pop() {
                    self.entries = load_entries(&self.current_dir);
                    self.selected = 0;
                }
            }
            NavigationAction::Quit => {
                self.player.stop();
                self.persist_settings();
                return true; // Signal to quit
            }
            NavigationAction::None => {}
        }

        self.state.select(Some(self.selected));
        false
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
        self.player.set_volume_percent(volume);
        self.volume_sync.on_volume_changed(volume);
    }

    fn persist_settings(&self) {
        if let Err(err) = config::save_settings(&self.engine.settings()) {
            warn!(%err, "could not persist visualizer settings");
        }
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let area = f.area();
        let layout = compute_layout(area, &self.visibility);

        // Render visible columns in order
        let mut col_index = 0usize;

        for section in layout.section_order.iter() {
            match *section {
                "files" => {
                    if col_index < layout.columns.len() {
                        let title = format!("1: {}", tail_path(&self.current_dir, 3));
                        render_file_list(
                            f,
                            layout.columns[col_index],
                            &title,
                            &self.entries,
                            &mut self.state,
                        );
                    }
                    col_index += 1;
                }
                "player" => {
                    if col_index < layout.columns.len() {
                        let track_name = self
                            .current_track_index
                            .and_then(|i| self.entries.get(i))
                            .map(|e| e.name.as_str());
                        render_player_panel(
                            f,
                            layout.columns[col_index],
                            track_name,
                            self.elapsed,
                            self.player.is_playing(),
                            self.player.is_paused(),
                            self.volume,
                            self.volume_sync.is_muted(),
                            &self.engine.settings(),
                        );
                    }
                    col_index += 1;
                }
                _ => {}
            }
        }

        // Bottom pane: the visualizer surface, two pixels per cell row
        if let Some(visualizer_area) = layout.visualizer_area {
            let width = visualizer_area.width.saturating_sub(2) as usize;
            let height = visualizer_area.height.saturating_sub(2) as usize * 2;
            if width > 0 && height > 0 {
                self.engine.set_canvas(width, height);
            }
            render_visualizer(f, visualizer_area, &self.engine);
        }
    }

    /// Per-iteration housekeeping: auto-advance pickup, engine start/stop
    /// tracking playback and section visibility, and one visualizer frame.
    pub fn update(&mut self) {
        if self.player.take_advance_request() {
            self.play_adjacent_track(1);
        }

        let want_rendering = self.visibility.visualizer && self.player.is_playing();
        if want_rendering && !self.engine.is_active() {
            self.engine.start();
        } else if !want_rendering && self.engine.is_active() {
            self.engine.stop();
        }
        self.engine.on_frame();
    }

    /// Update elapsed time if playing.
    pub fn tick_elapsed(&mut self) {
        if self.player.is_playing() && !self.player.is_paused() {
            self.elapsed += 1;
        }
    }

    /// Play the next or previous audio track relative to current position.
    /// `direction`: 1 for next, -1 for previous.
    fn play_adjacent_track(&mut self, direction: i32) {
        // Get audio file indices
        let audio_indices: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_audio)
            .map(|(i, _)| i)
            .collect();

        if audio_indices.is_empty() {
            return;
        }

        // Find current position in audio files
        let current_audio_pos = self
            .current_track_index
            .and_then(|idx| audio_indices.iter().position(|&i| i == idx));

        let next_audio_pos = match current_audio_pos {
            Some(pos) => {
                let new_pos = pos as i32 + direction;
                if new_pos < 0 {
                    audio_indices.len() - 1 // Wrap to last
                } else if new_pos >= audio_indices.len() as i32 {
                    0 // Wrap to first
                } else {
                    new_pos as usize
                }
            }
            None => {
                // No track playing, start from first or last based on direction
                if direction > 0 { 0 } else { audio_indices.len() - 1 }
            }
        };

        let entry_idx = audio_indices[next_audio_pos];
        self.play_entry(entry_idx);
        self.selected = entry_idx;
        self.state.select(Some(entry_idx));
    }

    fn play_entry(&mut self, entry_idx: usize) {
        let path = self.current_dir.join(&self.entries[entry_idx].name);
        if self.player.play(&path).is_ok() {
            self.elapsed = 0;
            self.current_track_index = Some(entry_idx);
        }
    }
}
