// src/fs/mod.rs
//! Filesystem module - directory listing and audio file detection.

use std::fs;
use std::path::Path;

/// Extensions rodio can decode with the enabled feature set.
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a", "aac"];

/// One row of the file browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub is_audio: bool,
}

/// Whether a path looks like a playable audio file, by extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Load the entries of `dir`, sorted case-insensitively with directories
/// first. Unreadable directories yield an empty list rather than an error;
/// the browser just shows nothing to enter.
pub fn load_entries(dir: &Path) -> Vec<Entry> {
    let Ok(read) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut list: Vec<Entry> = read
        .filter_map(Result::ok)
        .map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let path = e.path();
            let is_dir = path.is_dir();
            Entry {
                is_audio: !is_dir && is_audio_file(&path),
                name,
                is_dir,
            }
        })
        .collect();
    list.sort_by_key(|e| (!e.is_dir, e.name.to_lowercase()));
    list
}

/// Last `n` components of a path, for compact titles.
pub fn tail_path(path: &Path, n: usize) -> String {
    let components: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if components.len() <= n {
        path.display().to_string()
    } else {
        let tail = &components[components.len() - n..];
        format!(".../{}", tail.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn detects_audio_by_extension_case_insensitively() {
        assert!(is_audio_file(Path::new("song.mp3")));
        assert!(is_audio_file(Path::new("song.FLAC")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("noext")));
    }

    #[test]
    fn entries_sort_directories_first() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.mp3")).unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        std::fs::create_dir(dir.path().join("zsub")).unwrap();

        let entries = load_entries(dir.path());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["zsub", "a.txt", "b.mp3"]);
        assert!(entries[0].is_dir);
        assert!(entries[2].is_audio);
    }

    #[test]
    fn unreadable_directory_yields_empty_list() {
        let missing = PathBuf::from("/definitely/not/here");
        assert!(load_entries(&missing).is_empty());
    }

    #[test]
    fn tail_path_keeps_last_components() {
        let p = Path::new("/home/user/music/rock");
        assert_eq!(tail_path(p, 2), ".../music/rock");
        assert_eq!(tail_path(Path::new("short"), 3), "short");
    }
}
