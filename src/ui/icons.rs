// src/ui/icons.rs
//! Icon mappings for file types in the browser.

/// Get the appropriate icon for a file or directory entry.
pub fn icon_for_entry(is_dir: bool, is_audio: bool) -> &'static str {
    if is_dir {
        "\u{f07b}" // folder icon
    } else if is_audio {
        "\u{f1c7}" // audio file icon
    } else {
        "\u{f15b}" // plain file icon
    }
}
