use directories::UserDirs;
use serde::Serialize;

use crate::scope_path;

/// A well-known home folder surfaced to clients as a starting point.
#[derive(Debug, Clone, Serialize)]
pub struct ShortcutFolder {
    pub name: String,
    pub path: String,
}

/// The usual home shortcuts (Desktop, Documents, ...) that actually exist on
/// this machine, with normalized paths.
pub fn shortcut_folders() -> Vec<ShortcutFolder> {
    let Some(user_dirs) = UserDirs::new() else {
        return Vec::new();
    };

    let candidates = [
        ("Desktop", user_dirs.desktop_dir()),
        ("Documents", user_dirs.document_dir()),
        ("Downloads", user_dirs.download_dir()),
        ("Pictures", user_dirs.picture_dir()),
        ("Music", user_dirs.audio_dir()),
        ("Videos", user_dirs.video_dir()),
    ];

    candidates
        .iter()
        .filter_map(|(name, dir)| {
            let dir = (*dir)?;
            if !dir.is_dir() {
                return None;
            }
            Some(ShortcutFolder {
                name: (*name).to_string(),
                path: scope_path::normalize(&dir.to_string_lossy()),
            })
        })
        .collect()
}

/// Where a client should land on first open: the Desktop when it exists,
/// the home directory otherwise.
pub fn default_start_path() -> Option<String> {
    let user_dirs = UserDirs::new()?;
    let start = user_dirs
        .desktop_dir()
        .filter(|d| d.is_dir())
        .unwrap_or_else(|| user_dirs.home_dir());
    Some(scope_path::normalize(&start.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_folders_are_existing_dirs() {
        for shortcut in shortcut_folders() {
            assert!(std::path::Path::new(&shortcut.path).is_dir(), "{shortcut:?}");
            assert!(!shortcut.name.is_empty());
        }
    }

    #[test]
    fn test_default_start_path_is_normalized() {
        if let Some(path) = default_start_path() {
            assert!(!path.contains('\\'));
            assert!(path.len() == 1 || !path.ends_with('/'));
        }
    }
}
