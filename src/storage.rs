/// Platform directory layout and sound path resolution
///
/// Everything the app writes lives under the platform data dir:
///   data/profiles/      saved button layouts (JSON)
///   data/recordings/    microphone takes (WAV)
///   data/logs/          daily log files
/// Settings go to the platform config dir.
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Qualifier/org/app triple for ProjectDirs
const APP_NAME: &str = "Padboard";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Root of the app data dir; falls back to the current dir when the
/// platform refuses to give us one (headless CI, odd sandboxes)
pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Directory for saved profiles
pub fn profiles_dir() -> PathBuf {
    data_dir().join("profiles")
}

/// Directory for microphone takes
pub fn recordings_dir() -> PathBuf {
    data_dir().join("recordings")
}

/// Directory for log files
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Path of the persisted app settings
pub fn settings_path() -> PathBuf {
    project_dirs()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("settings.json")
}

/// Create the data directories; called once on startup
pub fn ensure_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(profiles_dir())?;
    std::fs::create_dir_all(recordings_dir())?;
    std::fs::create_dir_all(logs_dir())?;
    if let Some(parent) = settings_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Resolve a button's sound path
///
/// Absolute paths pass through; relative paths resolve against the data
/// dir so profiles that reference app recordings stay portable.
pub fn resolve_sound_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir().join(path)
    }
}

/// Make a path relative to the data dir when it lives inside it
/// (used when assigning files, so saved profiles avoid machine-specific
/// absolute paths where possible)
pub fn relativize_sound_path(path: &Path) -> PathBuf {
    match path.strip_prefix(data_dir()) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_resolve_under_data_dir() {
        let rel = Path::new("recordings/take.wav");
        let resolved = resolve_sound_path(rel);
        assert!(resolved.ends_with("recordings/take.wav"));
        assert!(resolved.is_absolute() || data_dir() == PathBuf::from("."));
    }

    #[test]
    fn test_absolute_paths_pass_through() {
        let abs = if cfg!(windows) {
            PathBuf::from(r"C:\clips\horn.wav")
        } else {
            PathBuf::from("/clips/horn.wav")
        };
        assert_eq!(resolve_sound_path(&abs), abs);
    }

    #[test]
    fn test_relativize_inverts_resolve_for_app_files() {
        let rel = Path::new("recordings/take.wav");
        let resolved = resolve_sound_path(rel);
        assert_eq!(relativize_sound_path(&resolved), rel);
    }

    #[test]
    fn test_relativize_keeps_foreign_paths() {
        let abs = if cfg!(windows) {
            PathBuf::from(r"C:\elsewhere\horn.wav")
        } else {
            PathBuf::from("/elsewhere/horn.wav")
        };
        assert_eq!(relativize_sound_path(&abs), abs);
    }
}
