//! Platform-specific utilities
//!
//! Locates the external programs the server drives (`yt-dlp`, `ffmpeg`) and
//! produces per-OS installation hints when they are missing.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Platform-specific executable extension
pub fn exe_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        ".exe"
    }
    #[cfg(not(target_os = "windows"))]
    {
        ""
    }
}

/// Locate a helper binary.
///
/// Search order:
/// 1. Next to the current executable (bundled)
/// 2. System PATH
/// 3. Common installation paths
pub fn find_binary(name: &str) -> Option<PathBuf> {
    if let Some(bundled) = find_bundled(name) {
        info!("Using bundled {}: {:?}", name, bundled);
        return Some(bundled);
    }

    if let Ok(path) = which::which(name) {
        info!("Using system {}: {:?}", name, path);
        return Some(path);
    }

    if let Some(common) = find_in_common_paths(name) {
        info!("Using {} from common path: {:?}", name, common);
        return Some(common);
    }

    warn!("{} not found", name);
    None
}

/// Locate yt-dlp
pub fn find_ytdlp() -> Option<PathBuf> {
    find_binary("yt-dlp")
}

/// Locate ffmpeg
pub fn find_ffmpeg() -> Option<PathBuf> {
    find_binary("ffmpeg")
}

fn find_bundled(name: &str) -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;

    let adjacent = exe_dir.join(format!("{}{}", name, exe_extension()));
    debug!("Checking bundled path: {:?}", adjacent);
    if adjacent.is_file() && is_executable(&adjacent) {
        return Some(adjacent);
    }

    // macOS app bundle: App.app/Contents/MacOS/<exe> with helpers in Resources/bin
    #[cfg(target_os = "macos")]
    {
        if exe_dir.ends_with("MacOS") {
            let bundle_path = exe_dir.parent()?.join("Resources").join("bin").join(name);
            if bundle_path.is_file() && is_executable(&bundle_path) {
                return Some(bundle_path);
            }
        }
    }

    None
}

fn find_in_common_paths(name: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"]
        .iter()
        .map(|dir| Path::new(dir).join(name))
        .collect();

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local").join("bin").join(name));
    }

    candidates
        .into_iter()
        .find(|path| path.is_file() && is_executable(path))
}

/// Check if a file is executable
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

/// Human-readable FFmpeg installation instructions for the current OS
pub fn ffmpeg_installation_guide() -> String {
    installation_guide_for(std::env::consts::OS)
}

fn installation_guide_for(os: &str) -> String {
    let steps = match os {
        "windows" => {
            "Install FFmpeg on Windows:\n\
             - Using Chocolatey: choco install ffmpeg\n\
             - Using Scoop: scoop install ffmpeg\n\
             - Or download from https://ffmpeg.org/download.html and add it to PATH"
        }
        "macos" => {
            "Install FFmpeg on macOS:\n\
             - Using Homebrew: brew install ffmpeg\n\
             - Using MacPorts: sudo port install ffmpeg"
        }
        "linux" => {
            "Install FFmpeg on Linux:\n\
             - Ubuntu/Debian: sudo apt install ffmpeg\n\
             - Fedora: sudo dnf install ffmpeg\n\
             - Arch: sudo pacman -S ffmpeg"
        }
        _ => "Download FFmpeg from https://ffmpeg.org/download.html and add it to PATH",
    };

    format!(
        "{}\n\nAfter installing, restart the server so FFmpeg can be detected.",
        steps
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_binary_missing() {
        assert!(find_binary("definitely-not-a-real-binary-xyz").is_none());
    }

    #[test]
    fn test_guide_windows() {
        let guide = installation_guide_for("windows");
        assert!(guide.contains("choco install ffmpeg"));
        assert!(guide.contains("Windows"));
    }

    #[test]
    fn test_guide_macos() {
        let guide = installation_guide_for("macos");
        assert!(guide.contains("brew install ffmpeg"));
    }

    #[test]
    fn test_guide_linux() {
        let guide = installation_guide_for("linux");
        assert!(guide.contains("sudo apt install ffmpeg"));
        assert!(guide.contains("dnf"));
    }

    #[test]
    fn test_guide_unknown_os() {
        assert!(installation_guide_for("plan9").contains("ffmpeg.org"));
    }

    #[test]
    fn test_current_guide_not_empty() {
        assert!(ffmpeg_installation_guide().contains("FFmpeg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable() {
        let path = PathBuf::from("/bin/sh");
        if path.exists() {
            assert!(is_executable(&path));
        }
        assert!(!is_executable(Path::new("/definitely/missing")));
    }
}
