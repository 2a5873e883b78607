//! Filesystem helpers for the download path

use path_absolutize::Absolutize;
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::Disks;
use tracing::{debug, warn};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Problems found while validating a download directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathIssue {
    /// The directory does not exist and could not be created
    CreateFailed(String),
    /// The path exists but is a file
    NotADirectory,
    /// Files cannot be created inside the directory
    NotWritable,
    /// Free space is below the required minimum
    InsufficientSpace { required_mb: u64 },
}

impl std::fmt::Display for PathIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathIssue::CreateFailed(reason) => write!(f, "Cannot create directory: {}", reason),
            PathIssue::NotADirectory => write!(f, "Path exists but is not a directory"),
            PathIssue::NotWritable => write!(f, "Directory is not writable"),
            PathIssue::InsufficientSpace { required_mb } => {
                write!(f, "Insufficient disk space (need {}MB)", required_mb)
            }
        }
    }
}

/// Free bytes on the disk holding `path`, if the disk can be identified.
pub fn available_space(path: &Path) -> Option<u64> {
    let absolute = path.absolutize().ok()?.into_owned();
    let disks = Disks::new_with_refreshed_list();

    disks
        .list()
        .iter()
        .filter(|disk| absolute.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space())
}

/// Whether at least `required_mb` megabytes are free at `path`.
///
/// Returns `true` when free space cannot be determined.
pub fn check_disk_space(path: &Path, required_mb: u64) -> bool {
    match available_space(path) {
        Some(free) => {
            let free_mb = free / BYTES_PER_MB;
            debug!("Free space at {}: {}MB (need {}MB)", path.display(), free_mb, required_mb);
            free_mb >= required_mb
        }
        None => {
            warn!("Could not determine free space for {}", path.display());
            true
        }
    }
}

/// Whether a file can be created inside `path`.
pub fn check_directory_writable(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }

    let probe = path.join(format!(".write_test_{}", std::process::id()));
    match fs::write(&probe, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

/// Size of a regular file in bytes.
pub fn get_file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Check that `path` can receive a download of at least `min_space_mb`.
///
/// Missing directories are created.
pub fn validate_download_path(path: &Path, min_space_mb: u64) -> Result<(), PathIssue> {
    if path.exists() && !path.is_dir() {
        return Err(PathIssue::NotADirectory);
    }

    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| PathIssue::CreateFailed(e.to_string()))?;
    }

    if !check_directory_writable(path) {
        return Err(PathIssue::NotWritable);
    }

    if !check_disk_space(path, min_space_mb) {
        return Err(PathIssue::InsufficientSpace {
            required_mb: min_space_mb,
        });
    }

    Ok(())
}

/// First free name for `filename` in `dir`: `name.ext`, then `name (1).ext`, ...
pub fn get_unique_filename(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    };

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disk_space_zero_requirement() {
        let dir = TempDir::new().unwrap();
        assert!(check_disk_space(dir.path(), 0));
    }

    #[test]
    fn test_disk_space_absurd_requirement() {
        let dir = TempDir::new().unwrap();
        // Either the disk is found and is too small, or lookup fails open
        let ok = check_disk_space(dir.path(), u64::MAX / BYTES_PER_MB);
        assert_eq!(ok, available_space(dir.path()).is_none());
    }

    #[test]
    fn test_writable_directory() {
        let dir = TempDir::new().unwrap();
        assert!(check_directory_writable(dir.path()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_not_writable() {
        let dir = TempDir::new().unwrap();
        assert!(!check_directory_writable(&dir.path().join("missing")));
    }

    #[test]
    fn test_file_size() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        fs::write(&file, b"Hello, World!").unwrap();

        assert_eq!(get_file_size(&file), Some(13));
        assert_eq!(get_file_size(&dir.path().join("missing.txt")), None);
        assert_eq!(get_file_size(dir.path()), None);
    }

    #[test]
    fn test_validate_download_path_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("new_dir");
        assert_eq!(validate_download_path(&target, 0), Ok(()));
        assert!(target.is_dir());
    }

    #[test]
    fn test_validate_download_path_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, b"x").unwrap();
        assert_eq!(
            validate_download_path(&file, 0),
            Err(PathIssue::NotADirectory)
        );
    }

    #[test]
    fn test_unique_filename() {
        let dir = TempDir::new().unwrap();
        assert_eq!(get_unique_filename(dir.path(), "test.mp4"), dir.path().join("test.mp4"));

        fs::write(dir.path().join("test.mp4"), b"").unwrap();
        assert_eq!(
            get_unique_filename(dir.path(), "test.mp4"),
            dir.path().join("test (1).mp4")
        );

        fs::write(dir.path().join("test (1).mp4"), b"").unwrap();
        assert_eq!(
            get_unique_filename(dir.path(), "test.mp4"),
            dir.path().join("test (2).mp4")
        );
    }

    #[test]
    fn test_unique_filename_without_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes"), b"").unwrap();
        assert_eq!(
            get_unique_filename(dir.path(), "notes"),
            dir.path().join("notes (1)")
        );
    }

    #[test]
    fn test_path_issue_messages() {
        assert!(PathIssue::NotWritable.to_string().contains("not writable"));
        assert!(PathIssue::InsufficientSpace { required_mb: 100 }
            .to_string()
            .contains("100MB"));
    }
}
