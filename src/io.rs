//! Payload input and output for the command line tool.
//!
//! Inputs come from a file or stdin. Outputs go to stdout or are written to a
//! file atomically, so an interrupted run never leaves half an envelope behind.

use anyhow::{Context, Result};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Reads the whole payload from `path`, or from stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Writes `data` to `path`, or to stdout when `None`.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => write_atomic(path, data),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Replaces `path` with `data` in one step.
///
/// Data goes to a uniquely named sibling first, is synced, then renamed over
/// the target. Parent directories are created as needed.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = non_empty_parent(path) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = random_tmp_path(path)?;

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .context("failed to create temporary file")?;

    tmp_file.write_all(data)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    if let Err(e) = atomic_replace(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Some(parent) = non_empty_parent(path) {
        let dir = File::open(parent)?;
        dir.sync_all()?;
    }

    Ok(())
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// `<file name>.tmp.<16 hex chars>` next to `path`.
fn random_tmp_path(path: &Path) -> Result<PathBuf> {
    let mut buf = [0u8; 8];
    fill(&mut buf)?;

    let suffix = buf.iter().map(|b| format!("{:02x}", b)).collect::<String>();
    let file_name = path
        .file_name()
        .with_context(|| format!("{} is not a file path", path.display()))?
        .to_string_lossy();

    Ok(path.with_file_name(format!("{}.tmp.{}", file_name, suffix)))
}

#[cfg(target_os = "windows")]
fn atomic_replace(tmp_path: &Path, target: &Path) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{
        MOVEFILE_REPLACE_EXISTING, MOVEFILE_WRITE_THROUGH, MoveFileExW,
    };

    fn to_wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let target_w = to_wide(target.as_os_str());
    let tmp_w = to_wide(tmp_path.as_os_str());

    // SAFETY: both buffers are NUL-terminated UTF-16 and outlive the call.
    let result = unsafe {
        MoveFileExW(
            tmp_w.as_ptr(),
            target_w.as_ptr(),
            MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
        )
    };

    if result == 0 {
        let err = std::io::Error::last_os_error();
        return Err(err).context("atomic replace failed");
    }

    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn atomic_replace(tmp_path: &Path, target: &Path) -> Result<()> {
    fs::rename(tmp_path, target)
        .with_context(|| format!("failed to move output into {}", target.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_input_returns_file_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        fs::write(&path, b"hello world").unwrap();

        assert_eq!(read_input(Some(&path)).unwrap(), b"hello world");
    }

    #[test]
    fn read_input_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("missing"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_atomic(&path, &[42u8; 10_000]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();

        assert_eq!(entries, vec!["out.bin"]);
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("out.bin");

        write_atomic(&nested, b"data").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn tmp_paths_are_unique_siblings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let a = random_tmp_path(&path).unwrap();
        let b = random_tmp_path(&path).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.parent(), path.parent());
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("out.bin.tmp."));
    }

    #[test]
    fn tmp_path_requires_file_name() {
        assert!(random_tmp_path(Path::new("/")).is_err());
    }
}
