//! File system utilities.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

const LINK_BACKUP_SUFFIX: &str = ".rulesmgr-old";

/// A regular file found directly inside a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Create a directory and all of its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// True when `path` itself is a symbolic link (the link is not followed).
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// List regular files directly under `dir`, sorted by name.
///
/// Symlinks and subdirectories are not returned. A missing directory yields
/// an empty list.
pub fn list_files(dir: &Path, extension: Option<&str>) -> Result<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(ext) = extension
            && !name.ends_with(ext)
        {
            continue;
        }
        files.push(FileEntry {
            name,
            path: entry.into_path(),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write `content` to `dest`, creating parent directories as needed.
pub fn write_file(dest: &Path, content: &str) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    fs::write(dest, content).map_err(|e| Error::io(dest, e))
}

/// Like [`write_file`], but `dest` always ends up a regular file.
///
/// A symlink at `dest` is removed rather than written through, so the file it
/// points at is never touched.
pub fn write_regular_file(dest: &Path, content: &str) -> Result<()> {
    ensure_replaceable(dest)?;
    if is_symlink(dest) {
        fs::remove_file(dest).map_err(|e| Error::io(dest, e))?;
    }
    write_file(dest, content)
}

/// Rule targets may replace files and links, never a real directory.
fn ensure_replaceable(dest: &Path) -> Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => Err(Error::TargetIsDirectory {
            path: dest.to_path_buf(),
        }),
        _ => Ok(()),
    }
}

/// Runs the operation. If it fails, runs the rollback before returning the error.
pub fn with_rollback<T, F, C>(f: F, rollback: C) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    C: FnOnce(),
{
    match f() {
        Ok(value) => Ok(value),
        Err(e) => {
            rollback();
            Err(e)
        }
    }
}

/// Point `dest` at `src` with a symbolic link, replacing whatever is there.
///
/// The link target is always absolute. An existing file or link is moved aside
/// first and only deleted once the new link exists; if link creation fails the
/// old entry is put back. A directory at `dest` is an error.
pub fn link_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    let src = std::path::absolute(src).map_err(|e| Error::io(src, e))?;
    ensure_replaceable(dest)?;

    let occupied = fs::symlink_metadata(dest).is_ok();
    if !occupied {
        return symlink(&src, dest);
    }

    let backup = backup_path(dest);
    fs::rename(dest, &backup).map_err(|e| Error::io(dest, e))?;

    with_rollback(
        || symlink(&src, dest),
        || {
            if let Err(e) = fs::rename(&backup, dest) {
                tracing::warn!(path = %dest.display(), error = %e, "Failed to restore previous file");
            }
        },
    )?;

    fs::remove_file(&backup).map_err(|e| Error::io(&backup, e))
}

/// Outcome of copying a settings directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
}

/// Copy a directory tree into `dst` without overwriting files that already
/// exist there. Symbolic links are recreated as links.
pub fn copy_dir_missing(src: &Path, dst: &Path) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    copy_dir_into(src, dst, &mut stats)?;
    Ok(stats)
}

fn copy_dir_into(src: &Path, dst: &Path, stats: &mut CopyStats) -> Result<()> {
    ensure_dir(dst)?;

    for entry in WalkDir::new(src).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let ty = entry.file_type();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_into(entry.path(), &dst_path, stats)?;
            continue;
        }

        if fs::symlink_metadata(&dst_path).is_ok() {
            stats.kept.push(dst_path);
            continue;
        }

        if ty.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
            symlink(&target, &dst_path)?;
        } else {
            fs::copy(entry.path(), &dst_path).map_err(|e| Error::io(&dst_path, e))?;
        }
        stats.copied.push(dst_path);
    }
    Ok(())
}

fn backup_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(LINK_BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn symlink(src: &Path, dest: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(src, dest).map_err(|e| Error::io(dest, e))?;

    #[cfg(windows)]
    {
        let linked = if src.is_dir() {
            std::os::windows::fs::symlink_dir(src, dest)
        } else {
            std::os::windows::fs::symlink_file(src, dest)
        };
        linked.map_err(|e| Error::io(dest, e))?;
    }

    Ok(())
}

pub(crate) fn walk_error(dir: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    Error::io(path, source)
}
