//! Shard discovery and consolidation.
//!
//! Shard upload directories are unioned into a single input tree before the
//! merge tool runs. When two shards ship a file under the same relative
//! path, the first shard in listing order wins and later copies are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Lists the immediate subdirectories of `all_reports_dir` whose name starts
/// with `prefix`, sorted by name.
///
/// Non-directory entries and entries with non-UTF-8 names are ignored.
/// Sorting makes the first-wins collision policy independent of the
/// filesystem's enumeration order.
pub fn discover_shard_dirs(all_reports_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(all_reports_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(prefix) && entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// Copies the contents of every shard directory into `dest`, preserving
/// relative paths. Returns the number of files copied.
///
/// A file is only copied when nothing exists at its destination path yet,
/// so the earliest shard supplying a given path wins.
pub fn consolidate_shards(shard_dirs: &[PathBuf], dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)?;

    let mut copied = 0;
    for shard_dir in shard_dirs {
        copied += copy_tree_first_wins(shard_dir, dest)?;
    }
    Ok(copied)
}

fn copy_tree_first_wins(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dest_path)?;
            copied += copy_tree_first_wins(&src_path, &dest_path)?;
        } else if dest_path.exists() {
            tracing::debug!(path = ?dest_path, "skipping duplicate shard file");
        } else {
            fs::copy(&src_path, &dest_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Moves every top-level entry of `from` into `to`, then removes the emptied
/// `from` directory.
///
/// Entries are renamed when possible; a rename failure (e.g. across
/// filesystems) falls back to copy-and-delete.
pub fn move_dir_entries(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)?;

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let src = entry.path();
        let dest = to.join(entry.file_name());

        if fs::rename(&src, &dest).is_err() {
            tracing::debug!(src = ?src, dest = ?dest, "rename failed, copying instead");
            if src.is_dir() {
                copy_tree(&src, &dest)?;
                fs::remove_dir_all(&src)?;
            } else {
                fs::copy(&src, &dest)?;
                fs::remove_file(&src)?;
            }
        }
    }

    fs::remove_dir(from)?;
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_tree(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}
