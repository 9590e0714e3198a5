//! Fragment store over a directory on disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{Entry, FragmentStore, ROOT, check_path};

/// Fragment store rooted at a directory
///
/// Fragment names are file paths with the root prefix removed, so
/// `templates/reviews/show.tmpl` is read as `reviews/show.tmpl` from a store
/// rooted at `templates`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!(root = %root.display(), "DirStore::new: called");
        Self { root }
    }

    fn full_path(&self, path: &str) -> io::Result<PathBuf> {
        check_path(path)?;
        if path == ROOT {
            return Ok(self.root.clone());
        }
        Ok(path.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg)))
    }

    fn logical_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl FragmentStore for DirStore {
    fn read(&self, path: &str) -> io::Result<String> {
        let full = self.full_path(path)?;
        fs::read_to_string(&full).map_err(|e| io::Error::new(e.kind(), format!("open {}: {}", path, e)))
    }

    fn read_dir(&self, dir: &str) -> io::Result<Vec<Entry>> {
        let full = self.full_path(dir)?;
        let mut entries = Vec::new();
        for entry in fs::read_dir(&full)? {
            let entry = entry?;
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn walk(&self, dir: &str) -> io::Result<Vec<String>> {
        let full = self.full_path(dir)?;
        if !fs::metadata(&full)?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{}: not a directory", dir),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&full).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_dir() {
                continue;
            }
            files.push(self.logical_name(entry.path()));
        }
        debug!(%dir, count = files.len(), "DirStore::walk: done");
        Ok(files)
    }
}
