//! In-memory fragment store

use std::collections::BTreeMap;
use std::io;

use super::{Entry, FragmentStore, ROOT, check_path};

/// Fragment store backed by a map of paths to sources
///
/// Directories are implied by the paths of the files they contain.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given `(path, content)` pairs
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let mut store = Self::new();
        for (path, content) in files {
            store.insert(path, content);
        }
        store
    }

    /// Add or replace the file at `path`
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("open {}: file does not exist", path))
}

impl FragmentStore for MemoryStore {
    fn read(&self, path: &str) -> io::Result<String> {
        check_path(path)?;
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn read_dir(&self, dir: &str) -> io::Result<Vec<Entry>> {
        check_path(dir)?;
        if self.files.contains_key(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{}: not a directory", dir),
            ));
        }

        let prefix = if dir == ROOT { String::new() } else { format!("{}/", dir) };
        let mut entries: Vec<Entry> = Vec::new();
        for path in self.files.range(prefix.clone()..).map(|(path, _)| path) {
            let Some(rest) = path.strip_prefix(&prefix) else {
                break;
            };
            let (name, is_dir) = match rest.split_once('/') {
                Some((name, _)) => (name, true),
                None => (rest, false),
            };
            if entries.last().is_none_or(|last| last.name != name) {
                entries.push(Entry {
                    name: name.to_string(),
                    is_dir,
                });
            }
        }

        if entries.is_empty() && dir != ROOT {
            return Err(not_found(dir));
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
