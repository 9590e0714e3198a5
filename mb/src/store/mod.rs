//! Fragment stores
//!
//! Read-only access to template sources addressed by logical paths:
//! `/`-separated, relative to the store root, with `.` naming the root itself.
//!
//! - [`DirStore`] - a directory on disk
//! - [`MemoryStore`] - an in-memory map of paths to sources
//! - [`SubStore`] - another store viewed below a prefix

mod dir;
mod memory;
mod sub;

use std::io;

pub use dir::DirStore;
pub use memory::MemoryStore;
pub use sub::SubStore;

use crate::fragment;

/// The store root
pub const ROOT: &str = ".";

/// A directory entry returned by [`FragmentStore::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Name within the directory (not the full path)
    pub name: String,
    pub is_dir: bool,
}

/// Read-only access to template sources
pub trait FragmentStore: Send + Sync {
    /// Read the file at `path`
    fn read(&self, path: &str) -> io::Result<String>;

    /// List the entries of `dir`, sorted by name
    fn read_dir(&self, dir: &str) -> io::Result<Vec<Entry>>;

    /// List every file below `dir`, depth first in lexical order
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when `dir` does not exist and
    /// [`io::ErrorKind::NotADirectory`] when it names a file.
    fn walk(&self, dir: &str) -> io::Result<Vec<String>> {
        let mut files = Vec::new();
        walk_into(self, dir, &mut files)?;
        Ok(files)
    }
}

fn walk_into<S: FragmentStore + ?Sized>(store: &S, dir: &str, files: &mut Vec<String>) -> io::Result<()> {
    for entry in store.read_dir(dir)? {
        let path = join(dir, &entry.name);
        if entry.is_dir {
            walk_into(store, &path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

impl<S: FragmentStore + ?Sized> FragmentStore for std::sync::Arc<S> {
    fn read(&self, path: &str) -> io::Result<String> {
        (**self).read(path)
    }

    fn read_dir(&self, dir: &str) -> io::Result<Vec<Entry>> {
        (**self).read_dir(dir)
    }

    fn walk(&self, dir: &str) -> io::Result<Vec<String>> {
        (**self).walk(dir)
    }
}

/// Whether `path` is a usable logical path
///
/// Either the root `.` or non-empty segments separated by single slashes,
/// none of them `.` or `..`.
pub fn is_valid_path(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    !path.is_empty() && path.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

pub(crate) fn check_path(path: &str) -> io::Result<()> {
    if is_valid_path(path) {
        Ok(())
    } else {
        Err(io::Error::new(io::ErrorKind::InvalidInput, format!("invalid path: {:?}", path)))
    }
}

/// Join a directory and a relative name, treating `.` as the root
pub fn join(dir: &str, name: &str) -> String {
    match (dir, name) {
        (ROOT, name) => name.to_string(),
        (dir, ROOT) => dir.to_string(),
        (dir, name) => format!("{}/{}", dir, name),
    }
}

/// List the renderable pages below `dir`
///
/// Partials and anything under a `layouts` segment are skipped. A missing
/// `dir` yields no pages.
pub fn pages(store: &dyn FragmentStore, dir: &str) -> io::Result<Vec<String>> {
    let files = match store.walk(dir) {
        Ok(files) => files,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    Ok(files
        .into_iter()
        .filter(|name| !fragment::is_partial(name) && !fragment::is_layout(name))
        .collect())
}
