//! View of a store below a prefix

use std::io;

use super::{Entry, FragmentStore, ROOT, check_path, join};

/// A store seen from one of its directories
///
/// Useful when all templates live in `templates/` but should be addressed as
/// `reviews/index.tmpl` rather than `templates/reviews/index.tmpl`.
#[derive(Debug, Clone)]
pub struct SubStore<S> {
    inner: S,
    prefix: String,
}

impl<S: FragmentStore> SubStore<S> {
    /// View `inner` from `prefix`, which must be a valid path
    pub fn new(inner: S, prefix: impl Into<String>) -> io::Result<Self> {
        let prefix = prefix.into();
        check_path(&prefix)?;
        Ok(Self { inner, prefix })
    }

    fn inner_path(&self, path: &str) -> io::Result<String> {
        check_path(path)?;
        Ok(join(&self.prefix, path))
    }
}

impl<S: FragmentStore> FragmentStore for SubStore<S> {
    fn read(&self, path: &str) -> io::Result<String> {
        self.inner.read(&self.inner_path(path)?)
    }

    fn read_dir(&self, dir: &str) -> io::Result<Vec<Entry>> {
        self.inner.read_dir(&self.inner_path(dir)?)
    }

    fn walk(&self, dir: &str) -> io::Result<Vec<String>> {
        let files = self.inner.walk(&self.inner_path(dir)?)?;
        if self.prefix == ROOT {
            return Ok(files);
        }
        let prefix = format!("{}/", self.prefix);
        Ok(files
            .into_iter()
            .map(|file| file.strip_prefix(&prefix).map(str::to_string).unwrap_or(file))
            .collect())
    }
}
