//! Partial resolution
//!
//! Decides which partials a page can reference. Partials are not globally
//! visible: a page only sees the fragments its resolver hands to the loader.
//!
//! - [`PartialsInFolder`] - everything below the folder named after the page
//! - [`PartialsWithCommon`] - the page folder plus a shared directory
//! - [`PartialsWithSiblings`] - adds `_` files next to the page to another resolver

use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::fragment::{self, Fragment};
use crate::store::{FragmentStore, join};

/// Maps a page name to the partials it may reference
pub trait PartialResolver: Send + Sync {
    fn resolve(&self, page: &str) -> io::Result<Vec<Fragment>>;
}

impl<P: PartialResolver + ?Sized> PartialResolver for Box<P> {
    fn resolve(&self, page: &str) -> io::Result<Vec<Fragment>> {
        (**self).resolve(page)
    }
}

fn is_missing(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

/// Read every file below `dir` into `fragments`; a missing `dir` adds nothing
fn collect_dir(store: &dyn FragmentStore, dir: &str, fragments: &mut Vec<Fragment>) -> io::Result<()> {
    let files = match store.walk(dir) {
        Ok(files) => files,
        Err(e) if is_missing(&e) => return Ok(()),
        Err(e) => return Err(e),
    };
    for path in files {
        let content = store.read(&path)?;
        fragments.push(Fragment::new(path, content));
    }
    Ok(())
}

/// Loads partials from the folder named after the page, minus its last extension
///
/// A page named `something/hello.tmpl` gets every file below `something/hello/`.
pub struct PartialsInFolder {
    store: Arc<dyn FragmentStore>,
}

impl PartialsInFolder {
    pub fn new(store: Arc<dyn FragmentStore>) -> Self {
        Self { store }
    }
}

impl PartialResolver for PartialsInFolder {
    fn resolve(&self, page: &str) -> io::Result<Vec<Fragment>> {
        let mut fragments = Vec::new();
        if let Some(dir) = fragment::partial_dir(page) {
            collect_dir(self.store.as_ref(), dir, &mut fragments)?;
        }
        debug!(%page, count = fragments.len(), "PartialsInFolder::resolve: done");
        Ok(fragments)
    }
}

/// Loads partials like [`PartialsInFolder`] and from a shared directory, e.g. `partials`
///
/// The shared fragments come after the page folder ones and are not
/// de-duplicated against them.
pub struct PartialsWithCommon {
    store: Arc<dyn FragmentStore>,
    common_dir: String,
}

impl PartialsWithCommon {
    pub fn new(store: Arc<dyn FragmentStore>, common_dir: impl Into<String>) -> Self {
        Self {
            store,
            common_dir: common_dir.into(),
        }
    }
}

impl PartialResolver for PartialsWithCommon {
    fn resolve(&self, page: &str) -> io::Result<Vec<Fragment>> {
        let mut fragments = Vec::new();
        if let Some(dir) = fragment::partial_dir(page) {
            collect_dir(self.store.as_ref(), dir, &mut fragments)?;
        }
        collect_dir(self.store.as_ref(), &self.common_dir, &mut fragments)?;
        debug!(%page, common_dir = %self.common_dir, count = fragments.len(), "PartialsWithCommon::resolve: done");
        Ok(fragments)
    }
}

/// Adds the partials sitting next to the page to another resolver
///
/// Only files directly in the page's directory whose name starts with `_`
/// are added; they come before the ones found by `inner`.
pub struct PartialsWithSiblings<P> {
    inner: P,
    store: Arc<dyn FragmentStore>,
}

impl<P: PartialResolver> PartialsWithSiblings<P> {
    pub fn new(inner: P, store: Arc<dyn FragmentStore>) -> Self {
        Self { inner, store }
    }
}

impl<P: PartialResolver> PartialResolver for PartialsWithSiblings<P> {
    fn resolve(&self, page: &str) -> io::Result<Vec<Fragment>> {
        let dir = fragment::parent_dir(page);
        let entries = match self.store.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if is_missing(&e) => Vec::new(),
            Err(e) => return Err(e),
        };

        let mut fragments = Vec::new();
        for entry in entries {
            if entry.is_dir || !fragment::is_partial(&entry.name) {
                continue;
            }
            let path = join(dir, &entry.name);
            let content = self.store.read(&path)?;
            fragments.push(Fragment::new(path, content));
        }
        debug!(%page, count = fragments.len(), "PartialsWithSiblings::resolve: siblings found");

        fragments.extend(self.inner.resolve(page)?);
        Ok(fragments)
    }
}
