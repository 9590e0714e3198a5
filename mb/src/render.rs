//! Rendering entry point

use std::io::Write;
use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::cache::CachedLoader;
use crate::config::Config;
use crate::error::Result;
use crate::loader::{ByPathLoader, Load, Loader};
use crate::partials::{PartialResolver, PartialsInFolder, PartialsWithCommon, PartialsWithSiblings};
use crate::store::{DirStore, FragmentStore};

/// Renders pages, alone or inside a layout
///
/// Given the folder structure:
///
/// ```text
/// templates/layouts/default.tmpl
/// templates/index/main.tmpl
/// templates/index/main/_item.tmpl
/// ```
///
/// a [`Matboard`] over `templates/` renders `index/main.tmpl` with
/// `index/main/_item.tmpl` available as `{{> index/main/_item.tmpl}}`.
pub struct Matboard {
    loader: Box<dyn Load>,
}

impl Matboard {
    /// Render templates from `store` with the default conventions
    ///
    /// Partials come from the folder named after each page and compiled
    /// pages are cached.
    pub fn load_from(store: impl FragmentStore + 'static) -> Self {
        Self::new(CachedLoader::new(Loader::with_defaults(Arc::new(store))))
    }

    /// Render with a custom loading strategy
    pub fn new(loader: impl Load + 'static) -> Self {
        Self {
            loader: Box::new(loader),
        }
    }

    /// Build from configuration, reading templates from `config.templates_dir`
    pub fn from_config(config: &Config) -> Self {
        debug!(?config, "Matboard::from_config: called");
        let store: Arc<dyn FragmentStore> = Arc::new(DirStore::new(&config.templates_dir));

        let mut partials: Box<dyn PartialResolver> = match &config.common_partials {
            Some(dir) => Box::new(PartialsWithCommon::new(store.clone(), dir.clone())),
            None => Box::new(PartialsInFolder::new(store.clone())),
        };
        if config.sibling_partials {
            partials = Box::new(PartialsWithSiblings::new(partials, store.clone()));
        }

        let mut base = Handlebars::new();
        base.set_strict_mode(config.strict_mode);

        let loader = Loader::new(partials, ByPathLoader::new(store)).with_base(base);
        if config.cache {
            Self::new(CachedLoader::new(loader))
        } else {
            Self::new(loader)
        }
    }

    /// Render page `name` with `data` into `out`
    ///
    /// Nothing is written when the page can't be loaded. Errors raised while
    /// rendering may leave partial output behind.
    pub fn render<T: Serialize, W: Write>(&self, out: W, name: &str, data: &T) -> Result<()> {
        let unit = self.loader.standalone(name)?;
        unit.render_to(name, data, out)
    }

    /// Render page `name` inside `layout` with `data` into `out`
    pub fn render_in_layout<T: Serialize, W: Write>(&self, out: W, layout: &str, name: &str, data: &T) -> Result<()> {
        let unit = self.loader.in_layout(name, layout)?;
        unit.render_to(layout, data, out)
    }

    pub fn render_to_string<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.loader.standalone(name)?.render(name, data)
    }

    pub fn render_in_layout_to_string<T: Serialize>(&self, layout: &str, name: &str, data: &T) -> Result<String> {
        self.loader.in_layout(name, layout)?.render(layout, data)
    }
}
