//! Page and layout loading
//!
//! A [`Loader`] collects the fragments for one page and assembles them:
//!
//! ```text
//! standalone:  partials ++ [page]                              entry point: page
//! in layout:   partials ++ [layout] ++ [content] ++ [entry]     entry point: layout
//! ```
//!
//! In a layout the page source is registered as the `content` section and the
//! entry renders the layout around the page (see [`wrap_in_layout`]). The
//! layout comes first so anything the page defines under the same name wins
//! over the layout's defaults.

use std::sync::Arc;

use handlebars::Handlebars;
use tracing::debug;

use crate::assembler::{CompiledUnit, assemble};
use crate::error::{Error, Result};
use crate::fragment::{Fragment, wrap_in_layout};
use crate::partials::{PartialResolver, PartialsInFolder};
use crate::store::FragmentStore;

/// Produces compiled units for pages, standalone or within a layout
pub trait Load: Send + Sync {
    fn standalone(&self, name: &str) -> Result<Arc<CompiledUnit>>;

    fn in_layout(&self, name: &str, layout: &str) -> Result<Arc<CompiledUnit>>;
}

impl<L: Load + ?Sized> Load for Box<L> {
    fn standalone(&self, name: &str) -> Result<Arc<CompiledUnit>> {
        (**self).standalone(name)
    }

    fn in_layout(&self, name: &str, layout: &str) -> Result<Arc<CompiledUnit>> {
        (**self).in_layout(name, layout)
    }
}

/// Reads the page (and layout) fragments a unit is built around
pub trait FragmentLoader: Send + Sync {
    fn standalone(&self, name: &str) -> Result<Vec<Fragment>>;

    /// Fragments for `name` rendered in `layout`, layout first
    fn in_layout(&self, name: &str, layout: &str) -> Result<Vec<Fragment>>;
}

/// Reads fragments by their exact path in a store
pub struct ByPathLoader {
    store: Arc<dyn FragmentStore>,
}

impl ByPathLoader {
    pub fn new(store: Arc<dyn FragmentStore>) -> Self {
        Self { store }
    }

    fn read(&self, name: &str) -> Result<Fragment> {
        let content = self.store.read(name).map_err(|e| Error::from_read(name, e))?;
        Ok(Fragment::new(name, content))
    }
}

impl FragmentLoader for ByPathLoader {
    fn standalone(&self, name: &str) -> Result<Vec<Fragment>> {
        Ok(vec![self.read(name)?])
    }

    fn in_layout(&self, name: &str, layout: &str) -> Result<Vec<Fragment>> {
        let page = self.read(name)?;
        let layout = self.read(layout)?;
        Ok(wrap_in_layout(layout, page))
    }
}

/// Composes partial resolution, fragment loading and assembly
pub struct Loader {
    partials: Box<dyn PartialResolver>,
    fragments: Box<dyn FragmentLoader>,
    base: Option<Handlebars<'static>>,
}

impl Loader {
    pub fn new(partials: impl PartialResolver + 'static, fragments: impl FragmentLoader + 'static) -> Self {
        Self {
            partials: Box::new(partials),
            fragments: Box::new(fragments),
            base: None,
        }
    }

    /// Partials from the page folder, fragments read by path
    pub fn with_defaults(store: Arc<dyn FragmentStore>) -> Self {
        Self::new(PartialsInFolder::new(store.clone()), ByPathLoader::new(store))
    }

    /// Use `base` as the starting registry for every unit
    ///
    /// Each load works on its own copy, `base` is never modified.
    pub fn with_base(mut self, base: Handlebars<'static>) -> Self {
        self.base = Some(base);
        self
    }

    fn partials_for(&self, page: &str) -> Result<Vec<Fragment>> {
        self.partials.resolve(page).map_err(|source| Error::PartialCollection {
            page: page.to_string(),
            source,
        })
    }
}

impl Load for Loader {
    fn standalone(&self, name: &str) -> Result<Arc<CompiledUnit>> {
        debug!(%name, "Loader::standalone: called");
        let mut fragments = self.partials_for(name)?;
        fragments.extend(self.fragments.standalone(name)?);

        let unit = assemble(self.base.as_ref(), &fragments).map_err(|e| Error::Create {
            page: name.to_string(),
            source: Box::new(e),
        })?;
        Ok(Arc::new(unit))
    }

    fn in_layout(&self, name: &str, layout: &str) -> Result<Arc<CompiledUnit>> {
        debug!(%name, %layout, "Loader::in_layout: called");
        let mut fragments = self.partials_for(name)?;
        fragments.extend(self.fragments.in_layout(name, layout)?);

        let unit = assemble(self.base.as_ref(), &fragments).map_err(|e| Error::CreateInLayout {
            page: name.to_string(),
            layout: layout.to_string(),
            source: Box::new(e),
        })?;
        Ok(Arc::new(unit))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::fragment::{CONTENT_SECTION, LAYOUT_SECTION};
    use crate::store::MemoryStore;

    fn shared(files: &[(&str, &str)]) -> Arc<dyn FragmentStore> {
        Arc::new(MemoryStore::with_files(files.iter().copied()))
    }

    struct FailingPartials;

    impl PartialResolver for FailingPartials {
        fn resolve(&self, _page: &str) -> io::Result<Vec<Fragment>> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "uh-oh"))
        }
    }

    #[test]
    fn test_by_path_standalone() {
        let loader = ByPathLoader::new(shared(&[("test.tmpl", "Hello")]));

        assert_eq!(loader.standalone("test.tmpl").unwrap(), vec![Fragment::new("test.tmpl", "Hello")]);
    }

    #[test]
    fn test_by_path_missing_page() {
        let loader = ByPathLoader::new(shared(&[("subpage/test.tmpl", "Hello")]));

        let err = loader.standalone("test.tmpl").unwrap_err();

        assert!(matches!(err, Error::FragmentNotFound { ref name, .. } if name == "test.tmpl"));
    }

    #[test]
    fn test_by_path_in_layout_puts_layout_first() {
        let loader = ByPathLoader::new(shared(&[("test.tmpl", "Hello"), ("layout.tmpl", "Layout content")]));

        let actual = loader.in_layout("test.tmpl", "layout.tmpl").unwrap();

        assert_eq!(
            actual,
            vec![
                Fragment::new("layout.tmpl", "Layout content").into_section(LAYOUT_SECTION),
                Fragment::new("test.tmpl", "Hello").into_section(CONTENT_SECTION),
                Fragment::new("test.tmpl", "{{#> @layout}}Hello{{/@layout}}").into_section("layout.tmpl"),
            ]
        );
    }

    #[test]
    fn test_by_path_in_layout_missing_page_reported_first() {
        let loader = ByPathLoader::new(shared(&[]));

        let err = loader.in_layout("test.tmpl", "layout.tmpl").unwrap_err();

        assert!(matches!(err, Error::FragmentNotFound { ref name, .. } if name == "test.tmpl"));
    }

    #[test]
    fn test_by_path_in_layout_missing_layout() {
        let loader = ByPathLoader::new(shared(&[("test.tmpl", "Hello")]));

        let err = loader.in_layout("test.tmpl", "layout.tmpl").unwrap_err();

        assert!(matches!(err, Error::FragmentNotFound { ref name, .. } if name == "layout.tmpl"));
    }

    #[test]
    fn test_standalone_with_partial() {
        let loader = Loader::with_defaults(shared(&[
            ("test.tmpl", "Hello, {{> test/_name.tmpl}}!"),
            ("test/_name.tmpl", "world"),
        ]));

        let unit = loader.standalone("test.tmpl").unwrap();

        assert_eq!(unit.render("test.tmpl", &()).unwrap(), "Hello, world!");
        assert_eq!(unit.entry_points(), vec!["test.tmpl", "test/_name.tmpl"]);
    }

    #[test]
    fn test_standalone_partial_failure() {
        let store = shared(&[("test.tmpl", "Hello")]);
        let loader = Loader::new(FailingPartials, ByPathLoader::new(store));

        let err = loader.standalone("test.tmpl").unwrap_err();

        assert!(matches!(err, Error::PartialCollection { ref page, .. } if page == "test.tmpl"));
        assert!(err.to_string().contains("test.tmpl"));
    }

    #[test]
    fn test_standalone_missing_page() {
        let loader = Loader::with_defaults(shared(&[]));

        let err = loader.standalone("test.tmpl").unwrap_err();

        assert!(matches!(err, Error::FragmentNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_standalone_parse_failure() {
        let loader = Loader::with_defaults(shared(&[("test.tmpl", "{{ broken")]));

        let err = loader.standalone("test.tmpl").unwrap_err();

        match err {
            Error::Create { page, source } => {
                assert_eq!(page, "test.tmpl");
                assert!(matches!(*source, Error::Parse { ref name, .. } if name == "test.tmpl"));
            }
            other => panic!("expected create error, got {:?}", other),
        }
    }

    #[test]
    fn test_in_layout_renders_page_into_layout() {
        let loader = Loader::with_defaults(shared(&[
            ("layouts/default.tmpl", "HEAD {{#> content}}DEFAULT{{/content}} FOOT"),
            ("test.tmpl", "body {{> test/_item.tmpl}}"),
            ("test/_item.tmpl", "item"),
        ]));

        let unit = loader.in_layout("test.tmpl", "layouts/default.tmpl").unwrap();

        assert_eq!(unit.render("layouts/default.tmpl", &()).unwrap(), "HEAD body item FOOT");
    }

    struct ContentPartial;

    impl PartialResolver for ContentPartial {
        fn resolve(&self, _page: &str) -> io::Result<Vec<Fragment>> {
            Ok(vec![Fragment::new(CONTENT_SECTION, "FROM PARTIAL")])
        }
    }

    #[test]
    fn test_in_layout_page_overrides_earlier_definitions() {
        let store = shared(&[("layout.tmpl", "[{{#> content}}DEFAULT{{/content}}]"), ("test.tmpl", "page")]);
        let loader = Loader::new(ContentPartial, ByPathLoader::new(store));

        let unit = loader.in_layout("test.tmpl", "layout.tmpl").unwrap();

        assert_eq!(unit.render("layout.tmpl", &()).unwrap(), "[page]");
    }

    #[test]
    fn test_in_layout_page_sections_override_layout_defaults() {
        let store = shared(&[
            (
                "layouts/default.tmpl",
                "<title>{{#> title}}Untitled{{/title}}</title>{{#> content}}D{{/content}}",
            ),
            ("index.tmpl", "{{#*inline \"title\"}}Mine{{/inline}}body"),
        ]);
        let loader = Loader::with_defaults(store);

        let unit = loader.in_layout("index.tmpl", "layouts/default.tmpl").unwrap();

        assert_eq!(unit.render("layouts/default.tmpl", &()).unwrap(), "<title>Mine</title>body");
    }

    #[test]
    fn test_in_layout_page_sections_override_after_content() {
        let store = shared(&[
            ("layout.tmpl", "{{#> content}}D{{/content}}|{{#> title}}Untitled{{/title}}"),
            ("index.tmpl", "{{#*inline \"title\"}}{{name}}{{/inline}}body"),
        ]);
        let loader = Loader::with_defaults(store);

        let unit = loader.in_layout("index.tmpl", "layout.tmpl").unwrap();

        assert_eq!(
            unit.render("layout.tmpl", &serde_json::json!({"name": "Mine"})).unwrap(),
            "body|Mine"
        );
    }

    #[test]
    fn test_in_layout_page_available_as_partial_block() {
        let store = shared(&[("layout.tmpl", "<{{> @partial-block}}>"), ("index.tmpl", "body")]);
        let loader = Loader::with_defaults(store);

        let unit = loader.in_layout("index.tmpl", "layout.tmpl").unwrap();

        assert_eq!(unit.render("layout.tmpl", &()).unwrap(), "<body>");
    }

    #[test]
    fn test_in_layout_page_parse_failure_names_page() {
        let loader = Loader::with_defaults(shared(&[
            ("layouts/default.tmpl", "{{#> content}}{{/content}}"),
            ("index.tmpl", "{{ broken"),
        ]));

        let err = loader.in_layout("index.tmpl", "layouts/default.tmpl").unwrap_err();

        match err {
            Error::CreateInLayout { source, .. } => {
                assert!(matches!(*source, Error::Parse { ref name, .. } if name == "index.tmpl"));
            }
            other => panic!("expected create in layout error, got {:?}", other),
        }
    }

    #[test]
    fn test_in_layout_without_page_content_uses_default() {
        let store = shared(&[("layout.tmpl", "[{{#> title}}Untitled{{/title}}]"), ("test.tmpl", "page")]);
        let loader = Loader::with_defaults(store);

        let unit = loader.in_layout("test.tmpl", "layout.tmpl").unwrap();

        assert_eq!(unit.render("layout.tmpl", &()).unwrap(), "[Untitled]");
    }

    #[test]
    fn test_in_layout_parse_failure_names_layout() {
        let loader = Loader::with_defaults(shared(&[("layout.tmpl", "{{#if}}"), ("test.tmpl", "page")]));

        let err = loader.in_layout("test.tmpl", "layout.tmpl").unwrap_err();

        match &err {
            Error::CreateInLayout { source, .. } => {
                assert!(matches!(**source, Error::Parse { ref name, .. } if name == "layout.tmpl"));
            }
            other => panic!("expected create in layout error, got {:?}", other),
        }
        let msg = err.to_string();
        assert!(msg.contains("test.tmpl"));
        assert!(msg.contains("layout.tmpl"));
    }

    #[test]
    fn test_in_layout_partial_failure() {
        let store = shared(&[("test.tmpl", "Hello"), ("layout.tmpl", "{{> content}}")]);
        let loader = Loader::new(FailingPartials, ByPathLoader::new(store));

        let err = loader.in_layout("test.tmpl", "layout.tmpl").unwrap_err();

        assert!(matches!(err, Error::PartialCollection { .. }));
    }

    #[test]
    fn test_base_is_shared_between_loads() {
        let mut base = Handlebars::new();
        base.register_template_string("greeting", "Hi").unwrap();
        let loader =
            Loader::with_defaults(shared(&[("a.tmpl", "{{> greeting}} A"), ("b.tmpl", "{{> greeting}} B")])).with_base(base);

        let a = loader.standalone("a.tmpl").unwrap();
        let b = loader.standalone("b.tmpl").unwrap();

        assert_eq!(a.render("a.tmpl", &()).unwrap(), "Hi A");
        assert_eq!(b.render("b.tmpl", &()).unwrap(), "Hi B");
        assert!(!a.has_entry("b.tmpl"));
        assert!(!b.has_entry("a.tmpl"));
    }
}
