//! Fragments and the naming conventions that classify them
//!
//! A fragment is one named unit of raw template source. Its name is its path
//! inside the fragment store, e.g. `reviews/show/_causes.tmpl`.
//!
//! - Partials have a base filename starting with `_`
//! - Layouts live below a `layouts` path segment
//! - Everything else is a page that can be rendered on its own

/// Marker that starts the base filename of a partial
pub const PARTIAL_MARKER: char = '_';

/// Path segment that marks a fragment as a layout
pub const LAYOUTS_SEGMENT: &str = "layouts";

/// Section a layout renders the page into
pub const CONTENT_SECTION: &str = "content";

/// Name the layout source is registered under when wrapping a page
pub const LAYOUT_SECTION: &str = "@layout";

/// A named unit of raw template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Logical path of the fragment, reported in errors
    pub name: String,
    /// Unparsed template source
    pub content: String,
    /// Template name to register under instead of `name`
    pub section: Option<String>,
}

impl Fragment {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            section: None,
        }
    }

    /// Turn this fragment into the definition of a named section
    ///
    /// The source stays as-is and is registered under `section`, so a layout
    /// declaring `{{#> section}}default{{/section}}` renders it instead of the
    /// default. The fragment keeps its own name for error reporting.
    pub fn into_section(self, section: &str) -> Self {
        Self {
            section: Some(section.to_string()),
            ..self
        }
    }

    /// Name this fragment is registered under in a compiled unit
    pub fn template_name(&self) -> &str {
        self.section.as_deref().unwrap_or(&self.name)
    }
}

/// Fragments rendering `page` inside `layout`, layout first
///
/// The layout source becomes [`LAYOUT_SECTION`] and the page source becomes
/// [`CONTENT_SECTION`]. The entry point, registered under the layout's name,
/// renders the layout as a partial block around the page source, so sections
/// the page declares with `{{#*inline "title"}}` replace the layout's
/// `{{#> title}}` defaults. The page output is also available to the layout
/// as `{{> @partial-block}}`.
pub fn wrap_in_layout(layout: Fragment, page: Fragment) -> Vec<Fragment> {
    let entry = Fragment {
        name: page.name.clone(),
        content: format!("{{{{#> {0}}}}}{1}{{{{/{0}}}}}", LAYOUT_SECTION, page.content),
        section: Some(layout.name.clone()),
    };
    vec![layout.into_section(LAYOUT_SECTION), page.into_section(CONTENT_SECTION), entry]
}

/// Final path segment of `name`
pub fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Whether `name` refers to a partial (`_` prefixed base filename)
pub fn is_partial(name: &str) -> bool {
    base_name(name).starts_with(PARTIAL_MARKER)
}

/// Whether `name` lives below a `layouts` directory, at any depth
pub fn is_layout(name: &str) -> bool {
    let mut segments: Vec<&str> = name.split('/').collect();
    segments.pop();
    segments.contains(&LAYOUTS_SEGMENT)
}

/// Folder holding the partials of page `name`
///
/// Only the last extension is removed: `test.tmpl.html` keeps its partials in
/// `test.tmpl/`. Returns `None` when the base filename has no extension, since
/// the folder would be the page itself.
pub fn partial_dir(name: &str) -> Option<&str> {
    let base_start = name.rfind('/').map_or(0, |i| i + 1);
    let dot = name[base_start..].rfind('.')?;
    let dir = &name[..base_start + dot];
    if dir.is_empty() || dir.ends_with('/') { None } else { Some(dir) }
}

/// Directory containing `name`, `.` for the store root
pub fn parent_dir(name: &str) -> &str {
    match name.rfind('/') {
        Some(i) => &name[..i],
        None => ".",
    }
}
