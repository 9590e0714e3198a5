//! Error types for loading and rendering templates

use std::io;

use handlebars::{RenderError, RenderErrorReason, TemplateError};
use thiserror::Error;

/// Errors that can occur while composing or rendering a page
#[derive(Debug, Error)]
pub enum Error {
    #[error("Template not found: {name}")]
    FragmentNotFound {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read template {name}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to collect partials for {page}")]
    PartialCollection {
        page: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {name} into the template")]
    Parse {
        name: String,
        #[source]
        source: Box<TemplateError>,
    },

    #[error("Failed to create template for {page}")]
    Create {
        page: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to create template for {page} in layout {layout}")]
    CreateInLayout {
        page: String,
        layout: String,
        #[source]
        source: Box<Error>,
    },

    /// Execution-time failures are passed through from the engine untouched
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a store read failure for `name` into the right variant
    pub(crate) fn from_read(name: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Error::FragmentNotFound {
                name: name.to_string(),
                source,
            }
        } else {
            Error::Read {
                name: name.to_string(),
                source,
            }
        }
    }

    /// Check if this error means a page, layout or partial does not exist
    ///
    /// Covers both load-time misses and render-time references to templates
    /// that are not part of the compiled unit.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FragmentNotFound { .. } => true,
            Error::Create { source, .. } | Error::CreateInLayout { source, .. } => source.is_not_found(),
            Error::Render(e) => matches!(
                e.reason(),
                RenderErrorReason::TemplateNotFound(_) | RenderErrorReason::PartialNotFound(_)
            ),
            Error::Read { .. } | Error::PartialCollection { .. } | Error::Parse { .. } => false,
        }
    }
}
