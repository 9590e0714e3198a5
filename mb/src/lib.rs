//! Matboard - convention-based template composition
//!
//! Matboard finds Handlebars templates by where they sit in a directory tree
//! and composes them into pages, partials and layouts.
//!
//! # Conventions
//!
//! - **Pages** are any template, e.g. `reviews/show.tmpl`
//! - **Partials** start with `_` and live in the folder named after the page
//!   that uses them, e.g. `reviews/show/_item.tmpl`
//! - **Layouts** live under a `layouts` directory and mark where the page goes
//!   with `{{#> content}}...{{/content}}`
//!
//! # Modules
//!
//! - [`store`] - Where template sources are read from
//! - [`partials`] - Which partials a page may use
//! - [`assembler`] - Turning fragments into a compiled unit
//! - [`loader`] - Loading pages alone or inside a layout
//! - [`cache`] - Memoizing compiled units
//! - [`render`] - The [`Matboard`] rendering entry point
//! - [`config`] - Configuration types and loading

pub mod assembler;
pub mod cache;
pub mod config;
pub mod error;
pub mod fragment;
pub mod loader;
pub mod partials;
pub mod render;
pub mod store;

pub use assembler::{CompiledUnit, assemble};
pub use cache::{CacheKey, CachedLoader};
pub use config::Config;
pub use error::{Error, Result};
pub use fragment::{Fragment, wrap_in_layout};
pub use loader::{ByPathLoader, FragmentLoader, Load, Loader};
pub use partials::{PartialResolver, PartialsInFolder, PartialsWithCommon, PartialsWithSiblings};
pub use render::Matboard;
pub use store::{DirStore, Entry, FragmentStore, MemoryStore, SubStore, pages};
