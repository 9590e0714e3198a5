//! Template assembly
//!
//! Turns a list of fragments into one [`CompiledUnit`]: a Handlebars registry
//! where every fragment is a named template that can be rendered on its own or
//! included from any other fragment with `{{> name}}`.

use std::fmt;
use std::io::Write;

use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fragment::Fragment;

/// A parsed, cross-referenceable set of fragments
#[derive(Clone)]
pub struct CompiledUnit {
    registry: Handlebars<'static>,
}

impl CompiledUnit {
    /// Whether `name` can be rendered from this unit
    pub fn has_entry(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    /// Names of all templates in this unit, sorted
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registry.get_templates().keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render the entry point `name`, streaming into `out`
    pub fn render_to<T: Serialize, W: Write>(&self, name: &str, data: &T, out: W) -> Result<()> {
        self.registry.render_to_write(name, data, out)?;
        Ok(())
    }

    /// Render the entry point `name` into a string
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        Ok(self.registry.render(name, data)?)
    }
}

impl fmt::Debug for CompiledUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledUnit")
            .field("entry_points", &self.entry_points())
            .finish()
    }
}

/// Build a compiled unit from `fragments`, in order
///
/// Starts from a copy of `base` when given, so helpers and options registered
/// there are available without `base` itself ever changing. Each fragment is
/// registered under [`Fragment::template_name`]; one whose template name was
/// already registered replaces the earlier one. Parse errors carry the
/// fragment's own name. The first fragment
/// that fails to parse aborts the whole assembly.
pub fn assemble(base: Option<&Handlebars<'static>>, fragments: &[Fragment]) -> Result<CompiledUnit> {
    let mut registry = base.cloned().unwrap_or_else(Handlebars::new);

    for fragment in fragments {
        registry
            .register_template_string(fragment.template_name(), &fragment.content)
            .map_err(|source| Error::Parse {
                name: fragment.name.clone(),
                source: Box::new(source),
            })?;
    }

    debug!(count = fragments.len(), "assemble: registered fragments");
    Ok(CompiledUnit { registry })
}
