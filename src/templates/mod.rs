//! Template discovery and rendering.
//!
//! Templates are located by searching an ordered list of directories and
//! rendered by plain `%placeholder%` substitution.

mod locator;
mod renderer;

pub use locator::{Template, TemplateKind, TemplateLocator};
pub use renderer::{render, Placeholders, Rendered, TemplateRenderer};
