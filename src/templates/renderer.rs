//! `%placeholder%` substitution.
//!
//! Templates are plain text with literal markers such as `%name%` or `%port%`.
//! Substitution is a single left-to-right pass: replacement values are never
//! rescanned, so a value containing `%name%` is emitted verbatim.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::VhostError;

/// Placeholder name to replacement value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder style.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Output of a substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Marker-shaped tokens in the template that had no value, in order of appearance.
    pub unresolved: Vec<String>,
}

/// Replace every known `%key%` token in `template`.
///
/// Unknown tokens are left in place and reported in [`Rendered::unresolved`].
/// Only tokens shaped like a placeholder name (a lowercase letter followed by
/// at least one of `[a-z0-9_]`) are reported, so web server format strings
/// such as `%h %l %u` pass through untouched.
pub fn render(template: &str, values: &Placeholders) -> Rendered {
    let mut text = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        text.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(end) = after.find('%') {
            let key = &after[..end];
            if let Some(value) = values.get(key) {
                text.push_str(value);
                rest = &after[end + 1..];
                continue;
            }
            if is_placeholder_name(key) {
                if !unresolved.iter().any(|k| k == key) {
                    unresolved.push(key.to_string());
                }
                text.push('%');
                text.push_str(key);
                text.push('%');
                rest = &after[end + 1..];
                continue;
            }
        }

        text.push('%');
        rest = after;
    }
    text.push_str(rest);

    Rendered { text, unresolved }
}

fn is_placeholder_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    key.len() >= 2
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Renders named templates, optionally rejecting unresolved placeholders.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRenderer {
    strict: bool,
}

impl TemplateRenderer {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Render `template`; `name` is only used in diagnostics.
    pub fn render(
        &self,
        name: &str,
        template: &str,
        values: &Placeholders,
    ) -> Result<String, VhostError> {
        let rendered = render(template, values);

        if !rendered.unresolved.is_empty() {
            if self.strict {
                return Err(VhostError::template(format!(
                    "Unresolved placeholders in '{}': {}",
                    name,
                    rendered
                        .unresolved
                        .iter()
                        .map(|k| format!("%{}%", k))
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
            warn!(
                template = name,
                unresolved = ?rendered.unresolved,
                "Template has unresolved placeholders"
            );
        }

        Ok(rendered.text)
    }
}
