//! Named HTML templates rendered against a JSON data context
//!
//! Templates are plain HTML with `{{ path }}` placeholders. A placeholder is
//! looked up in the data context by a dotted path (`{{ customer.name }}`),
//! HTML-escaped, and substituted. Triple braces (`{{{ path }}}`) insert the
//! value without escaping. Strings are inserted as-is, other JSON values use
//! their JSON text.
//!
//! Templates live either in memory ([`TemplateRegistry::register`]) or in a
//! views directory where dotted names map to nested files:
//! `components.invoice` resolves to `<views>/components/invoice.html`.

use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;
use serde_json::Value;

use crate::{Error, Result};

/// Renders a named template with a data context into an HTML string
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, data: &Value) -> Result<String>;
}

/// A template name plus the data it is rendered with
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRef {
    pub name: String,
    pub data: Value,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// A template rendered with an empty context
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Value::Object(Default::default()))
    }
}

/// In-memory and directory-backed template store
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
    views_dir: Option<PathBuf>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that falls back to files under `dir`
    pub fn with_views_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: HashMap::new(),
            views_dir: Some(dir.into()),
        }
    }

    /// Register (or replace) an in-memory template
    pub fn register(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name) || self.view_path(name).is_some_and(|p| p.is_file())
    }

    fn view_path(&self, name: &str) -> Option<PathBuf> {
        let dir = self.views_dir.as_ref()?;
        if name.split('.').any(|seg| seg.is_empty() || seg.contains(['/', '\\'])) {
            return None;
        }
        let mut path = dir.clone();
        path.extend(name.split('.'));
        path.set_extension("html");
        Some(path)
    }

    fn source(&self, name: &str) -> Result<String> {
        if let Some(src) = self.templates.get(name) {
            return Ok(src.clone());
        }
        let path = self
            .view_path(name)
            .ok_or_else(|| Error::template(name, "template not found"))?;
        debug!("Loading template '{}' from {}", name, path.display());
        std::fs::read_to_string(&path)
            .map_err(|e| Error::template(name, format!("{}: {}", path.display(), e)))
    }
}

impl TemplateRenderer for TemplateRegistry {
    fn render(&self, name: &str, data: &Value) -> Result<String> {
        let source = self.source(name)?;
        substitute(&source, data).map_err(|reason| Error::template(name, reason))
    }
}

/// Substitute every placeholder in `source` from `data`
pub fn substitute(source: &str, data: &Value) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];

        let (open, close, raw) = if after.starts_with("{{{") {
            ("{{{", "}}}", true)
        } else {
            ("{{", "}}", false)
        };

        let body = &after[open.len()..];
        let end = body
            .find(close)
            .ok_or_else(|| format!("unterminated placeholder at byte {}", source.len() - after.len()))?;
        let path = body[..end].trim();
        if path.is_empty() {
            return Err("empty placeholder".to_string());
        }

        let value = lookup(data, path).ok_or_else(|| format!("no value bound for '{}'", path))?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        if raw {
            out.push_str(&text);
        } else {
            out.push_str(&escape_html(&text));
        }

        rest = &body[end + close.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |cur, key| match cur {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
