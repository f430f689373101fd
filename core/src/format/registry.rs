//! format/registry.rs
//! Registry of template extensions: virtual tags and named renderers.
//!
//! Design notes:
//! - Registration order is preserved; a virtual tag is addressed by its slot
//!   so parsed templates stay valid while the registry is borrowed.
//! - Virtual tag names match case-insensitively (with an optional `RPMTAG_`
//!   prefix); renderer names match exactly.

use std::fmt;

use crate::format::renderers;
use crate::format::types::{FormatArg, Padding};
use crate::index::store::TagIndex;
use crate::index::types::TagValue;
use crate::tags::strip_tag_prefix;

/// Value computed from an index on demand.
pub trait VirtualTag {
    /// `None` when the value cannot be produced (rendered as "(none)").
    fn resolve(&self, index: &TagIndex) -> Option<TagValue>;
}

impl<F> VirtualTag for F
where
    F: Fn(&TagIndex) -> Option<TagValue>,
{
    fn resolve(&self, index: &TagIndex) -> Option<TagValue> {
        self(index)
    }
}

/// Named formatter selected with `%{NAME:renderer}`.
pub trait Renderer {
    fn render(&self, arg: &FormatArg<'_>, pad: &Padding) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&FormatArg<'_>, &Padding) -> String,
{
    fn render(&self, arg: &FormatArg<'_>, pad: &Padding) -> String {
        self(arg, pad)
    }
}

pub enum Extension {
    Tag(Box<dyn VirtualTag + Send + Sync>),
    Format(Box<dyn Renderer + Send + Sync>),
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extension::Tag(_) => f.write_str("Tag(..)"),
            Extension::Format(_) => f.write_str("Format(..)"),
        }
    }
}

/// Ordered list of named extensions.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    entries: Vec<(String, Extension)>,
}

impl ExtensionRegistry {
    /// Empty registry (no renderers at all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in renderers: octal, hex, date, day, shescape.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register_renderer("octal", renderers::octal);
        reg.register_renderer("hex", renderers::hex);
        reg.register_renderer("date", renderers::date);
        reg.register_renderer("day", renderers::day);
        reg.register_renderer("shescape", renderers::shescape);
        reg
    }

    pub fn register_tag<T>(&mut self, name: &str, tag: T) -> &mut Self
    where
        T: VirtualTag + Send + Sync + 'static,
    {
        self.entries.push((name.to_string(), Extension::Tag(Box::new(tag))));
        self
    }

    pub fn register_renderer<R>(&mut self, name: &str, renderer: R) -> &mut Self
    where
        R: Renderer + Send + Sync + 'static,
    {
        self.entries.push((name.to_string(), Extension::Format(Box::new(renderer))));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot of the first virtual tag called `name`.
    pub fn find_tag(&self, name: &str) -> Option<usize> {
        let name = strip_tag_prefix(name);
        self.entries.iter().position(|(n, ext)| {
            matches!(ext, Extension::Tag(_)) && strip_tag_prefix(n).eq_ignore_ascii_case(name)
        })
    }

    pub fn find_renderer(&self, name: &str) -> Option<&(dyn Renderer + Send + Sync)> {
        self.entries.iter().find_map(|(n, ext)| match ext {
            Extension::Format(r) if n == name => Some(r.as_ref()),
            _ => None,
        })
    }

    /// Evaluate the virtual tag in `slot`.
    pub fn resolve(&self, slot: usize, index: &TagIndex) -> Option<TagValue> {
        match self.entries.get(slot) {
            Some((_, Extension::Tag(t))) => t.resolve(index),
            _ => None,
        }
    }
}
