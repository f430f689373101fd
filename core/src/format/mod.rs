//! format/mod.rs
//! Query-format engine: parse a template once, render it against indexes.
//!
//! ```text
//! %{NAME}-%{VERSION}\n
//! [%-10{FILENAMES} %{FILESIZES}\n]
//! %|EPOCH?{%{EPOCH}:}:{}|
//! ```

pub mod types;
pub mod parse;
pub mod eval;
pub mod registry;
pub mod renderers;

pub use types::*;
pub use registry::{Extension, ExtensionRegistry, Renderer, VirtualTag};

use crate::index::store::TagIndex;
use crate::tags::TagTable;

/// A parsed template bound to the registry it was resolved against.
#[derive(Debug)]
pub struct Template<'r> {
    tokens: Vec<Token>,
    extensions: &'r ExtensionRegistry,
}

impl<'r> Template<'r> {
    pub fn parse(src: &str, tags: &TagTable, extensions: &'r ExtensionRegistry) -> Result<Self, FormatError> {
        let tokens = parse::parse_template(src, tags, extensions)?;
        Ok(Self { tokens, extensions })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn render(&self, index: &TagIndex) -> String {
        eval::Evaluator::new(index, self.extensions).render(&self.tokens)
    }
}

/// Parse `src` and render it against `index` in one step.
pub fn sprintf(
    index: &TagIndex,
    src: &str,
    tags: &TagTable,
    extensions: &ExtensionRegistry,
) -> Result<String, FormatError> {
    Ok(Template::parse(src, tags, extensions)?.render(index))
}
