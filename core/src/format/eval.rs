//! format/eval.rs
//!
//! Template evaluation against one index.
//!
//! Design notes:
//! - Virtual tags are computed at most once per render and cached by slot.
//! - A missing tag or a failed virtual tag renders as "(none)".
//! - An array block repeats once per element of the first element-wise
//!   field found inside it; single-element values repeat on every pass.

use tracing::trace;

use crate::constants::NONE_PLACEHOLDER;
use crate::format::registry::ExtensionRegistry;
use crate::format::renderers;
use crate::format::types::{FormatArg, TagRef, TagSource, Token};
use crate::index::store::TagIndex;
use crate::index::types::TagValue;

pub struct Evaluator<'a> {
    index: &'a TagIndex,
    extensions: &'a ExtensionRegistry,
    cache: Vec<Option<Option<TagValue>>>,
}

impl<'a> Evaluator<'a> {
    pub fn new(index: &'a TagIndex, extensions: &'a ExtensionRegistry) -> Self {
        Self { index, extensions, cache: vec![None; extensions.len()] }
    }

    pub fn render(&mut self, tokens: &[Token]) -> String {
        let mut out = String::new();
        for token in tokens {
            self.single(token, 0, &mut out);
        }
        out
    }

    fn single(&mut self, token: &Token, element: usize, out: &mut String) {
        match token {
            Token::Literal(s) => out.push_str(s),
            Token::Tag(tag) => {
                let element = if tag.just_one { 0 } else { element };
                self.field(tag, element, out);
            }
            Token::Cond(cond) => {
                let branch = if self.lookup(cond.source).is_some() {
                    &cond.if_tokens
                } else {
                    &cond.else_tokens
                };
                for t in branch {
                    self.single(t, element, out);
                }
            }
            Token::Array(tokens) => match self.array_len(tokens) {
                Some(n) => {
                    for j in 0..n {
                        for t in tokens {
                            self.single(t, j, out);
                        }
                    }
                }
                None => out.push_str(NONE_PLACEHOLDER),
            },
        }
    }

    fn field(&mut self, tag: &TagRef, element: usize, out: &mut String) {
        let Some(value) = self.lookup(tag.source) else {
            out.push_str(&tag.pad.apply(NONE_PLACEHOLDER));
            return;
        };

        let arg = if tag.array_count {
            Some(FormatArg::Integer(i64::from(value.count())))
        } else {
            element_arg(&value, element)
        };
        let Some(arg) = arg else {
            out.push_str(&tag.pad.apply(NONE_PLACEHOLDER));
            return;
        };

        let renderer = tag.renderer.as_deref().and_then(|name| self.extensions.find_renderer(name));
        let text = match renderer {
            Some(r) => r.render(&arg, &tag.pad),
            None => renderers::plain(&arg, &tag.pad),
        };
        out.push_str(&text);
    }

    fn lookup(&mut self, source: TagSource) -> Option<TagValue> {
        match source {
            TagSource::Header(tag) => self.index.get(tag),
            TagSource::Extension(slot) => {
                if let Some(cached) = self.cache.get(slot).and_then(Clone::clone) {
                    return cached;
                }
                trace!(slot, "evaluating virtual tag");
                let value = self.extensions.resolve(slot, self.index);
                if let Some(entry) = self.cache.get_mut(slot) {
                    *entry = Some(value.clone());
                }
                value
            }
        }
    }

    /// Element count of the first element-wise field inside `tokens`.
    fn array_len(&mut self, tokens: &[Token]) -> Option<usize> {
        for token in tokens {
            let found = match token {
                Token::Tag(tag) if !tag.just_one && !tag.array_count => {
                    self.lookup(tag.source).map(|v| v.count() as usize)
                }
                Token::Array(inner) => self.array_len(inner),
                Token::Cond(cond) => self
                    .array_len(&cond.if_tokens)
                    .or_else(|| self.array_len(&cond.else_tokens)),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

/// Element `i` of `value` as a renderer argument; `None` when out of range.
fn element_arg(value: &TagValue, i: usize) -> Option<FormatArg<'_>> {
    let i = if value.count() == 1 { 0 } else { i };
    match value {
        TagValue::Null => Some(FormatArg::Text(NONE_PLACEHOLDER)),
        TagValue::String(s) => Some(FormatArg::Text(s)),
        TagValue::Bin(b) => Some(FormatArg::Binary(b)),
        TagValue::StringArray(v) | TagValue::I18nString(v) => v.get(i).map(|s| FormatArg::Text(s)),
        TagValue::Char(v) | TagValue::Int8(v) => v.get(i).map(|&x| FormatArg::Integer(i64::from(x as i8))),
        TagValue::Int16(v) => v.get(i).map(|&x| FormatArg::Integer(i64::from(x))),
        TagValue::Int32(v) => v.get(i).map(|&x| FormatArg::Integer(i64::from(x as i32))),
        TagValue::Int64(v) => v.get(i).map(|&x| FormatArg::Integer(x as i64)),
    }
}
