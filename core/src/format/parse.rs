//! format/parse.rs
//!
//! Template parser.
//!
//! Syntax:
//! - `%[-][width]{[=|#]NAME[=|#][:renderer]}` field; `%%` literal percent
//! - `[ ... ]` array block, repeated per element
//! - `%|NAME?{if}:{else}|` or `%|NAME?{if}|` conditional
//! - `\a \b \f \n \r \t \v` escapes; any other escaped char is itself
//!
//! Names resolve against the extension registry first, then the tag table.

use crate::constants::MAX_FIELD_WIDTH;
use crate::format::registry::ExtensionRegistry;
use crate::format::types::{Conditional, FormatError, Padding, TagRef, TagSource, Token};
use crate::tags::TagTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Begin,
    InArray,
    InExpr,
}

/// Parse `src` into tokens.
pub fn parse_template(
    src: &str,
    tags: &TagTable,
    extensions: &ExtensionRegistry,
) -> Result<Vec<Token>, FormatError> {
    Parser { src, pos: 0, tags, extensions }.parse_format(State::Begin)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    tags: &'a TagTable,
    extensions: &'a ExtensionRegistry,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            true
        } else {
            false
        }
    }

    /// Tokens up to the end of input or the closer of `state`.
    fn parse_format(&mut self, state: State) -> Result<Vec<Token>, FormatError> {
        let mut tokens = Vec::new();
        let mut lit = String::new();

        while let Some(c) = self.bump() {
            match c {
                '%' => {
                    if self.eat('%') {
                        lit.push('%');
                        continue;
                    }
                    flush(&mut lit, &mut tokens);
                    if self.eat('|') {
                        tokens.push(Token::Cond(self.parse_expression()?));
                    } else {
                        tokens.push(Token::Tag(self.parse_tag()?));
                    }
                }
                '[' => {
                    flush(&mut lit, &mut tokens);
                    tokens.push(Token::Array(self.parse_format(State::InArray)?));
                }
                ']' => {
                    if state != State::InArray {
                        return Err(FormatError::UnexpectedBracket);
                    }
                    flush(&mut lit, &mut tokens);
                    return Ok(tokens);
                }
                '}' => {
                    if state != State::InExpr {
                        return Err(FormatError::UnexpectedBrace);
                    }
                    flush(&mut lit, &mut tokens);
                    return Ok(tokens);
                }
                '\\' => match self.bump() {
                    Some(e) => lit.push(escaped(e)),
                    None => lit.push('\\'),
                },
                _ => lit.push(c),
            }
        }

        match state {
            State::Begin => {
                flush(&mut lit, &mut tokens);
                Ok(tokens)
            }
            State::InArray => Err(FormatError::ArrayNotClosed),
            State::InExpr => Err(FormatError::ExpressionNotClosed),
        }
    }

    /// After `%`: `[-][width]{...}`.
    fn parse_tag(&mut self) -> Result<TagRef, FormatError> {
        let rest = self.rest();
        let open = rest
            .find(|c: char| c == '{' || c == '%')
            .filter(|&i| rest[i..].starts_with('{'));
        let open = open.ok_or(FormatError::MissingOpenBrace)?;
        let pad = parse_padding(&rest[..open]);

        let body_start = open + 1;
        let close = rest[body_start..].find('}').ok_or(FormatError::MissingCloseBrace)?;
        let body = &rest[body_start..body_start + close];
        self.pos += body_start + close + 1;

        let (mut just_one, mut array_count) = (false, false);
        let mut body = body;
        if let Some(b) = body.strip_prefix('=') {
            just_one = true;
            body = b;
        } else if let Some(b) = body.strip_prefix('#') {
            just_one = true;
            array_count = true;
            body = b;
        }

        let (mut name, renderer) = match body.split_once(':') {
            Some((_, "")) => return Err(FormatError::EmptyTagFormat),
            Some((n, r)) => (n, Some(r.to_string())),
            None => (body, None),
        };

        if let Some(n) = name.strip_suffix('=') {
            just_one = true;
            name = n;
        } else if let Some(n) = name.strip_suffix('#') {
            just_one = true;
            array_count = true;
            name = n;
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(FormatError::EmptyTagName);
        }

        Ok(TagRef {
            source: self.resolve(name)?,
            pad,
            just_one,
            array_count,
            renderer,
        })
    }

    /// After `%|`: `NAME?{...}:{...}|` or `NAME?{...}|`.
    fn parse_expression(&mut self) -> Result<Conditional, FormatError> {
        let rest = self.rest();
        let q = rest.find('?').ok_or(FormatError::QuestionExpected)?;
        let name = rest[..q].trim();
        self.pos += q + 1;

        if !self.eat('{') {
            return Err(FormatError::OpenBraceAfterQuestion);
        }
        let if_tokens = self.parse_format(State::InExpr)?;

        let else_tokens = match self.bump() {
            Some('|') => Vec::new(),
            Some(':') => {
                if !self.eat('{') {
                    return Err(FormatError::OpenBraceAfterColon);
                }
                let tokens = self.parse_format(State::InExpr)?;
                if !self.eat('|') {
                    return Err(FormatError::PipeExpected);
                }
                tokens
            }
            _ => return Err(FormatError::ColonExpected),
        };

        if name.is_empty() {
            return Err(FormatError::EmptyTagName);
        }
        Ok(Conditional { source: self.resolve(name)?, if_tokens, else_tokens })
    }

    fn resolve(&self, name: &str) -> Result<TagSource, FormatError> {
        if let Some(slot) = self.extensions.find_tag(name) {
            return Ok(TagSource::Extension(slot));
        }
        self.tags
            .lookup(name)
            .map(TagSource::Header)
            .ok_or_else(|| FormatError::UnknownTag(name.to_string()))
    }
}

fn flush(lit: &mut String, tokens: &mut Vec<Token>) {
    if !lit.is_empty() {
        tokens.push(Token::Literal(std::mem::take(lit)));
    }
}

/// `-` anywhere selects left justification; digits form the width,
/// capped at `MAX_FIELD_WIDTH`.
fn parse_padding(prefix: &str) -> Padding {
    let digits: String = prefix.chars().filter(char::is_ascii_digit).collect();
    let width = if digits.is_empty() {
        0
    } else {
        digits.parse::<usize>().map_or(MAX_FIELD_WIDTH, |w| w.min(MAX_FIELD_WIDTH))
    };
    Padding { width, left: prefix.contains('-') }
}

fn escaped(c: char) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        other => other,
    }
}
