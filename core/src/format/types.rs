//! format/types.rs
//! Parsed template tokens and format errors.

use crate::tags::Tag;

/// Where a template field takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSource {
    /// A real header tag.
    Header(Tag),
    /// A virtual tag: slot in the extension registry.
    Extension(usize),
}

/// Field width and justification from `%[-][width]{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub width: usize,
    pub left: bool,
}

impl Padding {
    /// Pad `s` with spaces to `width` characters.
    pub fn apply(&self, s: &str) -> String {
        let w = self.width;
        if self.left {
            format!("{s:<w$}")
        } else {
            format!("{s:>w$}")
        }
    }
}

/// One `%{...}` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub source: TagSource,
    pub pad: Padding,
    /// Always use the first element (`=` flag).
    pub just_one: bool,
    /// Render the element count instead of a value (`#` flag).
    pub array_count: bool,
    /// Renderer name after `:`.
    pub renderer: Option<String>,
}

/// `%|NAME?{if}:{else}|`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub source: TagSource,
    pub if_tokens: Vec<Token>,
    pub else_tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Tag(TagRef),
    /// `[...]`: repeated once per element.
    Array(Vec<Token>),
    Cond(Conditional),
}

/// Value handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg<'a> {
    Integer(i64),
    Text(&'a str),
    Binary(&'a [u8]),
}

/// Template parse errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("missing {{ after %")]
    MissingOpenBrace,

    #[error("missing }} after %{{")]
    MissingCloseBrace,

    #[error("empty tag format")]
    EmptyTagFormat,

    #[error("empty tag name")]
    EmptyTagName,

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("] expected at end of array")]
    ArrayNotClosed,

    #[error("unexpected ]")]
    UnexpectedBracket,

    #[error("unexpected }}")]
    UnexpectedBrace,

    #[error("? expected in expression")]
    QuestionExpected,

    #[error("{{ expected after ? in expression")]
    OpenBraceAfterQuestion,

    #[error("}} expected in expression")]
    ExpressionNotClosed,

    #[error(": expected following ? subexpression")]
    ColonExpected,

    #[error("{{ expected after : in expression")]
    OpenBraceAfterColon,

    #[error("| expected at end of expression")]
    PipeExpected,
}
