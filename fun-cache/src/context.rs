//! Cache context tags

use std::fmt;

/// Cache partition tag orthogonal to call arguments.
///
/// `Contextless` is the distinguished no-context tag: the default active
/// context and the only slice eligible for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// The distinguished no-context tag.
    #[default]
    Contextless,
    /// A named context.
    Tag(String),
}

impl Context {
    /// True for the distinguished no-context tag.
    pub fn is_contextless(&self) -> bool {
        matches!(self, Context::Contextless)
    }
}

impl From<&str> for Context {
    fn from(tag: &str) -> Self {
        Context::Tag(tag.to_string())
    }
}

impl From<String> for Context {
    fn from(tag: String) -> Self {
        Context::Tag(tag)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Contextless => write!(f, "<none>"),
            Context::Tag(tag) => write!(f, "{tag}"),
        }
    }
}
