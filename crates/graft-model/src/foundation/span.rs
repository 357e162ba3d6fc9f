//! Source locations and syntactic elements.
//!
//! The resolver never parses source itself; the front-end hands it
//! pre-resolved facts. `Span` and `Element` exist so diagnostics can point
//! back at the declaration that caused them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A region of a source file.
///
/// Spans are opaque to the resolver: they are carried through to diagnostics
/// and never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Index of the source file in the front-end's file table.
    pub file: usize,
    /// Byte offset of the start of the region.
    pub start: u32,
    /// Byte offset one past the end of the region.
    pub end: u32,
    /// 1-based line number of the start.
    pub line: u32,
}

impl Span {
    /// Creates a new span.
    pub fn new(file: usize, start: u32, end: u32, line: u32) -> Self {
        Self {
            file,
            start,
            end,
            line,
        }
    }
}

/// A syntactic element a diagnostic can be attributed to: a provider method,
/// an injectable constructor, a component interface.
///
/// The name is whatever rendering the front-end considers readable
/// (`"AppModule.provideClock()"`, `"Clock()"`); the resolver only displays it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    /// Human-readable rendering of the element.
    pub name: String,
    /// Where the element was declared.
    pub span: Span,
}

impl Element {
    /// Creates an element with the given display name.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_display_is_name() {
        let e = Element::new("AppModule.provideClock()", Span::new(0, 0, 5, 1));
        assert_eq!(e.to_string(), "AppModule.provideClock()");
    }
}
