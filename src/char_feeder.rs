//! One-character-lookahead cursor over a grammar source.

/// Feeds characters to the parser, keeping the current character, the one
/// after it, and the position of the current character.
///
/// Lines and columns start at 1. Advancing over `'\n'` moves to the next line.
#[derive(Debug)]
pub struct CharFeeder<I: Iterator<Item = char>> {
    source: I,
    current: Option<char>,
    next: Option<char>,
    line: usize,
    column: usize,
}

impl<I: Iterator<Item = char>> CharFeeder<I> {
    /// Create a feeder positioned on the first character of `source`
    pub fn new(mut source: I) -> Self {
        let current = source.next();
        let next = if current.is_some() { source.next() } else { None };
        CharFeeder {
            source,
            current,
            next,
            line: 1,
            column: 1,
        }
    }

    /// The current character, or `'\0'` at the end
    pub fn getc(&self) -> char {
        self.current.unwrap_or('\0')
    }

    /// The character after the current one, or `'\0'` if there is none
    pub fn nextc(&self) -> char {
        self.next.unwrap_or('\0')
    }

    /// Is the feeder past the last character?
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Is there no character after the current one?
    pub fn is_next_end(&self) -> bool {
        self.next.is_none()
    }

    /// Move to the next character. A no-op at the end.
    pub fn advance(&mut self) {
        let Some(c) = self.current else {
            return;
        };
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.current = self.next;
        self.next = if self.current.is_some() {
            self.source.next()
        } else {
            None
        };
    }

    /// Line of the current character
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the current character, counted in characters
    pub fn column(&self) -> usize {
        self.column
    }
}
