use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::satisfy;
use nom::combinator::recognize;
use nom::sequence::pair;
use nom::IResult;

use crate::error::Position;

/// Characters skipped between tokens along with whitespace.
const PUNCTUATION: &str = "(){}[]:";

/// True for the characters that may follow a keyword letter, forming a
/// verbose alias such as `TRUE` or `WHILE`.
fn is_keyword_tail(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Character-level read position over a source buffer.
///
/// The cursor only ever moves forward.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Cursor<'a> {
        Cursor {
            source,
            rest: source,
        }
    }

    /// Byte offset of the read position.
    pub fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    pub fn position(&self) -> Position {
        self.position_at(self.offset())
    }

    /// Line and column of an earlier byte offset. Scans the source up to
    /// `offset`, so only call this when reporting an error.
    pub fn position_at(&self, offset: usize) -> Position {
        Position::locate(self.source, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    pub fn take(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    pub fn starts_with(&self, f: impl FnOnce(char) -> bool) -> bool {
        self.peek().map_or(false, f)
    }

    pub fn starts_with_any(&self, chars: &str) -> bool {
        self.starts_with(|c| chars.contains(c))
    }

    fn advance(&mut self, mut parser: impl FnMut(&'a str) -> IResult<&'a str, &'a str>) -> Option<&'a str> {
        let (rest, matched) = parser(self.rest).ok()?;
        self.rest = rest;
        Some(matched)
    }

    /// Consume the longest run of characters satisfying `f`. Returns `None`
    /// if not even one character matches.
    pub fn take_while(&mut self, f: impl Fn(char) -> bool) -> Option<&'a str> {
        self.advance(take_while1(f))
    }

    /// Consume one character satisfying `start`, then the longest run of
    /// characters satisfying `rest`. Returns `None` without moving if the
    /// first character does not match.
    pub fn take_while_if_starts_with(
        &mut self,
        start: impl Fn(char) -> bool,
        rest: impl Fn(char) -> bool,
    ) -> Option<&'a str> {
        self.advance(recognize(pair(satisfy(start), take_while(rest))))
    }

    /// Consume everything up to, but not including, the next `stop`. Possibly
    /// empty.
    pub fn take_until(&mut self, stop: char) -> &'a str {
        self.advance(take_while(|c: char| c != stop)).unwrap_or("")
    }

    /// Consume the tail of a keyword, after its leading letter.
    pub fn strip_keyword(&mut self) {
        self.advance(take_while(is_keyword_tail));
    }

    /// Skip comments, whitespace and structural punctuation until none of
    /// them apply.
    pub fn strip(&mut self) {
        loop {
            if self.take_while_if_starts_with(|c| c == '#', |c| c != '\n').is_some() {
                continue;
            }

            if self.take_while(|c| c.is_whitespace() || PUNCTUATION.contains(c)).is_some() {
                continue;
            }

            break;
        }
    }
}
