//! Recursive-descent parser.
//!
//! Dispatches on the leading character of each value and builds runnable
//! [`Object`] nodes directly. Function calls capture their arguments
//! unevaluated.

use tracing::debug;

use crate::builtins::BUILTINS;
use crate::error::{Error, Syntax};
use crate::eval::Variables;
use crate::lexing::Cursor;
use crate::object::Object;
use crate::types::Key;

type ParseResult = Result<Option<Object>, Error>;

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

pub(crate) struct Parser<'a, 'b> {
    cursor: Cursor<'a>,
    variables: &'b mut Variables,
}

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(source: &'a str, variables: &'b mut Variables) -> Parser<'a, 'b> {
        Parser {
            cursor: Cursor::new(source),
            variables,
        }
    }

    fn error(&self, reason: Syntax) -> Error {
        Error::new(reason).at(self.cursor.position())
    }

    /// Parse the first complete expression of the source. Anything after it
    /// is ignored.
    pub fn program(&mut self) -> Result<Object, Error> {
        let obj = self.value()?.ok_or_else(|| self.error(Syntax::Empty))?;
        debug!(consumed = self.cursor.offset(), "parsed program");
        Ok(obj)
    }

    /// Parse one value. Returns `None` only at end of input.
    pub fn value(&mut self) -> ParseResult {
        self.cursor.strip();

        let c = match self.cursor.peek() {
            None => return Ok(None),
            Some(c) => c,
        };

        if let Some(obj) = self.number()? {
            return Ok(Some(obj));
        }
        if let Some(obj) = self.boolean() {
            return Ok(Some(obj));
        }
        if let Some(obj) = self.text()? {
            return Ok(Some(obj));
        }
        if let Some(obj) = self.null() {
            return Ok(Some(obj));
        }
        if let Some(obj) = self.identifier() {
            return Ok(Some(obj));
        }
        if let Some(obj) = self.function()? {
            return Ok(Some(obj));
        }

        Err(self.error(Syntax::UnknownToken(c)))
    }

    fn number(&mut self) -> ParseResult {
        let start = self.cursor.offset();
        let Some(digits) = self.cursor.take_while(|c| c.is_ascii_digit()) else {
            return Ok(None);
        };

        digits
            .parse::<i64>()
            .map(|x| Some(Object::int(x)))
            .map_err(|_| {
                Error::new(Syntax::NumberTooLarge(digits.to_string())).at(self.cursor.position_at(start))
            })
    }

    fn boolean(&mut self) -> Option<Object> {
        if !self.cursor.starts_with_any("TF") {
            return None;
        }

        let value = self.cursor.take() == Some('T');
        self.cursor.strip_keyword();
        Some(Object::bool(value))
    }

    fn text(&mut self) -> ParseResult {
        let quote = match self.cursor.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Ok(None),
        };

        let start = self.cursor.offset();
        self.cursor.take();
        let contents = self.cursor.take_until(quote);

        if self.cursor.take().is_none() {
            return Err(Error::new(Syntax::UnterminatedString).at(self.cursor.position_at(start)));
        }

        Ok(Some(Object::str(contents)))
    }

    fn null(&mut self) -> Option<Object> {
        if !self.cursor.starts_with(|c| c == 'N') {
            return None;
        }

        self.cursor.take();
        self.cursor.strip_keyword();
        Some(Object::null())
    }

    fn identifier(&mut self) -> Option<Object> {
        let name = self
            .cursor
            .take_while_if_starts_with(is_identifier_start, is_identifier_char)?;

        let key = Key::new(name);
        Some(Object::identifier(key, self.variables.cell(key)))
    }

    fn function(&mut self) -> ParseResult {
        let Some(builtin) = self.cursor.peek().and_then(|c| BUILTINS.get(&c)).copied() else {
            return Ok(None);
        };

        let tag = builtin.tag();
        self.cursor.take();
        if tag.is_ascii_uppercase() {
            self.cursor.strip_keyword();
        }

        let mut args = Vec::with_capacity(builtin.arity());
        for index in 0..builtin.arity() {
            match self.value()? {
                Some(arg) => args.push(arg),
                None => return Err(self.error(Syntax::MissingArgument { tag, index })),
            }
        }

        Ok(Some(Object::call(builtin, args)))
    }
}

/// Parse source text into a runnable object, binding identifiers in
/// `variables`.
pub fn parse(source: &str, variables: &mut Variables) -> Result<Object, Error> {
    Parser::new(source, variables).program()
}
