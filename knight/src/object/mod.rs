//! A Knight value is represented by the [`Object`] type. Internally an Object
//! just wraps the `ObjV` enumeration, which is hidden for encapsulation
//! purposes.
//!
//! Four variants are literals (numbers, text, booleans and null): evaluating
//! them returns the same value every time. The other two are program nodes
//! produced by the parser: a reference to a variable binding, and a builtin
//! applied to unevaluated argument nodes. Evaluating those may yield a
//! different result each time.

pub(crate) mod number;
pub(crate) mod text;

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Write};

use gc::{Finalize, Gc, Trace};
use tracing::trace;

use crate::error::{Error, Runtime};
use crate::eval::Interpreter;
use crate::types::{BinOp, Builtin, Cell, Key, Res, Type};

/// A builtin applied to its argument nodes. The argument count always equals
/// the arity of the builtin.
#[derive(Trace, Finalize)]
pub(crate) struct Call {
    #[unsafe_ignore_trace]
    builtin: Builtin,

    args: Vec<Object>,
}

/// The object variant implements all possible variants of Knight values,
/// although it's not the user-facing type, which is [`Object`].
#[derive(Clone, Trace, Finalize)]
enum ObjV {
    /// Integers
    Number(i64),

    /// Strings
    Text(Gc<String>),

    /// Booleans
    Boolean(bool),

    /// Null
    Null,

    /// Variable reference, resolved to its live binding at parse time
    Identifier(#[unsafe_ignore_trace] Key, Cell),

    /// Function call node
    Call(Gc<Call>),
}

/// The general type of Knight values.
#[derive(Clone, Trace, Finalize)]
pub struct Object(ObjV);

impl Object {
    /// Construct a number.
    pub fn int(x: i64) -> Object {
        Object(ObjV::Number(x))
    }

    /// Construct a text value.
    pub fn str<T: AsRef<str>>(x: T) -> Object {
        Object(ObjV::Text(Gc::new(x.as_ref().to_string())))
    }

    /// Construct a boolean.
    pub fn bool(x: bool) -> Object {
        Object(ObjV::Boolean(x))
    }

    /// Construct the null value.
    pub fn null() -> Object {
        Object(ObjV::Null)
    }

    pub(crate) fn identifier(key: Key, cell: Cell) -> Object {
        Object(ObjV::Identifier(key, cell))
    }

    pub(crate) fn call(builtin: Builtin, args: Vec<Object>) -> Object {
        Object(ObjV::Call(Gc::new(Call { builtin, args })))
    }

    /// Return the type of this object.
    pub fn type_of(&self) -> Type {
        match self.0 {
            ObjV::Number(_) => Type::Number,
            ObjV::Text(_) => Type::Text,
            ObjV::Boolean(_) => Type::Boolean,
            ObjV::Null => Type::Null,
            ObjV::Identifier(..) => Type::Identifier,
            ObjV::Call(_) => Type::Function,
        }
    }

    /// True for the variants whose evaluation is the identity.
    pub fn is_literal(&self) -> bool {
        !matches!(self.0, ObjV::Identifier(..) | ObjV::Call(_))
    }

    pub fn get_int(&self) -> Option<i64> {
        match self.0 {
            ObjV::Number(x) => Some(x),
            _ => None,
        }
    }

    pub fn get_str(&self) -> Option<&str> {
        match &self.0 {
            ObjV::Text(x) => Some(x.as_str()),
            _ => None,
        }
    }

    pub fn get_bool(&self) -> Option<bool> {
        match self.0 {
            ObjV::Boolean(x) => Some(x),
            _ => None,
        }
    }

    pub fn get_null(&self) -> Option<()> {
        match self.0 {
            ObjV::Null => Some(()),
            _ => None,
        }
    }

    /// The variable name and binding, if this is an identifier node.
    pub(crate) fn get_binding(&self) -> Option<(Key, &Cell)> {
        match &self.0 {
            ObjV::Identifier(key, cell) => Some((*key, cell)),
            _ => None,
        }
    }

    /// Evaluate this object once.
    ///
    /// Literals return themselves. Identifiers return the value currently
    /// bound, which is not evaluated further. Function calls hand their
    /// unevaluated arguments to the builtin body.
    pub fn evaluate(&self, interpreter: &mut Interpreter<'_>) -> Res<Object> {
        match &self.0 {
            ObjV::Identifier(key, cell) => {
                let value = cell.borrow().clone();
                value.ok_or_else(|| Error::new(Runtime::Unbound(*key)).into())
            }
            ObjV::Call(call) => {
                trace!(tag = %call.builtin.tag(), "dispatch");
                call.builtin.call(interpreter, &call.args)
            }
            _ => Ok(self.clone()),
        }
    }

    /// Boolean coercion. Non-literals are evaluated first.
    pub fn truthy(&self, interpreter: &mut Interpreter<'_>) -> Res<bool> {
        match &self.0 {
            ObjV::Number(x) => Ok(*x != 0),
            ObjV::Text(x) => Ok(!x.is_empty()),
            ObjV::Boolean(x) => Ok(*x),
            ObjV::Null => Ok(false),
            _ => self.evaluate(interpreter)?.truthy(interpreter),
        }
    }

    /// Integer coercion. Non-literals are evaluated first.
    pub fn to_int(&self, interpreter: &mut Interpreter<'_>) -> Res<i64> {
        match &self.0 {
            ObjV::Number(x) => Ok(*x),
            ObjV::Text(x) => Ok(text::to_int(x)),
            ObjV::Boolean(x) => Ok(*x as i64),
            ObjV::Null => Ok(0),
            _ => self.evaluate(interpreter)?.to_int(interpreter),
        }
    }

    /// Text coercion. Non-literals are evaluated first.
    pub fn to_text(&self, interpreter: &mut Interpreter<'_>) -> Res<String> {
        if self.is_literal() {
            Ok(self.to_string())
        } else {
            self.evaluate(interpreter)?.to_text(interpreter)
        }
    }

    /// Apply an arithmetic operator, dispatching on the variant of `self`.
    /// The right operand is coerced as the left operand requires.
    pub fn operate(&self, op: BinOp, rhs: &Object, interpreter: &mut Interpreter<'_>) -> Res<Object> {
        match &self.0 {
            ObjV::Number(x) => {
                let y = rhs.to_int(interpreter)?;
                Ok(Object::int(number::arithmetic(*x, op, y)?))
            }

            ObjV::Text(x) => match op {
                BinOp::Add => {
                    let y = rhs.to_text(interpreter)?;
                    Ok(Object::from(format!("{}{}", x.as_str(), y)))
                }
                BinOp::Multiply => {
                    let count = rhs.to_int(interpreter)?;
                    Ok(Object::from(text::repeat(x, count)?))
                }
                _ => Err(Runtime::Unsupported(op, Type::Text).into()),
            },

            ObjV::Boolean(_) | ObjV::Null => Err(Runtime::Unsupported(op, self.type_of()).into()),

            _ => self.evaluate(interpreter)?.operate(op, rhs, interpreter),
        }
    }

    /// Ordering between two values of the same variant: numbers and booleans
    /// in natural order, text byte-wise. Anything else is an error.
    pub fn compare(&self, other: &Object) -> Result<Ordering, Error> {
        match (&self.0, &other.0) {
            (ObjV::Number(x), ObjV::Number(y)) => Ok(x.cmp(y)),
            (ObjV::Text(x), ObjV::Text(y)) => Ok(x.as_bytes().cmp(y.as_bytes())),
            (ObjV::Boolean(x), ObjV::Boolean(y)) => Ok(x.cmp(y)),
            _ => Err(Error::new(Runtime::Compare(self.type_of(), other.type_of()))),
        }
    }

    /// Render the debug representation: the variant name followed by its
    /// contents, recursively for function arguments.
    pub fn dump(&self) -> String {
        format!("{:?}", self)
    }

    fn dump_to<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        match &self.0 {
            ObjV::Number(x) => write!(out, "Number({})", x),
            ObjV::Text(x) => write!(out, "String({})", x.as_str()),
            ObjV::Boolean(x) => write!(out, "Boolean({})", x),
            ObjV::Null => out.write_str("Null()"),
            ObjV::Identifier(key, _) => write!(out, "Identifier({})", key),
            ObjV::Call(call) => {
                out.write_str("Function(")?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    arg.dump_to(out)?;
                }
                out.write_str(")")
            }
        }
    }
}

/// Strict equality: same variant and same contents. Identifiers and function
/// calls are never equal to anything.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (ObjV::Number(x), ObjV::Number(y)) => x == y,
            (ObjV::Text(x), ObjV::Text(y)) => x.as_str() == y.as_str(),
            (ObjV::Boolean(x), ObjV::Boolean(y)) => x == y,
            (ObjV::Null, ObjV::Null) => true,
            _ => false,
        }
    }
}

/// The text coercion of literals. Program nodes show their debug form.
impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            ObjV::Number(x) => Display::fmt(x, f),
            ObjV::Text(x) => f.write_str(x),
            ObjV::Boolean(x) => Display::fmt(x, f),
            ObjV::Null => f.write_str("null"),
            _ => self.dump_to(f),
        }
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.dump_to(f)
    }
}

impl From<i64> for Object {
    fn from(x: i64) -> Self {
        Object::int(x)
    }
}

impl From<bool> for Object {
    fn from(x: bool) -> Self {
        Object::bool(x)
    }
}

impl From<&str> for Object {
    fn from(x: &str) -> Self {
        Object::str(x)
    }
}

impl From<String> for Object {
    fn from(x: String) -> Self {
        Object(ObjV::Text(Gc::new(x)))
    }
}
