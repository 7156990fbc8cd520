use std::fmt::{Debug, Display};

use gc::{Gc, GcCell};
use symbol_table::GlobalSymbol;

use crate::error::Halt;
use crate::eval::Interpreter;
use crate::object::Object;

/// Type used for all interned variable names.
pub type Key = GlobalSymbol;

/// The live binding of a variable. Empty until first assigned.
pub type Cell = Gc<GcCell<Option<Object>>>;

/// Result of evaluating anything: a value, or an abrupt halt.
pub type Res<T> = Result<T, Halt>;

/// Signature of a builtin body. Arguments arrive unevaluated; the body decides
/// which of them to evaluate, and how many times.
pub type NativeFunction = fn(&mut Interpreter<'_>, &[Object]) -> Res<Object>;

/// An entry of the builtin table: the tag it is invoked by, how many
/// arguments the parser collects for it, and the native body.
#[derive(Copy, Clone)]
pub struct Builtin {
    func: NativeFunction,
    tag: char,
    arity: usize,
}

impl Builtin {
    pub fn new(func: NativeFunction, tag: char, arity: usize) -> Builtin {
        Builtin { func, tag, arity }
    }

    pub fn call(&self, interpreter: &mut Interpreter<'_>, args: &[Object]) -> Res<Object> {
        (self.func)(interpreter, args)
    }

    pub fn tag(&self) -> char {
        self.tag
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("tag", &self.tag)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Enumeration of all the different types a Knight object can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Number,
    Text,
    Boolean,
    Null,

    /// A reference to a variable, not yet looked up.
    Identifier,

    /// A builtin applied to unevaluated arguments.
    Function,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => f.write_str("number"),
            Self::Text => f.write_str("text"),
            Self::Boolean => f.write_str("boolean"),
            Self::Null => f.write_str("null"),
            Self::Identifier => f.write_str("identifier"),
            Self::Function => f.write_str("function"),
        }
    }
}

/// Arithmetic operators, dispatched on the left operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => f.write_str("+"),
            Self::Subtract => f.write_str("-"),
            Self::Multiply => f.write_str("*"),
            Self::Divide => f.write_str("/"),
            Self::Modulo => f.write_str("%"),
            Self::Power => f.write_str("^"),
        }
    }
}
