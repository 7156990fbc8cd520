//! An interpreter for Knight, a minimal expression-oriented scripting
//! language.
//!
//! Source text is parsed into a tree of runnable [`Object`] nodes, which is
//! then evaluated against a global variable store. Control flow is expressed
//! entirely by builtins choosing which of their unevaluated arguments to run.
//!
//! ```ignore
//! let value = knight::run("; = a 3 + a 1")?;
//! assert_eq!(value, knight::Object::int(4));
//! ```

#[macro_use]
extern crate lazy_static;

mod builtins;
mod error;
pub mod eval;
mod lexing;
mod object;
mod parsing;
mod types;

#[cfg(test)]
mod tests;

use std::fs::read_to_string;
use std::path::Path;

pub use error::{Error, Halt, Position, Reason, Runtime, Syntax};
pub use eval::{BufferEnvironment, Environment, Interpreter, StdEnvironment, Variables};
pub use object::Object;
pub use types::{BinOp, Type};


/// Run a program on standard input and output, with a fresh variable store.
pub fn run(input: &str) -> Result<Object, Halt> {
    let mut env = StdEnvironment {};
    let mut interpreter = Interpreter::new(&mut env);
    interpreter.run(input)
}


/// Run a program from a file on standard input and output, with a fresh
/// variable store.
pub fn run_file(path: &Path) -> Result<Object, Halt> {
    let contents = read_to_string(path)
        .map_err(|e| Error::new(Reason::Read(path.to_path_buf(), e.to_string())))?;
    run(&contents)
}
