mod eval;

use crate::{BufferEnvironment, Halt, Interpreter, Object};


/// Run a program in a fresh in-memory environment.
pub(crate) fn eval(code: &str) -> Result<Object, Halt> {
    eval_with(BufferEnvironment::new(), code).0
}


/// Run a program in the given in-memory environment and return the result
/// along with everything the program wrote.
pub(crate) fn eval_with(mut env: BufferEnvironment, code: &str) -> (Result<Object, Halt>, String) {
    let result = Interpreter::new(&mut env).run(code);
    (result, env.output().to_string())
}


/// Run a program with no input and return only its output.
pub(crate) fn output(code: &str) -> String {
    let (result, out) = eval_with(BufferEnvironment::new(), code);
    assert!(result.is_ok(), "program failed: {:?}", result);
    out
}


macro_rules! assert_seq {
    ($x:expr , $y:expr $(,)?) => {
        pretty_assertions::assert_eq!($x, Ok($y))
    };
}

pub(crate) use assert_seq;


/// Assert that a result is a runtime error.
macro_rules! assert_runtime {
    ($x:expr $(,)?) => {
        match $x {
            Err($crate::Halt::Error(err)) => assert!(err.is_runtime(), "expected runtime error, got {}", err),
            other => panic!("expected runtime error, got {:?}", other),
        }
    };
}

pub(crate) use assert_runtime;
