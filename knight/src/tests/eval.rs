use std::path::Path;

use pretty_assertions::assert_eq;

use crate::error::{Reason, Runtime, Syntax};
use crate::tests::{assert_runtime, assert_seq, eval, eval_with, output};
use crate::types::{Key, Type};
use crate::{BufferEnvironment, Halt, Interpreter, Object};


#[test]
fn sequence_and_assignment() {
    assert_seq!(eval("; = a 3 + a 1"), Object::int(4));
    assert_seq!(eval("= a 3"), Object::int(3));
    assert_seq!(eval("; 1 2"), Object::int(2));

    let mut env = BufferEnvironment::new();
    let mut interpreter = Interpreter::new(&mut env);
    interpreter.run("; = a 3 = a + a 1").unwrap();
    assert_eq!(interpreter.variables().get("a"), Some(Object::int(4)));
}


#[test]
fn loops() {
    let (result, out) = eval_with(BufferEnvironment::new(), "; = i 0 ; W < i 3 ; O i = i + i 1 i");
    assert_seq!(result, Object::int(3));
    assert_eq!(out, "0\n1\n2\n");

    assert_seq!(
        eval("; = n 5 ; = acc 1 ; W > n 0 ; = acc * acc n = n - n 1 acc"),
        Object::int(120),
    );
}


#[test]
fn while_false_never_runs() {
    let (result, out) = eval_with(BufferEnvironment::new(), "W F O 'x'");
    assert_seq!(result, Object::null());
    assert_eq!(out, "");
}


#[test]
fn short_circuit() {
    let (result, out) = eval_with(BufferEnvironment::new(), "& F O \"x\"");
    assert_seq!(result, Object::bool(false));
    assert_eq!(out, "");

    let (result, out) = eval_with(BufferEnvironment::new(), "| T O 'x'");
    assert_seq!(result, Object::bool(true));
    assert_eq!(out, "");

    assert_seq!(eval("& 1 'yes'"), Object::str("yes"));
    assert_seq!(eval("& 0 undefined"), Object::int(0));
    assert_seq!(eval("| '' N"), Object::null());
    assert_seq!(eval("| 'a' undefined"), Object::str("a"));
}


#[test]
fn quit_from_depth() {
    let (result, out) = eval_with(
        BufferEnvironment::new(),
        "; = f B ; O 'in' Q 7 ; O 'before' ; C f O 'never'",
    );
    assert_eq!(result, Err(Halt::Exit(7)));
    assert_eq!(out, "before\nin\n");

    let (result, out) = eval_with(BufferEnvironment::new(), "; W T Q 0 O 'after'");
    assert_eq!(result, Err(Halt::Exit(0)));
    assert_eq!(out, "");
    assert!(Halt::Exit(0).error().is_none());
}


#[test]
fn eval_shares_store() {
    assert_seq!(eval("; = x 2 E '+ x 1'"), Object::int(3));
    assert_seq!(eval("; E '= y 9' y"), Object::int(9));
    assert_seq!(eval("E + '+ 1 ' 2"), Object::int(3));
    assert_seq!(eval("E 5"), Object::int(5));

    match eval("E ''") {
        Err(Halt::Error(err)) => assert_eq!(err.reason(), &Reason::Syntax(Syntax::Empty)),
        other => panic!("expected parse error, got {:?}", other),
    }
}


#[test]
fn block_and_call() {
    assert_seq!(eval("; = n 1 ; = blk B + n 10 ; = n 5 C blk"), Object::int(15));
    assert_seq!(eval("C B 'plain'"), Object::str("plain"));

    // A block is not run until it is called.
    assert_eq!(eval("B undefined").unwrap().type_of(), Type::Identifier);
    assert_eq!(output("; B O 'x' N"), "");

    // Variables hold blocks unevaluated.
    assert_eq!(eval("; = a B + 1 2 a").unwrap().type_of(), Type::Function);
}


#[test]
fn recursion() {
    let code = "
        ; = count B
            I ? n 0
                0
                ; = n - n 1
                + 1 C count
        ; = n 50
        C count
    ";
    assert_seq!(eval(code), Object::int(50));
}


#[test]
fn store_isolation() {
    assert_seq!(eval("= a 1"), Object::int(1));
    assert_runtime!(eval("a"));

    let mut env = BufferEnvironment::new();
    let mut interpreter = Interpreter::new(&mut env);
    assert_seq!(interpreter.run("= a 5"), Object::int(5));
    assert_seq!(interpreter.run("+ a 1"), Object::int(6));
    assert_eq!(interpreter.variables().len(), 1);
}


#[test]
fn host_bindings() {
    let mut env = BufferEnvironment::new();
    let mut interpreter = Interpreter::new(&mut env);
    assert!(interpreter.variables().is_empty());

    interpreter.variables_mut().set(Key::new("limit"), Object::int(3));
    assert!(!interpreter.variables().is_empty());
    assert_seq!(interpreter.run("* limit 2"), Object::int(6));

    // Names bound by the host and by programs share one store.
    interpreter.run("= limit + limit 1").unwrap();
    assert_eq!(interpreter.variables().get("limit"), Some(Object::int(4)));
    interpreter.variables_mut().set(Key::new("limit"), Object::str("x"));
    assert_seq!(interpreter.run("+ limit 'y'"), Object::str("xy"));
    assert_eq!(interpreter.variables().len(), 1);
}


#[test]
fn unbound_identifier() {
    match eval("+ 1 missing") {
        Err(Halt::Error(err)) => {
            assert_eq!(err.reason(), &Reason::Runtime(Runtime::Unbound(Key::new("missing"))));
            assert_eq!(err.to_string(), "unknown identifier 'missing'");
        }
        other => panic!("expected runtime error, got {:?}", other),
    }
}


#[test]
fn assign_to_non_identifier() {
    let (result, out) = eval_with(BufferEnvironment::new(), "= 3 O 'x'");
    match result {
        Err(Halt::Error(err)) => assert_eq!(err.reason(), &Reason::Runtime(Runtime::Assign(Type::Number))),
        other => panic!("expected runtime error, got {:?}", other),
    }
    assert_eq!(out, "");
}


#[test]
fn prompt() {
    let env = BufferEnvironment::new().with_input(["hello", "world"]);
    let (result, _) = eval_with(env, "; = a P ; = b P + a b");
    assert_seq!(result, Object::str("helloworld"));

    assert_seq!(eval("P"), Object::str(""));

    let env = BufferEnvironment::new().with_input(["only"]);
    let (result, _) = eval_with(env, "; P P");
    assert_seq!(result, Object::str(""));
}


#[test]
fn shell() {
    let env = BufferEnvironment::new().with_command("echo hi", "hi\n");
    let (result, _) = eval_with(env, "` 'echo hi'");
    assert_seq!(result, Object::str("hi\n"));

    assert_seq!(eval("` 'unknown'"), Object::str(""));
}


#[test]
fn identity_of_nodes() {
    assert_seq!(eval("? B 1 B 1"), Object::bool(true));
    assert_seq!(eval("; = a B + 1 2 ? a a"), Object::bool(false));
}


#[test]
fn parse_errors_are_reported() {
    match eval("@") {
        Err(Halt::Error(err)) => {
            assert!(err.is_parse());
            assert_eq!(err.to_string(), "unknown token start '@' (line 1, column 1)");
        }
        other => panic!("expected parse error, got {:?}", other),
    }

    // Nothing runs when the program fails to parse.
    let (result, out) = eval_with(BufferEnvironment::new(), "; O 'x' + 1");
    assert!(result.is_err());
    assert_eq!(out, "");
}


#[test]
fn missing_file() {
    match crate::run_file(Path::new("/nonexistent/program.kn")) {
        Err(Halt::Error(err)) => assert!(matches!(err.reason(), Reason::Read(..))),
        other => panic!("expected read error, got {:?}", other),
    }
}
