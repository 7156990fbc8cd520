use std::cmp::Ordering;
use std::collections::HashMap;

use rand::Rng;
use tracing::trace;

use crate::error::{Halt, Runtime};
use crate::eval::Interpreter;
use crate::object::{text, Object};
use crate::types::{BinOp, Builtin, Res};


macro_rules! builtin {
    ($m: ident, $tag: expr, $arity: expr, $e: ident) => {
        $m.insert($tag, Builtin::new($e, $tag, $arity))
    };
}


lazy_static! {
    /// The builtin table, keyed by tag character.
    pub static ref BUILTINS: HashMap<char, Builtin> = {
        let mut m = HashMap::new();
        builtin!(m, 'P', 0, prompt);
        builtin!(m, 'R', 0, random);

        builtin!(m, 'E', 1, eval);
        builtin!(m, 'B', 1, block);
        builtin!(m, 'C', 1, call);
        builtin!(m, '`', 1, system);
        builtin!(m, 'Q', 1, quit);
        builtin!(m, '!', 1, not);
        builtin!(m, 'L', 1, length);
        builtin!(m, 'D', 1, dump);
        builtin!(m, 'O', 1, output);

        builtin!(m, '+', 2, add);
        builtin!(m, '-', 2, subtract);
        builtin!(m, '*', 2, multiply);
        builtin!(m, '/', 2, divide);
        builtin!(m, '%', 2, modulo);
        builtin!(m, '^', 2, power);
        builtin!(m, '?', 2, equals);
        builtin!(m, '<', 2, less);
        builtin!(m, '>', 2, greater);
        builtin!(m, '&', 2, and);
        builtin!(m, '|', 2, or);
        builtin!(m, ';', 2, then);
        builtin!(m, '=', 2, assign);
        builtin!(m, 'W', 2, while_);

        builtin!(m, 'I', 3, if_);
        builtin!(m, 'G', 3, get);

        builtin!(m, 'S', 4, substitute);
        m
    };
}


/// Read a line from the input source. End of input reads as empty text.
pub fn prompt(interpreter: &mut Interpreter, _: &[Object]) -> Res<Object> {
    let line = interpreter.env().read_line()?;
    Ok(Object::from(line.unwrap_or_default()))
}


/// A fresh non-negative random number.
pub fn random(_: &mut Interpreter, _: &[Object]) -> Res<Object> {
    Ok(Object::int(rand::thread_rng().gen_range(0..=i32::MAX as i64)))
}


/// Run text as a program, sharing the current variables.
pub fn eval(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let source = args[0].to_text(interpreter)?;
    trace!(source = %source, "eval");
    interpreter.run(&source)
}


/// Return the argument unevaluated.
pub fn block(_: &mut Interpreter, args: &[Object]) -> Res<Object> {
    Ok(args[0].clone())
}


/// Evaluate the argument, then evaluate the result.
pub fn call(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    args[0].evaluate(interpreter)?.evaluate(interpreter)
}


/// Run a shell command and return its standard output.
pub fn system(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let command = args[0].to_text(interpreter)?;
    trace!(command = %command, "shell");
    let stdout = interpreter.env().shell(&command)?;
    Ok(Object::from(stdout))
}


/// Request termination of the whole process.
pub fn quit(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let code = args[0].to_int(interpreter)?;
    Err(Halt::Exit(code as i32))
}


pub fn not(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    Ok(Object::bool(!args[0].truthy(interpreter)?))
}


/// Number of characters in the text coercion of the argument.
pub fn length(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let text = args[0].to_text(interpreter)?;
    Ok(Object::int(text.chars().count() as i64))
}


/// Write the debug representation of the evaluated argument on its own line,
/// and return it.
pub fn dump(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let value = args[0].evaluate(interpreter)?;
    let env = interpreter.env();
    env.write(&value.dump())?;
    env.write("\n")?;
    Ok(value)
}


/// Write text followed by a newline. A trailing backslash is removed instead,
/// and suppresses the newline.
pub fn output(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let text = args[0].to_text(interpreter)?;
    let env = interpreter.env();
    match text.strip_suffix('\\') {
        Some(stripped) => env.write(stripped)?,
        None => {
            env.write(&text)?;
            env.write("\n")?;
        }
    }
    Ok(Object::null())
}


fn arithmetic(op: BinOp, interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let lhs = args[0].evaluate(interpreter)?;
    let rhs = args[1].evaluate(interpreter)?;
    lhs.operate(op, &rhs, interpreter)
}

pub fn add(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Add, interpreter, args)
}

pub fn subtract(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Subtract, interpreter, args)
}

pub fn multiply(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Multiply, interpreter, args)
}

pub fn divide(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Divide, interpreter, args)
}

pub fn modulo(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Modulo, interpreter, args)
}

pub fn power(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    arithmetic(BinOp::Power, interpreter, args)
}


/// Strict equality, no coercion.
pub fn equals(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let lhs = args[0].evaluate(interpreter)?;
    let rhs = args[1].evaluate(interpreter)?;
    Ok(Object::bool(lhs == rhs))
}


fn ordering(interpreter: &mut Interpreter, args: &[Object]) -> Res<Ordering> {
    let lhs = args[0].evaluate(interpreter)?;
    let rhs = args[1].evaluate(interpreter)?;
    Ok(lhs.compare(&rhs)?)
}

pub fn less(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    Ok(Object::bool(ordering(interpreter, args)? == Ordering::Less))
}

pub fn greater(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    Ok(Object::bool(ordering(interpreter, args)? == Ordering::Greater))
}


pub fn and(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let lhs = args[0].evaluate(interpreter)?;
    if lhs.truthy(interpreter)? {
        args[1].evaluate(interpreter)
    } else {
        Ok(lhs)
    }
}


pub fn or(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let lhs = args[0].evaluate(interpreter)?;
    if lhs.truthy(interpreter)? {
        Ok(lhs)
    } else {
        args[1].evaluate(interpreter)
    }
}


pub fn then(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    args[0].evaluate(interpreter)?;
    args[1].evaluate(interpreter)
}


/// Bind the evaluated right side to the variable on the left.
pub fn assign(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let Some((key, cell)) = args[0].get_binding() else {
        return Err(Runtime::Assign(args[0].type_of()).into());
    };

    let value = args[1].evaluate(interpreter)?;
    trace!(name = %key, "assign");
    *cell.borrow_mut() = Some(value.clone());
    Ok(value)
}


pub fn while_(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    while args[0].truthy(interpreter)? {
        args[1].evaluate(interpreter)?;
    }
    Ok(Object::null())
}


pub fn if_(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    if args[0].truthy(interpreter)? {
        args[1].evaluate(interpreter)
    } else {
        args[2].evaluate(interpreter)
    }
}


/// Substring by start and length.
pub fn get(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let source = args[0].to_text(interpreter)?;
    let start = args[1].to_int(interpreter)?;
    let length = args[2].to_int(interpreter)?;
    Ok(Object::from(text::get(&source, start, length)?))
}


/// Replace a substring by start and length.
pub fn substitute(interpreter: &mut Interpreter, args: &[Object]) -> Res<Object> {
    let source = args[0].to_text(interpreter)?;
    let start = args[1].to_int(interpreter)?;
    let length = args[2].to_int(interpreter)?;
    let replacement = args[3].to_text(interpreter)?;
    Ok(Object::from(text::substitute(&source, start, length, &replacement)?))
}
