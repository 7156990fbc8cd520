use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::process::{Command, Stdio};

use gc::{Gc, GcCell};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Error, Halt};
use crate::object::Object;
use crate::parsing;
use crate::types::{Cell, Key, Res};


// Environment
// ------------------------------------------------------------------------------------------------

/// The outside world as seen by a running program: a line-based input source,
/// an ordered output sink, and a shell.
pub trait Environment {
    /// Read one line without its line terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write text verbatim.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Run a command line synchronously and return its standard output.
    fn shell(&mut self, command: &str) -> io::Result<String>;
}


/// Standard input and output, and `/bin/sh`.
pub struct StdEnvironment {}

impl Environment for StdEnvironment {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn shell(&mut self, command: &str) -> io::Result<String> {
        let output = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stderr(Stdio::inherit())
            .output()?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}


/// In-memory environment: scripted input lines, captured output, and canned
/// responses for shell commands. Unknown commands produce no output.
#[derive(Debug, Default)]
pub struct BufferEnvironment {
    input: VecDeque<String>,
    output: String,
    commands: HashMap<String, String>,
}

impl BufferEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue lines to be returned by successive reads.
    pub fn with_input<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Register the output of a shell command.
    pub fn with_command(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.commands.insert(command.into(), output.into());
        self
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Environment for BufferEnvironment {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn shell(&mut self, command: &str) -> io::Result<String> {
        Ok(self.commands.get(command).cloned().unwrap_or_default())
    }
}


// Variables
// ------------------------------------------------------------------------------------------------

/// The global variable store.
///
/// Each name maps to a single live binding, created the first time the name
/// is parsed. Every identifier node for that name shares the binding, so an
/// assignment is seen by all of them. Bindings are never removed.
#[derive(Default)]
pub struct Variables {
    names: IndexMap<Key, Cell>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the binding for `key`, creating an unassigned one if absent.
    pub(crate) fn cell(&mut self, key: Key) -> Cell {
        self.names
            .entry(key)
            .or_insert_with(|| Gc::new(GcCell::new(None)))
            .clone()
    }

    /// Bind `value` to `key`.
    pub fn set(&mut self, key: Key, value: Object) {
        *self.cell(key).borrow_mut() = Some(value);
    }

    /// Current value of a variable, if it has been assigned.
    pub fn get(&self, name: &str) -> Option<Object> {
        self.names
            .get(&Key::new(name))
            .and_then(|cell| cell.borrow().clone())
    }

    /// Number of names seen, assigned or not.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}


// Interpreter
// ------------------------------------------------------------------------------------------------

/// Runs Knight programs against one variable store and one environment.
///
/// Every call to [`Interpreter::run`] on the same interpreter shares the
/// store. Use a fresh interpreter for an isolated run.
pub struct Interpreter<'a> {
    variables: Variables,
    env: &'a mut dyn Environment,
}

impl<'a> Interpreter<'a> {
    pub fn new(env: &'a mut dyn Environment) -> Self {
        Interpreter {
            variables: Variables::new(),
            env,
        }
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut Variables {
        &mut self.variables
    }

    pub(crate) fn env(&mut self) -> &mut dyn Environment {
        &mut *self.env
    }

    /// Parse source without running it.
    pub fn parse(&mut self, source: &str) -> Result<Object, Error> {
        parsing::parse(source, &mut self.variables)
    }

    /// Parse and run source, returning the value of its first expression.
    pub fn run(&mut self, source: &str) -> Res<Object> {
        debug!(length = source.len(), "run");
        let program = self.parse(source)?;
        let result = program.evaluate(self);
        if let Err(Halt::Exit(code)) = &result {
            trace!(code, "exit requested");
        }
        result
    }
}
