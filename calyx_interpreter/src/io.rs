//! The observation sink used by `show` and the input source used by `read`.
//!
//! Both are traits so that embedders and tests can run programs without
//! touching the real console.

use crate::ast::Value;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Receives every value passed to `show`, in evaluation order.
pub trait Output {
    fn show(&mut self, value: &Value) -> io::Result<()>;
}

/// Supplies one line per `read`. `Ok(None)` means the input is exhausted.
pub trait Input {
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Writes each shown value on its own line to standard output.
#[derive(Debug, Default)]
pub struct StdOutput;

impl Output for StdOutput {
    fn show(&mut self, value: &Value) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", value)?;
        stdout.flush()
    }
}

/// Prompts on standard output and reads a line from standard input.
#[derive(Debug)]
pub struct StdInput {
    prompt: String,
}

impl StdInput {
    pub fn new() -> Self {
        StdInput {
            prompt: "Enter an integer: ".to_string(),
        }
    }

    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        StdInput {
            prompt: prompt.into(),
        }
    }
}

impl Default for StdInput {
    fn default() -> Self {
        StdInput::new()
    }
}

impl Input for StdInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if !self.prompt.is_empty() {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", self.prompt)?;
            stdout.flush()?;
        }

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

/// Records shown values in memory.
#[derive(Debug, Default)]
pub struct Transcript {
    values: Vec<Value>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript::default()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The recorded values rendered the way `StdOutput` would print them.
    pub fn lines(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}

impl Output for Transcript {
    fn show(&mut self, value: &Value) -> io::Result<()> {
        self.values.push(value.clone());
        Ok(())
    }
}

/// Serves a fixed list of lines, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Input for ScriptedInput {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}
