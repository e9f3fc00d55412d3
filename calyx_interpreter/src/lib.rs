pub mod ast;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod operators;

pub use calyx_parser as parser;

use ast::Value;
use error::RunError;
use interpreter::Interpreter;
use io::{Input, Output};

impl<O: Output, I: Input> Interpreter<O, I> {
    /// Parses `source` and evaluates the program in the empty environment.
    pub fn eval_source(&mut self, source: &str) -> Result<Value, RunError> {
        let program = parser::parse(source)?;
        Ok(self.eval(&program)?)
    }
}
