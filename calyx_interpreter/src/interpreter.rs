use crate::ast::{Binding, Closure, Environment, Expr, Literal, StorageCell, Value};
use crate::error::{AssignFailure, EvalError, EvalResult};
use crate::io::{Input, Output, StdInput, StdOutput};
use crate::operators;
use std::rc::Rc;
use tracing::{debug, trace};

/// Default bound on nested closure applications.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Stack growth parameters for deeply nested programs.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 2 * 1024 * 1024;

/// Evaluates expressions, sending `show` output to `O` and taking `read`
/// input from `I`.
pub struct Interpreter<O = StdOutput, I = StdInput> {
    output: O,
    input: I,
    max_depth: usize,
    depth: usize,
}

impl Interpreter {
    /// An interpreter wired to the process's stdin and stdout.
    pub fn new() -> Self {
        Interpreter::with_io(StdOutput, StdInput::new())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<O: Output, I: Input> Interpreter<O, I> {
    pub fn with_io(output: O, input: I) -> Self {
        Interpreter {
            output,
            input,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn into_parts(self) -> (O, I) {
        (self.output, self.input)
    }

    /// Current nesting of closure applications.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluates `expr` in the empty environment.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.eval_in(expr, &Environment::new())
    }

    /// Evaluates `expr` in a caller-supplied environment, e.g. one holding
    /// host-provided constants.
    pub fn eval_in(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        self.depth = 0;
        self.eval_with_env(expr, env)
    }

    fn eval_with_env(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Expr, env: &Environment) -> EvalResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(Self::eval_literal(lit)),
            Expr::Name(name) => self.eval_name(name, env),
            Expr::Arith { op, left, right } => {
                let l = self.eval_with_env(left, env)?;
                let r = self.eval_with_env(right, env)?;
                operators::arith(*op, &l, &r)
            }
            Expr::Neg(operand) => {
                let val = self.eval_with_env(operand, env)?;
                operators::negate(&val)
            }
            Expr::And { left, right } => self.eval_and(left, right, env),
            Expr::Or { left, right } => self.eval_or(left, right, env),
            Expr::Not(operand) => {
                let val = self.eval_with_env(operand, env)?;
                Ok(Value::Bool(!operators::expect_bool("not", &val)?))
            }
            Expr::Eq { left, right } => {
                let l = self.eval_with_env(left, env)?;
                let r = self.eval_with_env(right, env)?;
                Ok(operators::equals(&l, &r))
            }
            Expr::Lt { left, right } => {
                let l = self.eval_with_env(left, env)?;
                let r = self.eval_with_env(right, env)?;
                operators::less_than(&l, &r)
            }
            Expr::If {
                condition,
                then_branch,
                else_branch,
            } => self.eval_if(condition, then_branch, else_branch, env),
            Expr::Seq { first, second } => {
                self.eval_with_env(first, env)?;
                self.eval_with_env(second, env)
            }
            Expr::Let { name, value, body } => self.eval_let(name, value, body, env),
            Expr::Letfun {
                name,
                param,
                body,
                rest,
            } => self.eval_letfun(name, param, body, rest, env),
            Expr::Assign { name, value } => self.eval_assign(name, value, env),
            Expr::App { function, argument } => self.eval_app(function, argument, env),
            Expr::Concat { left, right } => {
                let l = self.eval_with_env(left, env)?;
                let r = self.eval_with_env(right, env)?;
                operators::concat(&l, &r)
            }
            Expr::Replace {
                string,
                target,
                replacement,
            } => {
                let s = self.eval_with_env(string, env)?;
                let t = self.eval_with_env(target, env)?;
                let r = self.eval_with_env(replacement, env)?;
                operators::replace_first(&s, &t, &r)
            }
            Expr::Length(operand) => {
                let val = self.eval_with_env(operand, env)?;
                operators::length(&val)
            }
            Expr::Lower(operand) => {
                let val = self.eval_with_env(operand, env)?;
                operators::lower(&val)
            }
            Expr::Show(operand) => self.eval_show(operand, env),
            Expr::Read => self.eval_read(),
        }
    }

    fn eval_literal(lit: &Literal) -> Value {
        match lit {
            Literal::Int(i) => Value::Int(*i),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }

    fn eval_name(&self, name: &str, env: &Environment) -> EvalResult<Value> {
        env.lookup(name)
            .map(Binding::read)
            .ok_or_else(|| EvalError::UnboundName(name.to_string()))
    }

    fn eval_and(&mut self, left: &Expr, right: &Expr, env: &Environment) -> EvalResult<Value> {
        let l = self.eval_with_env(left, env)?;
        if !operators::expect_bool("and", &l)? {
            return Ok(Value::Bool(false));
        }
        let r = self.eval_with_env(right, env)?;
        Ok(Value::Bool(operators::expect_bool("and", &r)?))
    }

    fn eval_or(&mut self, left: &Expr, right: &Expr, env: &Environment) -> EvalResult<Value> {
        let l = self.eval_with_env(left, env)?;
        if operators::expect_bool("or", &l)? {
            return Ok(Value::Bool(true));
        }
        let r = self.eval_with_env(right, env)?;
        Ok(Value::Bool(operators::expect_bool("or", &r)?))
    }

    fn eval_if(
        &mut self,
        condition: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
        env: &Environment,
    ) -> EvalResult<Value> {
        let cond_val = self.eval_with_env(condition, env)?;
        if operators::expect_bool("if condition", &cond_val)? {
            self.eval_with_env(then_branch, env)
        } else {
            self.eval_with_env(else_branch, env)
        }
    }

    fn eval_let(&mut self, name: &str, value: &Expr, body: &Expr, env: &Environment) -> EvalResult<Value> {
        let val = self.eval_with_env(value, env)?;
        let new_env = env.extend_cell(name, StorageCell::new(val));
        self.eval_with_env(body, &new_env)
    }

    /// The closure must see its own name, so the cell is allocated and bound
    /// first and only filled once the closure over that binding exists.
    /// The resulting cell/closure/environment cycle is never freed, so each
    /// evaluation of a `letfun` holds its closure until the process exits.
    fn eval_letfun(
        &mut self,
        name: &str,
        param: &str,
        body: &Expr,
        rest: &Expr,
        env: &Environment,
    ) -> EvalResult<Value> {
        let cell = StorageCell::new(Value::Bool(false));
        let new_env = env.extend_cell(name, cell.clone());
        let closure = Closure {
            param: param.to_string(),
            body: body.clone(),
            captured_env: new_env.clone(),
        };
        cell.set(Value::Closure(Rc::new(closure)));
        debug!(function = name, param, "defined recursive function");
        self.eval_with_env(rest, &new_env)
    }

    fn eval_assign(&mut self, name: &str, value: &Expr, env: &Environment) -> EvalResult<Value> {
        let val = self.eval_with_env(value, env)?;
        match env.lookup(name) {
            None => Err(EvalError::invalid_assign(name, AssignFailure::Unbound)),
            Some(Binding::Value(_)) => Err(EvalError::invalid_assign(name, AssignFailure::NotACell)),
            Some(Binding::Cell(cell)) if cell.holds_closure() => {
                Err(EvalError::invalid_assign(name, AssignFailure::HoldsFunction))
            }
            Some(Binding::Cell(cell)) => {
                debug!(variable = name, value = %val, "assigned");
                cell.set(val.clone());
                Ok(val)
            }
        }
    }

    fn eval_app(&mut self, function: &Expr, argument: &Expr, env: &Environment) -> EvalResult<Value> {
        let func_val = match self.eval_with_env(function, env)? {
            Value::Ref(cell) => cell.get(),
            other => other,
        };
        let closure = match func_val {
            Value::Closure(closure) => closure,
            _ => return Err(EvalError::NotAFunction(function.to_string())),
        };
        let arg_val = self.eval_with_env(argument, env)?;
        self.apply_closure(&closure, arg_val)
    }

    /// Runs the body in the closure's captured environment plus a fresh cell
    /// for the parameter; the caller's locals are never visible.
    fn apply_closure(&mut self, closure: &Closure, arg_val: Value) -> EvalResult<Value> {
        if self.depth >= self.max_depth {
            return Err(EvalError::RecursionLimit(self.max_depth));
        }
        trace!(param = %closure.param, arg = %arg_val, depth = self.depth, "apply");

        let call_env = closure
            .captured_env
            .extend_cell(closure.param.as_str(), StorageCell::new(arg_val));
        self.depth += 1;
        let result = self.eval_with_env(&closure.body, &call_env);
        self.depth -= 1;
        result
    }

    fn eval_show(&mut self, operand: &Expr, env: &Environment) -> EvalResult<Value> {
        let val = self.eval_with_env(operand, env)?;
        trace!(value = %val, "show");
        self.output.show(&val)?;
        Ok(val)
    }

    fn eval_read(&mut self) -> EvalResult<Value> {
        let line = self
            .input
            .read_line()?
            .ok_or_else(|| EvalError::InputParseFailure("end of input".to_string()))?;
        let text = line.trim();
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::InputParseFailure(text.to_string()))
    }
}
