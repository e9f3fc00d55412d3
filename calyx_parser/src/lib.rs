//! Parser for the Calyx expression language.
//!
//! This crate converts S-expression source code into the `Expr` tree defined
//! in `calyx_ast`. The evaluator never sees text; everything that knows about
//! concrete syntax lives here.

use calyx_ast::{ArithOp, Expr};
use lexpr::{parse::Error, Parser, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("empty program")]
    EmptyProgram,

    #[error("'{form}' expects {expected}, got {got}")]
    Arity {
        form: String,
        expected: &'static str,
        got: usize,
    },

    #[error("{context} must be a non-reserved symbol, got {found}")]
    ExpectedName {
        context: &'static str,
        found: String,
    },

    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

/// Symbols with a fixed meaning in the surface syntax. None of them can be
/// bound, since a use of the binding would read back as the built-in form.
pub const RESERVED_WORDS: &[&str] = &[
    "true", "false", "read", "and", "or", "not", "length", "lower", "show", "replace", "if", "let",
    "letfun", "set!", "begin", "+", "-", "*", "/", "=", "==", "<", "++", "^",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Parses a whole program. Multiple top-level forms are chained with `Seq`,
/// so their effects happen in order and the last form gives the result.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::from_str(source);
    let mut forms = Vec::new();

    while let Some(sexpr_res) = parser.next() {
        let sexpr = sexpr_res.map_err(|e: Error| ParseError::Syntax(e.to_string()))?;
        forms.push(parse_expr(&sexpr)?);
    }

    sequence(forms).ok_or(ParseError::EmptyProgram)
}

fn sequence(forms: Vec<Expr>) -> Option<Expr> {
    let mut iter = forms.into_iter().rev();
    let last = iter.next()?;
    Some(iter.fold(last, |rest, first| Expr::seq(first, rest)))
}

fn to_proper_list(value: &Value) -> Result<Vec<Value>, ParseError> {
    if let Some(cons) = value.as_cons() {
        let (vec, tail) = cons.to_vec();
        if tail.is_null() {
            Ok(vec)
        } else {
            Err(ParseError::Unsupported(format!(
                "improper list ending with {}",
                tail
            )))
        }
    } else {
        Err(ParseError::Unsupported(format!("expected a list, got {}", value)))
    }
}

fn parse_expr(value: &Value) -> Result<Expr, ParseError> {
    match value {
        Value::Symbol(s) => match &**s {
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "read" => Ok(Expr::Read),
            _ => Ok(Expr::name(s.to_string())),
        },
        Value::String(s) => Ok(Expr::str(s.to_string())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Expr::int(i)),
            None => Err(ParseError::Unsupported(format!("number {}", n))),
        },
        Value::Bool(b) => Ok(Expr::bool(*b)),
        Value::Cons(cons) => {
            let (list, tail) = cons.to_vec();
            if !tail.is_null() {
                return Err(ParseError::Unsupported(format!("improper list {}", value)));
            }

            let head = &list[0];
            let tail_parts = &list[1..];

            if let Some(op) = head.as_symbol() {
                match op {
                    "+" => parse_arith(ArithOp::Add, tail_parts),
                    "-" if tail_parts.len() == 1 => Ok(Expr::neg(parse_expr(&tail_parts[0])?)),
                    "-" => parse_arith(ArithOp::Sub, tail_parts),
                    "*" => parse_arith(ArithOp::Mul, tail_parts),
                    "/" => parse_arith(ArithOp::Div, tail_parts),
                    "and" => parse_binary(op, tail_parts, Expr::and),
                    "or" => parse_binary(op, tail_parts, Expr::or),
                    "not" => parse_unary(op, tail_parts, Expr::not),
                    "=" | "==" => parse_binary(op, tail_parts, Expr::eq),
                    "<" => parse_binary(op, tail_parts, Expr::lt),
                    "++" | "^" => parse_binary(op, tail_parts, Expr::concat),
                    "length" => parse_unary(op, tail_parts, Expr::length),
                    "lower" => parse_unary(op, tail_parts, Expr::lower),
                    "show" => parse_unary(op, tail_parts, Expr::show),
                    "replace" => parse_replace(tail_parts),
                    "if" => parse_if(tail_parts),
                    "let" => parse_let(tail_parts),
                    "letfun" => parse_letfun(tail_parts),
                    "set!" => parse_assign(tail_parts),
                    "begin" => parse_begin(tail_parts),
                    "read" => parse_read(tail_parts),
                    _ => parse_app(head, tail_parts),
                }
            } else {
                parse_app(head, tail_parts)
            }
        }
        Value::Null => Err(ParseError::Unsupported("empty list".to_string())),
        _ => Err(ParseError::Unsupported(value.to_string())),
    }
}

fn expect_arity(form: &str, parts: &[Value], count: usize, expected: &'static str) -> Result<(), ParseError> {
    if parts.len() == count {
        Ok(())
    } else {
        Err(ParseError::Arity {
            form: form.to_string(),
            expected,
            got: parts.len(),
        })
    }
}

fn parse_name(value: &Value, context: &'static str) -> Result<String, ParseError> {
    value
        .as_symbol()
        .filter(|s| !is_reserved(s))
        .map(|s| s.to_string())
        .ok_or_else(|| ParseError::ExpectedName {
            context,
            found: value.to_string(),
        })
}

fn parse_arith(op: ArithOp, parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity(op.symbol(), parts, 2, "2 operands")?;
    Ok(Expr::arith(op, parse_expr(&parts[0])?, parse_expr(&parts[1])?))
}

fn parse_binary(form: &str, parts: &[Value], build: fn(Expr, Expr) -> Expr) -> Result<Expr, ParseError> {
    expect_arity(form, parts, 2, "2 operands")?;
    Ok(build(parse_expr(&parts[0])?, parse_expr(&parts[1])?))
}

fn parse_unary(form: &str, parts: &[Value], build: fn(Expr) -> Expr) -> Result<Expr, ParseError> {
    expect_arity(form, parts, 1, "1 operand")?;
    Ok(build(parse_expr(&parts[0])?))
}

fn parse_replace(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("replace", parts, 3, "3 operands (string, target, replacement)")?;
    Ok(Expr::replace(
        parse_expr(&parts[0])?,
        parse_expr(&parts[1])?,
        parse_expr(&parts[2])?,
    ))
}

fn parse_if(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("if", parts, 3, "3 parts (condition, then, else)")?;
    Ok(Expr::cond(
        parse_expr(&parts[0])?,
        parse_expr(&parts[1])?,
        parse_expr(&parts[2])?,
    ))
}

/// `(let (name value) body)`
fn parse_let(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("let", parts, 2, "2 parts (binding, body)")?;
    let binding = to_proper_list(&parts[0])?;
    expect_arity("let binding", &binding, 2, "a name and a value")?;
    let name = parse_name(&binding[0], "let binding name")?;
    Ok(Expr::let_in(name, parse_expr(&binding[1])?, parse_expr(&parts[1])?))
}

/// `(letfun (name param) body rest)`
fn parse_letfun(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("letfun", parts, 3, "3 parts (signature, body, rest)")?;
    let signature = to_proper_list(&parts[0])?;
    expect_arity("letfun signature", &signature, 2, "a function name and one parameter")?;
    let name = parse_name(&signature[0], "function name")?;
    let param = parse_name(&signature[1], "function parameter")?;
    Ok(Expr::letfun(
        name,
        param,
        parse_expr(&parts[1])?,
        parse_expr(&parts[2])?,
    ))
}

fn parse_assign(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("set!", parts, 2, "2 parts (name, value)")?;
    let name = parse_name(&parts[0], "assignment target")?;
    Ok(Expr::assign(name, parse_expr(&parts[1])?))
}

fn parse_begin(parts: &[Value]) -> Result<Expr, ParseError> {
    let forms = parts.iter().map(parse_expr).collect::<Result<Vec<_>, _>>()?;
    sequence(forms).ok_or(ParseError::Arity {
        form: "begin".to_string(),
        expected: "at least 1 expression",
        got: 0,
    })
}

fn parse_read(parts: &[Value]) -> Result<Expr, ParseError> {
    expect_arity("read", parts, 0, "no operands")?;
    Ok(Expr::Read)
}

fn parse_app(head: &Value, tail: &[Value]) -> Result<Expr, ParseError> {
    expect_arity(&head.to_string(), tail, 1, "exactly 1 argument")?;
    Ok(Expr::app(parse_expr(head)?, parse_expr(&tail[0])?))
}
