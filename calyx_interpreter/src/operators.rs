//! Primitive operations on already-evaluated operands.
//!
//! Operand evaluation order and short-circuiting are the evaluator's job;
//! these functions only check kinds and compute.

use crate::ast::{ArithOp, Value, ValueKind};
use crate::error::{EvalError, EvalResult};

pub fn expect_int(construct: &'static str, value: &Value) -> EvalResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_mismatch(construct, ValueKind::Int, other.kind())),
    }
}

pub fn expect_bool(construct: &'static str, value: &Value) -> EvalResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(EvalError::type_mismatch(construct, ValueKind::Bool, other.kind())),
    }
}

pub fn expect_str<'a>(construct: &'static str, value: &'a Value) -> EvalResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(EvalError::type_mismatch(construct, ValueKind::Str, other.kind())),
    }
}

/// Checked integer arithmetic. Overflow is an error, never a wrap.
pub fn arith(op: ArithOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let a = expect_int(op.symbol(), left)?;
    let b = expect_int(op.symbol(), right)?;
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            floor_div(a, b)
        }
    };
    result
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow(op.describe()))
}

/// Integer division rounding toward negative infinity. `None` on overflow.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

pub fn negate(operand: &Value) -> EvalResult<Value> {
    let n = expect_int("negation", operand)?;
    n.checked_neg()
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow("negation"))
}

/// Values of different kinds are unequal, never an error.
pub fn equals(left: &Value, right: &Value) -> Value {
    Value::Bool(left == right)
}

pub fn less_than(left: &Value, right: &Value) -> EvalResult<Value> {
    let a = expect_int("<", left)?;
    let b = expect_int("<", right)?;
    Ok(Value::Bool(a < b))
}

pub fn concat(left: &Value, right: &Value) -> EvalResult<Value> {
    let a = expect_str("concatenation", left)?;
    let b = expect_str("concatenation", right)?;
    Ok(Value::Str(format!("{}{}", a, b)))
}

/// Replaces only the leftmost occurrence of `target`.
pub fn replace_first(string: &Value, target: &Value, replacement: &Value) -> EvalResult<Value> {
    let s = expect_str("replace", string)?;
    let target = expect_str("replace", target)?;
    let replacement = expect_str("replace", replacement)?;
    Ok(Value::Str(s.replacen(target, replacement, 1)))
}

pub fn length(operand: &Value) -> EvalResult<Value> {
    let s = expect_str("length", operand)?;
    let count = i64::try_from(s.chars().count()).map_err(|_| EvalError::IntegerOverflow("length"))?;
    Ok(Value::Int(count))
}

pub fn lower(operand: &Value) -> EvalResult<Value> {
    let s = expect_str("lower", operand)?;
    Ok(Value::Str(s.to_lowercase()))
}
