use crate::{eval_expr, eval_source};
use calyx_interpreter::ast::{Expr, Value};
use calyx_interpreter::error::{EvalError, RunError};

#[test]
fn test_string_literal() {
    assert_eq!(eval_source("\"hello\"").unwrap(), Value::from("hello"));
    assert_eq!(eval_source("\"\"").unwrap(), Value::from(""));
}

#[test]
fn test_concat() {
    assert_eq!(eval_source("(++ \"hello\" \" world\")").unwrap(), Value::from("hello world"));
    assert_eq!(eval_source("(^ \"a\" (^ \"b\" \"c\"))").unwrap(), Value::from("abc"));
}

#[test]
fn test_replace_first_occurrence_only() {
    let expr = Expr::replace(Expr::str("banana"), Expr::str("a"), Expr::str("b"));
    assert_eq!(eval_expr(&expr).unwrap(), Value::from("bbnana"));
}

#[test]
fn test_replace_multichar_and_missing_target() {
    assert_eq!(
        eval_source("(replace \"one two two\" \"two\" \"2\")").unwrap(),
        Value::from("one 2 two")
    );
    assert_eq!(eval_source("(replace \"abc\" \"z\" \"y\")").unwrap(), Value::from("abc"));
}

#[test]
fn test_length() {
    assert_eq!(eval_source("(length \"hello\")").unwrap(), Value::Int(5));
    assert_eq!(eval_source("(length \"\")").unwrap(), Value::Int(0));
    assert_eq!(eval_source("(length (++ \"ab\" \"cd\"))").unwrap(), Value::Int(4));
}

#[test]
fn test_lower() {
    assert_eq!(eval_source("(lower \"HELLO World\")").unwrap(), Value::from("hello world"));
}

#[test]
fn test_string_operators_require_strings() {
    for source in [
        "(++ \"a\" 1)",
        "(++ true \"a\")",
        "(replace \"abc\" 1 \"x\")",
        "(replace 5 \"a\" \"b\")",
        "(length 12)",
        "(lower false)",
    ] {
        let result = eval_source(source);
        assert!(
            matches!(result, Err(RunError::Eval(EvalError::TypeMismatch { .. }))),
            "expected type error for {}, got {:?}",
            source,
            result
        );
    }
}

#[test]
fn test_replace_evaluates_all_operands_in_order() {
    let result = eval_source("(replace first-missing \"a\" second-missing)");
    match result {
        Err(RunError::Eval(EvalError::UnboundName(name))) => assert_eq!(name, "first-missing"),
        other => panic!("Expected unbound name, got {:?}", other),
    }
}
