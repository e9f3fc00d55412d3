use crate::{eval_expr, eval_source};
use calyx_interpreter::ast::{Environment, Expr, Value};
use calyx_interpreter::error::{AssignFailure, EvalError, RunError};
use calyx_interpreter::interpreter::Interpreter;
use calyx_interpreter::io::{ScriptedInput, Transcript};

#[test]
fn test_assignment_is_visible() {
    // let x = 1 in (x := 5; x)
    let expr = Expr::let_in(
        "x",
        Expr::int(1),
        Expr::seq(Expr::assign("x", Expr::int(5)), Expr::name("x")),
    );
    assert_eq!(eval_expr(&expr).unwrap(), Value::Int(5));
}

#[test]
fn test_assignment_returns_new_value() {
    assert_eq!(eval_source("(let (x 1) (set! x (+ x 41)))").unwrap(), Value::Int(42));
}

#[test]
fn test_assignment_may_change_kind() {
    assert_eq!(eval_source("(let (x 1) (begin (set! x \"one\") x))").unwrap(), Value::from("one"));
}

#[test]
fn test_sequence_returns_second() {
    assert_eq!(eval_source("(begin 1 2 3)").unwrap(), Value::Int(3));
}

#[test]
fn test_sequence_propagates_failure_of_first() {
    assert!(matches!(
        eval_source("(begin (/ 1 0) 2)"),
        Err(RunError::Eval(EvalError::DivisionByZero))
    ));
}

#[test]
fn test_closure_sees_later_assignment() {
    // The closure captured the cell, not the value 1.
    let source = "
    (let (x 1)
      (letfun (get u) x
        (begin (set! x 2) (get 0))))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(2));
}

#[test]
fn test_closure_mutation_is_visible_outside() {
    let source = "
    (let (count 0)
      (letfun (tick by) (set! count (+ count by))
        (begin (tick 1) (tick 2) (tick 3) count)))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(6));
}

#[test]
fn test_two_closures_share_one_cell() {
    let source = "
    (let (balance 100)
      (letfun (deposit n) (set! balance (+ balance n))
        (letfun (withdraw n) (set! balance (- balance n))
          (begin (deposit 50) (withdraw 30) balance))))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(120));
}

#[test]
fn test_parameter_assignment_is_local_to_call() {
    let source = "
    (let (x 7)
      (letfun (clobber x) (set! x 0)
        (begin (clobber x) x)))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(7));
}

#[test]
fn test_each_call_gets_fresh_parameter_cell() {
    let source = "
    (letfun (bump n) (begin (set! n (+ n 1)) n)
      (+ (bump 1) (bump 1)))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(4));
}

#[test]
fn test_inner_shadow_assignment_leaves_outer_alone() {
    let source = "
    (let (x 1)
      (begin
        (let (x 10) (set! x 20))
        x))
    ";
    assert_eq!(eval_source(source).unwrap(), Value::Int(1));
}

#[test]
fn test_assign_to_function_name_fails() {
    let result = eval_source("(letfun (f x) x (set! f 3))");
    match result {
        Err(RunError::Eval(EvalError::InvalidAssignTarget { name, reason })) => {
            assert_eq!(name, "f");
            assert_eq!(reason, AssignFailure::HoldsFunction);
        }
        other => panic!("Expected invalid assign target, got {:?}", other),
    }
}

#[test]
fn test_assign_to_unbound_name_fails() {
    let result = eval_source("(set! nowhere 1)");
    assert!(matches!(
        result,
        Err(RunError::Eval(EvalError::InvalidAssignTarget {
            reason: AssignFailure::Unbound,
            ..
        }))
    ));
}

#[test]
fn test_assign_to_host_constant_fails() {
    let env = Environment::new().extend_value("pi", Value::Int(3));
    let mut interp = Interpreter::with_io(Transcript::new(), ScriptedInput::default());
    let result = interp.eval_in(&Expr::assign("pi", Expr::int(4)), &env);
    assert!(matches!(
        result,
        Err(EvalError::InvalidAssignTarget {
            reason: AssignFailure::NotACell,
            ..
        })
    ));
}

#[test]
fn test_assign_evaluates_value_before_checking_target() {
    let result = eval_source("(set! nowhere (/ 1 0))");
    assert!(matches!(result, Err(RunError::Eval(EvalError::DivisionByZero))));
}
