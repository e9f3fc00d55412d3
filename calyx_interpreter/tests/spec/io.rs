use crate::run_with_input;
use calyx_interpreter::ast::{Expr, Value};
use calyx_interpreter::error::{EvalError, RunError};
use calyx_interpreter::interpreter::Interpreter;
use calyx_interpreter::io::{ScriptedInput, Transcript};

#[test]
fn test_show_passes_value_through() {
    let (result, shown) = run_with_input("(+ 1 (show (* 2 3)))", &[]);
    assert_eq!(result.unwrap(), Value::Int(7));
    assert_eq!(shown, vec!["6"]);
}

#[test]
fn test_show_order_follows_evaluation_order() {
    let (result, shown) = run_with_input(
        "(begin (show \"first\") (show true) (show (lower \"THIRD\")) 0)",
        &[],
    );
    assert_eq!(result.unwrap(), Value::Int(0));
    assert_eq!(shown, vec!["first", "true", "third"]);
}

#[test]
fn test_show_in_untaken_branch_does_not_emit() {
    let (result, shown) = run_with_input("(if true 1 (show 2))", &[]);
    assert_eq!(result.unwrap(), Value::Int(1));
    assert!(shown.is_empty());
}

#[test]
fn test_show_skipped_by_short_circuit() {
    let (_, shown) = run_with_input("(or true (show false))", &[]);
    assert!(shown.is_empty());
}

#[test]
fn test_shown_values_keep_their_kind() {
    let mut interp = Interpreter::with_io(Transcript::new(), ScriptedInput::default());
    interp
        .eval(&Expr::seq(Expr::show(Expr::int(1)), Expr::show(Expr::str("1"))))
        .unwrap();
    assert_eq!(interp.output().values(), &[Value::Int(1), Value::from("1")]);
}

#[test]
fn test_output_before_failure_is_kept() {
    let (result, shown) = run_with_input("(begin (show 1) (/ 1 0))", &[]);
    assert!(result.is_err());
    assert_eq!(shown, vec!["1"]);
}

#[test]
fn test_read_integer() {
    let (result, _) = run_with_input("(+ (read) 1)", &["41"]);
    assert_eq!(result.unwrap(), Value::Int(42));
}

#[test]
fn test_read_trims_whitespace_and_accepts_sign() {
    let (result, _) = run_with_input("read", &["  -12\n"]);
    assert_eq!(result.unwrap(), Value::Int(-12));
}

#[test]
fn test_reads_consume_lines_in_order() {
    let (result, _) = run_with_input("(- (read) (read))", &["10", "3"]);
    assert_eq!(result.unwrap(), Value::Int(7));
}

#[test]
fn test_read_rejects_non_integer() {
    let (result, _) = run_with_input("(read)", &["forty-two"]);
    match result {
        Err(RunError::Eval(EvalError::InputParseFailure(text))) => assert_eq!(text, "forty-two"),
        other => panic!("Expected input parse failure, got {:?}", other),
    }
}

#[test]
fn test_read_at_end_of_input_fails() {
    let (result, _) = run_with_input("(read)", &[]);
    assert!(matches!(result, Err(RunError::Eval(EvalError::InputParseFailure(_)))));
}

#[test]
fn test_length_of_read_is_a_type_error() {
    let (result, _) = run_with_input("(show (length (read)))", &["5"]);
    assert!(matches!(result, Err(RunError::Eval(EvalError::TypeMismatch { construct: "length", .. }))));
}

#[test]
fn test_read_feeds_recursive_function() {
    let source = "
    (letfun (sum n) (if (= n 0) 0 (+ n (sum (- n 1))))
      (show (sum (read))))
    ";
    let (result, shown) = run_with_input(source, &["10"]);
    assert_eq!(result.unwrap(), Value::Int(55));
    assert_eq!(shown, vec!["55"]);
}
