// Table driven checks of the primitive words, each one starts from a fresh interpreter with the
// given numbers already on the stack.

use test_case::test_case;
use throf::runtime::data_structures::value::Value;
use throf::runtime::error::{ErrorKind, Result};
use throf::runtime::interpreter::throf_interpreter::ThrofInterpreter;
use throf::runtime::interpreter::{CodeManagement, InterpreterStack};

fn eval_and_stack(code: &str, init_stack: &[i64]) -> Result<Vec<Value>> {
    let mut interp = ThrofInterpreter::new();

    for &value in init_stack {
        interp.push(Value::Number(value));
    }

    interp.process_source("<test>", code)?;
    Ok(interp.stack().clone())
}

fn numbers(values: &[i64]) -> Vec<Value> {
    values.iter().map(|value| Value::Number(*value)).collect()
}

fn bools(values: &[bool]) -> Vec<Value> {
    values.iter().map(|value| Value::Boolean(*value)).collect()
}

#[test_case("0", &[], &[0]; "zero")]
#[test_case("42", &[], &[42]; "number")]
#[test_case("-5", &[], &[-5]; "negative number")]
#[test_case("+", &[2, 2], &[4]; "simple add")]
#[test_case("-", &[5, 2], &[3]; "simple sub")]
#[test_case("-", &[2, 5], &[-3]; "sub below zero")]
#[test_case("*", &[3, 4], &[12]; "simple mul")]
#[test_case("/", &[12, 3], &[4]; "simple div")]
#[test_case("/", &[-7, 2], &[-3]; "div truncates toward zero")]
#[test_case("mod", &[13, 5], &[3]; "simple mod")]
#[test_case("mod", &[-7, 2], &[-1]; "mod keeps dividend sign")]
#[test_case("1 +", &[i64::MAX], &[i64::MIN]; "add wraps")]
#[test_case("drop", &[1, 2], &[1]; "drop")]
#[test_case("dup", &[5], &[5, 5]; "dup")]
#[test_case("swap", &[1, 2], &[2, 1]; "swap")]
#[test_case("2swap", &[1, 2, 3, 4], &[3, 4, 1, 2]; "two swap")]
#[test_case("2swap", &[0, 1, 2, 3, 4], &[0, 3, 4, 1, 2]; "two swap leaves the rest")]
#[test_case("over", &[1, 2], &[1, 2, 1]; "over")]
#[test_case("rot", &[1, 2, 3], &[2, 3, 1]; "rot")]
#[test_case("-rot", &[1, 2, 3], &[3, 1, 2]; "minus rot")]
#[test_case("rot -rot", &[1, 2, 3], &[1, 2, 3]; "rot and minus rot cancel")]
#[test_case("0 pick", &[1, 2], &[1, 2, 2]; "pick top")]
#[test_case("1 pick", &[1, 2], &[1, 2, 1]; "pick second")]
#[test_case("2 pick", &[1, 2, 3], &[1, 2, 3, 1]; "pick third")]
#[test_case("cls", &[1, 2, 3], &[]; "clear stack")]
#[test_case("depth", &[7, 8], &[7, 8, 2]; "depth")]
fn number_results(code: &str, init_stack: &[i64], expected: &[i64]) {
    assert_eq!(eval_and_stack(code, init_stack).unwrap(), numbers(expected));
}

#[test_case("<", &[1, 2], true; "less is true")]
#[test_case("<", &[2, 1], false; "less is false")]
#[test_case("<", &[1, 1], false; "less for equal")]
#[test_case(">", &[2, 1], true; "greater is true")]
#[test_case(">", &[1, 1], false; "greater for equal")]
#[test_case("<=", &[1, 1], true; "less or equal for equal")]
#[test_case("<=", &[2, 1], false; "less or equal is false")]
#[test_case(">=", &[1, 1], true; "greater or equal for equal")]
#[test_case(">=", &[1, 2], false; "greater or equal is false")]
#[test_case("==", &[3, 3], true; "equal numbers")]
#[test_case("==", &[3, 4], false; "different numbers")]
#[test_case("<>", &[3, 4], true; "not equal numbers")]
#[test_case("<>", &[3, 3], false; "not equal for equal numbers")]
fn comparisons(code: &str, init_stack: &[i64], expected: bool) {
    assert_eq!(eval_and_stack(code, init_stack).unwrap(), bools(&[expected]));
}

#[test_case("true false and", false; "and")]
#[test_case("true true and", true; "and both")]
#[test_case("true false or", true; "or")]
#[test_case("false false or", false; "or neither")]
#[test_case("true false xor", true; "xor")]
#[test_case("true true xor", false; "xor both")]
#[test_case("true not", false; "not true")]
#[test_case("false not", true; "not false")]
#[test_case("\"abc\" \"abc\" ==", true; "equal strings")]
#[test_case("\"abc\" \"abd\" ==", false; "different strings")]
#[test_case("true true ==", true; "equal booleans")]
#[test_case("[ 1 2 ] [ 1 2 ] ==", true; "equal quotations")]
#[test_case("[ 1 2 ] [ 2 1 ] <>", true; "different quotations")]
fn boolean_results(code: &str, expected: bool) {
    assert_eq!(eval_and_stack(code, &[]).unwrap(), bools(&[expected]));
}

#[test_case("drop", &[]; "drop")]
#[test_case("dup", &[]; "dup")]
#[test_case("swap", &[1]; "swap")]
#[test_case("2swap", &[1, 2, 3]; "two swap")]
#[test_case("over", &[1]; "over")]
#[test_case("rot", &[1, 2]; "rot")]
#[test_case("-rot", &[1, 2]; "minus rot")]
#[test_case("pick", &[]; "pick without index")]
#[test_case("2 pick", &[1, 2]; "pick past the bottom")]
#[test_case("+", &[1]; "add")]
#[test_case("mod", &[]; "mod")]
#[test_case("<", &[1]; "less")]
#[test_case("==", &[1]; "equal")]
#[test_case("not", &[]; "not")]
#[test_case("and", &[]; "and")]
#[test_case("if", &[]; "if")]
#[test_case("!", &[1]; "write variable")]
#[test_case("@", &[]; "read variable")]
#[test_case(".", &[]; "print")]
fn stack_underflow(code: &str, init_stack: &[i64]) {
    let error = eval_and_stack(code, init_stack).unwrap_err();

    assert!(
        matches!(error.kind(), ErrorKind::StackUnderflow(_)),
        "expected a stack underflow, got: {}",
        error
    );
}

#[test_case("1 true +"; "bool added to number")]
#[test_case("\"a\" 1 -"; "string subtracted")]
#[test_case("1 2 and"; "numbers anded")]
#[test_case("1 not"; "number negated")]
#[test_case("1 \"1\" =="; "number compared with string")]
#[test_case("true 1 <>"; "bool compared with number")]
#[test_case("true 1 [ ] if"; "if with a number branch")]
#[test_case("1 [ ] [ ] if"; "if with a number condition")]
#[test_case("true pick"; "pick with a bool index")]
#[test_case("1 2 !"; "write to a number")]
fn type_mismatch(code: &str) {
    let error = eval_and_stack(code, &[]).unwrap_err();

    assert!(
        matches!(error.kind(), ErrorKind::TypeMismatch(_)),
        "expected a type mismatch, got: {}",
        error
    );
}

#[test_case("/"; "divide")]
#[test_case("mod"; "modulo")]
fn division_by_zero(code: &str) {
    let error = eval_and_stack(code, &[1, 0]).unwrap_err();
    assert_eq!(error.kind(), &ErrorKind::DivisionByZero);
}

#[test]
fn negative_pick_index() {
    let error = eval_and_stack("-1 pick", &[1, 2]).unwrap_err();
    assert!(matches!(error.kind(), ErrorKind::InvalidArgument(_)));
}
