//! Integration tests for expression evaluation and nth arguments.

use quickcheck_macros::quickcheck;
use quokka_css::expr::MAX_DEPTH;
use quokka_css::{EvalError, evaluate, parse_nth, tokenize_expression};

#[test]
fn test_evaluate_tokenized_expression() {
    let tokens = tokenize_expression("(1 + 2) * 3 - 8 / 4").unwrap();
    assert_eq!(evaluate(&tokens), Ok(7.0));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(evaluate(&["4", "/", "(", "2", "-", "2", ")"]), Err(EvalError::DivisionByZero));
}

#[test]
fn test_empty_expression() {
    let empty: [&str; 0] = [];
    assert_eq!(evaluate(&empty), Err(EvalError::EmptyExpression));
}

#[test]
fn test_unclosed_parenthesis_reports_position() {
    let tokens = tokenize_expression("2 * (3 + 4").unwrap();
    assert_eq!(
        evaluate(&tokens),
        Err(EvalError::MismatchedParenthesis { position: 6 })
    );
}

fn nested(levels: usize) -> Vec<&'static str> {
    let mut tokens = vec!["("; levels];
    tokens.push("1");
    tokens.extend(vec![")"; levels]);
    tokens
}

#[test]
fn test_nesting_limit() {
    assert_eq!(evaluate(&nested(MAX_DEPTH)), Ok(1.0));
    assert_eq!(
        evaluate(&nested(MAX_DEPTH + 1)),
        Err(EvalError::NestingTooDeep { position: MAX_DEPTH })
    );
    assert_eq!(
        evaluate(&nested(200_000)),
        Err(EvalError::NestingTooDeep { position: MAX_DEPTH })
    );
}

#[test]
fn test_nth_keywords() {
    assert_eq!(parse_nth(&["even"], 5), Ok((0, 2)));
    assert_eq!(parse_nth(&["ODD"], 5), Ok((1, 2)));
}

#[test]
fn test_nth_errors() {
    let none: [&str; 0] = [];
    assert_eq!(parse_nth(&none, 3), Err(EvalError::NoArguments));
    assert_eq!(parse_nth(&["2", "n"], 0), Err(EvalError::NoChildren));
    assert_eq!(parse_nth(&["-3"], 4), Err(EvalError::InvalidSkip { value: -3 }));
}

#[test]
fn test_nth_negative_offset_is_advanced() {
    assert_eq!(parse_nth(&["3", "n", "-", "5"], 10), Ok((1, 3)));
}

#[test]
fn test_nth_huge_negative_offset() {
    assert_eq!(parse_nth(&["1", "n", "-", "99999999999999999"], 5), Ok((0, 1)));
    assert_eq!(parse_nth(&["3", "n", "-", "99999999999999999"], 5), Ok((2, 3)));
}

#[quickcheck]
fn multiplication_binds_tighter(a: i16, b: i16, c: i16) -> bool {
    let tokens = [a.to_string(), "+".to_string(), b.to_string(), "*".to_string(), c.to_string()];
    evaluate(&tokens) == Ok(f64::from(a) + f64::from(b) * f64::from(c))
}

#[quickcheck]
fn subtraction_is_left_associative(a: i16, b: i16, c: i16) -> bool {
    let tokens = [a.to_string(), "-".to_string(), b.to_string(), "-".to_string(), c.to_string()];
    evaluate(&tokens) == Ok(f64::from(a) - f64::from(b) - f64::from(c))
}
