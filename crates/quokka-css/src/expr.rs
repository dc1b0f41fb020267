//! Arithmetic over pre-split tokens, and the `An+B` argument grammar of the
//! `:nth-*` pseudo-classes.
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | '(' expression ')'
//! ```
//!
//! Tokens are already grouped: `"12.5"` is one token, and a number may carry
//! its sign (`"-5"`). There is no unary minus operator.

use crate::error::EvalError;

/// Evaluate a token sequence such as `["2", "+", "3", "*", "4"]`.
///
/// # Errors
///
/// [`EvalError::EmptyExpression`] for no tokens, [`EvalError::DivisionByZero`],
/// [`EvalError::MismatchedParenthesis`] when a `(` is never closed,
/// [`EvalError::NestingTooDeep`] past [`MAX_DEPTH`] open parentheses, and
/// [`EvalError::UnexpectedToken`] for anything that is not where a number or
/// operator may stand. Positions are token indices; running off the end
/// reports `tokens.len()`.
pub fn evaluate<S: AsRef<str>>(tokens: &[S]) -> Result<f64, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::EmptyExpression);
    }
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let mut evaluator = Evaluator {
        tokens: &tokens,
        position: 0,
        depth: 0,
    };
    let value = evaluator.expression()?;
    if let Some(token) = evaluator.peek() {
        return Err(EvalError::UnexpectedToken {
            position: evaluator.position,
            token: token.to_string(),
        });
    }
    Ok(value)
}

/// Split a raw arithmetic string into evaluator tokens. Spaces are ignored.
///
/// # Errors
///
/// [`EvalError::UnexpectedToken`] for any character other than digits, `.`,
/// operators and parentheses. The position is the character offset.
pub fn tokenize_expression(expression: &str) -> Result<Vec<String>, EvalError> {
    let mut tokens = Vec::new();
    let mut number = String::new();
    for (position, c) in expression.chars().enumerate() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        if !number.is_empty() {
            tokens.push(std::mem::take(&mut number));
        }
        match c {
            '+' | '-' | '*' | '/' | '(' | ')' => tokens.push(c.to_string()),
            c if c.is_whitespace() => {}
            other => {
                return Err(EvalError::UnexpectedToken {
                    position,
                    token: other.to_string(),
                });
            }
        }
    }
    if !number.is_empty() {
        tokens.push(number);
    }
    Ok(tokens)
}

/// Deepest parenthesis nesting [`evaluate`] accepts.
pub const MAX_DEPTH: usize = 64;

struct Evaluator<'a> {
    tokens: &'a [&'a str],
    position: usize,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).copied()
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        let mut value = self.term()?;
        while let Some(op @ ("+" | "-")) = self.peek() {
            self.position += 1;
            let rhs = self.term()?;
            if op == "+" {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut value = self.factor()?;
        while let Some(op @ ("*" | "/")) = self.peek() {
            self.position += 1;
            let rhs = self.factor()?;
            if op == "*" {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, EvalError> {
        let Some(token) = self.peek() else {
            return Err(EvalError::UnexpectedToken {
                position: self.position,
                token: String::new(),
            });
        };
        if token == "(" {
            if self.depth == MAX_DEPTH {
                return Err(EvalError::NestingTooDeep {
                    position: self.position,
                });
            }
            self.depth += 1;
            self.position += 1;
            let value = self.expression()?;
            if self.peek() != Some(")") {
                return Err(EvalError::MismatchedParenthesis {
                    position: self.position,
                });
            }
            self.depth -= 1;
            self.position += 1;
            return Ok(value);
        }
        match token.parse::<f64>() {
            Ok(value) if looks_numeric(token) => {
                self.position += 1;
                Ok(value)
            }
            _ => Err(EvalError::UnexpectedToken {
                position: self.position,
                token: token.to_string(),
            }),
        }
    }
}

/// A digit first, or a sign directly followed by a digit. Keeps `f64`'s
/// parser from accepting words such as `inf` or `NaN`.
fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '.' => true,
        Some('+' | '-') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn to_integer(value: f64) -> i64 {
    value as i64
}

/// Read the arguments of an `:nth-*` pseudo-class into `(start, step)`.
///
/// The caller selects child indices `start, start + step, ...` below
/// `child_count`, all 0-based.
///
/// - `even` is `(0, 2)` and `odd` is `(1, 2)`.
/// - `An+B` (a number or sign directly before `n`): `step = A`, `start = B`.
///   A negative `start` moves up by whole steps to the first index at or
///   above 0.
/// - Anything else is plain arithmetic in which `n` stands for the child
///   count: `step` is its value and `start` is 0.
///
/// # Errors
///
/// [`EvalError::NoArguments`], [`EvalError::NoChildren`] when `child_count`
/// is 0, [`EvalError::InvalidSkip`] when the step is not positive, and any
/// error from [`evaluate`].
pub fn parse_nth<S: AsRef<str>>(args: &[S], child_count: usize) -> Result<(i64, i64), EvalError> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let Some(first) = args.first() else {
        return Err(EvalError::NoArguments);
    };
    if child_count == 0 {
        return Err(EvalError::NoChildren);
    }

    let (start, step) = if first.eq_ignore_ascii_case("even") {
        (0, 2)
    } else if first.eq_ignore_ascii_case("odd") {
        (1, 2)
    } else if let Some(n) = an_plus_b_position(&args) {
        let step = match &args[..n] {
            ["-"] => -1,
            ["+"] => 1,
            coefficient => to_integer(evaluate(coefficient)?),
        };
        let offset = &args[n + 1..];
        let start = if offset.is_empty() {
            0
        } else {
            // A leading operator needs a left operand.
            let mut tokens = vec!["0"];
            if !matches!(offset[0], "+" | "-") {
                tokens.push("+");
            }
            tokens.extend_from_slice(offset);
            to_integer(evaluate(tokens.as_slice())?)
        };
        (start, step)
    } else {
        let count = child_count.to_string();
        let rewritten: Vec<&str> = args
            .iter()
            .map(|&arg| if arg.eq_ignore_ascii_case("n") { count.as_str() } else { arg })
            .collect();
        (0, to_integer(evaluate(rewritten.as_slice())?))
    };

    if step <= 0 {
        return Err(EvalError::InvalidSkip { value: step });
    }
    let start = if start < 0 { start.rem_euclid(step) } else { start };
    Ok((start, step))
}

/// Index of the `n` of an `An+B` argument list, when the list has that shape.
fn an_plus_b_position(args: &[&str]) -> Option<usize> {
    let n = args.iter().position(|a| a.eq_ignore_ascii_case("n"))?;
    let coefficient = n == 1 && (matches!(args[0], "+" | "-") || looks_numeric(args[0]));
    coefficient.then_some(n)
}
