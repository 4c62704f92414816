//! Condition Evaluator
//!
//! Components may carry a `visible` expression that hides them (and their
//! whole subtree) depending on the data model. The language is deliberately
//! tiny:
//!
//! ```text
//! <path> == '<text>'     <path> != '<text>'
//! <path> == true|false   <path> != true|false
//! ```
//!
//! There are no connectives and no nesting. Whitespace around the operator is
//! ignored; the path itself may not contain whitespace.
//!
//! # Failing Open
//!
//! An expression that does not match the grammar evaluates to `true`. A typo
//! in a producer's condition must never hide UI the user needs.

use std::fmt;

use serde_json::Value;

use crate::data_model::DataModel;
use crate::path::DataPath;

/// Comparison operator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// Right-hand side of a condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    /// A quoted string, compared by exact equality against string values only
    Str(String),
    /// `true` or `false`, compared by strict equality against booleans only
    Bool(bool),
}

impl Literal {
    /// Whether a resolved data-model value equals this literal
    ///
    /// No coercion: the string `"true"` does not equal `Bool(true)`, and a
    /// missing value equals nothing.
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Self::Str(expected), Some(Value::String(actual))) => expected == actual,
            (Self::Bool(expected), Some(Value::Bool(actual))) => expected == actual,
            _ => false,
        }
    }
}

/// A parsed visibility condition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    /// Data-model path on the left-hand side
    pub path: DataPath,
    /// Comparison operator
    pub operator: Operator,
    /// Literal on the right-hand side
    pub literal: Literal,
}

impl Condition {
    /// Parse a condition expression
    ///
    /// Returns `None` when the text does not match the grammar.
    #[must_use]
    pub fn parse(expression: &str) -> Option<Self> {
        let expression = expression.trim();
        let (index, operator) = find_operator(expression)?;

        let path = expression[..index].trim_end();
        if path.is_empty() || path.chars().any(char::is_whitespace) {
            return None;
        }

        let literal = parse_literal(expression[index + 2..].trim_start())?;

        Some(Self {
            path: DataPath::parse(path),
            operator,
            literal,
        })
    }

    /// Evaluate against a data model
    #[must_use]
    pub fn evaluate(&self, model: &DataModel) -> bool {
        let equal = self.literal.matches(model.get_path(&self.path));
        match self.operator {
            Operator::Eq => equal,
            Operator::Ne => !equal,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.operator {
            Operator::Eq => "==",
            Operator::Ne => "!=",
        };
        match &self.literal {
            Literal::Str(text) => write!(f, "{} {op} '{text}'", self.path),
            Literal::Bool(value) => write!(f, "{} {op} {value}", self.path),
        }
    }
}

/// Leftmost `==` or `!=` in the expression
fn find_operator(expression: &str) -> Option<(usize, Operator)> {
    let eq = expression.find("==").map(|i| (i, Operator::Eq));
    let ne = expression.find("!=").map(|i| (i, Operator::Ne));
    match (eq, ne) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (found, None) | (None, found) => found,
    }
}

/// Parse `'text'` (non-empty) or `true`/`false`
fn parse_literal(text: &str) -> Option<Literal> {
    match text {
        "true" => return Some(Literal::Bool(true)),
        "false" => return Some(Literal::Bool(false)),
        _ => {}
    }
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.is_empty() {
        return None;
    }
    Some(Literal::Str(inner.to_string()))
}

/// Evaluate a raw `visible` expression against a data model
///
/// Unparseable expressions are logged and treated as `true`.
#[must_use]
pub fn evaluate(expression: &str, model: &DataModel) -> bool {
    match Condition::parse(expression) {
        Some(condition) => condition.evaluate(model),
        None => {
            tracing::warn!(
                condition = %expression,
                "Unparseable visibility condition, treating as visible"
            );
            true
        }
    }
}
