use crate::ast::Rule;
use pest::error::LineColLocation;
use thiserror::Error;

/// Failure to turn formula text into an AST.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(Box<pest::error::Error<Rule>>),

    /// The literal matched the grammar but does not fit in a `Decimal`
    /// (e.g. an exponent far outside the 96-bit range).
    #[error("invalid numeric literal `{literal}`: {source}")]
    Number {
        literal: String,
        source: rust_decimal::Error,
    },

    #[error("unexpected rule in parse tree: {0}")]
    UnexpectedRule(String),
}

impl ParseError {
    /// Line and column (1-based) of the offending token, when known.
    pub fn line_col(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::Syntax(e) => Some(match e.line_col {
                LineColLocation::Pos(pos) => pos,
                LineColLocation::Span(start, _) => start,
            }),
            _ => None,
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(source: pest::error::Error<Rule>) -> Self {
        ParseError::Syntax(Box::new(source))
    }
}

/// Failure while evaluating a parsed formula against a binding map.
///
/// Every variant is terminal for the evaluation call that raised it; there
/// are no partial results and an undefined variable never defaults to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("the variable `{0}` has no value")]
    UndefinedVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    /// A result does not fit back into the decimal range, either because
    /// decimal arithmetic overflowed or because a float round-trip produced
    /// a non-finite value (`sqrt(-1)`, `0^-1`, ...).
    #[error("result is outside the decimal range")]
    Overflow,
}

/// Failure to convert a caller-supplied field into a decimal binding.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("field `{field}` cannot be parsed as a decimal: {source}")]
    Conversion {
        field: String,
        source: rust_decimal::Error,
    },

    #[error("field `{field}` holds a numeric value outside the decimal range")]
    OutOfRange { field: String },
}

/// Either phase of the text-level convenience API can fail.
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
