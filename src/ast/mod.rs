use crate::error::EvalError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashSet;

mod compiler;
mod evaluator;
mod parser;

pub use compiler::{CompiledFormula, Compiler};
pub use evaluator::Evaluator;
pub use parser::{FormulaParser, Rule};

/// A parsed formula. Immutable once built; every child is owned by exactly
/// one parent, so an AST can be cached and shared freely across evaluations.
#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(Decimal),
    Constant(Constant),
    Variable(String),
    UnaryOperation {
        sign: Sign,
        operand: Box<ASTNode>,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    FunctionCall {
        function: Function,
        argument: Box<ASTNode>,
    },
    Group(Box<ASTNode>),
}

impl ASTNode {
    /// Names of all variables referenced anywhere in the formula. Useful for
    /// validating a binding map before evaluation.
    pub fn variables(&self) -> HashSet<&str> {
        let mut names = HashSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut HashSet<&'a str>) {
        match self {
            ASTNode::Variable(name) => {
                names.insert(name.as_str());
            }
            ASTNode::UnaryOperation { operand, .. } => operand.collect_variables(names),
            ASTNode::BinaryOperation { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            ASTNode::FunctionCall { argument, .. } => argument.collect_variables(names),
            ASTNode::Group(inner) => inner.collect_variables(names),
            ASTNode::Number(_) | ASTNode::Constant(_) => {}
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn apply(&self, value: Decimal) -> Decimal {
        match self {
            Sign::Plus => value,
            Sign::Minus => -value,
        }
    }
}

/// Named constants resolve to the double approximation cast into the
/// decimal domain, so their precision is bounded by `f64`, not by the 28
/// significant digits a `Decimal` could carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> Result<Decimal, EvalError> {
        let approx = match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        };
        decimal_from_f64(approx)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    /// `+ - * /` stay exact in the decimal domain; only `^` crosses into
    /// floating point and back.
    pub fn apply(&self, left: Decimal, right: Decimal) -> Result<Decimal, EvalError> {
        match self {
            Operator::Add => left.checked_add(right).ok_or(EvalError::Overflow),
            Operator::Subtract => left.checked_sub(right).ok_or(EvalError::Overflow),
            Operator::Multiply => left.checked_mul(right).ok_or(EvalError::Overflow),
            Operator::Divide => {
                if right.is_zero() {
                    Err(EvalError::DivisionByZero)
                } else {
                    left.checked_div(right).ok_or(EvalError::Overflow)
                }
            }
            Operator::Power => {
                let base = decimal_to_f64(left)?;
                let exponent = decimal_to_f64(right)?;
                decimal_from_f64(base.powf(exponent))
            }
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

/// The closed set of unary functions a formula may call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Cos,
    Sin,
    Tan,
    Acos,
    Asin,
    Atan,
    Log10,
    Ln,
    Sqrt,
    Floor,
    Ceil,
    Round,
    RoundHalfUp,
}

impl Function {
    /// Looks up the surface spelling used in formula text. `log` is base-10
    /// and `round2` is the `ceil(x - 0.5)` rounding rule.
    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "cos" => Some(Function::Cos),
            "sin" => Some(Function::Sin),
            "tan" => Some(Function::Tan),
            "acos" => Some(Function::Acos),
            "asin" => Some(Function::Asin),
            "atan" => Some(Function::Atan),
            "log" => Some(Function::Log10),
            "ln" => Some(Function::Ln),
            "sqrt" => Some(Function::Sqrt),
            "floor" => Some(Function::Floor),
            "ceil" => Some(Function::Ceil),
            "round" => Some(Function::Round),
            "round2" => Some(Function::RoundHalfUp),
            _ => None,
        }
    }

    /// Transcendental functions round-trip through `f64`; the rounding
    /// family operates directly on the decimal value. `Round` is banker's
    /// rounding to zero places. `RoundHalfUp` is defined by its formula,
    /// `ceil(x - 0.5)`, which sends half-way values down (`round2(0.5)` is
    /// `0`), its name notwithstanding.
    pub fn apply(&self, argument: Decimal) -> Result<Decimal, EvalError> {
        match self {
            Function::Cos => through_f64(argument, f64::cos),
            Function::Sin => through_f64(argument, f64::sin),
            Function::Tan => through_f64(argument, f64::tan),
            Function::Acos => through_f64(argument, f64::acos),
            Function::Asin => through_f64(argument, f64::asin),
            Function::Atan => through_f64(argument, f64::atan),
            Function::Log10 => through_f64(argument, f64::log10),
            Function::Ln => through_f64(argument, f64::ln),
            Function::Sqrt => through_f64(argument, f64::sqrt),
            Function::Floor => Ok(argument.floor()),
            Function::Ceil => Ok(argument.ceil()),
            Function::Round => Ok(argument.round()),
            Function::RoundHalfUp => argument
                .checked_sub(Decimal::new(5, 1))
                .map(|shifted| shifted.ceil())
                .ok_or(EvalError::Overflow),
        }
    }
}

fn through_f64(argument: Decimal, f: fn(f64) -> f64) -> Result<Decimal, EvalError> {
    decimal_from_f64(f(decimal_to_f64(argument)?))
}

pub(crate) fn decimal_from_f64(value: f64) -> Result<Decimal, EvalError> {
    Decimal::from_f64(value).ok_or(EvalError::Overflow)
}

pub(crate) fn decimal_to_f64(value: Decimal) -> Result<f64, EvalError> {
    value.to_f64().ok_or(EvalError::Overflow)
}
