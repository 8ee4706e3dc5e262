//! Decimal formula evaluation.
//!
//! Parses arithmetic formulas such as `(a+b)*cos(pi/2)` into an AST, then
//! either interprets the AST directly against a binding map or compiles it
//! once into a reusable [`CompiledFormula`] for running the same formula
//! against many binding sets. `+ - * /` are exact fixed-point decimal
//! operations; only `^`, the named constants `pi`/`e`, and the
//! transcendental functions cross into floating point and back.

pub mod ast;
pub mod bindings;
pub mod error;

pub use ast::{
    ASTNode, CompiledFormula, Compiler, Constant, Evaluator, FormulaParser, Function, Operator,
    Sign,
};
pub use bindings::{bindings_from_fields, Bindings, FieldValue};
pub use error::{BindingError, EvalError, FormulaError, ParseError};

use rust_decimal::Decimal;

/// Parses and interprets a formula in one call. Callers evaluating the same
/// formula repeatedly should parse once and keep the AST, or compile it with
/// [`compile_formula`].
pub fn evaluate_formula(formula: &str, bindings: &Bindings) -> Result<Decimal, FormulaError> {
    Evaluator::evaluate_formula(formula, bindings)
}

/// Parses and compiles a formula into a reusable evaluator.
pub fn compile_formula(formula: &str) -> Result<CompiledFormula, ParseError> {
    Compiler::compile_formula(formula)
}
