use crate::ast::{ASTNode, FormulaParser};
use crate::bindings::Bindings;
use crate::error::{EvalError, FormulaError};
use rust_decimal::Decimal;

/// Interprets an AST against a binding map, walking the tree exactly once.
///
/// The AST holds no binding-specific state, so the same tree may be
/// interpreted any number of times with different bindings. When the same
/// formula runs against many binding sets, [`crate::ast::Compiler`] amortizes
/// the tree walk instead.
pub struct Evaluator;

impl Evaluator {
    /// Parses and interprets a formula in one call.
    pub fn evaluate_formula(formula: &str, bindings: &Bindings) -> Result<Decimal, FormulaError> {
        let ast = FormulaParser::parse_formula(formula)?;
        Ok(Self::evaluate(&ast, bindings)?)
    }

    /// Evaluates a single AST node against one binding map.
    pub fn evaluate(ast: &ASTNode, bindings: &Bindings) -> Result<Decimal, EvalError> {
        match ast {
            ASTNode::Number(value) => Ok(*value),

            ASTNode::Constant(constant) => constant.value(),

            ASTNode::Variable(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),

            ASTNode::UnaryOperation { sign, operand } => {
                Ok(sign.apply(Self::evaluate(operand, bindings)?))
            }

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let left_value = Self::evaluate(left, bindings)?;
                let right_value = Self::evaluate(right, bindings)?;
                operator.apply(left_value, right_value)
            }

            ASTNode::FunctionCall { function, argument } => {
                function.apply(Self::evaluate(argument, bindings)?)
            }

            ASTNode::Group(inner) => Self::evaluate(inner, bindings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bindings(entries: &[(&str, Decimal)]) -> Bindings {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_operator_precedence() {
        let empty = Bindings::new();
        assert_eq!(
            Evaluator::evaluate_formula("2+3*4", &empty).unwrap(),
            dec!(14)
        );
        assert_eq!(
            Evaluator::evaluate_formula("(2+3)*4", &empty).unwrap(),
            dec!(20)
        );
    }

    #[test]
    fn test_power_chain_evaluates_left_to_right() {
        let empty = Bindings::new();
        assert_eq!(
            Evaluator::evaluate_formula("2^3^2", &empty).unwrap(),
            dec!(64)
        );
    }

    #[test]
    fn test_unary_minus_is_squared_with_the_atom() {
        let empty = Bindings::new();
        assert_eq!(
            Evaluator::evaluate_formula("-2^2", &empty).unwrap(),
            dec!(4)
        );
        assert_eq!(
            Evaluator::evaluate_formula("-(2^2)", &empty).unwrap(),
            dec!(-4)
        );
    }

    #[test]
    fn test_constants_through_trigonometry() {
        let empty = Bindings::new();
        let cos = Evaluator::evaluate_formula("cos(pi/2)", &empty).unwrap();
        assert_eq!(cos.round(), dec!(0));

        let sin = Evaluator::evaluate_formula("sin(pi/2)", &empty).unwrap();
        assert_eq!(sin.round(), dec!(1));

        let scaled = Evaluator::evaluate_formula("cos(pi/2) * 1000", &empty).unwrap();
        assert_eq!(scaled.round(), dec!(0));
    }

    #[test]
    fn test_natural_log_of_e_is_one() {
        let empty = Bindings::new();
        let result = Evaluator::evaluate_formula("ln(e)", &empty).unwrap();
        assert_eq!(result.round(), dec!(1));
    }

    #[test]
    fn test_undefined_variable_is_a_hard_error() {
        let result = Evaluator::evaluate_formula("a+1", &Bindings::new());
        assert!(matches!(
            result,
            Err(FormulaError::Eval(EvalError::UndefinedVariable(name))) if name == "a"
        ));
    }

    #[test]
    fn test_division_by_zero() {
        let result = Evaluator::evaluate_formula("1/0", &Bindings::new());
        assert!(matches!(
            result,
            Err(FormulaError::Eval(EvalError::DivisionByZero))
        ));
    }

    #[test]
    fn test_rounding_rules_differ_on_ties() {
        let empty = Bindings::new();
        // round is banker's rounding; round2 is ceil(x - 0.5), which sends
        // half-way values down. They disagree at 1.5.
        assert_eq!(
            Evaluator::evaluate_formula("round(0.5)", &empty).unwrap(),
            dec!(0)
        );
        assert_eq!(
            Evaluator::evaluate_formula("round2(0.5)", &empty).unwrap(),
            dec!(0)
        );
        assert_eq!(
            Evaluator::evaluate_formula("round(1.5)", &empty).unwrap(),
            dec!(2)
        );
        assert_eq!(
            Evaluator::evaluate_formula("round2(1.5)", &empty).unwrap(),
            dec!(1)
        );
        assert_eq!(
            Evaluator::evaluate_formula("round2(1.6)", &empty).unwrap(),
            dec!(2)
        );
    }

    #[test]
    fn test_decimal_precision_has_no_float_drift() {
        let b = bindings(&[("a", dec!(0.1))]);
        assert_eq!(
            Evaluator::evaluate_formula("(0.3 - a) * 10", &b).unwrap(),
            dec!(2)
        );
    }

    #[test]
    fn test_ceil_after_subtraction() {
        let b = bindings(&[("a", dec!(1))]);
        assert_eq!(
            Evaluator::evaluate_formula("ceil(a - 0.5)", &b).unwrap(),
            dec!(1)
        );
    }

    #[test]
    fn test_floor_and_sqrt() {
        let empty = Bindings::new();
        assert_eq!(
            Evaluator::evaluate_formula("floor(2.9)", &empty).unwrap(),
            dec!(2)
        );
        assert_eq!(
            Evaluator::evaluate_formula("floor(-2.1)", &empty).unwrap(),
            dec!(-3)
        );
        assert_eq!(
            Evaluator::evaluate_formula("sqrt(16)", &empty).unwrap(),
            dec!(4)
        );
    }

    #[test]
    fn test_variables_resolve_case_sensitively() {
        let b = bindings(&[("rate", dec!(2)), ("Rate", dec!(3))]);
        assert_eq!(
            Evaluator::evaluate_formula("rate * Rate", &b).unwrap(),
            dec!(6)
        );
    }

    #[test]
    fn test_ast_reuse_across_binding_sets() {
        let ast = FormulaParser::parse_formula("(price + tax) * quantity").unwrap();

        let first = bindings(&[("price", dec!(9.99)), ("tax", dec!(0.01)), ("quantity", dec!(3))]);
        assert_eq!(Evaluator::evaluate(&ast, &first).unwrap(), dec!(30));

        let second = bindings(&[("price", dec!(1.5)), ("tax", dec!(0.5)), ("quantity", dec!(10))]);
        assert_eq!(Evaluator::evaluate(&ast, &second).unwrap(), dec!(20));
    }

    #[test]
    fn test_syntax_error_surfaces_through_convenience_api() {
        let result = Evaluator::evaluate_formula("2 +", &Bindings::new());
        assert!(matches!(result, Err(FormulaError::Parse(_))));
    }
}
