use crate::ast::{ASTNode, FormulaParser};
use crate::bindings::Bindings;
use crate::error::{EvalError, ParseError};
use log::debug;
use rust_decimal::Decimal;

/// One node of the prebuilt closure graph. Everything static about the
/// formula (literals, operator dispatch, function dispatch) is resolved when
/// the graph is built; only binding lookups and the arithmetic itself run
/// per invocation.
type EvalFn = Box<dyn Fn(&Bindings) -> Result<Decimal, EvalError> + Send + Sync>;

/// Translates an AST into a [`CompiledFormula`], paying the cost
/// proportional to AST size once instead of on every evaluation.
///
/// Numeric semantics, rounding policy, and error conditions are identical to
/// [`crate::ast::Evaluator`]; compiling exists purely for throughput when
/// the same formula runs against many distinct binding sets.
pub struct Compiler;

impl Compiler {
    pub fn compile(ast: &ASTNode) -> CompiledFormula {
        debug!("compiling formula AST: {:?}", ast);
        CompiledFormula {
            eval: Self::compile_node(ast),
        }
    }

    /// Parses and compiles a formula in one call.
    pub fn compile_formula(formula: &str) -> Result<CompiledFormula, ParseError> {
        let ast = FormulaParser::parse_formula(formula)?;
        Ok(Self::compile(&ast))
    }

    fn compile_node(node: &ASTNode) -> EvalFn {
        match node {
            ASTNode::Number(value) => {
                let value = *value;
                Box::new(move |_: &Bindings| Ok(value))
            }
            ASTNode::Constant(constant) => {
                let constant = *constant;
                Box::new(move |_: &Bindings| constant.value())
            }
            ASTNode::Variable(name) => {
                let name = name.clone();
                Box::new(move |bindings: &Bindings| {
                    bindings
                        .get(&name)
                        .copied()
                        .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))
                })
            }
            ASTNode::UnaryOperation { sign, operand } => {
                let sign = *sign;
                let operand = Self::compile_node(operand);
                Box::new(move |bindings: &Bindings| Ok(sign.apply(operand(bindings)?)))
            }
            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let operator = *operator;
                let left = Self::compile_node(left);
                let right = Self::compile_node(right);
                Box::new(move |bindings: &Bindings| {
                    operator.apply(left(bindings)?, right(bindings)?)
                })
            }
            ASTNode::FunctionCall { function, argument } => {
                let function = *function;
                let argument = Self::compile_node(argument);
                Box::new(move |bindings: &Bindings| function.apply(argument(bindings)?))
            }
            // Parentheses contribute nothing at execution time.
            ASTNode::Group(inner) => Self::compile_node(inner),
        }
    }
}

/// A formula compiled into a reusable evaluator. Captures no binding map,
/// is immutable after construction, and is `Send + Sync`, so one compiled
/// formula may be shared and run concurrently from multiple threads as long
/// as each call supplies its own bindings.
pub struct CompiledFormula {
    eval: EvalFn,
}

impl CompiledFormula {
    /// Runs the compiled formula against one binding map.
    pub fn run(&self, bindings: &Bindings) -> Result<Decimal, EvalError> {
        (self.eval)(bindings)
    }
}
