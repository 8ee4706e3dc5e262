use crate::ast::{ASTNode, Constant, Function, Operator, Sign};
use crate::error::ParseError;
use log::debug;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Parser)]
#[grammar = "./formula.pest"] // Link to the grammar file
pub struct FormulaParser;

impl FormulaParser {
    /// Parses formula text into an AST, or fails with the position and
    /// expected-token context of the first offending token.
    pub fn parse_formula(input: &str) -> Result<ASTNode, ParseError> {
        debug!("parsing formula: {}", input);
        let formula = FormulaParser::parse(Rule::formula, input)
            .map_err(ParseError::from)?
            .next()
            .ok_or_else(|| ParseError::UnexpectedRule("empty parse result".to_string()))?;

        // The formula rule wraps `expression ~ EOI`; only the expression
        // carries content.
        let expression = formula
            .into_inner()
            .next()
            .ok_or_else(|| ParseError::UnexpectedRule("formula without expression".to_string()))?;
        Self::build_expression(expression)
    }

    fn build_expression(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let mut node = Self::build_term(pairs.next().unwrap())?;

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::PLUS => Operator::Add,
                Rule::MINUS => Operator::Subtract,
                other => return Err(ParseError::UnexpectedRule(format!("{:?}", other))),
            };

            let right = Self::build_term(pairs.next().unwrap())?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_term(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let mut node = Self::build_pow_expr(pairs.next().unwrap())?;

        while let Some(operator_pair) = pairs.next() {
            let operator = match operator_pair.as_rule() {
                Rule::STAR => Operator::Multiply,
                Rule::SLASH => Operator::Divide,
                other => return Err(ParseError::UnexpectedRule(format!("{:?}", other))),
            };

            let right = Self::build_pow_expr(pairs.next().unwrap())?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    // `a^b^c` folds left, so the chain evaluates as `(a^b)^c`.
    fn build_pow_expr(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let mut node = Self::build_signed_atom(pairs.next().unwrap())?;

        while let Some(operator_pair) = pairs.next() {
            if operator_pair.as_rule() != Rule::CARET {
                return Err(ParseError::UnexpectedRule(format!(
                    "{:?}",
                    operator_pair.as_rule()
                )));
            }

            let right = Self::build_signed_atom(pairs.next().unwrap())?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator: Operator::Power,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_signed_atom(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let first = pairs.next().unwrap();

        match first.as_rule() {
            Rule::PLUS | Rule::MINUS => {
                let sign = if first.as_rule() == Rule::MINUS {
                    Sign::Minus
                } else {
                    Sign::Plus
                };
                let operand = Self::build_signed_atom(pairs.next().unwrap())?;
                Ok(ASTNode::UnaryOperation {
                    sign,
                    operand: Box::new(operand),
                })
            }
            Rule::func_call => Self::build_func_call(first),
            Rule::atom => Self::build_atom(first),
            other => Err(ParseError::UnexpectedRule(format!("{:?}", other))),
        }
    }

    fn build_func_call(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let mut pairs = pair.into_inner();
        let name_pair = pairs.next().unwrap();
        // The func_name rule is a closed set, so the lookup cannot miss.
        let function = Function::from_name(name_pair.as_str()).ok_or_else(|| {
            ParseError::UnexpectedRule(format!("function {:?}", name_pair.as_str()))
        })?;
        let argument = Self::build_expression(pairs.next().unwrap())?;
        Ok(ASTNode::FunctionCall {
            function,
            argument: Box::new(argument),
        })
    }

    fn build_atom(pair: Pair<Rule>) -> Result<ASTNode, ParseError> {
        let inner = pair.into_inner().next().unwrap();
        match inner.as_rule() {
            Rule::constant => match inner.as_str() {
                "pi" => Ok(ASTNode::Constant(Constant::Pi)),
                "e" => Ok(ASTNode::Constant(Constant::E)),
                other => Err(ParseError::UnexpectedRule(format!("constant {:?}", other))),
            },
            Rule::number => Ok(ASTNode::Number(Self::parse_number(inner.as_str())?)),
            Rule::variable => Ok(ASTNode::Variable(inner.as_str().to_string())),
            Rule::group => {
                let expression = inner.into_inner().next().unwrap();
                Ok(ASTNode::Group(Box::new(Self::build_expression(
                    expression,
                )?)))
            }
            other => Err(ParseError::UnexpectedRule(format!("{:?}", other))),
        }
    }

    /// Literals keep their full decimal digits; no float round-trip here.
    fn parse_number(text: &str) -> Result<Decimal, ParseError> {
        let parsed = if text.contains('e') || text.contains('E') {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str(text)
        };
        parsed.map_err(|source| ParseError::Number {
            literal: text.to_string(),
            source,
        })
    }
}
