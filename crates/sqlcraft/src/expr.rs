//! Boolean expression trees for WHERE/HAVING clauses.
//!
//! `Expr` is a tagged union of conjunction nodes, single comparisons and
//! statically-known constants. Constants enable build-time short-circuiting:
//! a combined condition that can never match is rejected at the fluent call
//! that introduced it, before any SQL is rendered.

use std::cmp::Ordering;

use crate::error::{CraftError, CraftResult};
use crate::path::PropertyPath;
use crate::value::Value;

/// Comparison operators understood by every dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    In,
    NotIn,
    Between,
}

/// How terms of a conjunction node are joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

/// One side of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// A quoted property reference; contributes no parameter.
    Path(PropertyPath),
    /// A literal value; becomes one bind variable.
    Value(Value),
    /// A value list, for IN lists and BETWEEN pairs.
    Values(Vec<Value>),
}

impl Operand {
    fn is_literal(&self) -> bool {
        matches!(self, Operand::Value(_) | Operand::Values(_))
    }
}

/// A boolean expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `<term> AND <term> AND ...` (or OR), parenthesized as a unit.
    Conjunction {
        conjunction: Conjunction,
        terms: Vec<Expr>,
    },
    /// `<left> <operator> <right>`.
    Comparison {
        left: Operand,
        operator: Operator,
        right: Operand,
    },
    /// A truth value known without touching data.
    Constant(bool),
}

impl Expr {
    /// An expression that always holds.
    pub fn always_true() -> Self {
        Expr::Constant(true)
    }

    /// An expression that can never hold.
    pub fn always_false() -> Self {
        Expr::Constant(false)
    }

    /// Combine terms under one conjunction.
    ///
    /// No terms yields `None`; a single term is adopted directly; multiple
    /// terms are wrapped in a conjunction node.
    pub fn combine(conjunction: Conjunction, mut terms: Vec<Expr>) -> Option<Expr> {
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Expr::Conjunction { conjunction, terms }),
        }
    }

    /// True when the truth value is statically known.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Constant(_) => true,
            Expr::Conjunction { terms, .. } => terms.iter().all(Expr::is_constant),
            Expr::Comparison { left, right, .. } => left.is_literal() && right.is_literal(),
        }
    }

    /// Evaluate a constant expression.
    ///
    /// Calling this on a non-constant expression is a validation error.
    pub fn evaluate(&self) -> CraftResult<bool> {
        match self {
            Expr::Constant(value) => Ok(*value),
            Expr::Conjunction { conjunction, terms } => {
                let mut result = matches!(conjunction, Conjunction::And);
                for term in terms {
                    let v = term.evaluate()?;
                    result = match conjunction {
                        Conjunction::And => result && v,
                        Conjunction::Or => result || v,
                    };
                }
                Ok(result)
            }
            Expr::Comparison {
                left,
                operator,
                right,
            } => evaluate_comparison(left, *operator, right),
        }
    }
}

fn evaluate_comparison(left: &Operand, operator: Operator, right: &Operand) -> CraftResult<bool> {
    let Operand::Value(lhs) = left else {
        return Err(CraftError::validation(
            "cannot evaluate a non-constant expression",
        ));
    };
    if !right.is_literal() {
        return Err(CraftError::validation(
            "cannot evaluate a non-constant expression",
        ));
    }
    match (operator, right) {
        (Operator::Eq, Operand::Value(rhs)) => Ok(lhs == rhs),
        (Operator::Ne, Operand::Value(rhs)) => Ok(lhs != rhs),
        (Operator::Gt, Operand::Value(rhs)) => ordered(lhs, rhs, |o| o == Ordering::Greater),
        (Operator::Ge, Operand::Value(rhs)) => ordered(lhs, rhs, |o| o != Ordering::Less),
        (Operator::Lt, Operand::Value(rhs)) => ordered(lhs, rhs, |o| o == Ordering::Less),
        (Operator::Le, Operand::Value(rhs)) => ordered(lhs, rhs, |o| o != Ordering::Greater),
        (Operator::In, Operand::Values(values)) => Ok(values.contains(lhs)),
        (Operator::NotIn, Operand::Values(values)) => Ok(!values.contains(lhs)),
        (Operator::Between, Operand::Values(pair)) if pair.len() == 2 => {
            let low = ordered(lhs, &pair[0], |o| o != Ordering::Less)?;
            let high = ordered(lhs, &pair[1], |o| o != Ordering::Greater)?;
            Ok(low && high)
        }
        _ => Err(CraftError::validation(format!(
            "cannot evaluate {operator:?} against {right:?}"
        ))),
    }
}

fn ordered(lhs: &Value, rhs: &Value, test: impl FnOnce(Ordering) -> bool) -> CraftResult<bool> {
    let ord = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.partial_cmp(b),
        _ => None,
    };
    match ord {
        Some(ord) => Ok(test(ord)),
        None => Err(CraftError::validation(format!(
            "values {lhs:?} and {rhs:?} are not comparable"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PropertyPath;

    #[test]
    fn test_combine_empty() {
        assert_eq!(Expr::combine(Conjunction::And, vec![]), None);
    }

    #[test]
    fn test_combine_single_adopts() {
        let term = PropertyPath::new("age").gt(18);
        let combined = Expr::combine(Conjunction::And, vec![term.clone()]);
        assert_eq!(combined, Some(term));
    }

    #[test]
    fn test_combine_many_wraps() {
        let a = PropertyPath::new("a").eq(1);
        let b = PropertyPath::new("b").eq(2);
        let combined = Expr::combine(Conjunction::And, vec![a.clone(), b.clone()]);
        assert_eq!(
            combined,
            Some(Expr::Conjunction {
                conjunction: Conjunction::And,
                terms: vec![a, b],
            })
        );
    }

    #[test]
    fn test_path_comparison_not_constant() {
        let expr = PropertyPath::new("age").gt(18);
        assert!(!expr.is_constant());
        assert!(expr.evaluate().is_err());
    }

    #[test]
    fn test_constant_conjunction() {
        let expr = Expr::Conjunction {
            conjunction: Conjunction::And,
            terms: vec![Expr::always_true(), Expr::always_false()],
        };
        assert!(expr.is_constant());
        assert_eq!(expr.evaluate().unwrap(), false);
    }

    #[test]
    fn test_constant_or() {
        let expr = Expr::Conjunction {
            conjunction: Conjunction::Or,
            terms: vec![Expr::always_false(), Expr::always_true()],
        };
        assert_eq!(expr.evaluate().unwrap(), true);
    }

    #[test]
    fn test_literal_comparison_is_constant() {
        let expr = Expr::Comparison {
            left: Operand::Value(Value::Int(3)),
            operator: Operator::Lt,
            right: Operand::Value(Value::Int(5)),
        };
        assert!(expr.is_constant());
        assert_eq!(expr.evaluate().unwrap(), true);
    }

    #[test]
    fn test_literal_between_evaluation() {
        let expr = Expr::Comparison {
            left: Operand::Value(Value::Int(18)),
            operator: Operator::Between,
            right: Operand::Values(vec![Value::Int(16), Value::Int(21)]),
        };
        assert_eq!(expr.evaluate().unwrap(), true);
    }

    #[test]
    fn test_incomparable_values() {
        let expr = Expr::Comparison {
            left: Operand::Value(Value::Int(1)),
            operator: Operator::Gt,
            right: Operand::Value(Value::Bool(true)),
        };
        assert!(expr.evaluate().is_err());
    }
}
