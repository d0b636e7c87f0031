//! Accumulating SQL text plus the positionally-matched bind-parameter list.
//!
//! The invariant this type exists to protect: the Nth placeholder appearing
//! in the text corresponds exactly to the Nth element of the parameter list.
//! [`SqlBuilder::add_variable`] is the only way a placeholder or a parameter
//! enters the builder, and it always emits both together.

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::{CraftError, CraftResult};
use crate::expr::{Conjunction, Expr, Operand, Operator};
use crate::path::PropertyPath;
use crate::value::Value;

/// An append-only SQL buffer with parameter bookkeeping.
#[derive(Clone, Debug)]
pub struct SqlBuilder {
    dialect: Arc<dyn Dialect>,
    sql: String,
    parameters: Vec<Value>,
}

impl SqlBuilder {
    /// Create an empty builder for a dialect.
    pub fn new(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            sql: String::new(),
            parameters: Vec::new(),
        }
    }

    /// The dialect this builder renders with.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// The accumulated SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The captured bind values, in placeholder order.
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// Append a fragment as a space-separated token. No parameter side
    /// effect.
    pub fn append(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if !(self.sql.is_empty() || self.sql.ends_with(' ') || self.sql.ends_with('(')) {
            self.sql.push(' ');
        }
        self.sql.push_str(fragment);
    }

    /// Append a fragment with no separating space (separators, closing
    /// parens).
    pub fn append_raw(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Emit the placeholder for the next bind index and capture its value.
    ///
    /// Placeholder emission and parameter capture are one step; there is no
    /// way to get one without the other.
    pub fn add_variable(&mut self, value: impl Into<Value>) {
        let placeholder = self.dialect.placeholder(self.parameters.len());
        self.append(&placeholder);
        self.parameters.push(value.into());
    }

    /// Render a dialect-separated list of quoted property references.
    pub fn add_paths(&mut self, paths: &[PropertyPath]) {
        for (i, path) in paths.iter().enumerate() {
            if i > 0 {
                self.append_raw(self.dialect.separator());
            }
            self.append(&path.quoted(self.dialect.as_ref()));
        }
    }

    /// Recursively render a boolean expression tree.
    ///
    /// Literal arguments become bind variables; path arguments become quoted
    /// references. `=`/`<>` against the null sentinel render as
    /// IS NULL / IS NOT NULL with no parameter; any other operator against
    /// null is malformed input.
    pub fn add_expression(&mut self, expr: &Expr) -> CraftResult<()> {
        match expr {
            Expr::Constant(value) => {
                // Constants surviving into a clause body render as neutral
                // comparisons; the condition features strip them earlier.
                self.append(if *value { "1 = 1" } else { "1 = 0" });
                Ok(())
            }
            Expr::Conjunction { conjunction, terms } => {
                if terms.is_empty() {
                    return Err(CraftError::validation("conjunction with no terms"));
                }
                self.append("(");
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        self.append(self.dialect.conjunction(*conjunction));
                    }
                    self.add_expression(term)?;
                }
                self.append_raw(")");
                Ok(())
            }
            Expr::Comparison {
                left,
                operator,
                right,
            } => self.add_comparison(left, *operator, right),
        }
    }

    fn add_comparison(
        &mut self,
        left: &Operand,
        operator: Operator,
        right: &Operand,
    ) -> CraftResult<()> {
        if matches!(right, Operand::Value(Value::Null)) {
            return match operator {
                Operator::Eq => self.null_comparison(left, false),
                Operator::Ne => self.null_comparison(left, true),
                _ => Err(CraftError::validation(format!(
                    "operator {operator:?} requires a non-null right-hand operand"
                ))),
            };
        }

        self.add_operand(left)?;
        self.append(self.dialect.operator(operator));

        match operator {
            Operator::Between => {
                let Operand::Values(pair) = right else {
                    return Err(CraftError::validation("BETWEEN requires a value pair"));
                };
                let [low, high] = pair.as_slice() else {
                    return Err(CraftError::validation(format!(
                        "BETWEEN requires exactly two values, got {}",
                        pair.len()
                    )));
                };
                self.add_variable(low.clone());
                self.append(self.dialect.conjunction(Conjunction::And));
                self.add_variable(high.clone());
                Ok(())
            }
            Operator::In | Operator::NotIn => {
                let Operand::Values(values) = right else {
                    return Err(CraftError::validation("IN requires a value list"));
                };
                if values.is_empty() {
                    return Err(CraftError::validation("IN list must not be empty"));
                }
                self.append("(");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.append_raw(self.dialect.separator());
                    }
                    self.add_variable(value.clone());
                }
                self.append_raw(")");
                Ok(())
            }
            _ => self.add_operand(right),
        }
    }

    fn null_comparison(&mut self, left: &Operand, negated: bool) -> CraftResult<()> {
        self.add_operand(left)?;
        self.append(self.dialect.null_comparison(negated));
        Ok(())
    }

    fn add_operand(&mut self, operand: &Operand) -> CraftResult<()> {
        match operand {
            Operand::Path(path) => {
                self.append(&path.quoted(self.dialect.as_ref()));
                Ok(())
            }
            Operand::Value(Value::Null) => Err(CraftError::validation(
                "null is only valid as the right-hand side of =/!=",
            )),
            Operand::Value(value) => {
                self.add_variable(value.clone());
                Ok(())
            }
            Operand::Values(_) => Err(CraftError::validation(
                "value lists are only valid under IN or BETWEEN",
            )),
        }
    }

    // ==================== Lead-in composers ====================

    /// `SELECT <projection> FROM <source> [<alias>]`
    pub fn add_select_from(
        &mut self,
        source: &str,
        alias: Option<&str>,
        projection: &[PropertyPath],
    ) {
        self.append(self.dialect.select());
        if projection.is_empty() {
            self.append(self.dialect.all_columns());
        } else {
            self.add_paths(projection);
        }
        self.add_from(source);
        if let Some(alias) = alias {
            self.append(&self.dialect.quote(alias));
        }
    }

    /// `INSERT INTO <source>`
    pub fn add_insert_into(&mut self, source: &str) {
        self.append(self.dialect.insert_into());
        self.append(&self.dialect.quote(source));
    }

    /// `UPDATE <source>`
    pub fn add_update(&mut self, source: &str) {
        self.append(self.dialect.update());
        self.append(&self.dialect.quote(source));
    }

    /// `DELETE FROM <source>`
    pub fn add_delete_from(&mut self, source: &str) {
        self.append(self.dialect.delete_from());
        self.append(&self.dialect.quote(source));
    }

    /// `FROM <source>`
    pub fn add_from(&mut self, source: &str) {
        self.append(self.dialect.from());
        self.append(&self.dialect.quote(source));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{AnsiDialect, PostgresDialect};
    use crate::path::{Alias, PropertyPath};

    fn ansi() -> SqlBuilder {
        SqlBuilder::new(Arc::new(AnsiDialect))
    }

    #[test]
    fn test_append_spaces_tokens() {
        let mut b = ansi();
        b.append("SELECT");
        b.append("*");
        b.append("FROM");
        b.append("\"t\"");
        assert_eq!(b.sql(), "SELECT * FROM \"t\"");
    }

    #[test]
    fn test_add_variable_keeps_parity() {
        let mut b = ansi();
        b.add_variable(1i64);
        b.append_raw(",");
        b.add_variable("x");
        assert_eq!(b.sql(), "?, ?");
        assert_eq!(b.parameters(), &[Value::Int(1), Value::Text("x".into())]);
    }

    #[test]
    fn test_postgres_placeholders_number_up() {
        let mut b = SqlBuilder::new(Arc::new(PostgresDialect));
        b.add_variable(1i64);
        b.add_variable(2i64);
        assert_eq!(b.sql(), "$1 $2");
    }

    #[test]
    fn test_expression_render() {
        let mut b = ansi();
        let q = Alias::new("q");
        b.add_expression(&q.path("firstName").eq("Heinz")).unwrap();
        assert_eq!(b.sql(), "\"q\".\"firstName\" = ?");
        assert_eq!(b.parameters(), &[Value::Text("Heinz".into())]);
    }

    #[test]
    fn test_conjunction_render() {
        let mut b = ansi();
        let expr = Expr::Conjunction {
            conjunction: Conjunction::And,
            terms: vec![
                PropertyPath::new("a").eq(1),
                PropertyPath::new("b").gt(2),
            ],
        };
        b.add_expression(&expr).unwrap();
        assert_eq!(b.sql(), "(\"a\" = ? AND \"b\" > ?)");
        assert_eq!(b.parameters().len(), 2);
    }

    #[test]
    fn test_between_binds_two() {
        let mut b = ansi();
        b.add_expression(&PropertyPath::new("age").between(16, 21))
            .unwrap();
        assert_eq!(b.sql(), "\"age\" BETWEEN ? AND ?");
        assert_eq!(b.parameters(), &[Value::Int(16), Value::Int(21)]);
    }

    #[test]
    fn test_null_comparison_binds_nothing() {
        let mut b = ansi();
        b.add_expression(&PropertyPath::new("x").eq(Value::Null))
            .unwrap();
        assert_eq!(b.sql(), "\"x\" IS NULL");
        assert!(b.parameters().is_empty());

        let mut b = ansi();
        b.add_expression(&PropertyPath::new("x").is_not_null())
            .unwrap();
        assert_eq!(b.sql(), "\"x\" IS NOT NULL");
        assert!(b.parameters().is_empty());
    }

    #[test]
    fn test_null_under_ordering_operator_fails() {
        let mut b = ansi();
        let err = b
            .add_expression(&PropertyPath::new("x").gt(Value::Null))
            .unwrap_err();
        assert!(matches!(err, CraftError::Validation(_)));
    }

    #[test]
    fn test_in_list_render() {
        let mut b = ansi();
        b.add_expression(&PropertyPath::new("id").in_list(vec![1, 2, 3]))
            .unwrap();
        assert_eq!(b.sql(), "\"id\" IN (?, ?, ?)");
        assert_eq!(b.parameters().len(), 3);
    }

    #[test]
    fn test_path_to_path_comparison_binds_nothing() {
        let mut b = ansi();
        let expr = PropertyPath::new("lastName").eq_path(&PropertyPath::new("firstName"));
        b.add_expression(&expr).unwrap();
        assert_eq!(b.sql(), "\"lastName\" = \"firstName\"");
        assert!(b.parameters().is_empty());
    }

    #[test]
    fn test_add_paths() {
        let mut b = ansi();
        b.add_paths(&[PropertyPath::new("a"), PropertyPath::new("b")]);
        assert_eq!(b.sql(), "\"a\", \"b\"");
    }
}
