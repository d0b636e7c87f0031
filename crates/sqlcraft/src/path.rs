//! Typed property references.
//!
//! A [`PropertyPath`] is a renderable, dialect-quoted column reference,
//! optionally qualified by a table alias. All comparison constructors live
//! here so call sites read as `q.path("age").between(16, 21)`.

use crate::dialect::Dialect;
use crate::expr::{Conjunction, Expr, Operand, Operator};
use crate::value::Value;

/// A property reference: an optional alias plus a column name.
///
/// Paths never contribute bind parameters; they render as quoted
/// identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    alias: Option<String>,
    name: String,
}

impl PropertyPath {
    /// Create an unqualified path.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
        }
    }

    /// Create an alias-qualified path.
    pub fn aliased(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            name: name.into(),
        }
    }

    /// The qualifying alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the dialect-quoted reference, e.g. `"q"."firstName"`.
    pub fn quoted(&self, dialect: &dyn Dialect) -> String {
        match &self.alias {
            Some(alias) => format!("{}.{}", dialect.quote(alias), dialect.quote(&self.name)),
            None => dialect.quote(&self.name),
        }
    }

    // ==================== Comparison constructors ====================

    /// path = value (a null value renders IS NULL)
    pub fn eq(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Eq, Operand::Value(value.into()))
    }

    /// path != value (a null value renders IS NOT NULL)
    pub fn ne(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Ne, Operand::Value(value.into()))
    }

    /// path > value
    pub fn gt(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Gt, Operand::Value(value.into()))
    }

    /// path >= value
    pub fn ge(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Ge, Operand::Value(value.into()))
    }

    /// path < value
    pub fn lt(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Lt, Operand::Value(value.into()))
    }

    /// path <= value
    pub fn le(&self, value: impl Into<Value>) -> Expr {
        self.compare(Operator::Le, Operand::Value(value.into()))
    }

    /// path LIKE pattern
    pub fn like(&self, pattern: impl Into<Value>) -> Expr {
        self.compare(Operator::Like, Operand::Value(pattern.into()))
    }

    /// path BETWEEN low AND high (binds two parameters)
    pub fn between(&self, low: impl Into<Value>, high: impl Into<Value>) -> Expr {
        self.compare(
            Operator::Between,
            Operand::Values(vec![low.into(), high.into()]),
        )
    }

    /// path IN (values...)
    pub fn in_list<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
        self.compare(
            Operator::In,
            Operand::Values(values.into_iter().map(Into::into).collect()),
        )
    }

    /// path NOT IN (values...)
    pub fn not_in<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
        self.compare(
            Operator::NotIn,
            Operand::Values(values.into_iter().map(Into::into).collect()),
        )
    }

    /// path IS NULL
    pub fn is_null(&self) -> Expr {
        self.eq(Value::Null)
    }

    /// path IS NOT NULL
    pub fn is_not_null(&self) -> Expr {
        self.ne(Value::Null)
    }

    /// path = other-path (no parameter)
    pub fn eq_path(&self, other: &PropertyPath) -> Expr {
        self.compare(Operator::Eq, Operand::Path(other.clone()))
    }

    fn compare(&self, operator: Operator, right: Operand) -> Expr {
        Expr::Comparison {
            left: Operand::Path(self.clone()),
            operator,
            right,
        }
    }
}

/// A table alias that mints qualified [`PropertyPath`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    name: String,
}

impl Alias {
    /// Create an alias.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The alias name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A path qualified by this alias.
    pub fn path(&self, name: impl Into<String>) -> PropertyPath {
        PropertyPath::aliased(self.name.clone(), name)
    }
}

/// Combine expressions with AND.
pub fn and(terms: Vec<Expr>) -> Option<Expr> {
    Expr::combine(Conjunction::And, terms)
}

/// Combine expressions with OR.
pub fn or(terms: Vec<Expr>) -> Option<Expr> {
    Expr::combine(Conjunction::Or, terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;

    #[test]
    fn test_quoted_plain() {
        let p = PropertyPath::new("age");
        assert_eq!(p.quoted(&AnsiDialect), "\"age\"");
    }

    #[test]
    fn test_quoted_aliased() {
        let q = Alias::new("q");
        assert_eq!(q.path("firstName").quoted(&AnsiDialect), "\"q\".\"firstName\"");
    }
}
