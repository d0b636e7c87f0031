//! Backend-specific rendering rules.
//!
//! A [`Dialect`] is a set of pure functions from structural intent to text:
//! clause keywords, identifier quoting, operator spellings and positional
//! placeholder syntax. Dialects hold no state and never assemble SQL
//! themselves; one instance is typically shared by many statements.
//!
//! A clause-keyword method returning an empty string means "this dialect has
//! no such clause". Callers must then skip both the keyword and any bind
//! variable the clause would have contributed, so the placeholder/parameter
//! parity invariant survives.

use crate::expr::{Conjunction, Operator};

/// Rendering rules for one SQL backend.
///
/// Default implementations follow ANSI SQL with `?` placeholders; the
/// multi-model clause keywords (LET, UPSERT, UNWIND, ...) default to
/// unsupported.
pub trait Dialect: Send + Sync + std::fmt::Debug {
    /// Quote an identifier, escaping embedded quote characters.
    fn quote(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// Render the placeholder for the given zero-based bind index.
    ///
    /// Must be deterministic in `index` so re-rendering identical builder
    /// state yields identical text.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".to_string()
    }

    fn select(&self) -> &'static str {
        "SELECT"
    }

    /// Projection token used when no explicit projection paths were given.
    /// Empty means the dialect renders a bare lead-in (`SELECT FROM ...`).
    fn all_columns(&self) -> &'static str {
        "*"
    }

    fn from(&self) -> &'static str {
        "FROM"
    }

    fn insert_into(&self) -> &'static str {
        "INSERT INTO"
    }

    fn update(&self) -> &'static str {
        "UPDATE"
    }

    fn delete_from(&self) -> &'static str {
        "DELETE FROM"
    }

    fn where_(&self) -> &'static str {
        "WHERE"
    }

    fn group_by(&self) -> &'static str {
        "GROUP BY"
    }

    fn having(&self) -> &'static str {
        "HAVING"
    }

    fn order_by(&self) -> &'static str {
        "ORDER BY"
    }

    /// Direction keyword appended for descending entries. Ascending is the
    /// default and renders nothing.
    fn descending(&self) -> &'static str {
        "DESC"
    }

    fn limit(&self) -> &'static str {
        "LIMIT"
    }

    fn offset(&self) -> &'static str {
        "OFFSET"
    }

    fn set(&self) -> &'static str {
        "SET"
    }

    /// The assignment operator used by SET and LET entries.
    fn assignment(&self) -> &'static str {
        "="
    }

    /// List separator for assignments, path lists and extra sources.
    fn separator(&self) -> &'static str {
        ","
    }

    fn let_(&self) -> &'static str {
        ""
    }

    /// Render a named LET binding variable. Distinct from a positional bind
    /// parameter; never consumes a placeholder slot in the shipped dialects.
    fn let_variable(&self, name: &str) -> String {
        format!("${name}")
    }

    fn upsert(&self) -> &'static str {
        ""
    }

    fn unwind(&self) -> &'static str {
        ""
    }

    fn fetch_plan(&self) -> &'static str {
        ""
    }

    fn timeout(&self) -> &'static str {
        ""
    }

    fn lock(&self) -> &'static str {
        ""
    }

    fn parallel(&self) -> &'static str {
        ""
    }

    fn nocache(&self) -> &'static str {
        ""
    }

    fn operator(&self, operator: Operator) -> &'static str {
        match operator {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
        }
    }

    fn conjunction(&self, conjunction: Conjunction) -> &'static str {
        match conjunction {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }

    /// Null-comparison spelling for `=`/`!=` against the null sentinel.
    fn null_comparison(&self, negated: bool) -> &'static str {
        if negated { "IS NOT NULL" } else { "IS NULL" }
    }
}

/// Plain ANSI SQL: `"` quoting, `?` placeholders, `LIMIT`/`OFFSET`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {}

/// PostgreSQL: ANSI rules with 1-based `$n` placeholders.
#[derive(Clone, Copy, Debug, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }
}

/// A multi-model dialect in the OrientDB family: backtick quoting, bare
/// `SELECT FROM` lead-in and the full extended clause set.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrientDialect;

impl Dialect for OrientDialect {
    fn quote(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn all_columns(&self) -> &'static str {
        ""
    }

    fn let_(&self) -> &'static str {
        "LET"
    }

    fn upsert(&self) -> &'static str {
        "UPSERT"
    }

    fn unwind(&self) -> &'static str {
        "UNWIND"
    }

    fn fetch_plan(&self) -> &'static str {
        "FETCHPLAN"
    }

    fn timeout(&self) -> &'static str {
        "TIMEOUT"
    }

    fn lock(&self) -> &'static str {
        "LOCK"
    }

    fn parallel(&self) -> &'static str {
        "PARALLEL"
    }

    fn nocache(&self) -> &'static str {
        "NOCACHE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ansi_placeholder_ignores_index() {
        assert_eq!(AnsiDialect.placeholder(0), "?");
        assert_eq!(AnsiDialect.placeholder(7), "?");
    }

    #[test]
    fn test_postgres_placeholder_is_one_based() {
        assert_eq!(PostgresDialect.placeholder(0), "$1");
        assert_eq!(PostgresDialect.placeholder(4), "$5");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(AnsiDialect.quote("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(OrientDialect.quote("tick`ed"), "`tick``ed`");
    }

    #[test]
    fn test_ansi_has_no_multi_model_clauses() {
        assert!(AnsiDialect.let_().is_empty());
        assert!(AnsiDialect.upsert().is_empty());
        assert!(AnsiDialect.fetch_plan().is_empty());
    }
}
