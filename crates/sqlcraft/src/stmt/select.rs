//! SELECT statement variant.

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::CraftResult;
use crate::expr::Expr;
use crate::path::PropertyPath;
use crate::query::{Engine, Query, QueryMode};
use crate::stmt::statement::{Statement, StatementKind};
use crate::stmt::feature::SortDirection;
use crate::value::Value;

/// A SELECT statement under construction.
///
/// The alias, when set, qualifies the source in the lead-in and is expected
/// to match the alias used on the property paths in the attached clauses.
#[derive(Clone, Debug)]
pub struct Select {
    stmt: Statement,
}

impl Select {
    /// Start a SELECT over a source.
    pub fn new(dialect: Arc<dyn Dialect>, source: impl Into<String>) -> Self {
        Self {
            stmt: Statement::new(dialect, StatementKind::Select, source),
        }
    }

    /// Set the source alias rendered after the FROM target.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.stmt.set_alias(alias);
        self
    }

    /// Set explicit projection paths. An empty projection renders the
    /// dialect's all-columns token.
    pub fn projection(mut self, paths: Vec<PropertyPath>) -> Self {
        self.stmt.set_projection(paths);
        self
    }

    /// Add an extra comma-joined source after the lead-in.
    pub fn and_from(mut self, source: impl Into<String>) -> CraftResult<Self> {
        self.stmt.add_and_from(source.into())?;
        Ok(self)
    }

    /// AND a condition into the WHERE clause.
    ///
    /// Fails immediately when the combined condition can never match.
    pub fn where_(mut self, expr: Expr) -> CraftResult<Self> {
        self.stmt.add_where(vec![expr])?;
        Ok(self)
    }

    /// AND several conditions into the WHERE clause at once.
    pub fn where_all(mut self, exprs: Vec<Expr>) -> CraftResult<Self> {
        self.stmt.add_where(exprs)?;
        Ok(self)
    }

    /// Bind a named LET variable to a source path.
    pub fn let_(mut self, variable: impl Into<String>, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_let(variable.into(), path)?;
        Ok(self)
    }

    /// Append a GROUP BY path.
    pub fn group_by(mut self, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_group_by(path)?;
        Ok(self)
    }

    /// AND a condition into the HAVING clause.
    pub fn having(mut self, expr: Expr) -> CraftResult<Self> {
        self.stmt.add_having(vec![expr])?;
        Ok(self)
    }

    /// Append an ascending ORDER BY entry.
    pub fn order_by(mut self, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_order_by(path, SortDirection::Ascending)?;
        Ok(self)
    }

    /// Append a descending ORDER BY entry.
    pub fn order_by_desc(mut self, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_order_by(path, SortDirection::Descending)?;
        Ok(self)
    }

    /// Append an UNWIND path.
    pub fn unwind(mut self, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_unwind(path)?;
        Ok(self)
    }

    /// Set the row limit. `u64::MAX` means "no limit".
    pub fn limit(mut self, limit: u64) -> CraftResult<Self> {
        self.stmt.set_limit(limit)?;
        Ok(self)
    }

    /// Set the row offset. Zero means "no offset".
    pub fn offset(mut self, offset: u64) -> CraftResult<Self> {
        self.stmt.set_offset(offset)?;
        Ok(self)
    }

    /// Set the fetch plan string.
    pub fn fetch_plan(mut self, plan: impl Into<String>) -> CraftResult<Self> {
        self.stmt.set_fetch_plan(plan.into())?;
        Ok(self)
    }

    /// Set the statement timeout in milliseconds (clause rendering only).
    pub fn timeout(mut self, millis: u64) -> CraftResult<Self> {
        self.stmt.set_timeout(millis)?;
        Ok(self)
    }

    /// Set the lock mode.
    pub fn lock(mut self, mode: impl Into<String>) -> CraftResult<Self> {
        self.stmt.set_lock(mode.into())?;
        Ok(self)
    }

    /// Request parallel execution.
    pub fn parallel(mut self) -> CraftResult<Self> {
        self.stmt.enable_parallel()?;
        Ok(self)
    }

    /// Bypass the result cache.
    pub fn nocache(mut self) -> CraftResult<Self> {
        self.stmt.enable_nocache()?;
        Ok(self)
    }

    /// The rendered SQL text.
    pub fn sql(&mut self) -> CraftResult<&str> {
        self.stmt.sql()
    }

    /// The bind parameters in placeholder order.
    pub fn parameters(&mut self) -> CraftResult<&[Value]> {
        self.stmt.parameters()
    }

    /// Snapshot the current SQL and parameters into a list-mode [`Query`].
    pub fn query(&mut self) -> CraftResult<Query> {
        let source = self.stmt.source().to_string();
        let builder = self.stmt.builder()?;
        Ok(Query::new(
            builder.sql().to_string(),
            builder.parameters().to_vec(),
            source,
            QueryMode::List,
        ))
    }

    /// Fetch all rows through the engine.
    pub fn fetch<E: Engine>(&mut self, engine: &mut E) -> CraftResult<Vec<E::Row>> {
        self.query()?.fetch(engine)
    }

    /// Fetch the first row, if any.
    pub fn fetch_first<E: Engine>(&mut self, engine: &mut E) -> CraftResult<Option<E::Row>> {
        self.query()?.fetch_first(engine)
    }

    /// Fetch exactly one row or fail with a not-found error naming the
    /// source.
    pub fn fetch_one<E: Engine>(&mut self, engine: &mut E) -> CraftResult<E::Row> {
        self.query()?.single().fetch_one(engine)
    }

    /// Count matching rows.
    pub fn fetch_count<E: Engine>(&mut self, engine: &mut E) -> CraftResult<u64> {
        self.query()?.fetch_count(engine)
    }
}
