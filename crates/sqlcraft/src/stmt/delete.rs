//! DELETE statement variant.

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::CraftResult;
use crate::expr::Expr;
use crate::query::Engine;
use crate::stmt::statement::{Statement, StatementKind};
use crate::value::Value;

/// A DELETE statement under construction.
#[derive(Clone, Debug)]
pub struct Delete {
    stmt: Statement,
}

impl Delete {
    /// Start a DELETE from a source.
    pub fn new(dialect: Arc<dyn Dialect>, source: impl Into<String>) -> Self {
        Self {
            stmt: Statement::new(dialect, StatementKind::Delete, source),
        }
    }

    /// AND a condition into the WHERE clause.
    pub fn where_(mut self, expr: Expr) -> CraftResult<Self> {
        self.stmt.add_where(vec![expr])?;
        Ok(self)
    }

    /// Limit the number of affected rows. `u64::MAX` means "no limit".
    pub fn limit(mut self, limit: u64) -> CraftResult<Self> {
        self.stmt.set_limit(limit)?;
        Ok(self)
    }

    /// Set the statement timeout in milliseconds (clause rendering only).
    pub fn timeout(mut self, millis: u64) -> CraftResult<Self> {
        self.stmt.set_timeout(millis)?;
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

    /// Execute through the engine, returning the affected-row count.
    pub fn execute<E: Engine>(&mut self, engine: &mut E) -> CraftResult<u64> {
        let limit = self.stmt.paging_limit();
        let builder = self.stmt.builder()?;
        let sql = builder.sql().to_string();
        let parameters = builder.parameters().to_vec();
        engine.execute(&sql, &parameters, limit)
    }
}
