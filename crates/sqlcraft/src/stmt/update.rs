//! UPDATE statement variant.

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::CraftResult;
use crate::expr::Expr;
use crate::path::PropertyPath;
use crate::query::Engine;
use crate::stmt::statement::{Statement, StatementKind};
use crate::stmt::feature::AssignmentSource;
use crate::value::Value;

/// An UPDATE statement under construction.
#[derive(Clone, Debug)]
pub struct Update {
    stmt: Statement,
}

impl Update {
    /// Start an UPDATE of a source.
    pub fn new(dialect: Arc<dyn Dialect>, source: impl Into<String>) -> Self {
        Self {
            stmt: Statement::new(dialect, StatementKind::Update, source),
        }
    }

    /// Assign a constant value to a path; contributes one bind variable.
    /// Assignments render in call order.
    pub fn set(mut self, target: PropertyPath, value: impl Into<Value>) -> CraftResult<Self> {
        self.stmt
            .add_set(target, AssignmentSource::Value(value.into()))?;
        Ok(self)
    }

    /// Assign one path from another; contributes no parameter.
    pub fn set_path(mut self, target: PropertyPath, source: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_set(target, AssignmentSource::Path(source))?;
        Ok(self)
    }

    /// Turn the update into an upsert, on dialects that support it.
    pub fn upsert(mut self) -> CraftResult<Self> {
        self.stmt.enable_upsert()?;
        Ok(self)
    }

    /// AND a condition into the WHERE clause.
    pub fn where_(mut self, expr: Expr) -> CraftResult<Self> {
        self.stmt.add_where(vec![expr])?;
        Ok(self)
    }

    /// Bind a named LET variable to a source path.
    pub fn let_(mut self, variable: impl Into<String>, path: PropertyPath) -> CraftResult<Self> {
        self.stmt.add_let(variable.into(), path)?;
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

    /// Set the lock mode.
    pub fn lock(mut self, mode: impl Into<String>) -> CraftResult<Self> {
        self.stmt.set_lock(mode.into())?;
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
