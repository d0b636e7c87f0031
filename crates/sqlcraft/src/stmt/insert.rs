//! INSERT statement variant (SET-syntax).

use std::sync::Arc;

use crate::dialect::Dialect;
use crate::error::CraftResult;
use crate::path::PropertyPath;
use crate::query::Engine;
use crate::stmt::statement::{Statement, StatementKind};
use crate::stmt::feature::AssignmentSource;
use crate::value::Value;

/// An INSERT statement under construction.
///
/// Renders `INSERT INTO <source> SET a = ?, b = ?`; the only legal feature
/// is SET.
#[derive(Clone, Debug)]
pub struct Insert {
    stmt: Statement,
}

impl Insert {
    /// Start an INSERT into a source.
    pub fn new(dialect: Arc<dyn Dialect>, source: impl Into<String>) -> Self {
        Self {
            stmt: Statement::new(dialect, StatementKind::Insert, source),
        }
    }

    /// Assign a constant value to a path; contributes one bind variable.
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
