//! Read-side query snapshots and the external execution hook.
//!
//! The builder core never talks to a database. Finalized SQL and its
//! parameter list are handed to an [`Engine`] implemented by the persistence
//! layer; engine errors pass through untouched as
//! [`CraftError::Execution`](crate::CraftError::Execution).

use crate::error::{CraftError, CraftResult};
use crate::value::Value;

/// External execution hook.
///
/// Invoked with fully rendered SQL and bind parameters in emission order.
pub trait Engine {
    /// Row type produced by fetches.
    type Row;

    /// Execute a mutating statement, returning the affected-row count.
    /// `limit` is the statement's paging limit, when one was applied.
    fn execute(&mut self, sql: &str, parameters: &[Value], limit: Option<u64>)
    -> CraftResult<u64>;

    /// Execute a read statement, returning all rows.
    fn fetch(&mut self, sql: &str, parameters: &[Value]) -> CraftResult<Vec<Self::Row>>;

    /// Count matching rows. Defaults to fetching and counting; engines with
    /// a cheaper path should override.
    fn fetch_count(&mut self, sql: &str, parameters: &[Value]) -> CraftResult<u64> {
        Ok(self.fetch(sql, parameters)?.len() as u64)
    }
}

/// Whether a query expects a list or a single object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    List,
    Single,
}

/// An immutable snapshot of a finalized SELECT.
///
/// Taken from a statement at a point in time; the statement may keep being
/// mutated afterwards without affecting the snapshot.
#[derive(Clone, Debug)]
pub struct Query {
    sql: String,
    parameters: Vec<Value>,
    source: String,
    mode: QueryMode,
}

impl Query {
    pub(crate) fn new(
        sql: String,
        parameters: Vec<Value>,
        source: String,
        mode: QueryMode,
    ) -> Self {
        Self {
            sql,
            parameters,
            source,
            mode,
        }
    }

    /// The finalized SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bind parameters in placeholder order.
    pub fn parameters(&self) -> &[Value] {
        &self.parameters
    }

    /// The source identifier, kept for diagnostics.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Adapt a list-result query into a single-result one.
    pub fn single(mut self) -> Self {
        self.mode = QueryMode::Single;
        self
    }

    /// Fetch all rows.
    pub fn fetch<E: Engine>(&self, engine: &mut E) -> CraftResult<Vec<E::Row>> {
        engine.fetch(&self.sql, &self.parameters)
    }

    /// Fetch the first row, if any.
    pub fn fetch_first<E: Engine>(&self, engine: &mut E) -> CraftResult<Option<E::Row>> {
        Ok(self.fetch(engine)?.into_iter().next())
    }

    /// Fetch exactly one row; a miss is a distinct not-found condition
    /// carrying the statement's source identifier.
    pub fn fetch_one<E: Engine>(&self, engine: &mut E) -> CraftResult<E::Row> {
        self.fetch_first(engine)?
            .ok_or_else(|| CraftError::not_found(&self.source))
    }

    /// Count matching rows.
    pub fn fetch_count<E: Engine>(&self, engine: &mut E) -> CraftResult<u64> {
        engine.fetch_count(&self.sql, &self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine stub recording calls and replaying canned rows.
    struct StubEngine {
        rows: Vec<i64>,
        log: Vec<String>,
    }

    impl Engine for StubEngine {
        type Row = i64;

        fn execute(
            &mut self,
            sql: &str,
            parameters: &[Value],
            limit: Option<u64>,
        ) -> CraftResult<u64> {
            self.log
                .push(format!("execute {sql} [{}] {limit:?}", parameters.len()));
            Ok(self.rows.len() as u64)
        }

        fn fetch(&mut self, sql: &str, parameters: &[Value]) -> CraftResult<Vec<i64>> {
            self.log
                .push(format!("fetch {sql} [{}]", parameters.len()));
            Ok(self.rows.clone())
        }
    }

    fn query() -> Query {
        Query::new(
            "SELECT * FROM \"t\"".to_string(),
            vec![],
            "t".to_string(),
            QueryMode::List,
        )
    }

    #[test]
    fn test_fetch_one_returns_first() {
        let mut engine = StubEngine {
            rows: vec![7, 8],
            log: vec![],
        };
        assert_eq!(query().fetch_one(&mut engine).unwrap(), 7);
    }

    #[test]
    fn test_fetch_one_not_found_names_source() {
        let mut engine = StubEngine {
            rows: vec![],
            log: vec![],
        };
        let err = query().fetch_one(&mut engine).unwrap_err();
        match err {
            CraftError::NotFound { source } => assert_eq!(source, "t"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_default_count_fetches() {
        let mut engine = StubEngine {
            rows: vec![1, 2, 3],
            log: vec![],
        };
        assert_eq!(query().fetch_count(&mut engine).unwrap(), 3);
    }

    #[test]
    fn test_single_adapts_mode() {
        let q = query().single();
        assert_eq!(q.mode(), QueryMode::Single);
    }
}
