//! Fluent statement builders.
//!
//! A statement is a mutable façade over a registry of clause features. Each
//! fluent call mutates one feature and invalidates the cached render; SQL
//! text and the bind-parameter list are produced lazily on first read and
//! cached until the next mutation. Clauses always render in their fixed
//! order regardless of the order they were attached.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use sqlcraft::{stmt, Alias, AnsiDialect};
//!
//! let dialect = Arc::new(AnsiDialect);
//! let q = Alias::new("q");
//!
//! let mut select = stmt::select(dialect.clone(), "Person")
//!     .alias("q")
//!     .where_(q.path("firstName").eq("Heinz"))?
//!     .order_by(q.path("age"))?
//!     .limit(100)?;
//!
//! let sql = select.sql()?;
//! let parameters = select.parameters()?;
//! ```

mod statement;
mod delete;
mod feature;
mod insert;
mod select;
mod update;

pub use statement::{Statement, StatementKind};
pub use delete::Delete;
pub use feature::{AssignmentSource, FeatureKind, SortDirection};
pub use insert::Insert;
pub use select::Select;
pub use update::Update;

use std::sync::Arc;

use crate::dialect::Dialect;

/// Start a SELECT statement over the given source.
pub fn select(dialect: Arc<dyn Dialect>, source: &str) -> Select {
    Select::new(dialect, source)
}

/// Start an INSERT statement into the given source.
pub fn insert(dialect: Arc<dyn Dialect>, source: &str) -> Insert {
    Insert::new(dialect, source)
}

/// Start an UPDATE statement for the given source.
pub fn update(dialect: Arc<dyn Dialect>, source: &str) -> Update {
    Update::new(dialect, source)
}

/// Start a DELETE statement from the given source.
pub fn delete(dialect: Arc<dyn Dialect>, source: &str) -> Delete {
    Delete::new(dialect, source)
}
