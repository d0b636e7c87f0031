//! sqlcraft: a dialect-agnostic, type-checked SQL statement builder.
//!
//! Statements are assembled fluently from typed property paths and boolean
//! expression trees, then rendered into dialect-specific SQL text plus a
//! positionally-matched bind-parameter list. Rendering is lazy and cached;
//! any mutation invalidates the cache and the next read rebuilds.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use sqlcraft::{stmt, Alias, AnsiDialect, Value};
//!
//! # fn main() -> sqlcraft::CraftResult<()> {
//! let dialect = Arc::new(AnsiDialect);
//! let q = Alias::new("q");
//!
//! let mut select = stmt::select(dialect, "Person")
//!     .alias("q")
//!     .where_(q.path("firstName").eq("Heinz"))?
//!     .order_by(q.path("age"))?
//!     .limit(100)?;
//!
//! assert_eq!(
//!     select.sql()?,
//!     "SELECT * FROM \"Person\" \"q\" WHERE \"q\".\"firstName\" = ? \
//!      ORDER BY \"q\".\"age\" LIMIT ?"
//! );
//! assert_eq!(
//!     select.parameters()?,
//!     &[Value::Text("Heinz".into()), Value::Int(100)]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! The crate never talks to a database. Finalized statements hand their SQL
//! and parameters to an [`Engine`] implemented by the persistence layer.

pub mod builder;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod path;
pub mod query;
pub mod stmt;
pub mod value;

pub use builder::SqlBuilder;
pub use dialect::{AnsiDialect, Dialect, OrientDialect, PostgresDialect};
pub use error::{CraftError, CraftResult};
pub use expr::{Conjunction, Expr, Operand, Operator};
pub use path::{Alias, PropertyPath, and, or};
pub use query::{Engine, Query, QueryMode};
pub use stmt::{
    AssignmentSource, Delete, FeatureKind, Insert, Select, SortDirection, Statement,
    StatementKind, Update,
};
pub use value::Value;
