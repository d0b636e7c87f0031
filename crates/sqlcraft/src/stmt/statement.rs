//! The statement façade: feature registry, clause ordering and the lazily
//! built, cached [`SqlBuilder`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::SqlBuilder;
use crate::dialect::Dialect;
use crate::error::{CraftError, CraftResult};
use crate::expr::Expr;
use crate::path::PropertyPath;
use crate::stmt::feature::{AssignmentSource, Feature, FeatureKind, SortDirection};
use crate::value::Value;

/// Which statement variant a core belongs to. Fixes the lead-in clause and
/// the set of legal features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn name(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// Legality table: which features each statement kind declares.
    pub fn allows(self, feature: FeatureKind) -> bool {
        use FeatureKind::*;
        match self {
            StatementKind::Select => matches!(
                feature,
                AndFrom
                    | Where
                    | Let
                    | GroupBy
                    | Having
                    | OrderBy
                    | Unwind
                    | Paging
                    | FetchPlan
                    | Timeout
                    | Lock
                    | Parallel
                    | NoCache
            ),
            StatementKind::Insert => matches!(feature, Set),
            StatementKind::Update => {
                matches!(feature, Set | Upsert | Where | Let | Paging | Timeout | Lock)
            }
            StatementKind::Delete => matches!(feature, Where | Paging | Timeout),
        }
    }
}

/// Shared mutable core of every statement variant.
///
/// Owns the dialect handle, the feature registry and the cached builder.
/// `built == None` means dirty: the next read rebuilds. Every mutation path
/// clears the cache first; read-only access never creates a feature.
#[derive(Clone, Debug)]
pub struct Statement {
    dialect: Arc<dyn Dialect>,
    kind: StatementKind,
    source: String,
    alias: Option<String>,
    projection: Vec<PropertyPath>,
    features: BTreeMap<FeatureKind, Feature>,
    built: Option<SqlBuilder>,
}

impl Statement {
    pub(crate) fn new(
        dialect: Arc<dyn Dialect>,
        kind: StatementKind,
        source: impl Into<String>,
    ) -> Self {
        Self {
            dialect,
            kind,
            source: source.into(),
            alias: None,
            projection: Vec::new(),
            features: BTreeMap::new(),
            built: None,
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The source (table/class) identifier this statement targets.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub(crate) fn set_alias(&mut self, alias: impl Into<String>) {
        self.built = None;
        self.alias = Some(alias.into());
    }

    pub(crate) fn set_projection(&mut self, paths: Vec<PropertyPath>) {
        self.built = None;
        self.projection = paths;
    }

    /// Get-or-create a feature and hand it to `mutate`, invalidating the
    /// cache in the same step. Rejects features the statement kind does not
    /// declare.
    pub(crate) fn with_feature<R>(
        &mut self,
        kind: FeatureKind,
        mutate: impl FnOnce(&mut Feature) -> CraftResult<R>,
    ) -> CraftResult<R> {
        if !self.kind.allows(kind) {
            return Err(CraftError::Unsupported {
                feature: kind.name(),
                statement: self.kind.name(),
            });
        }
        self.built = None;
        let feature = self
            .features
            .entry(kind)
            .or_insert_with(|| Feature::new(kind));
        mutate(feature)
    }

    /// Read-only peek at a feature without creating it.
    pub(crate) fn feature(&self, kind: FeatureKind) -> Option<&Feature> {
        self.features.get(&kind)
    }

    /// Build protocol: return the cached builder unchanged if present;
    /// otherwise render the lead-in and every attached feature in ascending
    /// sort-index order, cache the result and return it.
    pub fn builder(&mut self) -> CraftResult<&SqlBuilder> {
        if self.built.is_none() {
            let mut builder = SqlBuilder::new(self.dialect.clone());
            match self.kind {
                StatementKind::Select => {
                    builder.add_select_from(&self.source, self.alias.as_deref(), &self.projection);
                }
                StatementKind::Insert => builder.add_insert_into(&self.source),
                StatementKind::Update => builder.add_update(&self.source),
                StatementKind::Delete => builder.add_delete_from(&self.source),
            }

            let mut features: Vec<&Feature> = self.features.values().collect();
            features.sort_by_key(|f| f.kind().sort_index());
            for feature in features {
                feature.build(&mut builder)?;
            }

            tracing::debug!(
                sql = %builder.sql(),
                parameters = builder.parameters().len(),
                kind = self.kind.name(),
                "statement rendered"
            );
            self.built = Some(builder);
        }
        self.built
            .as_ref()
            .ok_or_else(|| CraftError::internal("builder cache empty after build"))
    }

    /// The rendered SQL text. Idempotent until the next mutation.
    pub fn sql(&mut self) -> CraftResult<&str> {
        Ok(self.builder()?.sql())
    }

    // ==================== Typed feature mutators ====================
    //
    // Every mutator goes through `with_feature`, so cache invalidation and
    // state mutation happen as one step and illegal features are rejected
    // uniformly.

    pub(crate) fn add_where(&mut self, terms: Vec<Expr>) -> CraftResult<()> {
        self.with_feature(FeatureKind::Where, |f| {
            let Feature::Where(state) = f else {
                return Err(CraftError::internal("registry returned non-WHERE feature"));
            };
            state.add(terms)
        })
    }

    pub(crate) fn add_having(&mut self, terms: Vec<Expr>) -> CraftResult<()> {
        self.with_feature(FeatureKind::Having, |f| {
            let Feature::Having(state) = f else {
                return Err(CraftError::internal("registry returned non-HAVING feature"));
            };
            state.add(terms)
        })
    }

    pub(crate) fn add_set(
        &mut self,
        target: PropertyPath,
        source: AssignmentSource,
    ) -> CraftResult<()> {
        self.with_feature(FeatureKind::Set, |f| {
            let Feature::Set(state) = f else {
                return Err(CraftError::internal("registry returned non-SET feature"));
            };
            state.push(target, source);
            Ok(())
        })
    }

    pub(crate) fn enable_upsert(&mut self) -> CraftResult<()> {
        self.with_feature(FeatureKind::Upsert, |f| {
            let Feature::Upsert(enabled) = f else {
                return Err(CraftError::internal("registry returned non-UPSERT feature"));
            };
            *enabled = true;
            Ok(())
        })
    }

    pub(crate) fn add_let(&mut self, variable: String, path: PropertyPath) -> CraftResult<()> {
        self.with_feature(FeatureKind::Let, |f| {
            let Feature::Let(bindings) = f else {
                return Err(CraftError::internal("registry returned non-LET feature"));
            };
            bindings.push((variable, path));
            Ok(())
        })
    }

    pub(crate) fn add_group_by(&mut self, path: PropertyPath) -> CraftResult<()> {
        self.with_feature(FeatureKind::GroupBy, |f| {
            let Feature::GroupBy(paths) = f else {
                return Err(CraftError::internal("registry returned non-GROUP BY feature"));
            };
            paths.push(path);
            Ok(())
        })
    }

    pub(crate) fn add_order_by(
        &mut self,
        path: PropertyPath,
        direction: SortDirection,
    ) -> CraftResult<()> {
        self.with_feature(FeatureKind::OrderBy, |f| {
            let Feature::OrderBy(entries) = f else {
                return Err(CraftError::internal("registry returned non-ORDER BY feature"));
            };
            entries.push((path, direction));
            Ok(())
        })
    }

    pub(crate) fn add_unwind(&mut self, path: PropertyPath) -> CraftResult<()> {
        self.with_feature(FeatureKind::Unwind, |f| {
            let Feature::Unwind(paths) = f else {
                return Err(CraftError::internal("registry returned non-UNWIND feature"));
            };
            paths.push(path);
            Ok(())
        })
    }

    pub(crate) fn add_and_from(&mut self, source: String) -> CraftResult<()> {
        self.with_feature(FeatureKind::AndFrom, |f| {
            let Feature::AndFrom(sources) = f else {
                return Err(CraftError::internal("registry returned non-AND FROM feature"));
            };
            sources.push(source);
            Ok(())
        })
    }

    pub(crate) fn set_limit(&mut self, limit: u64) -> CraftResult<()> {
        self.with_feature(FeatureKind::Paging, |f| {
            let Feature::Paging(state) = f else {
                return Err(CraftError::internal("registry returned non-PAGING feature"));
            };
            state.set_limit(limit);
            Ok(())
        })
    }

    pub(crate) fn set_offset(&mut self, offset: u64) -> CraftResult<()> {
        self.with_feature(FeatureKind::Paging, |f| {
            let Feature::Paging(state) = f else {
                return Err(CraftError::internal("registry returned non-PAGING feature"));
            };
            state.set_offset(offset);
            Ok(())
        })
    }

    pub(crate) fn set_fetch_plan(&mut self, plan: String) -> CraftResult<()> {
        self.with_feature(FeatureKind::FetchPlan, |f| {
            let Feature::FetchPlan(slot) = f else {
                return Err(CraftError::internal("registry returned non-FETCHPLAN feature"));
            };
            *slot = Some(plan);
            Ok(())
        })
    }

    pub(crate) fn set_timeout(&mut self, millis: u64) -> CraftResult<()> {
        self.with_feature(FeatureKind::Timeout, |f| {
            let Feature::Timeout(slot) = f else {
                return Err(CraftError::internal("registry returned non-TIMEOUT feature"));
            };
            *slot = Some(millis);
            Ok(())
        })
    }

    pub(crate) fn set_lock(&mut self, mode: String) -> CraftResult<()> {
        self.with_feature(FeatureKind::Lock, |f| {
            let Feature::Lock(slot) = f else {
                return Err(CraftError::internal("registry returned non-LOCK feature"));
            };
            *slot = Some(mode);
            Ok(())
        })
    }

    pub(crate) fn enable_parallel(&mut self) -> CraftResult<()> {
        self.with_feature(FeatureKind::Parallel, |f| {
            let Feature::Parallel(enabled) = f else {
                return Err(CraftError::internal("registry returned non-PARALLEL feature"));
            };
            *enabled = true;
            Ok(())
        })
    }

    pub(crate) fn enable_nocache(&mut self) -> CraftResult<()> {
        self.with_feature(FeatureKind::NoCache, |f| {
            let Feature::NoCache(enabled) = f else {
                return Err(CraftError::internal("registry returned non-NOCACHE feature"));
            };
            *enabled = true;
            Ok(())
        })
    }

    /// The paging limit, if one was applied. Passed to the execution hook of
    /// mutating statements.
    pub(crate) fn paging_limit(&self) -> Option<u64> {
        match self.feature(FeatureKind::Paging) {
            Some(Feature::Paging(state)) => state.limit(),
            _ => None,
        }
    }

    /// The bind parameters in placeholder order. Idempotent until the next
    /// mutation.
    pub fn parameters(&mut self) -> CraftResult<&[Value]> {
        Ok(self.builder()?.parameters())
    }
}
