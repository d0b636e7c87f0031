//! Clause contributors ("features") and their fixed render order.
//!
//! Each feature owns only the state needed to render its own clause and
//! knows where it sits in the overall clause order. Features are created on
//! first use, live for the statement's lifetime and are never shared between
//! statements.

use crate::builder::SqlBuilder;
use crate::error::{CraftError, CraftResult};
use crate::expr::{Conjunction, Expr};
use crate::path::PropertyPath;
use crate::value::Value;

/// Closed set of feature capability tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKind {
    AndFrom,
    Set,
    Upsert,
    Where,
    Let,
    GroupBy,
    Having,
    OrderBy,
    Unwind,
    Paging,
    FetchPlan,
    Timeout,
    Lock,
    Parallel,
    NoCache,
}

impl FeatureKind {
    /// Fixed integer rank deciding clause order. Features always render in
    /// ascending rank, never in attachment order. Kinds sharing a band
    /// (ORDER BY / UNWIND, PAGING / FETCHPLAN) still get distinct integers.
    pub fn sort_index(self) -> u8 {
        match self {
            FeatureKind::AndFrom => 10,
            FeatureKind::Set => 20,
            FeatureKind::Upsert => 21,
            FeatureKind::Where => 30,
            FeatureKind::Let => 35,
            FeatureKind::GroupBy => 40,
            FeatureKind::Having => 45,
            FeatureKind::OrderBy => 50,
            FeatureKind::Unwind => 51,
            FeatureKind::Paging => 60,
            FeatureKind::FetchPlan => 61,
            FeatureKind::Timeout => 70,
            FeatureKind::Lock => 80,
            FeatureKind::Parallel => 81,
            FeatureKind::NoCache => 82,
        }
    }

    /// Human-readable tag for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            FeatureKind::AndFrom => "AND FROM",
            FeatureKind::Set => "SET",
            FeatureKind::Upsert => "UPSERT",
            FeatureKind::Where => "WHERE",
            FeatureKind::Let => "LET",
            FeatureKind::GroupBy => "GROUP BY",
            FeatureKind::Having => "HAVING",
            FeatureKind::OrderBy => "ORDER BY",
            FeatureKind::Unwind => "UNWIND",
            FeatureKind::Paging => "PAGING",
            FeatureKind::FetchPlan => "FETCHPLAN",
            FeatureKind::Timeout => "TIMEOUT",
            FeatureKind::Lock => "LOCK",
            FeatureKind::Parallel => "PARALLEL",
            FeatureKind::NoCache => "NOCACHE",
        }
    }
}

/// Sort direction for ORDER BY entries. Ascending is the default and renders
/// no keyword.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// The right-hand side of a SET assignment.
#[derive(Clone, Debug)]
pub enum AssignmentSource {
    /// A constant argument; becomes one bind variable.
    Value(Value),
    /// Another property path; renders as a quoted reference, no parameter.
    Path(PropertyPath),
}

/// One concrete feature with its accumulated clause state.
#[derive(Clone, Debug)]
pub(crate) enum Feature {
    AndFrom(Vec<String>),
    Set(SetState),
    Upsert(bool),
    Where(ConditionState),
    Let(Vec<(String, PropertyPath)>),
    GroupBy(Vec<PropertyPath>),
    Having(ConditionState),
    OrderBy(Vec<(PropertyPath, SortDirection)>),
    Unwind(Vec<PropertyPath>),
    Paging(PagingState),
    FetchPlan(Option<String>),
    Timeout(Option<u64>),
    Lock(Option<String>),
    Parallel(bool),
    NoCache(bool),
}

impl Feature {
    /// Dispatch table: construct the empty feature for a capability tag.
    pub(crate) fn new(kind: FeatureKind) -> Self {
        match kind {
            FeatureKind::AndFrom => Feature::AndFrom(Vec::new()),
            FeatureKind::Set => Feature::Set(SetState::default()),
            FeatureKind::Upsert => Feature::Upsert(false),
            FeatureKind::Where => Feature::Where(ConditionState::default()),
            FeatureKind::Let => Feature::Let(Vec::new()),
            FeatureKind::GroupBy => Feature::GroupBy(Vec::new()),
            FeatureKind::Having => Feature::Having(ConditionState::default()),
            FeatureKind::OrderBy => Feature::OrderBy(Vec::new()),
            FeatureKind::Unwind => Feature::Unwind(Vec::new()),
            FeatureKind::Paging => Feature::Paging(PagingState::default()),
            FeatureKind::FetchPlan => Feature::FetchPlan(None),
            FeatureKind::Timeout => Feature::Timeout(None),
            FeatureKind::Lock => Feature::Lock(None),
            FeatureKind::Parallel => Feature::Parallel(false),
            FeatureKind::NoCache => Feature::NoCache(false),
        }
    }

    pub(crate) fn kind(&self) -> FeatureKind {
        match self {
            Feature::AndFrom(_) => FeatureKind::AndFrom,
            Feature::Set(_) => FeatureKind::Set,
            Feature::Upsert(_) => FeatureKind::Upsert,
            Feature::Where(_) => FeatureKind::Where,
            Feature::Let(_) => FeatureKind::Let,
            Feature::GroupBy(_) => FeatureKind::GroupBy,
            Feature::Having(_) => FeatureKind::Having,
            Feature::OrderBy(_) => FeatureKind::OrderBy,
            Feature::Unwind(_) => FeatureKind::Unwind,
            Feature::Paging(_) => FeatureKind::Paging,
            Feature::FetchPlan(_) => FeatureKind::FetchPlan,
            Feature::Timeout(_) => FeatureKind::Timeout,
            Feature::Lock(_) => FeatureKind::Lock,
            Feature::Parallel(_) => FeatureKind::Parallel,
            Feature::NoCache(_) => FeatureKind::NoCache,
        }
    }

    /// Render this feature's clause. A feature with no content contributes
    /// nothing, including separators and keywords.
    pub(crate) fn build(&self, builder: &mut SqlBuilder) -> CraftResult<()> {
        match self {
            Feature::AndFrom(sources) => {
                for source in sources {
                    builder.append_raw(builder.dialect().separator());
                    let quoted = builder.dialect().quote(source);
                    builder.append(&quoted);
                }
                Ok(())
            }
            Feature::Set(state) => state.build(builder),
            Feature::Upsert(enabled) => {
                if *enabled {
                    builder.append(builder.dialect().upsert());
                }
                Ok(())
            }
            Feature::Where(state) => {
                let keyword = builder.dialect().where_();
                state.build(builder, keyword)
            }
            Feature::Having(state) => {
                let keyword = builder.dialect().having();
                state.build(builder, keyword)
            }
            Feature::Let(bindings) => {
                let keyword = builder.dialect().let_();
                if bindings.is_empty() || keyword.is_empty() {
                    return Ok(());
                }
                builder.append(keyword);
                for (i, (variable, path)) in bindings.iter().enumerate() {
                    if i > 0 {
                        builder.append_raw(builder.dialect().separator());
                    }
                    let variable = builder.dialect().let_variable(variable);
                    builder.append(&variable);
                    builder.append(builder.dialect().assignment());
                    let quoted = path.quoted(builder.dialect());
                    builder.append(&quoted);
                }
                Ok(())
            }
            Feature::GroupBy(paths) => {
                build_path_clause(builder, builder.dialect().group_by(), paths);
                Ok(())
            }
            Feature::Unwind(paths) => {
                build_path_clause(builder, builder.dialect().unwind(), paths);
                Ok(())
            }
            Feature::OrderBy(entries) => {
                if entries.is_empty() {
                    return Ok(());
                }
                builder.append(builder.dialect().order_by());
                for (i, (path, direction)) in entries.iter().enumerate() {
                    if i > 0 {
                        builder.append_raw(builder.dialect().separator());
                    }
                    let quoted = path.quoted(builder.dialect());
                    builder.append(&quoted);
                    if *direction == SortDirection::Descending {
                        builder.append(builder.dialect().descending());
                    }
                }
                Ok(())
            }
            Feature::Paging(state) => {
                state.build(builder);
                Ok(())
            }
            Feature::FetchPlan(plan) => {
                if let Some(plan) = plan {
                    let keyword = builder.dialect().fetch_plan();
                    if !keyword.is_empty() {
                        builder.append(keyword);
                        builder.append(plan);
                    }
                }
                Ok(())
            }
            Feature::Timeout(millis) => {
                if let Some(millis) = millis {
                    let keyword = builder.dialect().timeout();
                    if !keyword.is_empty() {
                        builder.append(keyword);
                        builder.append(&millis.to_string());
                    }
                }
                Ok(())
            }
            Feature::Lock(mode) => {
                if let Some(mode) = mode {
                    let keyword = builder.dialect().lock();
                    if !keyword.is_empty() {
                        builder.append(keyword);
                        builder.append(mode);
                    }
                }
                Ok(())
            }
            Feature::Parallel(enabled) => {
                if *enabled {
                    builder.append(builder.dialect().parallel());
                }
                Ok(())
            }
            Feature::NoCache(enabled) => {
                if *enabled {
                    builder.append(builder.dialect().nocache());
                }
                Ok(())
            }
        }
    }
}

fn build_path_clause(builder: &mut SqlBuilder, keyword: &str, paths: &[PropertyPath]) {
    if paths.is_empty() || keyword.is_empty() {
        return;
    }
    builder.append(keyword);
    builder.add_paths(paths);
}

/// WHERE/HAVING state: a single combined expression.
#[derive(Clone, Debug, Default)]
pub(crate) struct ConditionState {
    expr: Option<Expr>,
}

impl ConditionState {
    /// AND the supplied terms into the existing condition.
    ///
    /// Fails immediately when the combined expression is statically false;
    /// the contradictory combination is not retained.
    pub(crate) fn add(&mut self, terms: Vec<Expr>) -> CraftResult<()> {
        if terms.is_empty() {
            return Ok(());
        }
        let mut all = Vec::with_capacity(terms.len() + 1);
        if let Some(existing) = &self.expr {
            all.push(existing.clone());
        }
        all.extend(terms);
        let combined = Expr::combine(Conjunction::And, all);
        if let Some(expr) = &combined {
            if expr.is_constant() && !expr.evaluate()? {
                return Err(CraftError::NeverMatches(format!("{expr:?}")));
            }
        }
        self.expr = combined;
        Ok(())
    }

    pub(crate) fn build(&self, builder: &mut SqlBuilder, keyword: &str) -> CraftResult<()> {
        let Some(expr) = &self.expr else {
            return Ok(());
        };
        if expr.is_constant() {
            if expr.evaluate()? {
                // Vacuously satisfied; the clause does not appear at all.
                return Ok(());
            }
            return Err(CraftError::internal(
                "constant-false condition survived to render",
            ));
        }
        builder.append(keyword);
        builder.add_expression(expr)
    }
}

/// SET state: ordered assignment pairs, rendered in call order.
#[derive(Clone, Debug, Default)]
pub(crate) struct SetState {
    assignments: Vec<(PropertyPath, AssignmentSource)>,
}

impl SetState {
    pub(crate) fn push(&mut self, target: PropertyPath, source: AssignmentSource) {
        self.assignments.push((target, source));
    }

    fn build(&self, builder: &mut SqlBuilder) -> CraftResult<()> {
        if self.assignments.is_empty() {
            return Ok(());
        }
        builder.append(builder.dialect().set());
        for (i, (target, source)) in self.assignments.iter().enumerate() {
            if i > 0 {
                builder.append_raw(builder.dialect().separator());
            }
            let quoted = target.quoted(builder.dialect());
            builder.append(&quoted);
            builder.append(builder.dialect().assignment());
            match source {
                AssignmentSource::Value(value) => builder.add_variable(value.clone()),
                AssignmentSource::Path(path) => {
                    let quoted = path.quoted(builder.dialect());
                    builder.append(&quoted);
                }
            }
        }
        Ok(())
    }
}

/// PAGING state: optional limit and optional offset.
#[derive(Clone, Debug, Default)]
pub(crate) struct PagingState {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl PagingState {
    /// Set the row limit. `u64::MAX` is the "no limit" sentinel.
    pub(crate) fn set_limit(&mut self, limit: u64) {
        self.limit = if limit == u64::MAX { None } else { Some(limit) };
    }

    /// Set the row offset. Zero means "no offset".
    pub(crate) fn set_offset(&mut self, offset: u64) {
        self.offset = if offset == 0 { None } else { Some(offset) };
    }

    pub(crate) fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Offset renders before limit. A clause whose dialect keyword is empty
    /// is skipped entirely: no keyword and no bind variable, so no orphan
    /// parameter can appear.
    fn build(&self, builder: &mut SqlBuilder) {
        if let Some(offset) = self.offset {
            let keyword = builder.dialect().offset();
            if !keyword.is_empty() {
                builder.append(keyword);
                builder.add_variable(offset as i64);
            }
        }
        if let Some(limit) = self.limit {
            let keyword = builder.dialect().limit();
            if !keyword.is_empty() {
                builder.append(keyword);
                builder.add_variable(limit as i64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::AnsiDialect;
    use crate::path::PropertyPath;
    use std::sync::Arc;

    fn builder() -> SqlBuilder {
        SqlBuilder::new(Arc::new(AnsiDialect))
    }

    #[test]
    fn test_sort_indexes_are_strictly_increasing_by_clause_order() {
        let order = [
            FeatureKind::AndFrom,
            FeatureKind::Set,
            FeatureKind::Upsert,
            FeatureKind::Where,
            FeatureKind::Let,
            FeatureKind::GroupBy,
            FeatureKind::Having,
            FeatureKind::OrderBy,
            FeatureKind::Unwind,
            FeatureKind::Paging,
            FeatureKind::FetchPlan,
            FeatureKind::Timeout,
            FeatureKind::Lock,
            FeatureKind::Parallel,
            FeatureKind::NoCache,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].sort_index() < pair[1].sort_index());
        }
    }

    #[test]
    fn test_condition_constant_false_rejected_on_add() {
        let mut state = ConditionState::default();
        let err = state.add(vec![Expr::always_false()]).unwrap_err();
        assert!(err.is_never_matches());
        // The contradiction is not retained.
        let mut b = builder();
        state.build(&mut b, "WHERE").unwrap();
        assert_eq!(b.sql(), "");
    }

    #[test]
    fn test_condition_constant_true_renders_nothing() {
        let mut state = ConditionState::default();
        state.add(vec![Expr::always_true()]).unwrap();
        let mut b = builder();
        state.build(&mut b, "WHERE").unwrap();
        assert_eq!(b.sql(), "");
    }

    #[test]
    fn test_condition_combines_with_and() {
        let mut state = ConditionState::default();
        state.add(vec![PropertyPath::new("a").eq(1)]).unwrap();
        state.add(vec![PropertyPath::new("b").eq(2)]).unwrap();
        let mut b = builder();
        state.build(&mut b, "WHERE").unwrap();
        assert_eq!(b.sql(), "WHERE (\"a\" = ? AND \"b\" = ?)");
        assert_eq!(b.parameters().len(), 2);
    }

    #[test]
    fn test_true_term_and_real_term_still_renders() {
        let mut state = ConditionState::default();
        state
            .add(vec![Expr::always_true(), PropertyPath::new("a").eq(1)])
            .unwrap();
        let mut b = builder();
        state.build(&mut b, "WHERE").unwrap();
        assert_eq!(b.sql(), "WHERE (1 = 1 AND \"a\" = ?)");
    }

    #[test]
    fn test_empty_condition_renders_nothing() {
        let state = ConditionState::default();
        let mut b = builder();
        state.build(&mut b, "WHERE").unwrap();
        assert_eq!(b.sql(), "");
    }

    #[test]
    fn test_paging_limit_sentinel() {
        let mut state = PagingState::default();
        state.set_limit(u64::MAX);
        assert_eq!(state.limit(), None);
        state.set_limit(100);
        assert_eq!(state.limit(), Some(100));
    }

    #[test]
    fn test_paging_offset_zero_is_absent() {
        let mut state = PagingState::default();
        state.set_offset(0);
        let mut b = builder();
        state.build(&mut b);
        assert_eq!(b.sql(), "");
        assert!(b.parameters().is_empty());
    }

    #[test]
    fn test_paging_offset_before_limit() {
        let mut state = PagingState::default();
        state.set_limit(10);
        state.set_offset(20);
        let mut b = builder();
        state.build(&mut b);
        assert_eq!(b.sql(), "OFFSET ? LIMIT ?");
        assert_eq!(b.parameters(), &[Value::Int(20), Value::Int(10)]);
    }
}
