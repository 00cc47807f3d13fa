//! Filter construction.
//!
//! [`FilterDescriptor`] is the storage-agnostic contract between the query
//! layer and the repository collaborator: equality, range, and literal
//! pattern predicates, plus an alternation for search. The repository
//! translates it into actual query syntax; nothing here knows about any
//! particular engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::params::{NormalizedListParams, SortOrder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    Str(String),
    Num(f64),
    Int(i64),
    Date(DateTime<Utc>),
    Id(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Predicate {
    /// Field equals a value.
    Eq { field: String, value: FilterValue },
    /// Inclusive range; at least one bound is always present.
    Range {
        field: String,
        from: Option<FilterValue>,
        to: Option<FilterValue>,
    },
    /// Field matches an already-escaped literal pattern.
    Matches {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Field value is a member of the given set.
    In {
        field: String,
        values: Vec<FilterValue>,
    },
}

/// Conjunction of predicates plus an optional alternation: a record matches
/// when every entry of `predicates` holds and, if `alternation` is non-empty,
/// at least one of its entries holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub predicates: Vec<Predicate>,
    pub alternation: Vec<Predicate>,
}

impl FilterDescriptor {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.alternation.is_empty()
    }

    /// Fold search results into an `$or`-style alternation. This is the
    /// second half of the two-step cross-collection search: resolve related
    /// ids first, then OR membership with the direct field match.
    pub fn with_alternation(mut self, predicates: Vec<Predicate>) -> Self {
        self.alternation = predicates;
        self
    }
}

/// Per-endpoint sorting policy: the allow-list of sortable fields and the
/// default substituted for anything outside it.
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy {
    pub sortable: &'static [&'static str],
    pub default_sort: &'static str,
}

impl FieldPolicy {
    /// Resolve a requested sort field against the allow-list. An unlisted
    /// field is a presentation preference, not a correctness issue, so it is
    /// silently replaced by the default rather than rejected.
    pub fn resolve_sort(&self, requested: &str) -> &'static str {
        match self.sortable.iter().find(|f| **f == requested) {
            Some(field) => field,
            None => {
                tracing::debug!(
                    requested,
                    default = self.default_sort,
                    "sort field not in allow-list, substituting default"
                );
                self.default_sort
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub skip: u64,
    pub limit: u64,
}

impl PageSpec {
    /// `page` is 1-based. The offset saturates instead of overflowing so an
    /// absurd page number yields an empty page, not a panic.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(limit),
            limit,
        }
    }
}

/// Number of pages needed for `total_count` records at `limit` per page.
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    total_count.div_ceil(limit.max(1))
}

/// Build the filter, sort, and pagination descriptors from normalized
/// parameters. Range predicates are emitted only for fields with at least one
/// bound; a field with neither bound contributes nothing at all.
pub fn build_filter(
    params: &NormalizedListParams,
    policy: &FieldPolicy,
) -> (FilterDescriptor, SortSpec, PageSpec) {
    let mut predicates = Vec::new();

    for (field, value) in &params.equals {
        predicates.push(Predicate::Eq {
            field: field.clone(),
            value: FilterValue::Str(value.clone()),
        });
    }

    for (field, range) in &params.date_ranges {
        predicates.push(Predicate::Range {
            field: field.clone(),
            from: range.from.map(FilterValue::Date),
            to: range.to.map(FilterValue::Date),
        });
    }

    for (field, range) in &params.numeric_ranges {
        predicates.push(Predicate::Range {
            field: field.clone(),
            from: range.from.map(FilterValue::Num),
            to: range.to.map(FilterValue::Num),
        });
    }

    let sort = SortSpec {
        field: policy.resolve_sort(&params.sort_field).to_string(),
        order: params.sort_order,
    };
    let page = PageSpec::new(params.page, params.limit);

    (
        FilterDescriptor {
            predicates,
            alternation: Vec::new(),
        },
        sort,
        page,
    )
}
