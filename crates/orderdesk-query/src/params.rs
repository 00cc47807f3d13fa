//! Query-parameter normalization.
//!
//! HTTP query strings are repeatable and untyped; nothing here is trusted
//! as-is. Each endpoint describes the range and exact-match fields it accepts
//! with a [`ListQuerySpec`], and normalization produces one validated
//! [`NormalizedListParams`] or fails with a validation error.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use orderdesk_core::AppError;

use crate::search::{sanitize_search, SearchTerm};

/// Default sort field when the caller supplies none.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

static EXACT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid exact-value regex"));

/// A query parameter value: HTTP allows the same name to repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

/// Raw query input: parameter name to value(s). Built by the HTTP
/// collaborator from the request's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInput(BTreeMap<String, RawValue>);

impl QueryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one name/value pair; a repeated name becomes a sequence.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(name.into()) {
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(RawValue::Single(value));
            }
            std::collections::btree_map::Entry::Occupied(mut e) => match e.get_mut() {
                RawValue::Single(existing) => {
                    let first = std::mem::take(existing);
                    *e.get_mut() = RawValue::Many(vec![first, value]);
                }
                RawValue::Many(values) => values.push(value),
            },
        }
    }

    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let mut input = Self::new();
        for (name, value) in pairs {
            input.append(name, value);
        }
        input
    }

    /// Extract a scalar parameter. A sequence of more than one value where a
    /// scalar is expected is a validation error; an empty sequence counts as
    /// absent.
    pub fn scalar(&self, name: &str) -> Result<Option<&str>, AppError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(RawValue::Single(v)) => Ok(Some(v.as_str())),
            Some(RawValue::Many(values)) => match values.as_slice() {
                [] => Ok(None),
                [v] => Ok(Some(v.as_str())),
                _ => Err(AppError::Validation(format!(
                    "parameter {} must not be an array",
                    name
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::Validation(
                "sortOrder must be \"asc\" or \"desc\"".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

/// Which optional filter parameters a listing endpoint accepts.
///
/// Range entries are `(parameter prefix, storage field)` pairs; bounds are
/// read from `{prefix}From` / `{prefix}To` and keyed by the storage field in
/// the normalized result.
#[derive(Debug, Clone, Copy)]
pub struct ListQuerySpec {
    pub date_range_fields: &'static [(&'static str, &'static str)],
    pub numeric_range_fields: &'static [(&'static str, &'static str)],
    pub exact_fields: &'static [&'static str],
}

/// Typed, bounded list parameters. `limit` is always in `1..=default_limit`;
/// every range present has at least one validated bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListParams {
    pub page: u64,
    pub limit: u64,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub equals: BTreeMap<String, String>,
    pub date_ranges: BTreeMap<String, DateRange>,
    pub numeric_ranges: BTreeMap<String, NumericRange>,
    pub search: Option<SearchTerm>,
}

fn parse_positive_int(value: &str, name: &str) -> Result<u64, AppError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "parameter {} must be a positive integer: {}",
            name, value
        ))),
    }
}

/// Limit is a presentation preference: garbage falls back to the default
/// instead of erroring, unlike `page`. The default is also the ceiling.
fn normalize_limit(raw: Option<&str>, default_limit: u64) -> u64 {
    match raw.and_then(|v| v.parse::<u64>().ok()) {
        Some(n) if n > 0 => n.min(default_limit),
        _ => default_limit,
    }
}

/// Which end of a range a bound belongs to. A `To` bound is inclusive of its
/// whole calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundKind {
    From,
    To,
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is valid")
        .and_utc()
}

fn parse_date_bound(value: &str, name: &str, kind: BoundKind) -> Result<DateTime<Utc>, AppError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(match kind {
            BoundKind::From => date.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
            BoundKind::To => end_of_day(date),
        });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        let dt = dt.with_timezone(&Utc);
        return Ok(match kind {
            BoundKind::From => dt,
            BoundKind::To => end_of_day(dt.date_naive()),
        });
    }
    Err(AppError::Validation(format!(
        "parameter {} must be a valid date: {}",
        name, value
    )))
}

fn parse_non_negative_number(value: &str, name: &str) -> Result<f64, AppError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "parameter {} must be a non-negative number: {}",
            name, value
        ))),
    }
}

/// Normalize raw query input against an endpoint's [`ListQuerySpec`].
///
/// `default_limit` doubles as the limit ceiling: callers can ask for fewer
/// rows per page than the configured default, never more.
pub fn normalize_list_params(
    query: &QueryInput,
    spec: &ListQuerySpec,
    default_limit: u64,
) -> Result<NormalizedListParams, AppError> {
    let page = match query.scalar("page")? {
        Some(v) => parse_positive_int(v, "page")?,
        None => 1,
    };
    let limit = normalize_limit(query.scalar("limit")?, default_limit);

    let sort_field = query
        .scalar("sortField")?
        .unwrap_or(DEFAULT_SORT_FIELD)
        .to_string();
    let sort_order = match query.scalar("sortOrder")? {
        Some(v) => v.parse()?,
        None => SortOrder::Desc,
    };

    let mut equals = BTreeMap::new();
    for name in spec.exact_fields {
        if let Some(value) = query.scalar(name)? {
            if !EXACT_VALUE.is_match(value) {
                return Err(AppError::Validation(format!(
                    "invalid {} parameter: {}",
                    name, value
                )));
            }
            equals.insert((*name).to_string(), value.to_string());
        }
    }

    let mut date_ranges = BTreeMap::new();
    for (param, field) in spec.date_range_fields {
        let from_name = format!("{}From", param);
        let to_name = format!("{}To", param);
        let from = query
            .scalar(&from_name)?
            .map(|v| parse_date_bound(v, &from_name, BoundKind::From))
            .transpose()?;
        let to = query
            .scalar(&to_name)?
            .map(|v| parse_date_bound(v, &to_name, BoundKind::To))
            .transpose()?;
        if from.is_some() || to.is_some() {
            date_ranges.insert((*field).to_string(), DateRange { from, to });
        }
    }

    let mut numeric_ranges = BTreeMap::new();
    for (param, field) in spec.numeric_range_fields {
        let from_name = format!("{}From", param);
        let to_name = format!("{}To", param);
        let from = query
            .scalar(&from_name)?
            .map(|v| parse_non_negative_number(v, &from_name))
            .transpose()?;
        let to = query
            .scalar(&to_name)?
            .map(|v| parse_non_negative_number(v, &to_name))
            .transpose()?;
        if from.is_some() || to.is_some() {
            numeric_ranges.insert((*field).to_string(), NumericRange { from, to });
        }
    }

    let search = match query.scalar("search")? {
        Some(v) => sanitize_search(v)?,
        None => None,
    };

    Ok(NormalizedListParams {
        page,
        limit,
        sort_field,
        sort_order,
        equals,
        date_ranges,
        numeric_ranges,
        search,
    })
}
