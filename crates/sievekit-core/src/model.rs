//! Value types describing a paged, filtered and sorted data request.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Page index used by [`Filter::new`]
pub const DEFAULT_PAGE_INDEX: i64 = 0;

/// Page size used by [`Filter::new`]
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// A page index or page size.
///
/// Decoding never rejects malformed numbers; they are kept as
/// [`PageNumber::NotANumber`] with the raw input so callers can check for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNumber {
    Number(i64),
    NotANumber(String),
}

impl PageNumber {
    /// Parse a query-string value, falling back to the not-a-number sentinel.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::NotANumber(raw.to_string()),
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::NotANumber(_) => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Self::NotANumber(_))
    }

    /// Shift the number by `delta`. Overflow and not-a-number both yield the sentinel.
    #[must_use]
    pub fn offset(&self, delta: i64) -> Self {
        match self {
            Self::Number(n) => n
                .checked_add(delta)
                .map(Self::Number)
                .unwrap_or_else(|| Self::NotANumber(n.to_string())),
            Self::NotANumber(raw) => Self::NotANumber(raw.clone()),
        }
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::NotANumber(_) => f.write_str("NaN"),
        }
    }
}

impl From<i64> for PageNumber {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PageNumber {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u32> for PageNumber {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// A single filter clause: one or more fields, an operator token and one or more values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterItem {
    /// Fields to filter on. More than one field forms an OR-group.
    pub fields: Vec<String>,
    /// Values to compare against. `None` marks a value that is not filled in yet.
    #[serde(default)]
    pub values: Vec<Option<String>>,
    /// Literal operator token, e.g. `==` or `@=*`
    pub operator: String,
}

impl FilterItem {
    pub fn new<F, V>(fields: F, values: V, operator: impl Into<String>) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(|v| Some(v.into())).collect(),
            operator: operator.into(),
        }
    }

    /// Build an item whose values may still be missing.
    pub fn with_optional_values<F>(
        fields: F,
        values: Vec<Option<String>>,
        operator: impl Into<String>,
    ) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            values,
            operator: operator.into(),
        }
    }

    /// An item is ready when it names at least one field and every value is present and non-empty.
    ///
    /// An item with no values at all is not ready either, so `f==` is never produced.
    pub fn is_ready(&self) -> bool {
        !self.fields.is_empty()
            && !self.values.is_empty()
            && self
                .values
                .iter()
                .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    pub fn present_values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().flatten().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[default]
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortItem {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortItem {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }
}

/// A paged, filtered and sorted request.
///
/// Every part is optional so a decoded filter can tell "absent from the query"
/// apart from "present but empty". [`Filter::new`] fills in the usual defaults,
/// [`Filter::empty`] leaves everything unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Index (0-based) of the requested page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<PageNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<PageNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<SortItem>>,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter {
    /// Filter for the first page of 20 items, without clauses.
    pub fn new() -> Self {
        Self {
            page_index: Some(PageNumber::Number(DEFAULT_PAGE_INDEX)),
            page_size: Some(PageNumber::Number(DEFAULT_PAGE_SIZE)),
            filters: Some(Vec::new()),
            sorts: Some(Vec::new()),
        }
    }

    /// Filter with nothing set.
    pub fn empty() -> Self {
        Self {
            page_index: None,
            page_size: None,
            filters: None,
            sorts: None,
        }
    }

    #[must_use]
    pub fn with_page_index(mut self, page_index: impl Into<PageNumber>) -> Self {
        self.page_index = Some(page_index.into());
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: impl Into<PageNumber>) -> Self {
        self.page_size = Some(page_size.into());
        self
    }

    #[must_use]
    pub fn without_pagination(mut self) -> Self {
        self.page_index = None;
        self.page_size = None;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, item: FilterItem) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(item);
        self
    }

    #[must_use]
    pub fn with_filters(mut self, items: impl IntoIterator<Item = FilterItem>) -> Self {
        self.filters.get_or_insert_with(Vec::new).extend(items);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, item: SortItem) -> Self {
        self.sorts.get_or_insert_with(Vec::new).push(item);
        self
    }

    #[must_use]
    pub fn with_sorts(mut self, items: impl IntoIterator<Item = SortItem>) -> Self {
        self.sorts.get_or_insert_with(Vec::new).extend(items);
        self
    }

    pub fn filter_items(&self) -> &[FilterItem] {
        self.filters.as_deref().unwrap_or(&[])
    }

    pub fn sort_items(&self) -> &[SortItem] {
        self.sorts.as_deref().unwrap_or(&[])
    }
}

/// A scalar appended to the query string outside of the filter itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Empty text and NaN render nothing. Zero is a valid value.
    pub fn is_renderable(&self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Float(f) => !f.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Extra key/value pairs, appended in insertion order. `None` entries are dropped.
pub type ExtraParameters = IndexMap<String, Option<ParamValue>>;
