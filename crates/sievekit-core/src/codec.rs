//! The codec capability shared by every query-string convention, plus the
//! helpers the conventions build on.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::model::{ExtraParameters, Filter, FilterItem, PageNumber, ParamValue};

/// Query-string conventions known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    Sieve,
    HttpParam,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sieve => f.write_str("sieve"),
            Self::HttpParam => f.write_str("http-param"),
        }
    }
}

/// Encodes a [`Filter`] into a query string and, where the convention allows, back.
pub trait FilterCodec: Send + Sync {
    fn convention(&self) -> Convention;

    /// The `page=..&pageSize=..` part, with the 0-based index turned into a 1-based page.
    fn page_and_page_size_segment(
        &self,
        page_index: Option<&PageNumber>,
        page_size: Option<&PageNumber>,
    ) -> String;

    /// Build the query string (without leading `?`) for `filter`.
    fn encode(&self, filter: &Filter, extra: Option<&ExtraParameters>) -> String;

    /// Rebuild a filter from a URL or its query part.
    fn decode(&self, input: &str) -> Result<Filter>;
}

/// `name=value`, or an empty string when there is no value worth sending.
pub fn url_segment(name: &str, value: Option<&ParamValue>) -> String {
    match value {
        Some(value) if value.is_renderable() => format!("{name}={value}"),
        _ => String::new(),
    }
}

/// Pagination segment using the given parameter names.
pub fn pagination_segment(
    page_name: &str,
    page_size_name: &str,
    page_index: Option<&PageNumber>,
    page_size: Option<&PageNumber>,
) -> String {
    let page = page_index
        .and_then(|index| index.offset(1).value())
        .map(ParamValue::Integer);
    let size = page_size.and_then(PageNumber::value).map(ParamValue::Integer);

    join_segments([
        url_segment(page_name, page.as_ref()),
        url_segment(page_size_name, size.as_ref()),
    ])
}

/// `&key=value` for every entry with a value, in insertion order.
pub fn extra_parameters_segment(extra: &ExtraParameters) -> String {
    extra
        .iter()
        .map(|(key, value)| url_segment(key, value.as_ref()))
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut out, segment| {
            out.push('&');
            out.push_str(&segment);
            out
        })
}

/// Copy of `original` where each partial item replaces the item with the same
/// field sequence and moves to the end; items without a counterpart are appended.
pub fn update_filter_with_partial(partial: &[FilterItem], original: &Filter) -> Filter {
    let mut updated = original.clone();
    let items = updated.filters.get_or_insert_with(Vec::new);

    for item in partial {
        if let Some(index) = items.iter().position(|f| f.fields == item.fields) {
            items.remove(index);
        }
        items.push(item.clone());
    }

    updated
}

/// Append the extra parameters to an encoded query, without a leading `&` when
/// nothing precedes them.
pub(crate) fn append_extra_parameters(mut encoded: String, extra: Option<&ExtraParameters>) -> String {
    let Some(extra) = extra else {
        return encoded;
    };
    let segment = extra_parameters_segment(extra);
    if encoded.is_empty() {
        encoded.push_str(segment.strip_prefix('&').unwrap_or(segment.as_str()));
    } else {
        encoded.push_str(&segment);
    }
    encoded
}

/// Join non-empty segments with `&`.
pub(crate) fn join_segments(segments: impl IntoIterator<Item = String>) -> String {
    segments
        .into_iter()
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

/// The query part of `input`: the text after the first `?`, or all of it.
pub(crate) fn query_part(input: &str) -> &str {
    input.split_once('?').map_or(input, |(_, query)| query)
}
