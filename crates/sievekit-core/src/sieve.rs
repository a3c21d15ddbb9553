//! Codec for the Sieve query-string convention.
//!
//! ```text
//! ?Sorts=    LikeCount,CommentCount,-created     sort by likes, then comments, then newest first
//! &Filters=  LikeCount>10,Title@=awesome title   more than 10 likes and "awesome title" in the title
//! &page=     1                                   first page...
//! &pageSize= 10                                  ...of 10 posts
//! ```
//!
//! Grouped fields and multiple values use the field and value separators:
//! `(Title|Body)@=*rust|cargo`.

use crate::codec::{
    Convention, FilterCodec, append_extra_parameters, join_segments, pagination_segment,
    query_part,
};
use crate::config::SieveConstants;
use crate::error::Result;
use crate::matcher::OperatorMatcher;
use crate::model::{ExtraParameters, Filter, FilterItem, PageNumber, SortDirection, SortItem};
use crate::operators::OperatorTable;

/// Recognised query-string keys after lower-casing.
enum SieveKey {
    Page,
    PageSize,
    Filters,
    Sorts,
}

#[derive(Debug, Clone)]
pub struct SieveCodec {
    constants: SieveConstants,
    operators: OperatorTable,
    matcher: OperatorMatcher,
}

impl Default for SieveCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl SieveCodec {
    /// Codec with the default names, separators and operators.
    pub fn new() -> Self {
        let operators = OperatorTable::default();
        // Default tokens are non-empty and escaped, so the build only fails if the
        // regex engine itself refuses the pattern. Decoding then reports every clause.
        let matcher = OperatorMatcher::build(&operators).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build default operator matcher");
            OperatorMatcher::never_matching()
        });
        Self {
            constants: SieveConstants::default(),
            operators,
            matcher,
        }
    }

    pub fn with_constants(constants: SieveConstants) -> Result<Self> {
        Self::with_config(constants, OperatorTable::default())
    }

    pub fn with_operators(operators: OperatorTable) -> Result<Self> {
        Self::with_config(SieveConstants::default(), operators)
    }

    pub fn with_config(constants: SieveConstants, operators: OperatorTable) -> Result<Self> {
        constants.validate()?;
        let matcher = OperatorMatcher::build(&operators)?;
        Ok(Self {
            constants,
            operators,
            matcher,
        })
    }

    pub fn constants(&self) -> &SieveConstants {
        &self.constants
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn matcher(&self) -> &OperatorMatcher {
        &self.matcher
    }

    fn key_of(&self, raw: &str) -> Option<SieveKey> {
        let key = raw.to_lowercase();
        let c = &self.constants;
        if key == c.page.to_lowercase() {
            Some(SieveKey::Page)
        } else if key == c.page_size.to_lowercase() {
            Some(SieveKey::PageSize)
        } else if key == c.filters.to_lowercase() {
            Some(SieveKey::Filters)
        } else if key == c.sorts.to_lowercase() {
            Some(SieveKey::Sorts)
        } else {
            None
        }
    }

    /// `Filters=<clause>,<clause>` for every ready item, or an empty string.
    fn filters_segment(&self, items: &[FilterItem]) -> String {
        let clauses: Vec<String> = items
            .iter()
            .filter(|item| {
                let ready = item.is_ready();
                if !ready {
                    tracing::trace!(fields = ?item.fields, "Skipping filter item without values");
                }
                ready
            })
            .map(|item| self.encode_clause(item))
            .collect();

        if clauses.is_empty() {
            return String::new();
        }
        format!(
            "{}={}",
            self.constants.filters,
            clauses.join(&self.constants.clause_separator)
        )
    }

    fn encode_clause(&self, item: &FilterItem) -> String {
        let fields = if item.fields.len() > 1 {
            format!("({})", item.fields.join(&self.constants.field_separator))
        } else {
            item.fields.concat()
        };
        let values = item
            .present_values()
            .collect::<Vec<_>>()
            .join(&self.constants.value_separator);
        format!("{fields}{}{values}", item.operator)
    }

    /// `Sorts=field,-field`, or an empty string.
    fn sorts_segment(&self, items: &[SortItem]) -> String {
        if items.is_empty() {
            return String::new();
        }
        let sorts = items
            .iter()
            .map(|sort| match sort.direction {
                SortDirection::Descending => format!("-{}", sort.field),
                SortDirection::Ascending => sort.field.clone(),
            })
            .collect::<Vec<_>>()
            .join(&self.constants.clause_separator);
        format!("{}={sorts}", self.constants.sorts)
    }

    fn parse_filters(&self, raw: &str) -> Result<Vec<FilterItem>> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(self.constants.clause_separator.as_str())
            .map(|clause| self.parse_clause(clause))
            .collect()
    }

    fn parse_clause(&self, clause: &str) -> Result<FilterItem> {
        let parts = self.matcher.split(clause)?;
        let fields = parts.fields.replace(['(', ')'], "");
        Ok(FilterItem {
            fields: fields
                .split(self.constants.field_separator.as_str())
                .map(str::to_string)
                .collect(),
            values: parts
                .values
                .split(self.constants.value_separator.as_str())
                .map(|v| Some(v.to_string()))
                .collect(),
            operator: parts.operator.to_string(),
        })
    }

    fn parse_sorts(&self, raw: &str) -> Vec<SortItem> {
        if raw.is_empty() {
            return Vec::new();
        }
        raw.split(self.constants.clause_separator.as_str())
            .map(|sort| match sort.strip_prefix('-') {
                Some(field) => SortItem::descending(field),
                None => SortItem::ascending(sort),
            })
            .collect()
    }
}

impl FilterCodec for SieveCodec {
    fn convention(&self) -> Convention {
        Convention::Sieve
    }

    fn page_and_page_size_segment(
        &self,
        page_index: Option<&PageNumber>,
        page_size: Option<&PageNumber>,
    ) -> String {
        pagination_segment(
            &self.constants.page,
            &self.constants.page_size,
            page_index,
            page_size,
        )
    }

    fn encode(&self, filter: &Filter, extra: Option<&ExtraParameters>) -> String {
        let encoded = join_segments([
            self.page_and_page_size_segment(filter.page_index.as_ref(), filter.page_size.as_ref()),
            self.filters_segment(filter.filter_items()),
            self.sorts_segment(filter.sort_items()),
        ]);
        append_extra_parameters(encoded, extra)
    }

    fn decode(&self, input: &str) -> Result<Filter> {
        let mut filter = Filter::empty();

        for pair in query_part(input).split('&') {
            let (raw_key, value) = match pair.split_once('=') {
                // `key=` carries nothing; the key stays unset like any unknown parameter.
                Some((raw_key, "")) => {
                    tracing::trace!(key = raw_key, "Ignoring query parameter without value");
                    continue;
                }
                Some(split) => split,
                None => (pair, ""),
            };
            let Some(key) = self.key_of(raw_key) else {
                if !raw_key.is_empty() {
                    tracing::trace!(key = raw_key, "Ignoring unrecognised query parameter");
                }
                continue;
            };

            match key {
                SieveKey::Page => filter.page_index = Some(PageNumber::parse(value).offset(-1)),
                SieveKey::PageSize => filter.page_size = Some(PageNumber::parse(value)),
                SieveKey::Filters => filter.filters = Some(self.parse_filters(value)?),
                SieveKey::Sorts => filter.sorts = Some(self.parse_sorts(value)),
            }
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use crate::model::ParamValue;
    use crate::operators::Operator;

    fn codec() -> SieveCodec {
        SieveCodec::new()
    }

    fn single_field_single_value() -> FilterItem {
        FilterItem::new(["firstField"], ["firstValue"], Operator::Equals)
    }

    fn multiple_fields_single_value() -> FilterItem {
        FilterItem::new(
            ["combinedField", "combinedField2"],
            ["combinedFieldValue"],
            Operator::CaseInsensitiveContains,
        )
    }

    fn single_field_multiple_values() -> FilterItem {
        FilterItem::new(
            ["combinedValue"],
            ["combinedValue1", "combinedValue2"],
            Operator::Contains,
        )
    }

    fn multiple_fields_multiple_values() -> FilterItem {
        FilterItem::new(
            ["everythingCombined1", "everythingCombined2"],
            ["everythingCombinedValue1", "everythingCombinedValue2"],
            Operator::DoesNotStartWith,
        )
    }

    #[test]
    fn encodes_combined_fields() {
        let filter = Filter::empty().with_filter(multiple_fields_single_value());
        assert_eq!(
            codec().encode(&filter, None),
            "Filters=(combinedField|combinedField2)@=*combinedFieldValue"
        );
    }

    #[test]
    fn encodes_multiple_values() {
        let filter = Filter::empty().with_filter(single_field_multiple_values());
        assert_eq!(
            codec().encode(&filter, None),
            "Filters=combinedValue@=combinedValue1|combinedValue2"
        );
    }

    #[test]
    fn encodes_sorts() {
        let filter = Filter::empty().with_sort(SortItem::ascending("test"));
        assert_eq!(codec().encode(&filter, None), "Sorts=test");
    }

    #[test]
    fn encodes_filter_with_all_options() {
        let filter = Filter::new()
            .with_filters([
                single_field_single_value(),
                multiple_fields_single_value(),
                single_field_multiple_values(),
                multiple_fields_multiple_values(),
            ])
            .with_sorts([SortItem::ascending("test"), SortItem::descending("sortField1")]);

        assert_eq!(
            codec().encode(&filter, None),
            "page=1&pageSize=20&Filters=firstField==firstValue,\
             (combinedField|combinedField2)@=*combinedFieldValue,\
             combinedValue@=combinedValue1|combinedValue2,\
             (everythingCombined1|everythingCombined2)!_=everythingCombinedValue1|everythingCombinedValue2\
             &Sorts=test,-sortField1"
        );
    }

    #[test]
    fn skips_items_with_missing_values() {
        let filter = Filter::empty()
            .with_filter(FilterItem::with_optional_values(["a"], vec![None], "=="))
            .with_filter(FilterItem::new(["b"], [""], "=="))
            .with_filter(FilterItem::new(["c"], ["1"], "=="));
        assert_eq!(codec().encode(&filter, None), "Filters=c==1");

        let only_missing =
            Filter::empty().with_filter(FilterItem::with_optional_values(["a"], vec![None], "=="));
        assert_eq!(codec().encode(&only_missing, None), "");
    }

    #[test]
    fn item_without_values_is_not_encoded() {
        let filter = Filter::empty().with_filter(FilterItem::new(["f"], Vec::<String>::new(), "=="));
        assert_eq!(codec().encode(&filter, None), "");
    }

    #[test]
    fn page_and_page_size_segment() {
        let codec = codec();
        assert_eq!(
            codec.page_and_page_size_segment(
                Some(&PageNumber::Number(2)),
                Some(&PageNumber::Number(20))
            ),
            "page=3&pageSize=20"
        );
        assert_eq!(codec.page_and_page_size_segment(None, None), "");
    }

    #[test]
    fn uses_configured_names_and_separators() {
        let constants = SieveConstants {
            page: "p".into(),
            page_size: "size".into(),
            filters: "filters".into(),
            sorts: "sorts".into(),
            clause_separator: ";".into(),
            field_separator: "/".into(),
            value_separator: "~".into(),
        };
        let codec = SieveCodec::with_constants(constants).unwrap();
        let filter = Filter::new()
            .with_filter(FilterItem::new(["a", "b"], ["1", "2"], "=="))
            .with_filter(FilterItem::new(["c"], ["3"], ">"))
            .with_sorts([SortItem::descending("a"), SortItem::ascending("c")]);

        let encoded = codec.encode(&filter, None);
        assert_eq!(encoded, "p=1&size=20&filters=(a/b)==1~2;c>3&sorts=-a;c");
        assert_eq!(codec.decode(&encoded).unwrap(), filter);
    }

    #[test]
    fn appends_extra_parameters() {
        let mut extra = ExtraParameters::new();
        extra.insert("firstKey".into(), Some(ParamValue::from("firstValue")));
        extra.insert("emptyParam".into(), None);
        extra.insert("secondKey".into(), Some(ParamValue::from("secondValue")));

        let filter = Filter::new().with_sort(SortItem::ascending("test"));
        let encoded = codec().encode(&filter, Some(&extra));
        assert_eq!(
            encoded,
            "page=1&pageSize=20&Sorts=test&firstKey=firstValue&secondKey=secondValue"
        );

        let encoded = codec().encode(&Filter::empty(), Some(&extra));
        assert_eq!(encoded, "firstKey=firstValue&secondKey=secondValue");
    }

    #[test]
    fn decodes_page_info_case_insensitively() {
        let filter = codec().decode("?Page=1&PageSiZe=20").unwrap();
        assert_eq!(filter.page_index, Some(PageNumber::Number(0)));
        assert_eq!(filter.page_size, Some(PageNumber::Number(20)));
        assert!(filter.filters.is_none());
        assert!(filter.sorts.is_none());
    }

    #[test]
    fn decodes_sorts() {
        let filter = codec().decode("&Sorts=test,-sortField1").unwrap();
        assert_eq!(
            filter.sorts,
            Some(vec![SortItem::ascending("test"), SortItem::descending("sortField1")])
        );
    }

    #[test]
    fn decodes_single_filter() {
        let filter = codec().decode("?Filters=combinedValue@=*combinedValue1").unwrap();
        assert_eq!(
            filter.filters,
            Some(vec![FilterItem::new(
                ["combinedValue"],
                ["combinedValue1"],
                Operator::CaseInsensitiveContains
            )])
        );
    }

    #[test]
    fn decodes_multiple_keys_and_values() {
        let filter = codec()
            .decode("?Filters=(key1|key2|key3)@=*value1|value2")
            .unwrap();
        assert_eq!(
            filter.filters,
            Some(vec![FilterItem::new(
                ["key1", "key2", "key3"],
                ["value1", "value2"],
                "@=*"
            )])
        );
    }

    #[test]
    fn decodes_everything_from_full_url() {
        let filter = codec()
            .decode(
                "https://api.example.com/posts?Page=1&PageSiZe=20&Sorts=test,-sortField1&Filters=(key1|key2|key3)@=*value1|value2",
            )
            .unwrap();
        assert_eq!(filter.page_index, Some(PageNumber::Number(0)));
        assert_eq!(filter.page_size, Some(PageNumber::Number(20)));
        assert_eq!(
            filter.sorts,
            Some(vec![SortItem::ascending("test"), SortItem::descending("sortField1")])
        );
        assert_eq!(filter.filter_items().len(), 1);
        assert_eq!(filter.filter_items()[0].fields, ["key1", "key2", "key3"]);
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let filter = codec().decode("Filters=expr==a=b").unwrap();
        let item = &filter.filter_items()[0];
        assert_eq!(item.fields, ["expr"]);
        assert_eq!(item.operator, "==");
        assert_eq!(item.values, [Some("a=b".to_string())]);
    }

    #[test]
    fn unknown_operator_is_a_clause_parse_error() {
        let err = codec().decode("Filters=title~=rust").unwrap_err();
        assert!(matches!(err, CodecError::ClauseParse { .. }));
    }

    #[test]
    fn one_bad_clause_aborts_decoding() {
        let err = codec()
            .decode("page=2&Filters=a==1,broken&Sorts=a")
            .unwrap_err();
        match err {
            CodecError::ClauseParse { clause, matches } => {
                assert_eq!(clause, "broken");
                assert_eq!(matches, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_operator_table_is_used_for_decoding() {
        let operators = OperatorTable::default().with_operator("REGEX", "~=");
        let codec = SieveCodec::with_operators(operators).unwrap();
        let filter = codec.decode("Filters=title~=ru.t").unwrap();
        assert_eq!(filter.filter_items()[0].operator, "~=");

        let empty = SieveCodec::with_operators(OperatorTable::empty()).unwrap();
        assert!(matches!(
            empty.decode("Filters=a==b"),
            Err(CodecError::ClauseParse { .. })
        ));
        assert!(empty.decode("page=2").is_ok());
    }

    #[test]
    fn malformed_numbers_become_not_a_number() {
        let filter = codec().decode("page=abc&pageSize").unwrap();
        assert!(filter.page_index.as_ref().is_some_and(PageNumber::is_nan));
        assert!(filter.page_size.as_ref().is_some_and(PageNumber::is_nan));
        assert_eq!(codec().encode(&filter, None), "");
    }

    #[test]
    fn unknown_and_empty_parameters_are_ignored() {
        let filter = codec().decode("?foo=bar&&baz&Sorts").unwrap();
        assert_eq!(filter.sorts, Some(vec![]));
        assert!(filter.filters.is_none());
        assert!(filter.page_index.is_none());
    }

    #[test]
    fn default_codec_has_a_working_matcher() {
        let codec = SieveCodec::new();
        assert!(codec.matcher().pattern().is_some());
        assert_eq!(codec.matcher().tokens().len(), Operator::ALL.len());
        assert_eq!(codec.operators(), &OperatorTable::default());
    }

    #[test]
    fn keys_with_empty_values_stay_unset() {
        let filter = codec().decode("?page=&pageSize=&Filters=&Sorts=").unwrap();
        assert_eq!(filter, Filter::empty());

        let filter = codec().decode("page=&page=3&Sorts=-a&Sorts=").unwrap();
        assert_eq!(filter.page_index, Some(PageNumber::Number(2)));
        assert_eq!(filter.sorts, Some(vec![SortItem::descending("a")]));
    }

    #[test]
    fn last_occurrence_of_a_key_wins() {
        let filter = codec().decode("page=2&page=5").unwrap();
        assert_eq!(filter.page_index, Some(PageNumber::Number(4)));
    }

    #[test]
    fn empty_input_decodes_to_empty_filter() {
        assert_eq!(codec().decode("").unwrap(), Filter::empty());
        assert_eq!(codec().decode("/posts?").unwrap(), Filter::empty());
    }
}
