//! Plain `field=value` query-string convention.
//!
//! Every field/value combination becomes its own segment and operators are
//! ignored. Sorts are sent as `field=+` (ascending) or `field=-` (descending).
//! There is no way back from such a query to a [`Filter`], so decoding fails.

use crate::codec::{
    Convention, FilterCodec, append_extra_parameters, join_segments, pagination_segment,
    url_segment,
};
use crate::error::{CodecError, Result};
use crate::model::{
    ExtraParameters, Filter, FilterItem, PageNumber, ParamValue, SortDirection, SortItem,
};

const PAGE: &str = "page";
const PAGE_SIZE: &str = "pageSize";

#[derive(Debug, Clone, Copy, Default)]
pub struct HttpParamCodec;

impl HttpParamCodec {
    pub fn new() -> Self {
        Self
    }

    fn filter_segments<'a>(items: &'a [FilterItem]) -> impl Iterator<Item = String> + 'a {
        items
            .iter()
            .filter(|item| item.is_ready())
            .flat_map(|item| {
                item.fields.iter().flat_map(move |field| {
                    item.present_values()
                        .map(move |value| url_segment(field, Some(&ParamValue::from(value))))
                })
            })
    }

    fn sort_segments<'a>(items: &'a [SortItem]) -> impl Iterator<Item = String> + 'a {
        items.iter().map(|sort| {
            let direction = match sort.direction {
                SortDirection::Ascending => "+",
                SortDirection::Descending => "-",
            };
            url_segment(&sort.field, Some(&ParamValue::from(direction)))
        })
    }
}

impl FilterCodec for HttpParamCodec {
    fn convention(&self) -> Convention {
        Convention::HttpParam
    }

    fn page_and_page_size_segment(
        &self,
        page_index: Option<&PageNumber>,
        page_size: Option<&PageNumber>,
    ) -> String {
        pagination_segment(PAGE, PAGE_SIZE, page_index, page_size)
    }

    fn encode(&self, filter: &Filter, extra: Option<&ExtraParameters>) -> String {
        let pagination =
            self.page_and_page_size_segment(filter.page_index.as_ref(), filter.page_size.as_ref());
        let encoded = join_segments(
            std::iter::once(pagination)
                .chain(Self::filter_segments(filter.filter_items()))
                .chain(Self::sort_segments(filter.sort_items())),
        );
        append_extra_parameters(encoded, extra)
    }

    fn decode(&self, _input: &str) -> Result<Filter> {
        Err(CodecError::unsupported(self.convention(), "decode"))
    }
}
