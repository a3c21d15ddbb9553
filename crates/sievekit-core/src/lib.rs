//! Query-string codec for paged, filtered and sorted data requests.
//!
//! Two conventions are supported:
//!
//! - **Sieve**: `page=1&pageSize=20&Filters=Title@=*awesome,(Likes|Comments)>10&Sorts=-created`,
//!   bidirectional ([`SieveCodec`]).
//! - **HTTP params**: one `field=value` segment per field and value, encode only
//!   ([`HttpParamCodec`]).
//!
//! # Example
//!
//! ```
//! use sievekit_core::{Filter, FilterCodec, FilterItem, Operator, SieveCodec, SortItem};
//!
//! let filter = Filter::new()
//!     .with_filter(FilterItem::new(["title"], ["rust"], Operator::CaseInsensitiveContains))
//!     .with_sort(SortItem::descending("created"));
//!
//! let codec = SieveCodec::new();
//! let query = codec.encode(&filter, None);
//! assert_eq!(query, "page=1&pageSize=20&Filters=title@=*rust&Sorts=-created");
//!
//! let decoded = codec.decode(&format!("/posts?{query}")).unwrap();
//! assert_eq!(decoded.filters, filter.filters);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod http_param;
pub mod matcher;
pub mod model;
pub mod operators;
pub mod sieve;

pub use codec::{
    Convention, FilterCodec, extra_parameters_segment, pagination_segment,
    update_filter_with_partial, url_segment,
};
pub use config::{CodecConfig, SieveConstants};
pub use error::{CodecError, ErrorCategory, Result};
pub use http_param::HttpParamCodec;
pub use matcher::{ClauseParts, OperatorMatcher, escape_token};
pub use model::{
    ExtraParameters, Filter, FilterItem, PageNumber, ParamValue, SortDirection, SortItem,
};
pub use operators::{Operator, OperatorTable};
pub use sieve::SieveCodec;
