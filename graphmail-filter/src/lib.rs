//! Filter expressions for graphmail queries.
//!
//! A [`SearchFilter`] is either a comparison between one property and a
//! literal, or a [`SearchFilterCollection`] joining child filters with
//! `and`/`or`. Compiling a filter yields the `$filter=...` query component
//! handed to the URL builder:
//!
//! ```
//! use graphmail_filter::{FilterOperator, SearchFilter, SearchFilterCollection};
//! use graphmail_model::catalog::message;
//!
//! let filter = SearchFilterCollection::new(
//!     FilterOperator::And,
//!     vec![
//!         SearchFilter::is_equal_to(message::IS_READ, false),
//!         SearchFilter::is_equal_to(message::FROM, "a@b.com"),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     filter.query().unwrap(),
//!     "$filter=IsRead eq false and From/EmailAddress/Address eq 'a@b.com'"
//! );
//! ```

mod error;
mod filter;
mod operator;
mod value;

pub use error::{FilterError, FilterResult};
pub use filter::{SearchFilter, SearchFilterCollection, FILTER_PREFIX};
pub use operator::FilterOperator;
pub use value::FilterValue;
