//! Message search options as a filter expression.

use chrono::{NaiveDate, NaiveTime};
use graphmail_filter::{FilterResult, SearchFilter, SearchFilterCollection};
use graphmail_model::catalog::message;

/// Conditions for listing messages. All set conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageQuery {
    pub unread_only: bool,
    /// Sender address (contains `@`) or display name.
    pub from: Option<String>,
    /// Earliest received date, from midnight UTC.
    pub since: Option<NaiveDate>,
}

impl MessageQuery {
    #[must_use]
    pub fn filters(&self) -> Vec<SearchFilter> {
        let mut filters = Vec::new();
        if self.unread_only {
            filters.push(SearchFilter::is_equal_to(message::IS_READ, false));
        }
        if let Some(from) = &self.from {
            filters.push(SearchFilter::is_equal_to(message::FROM, from.as_str()));
        }
        if let Some(since) = self.since {
            filters.push(SearchFilter::is_greater_than_or_equal_to(
                message::RECEIVED_DATE_TIME,
                since.and_time(NaiveTime::MIN),
            ));
        }
        filters
    }

    /// `None` when no condition is set; a single comparison stays bare.
    pub fn to_filter(&self) -> FilterResult<Option<SearchFilter>> {
        let mut filters = self.filters();
        match filters.len() {
            0 | 1 => Ok(filters.pop()),
            _ => Ok(Some(SearchFilterCollection::and(filters)?.into())),
        }
    }
}
