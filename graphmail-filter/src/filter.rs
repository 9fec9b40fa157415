use crate::error::{FilterError, FilterResult};
use crate::operator::FilterOperator;
use crate::value::{FilterValue, quote};
use graphmail_model::PropertyDefinition;

/// Prefix of every compiled query.
pub const FILTER_PREFIX: &str = "$filter=";

/// A filter expression.
///
/// Comparison variants pair one property with one literal; `Collection`
/// combines child filters with `and`/`or`.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    IsEqualTo {
        property: PropertyDefinition,
        value: FilterValue,
    },
    NotEqualTo {
        property: PropertyDefinition,
        value: FilterValue,
    },
    IsGreaterThan {
        property: PropertyDefinition,
        value: FilterValue,
    },
    IsGreaterThanOrEqualTo {
        property: PropertyDefinition,
        value: FilterValue,
    },
    IsLessThan {
        property: PropertyDefinition,
        value: FilterValue,
    },
    IsLessThanOrEqualTo {
        property: PropertyDefinition,
        value: FilterValue,
    },
    Collection(SearchFilterCollection),
}

impl SearchFilter {
    pub fn is_equal_to(property: PropertyDefinition, value: impl Into<FilterValue>) -> Self {
        Self::IsEqualTo {
            property,
            value: value.into(),
        }
    }

    pub fn not_equal_to(property: PropertyDefinition, value: impl Into<FilterValue>) -> Self {
        Self::NotEqualTo {
            property,
            value: value.into(),
        }
    }

    pub fn is_greater_than(property: PropertyDefinition, value: impl Into<FilterValue>) -> Self {
        Self::IsGreaterThan {
            property,
            value: value.into(),
        }
    }

    pub fn is_greater_than_or_equal_to(
        property: PropertyDefinition,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self::IsGreaterThanOrEqualTo {
            property,
            value: value.into(),
        }
    }

    pub fn is_less_than(property: PropertyDefinition, value: impl Into<FilterValue>) -> Self {
        Self::IsLessThan {
            property,
            value: value.into(),
        }
    }

    pub fn is_less_than_or_equal_to(
        property: PropertyDefinition,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self::IsLessThanOrEqualTo {
            property,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn operator(&self) -> FilterOperator {
        match self {
            Self::IsEqualTo { .. } => FilterOperator::Eq,
            Self::NotEqualTo { .. } => FilterOperator::Ne,
            Self::IsGreaterThan { .. } => FilterOperator::Gt,
            Self::IsGreaterThanOrEqualTo { .. } => FilterOperator::Ge,
            Self::IsLessThan { .. } => FilterOperator::Lt,
            Self::IsLessThanOrEqualTo { .. } => FilterOperator::Le,
            Self::Collection(collection) => collection.operator(),
        }
    }

    /// Compiled expression without the `$filter=` prefix.
    pub fn fragment(&self) -> FilterResult<String> {
        match self {
            Self::IsEqualTo { property, value }
            | Self::NotEqualTo { property, value }
            | Self::IsGreaterThan { property, value }
            | Self::IsGreaterThanOrEqualTo { property, value }
            | Self::IsLessThan { property, value }
            | Self::IsLessThanOrEqualTo { property, value } => {
                compile_comparison(self.operator(), property, value)
            }
            Self::Collection(collection) => collection.fragment(),
        }
    }

    /// Full `$filter=...` query component.
    pub fn query(&self) -> FilterResult<String> {
        Ok(format!("{FILTER_PREFIX}{}", self.fragment()?))
    }
}

fn compile_comparison(
    operator: FilterOperator,
    property: &PropertyDefinition,
    value: &FilterValue,
) -> FilterResult<String> {
    let kind = property.value_kind();
    if kind.is_collection() {
        return Err(FilterError::InvalidArgument(format!(
            "cannot filter on collection-valued property {property}"
        )));
    }
    if property.is_relational() && operator == FilterOperator::Eq {
        let text = value.to_string();
        let leaf = if text.contains('@') { "Address" } else { "Name" };
        return Ok(format!(
            "{property}/EmailAddress/{leaf} {operator} {}",
            quote(&text)
        ));
    }
    Ok(format!("{property} {operator} {}", value.format_for(kind)))
}

impl From<SearchFilterCollection> for SearchFilter {
    fn from(collection: SearchFilterCollection) -> Self {
        Self::Collection(collection)
    }
}

/// Child filters joined by `and` or `or`.
///
/// Children are fixed at construction, so the tree has no sharing and no
/// cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilterCollection {
    operator: FilterOperator,
    children: Vec<SearchFilter>,
}

impl SearchFilterCollection {
    /// Fewest children a collection accepts.
    pub const MIN_CHILDREN: usize = 2;

    /// Combines `children` with `operator`, which must be `And` or `Or`.
    pub fn new(operator: FilterOperator, children: Vec<SearchFilter>) -> FilterResult<Self> {
        if !operator.is_boolean() {
            return Err(FilterError::InvalidArgument(format!(
                "filter collections combine with and/or, not {operator}"
            )));
        }
        if children.len() < Self::MIN_CHILDREN {
            return Err(FilterError::InvalidArgument(format!(
                "{operator} needs at least {} filters, got {}",
                Self::MIN_CHILDREN,
                children.len()
            )));
        }
        Ok(Self { operator, children })
    }

    pub fn and(children: Vec<SearchFilter>) -> FilterResult<Self> {
        Self::new(FilterOperator::And, children)
    }

    pub fn or(children: Vec<SearchFilter>) -> FilterResult<Self> {
        Self::new(FilterOperator::Or, children)
    }

    #[must_use]
    pub const fn operator(&self) -> FilterOperator {
        self.operator
    }

    #[must_use]
    pub fn children(&self) -> &[SearchFilter] {
        &self.children
    }

    /// Joined child fragments. Nested collections are parenthesised.
    pub fn fragment(&self) -> FilterResult<String> {
        let parts = self
            .children
            .iter()
            .map(|child| match child {
                SearchFilter::Collection(nested) => Ok(format!("({})", nested.fragment()?)),
                leaf => leaf.fragment(),
            })
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(parts.join(&format!(" {} ", self.operator)))
    }

    /// Full `$filter=...` query component.
    pub fn query(&self) -> FilterResult<String> {
        Ok(format!("{FILTER_PREFIX}{}", self.fragment()?))
    }
}
