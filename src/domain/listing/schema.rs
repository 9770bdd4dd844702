//! Per-entity listing schema: sortable columns, filter fields and the
//! declarative [`Entity`] adapter that binds them to an endpoint.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::support::{ListingError, ListingResult};

/// Sort direction requested from the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Value type accepted by a filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Bool,
    Int,
    Text,
    Date,
}

impl FilterKind {
    /// Parse a raw string (CLI argument, query-string value) for `filter`.
    pub fn parse(self, filter: &'static str, raw: &str) -> ListingResult<FilterValue> {
        let raw = raw.trim();
        let invalid = || ListingError::InvalidFilterValue {
            filter,
            expected: self,
            value: raw.to_string(),
        };

        match self {
            Self::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "si" | "sí" => Ok(FilterValue::Bool(true)),
                "false" | "0" | "no" => Ok(FilterValue::Bool(false)),
                _ => Err(invalid()),
            },
            Self::Int => raw.parse().map(FilterValue::Int).map_err(|_| invalid()),
            Self::Text => Ok(FilterValue::Text(raw.to_string())),
            Self::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(FilterValue::Date)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Text => "text",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// A filter constraint value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Date(NaiveDate),
}

impl FilterValue {
    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Bool(_) => FilterKind::Bool,
            Self::Int(_) => FilterKind::Int,
            Self::Text(_) => FilterKind::Text,
            Self::Date(_) => FilterKind::Date,
        }
    }

    /// Empty or whitespace-only text, which the server must never receive.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.trim().is_empty())
    }

    /// Query-string rendering; `None` when the value must be omitted.
    pub fn to_param(&self) -> Option<String> {
        match self {
            Self::Bool(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// Closed set of server-side sortable columns of one entity.
pub trait SortColumn:
    fmt::Debug + fmt::Display + FromStr<Err = ListingError> + Copy + Eq + Hash + Ord + Send + Sync + 'static
{
    const ALL: &'static [Self];

    /// Value sent as `order_by`.
    fn as_param(&self) -> &'static str;
}

/// Closed set of filter fields of one entity.
pub trait FilterField:
    fmt::Debug + fmt::Display + FromStr<Err = ListingError> + Copy + Eq + Hash + Ord + Send + Sync + 'static
{
    const ALL: &'static [Self];

    /// Query-string parameter name.
    fn as_param(&self) -> &'static str;

    fn kind(&self) -> FilterKind;

    fn parse_value(&self, raw: &str) -> ListingResult<FilterValue> {
        self.kind().parse(self.as_param(), raw)
    }
}

/// Declarative adapter binding one back-office entity to the listing controller.
pub trait Entity: fmt::Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Row type returned by the advanced-search endpoint.
    type Item: DeserializeOwned + Serialize + fmt::Debug + Clone + Send + Sync + 'static;
    type Sort: SortColumn;
    type Filter: FilterField;

    /// Short name used in logs and metrics labels.
    const NAME: &'static str;
    /// Advanced-search path, relative to the API base address.
    const ENDPOINT: &'static str;
    const DEFAULT_SORT: Self::Sort;
    const DEFAULT_SORT_DIR: SortDir;

    /// Filters applied when a screen is first opened.
    fn default_filters() -> Vec<(Self::Filter, FilterValue)> {
        Vec::new()
    }
}

/// Declares an entity's sort-column enum and its [`SortColumn`] impl.
macro_rules! sort_columns {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $param:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::domain::listing::SortColumn for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn as_param(&self) -> &'static str {
                match self {
                    $( Self::$variant => $param ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::domain::listing::SortColumn::as_param(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::support::ListingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::domain::listing::SortColumn>::ALL
                    .iter()
                    .copied()
                    .find(|column| $crate::domain::listing::SortColumn::as_param(column) == s)
                    .ok_or_else(|| $crate::support::ListingError::UnknownColumn(s.to_string()))
            }
        }
    };
}

/// Declares an entity's filter-field enum and its [`FilterField`] impl.
macro_rules! filter_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $param:literal : $kind:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::domain::listing::FilterField for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn as_param(&self) -> &'static str {
                match self {
                    $( Self::$variant => $param ),+
                }
            }

            fn kind(&self) -> $crate::domain::listing::FilterKind {
                match self {
                    $( Self::$variant => $crate::domain::listing::FilterKind::$kind ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::domain::listing::FilterField::as_param(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::support::ListingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::domain::listing::FilterField>::ALL
                    .iter()
                    .copied()
                    .find(|field| $crate::domain::listing::FilterField::as_param(field) == s)
                    .ok_or_else(|| $crate::support::ListingError::UnknownFilter(s.to_string()))
            }
        }
    };
}

pub(crate) use filter_fields;
pub(crate) use sort_columns;
