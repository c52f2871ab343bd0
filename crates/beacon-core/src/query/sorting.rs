//! Sort specifications for list requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Sort order direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SortOrder {
    /// Ascending order (A-Z, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, newest first).
    Desc,
}

/// Generic sort specification with field and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy<F> {
    /// The field to sort by.
    pub field: F,
    /// The sort order direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl<F> SortBy<F> {
    /// Creates a new sort specification with the given field and order.
    #[inline]
    pub fn new(field: F, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Creates a new sort specification with ascending order.
    #[inline]
    pub fn asc(field: F) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Creates a new sort specification with descending order.
    #[inline]
    pub fn desc(field: F) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

impl<F: fmt::Display> SortBy<F> {
    /// Returns the `column:direction` token understood by the server.
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl<F: fmt::Display> fmt::Display for SortBy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.order)
    }
}

impl<F: FromStr> FromStr for SortBy<F> {
    type Err = Error;

    /// Parses `column` or `column:direction`.
    fn from_str(s: &str) -> Result<Self> {
        let (field, order) = match s.split_once(':') {
            Some((field, order)) => (field, Some(order)),
            None => (s, None),
        };

        let field = field.parse::<F>().map_err(|_| {
            Error::invalid_input().with_message(format!("unknown sort column '{field}'"))
        })?;

        let order = match order {
            Some(order) => order.parse::<SortOrder>().map_err(|error| {
                Error::invalid_input()
                    .with_message(format!("unknown sort direction '{order}'"))
                    .with_source(error)
            })?,
            None => SortOrder::default(),
        };

        Ok(Self::new(field, order))
    }
}

/// Columns of the integrations list the server can sort by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegrationSortField {
    /// Sort by display name.
    #[default]
    Name,
    /// Sort by integration type.
    Type,
    /// Sort by the enabled flag.
    Enabled,
    /// Sort by creation date.
    Created,
}

/// Sorting specification for integrations.
pub type IntegrationSortBy = SortBy<IntegrationSortField>;
