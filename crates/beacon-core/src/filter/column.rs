//! Filter columns and the values they hold.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// A closed set of filterable columns.
///
/// Implemented by field-less enums; [`IntoEnumIterator`] yields every column
/// so that composition can bind one state accessor per column.
pub trait FilterColumn:
    Copy + Ord + Hash + fmt::Debug + fmt::Display + IntoEnumIterator + Send + Sync + 'static
{
}

impl<T> FilterColumn for T where
    T: Copy + Ord + Hash + fmt::Debug + fmt::Display + IntoEnumIterator + Send + Sync + 'static
{
}

/// Columns of the integrations list that can be filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegrationFilterColumn {
    Name,
    Enabled,
}

/// Value held by a single filter column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterContent {
    Single(String),
    Many(Vec<String>),
}

impl FilterContent {
    /// Returns the first value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }

    /// Returns every value held by this content.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Returns whether no non-empty value is held.
    pub fn is_blank(&self) -> bool {
        self.values().iter().all(|value| value.is_empty())
    }
}

impl From<&str> for FilterContent {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for FilterContent {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FilterContent {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// Current value of every column of a filter set.
///
/// Columns without a value are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters<C: FilterColumn> {
    values: BTreeMap<C, FilterContent>,
}

impl<C: FilterColumn> Default for Filters<C> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<C: FilterColumn> Filters<C> {
    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears the value of a column.
    pub fn with(mut self, column: C, value: Option<FilterContent>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets or clears the value of a column.
    pub fn set(&mut self, column: C, value: Option<FilterContent>) {
        match value {
            Some(value) => self.values.insert(column, value),
            None => self.values.remove(&column),
        };
    }

    /// Returns the value of a column.
    pub fn get(&self, column: C) -> Option<&FilterContent> {
        self.values.get(&column)
    }

    /// Iterates over the columns that hold a value.
    pub fn iter(&self) -> impl Iterator<Item = (C, &FilterContent)> {
        self.values.iter().map(|(column, value)| (*column, value))
    }

    /// Returns whether no column holds a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Filters<IntegrationFilterColumn> {
    /// Returns the name substring filter.
    pub fn name(&self) -> Option<&str> {
        self.get(IntegrationFilterColumn::Name)
            .and_then(FilterContent::first)
            .filter(|name| !name.is_empty())
    }

    /// Returns the enabled filter as the `active` flag of a list request.
    ///
    /// Values other than `enabled` and `disabled` leave the flag unset.
    pub fn active(&self) -> Option<bool> {
        match self.get(IntegrationFilterColumn::Enabled)?.first()? {
            "enabled" => Some(true),
            "disabled" => Some(false),
            _ => None,
        }
    }
}
