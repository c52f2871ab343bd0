//! Persisted per-column filter state backed by a URL query string.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use url::Url;

use super::{FilterContent, IntegrationFilterColumn, TRACING_TARGET};
use crate::{Error, Result};

/// Read/write access to the persisted value of one filter column.
pub trait FilterState: fmt::Debug + Send + Sync {
    /// Returns the persisted value.
    fn get(&self) -> Option<FilterContent>;

    /// Replaces the persisted value; `None` removes it.
    fn set(&self, value: Option<FilterContent>);
}

/// Shared, type-erased [`FilterState`].
pub type SharedFilterState = Arc<dyn FilterState>;

/// Query string of a URL shared between filter state accessors.
///
/// Cloning is cheap; clones observe and modify the same URL.
#[derive(Debug, Clone)]
pub struct UrlQueryState {
    url: Arc<RwLock<Url>>,
}

impl UrlQueryState {
    /// Creates a state over the given URL.
    pub fn new(url: Url) -> Self {
        Self {
            url: Arc::new(RwLock::new(url)),
        }
    }

    /// Parses the URL and creates a state over it.
    pub fn parse(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|error| {
            Error::invalid_input()
                .with_message(format!("invalid url '{url}'"))
                .with_source(error)
        })?;

        Ok(Self::new(url))
    }

    /// Returns a copy of the current URL.
    pub fn url(&self) -> Url {
        self.url.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns every value of a query parameter, in order.
    pub fn params(&self, key: &str) -> Vec<String> {
        let url = self.url.read().unwrap_or_else(PoisonError::into_inner);
        url.query_pairs()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    /// Returns the first value of a query parameter.
    pub fn param(&self, key: &str) -> Option<String> {
        self.params(key).into_iter().next()
    }

    /// Replaces every value of a query parameter; an empty slice removes it.
    pub fn set_params(&self, key: &str, values: &[String]) {
        let mut url = self.url.write().unwrap_or_else(PoisonError::into_inner);

        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        pairs.extend(values.iter().map(|value| (key.to_owned(), value.clone())));

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        tracing::trace!(
            target: TRACING_TARGET,
            key = key,
            values = values.len(),
            "Query parameter replaced"
        );
    }

    /// Binds a free-form string parameter.
    pub fn string_param(&self, key: impl Into<String>) -> SharedFilterState {
        Arc::new(UrlStringParam {
            query: self.clone(),
            key: key.into(),
        })
    }

    /// Binds a parameter restricted to one of `options`.
    pub fn exclusive_options_param(
        &self,
        key: impl Into<String>,
        options: &[&str],
    ) -> SharedFilterState {
        Arc::new(UrlExclusiveParam {
            query: self.clone(),
            key: key.into(),
            options: options.iter().map(|option| (*option).to_owned()).collect(),
        })
    }
}

/// String query parameter; repeated keys read back as a list.
#[derive(Debug)]
struct UrlStringParam {
    query: UrlQueryState,
    key: String,
}

impl FilterState for UrlStringParam {
    fn get(&self) -> Option<FilterContent> {
        let mut values = self.query.params(&self.key);
        match values.len() {
            0 => None,
            1 => values.pop().map(FilterContent::Single),
            _ => Some(FilterContent::Many(values)),
        }
    }

    fn set(&self, value: Option<FilterContent>) {
        let values: Vec<String> = value
            .iter()
            .flat_map(FilterContent::values)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect();

        self.query.set_params(&self.key, &values);
    }
}

/// Query parameter holding at most one of a fixed set of options.
#[derive(Debug)]
struct UrlExclusiveParam {
    query: UrlQueryState,
    key: String,
    options: Vec<String>,
}

impl UrlExclusiveParam {
    fn accept<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        value.filter(|value| self.options.iter().any(|option| option == value))
    }
}

impl FilterState for UrlExclusiveParam {
    fn get(&self) -> Option<FilterContent> {
        let value = self.query.param(&self.key);
        self.accept(value.as_deref()).map(FilterContent::from)
    }

    fn set(&self, value: Option<FilterContent>) {
        let accepted = self.accept(value.as_ref().and_then(FilterContent::first));
        let values: Vec<String> = accepted.into_iter().map(str::to_owned).collect();
        self.query.set_params(&self.key, &values);
    }
}

/// Returns the persisted state accessor for a column of the integrations list.
///
/// The name column is a free-form `name` parameter; the enabled column is an
/// `enabled` parameter that holds either `enabled` or `disabled`.
pub fn state_factory(column: IntegrationFilterColumn, query: &UrlQueryState) -> SharedFilterState {
    match column {
        IntegrationFilterColumn::Name => query.string_param("name"),
        IntegrationFilterColumn::Enabled => {
            query.exclusive_options_param("enabled", &["enabled", "disabled"])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> UrlQueryState {
        UrlQueryState::parse("https://console.example.com/settings/integrations?category=Webhooks")
            .unwrap()
    }

    #[test]
    fn test_name_param_round_trip() {
        let query = query();
        let name = state_factory(IntegrationFilterColumn::Name, &query);
        assert_eq!(name.get(), None);

        name.set(Some("ops".into()));
        assert_eq!(name.get(), Some(FilterContent::Single("ops".into())));
        assert_eq!(query.param("category").as_deref(), Some("Webhooks"));

        name.set(None);
        assert_eq!(name.get(), None);
        assert_eq!(query.url().query(), Some("category=Webhooks"));
    }

    #[test]
    fn test_name_param_reads_repeated_keys() {
        let query = query();
        let name = state_factory(IntegrationFilterColumn::Name, &query);
        name.set(Some(FilterContent::Many(vec!["a".into(), "b".into()])));

        assert_eq!(
            name.get(),
            Some(FilterContent::Many(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn test_enabled_param_rejects_unknown_options() {
        let query = query();
        let enabled = state_factory(IntegrationFilterColumn::Enabled, &query);

        enabled.set(Some("disabled".into()));
        assert_eq!(enabled.get(), Some(FilterContent::Single("disabled".into())));

        enabled.set(Some("sometimes".into()));
        assert_eq!(enabled.get(), None);
        assert_eq!(query.param("enabled"), None);

        query.set_params("enabled", &["bogus".to_owned()]);
        assert_eq!(enabled.get(), None);
    }

    #[test]
    fn test_removing_last_param_clears_query() {
        let query = UrlQueryState::parse("https://console.example.com/integrations").unwrap();
        let name = state_factory(IntegrationFilterColumn::Name, &query);

        name.set(Some("ops".into()));
        name.set(None);
        assert_eq!(query.url().query(), None);
    }
}
