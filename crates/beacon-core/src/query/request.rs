//! Paginated list request for integrations.

use serde::{Deserialize, Serialize};

use super::{IntegrationSortBy, Pagination, TRACING_TARGET};
use crate::filter::{Filters, IntegrationFilterColumn};
use crate::types::{IntegrationCategory, IntegrationType};

/// Query parameters of the list integrations operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetIntegrationsRequest {
    pub limit: u32,
    pub offset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `column:direction`, or empty for the server's default ordering.
    #[serde(default)]
    pub sort_by: String,
    /// Restricts results to these types; empty means every type.
    #[serde(default, rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<IntegrationType>,
}

impl GetIntegrationsRequest {
    /// Returns the request as query string pairs.
    ///
    /// Each restricted type becomes its own `type` pair. An empty sort token
    /// is omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];

        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.clone()));
        }
        if !self.sort_by.is_empty() {
            pairs.push(("sort_by", self.sort_by.clone()));
        }
        pairs.extend(self.types.iter().map(|ty| ("type", ty.to_string())));

        pairs
    }
}

/// Translates list filters, pagination and sort into a list request.
///
/// The offset is derived from a 1-based page index that never goes below 1.
/// An absent sort produces an empty token. An absent name filter omits the
/// name constraint. The category, if any, restricts the listed types.
pub fn build_list_request(
    filters: &Filters<IntegrationFilterColumn>,
    pagination: &Pagination,
    sort: Option<&IntegrationSortBy>,
    category: Option<IntegrationCategory>,
) -> GetIntegrationsRequest {
    let request = GetIntegrationsRequest {
        limit: pagination.limit(),
        offset: pagination.offset(),
        active: filters.active(),
        name: filters.name().map(str::to_owned),
        sort_by: sort.map(IntegrationSortBy::token).unwrap_or_default(),
        types: category
            .map(|category| category.types().iter().copied().map(Into::into).collect())
            .unwrap_or_default(),
    };

    tracing::trace!(
        target: TRACING_TARGET,
        limit = request.limit,
        offset = request.offset,
        active = ?request.active,
        has_name = request.name.is_some(),
        sort_by = %request.sort_by,
        types = request.types.len(),
        "List request built"
    );

    request
}
