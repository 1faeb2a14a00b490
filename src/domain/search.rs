//! Global search results

use serde::Deserialize;

use super::{present, NO_DESCRIPTION, UNKNOWN_NAME};
use crate::graphql::Connection;

/// `data` of the GlobalSearch query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchData {
    #[serde(rename = "globalSearch")]
    pub global_search: Option<Connection<SearchHit>>,
}

impl SearchData {
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.global_search.map(Connection::into_nodes).unwrap_or_default()
    }
}

/// One search result: a domain object (name, description) or an
/// observable (value, x_opencti_description)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub entity_type: String,

    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,

    pub observable_value: Option<String>,
    #[serde(rename = "x_opencti_description")]
    pub observable_description: Option<String>,
}

impl SearchHit {
    /// Name for domain objects, value for observables
    pub fn label(&self) -> &str {
        present(&self.name)
            .or_else(|| present(&self.observable_value))
            .unwrap_or(UNKNOWN_NAME)
    }

    pub fn summary(&self) -> &str {
        present(&self.description)
            .or_else(|| present(&self.observable_description))
            .unwrap_or(NO_DESCRIPTION)
    }
}
