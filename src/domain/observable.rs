//! Cyber observables with their indicators and reports

use serde::Deserialize;

use super::{present, NOT_AVAILABLE};
use crate::graphql::Connection;

/// `data` of the GetObservable query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservableData {
    #[serde(rename = "stixCyberObservables")]
    pub observables: Option<Connection<Observable>>,
}

impl ObservableData {
    /// First match only. The server's ordering decides which one that is.
    pub fn into_first(self) -> Option<Observable> {
        self.observables.and_then(|conn| conn.into_nodes().into_iter().next())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Observable {
    pub id: String,
    pub entity_type: String,
    pub observable_value: Option<String>,

    #[serde(rename = "x_opencti_score")]
    pub score: Option<i64>,

    #[serde(rename = "x_opencti_description")]
    pub description: Option<String>,

    pub created_at: Option<String>,

    pub indicators: Option<Connection<Indicator>>,
    pub reports: Option<Connection<Report>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicator {
    pub name: Option<String>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Report {
    pub name: Option<String>,
    pub published: Option<String>,
}

impl Report {
    /// `<name> (<published>)`
    pub fn citation(&self) -> String {
        format!(
            "{} ({})",
            present(&self.name).unwrap_or(NOT_AVAILABLE),
            present(&self.published).unwrap_or(NOT_AVAILABLE)
        )
    }
}

impl Observable {
    pub fn value(&self) -> &str {
        present(&self.observable_value).unwrap_or(NOT_AVAILABLE)
    }

    pub fn score_text(&self) -> String {
        self.score.map(|s| s.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn description_text(&self) -> &str {
        present(&self.description).unwrap_or(NOT_AVAILABLE)
    }

    pub fn indicator_names(&self) -> Vec<&str> {
        self.indicators
            .iter()
            .flat_map(|conn| conn.nodes())
            .map(|i| present(&i.name).unwrap_or(NOT_AVAILABLE))
            .collect()
    }

    pub fn report_citations(&self) -> Vec<String> {
        self.reports.iter().flat_map(|conn| conn.nodes()).map(Report::citation).collect()
    }
}
