//! STIX domain objects: threat actors, malware and the rest

use serde::Deserialize;

use super::{present, NOT_AVAILABLE};
use crate::graphql::Connection;

/// `data` of the GetEntity query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityData {
    #[serde(rename = "stixDomainObjects")]
    pub entities: Option<Connection<ThreatEntity>>,
}

impl EntityData {
    /// First match only. The server's ordering decides which one that is.
    pub fn into_first(self) -> Option<ThreatEntity> {
        self.entities.and_then(|conn| conn.into_nodes().into_iter().next())
    }
}

/// Which type-specific fields apply to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    ThreatActor,
    Malware,
    Other,
}

impl EntityKind {
    pub fn from_entity_type(entity_type: &str) -> Self {
        match entity_type {
            "Threat-Actor" | "Threat-Actor-Group" | "Threat-Actor-Individual" => EntityKind::ThreatActor,
            "Malware" => EntityKind::Malware,
            _ => EntityKind::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreatEntity {
    pub id: String,
    pub entity_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<String>,

    // ThreatActor fragment
    pub threat_actor_types: Option<Vec<String>>,
    pub goals: Option<Vec<String>>,

    // Malware fragment
    pub is_family: Option<bool>,
}

impl ThreatEntity {
    pub fn kind(&self) -> EntityKind {
        EntityKind::from_entity_type(&self.entity_type)
    }

    pub fn name_text(&self) -> &str {
        present(&self.name).unwrap_or(NOT_AVAILABLE)
    }

    pub fn description_text(&self) -> &str {
        present(&self.description).unwrap_or(NOT_AVAILABLE)
    }

    pub fn created_text(&self) -> &str {
        present(&self.created).unwrap_or(NOT_AVAILABLE)
    }

    pub fn actor_types(&self) -> &[String] {
        self.threat_actor_types.as_deref().unwrap_or_default()
    }

    pub fn goals(&self) -> &[String] {
        self.goals.as_deref().unwrap_or_default()
    }

    /// Absent flag means "not a family"
    pub fn is_family(&self) -> bool {
        self.is_family.unwrap_or(false)
    }
}
