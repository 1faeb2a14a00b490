//! get_threat_entity tool - strategic view of an actor, malware, intrusion set

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_input, Tool, ToolContext, ToolError};
use crate::domain::{join_or_none, EntityData, EntityKind, ThreatEntity};
use crate::error::Result;
use crate::graphql::{fetch, Query, QueryExecutor};

/// Prefix of the reply when no entity matches
pub const ENTITY_NOT_FOUND: &str = "No se encontró la entidad:";

/// Look up a domain object by exact name and describe the first match
pub async fn get_threat_entity(client: &dyn QueryExecutor, name: &str) -> Result<String> {
    let data: EntityData = fetch(client, Query::Entity, json!({"name": name})).await?;

    match data.into_first() {
        Some(entity) => Ok(format_entity(&entity)),
        None => Ok(format!("{} {}", ENTITY_NOT_FOUND, name)),
    }
}

pub fn format_entity(entity: &ThreatEntity) -> String {
    let mut lines = vec![
        format!("Nombre: {}", entity.name_text()),
        format!("Tipo: {}", entity.entity_type),
        format!("Descripción: {}", entity.description_text()),
        format!("Creado: {}", entity.created_text()),
    ];

    match entity.kind() {
        EntityKind::ThreatActor => {
            lines.push(format!("Tipos: {}", join_or_none(entity.actor_types())));
            lines.push(format!("Objetivos: {}", join_or_none(entity.goals())));
        }
        EntityKind::Malware => {
            let family = if entity.is_family() { "Sí" } else { "No" };
            lines.push(format!("Familia de malware: {}", family));
        }
        EntityKind::Other => {}
    }

    lines.join("\n")
}

#[derive(Debug, Deserialize)]
struct EntityArgs {
    name: String,
}

pub struct GetThreatEntityTool;

#[async_trait]
impl Tool for GetThreatEntityTool {
    fn name(&self) -> &'static str {
        "get_threat_entity"
    }

    fn description(&self) -> &'static str {
        "Get strategic information about an entity (Threat Actor, Malware, Intrusion Set)."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Exact entity name, e.g. 'APT28' or 'Emotet'"
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> std::result::Result<String, ToolError> {
        let args: EntityArgs = parse_input(input)?;
        Ok(get_threat_entity(ctx.client(), &args.name).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::MockQueryExecutor;

    fn entities(nodes: Value) -> Value {
        json!({"stixDomainObjects": {"edges": nodes}})
    }

    #[tokio::test]
    async fn test_threat_actor() {
        let mock = MockQueryExecutor::new().with_data(entities(json!([{"node": {
            "id": "threat-actor--1",
            "entity_type": "Threat-Actor",
            "name": "APT28",
            "description": "Russian military intelligence",
            "created": "2017-05-31T21:31:43.540Z",
            "threat_actor_types": ["nation-state", "spy"],
            "goals": ["espionage"]
        }}])));

        let text = get_threat_entity(&mock, "APT28").await.unwrap();

        assert_eq!(
            text,
            "Nombre: APT28\n\
             Tipo: Threat-Actor\n\
             Descripción: Russian military intelligence\n\
             Creado: 2017-05-31T21:31:43.540Z\n\
             Tipos: nation-state, spy\n\
             Objetivos: espionage"
        );
        assert!(!text.contains("Familia de malware:"));
    }

    #[tokio::test]
    async fn test_threat_actor_without_lists() {
        let mock = MockQueryExecutor::new().with_data(entities(json!([{"node": {
            "id": "threat-actor--2",
            "entity_type": "Threat-Actor-Group",
            "name": "APT28"
        }}])));

        let text = get_threat_entity(&mock, "APT28").await.unwrap();
        assert!(text.contains("Tipos: Ninguno"));
        assert!(text.contains("Objetivos: Ninguno"));
        assert!(text.contains("Descripción: N/A"));
        assert!(text.contains("Creado: N/A"));
    }

    #[tokio::test]
    async fn test_malware() {
        let mock = MockQueryExecutor::new().with_data(entities(json!([{"node": {
            "id": "malware--1",
            "entity_type": "Malware",
            "name": "APT28",
            "description": "Implant",
            "created": "2020-01-01T00:00:00Z",
            "is_family": true
        }}])));

        let text = get_threat_entity(&mock, "APT28").await.unwrap();
        assert!(text.contains("Familia de malware: Sí"));
        assert!(!text.contains("Tipos:"));
        assert!(!text.contains("Objetivos:"));
    }

    #[tokio::test]
    async fn test_other_entity_has_base_lines_only() {
        let mock = MockQueryExecutor::new().with_data(entities(json!([{"node": {
            "id": "intrusion-set--1",
            "entity_type": "Intrusion-Set",
            "name": "Sofacy"
        }}])));

        let text = get_threat_entity(&mock, "Sofacy").await.unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock = MockQueryExecutor::new().with_data(entities(json!([])));
        let text = get_threat_entity(&mock, "Nobody").await.unwrap();
        assert_eq!(text, "No se encontró la entidad: Nobody");
        assert_eq!(mock.calls()[0].variables, json!({"name": "Nobody"}));
    }
}
