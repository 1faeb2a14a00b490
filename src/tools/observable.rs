//! get_observable_details tool - intelligence on one IP, domain or hash

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_input, Tool, ToolContext, ToolError};
use crate::domain::{join_or_none, Observable, ObservableData};
use crate::error::Result;
use crate::graphql::{fetch, Query, QueryExecutor};

/// Prefix of the reply when no observable matches
pub const OBSERVABLE_NOT_FOUND: &str = "No se encontró información para el observable:";

/// Look up an observable by exact value and describe the first match
pub async fn get_observable_details(client: &dyn QueryExecutor, value: &str) -> Result<String> {
    let data: ObservableData = fetch(client, Query::Observable, json!({"value": value})).await?;

    match data.into_first() {
        Some(observable) => Ok(format_observable(&observable)),
        None => Ok(format!("{} {}", OBSERVABLE_NOT_FOUND, value)),
    }
}

pub fn format_observable(observable: &Observable) -> String {
    [
        format!("Tipo: {}", observable.entity_type),
        format!("Valor: {}", observable.value()),
        format!("Score: {}", observable.score_text()),
        format!("Descripción: {}", observable.description_text()),
        format!("Indicadores asociados: {}", join_or_none(&observable.indicator_names())),
        format!("Mencionado en reportes: {}", join_or_none(&observable.report_citations())),
    ]
    .join("\n")
}

#[derive(Debug, Deserialize)]
struct ObservableArgs {
    value: String,
}

pub struct GetObservableDetailsTool;

#[async_trait]
impl Tool for GetObservableDetailsTool {
    fn name(&self) -> &'static str {
        "get_observable_details"
    }

    fn description(&self) -> &'static str {
        "Get detailed intelligence about a technical observable (IP, domain, SHA256 hash, ...). \
         Returns related indicators and the reports it appears in."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "value": {
                    "type": "string",
                    "description": "Observable value, e.g. '8.8.8.8' or 'wannacry.exe'"
                }
            },
            "required": ["value"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> std::result::Result<String, ToolError> {
        let args: ObservableArgs = parse_input(input)?;
        Ok(get_observable_details(ctx.client(), &args.value).await?)
    }
}
