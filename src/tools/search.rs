//! search_knowledge_base tool - keyword search over entities and observables

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_input, Tool, ToolContext, ToolError};
use crate::domain::{SearchData, SearchHit};
use crate::error::Result;
use crate::graphql::{fetch, Query, QueryExecutor};

pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

pub const NO_RESULTS: &str = "No se encontraron resultados.";

/// Search the knowledge base and list every hit, one per line
pub async fn search_knowledge_base(client: &dyn QueryExecutor, keyword: &str, limit: Option<u32>) -> Result<String> {
    let first = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let data: SearchData = fetch(client, Query::Search, json!({"search": keyword, "first": first})).await?;

    let hits = data.into_hits();
    if hits.is_empty() {
        return Ok(NO_RESULTS.to_string());
    }

    Ok(hits.iter().map(format_hit).collect::<Vec<_>>().join("\n"))
}

/// `- [<type>] <label> (ID: <id>): <summary>` on a single line
pub fn format_hit(hit: &SearchHit) -> String {
    let line = format!("- [{}] {} (ID: {}): {}", hit.entity_type, hit.label(), hit.id, hit.summary());
    line.replace(['\r', '\n'], " ")
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    keyword: String,
    #[serde(default)]
    limit: Option<u32>,
}

pub struct SearchKnowledgeBaseTool;

#[async_trait]
impl Tool for SearchKnowledgeBaseTool {
    fn name(&self) -> &'static str {
        "search_knowledge_base"
    }

    fn description(&self) -> &'static str {
        "Search the OpenCTI knowledge base for any entity or observable. \
         Useful to find IDs or check whether something exists."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "keyword": {
                    "type": "string",
                    "description": "Term to search for (name, IP, hash, ...)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "default": DEFAULT_SEARCH_LIMIT,
                    "description": "Maximum number of results (default: 10)"
                }
            },
            "required": ["keyword"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> std::result::Result<String, ToolError> {
        let args: SearchArgs = parse_input(input)?;
        Ok(search_knowledge_base(ctx.client(), &args.keyword, args.limit).await?)
    }
}
