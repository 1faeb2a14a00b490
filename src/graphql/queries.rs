//! Fixed GraphQL documents sent to the OpenCTI API
//!
//! Arguments always travel as GraphQL variables; nothing is spliced into
//! the document text.

/// Unified keyword search over domain objects and observables.
/// Variables: `search: String!`, `first: Int`
pub const SEARCH_QUERY: &str = r#"
query GlobalSearch($search: String!, $first: Int) {
  globalSearch(search: $search, first: $first) {
    edges {
      node {
        id
        entity_type
        ... on StixDomainObject {
          created_at
          name
          description
        }
        ... on StixCyberObservable {
          observable_value
          x_opencti_description
        }
      }
    }
  }
}
"#;

/// Exact lookup of an observable (IP, domain, hash) by value.
/// Variables: `value: String!`
pub const GET_OBSERVABLE_QUERY: &str = r#"
query GetObservable($value: String!) {
  stixCyberObservables(filters: {mode: and, filters: [{key: "value", values: [$value]}], filterGroups: []}) {
    edges {
      node {
        id
        entity_type
        observable_value
        x_opencti_score
        x_opencti_description
        created_at
        indicators {
          edges {
            node {
              name
              pattern
            }
          }
        }
        reports {
          edges {
            node {
              name
              published
            }
          }
        }
      }
    }
  }
}
"#;

/// Exact lookup of a domain object (threat actor, malware, ...) by name.
/// Variables: `name: String!`
pub const GET_ENTITY_QUERY: &str = r#"
query GetEntity($name: String!) {
  stixDomainObjects(filters: {mode: and, filters: [{key: "name", values: [$name]}], filterGroups: []}) {
    edges {
      node {
        id
        entity_type
        name
        description
        created
        ... on ThreatActor {
          threat_actor_types
          goals
        }
        ... on Malware {
          is_family
        }
      }
    }
  }
}
"#;

/// The queries this server knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Search,
    Observable,
    Entity,
}

impl Query {
    pub fn text(&self) -> &'static str {
        match self {
            Query::Search => SEARCH_QUERY,
            Query::Observable => GET_OBSERVABLE_QUERY,
            Query::Entity => GET_ENTITY_QUERY,
        }
    }

    pub fn operation_name(&self) -> &'static str {
        match self {
            Query::Search => "GlobalSearch",
            Query::Observable => "GetObservable",
            Query::Entity => "GetEntity",
        }
    }

    /// Top-level field of `data` holding the result connection
    pub fn root_field(&self) -> &'static str {
        match self {
            Query::Search => "globalSearch",
            Query::Observable => "stixCyberObservables",
            Query::Entity => "stixDomainObjects",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_match_documents() {
        for query in [Query::Search, Query::Observable, Query::Entity] {
            let header = format!("query {}(", query.operation_name());
            assert!(query.text().contains(&header), "{:?} missing header", query);
            assert!(query.text().contains(query.root_field()));
        }
    }

    #[test]
    fn test_documents_use_variables() {
        assert!(SEARCH_QUERY.contains("$search: String!"));
        assert!(SEARCH_QUERY.contains("$first: Int"));
        assert!(GET_OBSERVABLE_QUERY.contains("values: [$value]"));
        assert!(GET_ENTITY_QUERY.contains("values: [$name]"));
    }

    #[test]
    fn test_entity_query_has_type_fragments() {
        assert!(GET_ENTITY_QUERY.contains("... on ThreatActor"));
        assert!(GET_ENTITY_QUERY.contains("goals"));
        assert!(GET_ENTITY_QUERY.contains("... on Malware"));
        assert!(GET_ENTITY_QUERY.contains("is_family"));
    }
}
