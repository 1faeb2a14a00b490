//! Typed records for the knowledge-base responses
//!
//! Each query has a `*Data` type mirroring its `data` object. Every field the
//! server may omit is an `Option`, rendered with one of the placeholders below.

pub mod entity;
pub mod observable;
pub mod search;

pub use entity::{EntityData, EntityKind, ThreatEntity};
pub use observable::{Indicator, Observable, ObservableData, Report};
pub use search::{SearchData, SearchHit};

/// Missing scalar field
pub const NOT_AVAILABLE: &str = "N/A";

/// Empty relation list
pub const NONE_LISTED: &str = "Ninguno";

/// Search hit with neither a name nor an observable value
pub const UNKNOWN_NAME: &str = "Desconocido";

/// Search hit with no description of either kind
pub const NO_DESCRIPTION: &str = "Sin descripción";

/// Treat empty strings the same as missing ones
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Comma-join a list, or the empty-list placeholder
pub(crate) fn join_or_none<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        NONE_LISTED.to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}
