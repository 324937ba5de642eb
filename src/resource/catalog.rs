//! Resource Type Catalog - built-in list of AWS Config resource types
//!
//! The default set of resource types queried when the caller does not name
//! any. The list is embedded as JSON at compile time and parsed once.

use serde::Deserialize;
use std::sync::OnceLock;

/// Embedded catalog (compiled into the binary)
const CATALOG_FILE: &str = include_str!("../resources/catalog.json");

/// Root structure of resources/catalog.json
#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    resource_types: Vec<String>,
}

/// Global catalog loaded from JSON
static CATALOG: OnceLock<Vec<String>> = OnceLock::new();

/// Get the default resource types, in catalog order
pub fn default_resource_types() -> &'static [String] {
    CATALOG.get_or_init(|| {
        let parsed: CatalogFile = serde_json::from_str(CATALOG_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded catalog JSON: {}", e));
        parsed.resource_types
    })
}

/// Service segment of a resource type name
/// e.g., "AWS::EC2::Instance" -> "EC2"
pub fn service_of(resource_type: &str) -> Option<&str> {
    let mut parts = resource_type.split("::");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(service), Some(_)) if !service.is_empty() => Some(service),
        _ => None,
    }
}

/// Catalog entries belonging to any of the given services (case-insensitive)
pub fn resource_types_for_services(services: &[String]) -> Vec<String> {
    filter_by_services(default_resource_types(), services)
}

/// Entries of `resource_types` belonging to any of the given services (case-insensitive)
pub fn filter_by_services(resource_types: &[String], services: &[String]) -> Vec<String> {
    resource_types
        .iter()
        .filter(|resource_type| {
            service_of(resource_type)
                .map(|svc| services.iter().any(|s| s.trim().eq_ignore_ascii_case(svc)))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}
