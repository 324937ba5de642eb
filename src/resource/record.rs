//! Detailed Record
//!
//! Serializable snapshot of one AWS Config configuration item.

use aws_sdk_config::primitives::DateTime as SmithyDateTime;
use aws_sdk_config::types::BaseConfigurationItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Configuration snapshot for one (resource type, resource id) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_item_capture_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_item_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_state_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_creation_time: Option<DateTime<Utc>>,
    /// Decoded configuration document (raw string if it is not JSON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub supplementary_configuration: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_item_delivery_time: Option<DateTime<Utc>>,
}

impl DetailedRecord {
    /// Minimal record carrying only its key
    pub fn keyed(resource_type: &str, resource_id: &str) -> Self {
        Self {
            resource_type: Some(resource_type.to_string()),
            resource_id: Some(resource_id.to_string()),
            ..Self::default()
        }
    }
}

impl From<&BaseConfigurationItem> for DetailedRecord {
    fn from(item: &BaseConfigurationItem) -> Self {
        Self {
            version: item.version().map(str::to_string),
            account_id: item.account_id().map(str::to_string),
            configuration_item_capture_time: item
                .configuration_item_capture_time()
                .and_then(to_utc),
            configuration_item_status: item
                .configuration_item_status()
                .map(|s| s.as_str().to_string()),
            configuration_state_id: item.configuration_state_id().map(str::to_string),
            arn: item.arn().map(str::to_string),
            resource_type: item.resource_type().map(|t| t.as_str().to_string()),
            resource_id: item.resource_id().map(str::to_string),
            resource_name: item.resource_name().map(str::to_string),
            aws_region: item.aws_region().map(str::to_string),
            availability_zone: item.availability_zone().map(str::to_string),
            resource_creation_time: item.resource_creation_time().and_then(to_utc),
            configuration: item.configuration().map(decode_embedded_json),
            supplementary_configuration: item
                .supplementary_configuration()
                .map(|map| {
                    map.iter()
                        .map(|(k, v)| (k.clone(), decode_embedded_json(v)))
                        .collect()
                })
                .unwrap_or_default(),
            configuration_item_delivery_time: item
                .configuration_item_delivery_time()
                .and_then(to_utc),
        }
    }
}

fn to_utc(timestamp: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

/// AWS Config ships nested documents as JSON-encoded strings
fn decode_embedded_json(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
