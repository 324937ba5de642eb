//! Resource abstraction layer
//!
//! Types shared by the pipeline and the AWS adapter.
//!
//! # Architecture
//!
//! - [`catalog`] - Built-in list of AWS Config resource types (embedded JSON)
//! - [`record`] - Serializable configuration item snapshot
//! - [`registry`] - The listing / batch-fetch contract the pipeline runs against

pub mod catalog;
mod record;
mod registry;

pub use catalog::{
    default_resource_types, filter_by_services, resource_types_for_services, service_of,
};
pub use record::DetailedRecord;
pub use registry::{BatchResponse, ItemIdentifier, RegistryClient, ResourceTypeName};
