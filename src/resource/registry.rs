//! Registry client contract
//!
//! The two capabilities the pipeline needs from a configuration registry:
//! a paginated identifier listing and a bounded batch detail fetch.

use super::record::DetailedRecord;
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Category key, e.g. "AWS::EC2::Instance"
pub type ResourceTypeName = String;

/// Key of one item within a resource type
pub type ItemIdentifier = String;

/// Result of one batch detail fetch
#[derive(Debug, Clone, Default)]
pub struct BatchResponse {
    pub records: Vec<DetailedRecord>,
    /// Identifiers the registry accepted but did not return this round
    pub unprocessed: Vec<ItemIdentifier>,
}

impl BatchResponse {
    pub fn new(records: Vec<DetailedRecord>) -> Self {
        Self {
            records,
            unprocessed: Vec::new(),
        }
    }
}

/// Remote configuration registry
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Lazily list every identifier of `resource_type`, page by page.
    ///
    /// A failing page is yielded as an `Err` item and ends the stream.
    fn list_identifiers<'a>(&'a self, resource_type: &'a str)
        -> BoxStream<'a, Result<ItemIdentifier>>;

    /// Fetch detailed records for one batch of identifiers in a single call.
    async fn fetch_details(
        &self,
        resource_type: &str,
        identifiers: &[ItemIdentifier],
    ) -> Result<BatchResponse>;
}
