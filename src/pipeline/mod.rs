//! Discovery and batch-fetch pipeline
//!
//! Lists every identifier of each requested resource type and fetches their
//! configuration items in batches, handing each record to an [`ItemHandler`].
//!
//! # Module Structure
//!
//! - [`dispatcher`] - Bounded work queue and fixed worker pool
//! - [`processor`] - Per-type listing, then batching
//! - [`fetcher`] - Chunked detail fetches with per-batch isolation
//! - [`report`] - Per-run tallies
//!
//! Errors never escape a run. A failed listing abandons only that type, a
//! failed batch only that batch, and a failed handler call only that record.
//! What went wrong is logged and counted in the returned [`RunReport`].
//!
//! # Example
//!
//! ```no_run
//! use cfginv::pipeline::{Pipeline, PipelineConfig};
//! use cfginv::resource::{DetailedRecord, RegistryClient};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn dump(registry: Arc<dyn RegistryClient>) -> anyhow::Result<()> {
//!     let pipeline = Pipeline::new(
//!         registry,
//!         Arc::new(|record: DetailedRecord| -> anyhow::Result<()> {
//!             println!("{:?}", record);
//!             Ok(())
//!         }),
//!     );
//!     let config = PipelineConfig::from_catalog(5)?;
//!     let report = pipeline.run(&config, CancellationToken::new()).await;
//!     tracing::info!("{} records delivered", report.records_delivered);
//!     Ok(())
//! }
//! ```

mod dispatcher;
pub mod fetcher;
pub mod processor;
pub mod report;

pub use fetcher::{fetch_in_batches, BATCH_SIZE};
pub use processor::process_resource_type;
pub use report::{BatchSummary, RunReport, TypeOutcome};

use crate::resource::{default_resource_types, DetailedRecord, RegistryClient, ResourceTypeName};
use anyhow::{Context, Result};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default number of concurrent workers
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Consumer of retrieved records, injected once at construction
pub trait ItemHandler: Send + Sync {
    fn handle(&self, record: DetailedRecord) -> Result<()>;
}

impl<F> ItemHandler for F
where
    F: Fn(DetailedRecord) -> Result<()> + Send + Sync,
{
    fn handle(&self, record: DetailedRecord) -> Result<()> {
        self(record)
    }
}

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    resource_types: Vec<ResourceTypeName>,
    worker_count: NonZeroUsize,
}

impl PipelineConfig {
    /// Duplicates in `resource_types` are kept and processed independently.
    pub fn new(resource_types: Vec<ResourceTypeName>, worker_count: usize) -> Result<Self> {
        let worker_count =
            NonZeroUsize::new(worker_count).context("Worker count must be at least 1")?;
        Ok(Self {
            resource_types,
            worker_count,
        })
    }

    /// Every type in the built-in catalog
    pub fn from_catalog(worker_count: usize) -> Result<Self> {
        Self::new(default_resource_types().to_vec(), worker_count)
    }

    pub fn resource_types(&self) -> &[ResourceTypeName] {
        &self.resource_types
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count.get()
    }
}

/// Discovery pipeline bound to one registry and one handler
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<dyn RegistryClient>,
    handler: Arc<dyn ItemHandler>,
}

impl Pipeline {
    pub fn new(registry: Arc<dyn RegistryClient>, handler: Arc<dyn ItemHandler>) -> Self {
        Self { registry, handler }
    }

    /// Process every configured resource type and wait for completion.
    ///
    /// Always completes once the queue is drained; per-type and per-batch
    /// failures only show up in the log and in the report.
    pub async fn run(&self, config: &PipelineConfig, cancel: CancellationToken) -> RunReport {
        dispatcher::dispatch(
            self.registry.clone(),
            self.handler.clone(),
            config,
            cancel,
        )
        .await
    }
}
