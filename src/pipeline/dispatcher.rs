//! Worker Pool / Dispatcher
//!
//! A fixed pool of tokio tasks pulling resource types from one bounded queue.

use super::processor::process_resource_type;
use super::report::RunReport;
use super::{ItemHandler, PipelineConfig};
use crate::resource::{RegistryClient, ResourceTypeName};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

type SharedQueue = Arc<Mutex<mpsc::Receiver<ResourceTypeName>>>;

/// Feed every resource type through the pool and wait for all workers.
pub(super) async fn dispatch(
    registry: Arc<dyn RegistryClient>,
    handler: Arc<dyn ItemHandler>,
    config: &PipelineConfig,
    cancel: CancellationToken,
) -> RunReport {
    let worker_count = config.worker_count();
    let (sender, receiver) = mpsc::channel::<ResourceTypeName>(worker_count);
    let queue: SharedQueue = Arc::new(Mutex::new(receiver));

    tracing::info!(
        "Dispatching {} resource types to {} workers",
        config.resource_types().len(),
        worker_count
    );

    let workers: Vec<_> = (0..worker_count)
        .map(|worker_id| {
            let queue = queue.clone();
            let registry = registry.clone();
            let handler = handler.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { worker(worker_id, queue, registry, handler, cancel).await })
        })
        .collect();

    for resource_type in config.resource_types() {
        if sender.send(resource_type.clone()).await.is_err() {
            // Only possible if every worker died
            tracing::error!("Work queue closed early, {} not dispatched", resource_type);
            break;
        }
    }
    drop(sender);

    let mut report = RunReport::default();
    for result in join_all(workers).await {
        match result {
            Ok(tally) => report.merge(&tally),
            Err(err) => tracing::error!("Worker terminated abnormally: {}", err),
        }
    }

    tracing::info!("Processing completed");
    report
}

async fn worker(
    worker_id: usize,
    queue: SharedQueue,
    registry: Arc<dyn RegistryClient>,
    handler: Arc<dyn ItemHandler>,
    cancel: CancellationToken,
) -> RunReport {
    let mut tally = RunReport::default();

    loop {
        let next = queue.lock().await.recv().await;
        let Some(resource_type) = next else {
            break;
        };

        tracing::debug!("Worker {} picked up {}", worker_id, resource_type);
        let outcome =
            process_resource_type(registry.as_ref(), handler.as_ref(), &resource_type, &cancel)
                .await;
        tally.record(&outcome);
    }

    tracing::debug!(
        "Worker {} finished after {} resource types",
        worker_id,
        tally.resource_types
    );
    tally
}
