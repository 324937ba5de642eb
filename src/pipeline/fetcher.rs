//! Batch Fetcher
//!
//! Turns one resource type's identifier list into detail fetches of at most
//! [`BATCH_SIZE`] keys each.

use super::report::BatchSummary;
use super::ItemHandler;
use crate::resource::{BatchResponse, ItemIdentifier, RegistryClient};
use tokio_util::sync::CancellationToken;

/// Maximum number of keys per detail fetch (BatchGetResourceConfig limit)
pub const BATCH_SIZE: usize = 20;

/// Fetch details for `identifiers` in order, one batch at a time.
///
/// Empty identifiers are dropped first. A failed batch is logged with its
/// keys and the next batch is still attempted.
pub async fn fetch_in_batches(
    registry: &dyn RegistryClient,
    handler: &dyn ItemHandler,
    resource_type: &str,
    identifiers: &[ItemIdentifier],
    cancel: &CancellationToken,
) -> BatchSummary {
    let valid: Vec<ItemIdentifier> = identifiers
        .iter()
        .filter(|id| !id.is_empty())
        .cloned()
        .collect();

    let mut summary = BatchSummary {
        valid_identifiers: valid.len(),
        skipped_identifiers: identifiers.len() - valid.len(),
        ..BatchSummary::default()
    };

    if valid.is_empty() {
        tracing::info!("No valid resources found for {}", resource_type);
        return summary;
    }

    for (index, chunk) in valid.chunks(BATCH_SIZE).enumerate() {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            tracing::warn!(
                "Cancelled before batch {} of {}, remaining keys skipped",
                index + 1,
                resource_type
            );
            break;
        }

        tracing::debug!(
            "Fetching config for {} batch {} with resource keys: {:?}",
            resource_type,
            index + 1,
            chunk
        );
        summary.fetch_calls += 1;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                summary.cancelled = true;
                tracing::warn!("Cancelled while fetching batch {} of {}", index + 1, resource_type);
                break;
            }
            response = registry.fetch_details(resource_type, chunk) => response,
        };

        match response {
            Ok(response) => deliver(handler, resource_type, response, &mut summary),
            Err(err) => {
                summary.failed_batches += 1;
                tracing::error!(
                    "Error fetching config for {} with resource keys {:?}: {:#}",
                    resource_type,
                    chunk,
                    err
                );
            }
        }
    }

    summary
}

fn deliver(
    handler: &dyn ItemHandler,
    resource_type: &str,
    response: BatchResponse,
    summary: &mut BatchSummary,
) {
    for record in response.records {
        let resource_id = record.resource_id.clone().unwrap_or_default();
        summary.records_delivered += 1;
        if let Err(err) = handler.handle(record) {
            summary.handler_failures += 1;
            tracing::error!(
                "Error handling item {} for {}: {:#}",
                resource_id,
                resource_type,
                err
            );
        }
    }

    if !response.unprocessed.is_empty() {
        summary.unprocessed_keys += response.unprocessed.len();
        tracing::warn!(
            "{} keys for {} were not processed by the registry: {:?}",
            response.unprocessed.len(),
            resource_type,
            response.unprocessed
        );
    }
}
