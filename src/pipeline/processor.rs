//! Type Processor
//!
//! Resolves one resource type end to end: drain the listing, then batch fetch.

use super::fetcher::fetch_in_batches;
use super::report::TypeOutcome;
use super::ItemHandler;
use crate::resource::{ItemIdentifier, RegistryClient};
use anyhow::Result;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// Process one resource type. Failures stay local to this type.
pub async fn process_resource_type(
    registry: &dyn RegistryClient,
    handler: &dyn ItemHandler,
    resource_type: &str,
    cancel: &CancellationToken,
) -> TypeOutcome {
    if cancel.is_cancelled() {
        tracing::debug!("Skipping {} after cancellation", resource_type);
        return TypeOutcome::Cancelled;
    }

    let identifiers = match collect_identifiers(registry, resource_type, cancel).await {
        Ok(identifiers) => identifiers,
        Err(_) if cancel.is_cancelled() => {
            tracing::warn!("Listing for {} cancelled", resource_type);
            return TypeOutcome::Cancelled;
        }
        Err(err) => {
            tracing::error!("Error getting resource IDs for {}: {:#}", resource_type, err);
            return TypeOutcome::ListingFailed;
        }
    };

    if identifiers.is_empty() {
        tracing::info!("No resources found for {}", resource_type);
        return TypeOutcome::NoResources;
    }

    tracing::debug!(
        "Processing {} with {} resource IDs",
        resource_type,
        identifiers.len()
    );

    let summary = fetch_in_batches(registry, handler, resource_type, &identifiers, cancel).await;
    TypeOutcome::Fetched(summary)
}

/// Drain every page of the listing
async fn collect_identifiers(
    registry: &dyn RegistryClient,
    resource_type: &str,
    cancel: &CancellationToken,
) -> Result<Vec<ItemIdentifier>> {
    let mut pages = registry.list_identifiers(resource_type);
    let mut identifiers = Vec::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => anyhow::bail!("listing {} cancelled", resource_type),
            next = pages.next() => next,
        };

        match next {
            Some(identifier) => identifiers.push(identifier?),
            None => return Ok(identifiers),
        }
    }
}
