//! AWS Config Client
//!
//! [`RegistryClient`] implementation over the AWS Config service API:
//! `ListDiscoveredResources` for listing, `BatchGetResourceConfig` for details.

use super::auth::{load_sdk_config, AwsSettings};
use crate::resource::{BatchResponse, DetailedRecord, ItemIdentifier, RegistryClient};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_config::error::DisplayErrorContext;
use aws_sdk_config::types::{ResourceKey, ResourceType};
use aws_sdk_config::Client;
use futures::stream::{self, BoxStream, StreamExt};

/// AWS Config backed registry
#[derive(Clone)]
pub struct ConfigServiceRegistry {
    client: Client,
    include_deleted: bool,
}

impl ConfigServiceRegistry {
    /// Create a registry from a loaded SDK config
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(Client::new(sdk_config))
    }

    /// Wrap an already configured service client
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            include_deleted: false,
        }
    }

    /// Also list resources AWS Config has recorded as deleted
    pub fn include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    /// Resolve credentials, build the client and check the service answers
    pub async fn connect(settings: &AwsSettings) -> Result<Self> {
        let sdk_config = load_sdk_config(settings).await?;
        let registry = Self::new(&sdk_config);
        registry.check_recorder().await?;
        Ok(registry)
    }

    /// Fails if AWS Config cannot be reached; warns if nothing is recording
    pub async fn check_recorder(&self) -> Result<()> {
        tracing::info!("Checking AWS Config connectivity");

        let output = self
            .client
            .describe_configuration_recorders()
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .context("Failed to reach AWS Config")?;

        if output.configuration_recorders().is_empty() {
            tracing::warn!("No configuration recorder in this region, listings will be empty");
        } else {
            tracing::info!(
                "AWS Config reachable ({} recorders)",
                output.configuration_recorders().len()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryClient for ConfigServiceRegistry {
    fn list_identifiers<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> BoxStream<'a, Result<ItemIdentifier>> {
        let pages = self
            .client
            .list_discovered_resources()
            .resource_type(ResourceType::from(resource_type))
            .include_deleted_resources(self.include_deleted)
            .into_paginator()
            .send();

        // Some(pages) while more pages may follow; None after an error
        stream::unfold(Some(pages), move |state| async move {
            let mut pages = state?;
            match pages.next().await? {
                Ok(page) => {
                    let identifiers: Vec<Result<ItemIdentifier>> = page
                        .resource_identifiers()
                        .iter()
                        .map(|resource| Ok(resource.resource_id().unwrap_or_default().to_string()))
                        .collect();
                    Some((stream::iter(identifiers), Some(pages)))
                }
                Err(err) => {
                    let err = anyhow!("{}", DisplayErrorContext(&err))
                        .context(format!("Failed to list {}", resource_type));
                    Some((stream::iter(vec![Err(err)]), None))
                }
            }
        })
        .flatten()
        .boxed()
    }

    async fn fetch_details(
        &self,
        resource_type: &str,
        identifiers: &[ItemIdentifier],
    ) -> Result<BatchResponse> {
        let keys = identifiers
            .iter()
            .map(|id| {
                ResourceKey::builder()
                    .resource_type(ResourceType::from(resource_type))
                    .resource_id(id)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to build resource keys")?;

        let output = self
            .client
            .batch_get_resource_config()
            .set_resource_keys(Some(keys))
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;

        let records = output
            .base_configuration_items()
            .iter()
            .map(DetailedRecord::from)
            .collect();
        let unprocessed = output
            .unprocessed_resource_keys()
            .iter()
            .map(|key| key.resource_id().to_string())
            .collect();

        Ok(BatchResponse {
            records,
            unprocessed,
        })
    }
}
