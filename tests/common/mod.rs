//! In-memory registry and handler used by the pipeline tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cfginv::pipeline::ItemHandler;
use cfginv::resource::{BatchResponse, DetailedRecord, ItemIdentifier, RegistryClient};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Canned listing for one resource type
#[derive(Debug, Clone)]
pub enum Listing {
    /// Pages returned in order
    Pages(Vec<Vec<String>>),
    /// Pages returned in order, then a failing page
    FailsAfter(Vec<Vec<String>>),
}

/// Fake registry: echoes one record per identifier and counts calls
#[derive(Default)]
pub struct FakeRegistry {
    listings: HashMap<String, Listing>,
    /// (resource type, zero-based batch index) pairs that fail
    failing_batches: HashSet<(String, usize)>,
    /// Identifiers reported back as unprocessed instead of returned
    unprocessed: HashSet<String>,
    list_calls: Mutex<HashMap<String, usize>>,
    fetch_calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single page listing
    pub fn with_items(self, resource_type: &str, ids: Vec<String>) -> Self {
        self.with_listing(resource_type, Listing::Pages(vec![ids]))
    }

    pub fn with_listing(mut self, resource_type: &str, listing: Listing) -> Self {
        self.listings.insert(resource_type.to_string(), listing);
        self
    }

    pub fn failing_listing(self, resource_type: &str) -> Self {
        self.with_listing(resource_type, Listing::FailsAfter(Vec::new()))
    }

    pub fn failing_batch(mut self, resource_type: &str, batch_index: usize) -> Self {
        self.failing_batches
            .insert((resource_type.to_string(), batch_index));
        self
    }

    pub fn unprocessed(mut self, id: &str) -> Self {
        self.unprocessed.insert(id.to_string());
        self
    }

    pub fn list_calls(&self) -> HashMap<String, usize> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> Vec<(String, Vec<String>)> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn fetch_calls_for(&self, resource_type: &str) -> Vec<Vec<String>> {
        self.fetch_calls()
            .into_iter()
            .filter(|(t, _)| t == resource_type)
            .map(|(_, ids)| ids)
            .collect()
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    fn list_identifiers<'a>(
        &'a self,
        resource_type: &'a str,
    ) -> BoxStream<'a, Result<ItemIdentifier>> {
        *self
            .list_calls
            .lock()
            .unwrap()
            .entry(resource_type.to_string())
            .or_default() += 1;

        let items: Vec<Result<ItemIdentifier>> = match self.listings.get(resource_type) {
            None => Vec::new(),
            Some(Listing::Pages(pages)) => pages.iter().flatten().cloned().map(Ok).collect(),
            Some(Listing::FailsAfter(pages)) => pages
                .iter()
                .flatten()
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(anyhow!(
                    "AccessDeniedException: listing {} denied",
                    resource_type
                ))))
                .collect(),
        };
        stream::iter(items).boxed()
    }

    async fn fetch_details(
        &self,
        resource_type: &str,
        identifiers: &[ItemIdentifier],
    ) -> Result<BatchResponse> {
        let batch_index = {
            let mut calls = self.fetch_calls.lock().unwrap();
            let index = calls.iter().filter(|(t, _)| t == resource_type).count();
            calls.push((resource_type.to_string(), identifiers.to_vec()));
            index
        };

        // Yield so workers genuinely interleave
        tokio::task::yield_now().await;

        if self
            .failing_batches
            .contains(&(resource_type.to_string(), batch_index))
        {
            return Err(anyhow!("ThrottlingException: batch {} rejected", batch_index));
        }

        let (unprocessed, returned): (Vec<_>, Vec<_>) = identifiers
            .iter()
            .cloned()
            .partition(|id| self.unprocessed.contains(id));

        Ok(BatchResponse {
            records: returned
                .iter()
                .map(|id| DetailedRecord::keyed(resource_type, id))
                .collect(),
            unprocessed,
        })
    }
}

/// Handler collecting every record; optionally failing on some ids
#[derive(Default)]
pub struct RecordingHandler {
    records: Mutex<Vec<DetailedRecord>>,
    fail_on: HashSet<String>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.fail_on.insert(id.to_string());
        self
    }

    pub fn records(&self) -> Vec<DetailedRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Delivered (type, id) keys, sorted so runs can be compared as multisets
    pub fn sorted_keys(&self) -> Vec<(String, String)> {
        let mut keys: Vec<_> = self
            .records()
            .into_iter()
            .map(|r| {
                (
                    r.resource_type.unwrap_or_default(),
                    r.resource_id.unwrap_or_default(),
                )
            })
            .collect();
        keys.sort();
        keys
    }
}

impl ItemHandler for RecordingHandler {
    fn handle(&self, record: DetailedRecord) -> Result<()> {
        let id = record.resource_id.clone().unwrap_or_default();
        self.records.lock().unwrap().push(record);
        if self.fail_on.contains(&id) {
            return Err(anyhow!("handler refused {}", id));
        }
        Ok(())
    }
}

/// `count` identifiers named `<prefix>-<n>`
pub fn ids(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|n| format!("{}-{}", prefix, n)).collect()
}

/// Collects formatted log output for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Install as the thread default subscriber until the guard drops.
    /// Spawned tasks only report here on a current-thread runtime.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.lines().into_iter().filter(|line| line.contains(needle)).collect()
    }

    /// Lines logged at `level` ("ERROR", "WARN", "INFO")
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.trim_start().starts_with(level))
            .collect()
    }

    pub fn error_lines(&self) -> Vec<String> {
        self.lines_at("ERROR")
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
