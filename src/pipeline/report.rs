//! Run accounting
//!
//! Each worker keeps its own tally; the dispatcher folds them together once
//! every worker has exited.

/// What happened to the batches of one resource type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub valid_identifiers: usize,
    /// Empty identifiers dropped before batching
    pub skipped_identifiers: usize,
    pub fetch_calls: usize,
    pub failed_batches: usize,
    /// Records handed to the item handler, whether or not it succeeded
    pub records_delivered: usize,
    pub handler_failures: usize,
    pub unprocessed_keys: usize,
    /// Stopped early by cancellation
    pub cancelled: bool,
}

/// Outcome of processing one resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOutcome {
    NoResources,
    ListingFailed,
    Cancelled,
    Fetched(BatchSummary),
}

/// Aggregate tally for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub resource_types: usize,
    pub empty_types: usize,
    pub no_valid_types: usize,
    pub listing_failures: usize,
    pub cancelled_types: usize,
    pub fetch_calls: usize,
    pub batch_failures: usize,
    pub records_delivered: usize,
    pub handler_failures: usize,
    pub unprocessed_keys: usize,
    pub skipped_identifiers: usize,
}

impl RunReport {
    /// Account for one processed resource type
    pub fn record(&mut self, outcome: &TypeOutcome) {
        self.resource_types += 1;
        match outcome {
            TypeOutcome::NoResources => self.empty_types += 1,
            TypeOutcome::ListingFailed => self.listing_failures += 1,
            TypeOutcome::Cancelled => self.cancelled_types += 1,
            TypeOutcome::Fetched(summary) => {
                if summary.valid_identifiers == 0 {
                    self.no_valid_types += 1;
                }
                if summary.cancelled {
                    self.cancelled_types += 1;
                }
                self.fetch_calls += summary.fetch_calls;
                self.batch_failures += summary.failed_batches;
                self.records_delivered += summary.records_delivered;
                self.handler_failures += summary.handler_failures;
                self.unprocessed_keys += summary.unprocessed_keys;
                self.skipped_identifiers += summary.skipped_identifiers;
            }
        }
    }

    /// Fold another tally into this one
    pub fn merge(&mut self, other: &RunReport) {
        self.resource_types += other.resource_types;
        self.empty_types += other.empty_types;
        self.no_valid_types += other.no_valid_types;
        self.listing_failures += other.listing_failures;
        self.cancelled_types += other.cancelled_types;
        self.fetch_calls += other.fetch_calls;
        self.batch_failures += other.batch_failures;
        self.records_delivered += other.records_delivered;
        self.handler_failures += other.handler_failures;
        self.unprocessed_keys += other.unprocessed_keys;
        self.skipped_identifiers += other.skipped_identifiers;
    }

    /// Any listing or batch fetch failed
    pub fn has_failures(&self) -> bool {
        self.listing_failures > 0 || self.batch_failures > 0
    }

    /// At least one type ran and none of them could be listed
    pub fn all_types_failed(&self) -> bool {
        self.resource_types > 0 && self.listing_failures == self.resource_types
    }
}
