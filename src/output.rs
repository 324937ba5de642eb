//! Record output
//!
//! Renders each record as a pretty JSON or YAML document on stdout.

use crate::pipeline::ItemHandler;
use crate::resource::DetailedRecord;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;

/// Document format for printed records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Render one record as a standalone document (no trailing newline)
pub fn render(record: &DetailedRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(record).context("Failed to marshal item to JSON")
        }
        OutputFormat::Yaml => {
            let body = serde_yaml::to_string(record).context("Failed to marshal item to YAML")?;
            Ok(format!("---\n{}", body.trim_end()))
        }
    }
}

/// Item handler printing every record to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordPrinter {
    format: OutputFormat,
}

impl RecordPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ItemHandler for RecordPrinter {
    fn handle(&self, record: DetailedRecord) -> Result<()> {
        let rendered = render(&record, self.format)?;
        // One lock per document keeps concurrent workers from interleaving
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", rendered).context("Failed to write record to stdout")?;
        Ok(())
    }
}
