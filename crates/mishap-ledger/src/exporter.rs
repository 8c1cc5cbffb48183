//! Export ledger entries for narrative consumers and offline analysis

use crate::error::{Error, Result};
use crate::query::Auditor;
use mishap_core::{Axis, LedgerEntry};
use serde::Serialize;
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format
    Json,
    /// CSV format, one row per entry with final axis values
    Csv,
    /// Human-readable text format
    Text,
}

/// Exporter over a set of ledger entries
pub struct Exporter<'a> {
    entries: &'a [LedgerEntry],
}

impl<'a> Exporter<'a> {
    pub fn new(entries: &'a [LedgerEntry]) -> Self {
        Self { entries }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => Ok(self.to_csv()),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(e.to_string()))?;
        Ok(())
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(&self.data(), ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.data()).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("character,seq,action,room,outcome,interpretation,blame");
        for axis in Axis::ALL {
            output.push(',');
            output.push_str(axis.as_str());
        }
        output.push_str(",factors\n");

        for entry in self.entries {
            let record = &entry.record;
            output.push_str(&format!(
                "{},{},{},{},{},{},{:.3}",
                record.character.raw(),
                entry.id.seq,
                csv_field(record.action.as_str()),
                csv_field(record.room.as_str()),
                record.outcome,
                record.interpretation,
                record.blame_weight
            ));
            for axis in Axis::ALL {
                output.push_str(&format!(",{}", record.axes.get(axis).final_value));
            }
            let factors: Vec<&str> = record.contributing_factors.iter().map(|f| f.as_str()).collect();
            output.push(',');
            output.push_str(&csv_field(&factors.join(";")));
            output.push('\n');
        }

        output
    }

    pub fn to_text(&self) -> String {
        let report = Auditor::new(self.entries).generate_report();
        let mut output = String::new();

        output.push_str("=== Ledger Export ===\n\n");
        output.push_str(&format!("Total entries: {}\n", report.total_entries));
        output.push_str(&format!("Mean blame: {:.3}\n", report.mean_blame));
        output.push_str("\n=== Entries ===\n");

        let mut current = None;
        for entry in self.entries {
            let record = &entry.record;
            if current != Some(record.character) {
                output.push_str(&format!("\n--- {} ---\n", record.character));
                current = Some(record.character);
            }
            output.push_str(&format!(
                "  #{} {} in {}: {} ({}, blame {:.2})\n",
                entry.id.seq,
                record.action,
                record.room,
                record.outcome,
                record.interpretation,
                record.blame_weight
            ));
            if record.unarmed {
                output.push_str("      unarmed\n");
            }
            if !record.contributing_factors.is_empty() {
                let factors: Vec<&str> =
                    record.contributing_factors.iter().map(|f| f.as_str()).collect();
                output.push_str(&format!("      factors: {}\n", factors.join(", ")));
            }
            if let Some(previous) = record.supersedes {
                output.push_str(&format!("      supersedes {}\n", previous));
            }
        }

        output
    }

    fn data(&self) -> ExportData<'a> {
        ExportData {
            version: 1,
            entries: self.entries,
        }
    }
}

/// Quote a free-text CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[derive(Debug, Serialize)]
struct ExportData<'a> {
    version: u32,
    entries: &'a [LedgerEntry],
}
