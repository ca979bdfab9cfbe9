//! Run summary: what a run wrote, printed and persisted next to the
//! tables.

use crate::context::EtlContext;
use crate::error::{PipelineError, Result};
use crate::pipeline::{Stage, StageReport};
use crate::transform::JoinStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sf_common::{OutputFormat, SCHEMA_VERSION};
use sf_store::TableName;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name of the persisted summary at the output root.
pub const SUMMARY_FILE_NAME: &str = "_run_summary.json";

/// Per-table counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table: TableName,
    pub rows: usize,
    pub partitions: usize,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub schema_version: String,
    pub run_id: String,
    pub stage: Stage,
    pub config_source: String,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tables: Vec<TableSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinStats>,
    pub skipped_timestamps: usize,
}

impl RunSummary {
    pub fn new(ctx: &EtlContext, stage: Stage, report: &StageReport) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: ctx.run_id.to_string(),
            stage,
            config_source: ctx.config_source.to_string(),
            input_root: ctx.config.input.root.clone(),
            output_root: ctx.config.output.root.clone(),
            started_at: ctx.started_at,
            finished_at: Utc::now(),
            tables: report
                .tables
                .iter()
                .map(|t| TableSummary {
                    table: t.table,
                    rows: t.rows,
                    partitions: t.partitions.len(),
                })
                .collect(),
            join: report.join,
            skipped_timestamps: report.skipped_timestamps,
        }
    }

    /// Render for stdout.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Summary => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let elapsed = self.finished_at - self.started_at;
        let _ = writeln!(
            out,
            "# Run {} ({}, {} ms)",
            self.run_id,
            self.stage,
            elapsed.num_milliseconds()
        );
        let _ = writeln!(out, "  config: {}", self.config_source);
        let _ = writeln!(out, "  output: {}", self.output_root.display());
        for t in &self.tables {
            let _ = writeln!(
                out,
                "  {:<10} {:>8} rows  {:>5} partitions",
                t.table.as_str(),
                t.rows,
                t.partitions
            );
        }
        if let Some(join) = &self.join {
            let _ = writeln!(
                out,
                "  join: {} plays, {} matched, {} unmatched, {} fan-out",
                join.left_rows, join.matched_left_rows, join.unmatched_left_rows, join.fan_out_rows
            );
        }
        if self.skipped_timestamps > 0 {
            let _ = writeln!(out, "  skipped timestamps: {}", self.skipped_timestamps);
        }
        out
    }

    /// Persist as `<root>/_run_summary.json`.
    pub fn save(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(SUMMARY_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::create_dir_all(root)
            .and_then(|()| std::fs::write(&path, json))
            .map_err(|source| PipelineError::Summary {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
