//! Stage orchestration.
//!
//! A run is the catalog stage, the activity stage, or both. The activity
//! stage needs the song dimension fully materialized: in a combined run it
//! is handed over in memory, in a standalone run it is read back from the
//! output root written by an earlier catalog run.

pub mod activity;
pub mod catalog;

pub use activity::{build_activity_tables, filter_plays, ActivityTables};
pub use catalog::{build_catalog_tables, CatalogTables};

use crate::context::EtlContext;
use crate::error::Result;
use crate::source::RecordSource;
use crate::transform::JoinStats;
use serde::Serialize;
use sf_common::SongRow;
use sf_store::{read_songs, write_table, TableSink, WriteReport};
use std::fmt;
use tracing::info;

/// Which part of the job to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Catalog then activity.
    All,
    /// Songs and artists only.
    Songs,
    /// Users, time and songplays against previously written songs.
    Logs,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::All => "all",
            Stage::Songs => "songs",
            Stage::Logs => "logs",
        };
        write!(f, "{s}")
    }
}

/// What a stage wrote.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub tables: Vec<WriteReport>,
    pub join: Option<JoinStats>,
    pub skipped_timestamps: usize,
}

impl StageReport {
    fn merge(&mut self, other: StageReport) {
        self.tables.extend(other.tables);
        if other.join.is_some() {
            self.join = other.join;
        }
        self.skipped_timestamps += other.skipped_timestamps;
    }
}

/// Build and write songs and artists. Returns the song dimension for a
/// following activity stage.
pub fn run_catalog_stage(
    ctx: &EtlContext,
    source: &dyn RecordSource,
    sink: &mut dyn TableSink,
) -> Result<(Vec<SongRow>, StageReport)> {
    let records = source.catalog_records()?;
    let tables = build_catalog_tables(&records)?;

    let writer = ctx.writer_config();
    let reports = vec![
        write_table(sink, &tables.songs, &writer)?,
        write_table(sink, &tables.artists, &writer)?,
    ];

    Ok((
        tables.songs,
        StageReport {
            tables: reports,
            ..Default::default()
        },
    ))
}

/// Build and write users, time and songplays against `songs`.
pub fn run_activity_stage(
    ctx: &EtlContext,
    source: &dyn RecordSource,
    songs: &[SongRow],
    sink: &mut dyn TableSink,
) -> Result<StageReport> {
    let records = source.activity_records()?;
    let tables = build_activity_tables(&records, songs, &ctx.config.pipeline)?;

    let writer = ctx.writer_config();
    let reports = vec![
        write_table(sink, &tables.users, &writer)?,
        write_table(sink, &tables.time, &writer)?,
        write_table(sink, &tables.songplays, &writer)?,
    ];

    Ok(StageReport {
        tables: reports,
        join: Some(tables.join),
        skipped_timestamps: tables.skipped_timestamps,
    })
}

/// Run `stage`. A standalone `Logs` run reads songs from the configured
/// output root.
pub fn run_stage(
    ctx: &EtlContext,
    stage: Stage,
    source: &dyn RecordSource,
    sink: &mut dyn TableSink,
) -> Result<StageReport> {
    info!(run_id = %ctx.run_id, stage = %stage, "stage starting");

    let report = match stage {
        Stage::Songs => run_catalog_stage(ctx, source, sink)?.1,
        Stage::Logs => {
            let songs = read_songs(&ctx.config.output.root)?;
            run_activity_stage(ctx, source, &songs, sink)?
        }
        Stage::All => {
            let (songs, mut report) = run_catalog_stage(ctx, source, sink)?;
            report.merge(run_activity_stage(ctx, source, &songs, sink)?);
            report
        }
    };

    info!(
        run_id = %ctx.run_id,
        stage = %stage,
        tables = report.tables.len(),
        "stage complete"
    );
    Ok(report)
}
