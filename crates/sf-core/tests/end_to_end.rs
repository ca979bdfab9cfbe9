//! End-to-end runs over a single catalog record and a single play.

use sf_common::{Record, Value};
use sf_config::EtlConfig;
use sf_core::pipeline::{build_activity_tables, build_catalog_tables};
use sf_core::{run_stage, EtlContext, MemorySource, Stage};
use sf_store::{read_songs, MemorySink, ParquetDirSink, TableName, PART_FILE_NAME, SUCCESS_MARKER};
use tempfile::tempdir;

fn catalog_record() -> Record {
    Record::new()
        .with("song_id", "S1")
        .with("title", "Song A")
        .with("artist_id", "AR1")
        .with("artist_name", "Artist1")
        .with("year", 2000i64)
        .with("duration", 200.0)
        .with("artist_location", "NY")
        .with("artist_latitude", 40.7)
        .with("artist_longitude", -74.0)
}

fn activity_record() -> Record {
    Record::new()
        .with("page", "NextSong")
        .with("ts", 946684800000i64)
        .with("song", "Song A")
        .with("userId", "U1")
        .with("firstName", "Jo")
        .with("lastName", "Doe")
        .with("gender", "F")
        .with("level", "free")
        .with("sessionId", 1i64)
        .with("location", "NY")
        .with("userAgent", "UA")
}

fn source() -> MemorySource {
    MemorySource::new(vec![catalog_record()], vec![activity_record()])
}

#[test]
fn single_record_yields_one_row_per_table() {
    let catalog = build_catalog_tables(&[catalog_record()]).unwrap();
    assert_eq!(catalog.songs.len(), 1);
    assert_eq!(catalog.songs[0].song_id, "S1");
    assert_eq!(catalog.artists.len(), 1);
    assert_eq!(catalog.artists[0].artist_id, "AR1");

    let activity =
        build_activity_tables(&[activity_record()], &catalog.songs, &Default::default()).unwrap();
    assert_eq!(activity.users.len(), 1);
    assert_eq!(activity.users[0].user_id, "U1");
    assert_eq!(activity.time.len(), 1);
    assert_eq!(activity.time[0].start_time, 946684800);
    assert_eq!(activity.time[0].year, 2000);
    assert_eq!(activity.songplays.len(), 1);
    let play = &activity.songplays[0];
    assert_eq!(play.songplay_id, 1);
    assert_eq!(play.song_id.as_deref(), Some("S1"));
    assert_eq!(play.artist_id.as_deref(), Some("AR1"));
    assert_eq!((play.year, play.month), (2000, 1));
}

#[test]
fn full_run_writes_every_table() {
    let ctx = EtlContext::from_config(EtlConfig::default());
    let mut sink = MemorySink::default();
    let report = run_stage(&ctx, Stage::All, &source(), &mut sink).unwrap();

    assert_eq!(report.tables.len(), 5);
    for table in TableName::ALL {
        assert_eq!(sink.row_count(table), 1, "{table}");
        assert!(sink.is_finished(table), "{table}");
    }
    assert_eq!(
        sink.units(TableName::Songs)[0].partition,
        "year=2000/artist_id=AR1"
    );
    assert_eq!(sink.units(TableName::Songplays)[0].partition, "year=2000/month=1");
    let join = report.join.unwrap();
    assert_eq!(join.matched_left_rows, 1);

    let songplays = sink.pretty(TableName::Songplays).unwrap();
    assert!(songplays.contains("S1"));
    assert!(songplays.contains("AR1"));
    assert!(songplays.contains("946684800"));
}

#[test]
fn logs_stage_reads_songs_written_by_songs_stage() {
    let dir = tempdir().unwrap();
    let mut config = EtlConfig::default();
    config.output.root = dir.path().to_path_buf();
    let ctx = EtlContext::from_config(config);
    let mut sink = ParquetDirSink::new(dir.path(), ctx.writer_config().compression);

    let songs = run_stage(&ctx, Stage::Songs, &source(), &mut sink).unwrap();
    assert_eq!(songs.tables.len(), 2);
    assert!(songs.join.is_none());
    assert_eq!(read_songs(dir.path()).unwrap().len(), 1);

    let logs = run_stage(&ctx, Stage::Logs, &source(), &mut sink).unwrap();
    assert_eq!(logs.tables.len(), 3);
    assert_eq!(logs.join.unwrap().matched_left_rows, 1);

    for table in ["songs", "artists", "users", "time", "songplays"] {
        assert!(dir.path().join(table).join(SUCCESS_MARKER).is_file(), "{table}");
    }
    assert!(dir
        .path()
        .join("songplays/year=2000/month=1")
        .join(PART_FILE_NAME)
        .is_file());
    assert!(dir.path().join("users").join(PART_FILE_NAME).is_file());
}

#[test]
fn logs_stage_without_songs_fails() {
    let dir = tempdir().unwrap();
    let mut config = EtlConfig::default();
    config.output.root = dir.path().to_path_buf();
    let ctx = EtlContext::from_config(config);
    let mut sink = MemorySink::default();

    let err = run_stage(&ctx, Stage::Logs, &source(), &mut sink).unwrap_err();
    assert_eq!(err.exit_code(), sf_core::ExitCode::IoError);
}

#[test]
fn unmatched_play_keeps_null_keys() {
    let mut play = activity_record();
    play.insert("song", Value::Null);
    let ctx = EtlContext::from_config(EtlConfig::default());
    let mut sink = MemorySink::default();
    let source = MemorySource::new(vec![catalog_record()], vec![play]);

    let report = run_stage(&ctx, Stage::All, &source, &mut sink).unwrap();
    let join = report.join.unwrap();
    assert_eq!(join.unmatched_left_rows, 1);
    assert_eq!(sink.row_count(TableName::Songplays), 1);
}

#[test]
fn whole_number_duration_does_not_duplicate_song() {
    let float_encoded = catalog_record();
    let int_encoded = catalog_record().with("duration", 200i64);
    let source = MemorySource::new(vec![float_encoded, int_encoded], vec![activity_record()]);
    let ctx = EtlContext::from_config(EtlConfig::default());
    let mut sink = MemorySink::default();

    let report = run_stage(&ctx, Stage::All, &source, &mut sink).unwrap();
    assert_eq!(sink.row_count(TableName::Songs), 1);
    assert_eq!(sink.row_count(TableName::Artists), 1);
    assert_eq!(sink.row_count(TableName::Songplays), 1);
    assert_eq!(report.join.unwrap().fan_out_rows, 0);
}
