//! Activity stage: listening events to the users, time and songplays
//! tables.

use crate::transform::{
    assign_ids, assign_ids_by_key, decompose, dedup, left_outer_join, project, project_as,
    JoinStats, TemporalRecord,
};
use sf_common::{Record, Result, SongRow, SongplayRow, TimeRow, UserRow};
use sf_config::{InvalidTimestampPolicy, PipelineConfig, SongplayOrder};
use tracing::{debug, info, warn};

const USER_FIELDS: &[(&str, &str)] = &[
    ("userId", "user_id"),
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("gender", "gender"),
    ("level", "level"),
];

const PLAY_FIELDS: &[&str] = &[
    "ts",
    "userId",
    "level",
    "song",
    "sessionId",
    "location",
    "userAgent",
];

/// Tables derived from activity records, plus what happened on the way.
#[derive(Debug, Clone, Default)]
pub struct ActivityTables {
    pub users: Vec<UserRow>,
    pub time: Vec<TimeRow>,
    pub songplays: Vec<SongplayRow>,
    pub join: JoinStats,
    pub skipped_timestamps: usize,
}

/// One play event with its timestamp already decomposed.
#[derive(Debug, Clone)]
struct PlayEvent {
    time: TemporalRecord,
    user_id: String,
    level: String,
    song: Option<String>,
    session_id: i64,
    location: Option<String>,
    user_agent: Option<String>,
}

impl PlayEvent {
    fn from_record(record: &Record, time: TemporalRecord) -> Result<Self> {
        Ok(Self {
            time,
            user_id: record.str_field("userId")?,
            level: record.str_field("level")?,
            song: record.opt_str_field("song")?,
            session_id: record.int_field("sessionId")?,
            location: record.opt_str_field("location")?,
            user_agent: record.opt_str_field("userAgent")?,
        })
    }
}

/// Keep records whose `page` equals `activity_page`.
pub fn filter_plays<'a>(records: &'a [Record], activity_page: &str) -> Result<Vec<&'a Record>> {
    let mut plays = Vec::new();
    for record in records {
        if record.str_field("page")? == activity_page {
            plays.push(record);
        }
    }
    Ok(plays)
}

/// Build the users, time and songplays tables against the song dimension.
pub fn build_activity_tables(
    records: &[Record],
    songs: &[SongRow],
    config: &PipelineConfig,
) -> Result<ActivityTables> {
    let plays = filter_plays(records, &config.activity_page)?;
    debug!(
        records = records.len(),
        plays = plays.len(),
        page = %config.activity_page,
        "activity records filtered"
    );

    let users = build_users(&plays)?;

    let mut skipped_timestamps = 0;
    let mut events = Vec::with_capacity(plays.len());
    for record in &plays {
        let projected = project(record, PLAY_FIELDS)?;
        let ts = projected.int_field("ts")?;
        let time = match decompose(ts) {
            Ok(time) => time,
            Err(err) if config.invalid_timestamps == InvalidTimestampPolicy::Skip => {
                debug!(ts, error = %err, "skipping activity record");
                skipped_timestamps += 1;
                continue;
            }
            Err(err) => return Err(err),
        };
        events.push(PlayEvent::from_record(&projected, time)?);
    }
    if skipped_timestamps > 0 {
        warn!(
            skipped = skipped_timestamps,
            "activity records with invalid timestamps dropped"
        );
    }

    let time_rows: Vec<TimeRow> = events.iter().map(|e| TimeRow::from(e.time)).collect();
    let time = dedup(&time_rows);

    let joined = left_outer_join(
        &events,
        songs,
        |e| e.song.as_deref(),
        |s| s.title.as_str(),
    );
    let join = joined.stats;
    info!(
        left_rows = join.left_rows,
        matched = join.matched_left_rows,
        unmatched = join.unmatched_left_rows,
        fan_out = join.fan_out_rows,
        "songplays joined to songs"
    );

    let pairs = joined.rows;
    let numbered = match config.songplay_order {
        SongplayOrder::Arrival => assign_ids(pairs),
        SongplayOrder::Stable => assign_ids_by_key(pairs, |(e, _)| {
            (e.time.epoch_seconds, e.session_id, e.user_id.clone())
        }),
    };
    let songplays = numbered
        .into_iter()
        .map(|(id, (event, song))| songplay(id, event, song))
        .collect::<Vec<_>>();

    info!(
        users = users.len(),
        time = time.len(),
        songplays = songplays.len(),
        "activity tables built"
    );
    Ok(ActivityTables {
        users,
        time,
        songplays,
        join,
        skipped_timestamps,
    })
}

fn build_users(plays: &[&Record]) -> Result<Vec<UserRow>> {
    let users = plays
        .iter()
        .map(|r| UserRow::from_record(&project_as(r, USER_FIELDS)?))
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup(&users))
}

fn songplay(songplay_id: i64, event: &PlayEvent, song: Option<&SongRow>) -> SongplayRow {
    // Calendar month and year are bounded well inside i32.
    SongplayRow {
        songplay_id,
        start_time: event.time.epoch_seconds,
        user_id: event.user_id.clone(),
        level: event.level.clone(),
        song_id: song.map(|s| s.song_id.clone()),
        artist_id: song.map(|s| s.artist_id.clone()),
        session_id: event.session_id,
        location: event.location.clone(),
        user_agent: event.user_agent.clone(),
        month: event.time.month as i32,
        year: event.time.year,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_common::{Error, Value};

    fn event(ts: i64, user: &str, session: i64, song: Option<&str>) -> Record {
        Record::new()
            .with("artist", Value::Null)
            .with("firstName", "Jo")
            .with("gender", "F")
            .with("lastName", "Doe")
            .with("level", "free")
            .with("location", "NY")
            .with("page", "NextSong")
            .with("sessionId", session)
            .with("song", song)
            .with("ts", ts)
            .with("userAgent", "UA")
            .with("userId", user)
    }

    fn song(id: &str, title: &str, artist: &str) -> SongRow {
        SongRow {
            song_id: id.into(),
            title: title.into(),
            artist_id: artist.into(),
            year: 2000,
            duration: 200.0,
        }
    }

    #[test]
    fn test_non_play_pages_ignored() {
        let mut home = event(1_000, "U2", 1, None);
        home.insert("page", "Home");
        let records = vec![home, event(2_000, "U1", 1, Some("Song A"))];
        let tables =
            build_activity_tables(&records, &[song("S1", "Song A", "AR1")], &PipelineConfig::default())
                .unwrap();
        assert_eq!(tables.users.len(), 1);
        assert_eq!(tables.users[0].user_id, "U1");
        assert_eq!(tables.songplays.len(), 1);
        assert_eq!(tables.songplays[0].song_id.as_deref(), Some("S1"));
    }

    #[test]
    fn test_missing_page_fails() {
        let record = Record::new().with("ts", 1i64);
        assert!(matches!(
            build_activity_tables(&[record], &[], &PipelineConfig::default()),
            Err(Error::MissingField { ref field, .. }) if field == "page"
        ));
    }

    #[test]
    fn test_level_change_yields_two_users() {
        let mut paid = event(2_000, "U1", 1, None);
        paid.insert("level", "paid");
        let records = vec![event(1_000, "U1", 1, None), paid, event(3_000, "U1", 1, None)];
        let tables = build_activity_tables(&records, &[], &PipelineConfig::default()).unwrap();
        assert_eq!(tables.users.len(), 2);
    }

    #[test]
    fn test_time_distinct_per_start_time() {
        // 1500 and 1999 truncate to the same second.
        let records = vec![
            event(1_500, "U1", 1, None),
            event(1_999, "U2", 2, None),
            event(2_000, "U1", 1, None),
        ];
        let tables = build_activity_tables(&records, &[], &PipelineConfig::default()).unwrap();
        assert_eq!(tables.time.len(), 2);
        assert_eq!(tables.songplays.len(), 3);
    }

    #[test]
    fn test_invalid_timestamp_fails_by_default() {
        let records = vec![event(-5, "U1", 1, None)];
        assert!(matches!(
            build_activity_tables(&records, &[], &PipelineConfig::default()),
            Err(Error::InvalidTimestamp { value: -5, .. })
        ));
    }

    #[test]
    fn test_invalid_timestamp_skipped_when_configured() {
        let config = PipelineConfig {
            invalid_timestamps: InvalidTimestampPolicy::Skip,
            ..Default::default()
        };
        let records = vec![event(-5, "U1", 1, None), event(1_000, "U2", 1, None)];
        let tables = build_activity_tables(&records, &[], &config).unwrap();
        assert_eq!(tables.skipped_timestamps, 1);
        assert_eq!(tables.time.len(), 1);
        assert_eq!(tables.songplays.len(), 1);
        assert_eq!(tables.songplays[0].user_id, "U2");
        // Users are not timestamp-dependent.
        assert_eq!(tables.users.len(), 2);
    }

    #[test]
    fn test_duplicate_titles_fan_out() {
        let songs = vec![song("S1", "Same", "AR1"), song("S2", "Same", "AR2")];
        let records = vec![event(1_000, "U1", 1, Some("Same"))];
        let tables = build_activity_tables(&records, &songs, &PipelineConfig::default()).unwrap();
        assert_eq!(tables.songplays.len(), 2);
        assert_eq!(tables.join.fan_out_rows, 1);
        let ids: Vec<i64> = tables.songplays.iter().map(|s| s.songplay_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_stable_order_sorts_before_numbering() {
        let config = PipelineConfig {
            songplay_order: SongplayOrder::Stable,
            ..Default::default()
        };
        let records = vec![
            event(3_000, "U1", 1, None),
            event(1_000, "U2", 2, None),
            event(1_000, "U1", 2, None),
        ];
        let tables = build_activity_tables(&records, &[], &config).unwrap();
        let order: Vec<(i64, i64, &str)> = tables
            .songplays
            .iter()
            .map(|s| (s.songplay_id, s.start_time, s.user_id.as_str()))
            .collect();
        assert_eq!(order, vec![(1, 1, "U1"), (2, 1, "U2"), (3, 3, "U1")]);
    }

    #[test]
    fn test_null_song_never_matches() {
        let songs = vec![song("S1", "Song A", "AR1")];
        let records = vec![event(1_000, "U1", 1, None)];
        let tables = build_activity_tables(&records, &songs, &PipelineConfig::default()).unwrap();
        assert_eq!(tables.songplays[0].song_id, None);
        assert_eq!(tables.songplays[0].artist_id, None);
        assert_eq!(tables.join.unmatched_left_rows, 1);
    }
}
