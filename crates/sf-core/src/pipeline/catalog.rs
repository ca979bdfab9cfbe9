//! Catalog stage: song catalog records to the songs and artists dimensions.

use crate::transform::{dedup, project_all};
use sf_common::{ArtistRow, Record, Result, SongRow};
use tracing::info;

/// Dimension tables derived from the song catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogTables {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
}

/// Build the songs and artists tables.
///
/// Both are projected from the same records, typed, then deduplicated on
/// the full typed row, so `200` and `200.0` collapse into one duration.
pub fn build_catalog_tables(records: &[Record]) -> Result<CatalogTables> {
    let songs = project_all(records, SongRow::COLUMNS)?
        .iter()
        .map(SongRow::from_record)
        .collect::<Result<Vec<_>>>()?;
    let songs = dedup(&songs);

    let artists = project_all(records, ArtistRow::COLUMNS)?
        .iter()
        .map(ArtistRow::from_record)
        .collect::<Result<Vec<_>>>()?;
    let artists = dedup(&artists);

    info!(
        records = records.len(),
        songs = songs.len(),
        artists = artists.len(),
        "catalog tables built"
    );
    Ok(CatalogTables { songs, artists })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_common::{Error, Value};

    fn catalog(song_id: &str, artist_id: &str, location: Value) -> Record {
        Record::new()
            .with("num_songs", 1i64)
            .with("artist_id", artist_id)
            .with("artist_latitude", Value::Null)
            .with("artist_longitude", Value::Null)
            .with("artist_location", location)
            .with("artist_name", "Artist")
            .with("song_id", song_id)
            .with("title", "Title")
            .with("duration", 152.92036)
            .with("year", 0i64)
    }

    #[test]
    fn test_shared_artist_collapses() {
        let records = vec![
            catalog("S1", "AR1", Value::from("NY")),
            catalog("S2", "AR1", Value::from("NY")),
            catalog("S1", "AR1", Value::from("NY")),
        ];
        let tables = build_catalog_tables(&records).unwrap();
        assert_eq!(tables.songs.len(), 2);
        assert_eq!(tables.artists.len(), 1);
        assert_eq!(tables.artists[0].artist_location.as_deref(), Some("NY"));
        assert_eq!(tables.artists[0].artist_latitude, None);
    }

    #[test]
    fn test_whole_number_floats_collapse_after_typing() {
        let int_encoded = catalog("S1", "AR1", Value::from("NY"))
            .with("duration", 200i64)
            .with("artist_latitude", 40i64);
        let float_encoded = catalog("S1", "AR1", Value::from("NY"))
            .with("duration", 200.0)
            .with("artist_latitude", 40.0);
        let tables = build_catalog_tables(&[int_encoded, float_encoded]).unwrap();
        assert_eq!(tables.songs.len(), 1);
        assert_eq!(tables.songs[0].duration, 200.0);
        assert_eq!(tables.artists.len(), 1);
        assert_eq!(tables.artists[0].artist_latitude, Some(40.0));
    }

    #[test]
    fn test_null_location_kept() {
        let tables = build_catalog_tables(&[catalog("S1", "AR1", Value::Null)]).unwrap();
        assert_eq!(tables.artists[0].artist_location, None);
    }

    #[test]
    fn test_missing_title_fails() {
        let mut record = Record::new();
        for (name, value) in catalog("S1", "AR1", Value::Null).iter() {
            if name != "title" {
                record.insert(name, value.clone());
            }
        }
        assert!(matches!(
            build_catalog_tables(&[record]),
            Err(Error::MissingField { ref field, .. }) if field == "title"
        ));
    }
}
