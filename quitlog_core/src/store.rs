//! User record persistence with file locking.
//!
//! The profile model never touches the filesystem; it only consumes an
//! already-deserialized [`UserRecord`]. This module is the one storage
//! backend: a JSON file written atomically under an exclusive lock.

use crate::{Error, Result, UserRecord};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl UserRecord {
    /// Load the record from a file with shared locking
    ///
    /// Returns `None` if no record has been saved yet. A record that
    /// cannot be parsed is an error: it is the user's whole history and
    /// must not be silently replaced.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("No record file at {:?}", path);
            return Ok(None);
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let record = serde_json::from_str::<UserRecord>(&contents).map_err(|e| {
            tracing::warn!("Failed to parse record file {:?}: {}", path, e);
            Error::Json(e)
        })?;

        tracing::debug!(
            "Loaded record with {} segments from {:?}",
            record.segments.len(),
            path
        );
        Ok(Some(record))
    }

    /// Save the record with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("record path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved record to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sex, TimeSegment};
    use chrono::NaiveDate;

    fn sample_record() -> UserRecord {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2019, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        UserRecord {
            sex: Sex::Male,
            birth_day: NaiveDate::from_ymd_opt(1979, 6, 29)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            cigarettes_per_day: 20,
            segments: vec![
                TimeSegment {
                    smoking: true,
                    start_time: day(1),
                    end_time: Some(day(3)),
                    spent: 0,
                },
                TimeSegment {
                    smoking: false,
                    start_time: day(3),
                    end_time: None,
                    spent: 500,
                },
            ],
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("record.json");

        let record = sample_record();
        record.save(&path).unwrap();

        let loaded = UserRecord::load(&path).unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.json");
        assert!(UserRecord::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_record_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("record.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let result = UserRecord::load(&path);
        assert!(matches!(result, Err(Error::Json(_))));
        // the broken file is left in place for the user to inspect
        assert!(path.exists());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("record.json");

        sample_record().save(&path).unwrap();
        sample_record().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "record.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("record.json");
        std::fs::write(
            &path,
            r#"{
                "sex": "female",
                "birth_day": "1990-02-01T00:00:00",
                "cigarettes_per_day": 8,
                "segments": [{"smoking": true, "start_time": "2019-01-01T00:00:00"}]
            }"#,
        )
        .unwrap();

        let loaded = UserRecord::load(&path).unwrap().unwrap();
        assert_eq!(loaded.sex, Sex::Female);
        assert_eq!(loaded.segments[0].end_time, None);
        assert_eq!(loaded.segments[0].spent, 0);
    }
}
