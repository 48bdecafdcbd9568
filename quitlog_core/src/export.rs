//! CSV export of the timeline.

use crate::{Result, TimeSegment};
use chrono::NaiveDateTime;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    state: &'static str,
    start_time: String,
    end_time: Option<String>,
    spent: i64,
    duration_seconds: i64,
}

impl CsvRow {
    fn new(segment: &TimeSegment, now: NaiveDateTime) -> Self {
        CsvRow {
            state: if segment.smoking {
                "smoking"
            } else {
                "abstaining"
            },
            start_time: segment.start_time.to_string(),
            end_time: segment.end_time.map(|t| t.to_string()),
            spent: segment.spent,
            duration_seconds: segment.duration_until(now).num_seconds(),
        }
    }
}

/// Write every segment to `path` as CSV, replacing any existing file.
///
/// The open segment's duration is measured up to `now`. Returns the
/// number of rows written.
pub fn export_timeline_csv(
    segments: &[TimeSegment],
    now: NaiveDateTime,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for segment in segments {
        writer.serialize(CsvRow::new(segment, now))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} segments to {:?}", segments.len(), path);
    Ok(segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_export_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("timeline.csv");

        let segments = vec![
            TimeSegment {
                smoking: true,
                start_time: day(1),
                end_time: Some(day(2)),
                spent: 0,
            },
            TimeSegment {
                smoking: false,
                start_time: day(2),
                end_time: None,
                spent: 500,
            },
        ];

        let written = export_timeline_csv(&segments, day(4), &path).unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["state", "start_time", "end_time", "spent", "duration_seconds"]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "smoking");
        assert_eq!(&rows[0][4], "86400");
        assert_eq!(&rows[1][0], "abstaining");
        assert_eq!(&rows[1][2], "");
        assert_eq!(&rows[1][3], "500");
        assert_eq!(&rows[1][4], "172800");
    }
}
