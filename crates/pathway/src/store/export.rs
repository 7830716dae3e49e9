//! Denormalized flat-file export of the rebuilt store.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::{PathwayError, Result};
use crate::input::Cell;

/// Left join of students with their job and career path.
pub const EXPORT_QUERY: &str = "
SELECT s.uuid, s.first_name, s.last_name, s.dob, s.sex, s.mailing_address, s.email,
    s.num_course_taken, s.time_spent_hrs,
    j.job_id, j.job_category, j.avg_salary,
    c.career_path_id, c.career_path_name, c.hours_to_complete
FROM cademycode_students s
LEFT JOIN cademycode_student_jobs j ON s.job_id = j.job_id
LEFT JOIN cademycode_courses c ON s.current_career_path_id = c.career_path_id
";

/// Header row of the export file.
pub const EXPORT_COLUMNS: &[&str] = &[
    "uuid",
    "first_name",
    "last_name",
    "dob",
    "sex",
    "mailing_address",
    "email",
    "num_course_taken",
    "time_spent_hrs",
    "job_id",
    "job_category",
    "avg_salary",
    "career_path_id",
    "career_path_name",
    "hours_to_complete",
];

/// Write the joined snapshot to `path` as CSV, replacing any existing file.
///
/// Returns the number of data rows written.
pub fn export_csv(conn: &Connection, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let io_err = |source: csv::Error| PathwayError::ExportIo {
        path: path.to_path_buf(),
        source,
    };

    let mut stmt = conn
        .prepare(EXPORT_QUERY)
        .map_err(|source| PathwayError::Export { source })?;
    let width = stmt.column_count();

    let records = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(|v| Cell::from(v).render()))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .map_err(|source| PathwayError::Export { source })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|source| PathwayError::Export { source })?;

    let mut writer = csv::Writer::from_path(path).map_err(io_err)?;
    writer.write_record(EXPORT_COLUMNS).map_err(io_err)?;
    for record in &records {
        writer.write_record(record).map_err(io_err)?;
    }
    writer.flush().map_err(|e| io_err(e.into()))?;

    info!(path = %path.display(), rows = records.len(), "Dataframe loaded to {} successfully.", path.display());
    Ok(records.len())
}
