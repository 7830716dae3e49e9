//! Cleaning engine that turns raw legacy tables into typed tables.

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::error::{PathwayError, Result};
use crate::input::{Cell, DataTable};

use super::coerce::{to_date, to_float, to_integer};
use super::contact::parse_contact;
use super::names::split_name;

/// Raw student columns consumed by the cleaner.
pub const CONTACT_COLUMN: &str = "contact_info";
pub const NAME_COLUMN: &str = "name";
pub const DOB_COLUMN: &str = "dob";

/// Student columns coerced to nullable integers.
pub const STUDENT_INTEGER_COLUMNS: &[&str] = &["job_id", "num_course_taken", "current_career_path_id"];
/// Student columns coerced to nullable floats.
pub const STUDENT_FLOAT_COLUMNS: &[&str] = &["time_spent_hrs"];
/// Job columns coerced to nullable integers.
pub const JOB_INTEGER_COLUMNS: &[&str] = &["job_id", "avg_salary"];
/// Career path columns coerced to nullable integers.
pub const COURSE_INTEGER_COLUMNS: &[&str] = &["career_path_id", "hours_to_complete"];

/// The three tables a pipeline run operates on.
#[derive(Debug, Clone, PartialEq)]
pub struct Tables {
    pub students: DataTable,
    pub courses: DataTable,
    pub jobs: DataTable,
}

/// Summary of what cleaning changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    /// Duplicate rows removed, keyed by table name.
    pub duplicates_removed: IndexMap<String, usize>,
    /// Non-null values that could not be coerced and became null, keyed by
    /// `table.column`.
    pub coerced_to_null: IndexMap<String, usize>,
}

impl CleanReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total duplicate rows removed across all tables.
    pub fn total_duplicates(&self) -> usize {
        self.duplicates_removed.values().sum()
    }

    /// Total values nulled by coercion across all columns.
    pub fn total_coerced_to_null(&self) -> usize {
        self.coerced_to_null.values().sum()
    }

    fn record_duplicates(&mut self, table: &str, removed: usize) {
        self.duplicates_removed.insert(table.to_string(), removed);
    }

    fn record_nulls(&mut self, table: &str, column: &str, nulled: usize) {
        self.coerced_to_null
            .insert(format!("{}.{}", table, column), nulled);
    }
}

/// Engine for cleaning the raw student, course and job tables.
pub struct Cleaner;

impl Cleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self
    }

    /// Clean all three tables.
    ///
    /// Fails fast: any malformed value or missing column aborts the whole
    /// stage and no partially cleaned table is returned.
    pub fn clean(&self, raw: Tables) -> Result<(Tables, CleanReport)> {
        let Tables {
            mut students,
            mut courses,
            mut jobs,
        } = raw;
        let mut report = CleanReport::new();

        for table in [&mut students, &mut courses, &mut jobs] {
            let removed = table.drop_duplicates();
            report.record_duplicates(&table.name, removed);
        }

        self.split_contact(&mut students)?;

        for column in STUDENT_INTEGER_COLUMNS {
            self.coerce_column(&mut students, column, to_integer, &mut report)?;
        }
        for column in STUDENT_FLOAT_COLUMNS {
            self.coerce_column(&mut students, column, to_float, &mut report)?;
        }
        self.coerce_column(&mut students, DOB_COLUMN, to_date, &mut report)?;

        self.split_name(&mut students)?;

        for column in JOB_INTEGER_COLUMNS {
            self.coerce_column(&mut jobs, column, to_integer, &mut report)?;
        }
        for column in COURSE_INTEGER_COLUMNS {
            self.coerce_column(&mut courses, column, to_integer, &mut report)?;
        }

        info!(
            duplicates_removed = report.total_duplicates(),
            coerced_to_null = report.total_coerced_to_null(),
            "Dataframes cleaned successfully."
        );

        Ok((
            Tables {
                students,
                courses,
                jobs,
            },
            report,
        ))
    }

    /// Replace the composite contact column with `mailing_address` and `email`.
    fn split_contact(&self, students: &mut DataTable) -> Result<()> {
        let index = students.require_column(CONTACT_COLUMN)?;

        let mut addresses = Vec::with_capacity(students.row_count());
        let mut emails = Vec::with_capacity(students.row_count());
        for (row, cell) in students.column_values(index).enumerate() {
            let contact = cell
                .as_str()
                .and_then(parse_contact)
                .ok_or_else(|| malformed(students, row, CONTACT_COLUMN, cell))?;
            addresses.push(Cell::Text(contact.mailing_address));
            emails.push(Cell::Text(contact.email));
        }

        students.drop_column(CONTACT_COLUMN)?;
        students.push_column("mailing_address", addresses);
        students.push_column("email", emails);
        Ok(())
    }

    /// Replace the full name column with `first_name` and `last_name`.
    fn split_name(&self, students: &mut DataTable) -> Result<()> {
        let index = students.require_column(NAME_COLUMN)?;

        let mut first_names = Vec::with_capacity(students.row_count());
        let mut last_names = Vec::with_capacity(students.row_count());
        for (row, cell) in students.column_values(index).enumerate() {
            let (first, last) = cell
                .as_str()
                .and_then(split_name)
                .ok_or_else(|| malformed(students, row, NAME_COLUMN, cell))?;
            first_names.push(Cell::Text(first));
            last_names.push(Cell::Text(last));
        }

        students.drop_column(NAME_COLUMN)?;
        students.push_column("first_name", first_names);
        students.push_column("last_name", last_names);
        Ok(())
    }

    /// Apply a lenient coercion to every value of a column.
    fn coerce_column(
        &self,
        table: &mut DataTable,
        column: &str,
        coerce: fn(Cell) -> Cell,
        report: &mut CleanReport,
    ) -> Result<()> {
        let index = table.require_column(column)?;

        let mut nulled = 0;
        table.map_column(index, |_, cell| {
            let was_null = cell.is_null();
            let coerced = coerce(cell);
            if !was_null && coerced.is_null() {
                nulled += 1;
            }
            Ok(coerced)
        })?;

        if nulled > 0 {
            warn!(
                table = %table.name,
                column,
                nulled,
                "{} value(s) in {}.{} could not be coerced and were set to null",
                nulled,
                table.name,
                column
            );
        }
        report.record_nulls(&table.name, column, nulled);
        Ok(())
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(table: &DataTable, row: usize, column: &str, cell: &Cell) -> PathwayError {
    PathwayError::Transform {
        table: table.name.clone(),
        row,
        column: column.to_string(),
        message: match cell {
            Cell::Text(s) => format!("malformed value '{}'", s),
            other => format!("expected text, found {}", other.type_name()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn raw_students(rows: Vec<Vec<Cell>>) -> DataTable {
        DataTable::new(
            "cademycode_students",
            headers(&[
                "uuid",
                "name",
                "dob",
                "sex",
                "contact_info",
                "job_id",
                "num_course_taken",
                "current_career_path_id",
                "time_spent_hrs",
            ]),
            rows,
        )
    }

    fn student_row(uuid: i64, name: &str, contact: &str, job: &str, hours: &str) -> Vec<Cell> {
        vec![
            Cell::Integer(uuid),
            Cell::from(name),
            Cell::from("2000-01-01"),
            Cell::from("M"),
            Cell::from(contact),
            Cell::from(job),
            Cell::from("5"),
            Cell::from("2"),
            Cell::from(hours),
        ]
    }

    fn raw_courses() -> DataTable {
        DataTable::new(
            "cademycode_courses",
            headers(&["career_path_id", "career_path_name", "hours_to_complete"]),
            vec![vec![Cell::Integer(2), Cell::from("Engineering"), Cell::Integer(100)]],
        )
    }

    fn raw_jobs() -> DataTable {
        DataTable::new(
            "cademycode_student_jobs",
            headers(&["job_id", "job_category", "avg_salary"]),
            vec![
                vec![Cell::Integer(1), Cell::from("Software Development"), Cell::Integer(80000)],
                vec![Cell::Integer(1), Cell::from("Software Development"), Cell::Integer(80000)],
            ],
        )
    }

    const CONTACT: &str = r#"{"mailing_address:123 Main St", "email:test@example.com"}"#;

    fn raw(students: Vec<Vec<Cell>>) -> Tables {
        Tables {
            students: raw_students(students),
            courses: raw_courses(),
            jobs: raw_jobs(),
        }
    }

    fn value<'a>(table: &'a DataTable, row: usize, column: &str) -> &'a Cell {
        let index = table.column_index(column).unwrap();
        table.get(row, index).unwrap()
    }

    #[test]
    fn test_clean_student() {
        let raw = raw(vec![student_row(1, "John Doe", CONTACT, "1", "10.5")]);
        let (cleaned, _) = Cleaner::new().clean(raw).unwrap();
        let students = &cleaned.students;

        assert_eq!(value(students, 0, "first_name"), &Cell::from("John"));
        assert_eq!(value(students, 0, "last_name"), &Cell::from("Doe"));
        assert_eq!(value(students, 0, "email"), &Cell::from("test@example.com"));
        assert_eq!(value(students, 0, "mailing_address"), &Cell::from("123 Main St"));
        assert_eq!(value(students, 0, "job_id"), &Cell::Integer(1));
        assert_eq!(value(students, 0, "num_course_taken"), &Cell::Integer(5));
        assert_eq!(value(students, 0, "time_spent_hrs"), &Cell::Real(10.5));
        assert_eq!(
            value(students, 0, "dob"),
            &Cell::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
        );
        assert!(students.column_index("contact_info").is_none());
        assert!(students.column_index("name").is_none());
    }

    #[test]
    fn test_duplicates_removed_per_table() {
        let row = student_row(1, "John Doe", CONTACT, "1", "10.5");
        let (cleaned, report) = Cleaner::new().clean(raw(vec![row.clone(), row])).unwrap();

        assert_eq!(cleaned.students.row_count(), 1);
        assert_eq!(cleaned.jobs.row_count(), 1);
        assert_eq!(report.duplicates_removed["cademycode_students"], 1);
        assert_eq!(report.duplicates_removed["cademycode_student_jobs"], 1);
        assert_eq!(report.duplicates_removed["cademycode_courses"], 0);
        assert_eq!(report.total_duplicates(), 2);
    }

    #[test]
    fn test_unparseable_values_become_null() {
        let raw = raw(vec![student_row(1, "John Doe", CONTACT, "unknown", "lots")]);
        let (cleaned, report) = Cleaner::new().clean(raw).unwrap();

        assert_eq!(value(&cleaned.students, 0, "job_id"), &Cell::Null);
        assert_eq!(value(&cleaned.students, 0, "time_spent_hrs"), &Cell::Null);
        assert_eq!(report.coerced_to_null["cademycode_students.job_id"], 1);
        assert_eq!(report.coerced_to_null["cademycode_students.time_spent_hrs"], 1);
        assert_eq!(report.coerced_to_null["cademycode_students.num_course_taken"], 0);
    }

    #[test]
    fn test_malformed_contact_aborts() {
        let raw = raw(vec![
            student_row(1, "John Doe", CONTACT, "1", "1"),
            student_row(2, "Jane Roe", "jane@example.com", "1", "1"),
        ]);
        let err = Cleaner::new().clean(raw).unwrap_err();

        match err {
            PathwayError::Transform { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "contact_info");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_name_aborts() {
        let mut row = student_row(1, "x", CONTACT, "1", "1");
        row[1] = Cell::Null;
        let err = Cleaner::new().clean(raw(vec![row])).unwrap_err();
        assert!(err.to_string().contains("expected text, found null"));
    }

    #[test]
    fn test_missing_column_aborts() {
        let mut raw = raw(vec![student_row(1, "John Doe", CONTACT, "1", "1")]);
        raw.students.drop_column("time_spent_hrs").unwrap();
        let err = Cleaner::new().clean(raw).unwrap_err();
        assert!(matches!(err, PathwayError::MissingColumn { ref column, .. } if column == "time_spent_hrs"));
    }

    #[test]
    fn test_reference_tables_typed() {
        let mut raw = raw(vec![student_row(1, "John Doe", CONTACT, "1", "1")]);
        raw.jobs.rows[0][2] = Cell::from("85000");
        let (cleaned, _) = Cleaner::new().clean(raw).unwrap();
        assert_eq!(value(&cleaned.jobs, 0, "avg_salary"), &Cell::Integer(85000));
    }
}
