//! Foreign-key consistency checks between students and reference tables.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexSet;
use tracing::warn;

use crate::input::DataTable;
use crate::schema::{COURSES, ForeignKey, JOBS, STUDENTS, TableDef};

/// A student reference that does not resolve to a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeyViolation {
    /// Referencing student column.
    pub column: &'static str,
    /// Referenced table and primary key.
    pub references: ForeignKey,
    /// The unresolved key value.
    pub key: i64,
}

impl fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Foreign key {} ({}) not in primary keys of {} table.",
            self.key, self.column, self.references.table
        )
    }
}

/// Lazily find every distinct student foreign key missing from its
/// referenced table.
///
/// Nothing is computed until the iterator is pulled; each violation is logged
/// at WARN as it is produced. Null keys are ignored. A missing key column is
/// treated as holding no keys.
pub fn violations<'a>(
    students: &'a DataTable,
    courses: &'a DataTable,
    jobs: &'a DataTable,
) -> impl Iterator<Item = ForeignKeyViolation> + 'a {
    let def: &'static TableDef = &STUDENTS;
    def.foreign_keys()
        .flat_map(move |(column, fk)| {
            let referenced = match fk.table {
                t if t == JOBS.name => Some(jobs),
                t if t == COURSES.name => Some(courses),
                _ => None,
            };
            missing_keys(students, column.name, referenced, fk)
        })
        .inspect(|violation| warn!(key = violation.key, column = violation.column, "{}", violation))
}

/// Boolean view of [`violations`]: one `false` per unresolved key.
pub fn check<'a>(
    students: &'a DataTable,
    courses: &'a DataTable,
    jobs: &'a DataTable,
) -> impl Iterator<Item = bool> + 'a {
    violations(students, courses, jobs).map(|_| false)
}

fn missing_keys(
    students: &DataTable,
    column: &'static str,
    referenced: Option<&DataTable>,
    fk: ForeignKey,
) -> Vec<ForeignKeyViolation> {
    let Some(index) = students.column_index(column) else {
        return Vec::new();
    };

    let primary_keys: HashSet<i64> = referenced
        .and_then(|table| table.column_by_name(fk.column))
        .map(|cells| cells.into_iter().filter_map(|c| c.as_i64()).collect())
        .unwrap_or_default();

    let distinct: IndexSet<i64> = students
        .column_values(index)
        .filter_map(|c| c.as_i64())
        .collect();

    distinct
        .into_iter()
        .filter(|key| !primary_keys.contains(key))
        .map(|key| ForeignKeyViolation {
            column,
            references: fk,
            key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Cell;

    fn table(name: &str, headers: &[&str], rows: Vec<Vec<Cell>>) -> DataTable {
        DataTable::new(name, headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    fn students(keys: &[(Option<i64>, Option<i64>)]) -> DataTable {
        table(
            "cademycode_students",
            &["job_id", "current_career_path_id"],
            keys.iter()
                .map(|&(job, path)| vec![Cell::from(job), Cell::from(path)])
                .collect(),
        )
    }

    fn jobs(keys: &[i64]) -> DataTable {
        table(
            "cademycode_student_jobs",
            &["job_id"],
            keys.iter().map(|&k| vec![Cell::Integer(k)]).collect(),
        )
    }

    fn courses(keys: &[i64]) -> DataTable {
        table(
            "cademycode_courses",
            &["career_path_id"],
            keys.iter().map(|&k| vec![Cell::Integer(k)]).collect(),
        )
    }

    #[test]
    fn test_missing_job_key() {
        let students = students(&[(Some(1), Some(2)), (Some(2), Some(3))]);
        let jobs = jobs(&[1]);
        let courses = courses(&[2]);

        let mut results = check(&students, &courses, &jobs);
        assert_eq!(results.next(), Some(false));

        let found: Vec<_> = violations(&students, &courses, &jobs).collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].column, "job_id");
        assert_eq!(found[0].key, 2);
        assert_eq!(found[0].references.table, "cademycode_student_jobs");
        assert_eq!(found[1].column, "current_career_path_id");
        assert_eq!(found[1].key, 3);
    }

    #[test]
    fn test_all_keys_resolve() {
        let students = students(&[(Some(1), Some(2)), (Some(1), None), (None, None)]);
        let jobs = jobs(&[1, 5]);
        let courses = courses(&[2]);

        assert_eq!(check(&students, &courses, &jobs).filter(|ok| !ok).count(), 0);
    }

    #[test]
    fn test_distinct_keys_reported_once() {
        let students = students(&[(Some(9), None), (Some(9), None), (Some(9), None)]);
        let found: Vec<_> = violations(&students, &courses(&[]), &jobs(&[1])).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].to_string(),
            "Foreign key 9 (job_id) not in primary keys of cademycode_student_jobs table."
        );
    }

    #[test]
    fn test_missing_column_yields_nothing() {
        let students = table("cademycode_students", &["uuid"], vec![vec![Cell::Integer(1)]]);
        assert_eq!(violations(&students, &courses(&[]), &jobs(&[])).count(), 0);
    }
}
