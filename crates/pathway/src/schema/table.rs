//! Table-level definitions of the normalized target schema.

use super::types::ColumnType;

/// A foreign key reference to another table's primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    /// Referenced table.
    pub table: &'static str,
    /// Referenced column (the primary key of `table`).
    pub column: &'static str,
}

/// Definition of a single target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: &'static str,
    /// Type as written in the DDL.
    pub sql_type: &'static str,
    /// Type used to check values before insertion.
    pub column_type: ColumnType,
    /// Whether this column is the table's primary key.
    pub primary_key: bool,
    /// Referenced primary key, if this column is a foreign key.
    pub references: Option<ForeignKey>,
}

const fn column(name: &'static str, sql_type: &'static str, column_type: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        sql_type,
        column_type,
        primary_key: false,
        references: None,
    }
}

const fn primary_key(name: &'static str) -> ColumnDef {
    ColumnDef {
        primary_key: true,
        ..column(name, "INTEGER", ColumnType::Integer)
    }
}

const fn foreign_key(name: &'static str, table: &'static str, referenced: &'static str) -> ColumnDef {
    ColumnDef {
        references: Some(ForeignKey {
            table,
            column: referenced,
        }),
        ..column(name, "INTEGER", ColumnType::Integer)
    }
}

/// Definition of a normalized target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Table name (shared by the source and target stores).
    pub name: &'static str,
    /// Columns in canonical order.
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Get all column names in canonical order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns that reference another table.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&ColumnDef, ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.references.map(|fk| (c, fk)))
    }

    /// `DROP TABLE IF EXISTS` statement for this table.
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    /// `CREATE TABLE` statement with primary and foreign keys.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("    {} {}", c.name, c.sql_type);
                if c.primary_key {
                    def.push_str(" PRIMARY KEY");
                }
                if let Some(fk) = c.references {
                    def.push_str(&format!(" REFERENCES {}({})", fk.table, fk.column));
                }
                def
            })
            .collect();
        format!("CREATE TABLE {} (\n{}\n)", self.name, columns.join(",\n"))
    }

    /// Positional `INSERT` statement for the given column order.
    pub fn insert_sql(&self, columns: &[String]) -> String {
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Career paths (`CareerPath` entity).
pub const COURSES: TableDef = TableDef {
    name: "cademycode_courses",
    columns: &[
        primary_key("career_path_id"),
        column("career_path_name", "TEXT", ColumnType::String),
        column("hours_to_complete", "INTEGER", ColumnType::Integer),
    ],
};

/// Jobs (`Job` entity).
pub const JOBS: TableDef = TableDef {
    name: "cademycode_student_jobs",
    columns: &[
        primary_key("job_id"),
        column("job_category", "TEXT", ColumnType::String),
        column("avg_salary", "INTEGER", ColumnType::Integer),
    ],
};

/// Students, in canonical column order.
pub const STUDENTS: TableDef = TableDef {
    name: "cademycode_students",
    columns: &[
        primary_key("uuid"),
        column("first_name", "VARCHAR", ColumnType::String),
        column("last_name", "VARCHAR", ColumnType::String),
        column("dob", "DATE", ColumnType::Date),
        column("sex", "VARCHAR", ColumnType::String),
        column("mailing_address", "VARCHAR", ColumnType::String),
        column("email", "TEXT", ColumnType::String),
        foreign_key("job_id", JOBS.name, "job_id"),
        column("num_course_taken", "INTEGER", ColumnType::Integer),
        foreign_key("current_career_path_id", COURSES.name, "career_path_id"),
        column("time_spent_hrs", "REAL", ColumnType::Float),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_student_order() {
        assert_eq!(
            STUDENTS.column_names(),
            vec![
                "uuid",
                "first_name",
                "last_name",
                "dob",
                "sex",
                "mailing_address",
                "email",
                "job_id",
                "num_course_taken",
                "current_career_path_id",
                "time_spent_hrs",
            ]
        );
    }

    #[test]
    fn test_foreign_keys() {
        let fks: Vec<_> = STUDENTS.foreign_keys().map(|(c, fk)| (c.name, fk.table)).collect();
        assert_eq!(
            fks,
            vec![
                ("job_id", "cademycode_student_jobs"),
                ("current_career_path_id", "cademycode_courses"),
            ]
        );
        assert_eq!(JOBS.foreign_keys().count(), 0);
    }

    #[test]
    fn test_create_sql() {
        let sql = JOBS.create_sql();
        assert!(sql.starts_with("CREATE TABLE cademycode_student_jobs ("));
        assert!(sql.contains("job_id INTEGER PRIMARY KEY"));
        assert!(sql.contains("avg_salary INTEGER"));

        let sql = STUDENTS.create_sql();
        assert!(sql.contains("job_id INTEGER REFERENCES cademycode_student_jobs(job_id)"));
        assert!(sql.contains(
            "current_career_path_id INTEGER REFERENCES cademycode_courses(career_path_id)"
        ));
    }

    #[test]
    fn test_insert_sql() {
        let columns = vec!["job_id".to_string(), "job_category".to_string()];
        assert_eq!(
            JOBS.insert_sql(&columns),
            "INSERT INTO cademycode_student_jobs (job_id, job_category) VALUES (?1, ?2)"
        );
    }

    #[test]
    fn test_column_lookup() {
        assert!(COURSES.column("career_path_id").is_some_and(|c| c.primary_key));
        assert_eq!(STUDENTS.column("dob").map(|c| c.column_type), Some(ColumnType::Date));
    }
}
