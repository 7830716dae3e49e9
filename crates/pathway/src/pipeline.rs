//! Pipeline configuration and orchestration.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::error::{PathwayError, Result};
use crate::input::read_table;
use crate::schema::{COURSES, JOBS, STUDENTS};
use crate::store::{self, RebuildCounts};
use crate::transform::{CleanReport, Cleaner, Tables, reorganize_students};
use crate::validation::{ForeignKeyViolation, violations};

/// What to do when students reference missing jobs or career paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegrityPolicy {
    /// Log every violation and rebuild anyway.
    #[default]
    Warn,
    /// Refuse to touch the target store if any violation is found.
    Block,
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Legacy store to read from.
    pub source_db: PathBuf,
    /// Store whose normalized tables are rebuilt.
    pub target_db: PathBuf,
    /// Destination of the denormalized CSV snapshot.
    pub export_path: PathBuf,
    /// Directory holding the changelog and error logs.
    pub log_dir: PathBuf,
    /// Gating behavior of the integrity check.
    pub integrity_policy: IntegrityPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_db: PathBuf::from("dev/cademycode.db"),
            target_db: PathBuf::from("dev/cademycode_updated.db"),
            export_path: PathBuf::from("dev/cademycode_updated.csv"),
            log_dir: PathBuf::from("dev"),
            integrity_policy: IntegrityPolicy::Warn,
        }
    }
}

impl PipelineConfig {
    /// Set the source store path.
    pub fn with_source_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_db = path.into();
        self
    }

    /// Set the target store path.
    pub fn with_target_db(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_db = path.into();
        self
    }

    /// Set the export file path.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Set the log directory.
    pub fn with_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = path.into();
        self
    }

    /// Set the integrity policy.
    pub fn with_integrity_policy(mut self, policy: IntegrityPolicy) -> Self {
        self.integrity_policy = policy;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// What cleaning changed.
    pub clean: CleanReport,
    /// Unresolved student foreign keys.
    pub violations: Vec<ForeignKeyViolation>,
    /// Rows written per target table.
    pub counts: RebuildCounts,
    /// Rows written to the export file.
    pub exported_rows: usize,
}

/// The extract → clean → validate → rebuild → export pipeline.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage in order, stopping at the first failure.
    ///
    /// Each failure is logged at ERROR with its stage before being returned.
    pub fn run(&self) -> Result<RunSummary> {
        self.run_stages().inspect_err(|e| {
            error!(stage = %e.stage(), "Pipeline stopped at {} stage: {}", e.stage(), e);
        })
    }

    fn run_stages(&self) -> Result<RunSummary> {
        let raw = self.extract()?;

        let (cleaned, clean) = Cleaner::new().clean(raw)?;
        let students = reorganize_students(&cleaned.students)?;

        let found: Vec<ForeignKeyViolation> =
            violations(&students, &cleaned.courses, &cleaned.jobs).collect();
        if !found.is_empty() {
            warn!(violations = found.len(), "Foreign key check found {} violation(s)", found.len());
            if self.config.integrity_policy == IntegrityPolicy::Block {
                return Err(PathwayError::IntegrityBlocked {
                    violations: found.len(),
                });
            }
        }

        let cleaned = Tables {
            students,
            ..cleaned
        };

        let mut target = store::open_target(&self.config.target_db)?;
        let loaded = self.load(&mut target, &cleaned);
        store::close(target, &display(&self.config.target_db));
        let (counts, exported_rows) = loaded?;

        info!(
            students = counts.students,
            exported_rows,
            "Pipeline finished"
        );

        Ok(RunSummary {
            clean,
            violations: found,
            counts,
            exported_rows,
        })
    }

    /// Read the three raw tables; the source connection is closed on return.
    fn extract(&self) -> Result<Tables> {
        let source = store::open_source(&self.config.source_db)?;
        let tables = read_all(&source);
        store::close(source, &display(&self.config.source_db));
        tables
    }

    fn load(&self, target: &mut Connection, cleaned: &Tables) -> Result<(RebuildCounts, usize)> {
        let counts = store::rebuild(target, &cleaned.students, &cleaned.courses, &cleaned.jobs)?;
        let exported = store::export_csv(target, &self.config.export_path)?;
        Ok((counts, exported))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn read_all(conn: &Connection) -> Result<Tables> {
    Ok(Tables {
        students: read_table(conn, STUDENTS.name)?,
        courses: read_table(conn, COURSES.name)?,
        jobs: read_table(conn, JOBS.name)?,
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.source_db, PathBuf::from("dev/cademycode.db"));
        assert_eq!(config.target_db, PathBuf::from("dev/cademycode_updated.db"));
        assert_eq!(config.export_path, PathBuf::from("dev/cademycode_updated.csv"));
        assert_eq!(config.integrity_policy, IntegrityPolicy::Warn);
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::default()
            .with_source_db("a.db")
            .with_integrity_policy(IntegrityPolicy::Block);
        assert_eq!(config.source_db, PathBuf::from("a.db"));
        assert_eq!(config.integrity_policy, IntegrityPolicy::Block);
    }

    #[test]
    fn test_missing_source_stops_at_connect() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::default()
            .with_source_db(dir.path().join("absent.db"))
            .with_target_db(dir.path().join("target.db"))
            .with_export_path(dir.path().join("out.csv"));

        let err = Pipeline::with_config(config).run().unwrap_err();
        assert_eq!(err.stage(), Stage::Connect);
        assert!(!dir.path().join("target.db").exists());
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_missing_table_stops_at_read() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.db");
        Connection::open(&source)
            .unwrap()
            .execute_batch("CREATE TABLE cademycode_students (uuid INTEGER)")
            .unwrap();

        let config = PipelineConfig::default()
            .with_source_db(&source)
            .with_target_db(dir.path().join("target.db"))
            .with_export_path(dir.path().join("out.csv"));

        let err = Pipeline::with_config(config).run().unwrap_err();
        assert_eq!(err.stage(), Stage::Read);
    }
}
