use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use getset::Getters;
use std::path::{Path, PathBuf};

/// Millisecond precision keeps back-to-back runs on distinct names.
pub static TIME_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
pub static BACKUP_INFIX: &str = "_backup_";
pub static SQL_FILE_EXT: &str = "sql";

/// A dump file produced by one backup run: `<out_dir>/<db>_backup_<timestamp>.sql`
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct BackupArtifact {
    path: PathBuf,
    database: String,
    created_at: DateTime<Utc>,
}

impl BackupArtifact {
    pub fn new<P: AsRef<Path>, S: Into<String>>(out_dir: P, database: S, dt: DateTime<Utc>) -> Self {
        let database = database.into();
        let created_at = dt.trunc_subsecs(3);
        let path = out_dir
            .as_ref()
            .join(Self::file_name(&database, created_at));
        Self {
            path,
            database,
            created_at,
        }
    }

    pub fn file_name(database: &str, dt: DateTime<Utc>) -> String {
        format!(
            "{}{}{}.{}",
            database,
            BACKUP_INFIX,
            dt.format(TIME_FORMAT),
            SQL_FILE_EXT
        )
    }

    /// Recovers an artifact from a path produced by [`BackupArtifact::new`]
    /// for `database`, or `None` if the file name does not follow the scheme.
    pub fn from_path<P: AsRef<Path>>(file_path: P, database: &str) -> Option<Self> {
        let file_path = file_path.as_ref();
        let file_name = file_path.file_name()?.to_str()?;
        let time_string = file_name
            .strip_prefix(database)?
            .strip_prefix(BACKUP_INFIX)?
            .strip_suffix(SQL_FILE_EXT)?
            .strip_suffix('.')?;

        let created_at = NaiveDateTime::parse_from_str(time_string, TIME_FORMAT)
            .ok()?
            .and_utc();

        Some(Self {
            path: file_path.to_path_buf(),
            database: database.to_string(),
            created_at,
        })
    }

    pub fn size(&self) -> std::io::Result<u64> {
        std::fs::metadata(&self.path).map(|md| md.len())
    }

    pub fn is_non_empty(&self) -> bool {
        self.size().map(|s| s > 0).unwrap_or(false)
    }
}
