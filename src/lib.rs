//! # db_backup
//!
//! Dumps a MySQL database to a timestamped SQL file with `mysqldump`.
//!
//! ## Features
//!
//! - **Environment Configuration**: `DB_HOST`, `DB_USER`, `MYSQL_PWD`, `DB_NAME`, optionally from a `.env` file
//! - **Timestamped Artifacts**: `<BACKUP_DIR>/<DB_NAME>_backup_<timestamp>.sql`
//! - **No Partial Files**: the dump is renamed into place only when `mysqldump` exits successfully
//! - **Redacted Secrets**: the password never reaches logs or the dump command line
//!
//! ## Quick Start
//!
//! ```no_run
//! use db_backup::backup::backup_config::BackupConfig;
//!
//! let config = BackupConfig::from_env(None)?.validated()?;
//! let artifact = config.run_backup(chrono::Utc::now())?;
//! println!("{}", artifact.path().display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
