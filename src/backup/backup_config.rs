//! Configuration loaded from the process environment and an optional dotenv file.

use crate::backup::function_path;
use crate::backup::redacted::RedactedString;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::{convert_error_vec, Result};
use crate::backup::result_error::{AddFunctionName, AddMsg};
use crate::backup::validate::{validate_file_name_component, validate_writable_dir};

use bon::Builder;
use function_name::named;
use getset::Getters;
use serde::Serialize;
use serde_with::skip_serializing_none;
use validator::Validate;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub static DB_HOST_VAR: &str = "DB_HOST";
pub static DB_PORT_VAR: &str = "DB_PORT";
pub static DB_USER_VAR: &str = "DB_USER";
pub static DB_NAME_VAR: &str = "DB_NAME";
pub static MYSQL_PWD_VAR: &str = "MYSQL_PWD";
pub static DB_PASSWORD_VAR: &str = "DB_PASSWORD";
pub static BACKUP_DIR_VAR: &str = "BACKUP_DIR";
pub static MYSQLDUMP_BIN_VAR: &str = "MYSQLDUMP_BIN";

pub static DEFAULT_BACKUP_DIR: &str = "backups";
pub static DEFAULT_MYSQLDUMP_BIN: &str = "mysqldump";
pub static DEFAULT_ENV_FILE: &str = ".env";

/// Connection parameters handed to the dump program
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Validate, Builder, Getters)]
#[getset(get = "pub")]
pub struct DbConfig {
    #[validate(length(min = 1, message = "DB_HOST must not be empty"))]
    #[builder(into)]
    host: String,
    port: Option<u16>,
    #[validate(length(min = 1, message = "DB_USER must not be empty"))]
    #[builder(into)]
    user: String,
    #[builder(into)]
    password: Option<RedactedString>,
    #[validate(
        length(min = 1, message = "DB_NAME must not be empty"),
        custom(function = validate_file_name_component)
    )]
    #[builder(into)]
    name: String,
}

#[derive(Clone, Debug, Serialize, Validate, Builder, Getters)]
#[getset(get = "pub")]
pub struct BackupConfig {
    #[validate(nested)]
    database: DbConfig,
    #[validate(custom(function = validate_writable_dir))]
    #[builder(default = PathBuf::from(DEFAULT_BACKUP_DIR), into)]
    out_dir: PathBuf,
    #[validate(length(min = 1, message = "MYSQLDUMP_BIN must not be empty"))]
    #[builder(default = DEFAULT_MYSQLDUMP_BIN.to_string(), into)]
    dump_bin: String,
}

impl BackupConfig {
    /// Builds the config from a set of environment variables.
    ///
    /// Missing required values become empty strings so that `validate()` can
    /// report all of them together.
    #[named]
    pub fn from_env_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut take = |key: &str| vars.remove(key).filter(|v| !v.is_empty());

        let port = match take(DB_PORT_VAR) {
            None => Ok(None),
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map(Some)
                .map_err(|_| Error::invalid_env_var(DB_PORT_VAR, p)),
        };
        let password = take(MYSQL_PWD_VAR)
            .or_else(|| take(DB_PASSWORD_VAR))
            .map(RedactedString::from);

        let database = DbConfig::builder()
            .host(take(DB_HOST_VAR).unwrap_or_default())
            .maybe_port(port.as_ref().ok().copied().flatten())
            .user(take(DB_USER_VAR).unwrap_or_default())
            .maybe_password(password)
            .name(take(DB_NAME_VAR).unwrap_or_default())
            .build();

        let config = BackupConfig::builder()
            .database(database)
            .maybe_out_dir(take(BACKUP_DIR_VAR).map(PathBuf::from))
            .maybe_dump_bin(take(MYSQLDUMP_BIN_VAR))
            .build();

        convert_error_vec(port.err().into_iter().collect())
            .add_fn_name(function_path!())
            .map(|_| config)
    }

    /// Loads the dotenv file then reads the process environment.
    ///
    /// Without an explicit `env_file` the default `.env` is used when present.
    /// Variables already set in the process environment take precedence.
    #[named]
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenv::from_path(path)
                    .map_err(Error::from)
                    .add_msg(format!("Failed to load env file {:?}", path))
                    .add_fn_name(function_path!())?;
                tracing::debug!("Loaded env file {:?}", path);
            }
            None => {
                if let Ok(path) = dotenv::from_filename(DEFAULT_ENV_FILE) {
                    tracing::debug!("Loaded env file {:?}", path);
                }
            }
        }

        Self::from_env_vars(std::env::vars())
    }

    /// Validates and returns the config, creating `out_dir` if it is missing.
    pub fn validated(self) -> Result<Self> {
        self.validate()
            .map_err(Error::from)
            .add_msg("Config validation failed")?;
        Ok(self)
    }

    pub fn to_redacted_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
