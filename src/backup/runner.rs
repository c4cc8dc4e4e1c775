use crate::backup::artifact::BackupArtifact;
use crate::backup::backup_config::{BackupConfig, DbConfig, MYSQL_PWD_VAR};
use crate::backup::function_path;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::{AddFunctionName, AddMsg};

use chrono::{DateTime, Utc};
use function_name::named;
use std::process::{Command, Stdio};
use tracing::{debug, error, info, warn};

/// Builds the external dump invocation for a database
pub trait DumpCommandBuilder {
    fn build_dump_command(&self, program: &str) -> Command;
}

impl DumpCommandBuilder for DbConfig {
    fn build_dump_command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        cmd.arg(format!("--host={}", self.host()));
        if let Some(port) = self.port() {
            cmd.arg(format!("--port={port}"));
        }
        cmd.arg(format!("--user={}", self.user()));
        cmd.arg(self.name());

        // Kept off the command line so it does not show up in `ps`.
        if let Some(password) = self.password() {
            cmd.env(MYSQL_PWD_VAR, password.inner());
        }
        cmd
    }
}

impl BackupConfig {
    /// Dumps the configured database into a new artifact stamped with `dt`.
    ///
    /// The dump is written to a temporary file next to the final path and only
    /// renamed into place when the dump program exits successfully, so a failed
    /// run never leaves a file that looks like a valid artifact.
    #[named]
    pub fn run_backup(&self, dt: DateTime<Utc>) -> Result<BackupArtifact> {
        std::fs::create_dir_all(self.out_dir())
            .map_err(Error::from)
            .add_msg(format!("Cannot create backup dir {:?}", self.out_dir()))
            .add_fn_name(function_path!())?;

        let artifact = BackupArtifact::new(self.out_dir(), self.database().name(), dt);
        let file_name = BackupArtifact::file_name(artifact.database(), *artifact.created_at());

        let tmp = tempfile::Builder::new()
            .prefix(&format!("{file_name}."))
            .suffix(".tmp")
            .tempfile_in(self.out_dir())
            .map_err(Error::from)
            .add_msg(format!("Cannot create temp file in {:?}", self.out_dir()))
            .add_fn_name(function_path!())?;
        let stdout = tmp.as_file().try_clone()?;

        info!(
            "Dumping database {:?} from {} with {}",
            self.database().name(),
            self.database().host(),
            self.dump_bin()
        );
        debug!("Writing dump to temp file {:?}", tmp.path());

        let output = self
            .database()
            .build_dump_command(self.dump_bin())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .output();

        let dump_res = match output {
            Err(e) => Err(Error::from(e).add_msg(format!("Failed to start {}", self.dump_bin()))),
            Ok(output) if !output.status.success() => Err(Error::dump_failed(
                self.dump_bin(),
                output.status,
                String::from_utf8_lossy(&output.stderr),
            )),
            Ok(output) => {
                if !output.stderr.is_empty() {
                    debug!(
                        "{} stderr: {}",
                        self.dump_bin(),
                        String::from_utf8_lossy(&output.stderr).trim_end()
                    );
                }
                Ok(())
            }
        };

        if let Err(e) = dump_res {
            let e = match tmp.close() {
                Ok(_) => e,
                Err(e2) => e.chain(Error::from(e2).add_msg("Delete tmp file failed.")),
            };
            error!("Backup of {:?} failed", self.database().name());
            return Err(e.add_fn_name(function_path!()));
        }

        tmp.persist_noclobber(artifact.path())
            .map_err(Error::from)
            .add_msg(format!("Cannot move dump into {:?}", artifact.path()))
            .add_fn_name(function_path!())?;

        if artifact.is_non_empty() {
            info!("Created backup file: {:?}", artifact.path());
        } else {
            warn!(
                "{} succeeded but wrote nothing to {:?}",
                self.dump_bin(),
                artifact.path()
            );
        }

        Ok(artifact)
    }
}
