use crate::backup::artifact::BackupArtifact;
use crate::backup::result_error::result::Result;
use std::io::Write;
use tracing::error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Prints the artifact path on success or logs the error, and returns the exit code.
///
/// Nothing but the path goes to `out`, so callers can capture it from stdout.
pub fn report<W: Write>(res: Result<BackupArtifact>, out: &mut W) -> i32 {
    match res {
        Ok(artifact) => match writeln!(out, "{}", artifact.path().display()) {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => {
                error!("Backup created at {:?} but reporting failed: {e}", artifact.path());
                EXIT_FAILURE
            }
        },
        Err(e) => {
            error!("{e}");
            EXIT_FAILURE
        }
    }
}
