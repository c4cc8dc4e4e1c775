use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_backup(work_dir: &Path, dump_bin: &str, extra_env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_db_backup"));
    cmd.current_dir(work_dir)
        .env_remove("BACKUP_DIR")
        .env_remove("DB_PORT")
        .env_remove("DB_PASSWORD")
        .env("RUST_LOG", "info")
        .env("DB_HOST", "127.0.0.1")
        .env("DB_USER", "root")
        .env("MYSQL_PWD", "rootpassword")
        .env("DB_NAME", "company_db")
        .env("MYSQLDUMP_BIN", dump_bin);
    for (k, v) in extra_env {
        cmd.env(k, v);
    }
    cmd.output().unwrap()
}

fn sql_files(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return vec![];
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
#[cfg(unix)]
fn test_success_prints_path_and_creates_backup_dir() {
    let work_dir = tempdir().unwrap();
    let backup_dir = work_dir.path().join("backups");
    assert!(!backup_dir.exists());

    let output = run_backup(work_dir.path(), "echo", &[]);

    assert_eq!(output.status.code(), Some(0));
    assert!(backup_dir.is_dir());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let printed = work_dir.path().join(stdout.trim_end());
    assert!(stdout.trim_end().starts_with("backups/company_db_backup_"));
    assert!(stdout.trim_end().ends_with(".sql"));
    assert!(std::fs::metadata(&printed).unwrap().len() > 0);
}

#[test]
#[cfg(unix)]
fn test_backup_dir_override() {
    let work_dir = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let out_dir_str = out_dir.path().to_string_lossy().into_owned();

    let output = run_backup(work_dir.path(), "echo", &[("BACKUP_DIR", out_dir_str.as_str())]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(sql_files(out_dir.path()).len(), 1);
    assert!(!work_dir.path().join("backups").exists());
}

#[test]
#[cfg(unix)]
fn test_successive_runs_produce_distinct_files() {
    let work_dir = tempdir().unwrap();

    let first = run_backup(work_dir.path(), "echo", &[]);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = run_backup(work_dir.path(), "echo", &[]);

    assert_eq!(first.status.code(), Some(0));
    assert_eq!(second.status.code(), Some(0));
    assert_ne!(first.stdout, second.stdout);
    assert_eq!(sql_files(&work_dir.path().join("backups")).len(), 2);
}

#[test]
#[cfg(unix)]
fn test_dump_failure_exits_non_zero_without_artifact() {
    let work_dir = tempdir().unwrap();

    let output = run_backup(work_dir.path(), "false", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("false exited with"));
    assert!(sql_files(&work_dir.path().join("backups")).is_empty());
}

#[test]
fn test_missing_config_exits_non_zero() {
    let work_dir = tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_db_backup"))
        .current_dir(work_dir.path())
        .env_remove("DB_HOST")
        .env_remove("DB_USER")
        .env_remove("DB_NAME")
        .env_remove("BACKUP_DIR")
        .env("RUST_LOG", "info")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DB_HOST must not be empty"));
}

#[test]
#[cfg(unix)]
fn test_env_file_is_loaded() {
    let work_dir = tempdir().unwrap();
    std::fs::write(
        work_dir.path().join(".env"),
        "DB_HOST=localhost\nDB_USER=backup\nDB_NAME=from_env_file\nMYSQLDUMP_BIN=echo\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_db_backup"))
        .current_dir(work_dir.path())
        .env_remove("DB_HOST")
        .env_remove("DB_USER")
        .env_remove("DB_NAME")
        .env_remove("MYSQLDUMP_BIN")
        .env_remove("BACKUP_DIR")
        .env_remove("DB_PORT")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("backups/from_env_file_backup_"));
    let content = std::fs::read_to_string(work_dir.path().join(stdout.trim_end())).unwrap();
    assert!(content.starts_with("--host=localhost --user=backup "));
}

#[test]
#[cfg(unix)]
fn test_explicit_env_file_loses_to_process_env() {
    let work_dir = tempdir().unwrap();
    std::fs::write(
        work_dir.path().join("alt.env"),
        "DB_HOST=fromfile\nDB_USER=fileuser\nDB_NAME=filedb\nMYSQLDUMP_BIN=echo\n",
    )
    .unwrap();
    // Would fail the run if it were read instead of alt.env.
    std::fs::write(work_dir.path().join(".env"), "MYSQLDUMP_BIN=false\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_db_backup"))
        .current_dir(work_dir.path())
        .args(["--env-file", "alt.env"])
        .env("DB_HOST", "fromproc")
        .env_remove("DB_USER")
        .env_remove("DB_NAME")
        .env_remove("MYSQLDUMP_BIN")
        .env_remove("BACKUP_DIR")
        .env_remove("DB_PORT")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("backups/filedb_backup_"));
    let content = std::fs::read_to_string(work_dir.path().join(stdout.trim_end())).unwrap();
    assert_eq!(content, "--host=fromproc --user=fileuser filedb\n");
}
