//! Log file housekeeping and subscriber setup
//!
//! One log file per calendar day under the configured directory; the
//! directory is pruned down to a keep-count before today's file is opened.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::Local;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Create the log directory, prune it to `keep` files and return the path
/// of today's log file (named `DD_MM_YYYY.log`).
pub fn prepare_log_file(dir: &Path, keep: usize) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let today = dir.join(format!("{}.log", Local::now().format("%d_%m_%Y")));
    prune_old_logs(dir, keep, &today)?;

    Ok(today)
}

/// Remove the oldest `.log` files so that at most `keep` remain once
/// today's file is counted in. Today's file itself is never removed.
fn prune_old_logs(dir: &Path, keep: usize, current: &Path) -> Result<()> {
    let mut logs: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().map(|e| e == "log").unwrap_or(false) && path != current {
            let modified = entry
                .metadata()?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            logs.push((modified, path));
        }
    }

    if logs.len() + 1 <= keep {
        return Ok(());
    }

    logs.sort_by_key(|(modified, _)| *modified);
    let excess = logs.len() + 1 - keep;

    for (_, path) in logs.into_iter().take(excess) {
        if let Err(err) = fs::remove_file(&path) {
            tracing::warn!("Failed to remove old log {}: {}", path.display(), err);
        }
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// Output goes to stdout, and additionally to today's log file when a log
/// directory is configured. Must be called once, before any tracing output.
pub fn init_logging(log_dir: Option<&Path>, keep: usize) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(
        "chat_stats=info"
            .parse()
            .map_err(|e| Error::InvalidArgument(format!("Bad log directive: {}", e)))?,
    );

    match log_dir {
        Some(dir) => {
            let path = prepare_log_file(dir, keep)?;
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(io::stdout.and(Arc::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn prepare_creates_directory_and_daily_file_name() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path().join("Logs");

        let path = prepare_log_file(&dir, 15).expect("prepare");

        assert!(dir.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with(".log"));
        let expected = format!("{}.log", Local::now().format("%d_%m_%Y"));
        assert_eq!(name, expected);
    }

    #[test]
    fn prune_keeps_at_most_keep_files() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        for i in 0..6 {
            fs::write(dir.join(format!("0{}_01_2025.log", i)), "old").unwrap();
        }

        let today = prepare_log_file(dir, 3).expect("prepare");
        fs::write(&today, "today").unwrap();

        let count = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "log").unwrap_or(false))
            .count();
        assert!(count <= 3, "expected at most 3 log files, found {}", count);
        assert!(today.exists());
    }

    #[test]
    fn prune_ignores_non_log_files() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        fs::write(dir.join("notes.txt"), "keep me").unwrap();
        for i in 0..4 {
            fs::write(dir.join(format!("0{}_01_2025.log", i)), "old").unwrap();
        }

        prepare_log_file(dir, 2).expect("prepare");

        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn small_directories_are_left_alone() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path();

        fs::write(dir.join("01_01_2025.log"), "old").unwrap();
        prepare_log_file(dir, 15).expect("prepare");

        assert!(dir.join("01_01_2025.log").exists());
    }
}
