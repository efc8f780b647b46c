//! Batch undo
//!
//! Replays a batch's successful moves in reverse: files go back under
//! their original parent, the batch is flipped to undone in one update,
//! and emptied destination folders are cleaned up best-effort.

use crate::classify::split_extension;
use crate::db::{Database, OperationLog};
use crate::error::Result;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Totals of one undo run
#[derive(Debug, Clone, Default)]
pub struct UndoOutcome {
    pub restored: usize,
    pub errors: usize,
    /// Per-file skip or failure messages
    pub messages: Vec<String>,
}

/// Reverse every successful move of a batch.
///
/// A missing destination skips that file with a message; other files
/// proceed. Running undo on an already-undone batch is a no-op.
pub fn undo_batch(db: &Database, batch_id: &str) -> Result<UndoOutcome> {
    let logs = db.get_batch_logs(batch_id)?;
    let mut outcome = UndoOutcome::default();
    if logs.is_empty() {
        return Ok(outcome);
    }

    for log in &logs {
        let dest = Path::new(&log.dest_path);
        if !dest.exists() {
            outcome.errors += 1;
            outcome
                .messages
                .push(format!("{}: file no longer at destination", log.filename));
            continue;
        }

        let source = Path::new(&log.source_path);
        if let Some(parent) = source.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                outcome.errors += 1;
                outcome
                    .messages
                    .push(format!("{}: cannot recreate directory: {}", log.filename, e));
                continue;
            }
        }

        let target = resolve_restore_collision(source);
        match fs::rename(dest, &target) {
            Ok(()) => outcome.restored += 1,
            Err(e) => {
                outcome.errors += 1;
                outcome.messages.push(format!("{}: {}", log.filename, e));
            }
        }
    }

    db.mark_batch_undone(batch_id)?;
    clean_empty_dirs(&logs);

    Ok(outcome)
}

/// Restore target: the original path, or a `_restored_N` sibling when the
/// original is occupied again
fn resolve_restore_collision(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (stem, ext) = split_extension(&name);

    let mut i = 1;
    loop {
        let candidate = dir.join(format!("{}_restored_{}{}", stem, i, ext));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// Remove destination directories the undo emptied, and their parents
/// when those became empty too
fn clean_empty_dirs(logs: &[OperationLog]) {
    let dirs: BTreeSet<PathBuf> = logs
        .iter()
        .filter_map(|log| Path::new(&log.dest_path).parent().map(Path::to_path_buf))
        .collect();

    for dir in dirs {
        if remove_if_empty(&dir) {
            if let Some(parent) = dir.parent() {
                remove_if_empty(parent);
            }
        }
    }
}

fn remove_if_empty(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none() && fs::remove_dir(dir).is_ok(),
        Err(_) => false,
    }
}
