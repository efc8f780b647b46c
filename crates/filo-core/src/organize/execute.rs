//! Plan execution
//!
//! Moves are atomic per file (rename on the same filesystem); the run is
//! deliberately non-transactional across files, with recoverability via
//! the operation log and undo.

use super::{Learner, Plan};
use crate::classify::split_extension;
use crate::db::{Database, OpStatus};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Totals of one execution run
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOutcome {
    pub success: usize,
    pub errors: usize,
}

/// Report for one attempted move, surfaced to the caller's observer
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub filename: String,
    pub dest: PathBuf,
    pub error: Option<String>,
}

/// Execute a plan: create target folders, move files with collision
/// handling, log every attempt, and confirm applied results.
///
/// Failures are per file: the log row is marked failed, the error counts
/// toward the outcome, and the run continues.
pub async fn execute(
    plan: &Plan,
    db: &Database,
    learner: &dyn Learner,
    batch_id: &str,
    observer: Option<&dyn Fn(&MoveOutcome)>,
) -> Result<ExecuteOutcome> {
    let mut outcome = ExecuteOutcome::default();

    for (folder, files) in &plan.actions {
        let target_folder = plan.target_dir.join(folder);
        let folder_err = fs::create_dir_all(&target_folder).err();

        for result in files {
            let source = result.file.path.as_path();
            let dest = resolve_collision(&target_folder.join(&result.file.name));

            let move_err = match &folder_err {
                Some(e) => Some(format!("cannot create target folder: {}", e)),
                None => fs::rename(source, &dest).err().map(|e| e.to_string()),
            };

            let status = if move_err.is_none() {
                OpStatus::Success
            } else {
                OpStatus::Failed
            };
            if let Err(e) = db.add_op_log(
                batch_id,
                &source.to_string_lossy(),
                &dest.to_string_lossy(),
                &result.file.name,
                &result.category,
                &result.subcategory,
                status,
            ) {
                tracing::warn!("could not record operation log: {}", e);
            }

            match &move_err {
                None => {
                    outcome.success += 1;
                    if let Err(e) = learner.confirm(result).await {
                        tracing::warn!("learning skipped for {}: {}", result.file.name, e);
                    }
                }
                Some(e) => {
                    outcome.errors += 1;
                    tracing::warn!("move failed for {}: {}", result.file.name, e);
                }
            }

            if let Some(cb) = observer {
                cb(&MoveOutcome {
                    filename: result.file.name.clone(),
                    dest: dest.clone(),
                    error: move_err,
                });
            }
        }
    }

    Ok(outcome)
}

/// First non-existing variant of a path, appending `_1`, `_2`, ... before
/// the extension
pub fn resolve_collision(path: &Path) -> PathBuf {
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
        let candidate = dir.join(format!("{}_{}{}", stem, i, ext));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}
