//! Undo command: reverse a previous organization run

use crate::ui;
use filo_core::{exit_codes, undo_batch, Database, Result};

pub fn run(batch: Option<&str>, list: bool, yes: bool) -> Result<i32> {
    ui::banner();
    let db = crate::open_database()?;

    if list {
        return list_batches(&db);
    }

    let batch_id = match batch {
        Some(batch) => batch.to_string(),
        None => match db.get_latest_batch()? {
            Some(batch) => batch,
            None => {
                ui::warning("Nothing to undo");
                return Ok(exit_codes::SUCCESS);
            }
        },
    };

    let logs = db.get_batch_logs(&batch_id)?;
    if logs.is_empty() {
        ui::error(&format!("No operations recorded for batch {}", batch_id));
        return Ok(exit_codes::GENERAL_ERROR);
    }

    ui::title("\u{23ea}", &format!("Undoing batch {}", batch_id));
    println!();
    ui::info(&format!("{} files will be moved back:", logs.len()));
    println!();
    for (i, log) in logs.iter().enumerate() {
        if i >= 5 {
            ui::dim(&format!("  ... {} more files", logs.len() - 5));
            break;
        }
        println!("  {} {}", ui::green("\u{2190}"), log.filename);
        ui::dim(&format!("    from: {}", log.dest_path));
        ui::dim(&format!("    to:   {}", log.source_path));
    }
    println!();

    if !yes && !ui::confirm_danger("Undo these operations?") {
        ui::warning("Cancelled");
        return Ok(exit_codes::SUCCESS);
    }

    ui::title("\u{1f504}", "Restoring");
    let outcome = undo_batch(&db, &batch_id)?;

    println!();
    ui::success(&format!("Restored: {} files", outcome.restored));
    if outcome.errors > 0 {
        ui::error(&format!("Failed: {} files", outcome.errors));
        for msg in outcome.messages.iter().take(3) {
            ui::dim(&format!("  - {}", msg));
        }
        return Ok(exit_codes::PARTIAL_FAILURE);
    }

    Ok(exit_codes::SUCCESS)
}

fn list_batches(db: &Database) -> Result<i32> {
    ui::title("\u{1f4cb}", "Undoable operations");

    let batches = db.get_recent_batches(10)?;
    if batches.is_empty() {
        ui::warning("No undoable operations");
        return Ok(exit_codes::SUCCESS);
    }

    println!();
    for (i, batch) in batches.iter().enumerate() {
        println!(
            "  {} {}",
            ui::green(&format!("[{}]", i + 1)),
            ui::bold(&batch.batch_id)
        );
        println!(
            "      \u{1f4c4} {} files  \u{1f4c5} {}",
            batch.file_count, batch.created_at
        );
        let categories: String = batch.categories.chars().take(50).collect();
        println!("      \u{1f4c1} {}", ui::gray(&categories));
        println!();
    }
    ui::dim("Reverse one with 'filo undo <batch>'");

    Ok(exit_codes::SUCCESS)
}
