//! Reset command: clear learned state

use crate::app::ResetTarget;
use crate::ui;
use filo_core::{exit_codes, Result};

pub fn run(target: ResetTarget, yes: bool) -> Result<i32> {
    ui::banner();

    let description = match target {
        ResetTarget::History => "classification history",
        ResetTarget::Rules => "learned rules",
        ResetTarget::Vectors => "stored vectors",
        ResetTarget::All => "all learned state",
    };

    if !yes && !ui::confirm_danger(&format!("Clear {}? This cannot be recovered.", description)) {
        ui::warning("Cancelled");
        return Ok(exit_codes::SUCCESS);
    }

    let db = crate::open_database()?;
    match target {
        ResetTarget::History => db.reset_history()?,
        ResetTarget::Rules => db.reset_rules()?,
        ResetTarget::Vectors => db.reset_vectors()?,
        ResetTarget::All => db.reset_all()?,
    }

    ui::success(&format!("Cleared {}", description));
    Ok(exit_codes::SUCCESS)
}
