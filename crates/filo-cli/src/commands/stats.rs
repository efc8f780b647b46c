//! Stats command: learning statistics

use crate::ui;
use filo_core::{exit_codes, Config, Result};

pub fn run() -> Result<i32> {
    ui::banner();

    let config = Config::load()?;
    let db = crate::open_database()?;
    let stats = db.get_statistics()?;

    ui::title("\u{1f4da}", "Learning statistics");
    ui::divider();
    ui::info(&format!("Classifications: {}", stats.total_records));
    ui::info(&format!("Confirmed:       {}", stats.confirmed_records));
    ui::info(&format!("Learned rules:   {}", stats.learned_rules));
    ui::info(&format!("Vectors:         {}", stats.vector_count));
    ui::info(&format!("Corrections:     {}", stats.feedback_count));
    ui::info(&format!(
        "Learning:        {}",
        if config.enable_learning { "on" } else { "off" }
    ));

    if !stats.category_distribution.is_empty() {
        ui::info("");
        ui::info("Top categories:");
        for (category, count) in &stats.category_distribution {
            ui::info(&format!("  {:<20} {}", category, count));
        }
    }

    Ok(exit_codes::SUCCESS)
}
