//! Scan command: directory statistics without organizing

use crate::ui;
use filo_core::{collect_statistics, exit_codes, scan_directory, Result};
use std::path::Path;

/// Extension rows shown before truncating
const MAX_DISPLAY_TYPES: usize = 12;

pub fn run(dir: &Path, recursive: bool) -> Result<i32> {
    ui::banner();

    let files = scan_directory(dir, recursive)?;
    let stats = collect_statistics(&files);

    ui::title("\u{1f4ca}", "File statistics");
    ui::divider();
    ui::info(&format!("\u{1f4c1} Folders: {}", stats.total_dirs));
    ui::info(&format!("\u{1f4c4} Files:   {}", stats.total_files));
    ui::info(&format!(
        "\u{1f4be} Total:   {}",
        ui::format_size(stats.total_size)
    ));

    if !stats.by_extension.is_empty() {
        ui::info("");
        ui::info("By type:");
        for (i, ext) in stats.by_extension.iter().enumerate() {
            if i >= MAX_DISPLAY_TYPES {
                ui::dim(&format!(
                    "  ... {} more types",
                    stats.by_extension.len() - MAX_DISPLAY_TYPES
                ));
                break;
            }
            ui::info(&format!(
                "  {:<12} {:>4} files  {:>10}",
                ext.extension,
                ext.count,
                ui::format_size(ext.size)
            ));
        }
    }

    Ok(exit_codes::SUCCESS)
}
