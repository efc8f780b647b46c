//! Models command: installed models and performance comparison

use crate::ui;
use filo_core::{exit_codes, Config, OllamaClient, Result};

pub async fn run(stats: bool) -> Result<i32> {
    ui::banner();

    let config = Config::load()?;
    let client = OllamaClient::new(&config);

    if !client.is_available().await {
        ui::error(&format!(
            "Ollama service is not running at {}",
            config.ollama_url
        ));
        ui::info("Start it with: ollama serve");
        return Ok(exit_codes::GENERAL_ERROR);
    }

    let models = client.list_models().await?;
    ui::title("\u{1f916}", "Installed models");
    if models.is_empty() {
        ui::warning("No models installed");
        ui::info(&format!("Install one with: ollama pull {}", config.llm_model));
    }
    for model in &models {
        let marker = if *model == config.llm_model {
            ui::green(" (current)")
        } else {
            String::new()
        };
        ui::info(&format!("  - {}{}", model, marker));
    }

    if stats {
        let db = crate::open_database()?;
        let summaries = db.get_model_summaries()?;

        if summaries.is_empty() {
            ui::dim("No performance data recorded yet");
        } else {
            ui::title("\u{1f4c8}", "Model performance");
            ui::info(&format!(
                "  {:<24} {:>6} {:>9} {:>6} {:>9} {:>6}",
                "model", "files", "ms/file", "conf", "accuracy", "score"
            ));
            ui::divider();
            for s in &summaries {
                ui::info(&format!(
                    "  {:<24} {:>6} {:>9.0} {:>5.0}% {:>8.0}% {:>6.2}",
                    s.model_name,
                    s.total_files,
                    s.avg_time_per_file_ms,
                    s.avg_confidence * 100.0,
                    s.accuracy_rate * 100.0,
                    s.score
                ));
            }

            if let Some(best) = db.get_best_model()? {
                println!();
                ui::success(&format!("Recommended: {}", best));
            } else {
                println!();
                ui::dim("Not enough data for a recommendation yet (10+ files per model)");
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}
