//! Setup command: environment check and model guidance

use crate::ui;
use filo_core::{exit_codes, Config, OllamaClient, Result};

pub async fn run() -> Result<i32> {
    ui::banner();

    let config = Config::load()?;
    let client = OllamaClient::new(&config);

    ui::title("\u{1f527}", "Setup check");

    if !client.is_available().await {
        ui::error(&format!(
            "Ollama is not reachable at {}",
            config.ollama_url
        ));
        ui::info("Install it from https://ollama.com, then start it with: ollama serve");
        return Ok(exit_codes::GENERAL_ERROR);
    }
    ui::success("Ollama service is running");

    let models = client.list_models().await?;
    if models.is_empty() {
        ui::warning("No models installed");
    } else {
        ui::success(&format!("{} models installed", models.len()));
        for model in models.iter().take(10) {
            ui::info(&format!("  - {}", model));
        }
    }

    if client.has_model(&config.llm_model).await {
        ui::success(&format!("Configured model {} is ready", config.llm_model));
        ui::dim("Try: filo ~/Downloads -n");
    } else {
        ui::warning(&format!(
            "Configured model {} is not installed",
            config.llm_model
        ));
        ui::info(&format!("Install it with: ollama pull {}", config.llm_model));
    }

    Ok(exit_codes::SUCCESS)
}
