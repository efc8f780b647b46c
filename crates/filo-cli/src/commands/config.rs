//! Config command: show or update persisted configuration

use crate::ui;
use filo_core::{config::config_path, exit_codes, Config, FiloError, Result};

pub fn run(set: &[String]) -> Result<i32> {
    let mut config = Config::load()?;

    if set.is_empty() {
        ui::title("\u{2699}", "Configuration");
        ui::divider();
        ui::info(&format!("llm_model            = {}", config.llm_model));
        ui::info(&format!("embedding_model      = {}", config.embedding_model));
        ui::info(&format!("ollama_url           = {}", config.ollama_url));
        ui::info(&format!("temperature          = {}", config.temperature));
        ui::info(&format!("max_tokens           = {}", config.max_tokens));
        ui::info(&format!("enable_learning      = {}", config.enable_learning));
        ui::info(&format!("similarity_threshold = {}", config.similarity_threshold));
        ui::info(&format!("confidence_threshold = {}", config.confidence_threshold));
        ui::info(&format!("min_samples_for_rule = {}", config.min_samples_for_rule));
        ui::info(&format!("batch_size           = {}", config.batch_size));
        ui::dim(&format!("File: {}", config_path().display()));
        return Ok(exit_codes::SUCCESS);
    }

    for entry in set {
        apply(&mut config, entry)?;
    }
    config.save()?;
    ui::success("Configuration saved");

    Ok(exit_codes::SUCCESS)
}

fn apply(config: &mut Config, entry: &str) -> Result<()> {
    let (key, value) = entry.split_once('=').ok_or_else(|| {
        FiloError::InvalidInput(format!("expected KEY=VALUE, got: {}", entry))
    })?;

    let bad_value =
        || FiloError::InvalidInput(format!("invalid value for {}: {}", key, value));

    match key {
        "llm_model" => config.llm_model = value.to_string(),
        "embedding_model" => config.embedding_model = value.to_string(),
        "ollama_url" => config.ollama_url = value.to_string(),
        "temperature" => config.temperature = value.parse().map_err(|_| bad_value())?,
        "max_tokens" => config.max_tokens = value.parse().map_err(|_| bad_value())?,
        "enable_learning" => {
            config.enable_learning = value.parse().map_err(|_| bad_value())?
        }
        "similarity_threshold" => {
            config.similarity_threshold = value.parse().map_err(|_| bad_value())?
        }
        "confidence_threshold" => {
            config.confidence_threshold = value.parse().map_err(|_| bad_value())?
        }
        "min_samples_for_rule" => {
            config.min_samples_for_rule = value.parse().map_err(|_| bad_value())?
        }
        "batch_size" => config.batch_size = value.parse().map_err(|_| bad_value())?,
        _ => {
            return Err(FiloError::InvalidInput(format!(
                "unknown configuration key: {}",
                key
            )))
        }
    }
    Ok(())
}
