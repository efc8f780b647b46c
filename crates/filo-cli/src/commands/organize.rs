//! Default command: scan, classify, plan, review, execute

use crate::app::Cli;
use crate::progress::ProgressReporter;
use crate::ui;
use filo_core::{
    execute, exit_codes, generate_plan, scan_directory, Classifier, Config, FiloError,
    MoveOutcome, Plan, Result, Source,
};
use std::io::Write;

/// Files shown per folder when printing a plan
const MAX_DISPLAY_FILES: usize = 5;

pub async fn run(cli: &Cli) -> Result<i32> {
    let dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => {
            ui::warning("No directory given; try `filo ~/Downloads` or `filo --help`");
            return Ok(exit_codes::GENERAL_ERROR);
        }
    };

    ui::banner();

    let mut config = Config::load()?;
    let db = crate::open_database()?;

    match &cli.model {
        Some(model) => config.set_model(model.clone()),
        None => {
            // Surface the telemetry-backed recommendation without switching
            if let Ok(Some(best)) = db.get_best_model() {
                if best != config.llm_model {
                    ui::info(&format!(
                        "Recommended model: {} (based on past performance)",
                        ui::bold(&best)
                    ));
                    ui::dim(&format!(
                        "Switch with -m {}, or compare with `filo models --stats`",
                        best
                    ));
                }
            }
        }
    }
    if cli.no_learning {
        config.enable_learning = false;
    }

    if !dir.is_dir() {
        ui::error(&format!("Directory not found: {}", dir.display()));
        return Ok(exit_codes::GENERAL_ERROR);
    }
    let target = cli
        .target
        .clone()
        .unwrap_or_else(|| dir.join("Organized"));

    let scan_label = if cli.recursive {
        "Scanning recursively"
    } else {
        "Scanning"
    };
    ui::title("\u{1f4c2}", &format!("{}: {}", scan_label, dir.display()));
    let files = scan_directory(&dir, cli.recursive)?;
    let file_count = files.iter().filter(|f| !f.is_dir).count();
    ui::success(&format!("Found {} files", file_count));
    if file_count == 0 {
        ui::warning("Nothing to organize");
        return Ok(exit_codes::SUCCESS);
    }

    ui::title("\u{1f9e0}", "Consulting learned memory");
    let classifier = Classifier::new(&db, config.clone());

    let progress = |processed: usize, total: usize| {
        let reporter = ProgressReporter::new("AI classifying", total);
        reporter.update(processed);
        if processed >= total {
            reporter.finish();
        }
    };
    let results = match classifier.classify(&files, Some(&progress)).await {
        Ok(results) => results,
        Err(FiloError::ServiceUnavailable(url)) => {
            ui::error(&format!("Ollama service is not running at {}", url));
            ui::info("Start it with: ollama serve");
            ui::info("Or run: filo setup");
            return Ok(exit_codes::GENERAL_ERROR);
        }
        Err(FiloError::ModelNotFound(model)) => {
            ui::error(&format!("Model {} is not installed", model));
            ui::info(&format!("Install it with: ollama pull {}", model));
            return Ok(exit_codes::GENERAL_ERROR);
        }
        Err(e) => return Err(e),
    };

    let memory_hits = results
        .iter()
        .filter(|r| matches!(r.source, Source::Rule | Source::Vector | Source::History))
        .count();
    if memory_hits > 0 {
        ui::success(&format!("Recalled {} classifications from memory", memory_hits));
    }
    if cli.verbose {
        for r in &results {
            ui::dim(&format!(
                "{} \u{2192} {}/{} ({})",
                r.file.name, r.category, r.subcategory, r.source
            ));
        }
    }

    let mut plan = generate_plan(&results, &target);
    print_plan(&plan);

    if cli.interactive {
        plan = interactive_review(plan, &classifier, config.confidence_threshold).await?;
        print_plan(&plan);
    }

    if cli.dry_run {
        ui::warning("Preview mode - nothing was moved");
        ui::dim("Drop -n to actually organize");
        return Ok(exit_codes::SUCCESS);
    }

    if !cli.yes && !ui::confirm("\nProceed with organization?", false) {
        ui::warning("Cancelled");
        return Ok(exit_codes::SUCCESS);
    }

    ui::title("\u{1f680}", "Organizing");
    let verbose = cli.verbose;
    let observer = move |outcome: &MoveOutcome| {
        if !verbose {
            return;
        }
        match &outcome.error {
            None => {
                ui::info(&format!("Moved: {}", outcome.filename));
                ui::dim(&format!("  \u{2192} {}", outcome.dest.display()));
            }
            Some(e) => ui::error(&format!("{}: {}", outcome.filename, e)),
        }
    };
    let outcome = execute(&plan, &db, &classifier, classifier.batch_id(), Some(&observer)).await?;

    println!();
    ui::success(&format!("Moved: {} files", outcome.success));
    if outcome.errors > 0 {
        ui::error(&format!("Failed: {} files", outcome.errors));
    }
    ui::dim(&format!(
        "Batch: {} (reverse with 'filo undo')",
        classifier.batch_id()
    ));

    if outcome.errors > 0 {
        Ok(exit_codes::PARTIAL_FAILURE)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Print a plan: a summary box and the per-folder file lists
fn print_plan(plan: &Plan) {
    ui::box_panel(
        "\u{1f4cb} Organization plan",
        &[
            format!("\u{1f4c2} Target: {}", plan.target_dir.display()),
            format!("\u{1f4c4} Files: {}", plan.total_files()),
            format!("\u{1f4c1} Folders: {}", plan.total_folders()),
        ],
    );

    for (folder, files) in &plan.actions {
        println!(
            "\n  {} {}/ {}",
            ui::green("\u{1f4c1}"),
            ui::bold(folder),
            ui::gray(&format!("({} files)", files.len()))
        );

        for (i, result) in files.iter().enumerate() {
            if i >= MAX_DISPLAY_FILES {
                ui::dim(&format!("      ... {} more files", files.len() - MAX_DISPLAY_FILES));
                break;
            }

            println!(
                "      {} {} {}",
                ui::confidence_icon(result.confidence),
                ui::source_icon(result.source),
                result.file.name
            );

            if !result.reasoning.is_empty() {
                let mut reason: String = result.reasoning.chars().take(45).collect();
                if reason.len() < result.reasoning.len() {
                    reason.push_str("...");
                }
                ui::dim(&format!("         \u{2514}\u{2500} {}", reason));
            }
        }
    }
    println!();
}

/// Walk the user through low-confidence results.
///
/// Verbs: y confirms, n skips, c corrects (empty input keeps the current
/// label), q stops. Any correction regenerates the plan.
async fn interactive_review(
    plan: Plan,
    classifier: &Classifier<'_>,
    confidence_threshold: f64,
) -> Result<Plan> {
    ui::warning("Interactive review (y: confirm  n: skip  c: change  q: quit)");

    let mut results = plan.all_results();
    let mut modified = false;

    for result in results.iter_mut() {
        if result.confidence >= confidence_threshold {
            continue;
        }

        println!();
        ui::warning(&format!("Low confidence: {}", result.file.name));
        ui::info(&format!("   Category: {}/{}", result.category, result.subcategory));
        ui::info(&format!("   Confidence: {:.0}%", result.confidence * 100.0));
        ui::dim(&format!("   Reason: {}", result.reasoning));

        print!("  Action [y/n/c/q]: ");
        std::io::stdout().flush().ok();

        match ui::read_line().as_str() {
            "q" => break,
            "y" => classifier.confirm(result).await?,
            "c" => {
                print!("  New category: ");
                std::io::stdout().flush().ok();
                let input = ui::read_line_raw();
                let category = if input.is_empty() {
                    result.category.clone()
                } else {
                    input
                };

                print!("  New subcategory: ");
                std::io::stdout().flush().ok();
                let input = ui::read_line_raw();
                let subcategory = if input.is_empty() {
                    result.subcategory.clone()
                } else {
                    input
                };

                classifier.correct(result, &category, &subcategory).await?;
                result.category = category;
                result.subcategory = subcategory;
                modified = true;
            }
            _ => {}
        }
    }

    if modified {
        return Ok(generate_plan(&results, &plan.target_dir));
    }
    Ok(plan)
}
