//! Resume screener: rank resumes against a job description

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction, INPUT_EXTENSIONS};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::{InputDocument, InputManager};
use resume_screener::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_screener::output::ScreeningReport;
use resume_screener::processing::analyzer::{rank_candidates, ScreeningEngine};
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::embeddings::SemanticScorer;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Screen {
            job,
            resumes,
            output,
            detailed,
            save,
            no_semantic,
        } => {
            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ScreenerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            info!("Screening {} resume(s) against {}", resumes.len(), job.display());

            let mut input_manager = InputManager::new();
            let job_doc = load_input(&mut input_manager, &job, "Job description").await?;
            let mut candidates = Vec::with_capacity(resumes.len());
            for resume in &resumes {
                candidates.push(load_input(&mut input_manager, resume, "Resume").await?);
            }

            let semantic = load_semantic_scorer(&config, no_semantic).await?;
            let engine = ScreeningEngine::new(&config, semantic.clone())?;

            let progress = ProgressBar::new(candidates.len() as u64);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let reference = engine.prepare(&job_doc.text);
            let ranked = engine.screen_with_progress(
                &reference,
                candidates.iter().map(|doc| (doc.name.as_str(), doc.text.as_str())),
                |scored| {
                    progress.set_message(scored.candidate.clone());
                    progress.inc(1);
                },
            );
            progress.finish_and_clear();

            let report = ScreeningReport::new(
                job_doc.name.clone(),
                reference.terms().surface_forms(),
                semantic.model_name().map(str::to_string),
                *engine.weights(),
                ranked,
            );

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true);
            println!("{}", generator.generate_report(&report, &output_format)?);

            if let Some(path) = save {
                let path = path
                    .unwrap_or_else(|| suggest_filename(&output_format, &job_doc.name, true).into());
                // Files never carry terminal color codes
                let plain = ReportGenerator::with_options(false, detailed, true);
                save_report_to_file(&plain.generate_report(&report, &output_format)?, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Score { job, resume, no_semantic } => {
            let mut input_manager = InputManager::new();
            let job_doc = load_input(&mut input_manager, &job, "Job description").await?;
            let resume_doc = load_input(&mut input_manager, &resume, "Resume").await?;

            let semantic = load_semantic_scorer(&config, no_semantic).await?;
            let engine = ScreeningEngine::new(&config, semantic.clone())?;

            let reference = engine.prepare(&job_doc.text);
            let ranked = rank_candidates(vec![engine.score_candidate(
                &reference,
                &resume_doc.name,
                &resume_doc.text,
            )]);

            let report = ScreeningReport::new(
                job_doc.name.clone(),
                reference.terms().surface_forms(),
                semantic.model_name().map(str::to_string),
                *engine.weights(),
                ranked,
            );

            let generator = ReportGenerator::with_options(config.output.color_output, true, true);
            println!("{}", generator.generate_report(&report, &OutputFormat::Console)?);
        }

        Commands::Extract { file } => {
            let mut input_manager = InputManager::new();
            let doc = load_input(&mut input_manager, &file, "Document").await?;

            let semantic = Arc::new(SemanticScorer::unavailable("not needed for extraction"));
            let engine = ScreeningEngine::new(&config, semantic)?;
            let terms = engine.extractor().extract(&doc.text);

            println!("{} ({} terms)", doc.name.bold(), terms.len());
            for term in &terms {
                match term.abbreviation() {
                    Some(abbr) if !abbr.eq_ignore_ascii_case(term.surface()) => {
                        println!("  • {} [{}]", term, abbr)
                    }
                    _ => println!("  • {}", term),
                }
            }
        }

        Commands::Models { action } => run_models_command(action, &config).await?,

        Commands::Config { action } => run_config_command(action, config, config_path)?,
    }

    Ok(())
}

async fn run_models_command(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("{}\n", "Embedding Models".bold());
            for (id, info) in manager.list_available_models() {
                let status = if manager.is_model_downloaded(id) {
                    "downloaded".green()
                } else {
                    "available".yellow()
                };
                println!("  • {} ({}) - {} MB [{}]", id, info.repo_id, info.size_mb, status);
                println!("    {}", info.description);
            }

            let selected = manager.auto_select_model();
            println!("\nConfigured model: {}", config.models.default_embedding_model);
            if manager.list_downloaded_models().is_empty() {
                println!("No models downloaded yet. Get started with:");
                println!("   resume-screener models download {}", selected);
            }
        }

        ModelAction::Download { model, force } => {
            let path = manager.download_model(&model, force).await?;
            println!("{} Model '{}' is ready at {}", "✓".green(), model, path.display());
        }

        ModelAction::Remove { model } => {
            manager.remove_model(&model).await?;
            println!("{} Model '{}' removed", "✓".green(), model);
        }

        ModelAction::Info { model } => {
            let id = manager
                .resolve_model_id(&model)
                .ok_or_else(|| ScreenerError::ModelNotFound(model.clone()))?;
            let info = manager
                .get_model_info(&id)
                .ok_or_else(|| ScreenerError::ModelNotFound(model.clone()))?;

            println!("Id: {}", id);
            println!("Name: {}", info.name);
            println!("Repository: {}", info.repo_id);
            println!("Type: {:?}", info.model_type);
            println!("Dimensions: {}", info.dimensions);
            println!("Size: {} MB", info.size_mb);
            println!("Description: {}", info.description);

            match manager.get_model_path(&id) {
                Some(path) => println!("Status: downloaded ({})", path.display()),
                None => {
                    println!("Status: not downloaded");
                    println!("   resume-screener models download {}", id);
                }
            }
        }
    }

    Ok(())
}

fn run_config_command(action: Option<ConfigAction>, mut config: Config, config_path: &Path) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            println!("{}\n", "Current Configuration".bold());
            println!("Models Directory: {}", config.models_dir().display());
            println!("Embedding Model: {}", config.models.default_embedding_model);
            println!("\nScoring Weights:");
            println!("  Semantic: {:.2}", config.scoring.semantic_weight);
            println!("  Lexical: {:.2}", config.scoring.lexical_weight);
            println!("  Coverage: {:.2}", config.scoring.coverage_weight);
            println!("  Experience: {:.2}", config.scoring.experience_weight);
            println!("  Experience placeholder: {:.2}", config.scoring.experience_placeholder);
            println!("  Clamp negative semantic: {}", config.scoring.clamp_negative_semantic);
            println!("\nTerms:");
            println!("  Extra vocabulary: {}", config.terms.extra_vocabulary.len());
            println!("  Extra stopwords: {}", config.terms.extra_stopwords.len());
            println!("  Extra abbreviations: {}", config.terms.extra_abbreviations.len());
            println!(
                "\nOutput: {:?} (detailed: {}, colors: {})",
                config.output.format, config.output.detailed, config.output.color_output
            );
        }

        Some(ConfigAction::Reset) => {
            Config::default().save_to(config_path)?;
            println!("{} Configuration reset to defaults", "✓".green());
        }

        Some(ConfigAction::Path) => {
            println!("{}", config_path.display());
        }

        Some(ConfigAction::Set { key, value }) => {
            config.set_value(&key, &value)?;
            if let Err(e) = config.validate() {
                warn!("Configuration saved but not yet usable for scoring: {}", e);
            }
            config.save_to(config_path)?;
            println!("{} {} = {}", "✓".green(), key, value);
        }
    }

    Ok(())
}

async fn load_input(manager: &mut InputManager, path: &Path, label: &str) -> Result<InputDocument> {
    cli::validate_file_extension(path, &INPUT_EXTENSIONS).map_err(|e| {
        ScreenerError::UnsupportedFormat(format!("{} {}: {}", label, path.display(), e))
    })?;
    manager.load_document(path).await
}

/// Load the embedding model once, off the async runtime
async fn load_semantic_scorer(config: &Config, disabled: bool) -> Result<Arc<SemanticScorer>> {
    if disabled {
        return Ok(Arc::new(SemanticScorer::unavailable("disabled with --no-semantic")));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Loading embedding model...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let config = config.clone();
    let scorer = tokio::task::spawn_blocking(move || SemanticScorer::from_config(&config))
        .await
        .map_err(|e| ScreenerError::Processing(format!("Embedding model loader panicked: {}", e)))?;

    spinner.finish_and_clear();

    if let Some(reason) = scorer.unavailable_reason() {
        eprintln!(
            "{} semantic similarity disabled ({})",
            "warning:".yellow().bold(),
            reason
        );
    }

    Ok(Arc::new(scorer))
}
