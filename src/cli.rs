//! CLI interface for the resume screener

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Plain-text formats accepted as input documents
pub const INPUT_EXTENSIONS: [&str; 4] = ["txt", "text", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Rank resumes against a job description")]
#[command(
    long_about = "Score resumes against a job description by combining skill coverage, TF-IDF similarity and Model2Vec embedding similarity into one weighted score"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank one or more resumes against a job description
    Screen {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files (TXT, MD)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Show matched and missing terms per candidate
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file (name derived from the job file when omitted)
        #[arg(short, long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,

        /// Skip loading the embedding model (semantic score is 0.0)
        #[arg(long)]
        no_semantic: bool,
    },

    /// Score a single resume with a detailed breakdown
    Score {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Skip loading the embedding model (semantic score is 0.0)
        #[arg(long)]
        no_semantic: bool,
    },

    /// Print the terms extracted from a document
    Extract {
        /// Document to analyse (TXT, MD)
        file: PathBuf,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download a model
    Download {
        /// Model id, name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model id to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.semantic_weight")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_screen_command() {
        let cli = Cli::try_parse_from([
            "resume-screener",
            "screen",
            "--job",
            "job.txt",
            "a.txt",
            "b.md",
            "--output",
            "json",
            "--no-semantic",
        ])
        .unwrap();

        match cli.command {
            Commands::Screen { job, resumes, output, save, no_semantic, .. } => {
                assert_eq!(job, PathBuf::from("job.txt"));
                assert_eq!(resumes.len(), 2);
                assert_eq!(output.as_deref(), Some("json"));
                assert_eq!(save, None);
                assert!(no_semantic);
            }
            _ => panic!("expected screen command"),
        }

        assert!(Cli::try_parse_from(["resume-screener", "screen", "--job", "job.txt"]).is_err());
    }

    #[test]
    fn test_save_with_optional_path() {
        let save_of = |args: &[&str]| match Cli::try_parse_from(args).unwrap().command {
            Commands::Screen { save, .. } => save,
            _ => panic!("expected screen command"),
        };

        let bare = save_of(&["resume-screener", "screen", "--job", "job.txt", "a.txt", "--save"]);
        assert_eq!(bare, Some(None));

        let named = save_of(&["resume-screener", "screen", "--job", "job.txt", "--save", "out.json", "a.txt"]);
        assert_eq!(named, Some(Some(PathBuf::from("out.json"))));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_extension_validation() {
        assert!(validate_file_extension(Path::new("cv.TXT"), &INPUT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.pdf"), &INPUT_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), &INPUT_EXTENSIONS).is_err());
    }
}
