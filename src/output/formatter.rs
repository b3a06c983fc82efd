//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{MatchLevel, ScreeningReport};
use crate::processing::analyzer::CandidateScore;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting screening reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for machine consumption
pub struct JsonFormatter {
    pretty: bool,
}

/// Report generator that dispatches to the configured formatter
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_level_badge(&self, score: f32) -> String {
        let level = MatchLevel::from_score(score);
        let color = match level {
            MatchLevel::Excellent => Color::Green,
            MatchLevel::Strong => Color::BrightGreen,
            MatchLevel::Moderate => Color::Yellow,
            MatchLevel::Weak => Color::Red,
            MatchLevel::Poor => Color::BrightRed,
        };

        if self.use_colors {
            format!("[{}]", level.label().color(color).bold())
        } else {
            format!("[{}]", level.label())
        }
    }

    fn format_term_list(terms: &[String]) -> String {
        if terms.is_empty() {
            "(none)".to_string()
        } else {
            terms.join(", ")
        }
    }

    fn format_candidate(&self, candidate: &CandidateScore, semantic_available: bool) -> String {
        let mut output = String::new();
        let skills = &candidate.report.skills;

        output.push_str(&format!(
            "#{} {}  Final Score: {:.2}% {}\n",
            candidate.rank,
            self.colorize(&candidate.candidate, Color::Cyan),
            candidate.final_score * 100.0,
            self.format_level_badge(candidate.final_score)
        ));

        let semantic = if semantic_available {
            format!("{:.4}", candidate.semantic_score)
        } else {
            "n/a".to_string()
        };
        output.push_str(&format!(
            "   Semantic: {}  Lexical: {:.4}  Skill Coverage: {:.4} ({}/{})\n",
            semantic, candidate.lexical_score, candidate.coverage_ratio, skills.matched_count, skills.total_count
        ));

        if self.detailed {
            output.push_str(&format!(
                "   {} {}\n",
                self.colorize("Matched:", Color::Green),
                Self::format_term_list(&skills.matched)
            ));
            output.push_str(&format!(
                "   {} {}\n",
                self.colorize("Missing:", Color::Red),
                Self::format_term_list(&skills.missing)
            ));
            output.push_str(&format!(
                "   Experience: {:.4} ({})\n",
                candidate.experience_score, candidate.report.experience.note
            ));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME SCREENING RESULTS", 1));
        output.push_str(&format!(
            "Generated: {} | Reference: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.reference
        ));

        match &report.semantic_model {
            Some(model) => output.push_str(&format!("Embedding model: {}\n", model)),
            None => output.push_str(&format!(
                "{}\n",
                self.colorize(
                    "Warning: embedding model unavailable, semantic scores are 0.0",
                    Color::Yellow
                )
            )),
        }

        output.push_str(&format!(
            "Weights: semantic {:.2}, lexical {:.2}, coverage {:.2}, experience {:.2}\n",
            report.weights.semantic, report.weights.lexical, report.weights.coverage, report.weights.experience
        ));

        output.push_str(&self.format_header("Required Terms", 2));
        output.push_str(&format!("{}\n", Self::format_term_list(&report.reference_terms)));

        output.push_str(&self.format_header("Ranking", 2));
        if report.candidates.is_empty() {
            output.push_str("No candidates scored.\n");
        }
        for candidate in &report.candidates {
            output.push_str(&self.format_candidate(candidate, report.semantic_available));
        }

        if let Some(average) = report.average_score() {
            output.push_str(&format!(
                "\n{} candidates, average score {:.2}%\n",
                report.candidates.len(),
                average * 100.0
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, reference_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(reference_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_screening{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_screening{}.json", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::TermMatcher;
    use crate::processing::scoring::{CandidateReport, ExperienceAnalysis, ScoreWeights};
    use tempfile::TempDir;

    fn sample_report(semantic_model: Option<String>) -> ScreeningReport {
        let skills = TermMatcher::default().match_terms(["Python", "AWS", "ML"], "Python and machine learning");
        let candidate = CandidateScore {
            rank: 1,
            candidate: "alice.txt".to_string(),
            final_score: 0.7235,
            semantic_score: 0.8123,
            lexical_score: 0.3361,
            coverage_ratio: skills.coverage_ratio,
            experience_score: 1.0,
            report: CandidateReport {
                skills,
                experience: ExperienceAnalysis::placeholder(1.0),
            },
        };

        ScreeningReport::new(
            "job.txt",
            vec!["AWS".to_string(), "ML".to_string(), "Python".to_string()],
            semantic_model,
            ScoreWeights::default(),
            vec![candidate],
        )
    }

    #[test]
    fn test_console_output() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format_report(&sample_report(Some("potion".to_string()))).unwrap();

        assert!(output.contains("#1 alice.txt  Final Score: 72.35% [STRONG]"));
        assert!(output.contains("Semantic: 0.8123  Lexical: 0.3361  Skill Coverage: 0.6667 (2/3)"));
        assert!(output.contains("AWS, ML, Python"));
        assert!(!output.contains("Missing:"));
    }

    #[test]
    fn test_console_detailed_output() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report(None)).unwrap();

        assert!(output.contains("Matched: ML, Python"));
        assert!(output.contains("Missing: AWS"));
        assert!(output.contains("Experience: 1.0000"));
        assert!(output.contains("embedding model unavailable"));
        assert!(output.contains("Semantic: n/a"));
    }

    #[test]
    fn test_json_output() {
        let report = sample_report(None);
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["semantic_available"], false);
        assert_eq!(value["candidates"][0]["rank"], 1);
        assert_eq!(value["candidates"][0]["report"]["skills"]["missing"][0], "AWS");

        let parsed: ScreeningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.candidates, report.candidates);
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true);
        let report = sample_report(None);
        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        let console = generator.generate_report(&report, &OutputFormat::Console).unwrap();
        assert!(console.contains("RESUME SCREENING RESULTS"));
    }

    #[test]
    fn test_save_and_filename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");
        save_report_to_file("{}", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        assert_eq!(suggest_filename(&OutputFormat::Json, "jobs/backend.txt", false), "backend_screening.json");
        assert_eq!(suggest_filename(&OutputFormat::Console, "job.md", false), "job_screening.txt");
    }
}
