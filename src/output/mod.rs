//! Report structures and formatters

pub mod formatter;
pub mod report;

pub use formatter::{save_report_to_file, ConsoleFormatter, JsonFormatter, OutputFormatter, ReportGenerator};
pub use report::{MatchLevel, ScreeningReport};
