//! CLI module for specmine
//!
//! Handles file discovery, orchestration and output formatting

pub mod check;
pub mod output;
pub mod translate;

/// Report format of a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Expected: human, json", s)),
        }
    }
}
