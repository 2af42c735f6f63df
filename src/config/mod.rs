pub mod toml_config;

pub use toml_config::ExtractionConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dom-extract")]
#[command(about = "Classify DOM PBH gazette acts and extract personnel movements")]
pub struct CliConfig {
    /// JSON array of {title, content, url?, source?} documents
    #[arg(short, long)]
    pub input: String,

    /// Optional TOML extraction config
    #[arg(short, long)]
    pub config: Option<String>,

    /// Only keep documents whose title or content mention this keyword
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Drop personnel results scoring below this value
    #[arg(long)]
    pub min_score: Option<u8>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Echo each document's extraction trace at trace level
    #[arg(long)]
    pub trace: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["json"])?;

        if let Some(config) = &self.config {
            validation::validate_file_extension("config", config, &["toml"])?;
        }
        if let Some(keyword) = &self.keyword {
            validation::validate_non_empty_string("keyword", keyword)?;
        }
        if let Some(min_score) = self.min_score {
            validation::validate_range("min_score", min_score, 0, 100)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        Ok(())
    }
}
