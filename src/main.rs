use clap::Parser;
use dom_extract::adapters::{input, output};
use dom_extract::utils::error::{DomError, ErrorSeverity};
use dom_extract::utils::{logger, validation::Validate};
use dom_extract::{
    BatchOptions, BatchRunner, BatchSummary, CliConfig, ExtractionConfig, ExtractionEngine,
    OutputFormat,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(logger::LogOptions {
        verbose: config.verbose,
        json: config.log_json,
        mirror_trace: config.trace,
    });

    tracing::info!("Starting dom-extract CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config) {
        Ok(summary) => {
            tracing::info!(
                "✅ Extraction completed: {} of {} documents emitted, {} movement(s)",
                summary.emitted_results,
                summary.total_documents,
                summary.movements
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run(config: &CliConfig) -> Result<BatchSummary, DomError> {
    let extraction = match &config.config {
        Some(path) => {
            tracing::info!("📋 Loading extraction config from {}", path);
            ExtractionConfig::from_file(path)?
        }
        None => ExtractionConfig::default(),
    };
    let engine = ExtractionEngine::new(extraction)?;

    let docs = input::load_documents(&config.input)?;
    let runner = BatchRunner::new(
        &engine,
        BatchOptions {
            keyword: config.keyword.clone(),
            min_score: config.min_score,
        },
    );

    let writer: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let summary = match config.format {
        OutputFormat::Json => {
            let mut sink = output::JsonReportSink::new(writer, config.keyword.clone());
            runner.run(&docs, &mut sink)?
        }
        OutputFormat::Csv => {
            let mut sink = output::CsvMovementSink::new(writer);
            runner.run(&docs, &mut sink)?
        }
    };

    if let Some(path) = &config.output {
        tracing::info!("📁 Output saved to: {}", path);
    }
    Ok(summary)
}
