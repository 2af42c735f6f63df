pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use config::ExtractionConfig;
pub use core::batch::{BatchOptions, BatchRunner, BatchSummary};
pub use core::engine::ExtractionEngine;
pub use domain::model::{
    ActDetails, ActionType, Category, ClassifiedResult, Document, Movement, MovementFields,
    ScoredMovement,
};
pub use domain::ports::ResultSink;
pub use utils::error::{DomError, Result};
