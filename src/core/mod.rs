pub mod batch;
pub mod classifier;
pub mod details;
pub mod engine;
pub mod fields;
pub mod movements;
pub mod names;
pub mod scoring;
pub mod text;

pub use crate::domain::model::{ClassifiedResult, Document, Movement};
pub use crate::domain::ports::ResultSink;
pub use crate::utils::error::Result;
