// Adapters layer: reading scraper dumps and writing reports.

pub mod input;
pub mod output;
