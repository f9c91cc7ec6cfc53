pub mod analysis;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod table;
pub mod weight;

pub use config::{load_config, save_config, PipelineConfig};
pub use pipeline::{execute, load_tables, run, PipelineError, PipelineInputs, PipelineOutput};
