// Command-line driver

pub mod batch;

pub use batch::{render_outcome, run_batch, BatchReport, SAMPLE_PROMPTS};
