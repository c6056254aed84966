use std::sync::Arc;
use nt_core::{Error, Result, Summarizer};
use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummySummarizer;
pub use openai::OpenAiSummarizer;

/// Build the summarizer named by `name` (`openai` or `dummy`).
pub fn create_summarizer(name: &str, config: Config) -> Result<Arc<dyn Summarizer>> {
    match name {
        "openai" => Ok(Arc::new(OpenAiSummarizer::new(config)?)),
        "dummy" => Ok(Arc::new(DummySummarizer::new())),
        other => Err(Error::Inference(format!(
            "Unknown summarizer: {}. Available summarizers: openai, dummy",
            other
        ))),
    }
}
