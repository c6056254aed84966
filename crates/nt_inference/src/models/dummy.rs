use std::fmt;
use nt_core::Summarizer;

const SUMMARY_WORDS: usize = 20;

/// Offline summarizer: the first words of the description, or of the title.
#[derive(Default)]
pub struct DummySummarizer;

impl fmt::Debug for DummySummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummySummarizer").finish()
    }
}

impl DummySummarizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Summarizer for DummySummarizer {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, title: Option<&str>, description: Option<&str>) -> String {
        let text = description
            .filter(|d| !d.trim().is_empty())
            .or(title)
            .unwrap_or_default();
        let words: Vec<&str> = text.split_whitespace().take(SUMMARY_WORDS).collect();
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_summarizer() {
        let summarizer = DummySummarizer::new();

        let summary = summarizer
            .summarize(Some("Title"), Some("This is a test article. It has multiple sentences."))
            .await;
        assert_eq!(summary, "This is a test article. It has multiple sentences.");

        let long = (0..50).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let summary = summarizer.summarize(None, Some(&long)).await;
        assert_eq!(summary.split_whitespace().count(), 20);

        let summary = summarizer.summarize(Some("Only a title"), Some("   ")).await;
        assert_eq!(summary, "Only a title");

        assert_eq!(summarizer.summarize(None, None).await, "");
    }
}
