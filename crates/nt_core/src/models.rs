use async_trait::async_trait;

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Summarize an article from its title and description.
    ///
    /// Never fails: any internal problem (missing credentials, network error,
    /// unexpected response) yields an empty string.
    async fn summarize(&self, title: Option<&str>, description: Option<&str>) -> String;
}
