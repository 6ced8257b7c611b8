use async_trait::async_trait;

pub mod api;
mod client;
pub mod error;
pub mod providers;

pub use api::*;
pub use error::ProviderError;

/// A stateless completion provider: takes the full turn sequence, returns
/// one reply. The conversation itself lives with the caller.
#[async_trait]
pub trait CompletionModel {
    /// Model identifier sent to the provider.
    fn name(&self) -> &str;

    /// Request one completion for the given turn sequence.
    ///
    /// Errors are surfaced to the caller; there are no internal retries.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;
}
