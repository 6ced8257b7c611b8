pub mod chat;
mod provider;

pub use chat::OpenAIChatModel;
pub use provider::OpenAIProvider;
