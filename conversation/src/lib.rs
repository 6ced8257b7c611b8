//! Bounded per-document conversation state.
//!
//! `policy` owns the shape of a history (system preamble, rolling window,
//! exportable view); `store` owns where it lives (a key-value space scoped
//! by document identity).

pub mod policy;
pub mod store;

pub use policy::{ConversationPolicy, DEFAULT_MAX_TURNS};
pub use store::{FileKeyValueStore, HistoryStore, KeyValueStore, MemoryKeyValueStore};
