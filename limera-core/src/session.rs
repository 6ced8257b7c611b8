//! The per-document tutoring session.

use std::sync::Arc;

use anyhow::Result;
use conversation::{ConversationPolicy, HistoryStore, KeyValueStore};
use llm::{ChatRequest, ChatTurn, CompletionModel};
use rhyme::RhymeClient;

use crate::activity_log::ActivityLogger;
use crate::host::HostDocument;
use crate::selection::{Selection, extract_plain_text};

/// One tutoring session, scoped to one document.
///
/// All mutation of the persisted history goes through the request cycle:
/// load, append user turn, trim, provider call, append reply, save, log.
/// The save happens only after a successful reply, so a provider failure
/// leaves the stored history exactly as it was before the cycle.
///
/// A session assumes one in-flight request per document; callers serialize
/// cycles against the same scope key.
pub struct TutorSession<S: KeyValueStore> {
    scope_key: String,
    history: HistoryStore<S>,
    policy: ConversationPolicy,
    model: Arc<dyn CompletionModel + Send + Sync>,
    rhymes: RhymeClient,
    log: ActivityLogger,
}

impl<S: KeyValueStore> TutorSession<S> {
    pub fn new(
        scope_key: impl Into<String>,
        store: S,
        policy: ConversationPolicy,
        model: Arc<dyn CompletionModel + Send + Sync>,
        rhymes: RhymeClient,
        log: ActivityLogger,
    ) -> Self {
        Self {
            scope_key: scope_key.into(),
            history: HistoryStore::new(store),
            policy,
            model,
            rhymes,
            log,
        }
    }

    /// Run one request cycle and return the assistant reply.
    ///
    /// A provider error aborts the cycle: nothing is saved and nothing is
    /// written to the activity log.
    pub async fn ask(&self, user_text: &str) -> Result<String> {
        let mut history = self.history.load(&self.scope_key).await?;
        self.policy.prepare_request(&mut history, user_text);

        let request = ChatRequest::new(&history);
        let reply = self.model.complete(&request).await?;

        self.policy.finalize_reply(&mut history, &reply);
        self.history.save(&self.scope_key, &history).await?;

        self.log.record("user_prompt", user_text);
        self.log.record("assistant_reply", &reply);
        Ok(reply)
    }

    /// Request cycle that also inserts the reply into the document body.
    pub async fn ask_and_insert(&self, user_text: &str, host: &dyn HostDocument) -> Result<()> {
        let reply = self.ask(user_text).await?;
        host.append_text(&reply);
        Ok(())
    }

    /// "Generate from selection": run a cycle on the current selection's
    /// plain text and insert the reply. Without a usable selection the host
    /// is told to select something and no cycle runs.
    pub async fn ask_from_selection(
        &self,
        selection: Option<&Selection>,
        host: &dyn HostDocument,
    ) -> Result<()> {
        let plain = extract_plain_text(selection);
        let Some(plain) = plain.filter(|p| !p.trim().is_empty()) else {
            host.alert("Please select some text first.");
            return Ok(());
        };
        self.ask_and_insert(plain.trim(), host).await
    }

    /// The exportable transcript: user and assistant turns only.
    pub async fn transcript(&self) -> Result<Vec<ChatTurn>> {
        let history = self.history.load(&self.scope_key).await?;
        Ok(ConversationPolicy::filter_exportable(&history))
    }

    /// Reset the stored conversation to empty.
    pub async fn clear(&self) -> Result<()> {
        self.history.clear(&self.scope_key).await
    }

    /// Clear and tell the writer about it.
    pub async fn clear_with_notice(&self, host: &dyn HostDocument) -> Result<()> {
        self.clear().await?;
        host.alert("Chat history cleared.");
        Ok(())
    }

    /// Rhyme candidates for one word. Lookups that actually run are recorded
    /// in the activity log; a blank word short-circuits unrecorded.
    pub async fn find_rhymes(&self, word: &str) -> Vec<String> {
        if word.trim().is_empty() {
            return Vec::new();
        }
        let result = self.rhymes.lookup(word).await;
        self.log.record(
            "rhyme_lookup",
            serde_json::json!({ "word": word, "result": result }),
        );
        result
    }
}
