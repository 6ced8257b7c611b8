use llm::{ChatTurn, Role};

/// Default conversation length cap, counting the system turn.
pub const DEFAULT_MAX_TURNS: usize = 50;

/// Enforces the shape of a conversation history before and after a provider
/// call.
///
/// Invariants maintained over any non-empty history:
/// - index 0 is the single system turn;
/// - length never exceeds `max_turns` when a request is prepared;
/// - relative order of surviving turns is preserved.
pub struct ConversationPolicy {
    system_prompt: String,
    max_turns: usize,
}

impl ConversationPolicy {
    pub fn new(system_prompt: impl Into<String>, max_turns: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            max_turns,
        }
    }

    pub fn with_default_cap(system_prompt: impl Into<String>) -> Self {
        Self::new(system_prompt, DEFAULT_MAX_TURNS)
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Phase one of a request cycle: seed the system preamble if the history
    /// is empty, append the user turn verbatim, then trim to the cap.
    pub fn prepare_request(&self, history: &mut Vec<ChatTurn>, user_text: &str) {
        if history.is_empty() {
            history.push(ChatTurn::system(&self.system_prompt));
        }
        history.push(ChatTurn::user(user_text));
        self.trim(history);
    }

    /// Phase two: append the assistant reply. Deliberately does not re-trim;
    /// a finalized history may transiently hold `max_turns + 1` turns until
    /// the next `prepare_request` trims it again.
    pub fn finalize_reply(&self, history: &mut Vec<ChatTurn>, reply_text: &str) {
        history.push(ChatTurn::assistant(reply_text));
    }

    /// Rewrite an over-cap history to the system turn plus the most recent
    /// `max_turns - 1` turns. Idempotent once under the cap.
    fn trim(&self, history: &mut Vec<ChatTurn>) {
        if history.len() <= self.max_turns {
            return;
        }
        let keep_from = history.len() - (self.max_turns - 1);
        let mut trimmed = Vec::with_capacity(self.max_turns);
        trimmed.push(history[0].clone());
        trimmed.extend_from_slice(&history[keep_from..]);
        *history = trimmed;
    }

    /// The externally visible transcript: user and assistant turns only.
    /// The system turn never leaves the policy.
    pub fn filter_exportable(history: &[ChatTurn]) -> Vec<ChatTurn> {
        history
            .iter()
            .filter(|t| t.role != Role::System)
            .cloned()
            .collect()
    }
}
