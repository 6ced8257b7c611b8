//! Rhyme lookup over a Datamuse-compatible word API.
//!
//! Unlike the completion client, every failure path here degrades to an
//! empty result: rhyme suggestions are an optional enrichment, never a
//! required step in the tutoring workflow.

use serde::Deserialize;
use std::collections::HashSet;

/// Upper bound on candidates requested from the provider.
const MAX_CANDIDATES: &str = "50";

#[derive(Clone, Debug, Deserialize)]
struct RhymeEntry {
    #[serde(default)]
    word: String,
}

#[derive(Clone)]
pub struct RhymeClient {
    http: reqwest::Client,
    base_url: String,
}

impl RhymeClient {
    pub fn default() -> Self {
        Self::new("https://api.datamuse.com")
    }

    pub fn new(base_url: &str) -> Self {
        RhymeClient {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Rhyme candidates for one word, in the provider's relevance order.
    ///
    /// A blank word returns an empty list without making a request.
    /// Multi-word phrases are discarded; duplicates keep their first
    /// occurrence. Transport and parse failures also yield an empty list.
    pub async fn lookup(&self, word: &str) -> Vec<String> {
        let word = word.trim();
        if word.is_empty() {
            return Vec::new();
        }

        match self.fetch(word).await {
            Ok(entries) => collect_single_words(entries),
            Err(e) => {
                tracing::debug!(word, error = %e, "rhyme lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, word: &str) -> Result<Vec<RhymeEntry>, reqwest::Error> {
        let url = format!("{}/words", self.base_url);
        let lowered = word.to_lowercase();
        let response = self
            .http
            .get(&url)
            .query(&[("rel_rhy", lowered.as_str()), ("max", MAX_CANDIDATES)])
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }
}

/// Drop phrases, keep first occurrences, preserve order.
fn collect_single_words(entries: Vec<RhymeEntry>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut rhymes = Vec::new();
    for entry in entries {
        let w = entry.word.trim();
        if w.is_empty() || w.contains(char::is_whitespace) {
            continue;
        }
        if seen.insert(w.to_string()) {
            rhymes.push(w.to_string());
        }
    }
    rhymes
}
