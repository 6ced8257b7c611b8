//! End-to-end request-cycle behavior of a tutoring session.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use conversation::{ConversationPolicy, HistoryStore, MemoryKeyValueStore};
use limera_core::{ActivityLogger, HostDocument, MemorySink, RangeElement, Selection, TutorSession};
use llm::{ChatRequest, ChatTurn, CompletionModel, ProviderError, Role};
use rhyme::RhymeClient;

struct StubModel {
    reply: Result<String, ProviderError>,
    seen: Mutex<Vec<Vec<ChatTurn>>>,
}

impl StubModel {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(ProviderError::MalformedResponse(
                "response has no choices".to_string(),
            )),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Vec<ChatTurn>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        self.seen.lock().unwrap().push(request.turns().to_vec());
        self.reply.clone()
    }
}

#[derive(Default)]
struct TestHost {
    alerts: Mutex<Vec<String>>,
    appended: Mutex<Vec<String>>,
}

impl HostDocument for TestHost {
    fn show_panel(&self, _title: &str) {}

    fn append_text(&self, text: &str) {
        self.appended.lock().unwrap().push(text.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

struct Fixture {
    store: Arc<MemoryKeyValueStore>,
    sink: Arc<MemorySink>,
    model: Arc<StubModel>,
    session: TutorSession<Arc<MemoryKeyValueStore>>,
}

fn fixture(model: Arc<StubModel>, rhyme_url: &str) -> Fixture {
    let store = Arc::new(MemoryKeyValueStore::new());
    let sink = Arc::new(MemorySink::new());
    let session = TutorSession::new(
        "doc-1",
        store.clone(),
        ConversationPolicy::new("tutor", 50),
        model.clone(),
        RhymeClient::new(rhyme_url),
        ActivityLogger::new(sink.clone()),
    );
    Fixture {
        store,
        sink,
        model,
        session,
    }
}

async fn stored_history(store: &Arc<MemoryKeyValueStore>) -> Vec<ChatTurn> {
    HistoryStore::new(store.clone()).load("doc-1").await.unwrap()
}

#[tokio::test]
async fn first_cycle_persists_and_logs_both_turns() {
    let f = fixture(StubModel::replying("What rhymes with moon?"), "http://unused");

    let reply = f.session.ask("Write about the moon").await.unwrap();
    assert_eq!(reply, "What rhymes with moon?");

    // The provider saw the system preamble plus the user turn.
    let requests = f.model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        vec![
            ChatTurn::system("tutor"),
            ChatTurn::user("Write about the moon"),
        ]
    );

    // Persisted verbatim, reply included.
    assert_eq!(
        stored_history(&f.store).await,
        vec![
            ChatTurn::system("tutor"),
            ChatTurn::user("Write about the moon"),
            ChatTurn::assistant("What rhymes with moon?"),
        ]
    );

    // Both turns audited, user first.
    let records = f.sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].action_type, "user_prompt");
    assert_eq!(records[0].payload, serde_json::json!("Write about the moon"));
    assert_eq!(records[1].action_type, "assistant_reply");
    assert_eq!(records[1].payload, serde_json::json!("What rhymes with moon?"));
}

#[tokio::test]
async fn provider_failure_saves_nothing_and_logs_nothing() {
    let f = fixture(StubModel::failing(), "http://unused");

    let err = f.session.ask("Write about the moon").await.unwrap_err();
    assert!(err.downcast_ref::<ProviderError>().is_some());

    // History reverts to its pre-cycle persisted state: empty.
    assert!(stored_history(&f.store).await.is_empty());
    assert!(f.sink.records().is_empty());

    // The failed cycle left no orphan user turn for the next cycle.
    assert!(f.session.transcript().await.unwrap().is_empty());
}

#[tokio::test]
async fn long_conversations_are_trimmed_before_the_provider_call() {
    let f = fixture(StubModel::replying("keep going"), "http://unused");

    // 60 pre-existing turns: 1 system + 59 alternating user/assistant.
    let mut seeded = vec![ChatTurn::system("tutor")];
    for i in 1..60 {
        if i % 2 == 1 {
            seeded.push(ChatTurn::user(format!("u{i}")));
        } else {
            seeded.push(ChatTurn::assistant(format!("a{i}")));
        }
    }
    HistoryStore::new(f.store.clone())
        .save("doc-1", &seeded)
        .await
        .unwrap();

    f.session.ask("new prompt").await.unwrap();

    // The provider saw exactly the cap: system turn plus the 49 most recent
    // of the 61 pre-trim turns (original indices 12..60, then the new one).
    let sent = &f.model.requests()[0];
    assert_eq!(sent.len(), 50);
    assert_eq!(sent[0], seeded[0]);
    assert_eq!(&sent[1..49], &seeded[12..60]);
    assert_eq!(sent[49], ChatTurn::user("new prompt"));

    // Persisted history carries the reply on top; it trims next cycle.
    let stored = stored_history(&f.store).await;
    assert_eq!(stored.len(), 51);
    assert_eq!(stored[0].role, Role::System);
    assert_eq!(stored[50], ChatTurn::assistant("keep going"));
}

#[tokio::test]
async fn selection_cycle_inserts_the_reply() {
    let f = fixture(StubModel::replying("Try a rhyme for red."), "http://unused");
    let host = TestHost::default();

    let selection = Selection::new(vec![
        RangeElement::whole("Roses are red"),
        RangeElement::partial("Violets", 0, 3),
    ]);
    f.session
        .ask_from_selection(Some(&selection), &host)
        .await
        .unwrap();

    assert_eq!(
        f.model.requests()[0][1],
        ChatTurn::user("Roses are red\nViol")
    );
    assert_eq!(
        host.appended.lock().unwrap().as_slice(),
        ["Try a rhyme for red."]
    );
    assert!(host.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_selection_alerts_instead_of_calling_the_provider() {
    let f = fixture(StubModel::replying("unused"), "http://unused");
    let host = TestHost::default();

    f.session.ask_from_selection(None, &host).await.unwrap();

    assert_eq!(
        host.alerts.lock().unwrap().as_slice(),
        ["Please select some text first."]
    );
    assert!(f.model.requests().is_empty());
    assert!(stored_history(&f.store).await.is_empty());
}

#[tokio::test]
async fn blank_selection_also_alerts() {
    let f = fixture(StubModel::replying("unused"), "http://unused");
    let host = TestHost::default();

    let selection = Selection::new(vec![RangeElement::whole("   ")]);
    f.session
        .ask_from_selection(Some(&selection), &host)
        .await
        .unwrap();

    assert_eq!(host.alerts.lock().unwrap().len(), 1);
    assert!(f.model.requests().is_empty());
}

#[tokio::test]
async fn transcript_hides_the_system_turn() {
    let f = fixture(StubModel::replying("What rhymes with moon?"), "http://unused");
    f.session.ask("Write about the moon").await.unwrap();

    assert_eq!(
        f.session.transcript().await.unwrap(),
        vec![
            ChatTurn::user("Write about the moon"),
            ChatTurn::assistant("What rhymes with moon?"),
        ]
    );
}

#[tokio::test]
async fn clear_resets_the_conversation_and_notifies() {
    let f = fixture(StubModel::replying("hello"), "http://unused");
    let host = TestHost::default();

    f.session.ask("hi").await.unwrap();
    f.session.clear_with_notice(&host).await.unwrap();

    assert!(stored_history(&f.store).await.is_empty());
    assert_eq!(
        host.alerts.lock().unwrap().as_slice(),
        ["Chat history cleared."]
    );

    // The next cycle starts from a fresh preamble.
    f.session.ask("again").await.unwrap();
    let requests = f.model.requests();
    assert_eq!(requests[1][0], ChatTurn::system("tutor"));
    assert_eq!(requests[1].len(), 2);
}

#[tokio::test]
async fn rhyme_lookup_is_audited_with_its_result() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words"))
        .and(query_param("rel_rhy", "moon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"word": "june"},
            {"word": "soon"},
        ])))
        .mount(&server)
        .await;

    let f = fixture(StubModel::replying("unused"), &server.uri());

    let rhymes = f.session.find_rhymes("moon").await;
    assert_eq!(rhymes, vec!["june", "soon"]);

    let records = f.sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action_type, "rhyme_lookup");
    assert_eq!(
        records[0].payload,
        serde_json::json!({"word": "moon", "result": ["june", "soon"]})
    );
}

#[tokio::test]
async fn blank_rhyme_word_is_neither_fetched_nor_audited() {
    let f = fixture(StubModel::replying("unused"), "http://unused");
    assert!(f.session.find_rhymes("  ").await.is_empty());
    assert!(f.sink.records().is_empty());
}
