// tests/api_tests.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mindmate::{
    clients::{
        CompletionService, DocumentExtractor, PaperSearch,
        arxiv_client::SearchError,
        llm_client::{CompletionError, CompletionRequest},
    },
    config::Config,
    models::paper::PaperEntry,
    quiz::SessionRegistry,
    routes,
    services::Orchestrator,
    state::AppState,
    storage::{FlashcardStore, HistoryStore, KeyValueStore, MemoryStore},
};
use serde_json::{Value, json};

/// Completion service that answers with queued replies and counts calls.
#[derive(Default)]
struct FakeLlm {
    replies: Mutex<Vec<Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeLlm {
    fn with(replies: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(FakeLlm {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn replying(reply: Value) -> Arc<Self> {
        Self::with(vec![Ok(reply.to_string())])
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for FakeLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(CompletionError::EmptyReply))
    }
}

/// Paper search returning a fixed result.
struct FakePapers {
    entries: Option<Vec<PaperEntry>>,
}

#[async_trait]
impl PaperSearch for FakePapers {
    async fn search(&self, _query: &str) -> Result<Vec<PaperEntry>, SearchError> {
        match &self.entries {
            Some(entries) => Ok(entries.clone()),
            None => Err(SearchError::Url(url::ParseError::EmptyHost)),
        }
    }
}

struct TestApp {
    address: String,
    client: reqwest::Client,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Spawns the app on a random port with the given collaborators.
/// `None` for the LLM means no API key is configured.
async fn spawn_app(llm: Option<Arc<FakeLlm>>, papers: Option<Vec<PaperEntry>>) -> TestApp {
    // 1. In-memory storage
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    // 2. Create test configuration and state
    let config = Config {
        rust_log: "error".to_string(),
        ..Config::default()
    };

    let state = AppState {
        orchestrator: Orchestrator::new(llm.map(|l| l as Arc<dyn CompletionService>)),
        papers: Arc::new(FakePapers {
            entries: Some(papers.unwrap_or_default()),
        }),
        extractor: Arc::new(DocumentExtractor),
        flashcards: FlashcardStore::new(kv.clone()),
        quizzes: SessionRegistry::new(HistoryStore::new(kv), config.quiz_time_limit),
        config,
    };

    serve(state).await
}

async fn serve(state: AppState) -> TestApp {
    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
    }
}

fn paper(id: &str, abstract_text: &str) -> PaperEntry {
    PaperEntry {
        id: id.to_string(),
        title: format!("Paper {}", id),
        abstract_text: abstract_text.to_string(),
        authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
        year: 2021,
        url: format!("http://arxiv.org/abs/{}", id),
    }
}

fn two_question_quiz() -> Value {
    json!({
        "questions": [
            {"question": "2 + 2?", "options": ["3", "4", "5", "6"], "correctAnswer": 1, "explanation": "Basic sums."},
            {"question": "Capital of France?", "options": ["Rome", "Paris", "Oslo", "Bern"], "correctAnswer": 1, "explanation": "Paris."}
        ]
    })
}

#[tokio::test]
async fn unknown_path_404() {
    let app = spawn_app(None, None).await;
    let response = app.get("/random_path_that_does_not_exist").await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn blank_text_is_rejected_without_calling_the_model() {
    // Arrange
    let llm = FakeLlm::replying(json!({}));
    let app = spawn_app(Some(llm.clone()), None).await;

    // Act
    let response = app.post("/api/summarize", json!({ "text": "   " })).await;

    // Assert
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Text is required and must be a string");
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn missing_fields_and_bad_json_are_rejected() {
    let llm = FakeLlm::replying(json!({}));
    let app = spawn_app(Some(llm.clone()), None).await;

    let response = app.post("/api/tutor-chat", json!({})).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .client
        .post(app.url("/api/generate-quiz"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = app.post("/api/search-papers", json!({ "query": "" })).await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Query is required and must be a string");

    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn missing_api_key_is_a_configuration_error() {
    let app = spawn_app(None, None).await;

    let response = app
        .post("/api/generate-flashcards", json!({ "text": "Cells divide." }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "OpenAI API key is not configured");
}

#[tokio::test]
async fn summarize_reports_statistics() {
    // Arrange
    let summary = "s".repeat(250);
    let llm = FakeLlm::replying(json!({ "summary": summary, "keyPoints": ["one", "two", "three"] }));
    let app = spawn_app(Some(llm.clone()), None).await;

    // Act
    let response = app
        .post("/api/summarize", json!({ "text": "t".repeat(1000) }))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["originalLength"], 1000);
    assert_eq!(body["summaryLength"], 250);
    assert_eq!(body["compressionRate"], 75);
    assert_eq!(body["estimatedReadTime"], 1);
    assert_eq!(body["keyPoints"].as_array().unwrap().len(), 3);
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn unusable_reply_is_reported_as_failure() {
    let llm = FakeLlm::with(vec![Ok("Here is your summary!".to_string())]);
    let app = spawn_app(Some(llm), None).await;

    let response = app.post("/api/summarize", json!({ "text": "Cells." })).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to summarize text. Please try again.");
}

#[tokio::test]
async fn upstream_status_is_passed_through() {
    let llm = FakeLlm::with(vec![Err(CompletionError::Api {
        status: Some(429),
        message: "Rate limit reached".to_string(),
    })]);
    let app = spawn_app(Some(llm), None).await;

    let response = app.post("/api/generate-quiz", json!({ "text": "Cells." })).await;

    assert_eq!(response.status().as_u16(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "OpenAI API error: Rate limit reached");
}

#[tokio::test]
async fn generated_flashcards_are_saved_and_replaced() {
    // Arrange
    let llm = FakeLlm::with(vec![
        Ok(json!({ "flashcards": [
            {"question": "What is ATP?", "answer": "Energy currency", "difficulty": "easy"},
            {"question": "What is DNA?", "answer": "Genetic material", "difficulty": "medium"}
        ]})
        .to_string()),
        Ok(json!({ "flashcards": [
            {"question": "What is RNA?", "answer": "A messenger", "difficulty": "hard"}
        ]})
        .to_string()),
    ]);
    let app = spawn_app(Some(llm), None).await;

    // Act
    let response = app
        .post("/api/generate-flashcards", json!({ "text": "Biology notes" }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let saved: Value = app.get("/api/flashcards").await.json().await.unwrap();
    assert_eq!(saved["flashcards"].as_array().unwrap().len(), 2);

    app.post("/api/generate-flashcards", json!({ "text": "More notes" }))
        .await;
    let saved: Value = app.get("/api/flashcards").await.json().await.unwrap();

    // Assert
    assert_eq!(saved["flashcards"].as_array().unwrap().len(), 1);
    assert_eq!(saved["flashcards"][0]["difficulty"], "hard");

    let response = app.delete("/api/flashcards").await;
    assert_eq!(response.status().as_u16(), 204);
    let saved: Value = app.get("/api/flashcards").await.json().await.unwrap();
    assert!(saved["flashcards"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn advanced_quiz_returns_typed_questions() {
    let llm = FakeLlm::replying(json!({ "questions": [
        {"type": "true-false", "question": "Water boils at 100C at sea level.", "correctAnswer": true, "explanation": "It does."},
        {"type": "fill-blank", "question": "The ___ is the powerhouse of the cell.", "correctAnswer": "mitochondria", "explanation": "Classic."}
    ]}));
    let app = spawn_app(Some(llm), None).await;

    let response = app
        .post(
            "/api/generate-advanced-quiz",
            json!({ "text": "Science notes", "questionTypes": ["true-false", "fill-blank"] }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["questions"][0]["type"], "true-false");
    assert_eq!(body["questions"][1]["correctAnswer"], "mitochondria");
}

#[tokio::test]
async fn paper_summary_returns_plain_text() {
    let llm = FakeLlm::with(vec![Ok("The paper shows attention works.".to_string())]);
    let app = spawn_app(Some(llm), None).await;

    let response = app
        .post("/api/summarize-paper", json!({ "abstract": "We propose the Transformer." }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["summary"], "The paper shows attention works.");
}

#[tokio::test]
async fn search_attaches_summaries_with_fallback() {
    // Arrange
    let long_abstract = "a".repeat(500);
    let llm = FakeLlm::with(vec![
        Ok("Short AI summary.".to_string()),
        Err(CompletionError::Api {
            status: Some(503),
            message: "overloaded".to_string(),
        }),
    ]);
    let papers = vec![paper("1706.03762v7", "We propose."), paper("2101.00001v1", &long_abstract)];
    let app = spawn_app(Some(llm.clone()), Some(papers)).await;

    // Act
    let response = app
        .post("/api/search-papers", json!({ "query": "attention" }))
        .await;

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let papers = body["papers"].as_array().unwrap();
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0]["aiSummary"], "Short AI summary.");
    assert_eq!(papers[1]["aiSummary"], "a".repeat(300));
    assert_eq!(papers[0]["published"], 2021);
    assert_eq!(
        papers[0]["citation"],
        "Ada Lovelace, et al. (2021). Paper 1706.03762v7. arXiv preprint arXiv:1706.03762v7."
    );
    assert!(body.get("message").is_none());
    assert_eq!(llm.calls(), 2);
}

#[tokio::test]
async fn search_without_results_says_so() {
    let app = spawn_app(None, Some(Vec::new())).await;

    let response = app
        .post("/api/search-papers", json!({ "query": "nothing matches" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["papers"].as_array().unwrap().is_empty());
    assert_eq!(body["message"], "No papers found for your query.");
}

#[tokio::test]
async fn search_failure_is_reported() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = Config::default();
    let state = AppState {
        orchestrator: Orchestrator::new(None),
        papers: Arc::new(FakePapers { entries: None }),
        extractor: Arc::new(DocumentExtractor),
        flashcards: FlashcardStore::new(kv.clone()),
        quizzes: SessionRegistry::new(HistoryStore::new(kv), config.quiz_time_limit),
        config,
    };
    let app = serve(state).await;

    let response = app.post("/api/search-papers", json!({ "query": "graphs" })).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to search papers. Please try again.");
}

#[tokio::test]
async fn tutor_chat_replies_with_timestamp() {
    let llm = FakeLlm::with(vec![Ok("What do you already know about it?".to_string())]);
    let app = spawn_app(Some(llm.clone()), None).await;

    let response = app
        .post(
            "/api/tutor-chat",
            json!({
                "message": "Explain osmosis",
                "context": "Chapter 3",
                "conversationHistory": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello! What are we studying?"}
                ]
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["response"], "What do you already know about it?");
    assert!(body["timestamp"].is_string());
    assert_eq!(llm.requests.lock().unwrap()[0].history.len(), 2);
}

#[tokio::test]
async fn quiz_session_flow() {
    // Arrange
    let llm = FakeLlm::replying(two_question_quiz());
    let app = spawn_app(Some(llm), None).await;

    // Act: start
    let response = app
        .post("/api/quiz/sessions", json!({ "text": "General knowledge" }))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    let view: Value = response.json().await.unwrap();
    let id = view["id"].as_str().unwrap().to_string();
    assert_eq!(view["status"], "inProgress");
    assert_eq!(view["totalQuestions"], 2);
    assert_eq!(view["timeLeft"], 30);
    assert!(view["question"].get("correctAnswer").is_none());

    // Answer the first question correctly, leave the second unanswered
    let view: Value = app
        .post(&format!("/api/quiz/sessions/{}/answer", id), json!({ "answer": 1 }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["selectedAnswer"], 1);

    let view: Value = app
        .post(&format!("/api/quiz/sessions/{}/next", id), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["currentQuestion"], 1);
    assert_eq!(view["score"], 1);

    // Going back and forward again doesn't count the answer twice
    app.post(&format!("/api/quiz/sessions/{}/previous", id), json!({}))
        .await;
    let view: Value = app
        .post(&format!("/api/quiz/sessions/{}/next", id), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["score"], 1);

    let view: Value = app
        .post(&format!("/api/quiz/sessions/{}/next", id), json!({}))
        .await
        .json()
        .await
        .unwrap();

    // Assert: completed with a review
    assert_eq!(view["status"], "completed");
    assert_eq!(view["result"]["score"], 1);
    assert_eq!(view["result"]["percentage"], 50);
    assert_eq!(view["result"]["passed"], false);
    assert_eq!(view["result"]["review"][0]["correct"], true);
    assert!(view["result"]["review"][1]["yourAnswer"].is_null());

    let history: Value = app.get("/api/quiz/history").await.json().await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["total"], 2);

    // Retry starts over without touching history
    let view: Value = app
        .post(&format!("/api/quiz/sessions/{}/retry", id), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["status"], "inProgress");
    assert_eq!(view["currentQuestion"], 0);
    let history: Value = app.get("/api/quiz/history").await.json().await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);

    // Leaving drops the session
    let response = app.delete(&format!("/api/quiz/sessions/{}", id)).await;
    assert_eq!(response.status().as_u16(), 204);
    let response = app.get(&format!("/api/quiz/sessions/{}", id)).await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.delete("/api/quiz/history").await;
    assert_eq!(response.status().as_u16(), 204);
    let history: Value = app.get("/api/quiz/history").await.json().await.unwrap();
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn quiz_session_with_no_questions_is_not_started() {
    let llm = FakeLlm::replying(json!({ "questions": [] }));
    let app = spawn_app(Some(llm), None).await;

    let response = app
        .post("/api/quiz/sessions", json!({ "text": "Empty material" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No questions were generated. Please try again.");
}

#[tokio::test]
async fn unknown_quiz_session_is_404() {
    let app = spawn_app(None, None).await;

    let response = app
        .get(&format!("/api/quiz/sessions/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app
        .post("/api/quiz/sessions/not-a-uuid/next", json!({}))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn extract_text_from_uploaded_file() {
    let app = spawn_app(None, None).await;

    let part = reqwest::multipart::Part::bytes(b"  Photosynthesis converts light.\n".to_vec())
        .file_name("Notes.TXT");
    let form = reqwest::multipart::Form::new().part("file", part);
    let response = app
        .client
        .post(app.url("/api/extract-text"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["text"], "Photosynthesis converts light.");
    assert_eq!(body["fileName"], "Notes.TXT");
    assert_eq!(body["fileType"], "txt");
}

#[tokio::test]
async fn extract_text_rejects_bad_uploads() {
    let app = spawn_app(None, None).await;

    // No file field
    let form = reqwest::multipart::Form::new().text("note", "hello");
    let response = app
        .client
        .post(app.url("/api/extract-text"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No file provided");

    // Unsupported extension
    let part = reqwest::multipart::Part::bytes(b"slides".to_vec()).file_name("deck.pptx");
    let form = reqwest::multipart::Form::new().part("file", part);
    let response = app
        .client
        .post(app.url("/api/extract-text"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Unsupported file type. Please upload PDF, DOCX, or TXT files."
    );
}

#[tokio::test]
async fn cors_preflight_allows_the_frontend_origin() {
    let app = spawn_app(None, None).await;

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/summarize"))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );
}
