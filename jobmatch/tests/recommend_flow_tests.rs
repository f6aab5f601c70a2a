use std::sync::Arc;

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobmatch::config::{LlmConfig, RetrievalConfig};
use jobmatch::corpus::{JobSource, JobTable};
use jobmatch::error::JobMatchError;
use jobmatch::index::DistanceMetric;
use jobmatch::llm::LlmProvider;
use jobmatch::models::{ParseOutcome, RecommendationRecord};
use jobmatch::profile::{ProfileInput, DEFAULT_MAX_RESUME_CHARS};
use jobmatch::recommend::{write_recommendations_csv, JobSession};

mod common;
use common::{completion_body, KeywordEmbedder, JOBS_CSV};

async fn loaded_session(top_k: usize) -> JobSession {
    let mut session = JobSession::new(
        Arc::new(KeywordEmbedder::default()),
        RetrievalConfig {
            top_k,
            max_context_chars: 5000,
            metric: DistanceMetric::Cosine,
        },
    );
    let table = JobTable::from_csv_bytes(JOBS_CSV.as_bytes()).unwrap();
    session.load_jobs(JobSource::Table(table)).await.unwrap();
    session
}

async fn llm_returning(server: &MockServer, content: &str) -> LlmProvider {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .expect(1)
        .mount(server)
        .await;

    LlmProvider::new(Some(&LlmConfig {
        model: "openai/gpt-4o-mini".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(format!("{}/v1", server.uri())),
        timeout_secs: 5,
        max_retries: 0,
        temperature: Some(0.5),
    }))
}

fn profile() -> String {
    ProfileInput::new("SQL, Tableau", "2 years of reporting", "Bangalore", "")
        .build(DEFAULT_MAX_RESUME_CHARS)
}

#[tokio::test]
async fn test_recommend_parses_fenced_model_output() {
    let server = MockServer::start().await;
    let llm = llm_returning(
        &server,
        "Sure! Here are your matches:\n```json\n[{\"Job Title\": \"Data Analyst\", \"Company\": \"ABC Corp\", \"Match Reason\": \"SQL and Tableau\", \"Apply Link\": \"https://abc.example/analyst\"}]\n```",
    )
    .await;

    let session = loaded_session(2).await;
    let recommendation = session.recommend(&profile(), &llm, None).await.unwrap();

    assert_eq!(recommendation.retrieved.len(), 2);
    assert_eq!(
        recommendation.outcome,
        ParseOutcome::Parsed(vec![RecommendationRecord {
            job_title: "Data Analyst".to_string(),
            company: "ABC Corp".to_string(),
            match_reason: "SQL and Tableau".to_string(),
            apply_link: "https://abc.example/analyst".to_string(),
        }])
    );
}

#[tokio::test]
async fn test_prompt_carries_profile_and_retrieved_jobs() {
    let server = MockServer::start().await;
    let llm = llm_returning(&server, "[]").await;

    let session = loaded_session(1).await;
    let recommendation = session.recommend(&profile(), &llm, None).await.unwrap();
    assert_eq!(recommendation.outcome, ParseOutcome::Parsed(vec![]));

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();

    assert!(prompt.contains("Skills: SQL, TableauExperience: 2 years of reporting"));
    assert!(prompt.contains(&recommendation.retrieved[0].content));
    assert_eq!(recommendation.retrieved[0].metadata.title, "Data Analyst");
}

#[tokio::test]
async fn test_unparseable_output_keeps_raw_text() {
    let server = MockServer::start().await;
    let llm = llm_returning(&server, "I could not find any suitable jobs, sorry.").await;

    let session = loaded_session(3).await;
    let recommendation = session.recommend(&profile(), &llm, Some(1)).await.unwrap();

    assert_eq!(recommendation.retrieved.len(), 1);
    match recommendation.outcome {
        ParseOutcome::Unparseable { raw } => {
            assert_eq!(raw, "I could not find any suitable jobs, sorry.")
        }
        other => panic!("expected unparseable outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_recommend_before_load_is_not_ready() {
    let session = JobSession::new(
        Arc::new(KeywordEmbedder::default()),
        RetrievalConfig::default(),
    );
    let err = session
        .recommend(&profile(), &LlmProvider::new(None), None)
        .await
        .unwrap_err();
    assert!(matches!(err, JobMatchError::IndexNotReady));
}

#[tokio::test]
async fn test_parsed_recommendations_export_to_csv() {
    let server = MockServer::start().await;
    let llm = llm_returning(
        &server,
        r#"[{"Job Title": "Rust Engineer", "Company": "Ferrous Systems", "Match Reason": "Async, Rust"}]"#,
    )
    .await;

    let session = loaded_session(3).await;
    let records = session
        .recommend(&profile(), &llm, None)
        .await
        .unwrap()
        .outcome
        .into_records();

    let mut buffer = Vec::new();
    write_recommendations_csv(&mut buffer, &records).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert_eq!(
        csv,
        "Job Title,Company,Match Reason,Apply Link\nRust Engineer,Ferrous Systems,\"Async, Rust\",\n"
    );
}
