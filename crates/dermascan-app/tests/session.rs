use std::sync::{Arc, Mutex};

use dermascan_app::error::{ANALYSIS_FAILED_MESSAGE, AppError};
use dermascan_app::{ScreeningSession, SessionOptions, SessionState};
use dermascan_bedrock::error::BedrockError;
use dermascan_bedrock::{AnalysisClient, AnalysisPrompt, BoxFuture, TransactionResult};
use dermascan_core::models::finding::FindingStatus;
use dermascan_core::models::metrics::Metric;
use dermascan_core::models::request::{AnalysisRequest, ImageMediaType};
use dermascan_core::models::response::AnalysisResponse;
use dermascan_core::models::token_count::{TokenCount, TokenUsage};
use dermascan_export::styles::DocumentStyles;
use dermascan_storage::MemoryStore;

const MODEL: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

const REPLY: &str = "~ABCDE_START~
Confidence Score: 82%
ISIC Risk Score: 6
A: Suspicious - uneven halves
Moles: Benign - uniform spots
~ABCDE_END~
## Summary
Rest of report. See [AAD](https://www.aad.org).";

/// Replies from a queue; an `Err` entry simulates a network failure.
struct ScriptedClient {
    replies: Mutex<Vec<Result<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .rev()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            prompts: Arc::default(),
        }
    }
}

impl AnalysisClient for ScriptedClient {
    fn analyze<'a>(
        &'a self,
        prompt: &'a AnalysisPrompt,
        model_id: &'a str,
    ) -> BoxFuture<'a, Result<TransactionResult<AnalysisResponse>, BedrockError>> {
        Box::pin(async move {
            self.prompts.lock().expect("lock").push(prompt.user_text.clone());
            let reply = self
                .replies
                .lock()
                .expect("lock")
                .pop()
                .unwrap_or_else(|| Err("no scripted reply".to_string()));
            match reply {
                Ok(text) => Ok(TransactionResult::new(
                    model_id,
                    TokenUsage {
                        tokens: TokenCount {
                            input: 1500,
                            output: 400,
                        },
                        cost_usd: 0.0105,
                    },
                    AnalysisResponse::new(text.clone()).with_citations(
                        dermascan_screening::citations::extract_link_citations(&text),
                    ),
                )),
                Err(message) => Err(BedrockError::Invocation(message)),
            }
        })
    }
}

fn options() -> SessionOptions {
    SessionOptions {
        default_model: MODEL.to_string(),
        share_base_url: "https://dermascan.app/".to_string(),
        styles: DocumentStyles::default(),
    }
}

fn session(replies: Vec<Result<&str, &str>>) -> ScreeningSession<ScriptedClient, MemoryStore> {
    ScreeningSession::new(ScriptedClient::new(replies), MemoryStore::new(), options())
}

fn request(notes: Option<&str>) -> AnalysisRequest {
    AnalysisRequest::new(
        vec![0xFF, 0xD8, 0xFF, 0xE0],
        ImageMediaType::Jpeg,
        notes.map(str::to_string),
        MODEL,
    )
    .expect("request")
}

#[tokio::test]
async fn successful_analysis_is_parsed_flagged_and_saved() {
    let client = ScriptedClient::new(vec![Ok(REPLY)]);
    let prompts = Arc::clone(&client.prompts);
    let mut session = ScreeningSession::new(client, MemoryStore::new(), options());
    assert_eq!(session.state(), &SessionState::Idle);

    let result = session
        .analyze(request(Some("itchy")), None)
        .await
        .expect("analysis");

    assert_eq!(session.state(), &SessionState::Complete);
    assert_eq!(result.parsed.findings.len(), 2);
    assert_eq!(result.parsed.findings[0].status, FindingStatus::Suspicious);
    assert_eq!(result.parsed.metrics.confidence, Metric::Present(82));
    assert!(result.assessment.needs_attention);
    assert!(result.view.attention_banner.is_some());
    assert_eq!(result.view.citations.len(), 1);
    assert_eq!(result.notes.as_deref(), Some("itchy"));
    assert_eq!(result.model_id.as_deref(), Some(MODEL));

    let history = session.history().expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(Some(history[0].id), result.record_id);
    assert_eq!(history[0].metrics.as_ref(), Some(&result.parsed.metrics));
    assert_eq!(history[0].notes.as_deref(), Some("itchy"));
    assert_eq!(history[0].image.bytes().expect("image"), vec![0xFF, 0xD8, 0xFF, 0xE0]);

    let prompts = prompts.lock().expect("lock");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("<patient_notes>\nitchy\n</patient_notes>"));
}

#[tokio::test]
async fn failure_sets_generic_message_and_later_success_supersedes_it() {
    let mut session = session(vec![Err("ThrottlingException: slow down"), Ok(REPLY)]);

    let err = session
        .analyze(request(None), None)
        .await
        .expect_err("scripted failure");
    assert!(matches!(err, AppError::AnalysisFailed));
    assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
    assert_eq!(
        session.state(),
        &SessionState::Failed {
            message: "Analysis failed. Please try again.".to_string()
        }
    );
    assert!(session.current().is_none());
    assert!(session.history().expect("history").is_empty());

    session.analyze(request(None), None).await.expect("analysis");
    assert_eq!(session.state(), &SessionState::Complete);
    assert!(session.current().is_some());
}

#[tokio::test]
async fn history_respects_the_cap() {
    let mut session = session(vec![Ok(REPLY); 4]);
    session.set_history_cap(3).expect("cap");

    let mut ids = Vec::new();
    for _ in 0..4 {
        let result = session.analyze(request(None), None).await.expect("analysis");
        ids.push(result.record_id.expect("saved"));
    }

    let history = session.history().expect("history");
    assert_eq!(history.len(), 3);
    let kept: Vec<_> = history.iter().map(|r| r.id).collect();
    assert!(!kept.contains(&ids[0]));
    for id in &ids[1..] {
        assert!(kept.contains(id));
    }
}

#[tokio::test]
async fn storage_failure_does_not_fail_the_analysis() {
    let mut session = ScreeningSession::new(
        ScriptedClient::new(vec![Ok(REPLY)]),
        MemoryStore::with_quota(64),
        options(),
    );

    let result = session.analyze(request(None), None).await.expect("analysis");
    assert_eq!(result.record_id, None);
    assert_eq!(session.state(), &SessionState::Complete);
    assert!(session.history().expect("history").is_empty());
}

#[tokio::test]
async fn lesion_links_follow_records() {
    let mut session = session(vec![Ok(REPLY), Ok(REPLY)]);
    let lesion = session.create_lesion("Left shoulder", "left shoulder").expect("lesion");

    let linked = session
        .analyze(request(None), Some(lesion.id))
        .await
        .expect("analysis");
    let unlinked = session.analyze(request(None), None).await.expect("analysis");

    let for_lesion = session.history_for_lesion(lesion.id).expect("for lesion");
    assert_eq!(for_lesion.len(), 1);
    assert_eq!(Some(for_lesion[0].id), linked.record_id);

    session
        .assign_lesion(unlinked.record_id.expect("saved"), Some(lesion.id))
        .expect("assign");
    assert_eq!(session.history_for_lesion(lesion.id).expect("for lesion").len(), 2);

    assert!(session.delete_lesion(lesion.id).expect("delete"));
    assert!(session.lesions().expect("lesions").is_empty());
    assert_eq!(session.history().expect("history").len(), 2);
}

#[tokio::test]
async fn share_link_reopens_the_same_result() {
    let mut sender = session(vec![Ok(REPLY)]);
    let original = sender.analyze(request(None), None).await.expect("analysis");
    let link = sender.share_link().expect("share link");
    assert!(link.starts_with("https://dermascan.app/?share="));

    let mut receiver = session(Vec::new());
    let shared = receiver.open_shared(&link).expect("open shared");

    assert_eq!(shared.response, original.response);
    assert_eq!(shared.parsed, original.parsed);
    assert_eq!(shared.assessment, original.assessment);
    assert_eq!(shared.record_id, None);
    assert!(receiver.history().expect("history").is_empty());

    assert!(matches!(
        receiver.open_shared("https://dermascan.app/?share=%%%"),
        Err(AppError::Export(_))
    ));
}

#[tokio::test]
async fn reopened_record_matches_and_exports() {
    let mut session = session(vec![Ok(REPLY)]);
    assert!(matches!(session.export_pdf(), Err(AppError::NoResult)));

    let original = session.analyze(request(Some("grew")), None).await.expect("analysis");
    let id = original.record_id.expect("saved");

    let reopened = session.open_record(id).expect("reopen");
    assert_eq!(reopened.parsed, original.parsed);
    assert_eq!(reopened.notes.as_deref(), Some("grew"));

    let markdown = session.export_markdown().expect("markdown");
    assert!(markdown.contains("## ABCDE Findings"));
    assert!(markdown.contains("grew"));
    assert!(session.export_pdf().expect("pdf").starts_with(b"%PDF"));
    assert!(session.export_docx().expect("docx").starts_with(b"PK"));

    assert!(matches!(
        session.open_record(uuid::Uuid::new_v4()),
        Err(AppError::RecordNotFound(_))
    ));
}

#[tokio::test]
async fn model_selection_falls_back_to_default() {
    let mut session = session(Vec::new());
    assert_eq!(session.model_id().expect("model"), MODEL);

    session
        .select_model(Some("us.anthropic.claude-opus-4-1-20250805-v1:0".to_string()))
        .expect("select");
    assert_eq!(
        session.model_id().expect("model"),
        "us.anthropic.claude-opus-4-1-20250805-v1:0"
    );

    session.select_model(None).expect("clear");
    assert_eq!(session.model_id().expect("model"), MODEL);
}

#[tokio::test]
async fn records_and_lesions_can_be_managed() {
    let mut session = session(vec![Ok(REPLY); 2]);
    let first = session.analyze(request(None), None).await.expect("analysis");
    session.analyze(request(None), None).await.expect("analysis");

    assert!(session.delete_record(first.record_id.expect("saved")).expect("delete"));
    assert!(!session.delete_record(uuid::Uuid::new_v4()).expect("delete missing"));
    assert_eq!(session.history().expect("history").len(), 1);

    let lesion = session.create_lesion("Mole", "back").expect("lesion");
    let renamed = session.rename_lesion(lesion.id, "Back mole").expect("rename");
    assert_eq!(renamed.name, "Back mole");
    assert_eq!(renamed.body_location, "back");

    session.clear_history().expect("clear");
    assert!(session.history().expect("history").is_empty());
    session.close().expect("close");
}

#[tokio::test]
async fn configured_session_opens_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = dermascan_app::config::ScreeningConfig::new(
        "us-east-1",
        dermascan_app::config::CredentialSource::DefaultChain,
        MODEL,
    );
    config.data_dir = Some(dir.path().join("data"));

    let mut session = dermascan_app::open_session(&config).await.expect("session");
    assert_eq!(session.model_id().expect("model"), MODEL);
    session.create_lesion("Arm", "left forearm").expect("lesion");
    assert!(dir.path().join("data").join("dermascan.lesions.json").exists());
}
