use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use netsight::{
    ChatSession, CompletionClient, InsightPanel, Message, Result, Role, ScriptedClient,
    SubmitOutcome, FALLBACK_REPLY,
};
use tokio::sync::Notify;

/// Holds every request until released, so tests can observe the pending state.
struct StalledClient {
    release: Notify,
    calls: AtomicUsize,
}

impl StalledClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionClient for StalledClient {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok("released".to_string())
    }
}

#[tokio::test]
async fn successful_turns_interleave_user_and_assistant() {
    let client = ScriptedClient::replying(vec![
        "Sensor Network 3 is saturating its uplink.",
        "Move traffic to Hub East-1 while East-2 recovers.",
    ]);
    let session = ChatSession::new(client.clone());

    assert_eq!(
        session.submit("What's causing the high latency?").await,
        SubmitOutcome::Replied
    );
    assert_eq!(session.submit("What should I do about it?").await, SubmitOutcome::Replied);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[0].role, Role::User);
    assert_eq!(transcript[0].content, "What's causing the high latency?");
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].content, "Sensor Network 3 is saturating its uplink.");
    assert_eq!(transcript[2].role, Role::User);
    assert_eq!(transcript[3].role, Role::Assistant);
    assert_eq!(client.calls(), 2);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn empty_and_whitespace_submissions_are_ignored() {
    let client = ScriptedClient::replying(vec!["never used"]);
    let session = ChatSession::new(client.clone());

    assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
    assert_eq!(session.submit("   \t\n").await, SubmitOutcome::Ignored);

    assert_eq!(session.transcript_len(), 0);
    assert_eq!(client.calls(), 0);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn submit_while_pending_is_a_no_op() {
    let client = StalledClient::new();
    let session = Arc::new(ChatSession::new(client.clone()));

    let inflight = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.submit("first question").await })
    };

    while !session.is_pending() {
        tokio::task::yield_now().await;
    }

    assert_eq!(session.submit("second question").await, SubmitOutcome::Ignored);
    assert_eq!(session.transcript_len(), 1);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);

    client.release.notify_one();
    assert_eq!(inflight.await.unwrap(), SubmitOutcome::Replied);
    assert_eq!(session.transcript_len(), 2);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn transport_failure_appends_fallback_and_settles() {
    let client = ScriptedClient::new(vec![Err("connection refused".into())]);
    let session = ChatSession::new(client);

    assert_eq!(session.submit("is the network ok?").await, SubmitOutcome::Fallback);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].role, Role::Assistant);
    assert_eq!(transcript[1].content, FALLBACK_REPLY);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn malformed_reply_matches_transport_failure() {
    // A body missing the expected choice/content field surfaces from the
    // client as an error; at the transcript level it must look identical to
    // a transport failure.
    let malformed = netsight::parse_openai_reply(serde_json::json!({"choices": []}));
    let client = ScriptedClient::new(vec![Err(malformed.unwrap_err().to_string())]);
    let session = ChatSession::new(client);

    assert_eq!(session.submit("status?").await, SubmitOutcome::Fallback);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].content, FALLBACK_REPLY);
    assert!(!session.is_pending());
}

#[tokio::test]
async fn failed_turn_recovers_on_next_submission() {
    let client = ScriptedClient::new(vec![
        Err("gateway timeout".into()),
        Ok("Back online: uptime is 99.8%.".into()),
    ]);
    let session = ChatSession::new(client);

    assert_eq!(session.submit("first try").await, SubmitOutcome::Fallback);
    assert_eq!(session.submit("second try").await, SubmitOutcome::Replied);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[1].content, FALLBACK_REPLY);
    assert_eq!(transcript[3].content, "Back online: uptime is 99.8%.");
}

#[tokio::test]
async fn insight_generation_parses_structured_reply() {
    let reply = r#"```json
{
  "insights": [
    {
      "title": "Wednesday failure spike",
      "description": "Wed saw 3 failures, the weekly peak, with uptime dipping to 98.8%",
      "priority": "high",
      "action": "Audit the Wednesday maintenance window"
    }
  ],
  "overallHealth": "Good",
  "riskScore": 42
}
```"#;
    let client = ScriptedClient::replying(vec![reply]);
    let panel = InsightPanel::new(client);

    let report = panel.generate().await.expect("gate was free");
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.overall_health, "Good");
    assert_eq!(report.risk_score, 42);
    assert_eq!(panel.latest().unwrap(), report);
    assert!(!panel.is_pending());
}

#[tokio::test]
async fn insight_failure_yields_unavailable_report() {
    let client = ScriptedClient::new(vec![Err("dns failure".into())]);
    let panel = InsightPanel::new(client);

    let report = panel.generate().await.expect("gate was free");
    assert_eq!(report.insights[0].title, "Analysis Unavailable");
    assert_eq!(report.overall_health, "Unknown");
    assert_eq!(report.risk_score, 0);
    assert!(!panel.is_pending());
}

#[tokio::test]
async fn insight_unparseable_reply_yields_unavailable_report() {
    let client = ScriptedClient::replying(vec!["Overall the network looks healthy."]);
    let panel = InsightPanel::new(client);

    let report = panel.generate().await.expect("gate was free");
    assert_eq!(report.insights[0].title, "Analysis Unavailable");
}
