use super::*;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tollgate_core::{FieldSpec, FieldType, PermissionDecision, RiskLevel, StaticSchemaRegistry};
use tollgate_elicitation::{ElicitationPresenter, ElicitationRequest};

/// Answers every approval request with a fixed response after an optional delay.
struct ScriptedHandler {
    response: Option<ApprovalResponse>,
    delay: Duration,
    calls: AtomicUsize,
    seen: Mutex<Vec<ApprovalRequest>>,
}

impl ScriptedHandler {
    fn new(response: Option<ApprovalResponse>) -> Arc<Self> {
        Self::delayed(response, Duration::ZERO)
    }

    fn delayed(response: Option<ApprovalResponse>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            response,
            delay,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApprovalHandler for ScriptedHandler {
    async fn request_approval(&self, request: ApprovalRequest) -> Option<ApprovalResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response
    }
}

/// Never answers.
struct SilentHandler;

#[async_trait]
impl ApprovalHandler for SilentHandler {
    async fn request_approval(&self, _request: ApprovalRequest) -> Option<ApprovalResponse> {
        std::future::pending().await
    }
}

struct ScriptedPresenter {
    outcome: ElicitationOutcome,
    calls: AtomicUsize,
}

impl ScriptedPresenter {
    fn new(outcome: ElicitationOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ElicitationPresenter for ScriptedPresenter {
    async fn present(&self, _request: ElicitationRequest) -> ElicitationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Signals when asked, then never answers.
struct StalledPresenter {
    asked: tokio::sync::Notify,
}

#[async_trait]
impl ElicitationPresenter for StalledPresenter {
    async fn present(&self, _request: ElicitationRequest) -> ElicitationOutcome {
        self.asked.notify_one();
        std::future::pending().await
    }
}

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => panic!("test arguments must be an object"),
    }
}

fn registry() -> Arc<StaticSchemaRegistry> {
    Arc::new(
        StaticSchemaRegistry::new()
            .with_schema(
                ToolSchema::new("send_email")
                    .with_description("Send an email")
                    .with_field("to", FieldSpec::required(FieldType::String))
                    .with_field("subject", FieldSpec::required(FieldType::String)),
            )
            .with_schema(
                ToolSchema::new("read_file")
                    .with_risk(RiskLevel::Low)
                    .with_field("filepath", FieldSpec::required(FieldType::String)),
            )
            .with_schema(
                ToolSchema::new("delete_file")
                    .with_risk(RiskLevel::High)
                    .with_field("filepath", FieldSpec::required(FieldType::String)),
            ),
    )
}

fn engine(
    policy: Arc<PolicyStore>,
    presenter: Arc<ScriptedPresenter>,
    handler: Arc<dyn ApprovalHandler>,
) -> DecisionEngine {
    DecisionEngine::new(
        registry(),
        policy,
        ElicitationEngine::new(presenter),
        handler,
    )
}

fn no_elicitation() -> Arc<ScriptedPresenter> {
    ScriptedPresenter::new(ElicitationOutcome::Cancel)
}

#[tokio::test]
async fn test_unknown_tool_is_configuration_error() {
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve()));
    let engine = engine(Arc::new(PolicyStore::new()), no_elicitation(), handler.clone());
    let request = ToolCallRequest::new("format_disk", Arguments::new());

    let err = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DecisionError::Configuration(ConfigurationError::UnknownTool {
            tool: "format_disk".to_string()
        })
    );
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_always_deny_never_prompts() {
    let policy = Arc::new(
        PolicyStore::new().with_entries([("delete_file", PolicyEntry::AlwaysDeny)]),
    );
    let presenter = no_elicitation();
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve()));
    let engine = engine(policy, presenter.clone(), handler.clone());

    // Incomplete arguments must not trigger elicitation either.
    let request = ToolCallRequest::new("delete_file", Arguments::new());
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(decision.decision, PermissionDecision::Denied);
    assert_eq!(decision.denial, Some(DenialReason::Policy));
    assert!(!decision.asked);
    assert_eq!(presenter.calls(), 0);
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_always_allow_complete_is_silent() {
    let policy = Arc::new(PolicyStore::new().with_entries([("read_file", PolicyEntry::AlwaysAllow)]));
    let presenter = no_elicitation();
    let handler = ScriptedHandler::new(Some(ApprovalResponse::deny()));
    let engine = engine(policy, presenter.clone(), handler.clone());

    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a.txt"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(decision.is_allowed());
    assert!(!decision.asked);
    assert_eq!(decision.elicitation, None);
    assert_eq!(presenter.calls(), 0);
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_always_allow_incomplete_elicits_without_approval() {
    let policy = Arc::new(PolicyStore::new().with_entries([("send_email", PolicyEntry::AlwaysAllow)]));
    let presenter = ScriptedPresenter::new(ElicitationOutcome::Accept(args(json!({"subject": "Hi"}))));
    let handler = ScriptedHandler::new(Some(ApprovalResponse::deny()));
    let engine = engine(policy, presenter.clone(), handler.clone());

    let request = ToolCallRequest::new("send_email", args(json!({"to": "a@b.c"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(decision.is_allowed());
    assert_eq!(decision.arguments, args(json!({"to": "a@b.c", "subject": "Hi"})));
    assert_eq!(decision.elicitation, Some(ElicitationState::Accepted));
    assert_eq!(presenter.calls(), 1);
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_no_policy_asks_once_without_remembering() {
    let policy = Arc::new(PolicyStore::new());
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve()));
    let engine = engine(Arc::clone(&policy), no_elicitation(), handler.clone());

    let request = ToolCallRequest::new("delete_file", args(json!({"filepath": "a.txt"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(decision.is_allowed());
    assert!(decision.asked);
    assert_eq!(policy.lookup("delete_file"), None);

    let seen = handler.seen.lock().unwrap();
    assert_eq!(seen[0].request_id, request.id());
    assert_eq!(seen[0].assessment.level, RiskLevel::High);
    assert_eq!(seen[0].arguments, args(json!({"filepath": "a.txt"})));
}

#[tokio::test]
async fn test_explicit_ask_entry_prompts_every_time() {
    let policy = Arc::new(PolicyStore::new().with_entries([("read_file", PolicyEntry::Ask)]));
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve()));
    let engine = engine(policy, no_elicitation(), handler.clone());

    for _ in 0..2 {
        let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
        engine
            .decide(&request, &CancellationToken::new())
            .await
            .unwrap();
    }
    assert_eq!(handler.calls(), 2);
}

#[tokio::test]
async fn test_remember_records_policy() {
    let policy = Arc::new(PolicyStore::new());
    let handler = ScriptedHandler::new(Some(ApprovalResponse::deny_always()));
    let engine = engine(Arc::clone(&policy), no_elicitation(), handler.clone());

    let request = ToolCallRequest::new("delete_file", args(json!({"filepath": "a"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(decision.denial, Some(DenialReason::User));
    assert_eq!(policy.lookup("delete_file"), Some(PolicyEntry::AlwaysDeny));

    // The remembered answer applies without prompting.
    let request = ToolCallRequest::new("delete_file", args(json!({"filepath": "b"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(decision.denial, Some(DenialReason::Policy));
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn test_elicitation_decline_denies_before_prompt() {
    let policy = Arc::new(PolicyStore::new());
    let presenter = ScriptedPresenter::new(ElicitationOutcome::Decline);
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve_always()));
    let engine = engine(Arc::clone(&policy), presenter, handler.clone());

    let request = ToolCallRequest::new("send_email", args(json!({"to": "a@b.c"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(decision.denial, Some(DenialReason::Declined));
    assert_eq!(decision.elicitation, Some(ElicitationState::Declined));
    assert!(decision.asked);
    assert_eq!(handler.calls(), 0);
    assert!(policy.is_empty());
}

#[tokio::test]
async fn test_invalid_accept_is_validation_error() {
    let presenter = ScriptedPresenter::new(ElicitationOutcome::Accept(Arguments::new()));
    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve()));
    let engine = engine(Arc::new(PolicyStore::new()), presenter, handler.clone());

    let request = ToolCallRequest::new("send_email", args(json!({"to": "a@b.c"})));
    let err = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap_err();

    let DecisionError::Validation { error, asked } = err else {
        panic!("expected validation error");
    };
    assert!(asked);
    assert_eq!(error.problems, vec!["missing required field 'subject'".to_string()]);
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_cancel_during_approval_leaves_policy_unchanged() {
    let policy = Arc::new(PolicyStore::new());
    let engine = engine(Arc::clone(&policy), no_elicitation(), Arc::new(SilentHandler));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = engine.decide(&request, &cancel).await.unwrap();

    assert_eq!(decision.denial, Some(DenialReason::Cancelled));
    assert!(decision.asked);
    assert!(policy.is_empty());
}

#[tokio::test]
async fn test_dismissed_prompt_is_cancelled() {
    let handler = ScriptedHandler::new(None);
    let engine = engine(Arc::new(PolicyStore::new()), no_elicitation(), handler);

    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(decision.denial, Some(DenialReason::Cancelled));
}

#[tokio::test]
async fn test_approval_timeout() {
    let engine = engine(
        Arc::new(PolicyStore::new()),
        no_elicitation(),
        Arc::new(SilentHandler),
    )
    .with_approval_timeout(Duration::from_millis(20));

    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(decision.denial, Some(DenialReason::Cancelled));
}

#[tokio::test]
async fn test_remember_failure_still_applies_answer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("permissions.json");
    let policy = Arc::new(PolicyStore::open(&path).await.unwrap());
    // A directory at the target path makes every write fail.
    std::fs::create_dir(&path).unwrap();

    let handler = ScriptedHandler::new(Some(ApprovalResponse::approve_always()));
    let engine = engine(Arc::clone(&policy), no_elicitation(), handler);

    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = engine
        .decide(&request, &CancellationToken::new())
        .await
        .unwrap();
    assert!(decision.is_allowed());
    assert_eq!(policy.lookup("read_file"), None);
}

#[tokio::test]
async fn test_same_tool_decisions_are_linearized() {
    let policy = Arc::new(PolicyStore::new());
    let handler = ScriptedHandler::delayed(
        Some(ApprovalResponse::approve_always()),
        Duration::from_millis(50),
    );
    let engine = Arc::new(engine(Arc::clone(&policy), no_elicitation(), handler.clone()));

    let tasks: Vec<_> = (0..3)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
                engine.decide(&request, &CancellationToken::new()).await
            })
        })
        .collect();

    let mut decisions = Vec::new();
    for task in tasks {
        decisions.push(task.await.unwrap().unwrap());
    }
    assert!(decisions.iter().all(Decision::is_allowed));
    // Only the first call prompts; the others see the remembered answer.
    assert_eq!(decisions.iter().filter(|d| d.asked).count(), 1);
    assert_eq!(handler.calls(), 1);
}

#[tokio::test]
async fn test_other_tool_not_blocked_by_held_gate() {
    let policy = Arc::new(PolicyStore::new().with_entries([("read_file", PolicyEntry::AlwaysAllow)]));
    let engine = engine(
        Arc::clone(&policy),
        no_elicitation(),
        Arc::new(SilentHandler),
    );

    let _held = policy.acquire("send_email").await;
    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = tokio::time::timeout(
        Duration::from_millis(200),
        engine.decide(&request, &CancellationToken::new()),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_always_allow_elicitation_does_not_hold_gate() {
    let policy = Arc::new(PolicyStore::new().with_entries([("send_email", PolicyEntry::AlwaysAllow)]));
    let presenter = Arc::new(StalledPresenter {
        asked: tokio::sync::Notify::new(),
    });
    let engine = Arc::new(DecisionEngine::new(
        registry(),
        Arc::clone(&policy),
        ElicitationEngine::new(presenter.clone()),
        Arc::new(SilentHandler),
    ));

    let cancel = CancellationToken::new();
    let stalled = {
        let engine = Arc::clone(&engine);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let request = ToolCallRequest::new("send_email", args(json!({"to": "a@b.c"})));
            engine.decide(&request, &cancel).await
        })
    };
    presenter.asked.notified().await;

    let request = ToolCallRequest::new(
        "send_email",
        args(json!({"to": "a@b.c", "subject": "Hi"})),
    );
    let decision = tokio::time::timeout(
        Duration::from_millis(200),
        engine.decide(&request, &CancellationToken::new()),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(decision.is_allowed());
    assert!(!decision.asked);

    cancel.cancel();
    let stalled = stalled.await.unwrap().unwrap();
    assert_eq!(stalled.denial, Some(DenialReason::Cancelled));
}

#[tokio::test]
async fn test_cancel_while_waiting_for_gate() {
    let policy = Arc::new(PolicyStore::new());
    let engine = engine(
        Arc::clone(&policy),
        no_elicitation(),
        ScriptedHandler::new(Some(ApprovalResponse::approve())),
    );

    let _held = policy.acquire("read_file").await;
    let cancel = CancellationToken::new();
    cancel.cancel();
    let request = ToolCallRequest::new("read_file", args(json!({"filepath": "a"})));
    let decision = engine.decide(&request, &cancel).await.unwrap();
    assert_eq!(decision.denial, Some(DenialReason::Cancelled));
    assert!(!decision.asked);
}
