use super::*;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tollgate_core::{FieldSpec, FieldType};

/// Answers every request with a fixed outcome and remembers what it saw.
struct FixedPresenter {
    outcome: ElicitationOutcome,
    calls: AtomicUsize,
    seen: Mutex<Vec<ElicitationRequest>>,
}

impl FixedPresenter {
    fn new(outcome: ElicitationOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ElicitationPresenter for FixedPresenter {
    async fn present(&self, request: ElicitationRequest) -> ElicitationOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        self.outcome.clone()
    }
}

/// Never answers.
struct SilentPresenter;

#[async_trait]
impl ElicitationPresenter for SilentPresenter {
    async fn present(&self, _request: ElicitationRequest) -> ElicitationOutcome {
        std::future::pending().await
    }
}

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => panic!("test arguments must be an object"),
    }
}

fn send_email() -> ToolSchema {
    ToolSchema::new("send_email")
        .with_field("to", FieldSpec::required(FieldType::String))
        .with_field(
            "subject",
            FieldSpec::required(FieldType::String).with_default(json!("(no subject)")),
        )
        .with_field(
            "priority",
            FieldSpec::optional(FieldType::String).with_options(["low", "high"]),
        )
}

#[tokio::test]
async fn test_complete_arguments_skip_presenter() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Decline);
    let engine = ElicitationEngine::new(presenter.clone());
    let partial = args(json!({"to": "a@b.c", "subject": "Hi"}));

    let outcome = engine
        .elicit("send_email", &send_email(), &partial, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, ElicitationOutcome::Accept(partial));
    assert_eq!(presenter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_contains_only_missing_fields() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Accept(args(json!({"subject": "Hi"}))));
    let engine = ElicitationEngine::new(presenter.clone());
    let partial = args(json!({"to": "a@b.c"}));

    let outcome = engine
        .elicit("send_email", &send_email(), &partial, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ElicitationOutcome::Accept(args(json!({"to": "a@b.c", "subject": "Hi"})))
    );
    let seen = presenter.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].requested_fields(), vec!["subject"]);
    assert_eq!(seen[0].partial, partial);
    assert_eq!(
        seen[0].schema.field("subject").unwrap().default,
        Some(json!("(no subject)"))
    );
    assert!(seen[0].message.contains("subject"));
}

#[tokio::test]
async fn test_decline_passes_through() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Decline);
    let engine = ElicitationEngine::new(presenter.clone());

    let outcome = engine
        .elicit("send_email", &send_email(), &Arguments::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome, ElicitationOutcome::Decline);
    assert_eq!(presenter.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_accept_missing_required_is_rejected() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Accept(args(json!({"subject": null}))));
    let engine = ElicitationEngine::new(presenter);

    let err = engine
        .elicit(
            "send_email",
            &send_email(),
            &args(json!({"to": "a@b.c"})),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.tool, "send_email");
    assert_eq!(err.problems, vec!["missing required field 'subject'".to_string()]);
}

#[tokio::test]
async fn test_accept_wrong_type_and_unexpected_field() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Accept(args(
        json!({"subject": 42, "priority": "high"}),
    )));
    let engine = ElicitationEngine::new(presenter);

    let err = engine
        .elicit(
            "send_email",
            &send_email(),
            &args(json!({"to": "a@b.c"})),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.problems.len(), 2);
    assert!(err.problems[0].contains("expected string, found integer"));
    assert!(err.problems[1].contains("unexpected field 'priority'"));
}

#[test]
fn test_every_resolution_is_terminal() {
    let rejected: Result<ElicitationOutcome, ValidationError> = Err(ValidationError {
        tool: "send_email".to_string(),
        problems: vec!["missing required field 'subject'".to_string()],
    });
    let cases = [
        (Ok(ElicitationOutcome::Accept(Arguments::new())), ElicitationState::Accepted),
        (Ok(ElicitationOutcome::Decline), ElicitationState::Declined),
        (Ok(ElicitationOutcome::Cancel), ElicitationState::Cancelled),
        (rejected, ElicitationState::Rejected),
    ];
    for (result, expected) in cases {
        let state = resolved_state(&result);
        assert_eq!(state, expected);
        assert!(state.is_terminal());
    }
}

#[tokio::test]
async fn test_already_cancelled_never_presents() {
    let presenter = FixedPresenter::new(ElicitationOutcome::Accept(Arguments::new()));
    let engine = ElicitationEngine::new(presenter.clone());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = engine
        .elicit("send_email", &send_email(), &Arguments::new(), &cancel)
        .await
        .unwrap();

    assert_eq!(outcome, ElicitationOutcome::Cancel);
    assert_eq!(presenter.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_while_waiting() {
    let engine = ElicitationEngine::new(Arc::new(SilentPresenter));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let outcome = engine
        .elicit("send_email", &send_email(), &Arguments::new(), &cancel)
        .await
        .unwrap();
    assert_eq!(outcome, ElicitationOutcome::Cancel);
}

#[tokio::test]
async fn test_timeout_resolves_as_cancel() {
    let engine =
        ElicitationEngine::new(Arc::new(SilentPresenter)).with_timeout(Duration::from_millis(20));
    assert_eq!(engine.timeout(), Some(Duration::from_millis(20)));

    let outcome = engine
        .elicit("send_email", &send_email(), &Arguments::new(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, ElicitationOutcome::Cancel);
}
