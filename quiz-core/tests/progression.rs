use async_trait::async_trait;
use quiz_core::{
    Advance, Choice, Completion, Error, Hooks, Navigator, Notifier, OptionId, Question, QuestionId,
    QuizEngine, ResultSubmitter, ResultsPayload, SubmissionOutcome, SubmissionTransport,
    submission::FAILURE_MESSAGE,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Records every payload it is given, then succeeds or fails
struct FakeTransport {
    fail: bool,
    payloads: Mutex<Vec<serde_json::Value>>,
}

impl FakeTransport {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            payloads: Mutex::new(vec![]),
        })
    }

    fn payloads(&self) -> Vec<serde_json::Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for FakeTransport {
    async fn submit(&self, payload: &ResultsPayload) -> Result<(), Error> {
        self.payloads
            .lock()
            .unwrap()
            .push(serde_json::to_value(payload).unwrap());
        if self.fail {
            Err(Error::Rejected(503))
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct Surface {
    paths: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Navigator for Surface {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

impl Notifier for Surface {
    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

fn question(id: &str, options: &[(&str, bool)]) -> Question {
    Question {
        id: id.into(),
        text: format!("{id}?"),
        options: options
            .iter()
            .map(|(o, is_correct)| Choice::new(*o, *o, *is_correct))
            .collect(),
    }
}

fn three_questions() -> Vec<Question> {
    vec![
        question("Q1", &[("A", true), ("B", false)]),
        question("Q2", &[("C", false), ("D", true)]),
        question("Q3", &[("E", true), ("F", false)]),
    ]
}

fn engine(
    questions: Vec<Question>,
    transport: Arc<FakeTransport>,
    surface: Arc<Surface>,
    hooks: Hooks,
) -> QuizEngine {
    let submitter = ResultSubmitter::new(transport, surface.clone(), surface);
    QuizEngine::new("exam-1".into(), questions, submitter, hooks)
}

#[tokio::test]
async fn three_question_attempt_scores_and_submits() {
    let transport = FakeTransport::new(false);
    let surface = Arc::new(Surface::default());
    let mut engine = engine(
        three_questions(),
        transport.clone(),
        surface.clone(),
        Hooks::default(),
    );

    engine.select("A".into()).unwrap();
    let advance = engine.advance_selected().await.unwrap();
    assert_eq!(
        advance,
        Advance::Next {
            index: 1,
            correct: true
        }
    );
    assert_eq!(engine.state().score(), 1);
    assert!(engine.state().selected().is_none());

    engine.select("C".into()).unwrap();
    engine.advance_selected().await.unwrap();
    assert_eq!(engine.state().score(), 1);
    assert_eq!(engine.state().current_index(), 2);
    assert!(engine.state().is_last_question());
    assert!(transport.payloads().is_empty());

    engine.select("E".into()).unwrap();
    let Advance::Completed(completion) = engine.advance_selected().await.unwrap() else {
        panic!("expected the attempt to complete");
    };

    assert_eq!(completion.score, 2);
    assert_eq!(completion.total, 3);
    assert!(engine.state().is_complete());
    assert_eq!(
        transport.payloads(),
        [serde_json::json!({
            "examId": "exam-1",
            "answers": { "Q1": "A", "Q2": "C", "Q3": "E" }
        })]
    );
    assert_eq!(*surface.paths.lock().unwrap(), ["/exam/exam-1/codedetails"]);
    assert!(surface.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn answers_track_each_advance() {
    let transport = FakeTransport::new(false);
    let mut engine = engine(
        three_questions(),
        transport,
        Arc::new(Surface::default()),
        Hooks::default(),
    );

    for (k, selection) in ["B", "D"].into_iter().enumerate() {
        engine.advance(selection.into()).await;
        let answers = engine.state().answers();
        assert_eq!(answers.len(), k + 1);
        let question_id = &engine.state().questions()[k].id;
        assert_eq!(answers.get(question_id), Some(&OptionId::new(selection)));
    }
    assert_eq!(engine.state().score(), 1);
}

#[tokio::test]
async fn question_without_correct_option_still_submits() {
    let transport = FakeTransport::new(false);
    let mut engine = engine(
        vec![question("Q1", &[("A", false), ("B", false)])],
        transport.clone(),
        Arc::new(Surface::default()),
        Hooks::default(),
    );

    let advance = engine.advance("B".into()).await;

    let Advance::Completed(completion) = advance else {
        panic!("expected the attempt to complete");
    };
    assert_eq!(completion.score, 0);
    assert!(engine.state().is_complete());
    assert_eq!(
        transport.payloads(),
        [serde_json::json!({ "examId": "exam-1", "answers": { "Q1": "B" } })]
    );
}

#[tokio::test]
async fn failed_submission_still_completes() {
    let transport = FakeTransport::new(true);
    let surface = Arc::new(Surface::default());
    let mut engine = engine(
        three_questions(),
        transport.clone(),
        surface.clone(),
        Hooks::default(),
    );

    engine.advance("A".into()).await;
    engine.advance("D".into()).await;
    let advance = engine.advance("F".into()).await;

    let Advance::Completed(completion) = advance else {
        panic!("expected the attempt to complete");
    };
    assert!(matches!(completion.outcome, SubmissionOutcome::Failed { .. }));
    assert!(engine.state().is_complete());
    assert_eq!(transport.payloads().len(), 1);
    assert_eq!(*surface.errors.lock().unwrap(), [FAILURE_MESSAGE]);
    assert!(surface.paths.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_question_set_is_a_no_op() {
    let transport = FakeTransport::new(false);
    let mut engine = engine(
        vec![],
        transport.clone(),
        Arc::new(Surface::default()),
        Hooks::default(),
    );

    assert_eq!(engine.advance("A".into()).await, Advance::Skipped);
    assert!(engine.state().answers().is_empty());
    assert!(!engine.state().is_complete());
    assert!(transport.payloads().is_empty());
}

#[tokio::test]
async fn advance_without_selection_is_a_no_op() {
    let transport = FakeTransport::new(false);
    let mut engine = engine(
        three_questions(),
        transport,
        Arc::new(Surface::default()),
        Hooks::default(),
    );

    assert!(engine.advance_selected().await.is_none());
    assert_eq!(engine.state().current_index(), 0);
    assert!(engine.state().answers().is_empty());
}

#[tokio::test]
async fn hooks_fire_on_correct_answers_and_completion() {
    let correct_calls = Arc::new(AtomicUsize::new(0));
    let completions = Arc::new(Mutex::new(vec![]));

    let hooks = Hooks {
        on_correct: Some(Box::new({
            let correct_calls = correct_calls.clone();
            move || {
                correct_calls.fetch_add(1, Ordering::SeqCst);
            }
        })),
        on_complete: Some(Box::new({
            let completions = completions.clone();
            move |completion: &Completion| completions.lock().unwrap().push(completion.score)
        })),
    };
    let mut engine = engine(
        three_questions(),
        FakeTransport::new(false),
        Arc::new(Surface::default()),
        hooks,
    );

    engine.advance("A".into()).await;
    engine.advance("D".into()).await;
    assert!(completions.lock().unwrap().is_empty());
    engine.advance("F".into()).await;

    assert_eq!(correct_calls.load(Ordering::SeqCst), 2);
    assert_eq!(*completions.lock().unwrap(), [2]);
}

#[tokio::test]
async fn completed_attempt_ignores_further_advances() {
    let transport = FakeTransport::new(false);
    let mut engine = engine(
        vec![question("Q1", &[("A", true)])],
        transport.clone(),
        Arc::new(Surface::default()),
        Hooks::default(),
    );

    engine.advance("A".into()).await;
    assert_eq!(engine.advance("A".into()).await, Advance::Skipped);
    assert_eq!(engine.state().score(), 1);
    assert_eq!(transport.payloads().len(), 1);
    assert_eq!(
        engine.state().answers().get(&QuestionId::new("Q1")),
        Some(&OptionId::new("A"))
    );
}
