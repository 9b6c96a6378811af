use tracing::{debug, info};

use crate::{
    question::{ExamId, OptionId, Question},
    session::SessionState,
    submission::{ResultSubmitter, SubmissionOutcome},
};

/// Optional callbacks invoked at fixed points of an attempt.
#[derive(Default)]
pub struct Hooks {
    /// Called with no arguments each time a question is answered correctly
    pub on_correct: Option<Box<dyn FnMut() + Send>>,
    /// Called once, when the attempt completes
    pub on_complete: Option<Box<dyn FnMut(&Completion) + Send>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub score: u32,
    pub total: usize,
    pub outcome: SubmissionOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// No questions were loaded; nothing changed
    Skipped,
    /// Moved on to the question at `index`
    Next { index: usize, correct: bool },
    Completed(Completion),
}

/// Drives one exam attempt: evaluates each selection, records it, and submits on the
/// terminal question.
pub struct QuizEngine {
    exam_id: ExamId,
    state: SessionState,
    submitter: ResultSubmitter,
    hooks: Hooks,
}

impl QuizEngine {
    pub fn new(
        exam_id: ExamId,
        questions: Vec<Question>,
        submitter: ResultSubmitter,
        hooks: Hooks,
    ) -> Self {
        Self {
            exam_id,
            state: SessionState::new(questions),
            submitter,
            hooks,
        }
    }

    pub fn exam_id(&self) -> &ExamId {
        &self.exam_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Forwards to [`SessionState::select`]
    pub fn select(&mut self, option_id: OptionId) -> Result<(), crate::Error> {
        self.state.select(option_id)
    }

    /// Advances with the current selection. `None` if nothing is selected.
    pub async fn advance_selected(&mut self) -> Option<Advance> {
        let selection = self.state.selected()?.clone();
        Some(self.advance(selection).await)
    }

    /// Records `selection` for the current question and moves the attempt forward.
    ///
    /// On the terminal question the full answer set, including this answer, is submitted
    /// exactly once before the attempt is marked complete. A failed submission still
    /// completes the attempt.
    pub async fn advance(&mut self, selection: OptionId) -> Advance {
        let Some(question) = self.state.current_question() else {
            return Advance::Skipped;
        };
        let question_id = question.id.clone();
        let correct = question.is_correct(&selection);

        debug!(question = %question_id, option = %selection, correct, "answer recorded");
        self.state.record_answer(question_id, selection);

        if correct {
            self.state.increment_score();
            if let Some(on_correct) = self.hooks.on_correct.as_mut() {
                on_correct();
            }
        }

        if !self.state.is_last_question() {
            self.state.finish_question();
            return Advance::Next {
                index: self.state.current_index(),
                correct,
            };
        }

        let outcome = self
            .submitter
            .submit(&self.exam_id, self.state.answers())
            .await;
        self.state.finish_question();

        let completion = Completion {
            score: self.state.score(),
            total: self.state.question_count(),
            outcome,
        };
        info!(
            exam_id = %self.exam_id,
            score = completion.score,
            total = completion.total,
            submitted = completion.outcome.is_submitted(),
            "attempt complete"
        );
        if let Some(on_complete) = self.hooks.on_complete.as_mut() {
            on_complete(&completion);
        }

        Advance::Completed(completion)
    }
}
