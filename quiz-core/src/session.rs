use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    error::Error,
    question::{OptionId, Question, QuestionId},
};

/// Selected option per answered question. A missing key means the question was skipped.
///
/// Only the progression engine records into it; everything else gets a read-only view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<QuestionId, OptionId>);

impl AnswerRecord {
    pub(crate) fn record(&mut self, question_id: QuestionId, option_id: OptionId) {
        self.0.insert(question_id, option_id);
    }

    pub fn get(&self, question_id: &QuestionId) -> Option<&OptionId> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &OptionId)> {
        self.0.iter()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No questions have been provided yet
    Loading,
    InProgress { index: usize },
    Completed,
}

/// Where the user is in one exam attempt, and what has been recorded so far.
#[derive(Clone, Debug)]
pub struct SessionState {
    questions: Vec<Question>,
    current_index: usize,
    selected: Option<OptionId>,
    score: u32,
    answers: AnswerRecord,
    complete: bool,
}

impl SessionState {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            selected: None,
            score: 0,
            answers: AnswerRecord::default(),
            complete: false,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `None` while loading, and once the attempt is complete
    pub fn current_question(&self) -> Option<&Question> {
        if self.complete {
            return None;
        }
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index == self.questions.len() - 1
    }

    pub fn selected(&self) -> Option<&OptionId> {
        self.selected.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The advance control is only enabled once something is selected
    pub fn can_advance(&self) -> bool {
        self.selected.is_some() && !self.complete
    }

    pub fn phase(&self) -> Phase {
        if self.complete {
            Phase::Completed
        } else if self.questions.is_empty() {
            Phase::Loading
        } else {
            Phase::InProgress {
                index: self.current_index,
            }
        }
    }

    /// One-based question number and total, for display
    pub fn progress(&self) -> (usize, usize) {
        let number = (self.current_index + 1).min(self.questions.len());
        (number, self.questions.len())
    }

    /// Selects one of the current question's options, replacing any earlier selection.
    pub fn select(&mut self, option_id: OptionId) -> Result<(), Error> {
        let question = self.current_question().ok_or(Error::NoCurrentQuestion)?;
        if !question.has_choice(&option_id) {
            return Err(Error::UnknownChoice(option_id.to_string()));
        }
        self.selected = Some(option_id);
        Ok(())
    }

    pub(crate) fn record_answer(&mut self, question_id: QuestionId, option_id: OptionId) {
        self.answers.record(question_id, option_id);
    }

    pub(crate) fn increment_score(&mut self) {
        self.score += 1;
    }

    /// Clears the selection, then moves to the next question or completes the attempt.
    pub(crate) fn finish_question(&mut self) {
        self.selected = None;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        } else {
            self.complete = true;
        }
    }
}
