use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use tracing::{debug, warn};

use crate::error::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a question within a question set
    QuestionId
);
string_id!(
    /// Identifier of a selectable option within a question
    OptionId
);
string_id!(
    /// Identifier of the exam an attempt belongs to
    ExamId
);

/// A single-select question as supplied by the question provider.
///
/// Accepts the provider's document shape (`_id`, `question`, `optionText`,
/// `isCorrect`) as well as plain field names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id", alias = "id")]
    pub id: QuestionId,
    #[serde(rename = "question", alias = "text")]
    pub text: String,
    pub options: Vec<Choice>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "_id", alias = "id")]
    pub id: OptionId,
    #[serde(rename = "optionText", alias = "text")]
    pub text: String,
    /// Only read during evaluation
    #[serde(rename = "isCorrect", default, skip_serializing)]
    pub(crate) is_correct: bool,
}

impl Choice {
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
        }
    }
}

impl Question {
    /// The option marked correct, if any
    pub(crate) fn correct_choice(&self) -> Option<&Choice> {
        self.options.iter().find(|o| o.is_correct)
    }

    pub fn has_choice(&self, option_id: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == option_id)
    }

    /// A selection is correct iff a correct option exists and it is the one selected.
    pub fn is_correct(&self, selection: &OptionId) -> bool {
        self.correct_choice()
            .is_some_and(|correct| &correct.id == selection)
    }
}

/// Given a question set, validate it for basic properties:
/// 1) No duplicate question ids
/// 2) No duplicate option ids within a question
/// 3) At most one correct option per question
pub fn validate_questions(questions: &[Question]) -> Result<(), Error> {
    let mut q_ids = vec![];
    for q in questions {
        if q_ids.contains(&&q.id) {
            return Err(Error::InvalidQuestions(format!(
                "question id {} duplicate of question id",
                q.id
            )));
        }
        q_ids.push(&q.id);

        let mut o_ids = vec![];
        for o in &q.options {
            if o_ids.contains(&&o.id) {
                return Err(Error::InvalidQuestions(format!(
                    "option id {} duplicate of option id in question {}",
                    o.id, q.id
                )));
            }
            o_ids.push(&o.id);
        }

        match q.options.iter().filter(|o| o.is_correct).count() {
            0 => warn!(question = %q.id, "question has no correct option"),
            1 => {}
            n => {
                return Err(Error::InvalidQuestions(format!(
                    "question {} has {n} correct options, expected at most one",
                    q.id
                )));
            }
        }
    }

    Ok(())
}

/// Reads a JSON array of questions from `path` and validates it.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, Error> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let questions: Vec<Question> = serde_json::from_str(&raw)?;
    validate_questions(&questions)?;
    debug!(path = %path.display(), count = questions.len(), "loaded questions");

    Ok(questions)
}
