//! Multiple-Choice Quiz Core
//!
//! ## Current API
//!
//! - Load and validate question sets
//! - Track the session of one exam attempt
//! - Advance through questions, scoring each answer
//! - Submit the collected answers for scoring
//!
pub mod error;
pub mod progression;
pub mod question;
pub mod session;
pub mod submission;

pub use error::Error;
pub use progression::{Advance, Completion, Hooks, QuizEngine};
pub use question::{Choice, ExamId, OptionId, Question, QuestionId};
pub use session::{AnswerRecord, Phase, SessionState};
pub use submission::{
    HttpTransport, Navigator, Notifier, ResultSubmitter, ResultsPayload, SubmissionOutcome,
    SubmissionTransport,
};
