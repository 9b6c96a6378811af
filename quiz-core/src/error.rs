#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidQuestions(String),
    #[error("{0}")]
    InvalidConfig(String),
    #[error("option {0} does not belong to the current question")]
    UnknownChoice(String),
    #[error("no question is currently displayed")]
    NoCurrentQuestion,
    #[error("results endpoint responded with status {0}")]
    Rejected(u16),
    // Froms
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
