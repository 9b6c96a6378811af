use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument};

use crate::{error::Error, question::ExamId, session::AnswerRecord};

pub const RESULTS_PATH: &str = "/api/users/results";
pub const FAILURE_MESSAGE: &str = "Failed to save results";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPayload {
    pub exam_id: ExamId,
    pub answers: AnswerRecord,
}

/// Delivers a results payload to the scoring backend.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, payload: &ResultsPayload) -> Result<(), Error>;
}

/// Moves the user on once results are stored
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Shows a one-shot message to the user
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Posts results as JSON to `{base_url}/api/users/results`.
///
/// Any configured session cookie is sent with every request.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        session_cookie: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| {
                Error::InvalidConfig(format!("session cookie is not a valid header: {e}"))
            })?;
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn results_url(&self) -> String {
        format!("{}{RESULTS_PATH}", self.base_url)
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn submit(&self, payload: &ResultsPayload) -> Result<(), Error> {
        let resp = self
            .client
            .post(self.results_url())
            .json(payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Rejected(resp.status().as_u16()));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Results stored; the user was sent to `redirect`
    Submitted { redirect: String },
    /// Results were not stored. Not retried.
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted { .. })
    }
}

/// Packages the answer set, hands it to the transport once, and reacts to the result.
#[derive(Clone)]
pub struct ResultSubmitter {
    transport: Arc<dyn SubmissionTransport>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ResultSubmitter {
    pub fn new(
        transport: Arc<dyn SubmissionTransport>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            navigator,
            notifier,
        }
    }

    /// Path of the view shown after results are stored
    pub fn results_view(exam_id: &ExamId) -> String {
        format!("/exam/{exam_id}/codedetails")
    }

    #[instrument(skip_all, fields(exam_id = %exam_id, answers = answers.len()))]
    pub async fn submit(&self, exam_id: &ExamId, answers: &AnswerRecord) -> SubmissionOutcome {
        let payload = ResultsPayload {
            exam_id: exam_id.clone(),
            answers: answers.clone(),
        };

        match self.transport.submit(&payload).await {
            Ok(()) => {
                info!("results saved");
                let redirect = Self::results_view(exam_id);
                self.navigator.navigate(&redirect);
                SubmissionOutcome::Submitted { redirect }
            }
            Err(e) => {
                error!(error = ?e, "Error saving results");
                self.notifier.error(FAILURE_MESSAGE);
                SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
