use sentry::types::Dsn;
use std::{env::var, path::PathBuf, time::Duration};
use tracing::{error, warn};

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub environment: Environment,
    pub exam_id: String,
    pub questions_path: PathBuf,
    pub request_timeout: Duration,
    pub results_api_url: String,
    pub results_session_cookie: Option<String>,
    pub sentry_dsn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(s)
    }
}

impl EnvVars {
    pub fn new() -> Self {
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds the config from any key lookup. Panics when a required value is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let Some(exam_id) = lookup("EXAM_ID") else {
            error!("EXAM_ID not set");
            panic!("EXAM_ID required");
        };
        assert!(!exam_id.is_empty(), "EXAM_ID must not be empty");

        let sentry_dsn = match lookup("SENTRY_DSN") {
            Some(dsn_string) => {
                assert!(
                    valid_sentry_dsn(&dsn_string),
                    "SENTRY_DSN is not valid DSN."
                );
                Some(dsn_string)
            }
            None => {
                if cfg!(not(debug_assertions)) {
                    panic!("SENTRY_DSN is not allowed to be unset outside of a debug build");
                }
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        let environment = match lookup("ENVIRONMENT") {
            Some(v) => v.into(),
            None => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let questions_path = match lookup("QUESTIONS_PATH") {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => {
                let default_path = "questions.json";
                warn!("QUESTIONS_PATH not set. Defaulting to {default_path}");
                PathBuf::from(default_path)
            }
        };

        let results_api_url = match lookup("RESULTS_API_URL") {
            Some(url) if !url.is_empty() => url,
            _ => {
                let default_url = "http://localhost:3000".to_string();
                warn!("RESULTS_API_URL not set. Defaulting to {default_url}");
                default_url
            }
        };

        let results_session_cookie = lookup("RESULTS_SESSION_COOKIE").filter(|c| !c.is_empty());

        let request_timeout_in_ms = match lookup("REQUEST_TIMEOUT_IN_MS") {
            Some(val) => match val.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                Ok(_) => {
                    panic!("REQUEST_TIMEOUT_IN_MS must be greater than 0");
                }
                Err(e) => {
                    panic!("REQUEST_TIMEOUT_IN_MS is not a valid unsigned integer: {e:?}");
                }
            },
            None => {
                let default_request_timeout = 30_000;
                warn!("REQUEST_TIMEOUT_IN_MS not set. Defaulting to {default_request_timeout}");
                default_request_timeout
            }
        };

        Self {
            environment,
            exam_id,
            questions_path,
            request_timeout: Duration::from_millis(request_timeout_in_ms),
            results_api_url,
            results_session_cookie,
            sentry_dsn,
        }
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
