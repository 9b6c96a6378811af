use anyhow::Context;
use quiz_core::{Hooks, HttpTransport, QuizEngine, ResultSubmitter, question::load_questions};
use quiz_runner::{
    config::EnvVars,
    terminal::{self, TerminalSurface},
};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        // Prompts own stdout
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(std::io::stderr),
        )
        .with(sentry::integrations::tracing::layer())
        .with(EnvFilter::from_default_env())
        .init();
    tracing::info!("Starting quiz runner...");
    dotenvy::dotenv().ok();

    let env_vars = EnvVars::new();

    let _guard = if let Some(sentry_dsn) = env_vars.sentry_dsn.clone() {
        tracing::info!("initializing Sentry");
        // NOTE: Events are only emitted, once the guard goes out of scope.
        Some(sentry::init((
            sentry_dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(env_vars.environment.to_string().into()),
                traces_sample_rate: 1.0,
                ..Default::default()
            },
        )))
    } else {
        None
    };

    match run(&env_vars).await {
        Ok(Some(score)) => tracing::info!(score, "Attempt finished"),
        Ok(None) => tracing::info!("Attempt abandoned"),
        Err(e) => tracing::error!("Error running quiz: {:?}", e),
    }
}

/// Runs one attempt on stdin/stdout. Returns the final score, or `None` if it was abandoned.
async fn run(env_vars: &EnvVars) -> anyhow::Result<Option<u32>> {
    let questions = load_questions(&env_vars.questions_path).with_context(|| {
        format!(
            "unable to load questions from {}",
            env_vars.questions_path.display()
        )
    })?;

    let transport = HttpTransport::new(
        &env_vars.results_api_url,
        env_vars.results_session_cookie.as_deref(),
        env_vars.request_timeout,
    )?;
    let surface = Arc::new(TerminalSurface);
    let submitter = ResultSubmitter::new(Arc::new(transport), surface.clone(), surface);
    let hooks = Hooks {
        on_correct: Some(Box::new(|| tracing::debug!("correct answer"))),
        on_complete: None,
    };
    let mut engine = QuizEngine::new(env_vars.exam_id.clone().into(), questions, submitter, hooks);

    let stdin = BufReader::new(tokio::io::stdin());
    terminal::run_attempt(&mut engine, stdin, &mut std::io::stdout()).await
}
