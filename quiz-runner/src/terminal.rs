use quiz_core::{Advance, Navigator, Notifier, OptionId, Question, QuizEngine, SessionState};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

pub const LOADING_MESSAGE: &str = "Loading questions...";

/// Prints navigation targets and notifications to the terminal.
pub struct TerminalSurface;

impl Navigator for TerminalSurface {
    fn navigate(&self, path: &str) {
        info!(path, "navigating");
        println!("Results saved. Continue at {path}");
    }
}

impl Notifier for TerminalSurface {
    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

pub fn advance_label(state: &SessionState) -> &'static str {
    if state.is_last_question() {
        "Proceed to Coding"
    } else {
        "Next Question"
    }
}

/// Renders the current question with numbered options, or the loading placeholder.
pub fn render(state: &SessionState) -> String {
    let Some(question) = state.current_question() else {
        return LOADING_MESSAGE.to_string();
    };
    let mut out = String::new();
    let _ = writeln!(out, "Question {}:", state.current_index() + 1);
    let _ = writeln!(out, "{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if state.selected() == Some(&option.id) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(out, "{marker} {}) {}", i + 1, option.text);
    }
    let _ = write!(
        out,
        "Choose 1-{} and press enter to {}: ",
        question.options.len(),
        advance_label(state)
    );
    out
}

/// Maps a 1-based option number typed by the user onto the option's id.
pub fn parse_choice(input: &str, question: &Question) -> Option<OptionId> {
    let n: usize = input.trim().parse().ok()?;
    let option = question.options.get(n.checked_sub(1)?)?;
    Some(option.id.clone())
}

/// Runs one attempt, reading option numbers line by line from `input` and writing prompts to
/// `out`.
///
/// Returns the final score, or `None` when there are no questions or `input` ends before the
/// terminal question is answered. Nothing is submitted in the `None` case.
pub async fn run_attempt<R, W>(
    engine: &mut QuizEngine,
    input: R,
    out: &mut W,
) -> anyhow::Result<Option<u32>>
where
    R: AsyncBufRead + Unpin,
    W: std::io::Write,
{
    if engine.state().question_count() == 0 {
        writeln!(out, "{LOADING_MESSAGE}")?;
        return Ok(None);
    }

    let mut lines = input.lines();
    loop {
        write!(out, "{}", render(engine.state()))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let Some(question) = engine.state().current_question() else {
            return Ok(None);
        };
        let Some(option_id) = parse_choice(&line, question) else {
            writeln!(out, "Please enter an option number.")?;
            continue;
        };
        engine.select(option_id)?;

        match engine.advance_selected().await {
            Some(Advance::Completed(completion)) => {
                writeln!(out, "Score: {}/{}", completion.score, completion.total)?;
                return Ok(Some(completion.score));
            }
            Some(Advance::Next { .. }) => writeln!(out)?,
            Some(Advance::Skipped) | None => return Ok(None),
        }
    }
}
