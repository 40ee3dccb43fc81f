//! The interactive question loop.

use askdoc_rag::RetrievalQa;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

const PROMPT: &str = "Enter your question: ";
pub(crate) const SEPARATOR: &str = "---------";

/// What to do with one line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopAction {
    /// Blank input: prompt again.
    Skip,
    /// `exit` or `quit` (any case): leave the loop.
    Exit,
    /// Anything else is a question for the document.
    Ask(String),
}

impl LoopAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Skip;
        }
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            return Self::Exit;
        }
        Self::Ask(trimmed.to_string())
    }
}

/// Run the read-ask-print loop until the user exits.
///
/// A failed answer is reported and the loop keeps going; only readline
/// itself failing (beyond Ctrl-C / Ctrl-D, which exit cleanly) ends the
/// process with an error.
pub async fn run(qa: &RetrievalQa) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => match LoopAction::from_input(&line) {
                LoopAction::Skip => continue,
                LoopAction::Exit => {
                    println!("Exiting...");
                    break;
                }
                LoopAction::Ask(question) => {
                    let _ = editor.add_history_entry(&question);
                    match qa.answer(&question).await {
                        Ok(answer) => {
                            println!();
                            println!("Answer: {}", answer.text);
                            println!("{SEPARATOR}");
                        }
                        Err(e) => {
                            debug!(error = %e, "answer failed");
                            eprintln!("Could not answer that question: {e}");
                        }
                    }
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Exiting...");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
