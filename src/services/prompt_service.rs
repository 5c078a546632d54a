use anyhow::Error;
use log::info;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Modal interactions: alerts, confirmations and free-text questions.
pub trait Prompter: Send + Sync {
    fn alert(&self, title: &str, message: &str);

    /// Returns true when the user picks `confirm_label`.
    fn confirm(&self, title: &str, message: &str, cancel_label: &str, confirm_label: &str) -> bool;

    /// `None` when input is closed.
    fn ask(&self, question: &str) -> Option<String>;
}

impl<T: Prompter + ?Sized> Prompter for Arc<T> {
    fn alert(&self, title: &str, message: &str) {
        (**self).alert(title, message)
    }

    fn confirm(&self, title: &str, message: &str, cancel_label: &str, confirm_label: &str) -> bool {
        (**self).confirm(title, message, cancel_label, confirm_label)
    }

    fn ask(&self, question: &str) -> Option<String> {
        (**self).ask(question)
    }
}

/// Prompter on stdin/stdout.
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> TerminalPrompter {
        TerminalPrompter { assume_yes }
    }

    fn read_line(&self) -> Option<String> {
        blocking_section(|| read_line_from(&mut io::stdin().lock()))
            .ok()
            .flatten()
    }
}

/// One line without its terminator; `None` at end of input.
pub fn read_line_from<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Next stdin line, read on the blocking pool so runtime workers stay free.
pub async fn read_stdin_line() -> Result<Option<String>, Error> {
    let line = tokio::task::spawn_blocking(|| read_line_from(&mut io::stdin().lock())).await??;

    Ok(line)
}

/// Runs `f` so that a multi-thread runtime moves its other tasks off this
/// worker first. Outside a runtime, or on a current-thread one, `f` runs as is.
fn blocking_section<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&self, title: &str, message: &str) {
        if title.is_empty() {
            println!("{}", message);
        } else {
            println!("{}\n{}", title, message);
        }
    }

    fn confirm(&self, title: &str, message: &str, cancel_label: &str, confirm_label: &str) -> bool {
        if self.assume_yes {
            info!("Auto-confirmed: {}", title);
            return true;
        }

        print!("{}\n{} [{}/{}] ", title, message, cancel_label, confirm_label);
        let _ = io::stdout().flush();

        match self.read_line() {
            Some(answer) => is_confirmation(&answer, confirm_label),
            None => false,
        }
    }

    fn ask(&self, question: &str) -> Option<String> {
        print!("{}: ", question);
        let _ = io::stdout().flush();

        self.read_line()
    }
}

/// Accepts the confirm label itself or a plain yes.
pub fn is_confirmation(answer: &str, confirm_label: &str) -> bool {
    let answer = answer.trim().to_lowercase();

    answer == confirm_label.to_lowercase() || answer == "y" || answer == "yes"
}
