//! Line-based interactive I/O used by the game flow.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::config::MAX_INPUT_ATTEMPTS;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input closed")]
    Closed,
    #[error("no valid input after {0} attempts")]
    AttemptsExhausted(usize),
}

/// Prompt/answer capability required by the controller.
///
/// Implementors supply raw line I/O; the validated readers are provided and
/// give up after [`max_attempts`](InputOutput::max_attempts) rejected answers.
pub trait InputOutput {
    fn write_line(&mut self, line: &str);

    /// Show `prompt` and read one line without its terminator. `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    fn max_attempts(&self) -> usize {
        MAX_INPUT_ATTEMPTS
    }

    fn read_string(&mut self, prompt: &str) -> Result<String, InputError> {
        self.read_line(prompt).ok_or(InputError::Closed)
    }

    fn read_object<T, F>(
        &mut self,
        prompt: &str,
        error: &str,
        mut parse: F,
    ) -> Result<T, InputError>
    where
        Self: Sized,
        F: FnMut(&str) -> Result<T, String>,
    {
        let attempts = self.max_attempts();
        for _ in 0..attempts {
            let line = self.read_line(prompt).ok_or(InputError::Closed)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(reason) => self.write_line(&format!("{} ({})", error, reason)),
            }
        }
        Err(InputError::AttemptsExhausted(attempts))
    }

    fn read_int(&mut self, prompt: &str, error: &str) -> Result<i64, InputError>
    where
        Self: Sized,
    {
        self.read_object(prompt, error, |line| {
            line.trim().parse().map_err(|_| "not a number".to_string())
        })
    }

    fn read_string_predicate<P>(
        &mut self,
        prompt: &str,
        error: &str,
        predicate: P,
    ) -> Result<String, InputError>
    where
        Self: Sized,
        P: Fn(&str) -> bool,
    {
        self.read_object(prompt, error, |line| {
            if predicate(line) {
                Ok(line.to_string())
            } else {
                Err("rejected".to_string())
            }
        })
    }
}

/// Standard input and output.
pub struct ConsoleIo {
    max_attempts: usize,
}

impl ConsoleIo {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }
}

impl Default for ConsoleIo {
    fn default() -> Self {
        Self::new(MAX_INPUT_ATTEMPTS)
    }
}

impl InputOutput for ConsoleIo {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{} ", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

/// Replays queued answers and records everything written. Input ends when the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    input: VecDeque<String>,
    output: Vec<String>,
}

impl ScriptedIo {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.input.push_back(line.into());
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl InputOutput for ScriptedIo {
    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.output.push(prompt.to_string());
        self.input.pop_front()
    }
}
