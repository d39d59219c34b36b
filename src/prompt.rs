//! Interactive prompts
//!
//! Handlers ask for input through the [`Prompter`] trait. The terminal
//! implementation uses `dialoguer`; [`ScriptedPrompter`] replays a fixed list
//! of answers for tests and non-interactive runs.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::collections::VecDeque;

use crate::error::{Result, TrackerError};

/// Source of user answers
pub trait Prompter {
    /// Single choice among `items`, returning the chosen index
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize>;

    /// Free text; blank answers are not accepted
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Free text that may be left blank
    fn optional_input(&mut self, prompt: &str) -> Result<String>;
}

/// `dialoguer` prompts on the controlling terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| TrackerError::prompt(e.to_string()))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .validate_with(|answer: &String| {
                if answer.trim().is_empty() {
                    Err("A value is required")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(|e| TrackerError::prompt(e.to_string()))
    }

    fn optional_input(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| TrackerError::prompt(e.to_string()))
    }
}

/// Answers prompts from a queue, in order
///
/// `select` answers are matched against the item labels. Running out of
/// answers is a prompt error, which ends the menu loop.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { answers: answers.into_iter().map(Into::into).collect() }
    }

    /// Answers not consumed yet
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| TrackerError::prompt(format!("No scripted answer left for '{prompt}'")))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        let answer = self.next_answer(prompt)?;
        items.iter().position(|item| *item == answer).ok_or_else(|| {
            TrackerError::prompt(format!("'{answer}' is not one of the choices for '{prompt}'"))
        })
    }

    /// Blank answers are skipped, as the terminal asks again for them
    fn input(&mut self, prompt: &str) -> Result<String> {
        loop {
            let answer = self.next_answer(prompt)?;
            if !answer.trim().is_empty() {
                return Ok(answer);
            }
            tracing::debug!(prompt, "Skipping blank scripted answer");
        }
    }

    fn optional_input(&mut self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }
}
