//! Scripted operator for tests
//!
//! Answers are queued up front and consumed in order. Asking a question the
//! script does not cover is a `PromptError`, the same way a closed terminal is.

use crate::core::traits::Operator;
use crate::types::DisburseError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq)]
enum Answer {
    Confirm(bool),
    Text(String),
    /// Take whatever default the question offers
    Default,
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<Answer>,
    prompts: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ScriptedOperator {
    script: Mutex<Script>,
}

impl ScriptedOperator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, answer: Answer) -> Self {
        self.lock().answers.push_back(answer);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the answer to a yes/no question
    pub fn confirm_with(self, decision: bool) -> Self {
        self.push(Answer::Confirm(decision))
    }

    /// Queue the answer to a free-form question
    pub fn answer_with(self, text: &str) -> Self {
        self.push(Answer::Text(text.to_string()))
    }

    /// Queue an empty answer
    pub fn accept_default(self) -> Self {
        self.push(Answer::Default)
    }

    /// Every prompt asked so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    pub fn remaining(&self) -> usize {
        self.lock().answers.len()
    }

    fn next(&self, prompt: &str) -> Result<Answer, DisburseError> {
        let mut script = self.lock();
        script.prompts.push(prompt.to_string());
        script
            .answers
            .pop_front()
            .ok_or_else(|| DisburseError::PromptError {
                message: format!("no scripted answer for '{}'", prompt),
            })
    }
}

fn mismatch(prompt: &str, answer: &Answer) -> DisburseError {
    DisburseError::PromptError {
        message: format!("scripted answer {:?} does not fit '{}'", answer, prompt),
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    async fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DisburseError> {
        match self.next(prompt)? {
            Answer::Confirm(decision) => Ok(decision),
            Answer::Default => Ok(default),
            other => Err(mismatch(prompt, &other)),
        }
    }

    async fn ask_text(&self, prompt: &str, default: &str) -> Result<String, DisburseError> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(default.to_string()),
            other => Err(mismatch(prompt, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order() {
        let operator = ScriptedOperator::new()
            .answer_with("list.tsv")
            .confirm_with(false)
            .accept_default();

        assert_eq!(operator.ask_text("path?", "x").await.unwrap(), "list.tsv");
        assert!(!operator.confirm("go?", true).await.unwrap());
        assert!(operator.confirm("exit?", true).await.unwrap());
        assert_eq!(operator.prompts(), vec!["path?", "go?", "exit?"]);
        assert_eq!(operator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_is_a_prompt_error() {
        let operator = ScriptedOperator::new();
        let result = operator.confirm("go?", true).await;
        assert!(matches!(result, Err(DisburseError::PromptError { .. })));
    }

    #[tokio::test]
    async fn test_mismatched_answer_is_a_prompt_error() {
        let operator = ScriptedOperator::new().answer_with("yes please");
        let result = operator.confirm("go?", true).await;
        assert!(matches!(result, Err(DisburseError::PromptError { .. })));
    }
}
