//! Line-based prompts over async reader/writer pairs
//!
//! `TerminalOperator` is the stdin/stdout instance used by the binary; tests
//! drive the same code with in-memory buffers.

use crate::core::traits::Operator;
use crate::types::DisburseError;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;

/// Interpret a yes/no answer; `None` if it is neither
pub fn parse_confirmation(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn prompt_error(error: std::io::Error) -> DisburseError {
    DisburseError::PromptError {
        message: error.to_string(),
    }
}

struct Console<R, W> {
    input: BufReader<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn ask(&mut self, question: &str) -> Result<String, DisburseError> {
        self.output
            .write_all(question.as_bytes())
            .await
            .map_err(prompt_error)?;
        self.output.flush().await.map_err(prompt_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await.map_err(prompt_error)?;
        if read == 0 {
            return Err(DisburseError::PromptError {
                message: "input closed".to_string(),
            });
        }
        Ok(line.trim().to_string())
    }
}

/// Operator prompting over any async line source and sink
pub struct PromptOperator<R, W> {
    console: Mutex<Console<R, W>>,
}

/// Operator on the process's stdin and stdout
pub type TerminalOperator = PromptOperator<Stdin, Stdout>;

impl TerminalOperator {
    pub fn stdio() -> Self {
        PromptOperator::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> PromptOperator<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        PromptOperator {
            console: Mutex::new(Console {
                input: BufReader::new(input),
                output,
            }),
        }
    }

    /// Consume the operator and return the output sink
    pub fn into_output(self) -> W {
        self.console.into_inner().output
    }
}

#[async_trait]
impl<R, W> Operator for PromptOperator<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&self, prompt: &str, default: bool) -> Result<bool, DisburseError> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let question = format!("? {} {} ", prompt, hint);

        let mut console = self.console.lock().await;
        loop {
            let answer = console.ask(&question).await?;
            if let Some(decision) = parse_confirmation(&answer, default) {
                return Ok(decision);
            }
            console
                .output
                .write_all(b">> Please answer yes or no\n")
                .await
                .map_err(prompt_error)?;
        }
    }

    async fn ask_text(&self, prompt: &str, default: &str) -> Result<String, DisburseError> {
        let question = if default.is_empty() {
            format!("? {} ", prompt)
        } else {
            format!("? {} ({}) ", prompt, default)
        };

        let answer = self.console.lock().await.ask(&question).await?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }
}
