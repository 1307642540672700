//! Line input for the move prompt.
//!
//! Reading stdin blocks, so it lives on its own thread. The session sends one
//! [`PromptRequest`] at a time and awaits the reply, which keeps at most one
//! prompt outstanding and never reads ahead of the game.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// A source of player input lines.
#[async_trait]
pub trait LineSource: Send {
    /// Show `prompt` and wait for one line, without its line ending.
    /// `None` once input is closed.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

struct PromptRequest {
    prompt: String,
    reply: oneshot::Sender<io::Result<Option<String>>>,
}

/// Prompts on stdout and reads stdin from a dedicated thread.
pub struct ConsolePrompt {
    requests: mpsc::Sender<PromptRequest>,
}

impl ConsolePrompt {
    pub fn spawn() -> io::Result<Self> {
        let (requests, mut rx) = mpsc::channel::<PromptRequest>(1);

        std::thread::Builder::new()
            .name("console-prompt".to_string())
            .spawn(move || {
                let stdin = io::stdin();
                while let Some(request) = rx.blocking_recv() {
                    let result = prompt_once(&mut stdin.lock(), &mut io::stdout(), &request.prompt);
                    if request.reply.send(result).is_err() {
                        tracing::debug!("Prompt reply dropped");
                    }
                }
                tracing::debug!("Console prompt thread exiting");
            })?;

        Ok(Self { requests })
    }
}

#[async_trait]
impl LineSource for ConsolePrompt {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let (reply, rx) = oneshot::channel();
        let request = PromptRequest {
            prompt: prompt.to_string(),
            reply,
        };

        if self.requests.send(request).await.is_err() {
            return Ok(None);
        }
        rx.await.unwrap_or(Ok(None))
    }
}

fn prompt_once<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Replays canned lines and records the prompts it was shown.
#[cfg(test)]
pub(crate) struct ScriptedInput {
    lines: std::collections::VecDeque<String>,
    prompts: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub(crate) fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            prompts: Default::default(),
        }
    }

    /// Shared view of the prompts shown so far.
    pub(crate) fn prompts(&self) -> std::sync::Arc<std::sync::Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LineSource for ScriptedInput {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_once_strips_line_ending() {
        let mut input = io::Cursor::new(b"Nf3\r\nnext\n".to_vec());
        let mut output = Vec::new();

        let line = prompt_once(&mut input, &mut output, ">>> ").unwrap();
        assert_eq!(line.as_deref(), Some("Nf3"));
        assert_eq!(output, b">>> ");

        let line = prompt_once(&mut input, &mut output, ">>> ").unwrap();
        assert_eq!(line.as_deref(), Some("next"));
    }

    #[test]
    fn test_prompt_once_eof() {
        let mut input = io::Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert_eq!(prompt_once(&mut input, &mut output, ">>> ").unwrap(), None);
    }

    #[tokio::test]
    async fn test_scripted_input_records_prompts() {
        let mut input = ScriptedInput::new(&["l"]);
        let prompts = input.prompts();

        assert_eq!(input.read_line(">>> ").await.unwrap().as_deref(), Some("l"));
        assert_eq!(input.read_line(">>> ").await.unwrap(), None);
        assert_eq!(prompts.lock().unwrap().len(), 2);
    }
}
