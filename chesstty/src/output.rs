//! Everything the player sees or hears.
//!
//! Text goes to a writer (stdout in the binaries). Speech and desktop
//! notifications are handed to external programs that are spawned and left
//! running; their failures are logged and otherwise ignored.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use chess::PieceKind;
use crossterm::{cursor, execute, terminal};

/// Where a message should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub text: bool,
    pub speech: bool,
    pub notify: bool,
}

impl Channels {
    pub const TEXT: Channels = Channels {
        text: true,
        speech: false,
        notify: false,
    };

    pub const ALL: Channels = Channels {
        text: true,
        speech: true,
        notify: true,
    };

    /// Keep only the channels enabled in both.
    pub fn mask(self, enabled: Channels) -> Channels {
        Channels {
            text: self.text && enabled.text,
            speech: self.speech && enabled.speech,
            notify: self.notify && enabled.notify,
        }
    }
}

/// Turn a SAN move into words for the speech program.
///
/// `Nxe5+` becomes `knight takes e5 check`.
pub fn speech_text(san: &str) -> String {
    let san = san.trim();
    let (body, suffix) = match san.strip_suffix('#') {
        Some(body) => (body, Some("checkmate")),
        None => match san.strip_suffix('+') {
            Some(body) => (body, Some("check")),
            None => (san, None),
        },
    };

    let mut words: Vec<String> = Vec::new();
    if body == "O-O-O" {
        words.push("castles queenside".to_string());
    } else if body == "O-O" {
        words.push("castles kingside".to_string());
    } else {
        let mut square = String::new();
        for c in body.chars() {
            match c {
                'x' | '=' => {
                    flush_word(&mut square, &mut words);
                    words.push(if c == 'x' { "takes" } else { "promotes to" }.to_string());
                }
                'K' | 'Q' | 'R' | 'B' | 'N' => {
                    flush_word(&mut square, &mut words);
                    if let Some(kind) = PieceKind::from_char(c) {
                        words.push(kind.name().to_string());
                    }
                }
                _ => square.push(c),
            }
        }
        flush_word(&mut square, &mut words);
    }

    if let Some(suffix) = suffix {
        words.push(suffix.to_string());
    }
    words.join(" ")
}

fn flush_word(word: &mut String, words: &mut Vec<String>) {
    if !word.is_empty() {
        words.push(std::mem::take(word));
    }
}

/// Writes player-facing messages to every enabled channel.
pub struct Announcer {
    out: Box<dyn Write + Send>,
    enabled: Channels,
    speech_command: String,
    notify_command: String,
}

impl Announcer {
    pub fn new(
        out: Box<dyn Write + Send>,
        enabled: Channels,
        speech_command: impl Into<String>,
        notify_command: impl Into<String>,
    ) -> Self {
        Self {
            out,
            enabled: Channels {
                text: true,
                ..enabled
            },
            speech_command: speech_command.into(),
            notify_command: notify_command.into(),
        }
    }

    /// Announcer on stdout with the configured helper programs.
    pub fn stdout(speak: bool, notify: bool) -> Self {
        Self::new(
            Box::new(io::stdout()),
            Channels {
                text: true,
                speech: speak,
                notify,
            },
            crate::config::get_speech_command(),
            crate::config::get_notify_command(),
        )
    }

    /// Print one line of text.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    /// Send a move to the requested channels. Speech gets the spoken form.
    pub fn announce(&mut self, san: &str, channels: Channels) {
        let channels = channels.mask(self.enabled);
        if channels.text {
            self.line(san);
        }
        if channels.speech {
            spawn_detached(&self.speech_command, &[speech_text(san)]);
        }
        if channels.notify {
            let args = ["-u", "normal", "-a", "chesstty", san].map(str::to_string);
            spawn_detached(&self.notify_command, &args);
        }
    }

    pub fn clear_screen(&mut self) {
        if let Err(e) = execute!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        ) {
            tracing::warn!("Failed to clear screen: {}", e);
        }
    }
}

fn spawn_detached(program: &str, args: &[String]) {
    let result = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match result {
        Ok(child) => tracing::debug!(program, pid = child.id(), "Spawned helper"),
        Err(e) => tracing::warn!(program, "Failed to run helper: {}", e),
    }
}

/// Open a URL with the desktop's default handler.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
        ("open", vec![url])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", "", url])
    } else {
        ("xdg-open", vec![url])
    };

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

/// Writer that keeps everything written to it, for inspecting output.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_text_pieces_and_captures() {
        assert_eq!(speech_text("Nf3"), "knight f3");
        assert_eq!(speech_text("e4"), "e4");
        assert_eq!(speech_text("Bxe5"), "bishop takes e5");
        assert_eq!(speech_text("exd5"), "e takes d5");
        assert_eq!(speech_text("Qh5+"), "queen h5 check");
        assert_eq!(speech_text("Qxf7#"), "queen takes f7 checkmate");
        assert_eq!(speech_text("e8=Q"), "e8 promotes to queen");
        assert_eq!(speech_text("Rad1"), "rook ad1");
    }

    #[test]
    fn test_speech_text_castling() {
        assert_eq!(speech_text("O-O"), "castles kingside");
        assert_eq!(speech_text("O-O-O"), "castles queenside");
        assert_eq!(speech_text("O-O-O+"), "castles queenside check");
    }

    #[test]
    fn test_channel_mask() {
        let enabled = Channels {
            text: true,
            speech: false,
            notify: true,
        };
        assert_eq!(Channels::ALL.mask(enabled), enabled);
        assert_eq!(Channels::TEXT.mask(enabled), Channels::TEXT);
    }

    #[test]
    fn test_text_channel_writes_lines() {
        let buffer = SharedBuffer::default();
        let mut announcer = Announcer::new(
            Box::new(buffer.clone()),
            Channels::TEXT,
            "/nonexistent/speech",
            "/nonexistent/notify",
        );

        announcer.line("Welcome alice");
        announcer.announce("e4", Channels::ALL);
        assert_eq!(buffer.lines(), vec!["Welcome alice", "e4"]);
    }

    #[test]
    fn test_missing_helper_is_not_fatal() {
        let buffer = SharedBuffer::default();
        let mut announcer = Announcer::new(
            Box::new(buffer.clone()),
            Channels::ALL,
            "/nonexistent/speech",
            "/nonexistent/notify",
        );

        announcer.announce("Nf3", Channels::ALL);
        assert_eq!(buffer.lines(), vec!["Nf3"]);
    }
}
