//! Line sources for the REPL: rustyline for terminals, a buffered reader for
//! piped input.

use std::io::{self, BufRead};

use labelist_core::{LineSource, ReadEvent};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Interactive line editing with in-memory history.
pub struct RustylineSource {
    editor: DefaultEditor,
}

impl RustylineSource {
    /// Creates an editor bound to the terminal.
    ///
    /// # Errors
    ///
    /// Fails when the terminal cannot be configured.
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| io::Error::other(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        tracing::debug!(error = %err, "history entry dropped");
                    }
                }
                Ok(ReadEvent::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadEvent::Eof),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(other) => Err(io::Error::other(other.to_string())),
        }
    }
}

/// Lines from any buffered reader; the end of the stream closes the shell.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD so one bad line
/// fails as a command instead of ending the input.
#[derive(Debug)]
pub struct PipedSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> PipedSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for PipedSource<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<ReadEvent> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(ReadEvent::Closed);
        }
        let line = String::from_utf8_lossy(&self.buf);
        Ok(ReadEvent::Line(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piped_source_strips_line_endings() {
        let mut source = PipedSource::new("ls\r\ncd main\nexit".as_bytes());
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line("ls".into()));
        assert_eq!(
            source.read_line("").unwrap(),
            ReadEvent::Line("cd main".into())
        );
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line("exit".into()));
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Closed);
    }

    #[test]
    fn test_piped_source_survives_invalid_utf8() {
        let mut source = PipedSource::new(&b"ls\n\xff\xfe bad\nls\n"[..]);
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line("ls".into()));
        assert_eq!(
            source.read_line("").unwrap(),
            ReadEvent::Line("\u{fffd}\u{fffd} bad".into())
        );
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line("ls".into()));
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Closed);
    }

    #[test]
    fn test_piped_source_keeps_blank_lines() {
        let mut source = PipedSource::new("\n\n".as_bytes());
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line(String::new()));
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Line(String::new()));
        assert_eq!(source.read_line("").unwrap(), ReadEvent::Closed);
    }
}
