//! Line-oriented stream access with one-line pushback.
//!
//! The merge engine reads several streams in lock-step and sometimes has to
//! look one line past the structure it is consuming (a call block ends at
//! the first line that does not belong to it). `StatsReader` owns at most
//! one buffered line for that purpose.

use crate::utils::error::ParseError;
use std::io::BufRead;

/// Buffered line reader over one statistics stream
///
/// **Public** - every stream handed to the merge or summation drivers is
/// wrapped in one of these
#[derive(Debug)]
pub struct StatsReader<R> {
    inner: R,
    buffered: Option<String>,
}

impl<R: BufRead> StatsReader<R> {
    /// Wrap an underlying buffered reader
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffered: None,
        }
    }

    /// Return the next line, or `None` once the stream is exhausted
    ///
    /// The line terminator (`\n` or `\r\n`) is stripped. Calling this again
    /// after the end of the stream keeps returning `None`.
    pub fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        if let Some(line) = self.buffered.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Store one line to be returned by the following `next_line` call
    ///
    /// Pushing back twice without an intervening read is a bug in the
    /// caller, not an input problem, so it panics.
    pub fn push_back(&mut self, line: String) {
        assert!(
            self.buffered.is_none(),
            "push_back called twice without an intervening next_line"
        );
        self.buffered = Some(line);
    }

    /// Look at the next line without consuming it
    pub fn peek(&mut self) -> Result<Option<&str>, ParseError> {
        if self.buffered.is_none() {
            self.buffered = self.next_line()?;
        }
        Ok(self.buffered.as_deref())
    }
}
