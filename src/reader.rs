//! Line oriented reader, for efficient RINEX input parsing.
use std::io::{BufRead, Result as IoResult};

use log::debug;

// RINEX is \n termination based, and always made of rather short lines.
const LINE_CAPACITY: usize = 128;

/// [Reader] provides the complete lines (without termination) of any [BufRead]able
/// interface, one at a time, and counts them so errors may refer to them.
/// The line buffer is reused from one line to the other.
/// Bytes that are not valid UTF-8 (Latin-1 names in comments, for example)
/// are replaced by '?', one for one, so the column layout is preserved.
pub struct Reader<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line: String,
    line_number: usize,
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: Vec::with_capacity(LINE_CAPACITY),
            line: String::with_capacity(LINE_CAPACITY),
        }
    }

    /// Reads the next line, returned along its line number (starting at 1).
    /// Returns None once the end of stream has been reached.
    /// Both "\n" and "\r\n" terminations are removed.
    pub fn next_line(&mut self) -> IoResult<Option<(usize, &str)>> {
        self.buf.clear();
        self.line.clear();
        let size = self.reader.read_until(b'\n', &mut self.buf)?;
        if size == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        match std::str::from_utf8(&self.buf) {
            Ok(content) => self.line.push_str(content),
            Err(_) => {
                debug!("line {}: replacing invalid UTF-8 bytes", self.line_number);
                self.line.extend(
                    self.buf
                        .iter()
                        .map(|b| if b.is_ascii() { *b as char } else { '?' }),
                );
            },
        }
        let trimmed = self.line.trim_end_matches(['\n', '\r']).len();
        self.line.truncate(trimmed);
        Ok(Some((self.line_number, &self.line)))
    }

    /// Number of the last line returned by [Self::next_line].
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
