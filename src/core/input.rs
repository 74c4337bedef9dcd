use crate::utils::error::{Result, SafariError};
use std::io::{BufRead, ErrorKind};

/// Lazily reads one URL per line until end of stream.
///
/// Blank lines are skipped and surrounding whitespace is trimmed. End of
/// input ends the iterator; it is not an error. The underlying reader is
/// consumed, so the sequence cannot be restarted.
pub struct UrlLines<R: BufRead> {
    reader: R,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> UrlLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for UrlLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut line = String::new();
        loop {
            line.clear();
            self.line_number += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_string()));
                    }
                }
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    // 跳過壞掉的那一行，下一次呼叫再繼續讀
                    return Some(Err(SafariError::EncodingError {
                        field: format!("input line {}", self.line_number),
                        message: e.to_string(),
                    }));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(SafariError::IoError(e)));
                }
            }
        }
    }
}
