// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! On-screen status text with a fixed number of visible lines

use std::collections::VecDeque;
use std::fmt;

/// Number of status lines visible at once
pub const STATUS_LINES: usize = 4;

/// Rolling status display; pushing past capacity drops the oldest line
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    lines: VecDeque<String>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == STATUS_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Replace the whole display; only the last [`STATUS_LINES`] lines survive
    pub fn replace<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.clear();
        for line in lines {
            self.push(line);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for StatusBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_line_is_discarded() {
        let mut board = StatusBoard::new();
        for i in 0..6 {
            board.push(format!("line {i}"));
        }
        assert_eq!(board.len(), STATUS_LINES);
        assert_eq!(
            board.lines().collect::<Vec<_>>(),
            ["line 2", "line 3", "line 4", "line 5"]
        );
    }

    #[test]
    fn test_replace_and_clear() {
        let mut board = StatusBoard::new();
        board.push("stale");
        board.replace(["a", "b"]);
        assert_eq!(board.to_string(), "a\nb");

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.to_string(), "");
    }
}
