//! Transcript of the embedded command console.

use serde::Serialize;

pub type RequestId = u64;

const DEFAULT_MAX_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Input,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalLine {
    pub id: u64,
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub request: RequestId,
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Debug)]
pub struct TerminalState {
    lines: Vec<TerminalLine>,
    next_line: u64,
    next_request: RequestId,
    pending: Vec<RequestId>,
    max_lines: usize,
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl TerminalState {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            next_line: 0,
            next_request: 0,
            pending: Vec::new(),
            max_lines: max_lines.max(1),
        }
    }

    pub fn lines(&self) -> &[TerminalLine] {
        &self.lines
    }

    /// Changes whenever the transcript does.
    pub fn revision(&self) -> u64 {
        self.next_line
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Records the submitted line and returns the command to execute, if any.
    /// `clear` is handled here and never reaches the command surface.
    pub fn submit(&mut self, line: &str) -> Option<CommandRequest> {
        let trimmed = line.trim();
        self.push(LineKind::Input, format!("$ {trimmed}"));

        let mut parts = trimmed.split_whitespace();
        let command = parts.next()?;
        if command == "clear" {
            self.lines.clear();
            return None;
        }

        self.next_request = self.next_request.saturating_add(1);
        let request = self.next_request;
        self.pending.push(request);
        Some(CommandRequest {
            request,
            command: command.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }

    /// Appends a command's output. Results for unknown requests are dropped.
    pub fn apply_result(&mut self, request: RequestId, result: Result<String, String>) -> bool {
        let Some(index) = self.pending.iter().position(|&r| r == request) else {
            return false;
        };
        self.pending.remove(index);

        let (kind, text) = match result {
            Ok(output) => (LineKind::Output, output),
            Err(error) => (LineKind::Error, format!("Error: {error}")),
        };
        for line in text.lines() {
            self.push(kind, line.to_string());
        }
        true
    }

    fn push(&mut self, kind: LineKind, text: String) {
        self.next_line = self.next_line.saturating_add(1);
        self.lines.push(TerminalLine {
            id: self.next_line,
            kind,
            text,
        });
        if self.lines.len() > self.max_lines {
            let overflow = self.lines.len() - self.max_lines;
            self.lines.drain(..overflow);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;
