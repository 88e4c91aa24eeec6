use std::collections::VecDeque;

use crate::logging::LogEntry;

/// State for the drop-down log console.
///
/// Holds the visible log ring buffer, the command input line with cursor
/// editing, scrollback, and input history recall. Rendering lives in the
/// ui crate; this is pure state.
pub struct Console {
    pub visible: bool,
    log_lines: VecDeque<LogEntry>,
    pub input_buffer: String,
    pub cursor_pos: usize,
    scroll_offset: usize,
    max_lines: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(500)
    }
}

impl Console {
    pub fn new(max_lines: usize) -> Self {
        Self {
            visible: false,
            log_lines: VecDeque::with_capacity(max_lines),
            input_buffer: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            max_lines,
            history: Vec::new(),
            history_pos: None,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn push_log(&mut self, entry: LogEntry) {
        if self.log_lines.len() >= self.max_lines {
            self.log_lines.pop_front();
            // Keep the viewport stable when scrolled up.
            self.scroll_offset = self.scroll_offset.saturating_sub(1);
        }
        self.log_lines.push_back(entry);
    }

    pub fn log_lines(&self) -> &VecDeque<LogEntry> {
        &self.log_lines
    }

    pub fn clear_logs(&mut self) {
        self.log_lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let max_offset = self.log_lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max_offset);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn insert_char(&mut self, c: char) {
        self.input_buffer.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.history_pos = None;
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos > 0 {
            let prev = self.input_buffer[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.input_buffer.remove(prev);
            self.cursor_pos = prev;
        }
    }

    pub fn cursor_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.input_buffer[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor_pos < self.input_buffer.len() {
            self.cursor_pos = self.input_buffer[self.cursor_pos..]
                .chars()
                .next()
                .map(|c| self.cursor_pos + c.len_utf8())
                .unwrap_or(self.input_buffer.len());
        }
    }

    /// Recall the previous history entry into the input line.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let pos = match self.history_pos {
            None => self.history.len() - 1,
            Some(0) => 0,
            Some(p) => p - 1,
        };
        self.history_pos = Some(pos);
        self.input_buffer = self.history[pos].clone();
        self.cursor_pos = self.input_buffer.len();
    }

    /// Step forward through history; past the newest entry the line clears.
    pub fn history_next(&mut self) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            self.input_buffer = self.history[pos + 1].clone();
        } else {
            self.history_pos = None;
            self.input_buffer.clear();
        }
        self.cursor_pos = self.input_buffer.len();
    }

    /// Submit the input line: returns it, records it in history, clears.
    pub fn submit_input(&mut self) -> String {
        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_pos = 0;
        self.history_pos = None;
        if !input.trim().is_empty() && self.history.last() != Some(&input) {
            self.history.push(input.clone());
        }
        input
    }
}
