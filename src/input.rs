/// Tallest the input box grows before it starts scrolling
pub const MAX_INPUT_ROWS: u16 = 6;

/// Welcome-screen shortcuts, sent as soon as they are chosen
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction {
        title: "Quantum Computing",
        prompt: "Explain quantum computing in simple terms",
    },
    QuickAction {
        title: "Creative Writing",
        prompt: "Write a creative short story about AI",
    },
    QuickAction {
        title: "Code Debugging",
        prompt: "Help me debug my code",
    },
    QuickAction {
        title: "Daily Planning",
        prompt: "Help me plan my day for maximum productivity",
    },
];

/// Shown under an empty, focused input; choosing one only fills the input
pub const SUGGESTIONS: [&str; 3] = [
    "Try: \"What are the latest trends in AI?\"",
    "Try: \"How do I learn Rust effectively?\"",
    "Try: \"Summarize the theory of relativity\"",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub title: &'static str,
    pub prompt: &'static str,
}

/// Strip the `Try: "…"` decoration from a suggestion.
pub fn suggestion_prompt(suggestion: &str) -> String {
    suggestion.replacen("Try: \"", "", 1).replacen('"', "", 1)
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Multi-line message editor with a character cursor.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Replace the contents, leaving the cursor at the end
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Trimmed contents, or `None` when there is nothing worth sending.
    pub fn message(&self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// The text hard-wrapped to `width` columns.
    ///
    /// A line filling whole rows gets a trailing empty row, which is where
    /// the cursor sits after its last character.
    pub fn wrapped_lines(&self, width: u16) -> Vec<String> {
        let width = width.max(1) as usize;
        let mut rows = Vec::new();
        for line in self.text.split('\n') {
            let chars: Vec<char> = line.chars().collect();
            for chunk in chars.chunks(width) {
                rows.push(chunk.iter().collect());
            }
            if chars.len() % width == 0 {
                rows.push(String::new());
            }
        }
        rows
    }

    /// Rows the wrapped text occupies, clamped to `1..=MAX_INPUT_ROWS`.
    pub fn visible_rows(&self, width: u16) -> u16 {
        let rows = self.wrapped_lines(width).len();
        (rows.min(MAX_INPUT_ROWS as usize) as u16).max(1)
    }

    /// Row and column of the cursor within the wrapped text
    pub fn cursor_position(&self, width: u16) -> (u16, u16) {
        let width = width.max(1) as usize;
        let mut row = 0usize;
        let mut col = 0usize;
        for c in self.text.chars().take(self.cursor) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
                if col == width {
                    row += 1;
                    col = 0;
                }
            }
        }
        (row as u16, col as u16)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
