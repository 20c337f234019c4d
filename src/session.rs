//! UI-agnostic chat state
//!
//! The transcript, welcome-view flag and typing indicator the renderer draws
//! from. Nothing here is persisted; `new_chat` returns it to its initial
//! state.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatTurn {
    fn new(sender: Sender, text: String) -> Self {
        Self {
            sender,
            text,
            timestamp: Local::now(),
        }
    }

    /// Wall-clock time shown under the bubble
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[derive(Debug)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    welcome_visible: bool,
    awaiting_reply: bool,
    message_count: usize,
    // Characters of the last turn shown so far; `None` once fully shown
    revealed: Option<usize>,
    pub scroll: u16,
    pub follow_bottom: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            welcome_visible: true,
            awaiting_reply: false,
            message_count: 0,
            revealed: None,
            scroll: 0,
            follow_bottom: true,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome_visible
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    #[cfg(test)]
    pub fn count(&self, sender: Sender) -> usize {
        self.turns.iter().filter(|t| t.sender == sender).count()
    }

    /// A new message may be sent only while no reply is outstanding.
    pub fn can_send(&self) -> bool {
        !self.awaiting_reply
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.finish_reveal();
        self.welcome_visible = false;
        self.push(ChatTurn::new(Sender::User, text.into()));
    }

    /// Show the typing indicator and lock the send control
    pub fn begin_reply(&mut self) {
        self.awaiting_reply = true;
        self.follow_bottom = true;
    }

    /// Append the reply and start revealing it one character per tick.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.finish_reveal();
        self.awaiting_reply = false;
        self.welcome_visible = false;
        self.push(ChatTurn::new(Sender::Assistant, text.into()));
        self.revealed = Some(0);
    }

    /// Advance the typewriter by one character. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let Some(shown) = self.revealed else {
            return false;
        };
        let total = self
            .turns
            .last()
            .map(|t| t.text.chars().count())
            .unwrap_or(0);
        if shown + 1 >= total {
            self.revealed = None;
        } else {
            self.revealed = Some(shown + 1);
        }
        true
    }

    pub fn finish_reveal(&mut self) {
        self.revealed = None;
    }

    #[cfg(test)]
    pub fn is_revealing(&self) -> bool {
        self.revealed.is_some()
    }

    /// The part of turn `idx` currently on screen.
    pub fn visible_text(&self, idx: usize) -> &str {
        let Some(turn) = self.turns.get(idx) else {
            return "";
        };
        match self.revealed {
            Some(shown) if idx + 1 == self.turns.len() => {
                let end = turn
                    .text
                    .char_indices()
                    .nth(shown)
                    .map(|(i, _)| i)
                    .unwrap_or(turn.text.len());
                &turn.text[..end]
            }
            _ => &turn.text,
        }
    }

    /// Drop every turn and go back to the welcome view.
    pub fn new_chat(&mut self) {
        self.turns.clear();
        self.welcome_visible = true;
        self.awaiting_reply = false;
        self.message_count = 0;
        self.revealed = None;
        self.scroll = 0;
        self.follow_bottom = true;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
        self.message_count += 1;
        self.follow_bottom = true;
    }
}
