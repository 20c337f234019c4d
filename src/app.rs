use ratatui::widgets::ListState;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::input::{suggestion_prompt, InputBuffer, QUICK_ACTIONS, SUGGESTIONS};
use crate::models::{self, ModelKind, ModelOption, FALLBACK_MODEL};
use crate::ollama::OllamaClient;
use crate::responder;
use crate::session::ChatSession;

/// Ticks between frames of the typing-indicator animation
const ANIMATION_TICKS: u16 = 10;

pub const OLLAMA_OFFLINE_ALERT: &str =
    "Ollama is not running! Please start Ollama service first.\n\nRun: ollama serve";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Checking,
    Connected,
    Offline,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Connecting...",
            ConnectionStatus::Connected => "Ollama Connected",
            ConnectionStatus::Offline => "Ollama Offline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    QuickActions,
    Transcript,
}

pub struct App {
    pub should_quit: bool,
    pub focus: Focus,

    // Chat state
    pub session: ChatSession,
    pub input: InputBuffer,
    pub reply_task: Option<JoinHandle<String>>,

    // Model selection
    pub ollama: OllamaClient,
    pub status: ConnectionStatus,
    pub selected_model: String,
    pub model_options: Vec<ModelOption>,
    // Set when the model came from the command line or config file
    pub model_pinned: bool,
    pub persist_model_choice: bool,

    // Popups
    pub show_model_picker: bool,
    pub model_picker_state: ListState,
    pub alert: Option<String>,

    // Welcome view and suggestion lists
    pub quick_action_state: ListState,
    pub suggestion_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
    tick_count: u16,

    // Transcript pane size, updated during render
    pub chat_height: u16,
    pub chat_width: u16,
}

impl App {
    pub fn new(ollama: OllamaClient, preferred_model: Option<String>) -> Self {
        let model_pinned = preferred_model.is_some();
        let selected_model = preferred_model.unwrap_or_else(|| FALLBACK_MODEL.to_string());

        Self {
            should_quit: false,
            focus: Focus::Input,

            session: ChatSession::new(),
            input: InputBuffer::new(),
            reply_task: None,

            ollama,
            status: ConnectionStatus::Checking,
            selected_model,
            model_options: models::cloud_models(),
            model_pinned,
            persist_model_choice: false,

            show_model_picker: false,
            model_picker_state: ListState::default(),
            alert: None,

            quick_action_state: ListState::default(),
            suggestion_state: ListState::default(),

            animation_frame: 0,
            tick_count: 0,

            chat_height: 0,
            chat_width: 0,
        }
    }

    /// Probe Ollama and rebuild the model selector from what it reports.
    pub async fn check_connection(&mut self) {
        match self.ollama.list_models().await {
            Ok(local_models) => {
                info!(models = ?local_models, "Ollama is running and connected");
                self.status = ConnectionStatus::Connected;
                self.model_options = models::selector_options(&local_models);
                if !self.model_pinned {
                    if let Some(first) = local_models.first() {
                        self.selected_model = first.clone();
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Ollama is not running. Please start it with: ollama serve");
                self.status = ConnectionStatus::Offline;
                self.model_options = models::cloud_models();
            }
        }
    }

    pub fn model_info(&self) -> String {
        models::model_info(&self.selected_model)
    }

    pub fn is_waiting(&self) -> bool {
        self.session.awaiting_reply()
    }

    /// Send whatever is in the input box. Returns whether a message went out.
    pub fn send_message(&mut self) -> bool {
        if !self.session.can_send() {
            return false;
        }
        let Some(message) = self.input.message() else {
            return false;
        };

        self.session.push_user(message.clone());
        self.input.clear();
        self.suggestion_state.select(None);
        self.session.begin_reply();
        self.focus = Focus::Input;
        self.scroll_to_bottom();

        let ollama = self.ollama.clone();
        let model = self.selected_model.clone();
        self.reply_task = Some(tokio::spawn(async move {
            responder::resolve(&ollama, &model, &message).await
        }));
        true
    }

    pub fn send_quick_action(&mut self, idx: usize) -> bool {
        let Some(action) = QUICK_ACTIONS.get(idx) else {
            return false;
        };
        self.input.set(action.prompt);
        self.send_message()
    }

    /// Fill the input with a suggestion without sending it
    pub fn accept_suggestion(&mut self, idx: usize) {
        if let Some(suggestion) = SUGGESTIONS.get(idx) {
            self.input.set(&suggestion_prompt(suggestion));
            self.suggestion_state.select(None);
            self.focus = Focus::Input;
        }
    }

    /// Suggestions are offered while the focused input is empty.
    pub fn suggestions_visible(&self) -> bool {
        self.focus == Focus::Input && self.input.text().is_empty() && !self.show_model_picker
    }

    /// Collect the reply if its task has completed.
    pub async fn poll_reply(&mut self) {
        let finished = self
            .reply_task
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if finished {
            self.wait_for_reply().await;
        }
    }

    /// Block until the outstanding reply arrives and append it.
    pub async fn wait_for_reply(&mut self) {
        if let Some(task) = self.reply_task.take() {
            let reply = match task.await {
                Ok(reply) => reply,
                Err(e) => format!("Error: {}", e),
            };
            self.session.push_assistant(reply);
            self.scroll_to_bottom();
        }
    }

    pub async fn select_model(&mut self, model: &str) {
        match ModelKind::of(model) {
            ModelKind::Cloud => {
                info!(model, "using canned responses");
                self.selected_model = model.to_string();
            }
            ModelKind::Local => {
                if self.ollama.is_running().await {
                    info!(model, "using Ollama model");
                    self.status = ConnectionStatus::Connected;
                    self.selected_model = model.to_string();
                    if self.persist_model_choice {
                        if let Err(e) = Config::save_default_model(model) {
                            warn!(error = %e, "could not save default model");
                        }
                    }
                } else {
                    warn!(model, "Ollama unreachable, falling back to {}", FALLBACK_MODEL);
                    self.status = ConnectionStatus::Offline;
                    self.alert = Some(OLLAMA_OFFLINE_ALERT.to_string());
                    self.selected_model = FALLBACK_MODEL.to_string();
                }
            }
        }
    }

    /// Clear the transcript and return to the welcome view.
    pub fn start_new_chat(&mut self) {
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
        self.session.new_chat();
        self.input.clear();
        self.focus = Focus::Input;
        self.quick_action_state.select(None);
        self.suggestion_state.select(None);
        info!("started new chat");
    }

    /// Advance the typewriter and the typing-indicator animation
    pub fn tick(&mut self) {
        if self.session.tick() {
            self.scroll_to_bottom();
        }
        if self.session.awaiting_reply() {
            self.tick_count = (self.tick_count + 1) % ANIMATION_TICKS;
            if self.tick_count == 0 {
                self.animation_frame = (self.animation_frame + 1) % 3;
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if self.session.welcome_visible() => {
                if self.quick_action_state.selected().is_none() {
                    self.quick_action_state.select(Some(0));
                }
                Focus::QuickActions
            }
            Focus::Input => Focus::Transcript,
            Focus::QuickActions | Focus::Transcript => Focus::Input,
        };
    }

    // Model picker methods
    pub fn open_model_picker(&mut self) {
        let current_idx = self
            .model_options
            .iter()
            .position(|m| m.id == self.selected_model)
            .unwrap_or(0);
        self.model_picker_state.select(Some(current_idx));
        self.show_model_picker = true;
    }

    pub fn model_picker_nav_down(&mut self) {
        let len = self.model_options.len();
        if len > 0 {
            let i = self.model_picker_state.selected().unwrap_or(0);
            self.model_picker_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn model_picker_nav_up(&mut self) {
        let i = self.model_picker_state.selected().unwrap_or(0);
        self.model_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub async fn confirm_model_picker(&mut self) {
        self.show_model_picker = false;
        let chosen = self
            .model_picker_state
            .selected()
            .and_then(|i| self.model_options.get(i))
            .map(|m| m.id.clone());
        if let Some(model) = chosen {
            self.select_model(&model).await;
        }
    }

    pub fn quick_action_nav(&mut self, down: bool) {
        let len = QUICK_ACTIONS.len();
        let i = self.quick_action_state.selected().unwrap_or(0);
        let next = if down { (i + 1).min(len - 1) } else { i.saturating_sub(1) };
        self.quick_action_state.select(Some(next));
    }

    pub fn suggestion_nav(&mut self, down: bool) {
        let len = SUGGESTIONS.len();
        let next = match (self.suggestion_state.selected(), down) {
            (None, true) => Some(0),
            (None, false) => None,
            (Some(0), false) => None,
            (Some(i), true) => Some((i + 1).min(len - 1)),
            (Some(i), false) => Some(i - 1),
        };
        self.suggestion_state.select(next);
    }

    /// Scroll the transcript so the newest line (or typing indicator) is visible
    pub fn scroll_to_bottom(&mut self) {
        self.session.follow_bottom = true;

        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for (idx, turn) in self.session.turns().iter().enumerate() {
            total_lines += 1; // Sender line
            for line in self.session.visible_text(idx).lines() {
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += (char_count / wrap_width) + 1;
                }
            }
            if turn.text.is_empty() {
                total_lines += 1;
            }
            total_lines += 2; // Timestamp + blank line
        }

        if self.session.awaiting_reply() {
            total_lines += 2; // "AI:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        // Paragraph scroll offsets are u16
        let overflow = total_lines.saturating_sub(visible_height as usize);
        self.session.scroll = u16::try_from(overflow).unwrap_or(u16::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responder::ERROR_PREFIX;
    use crate::session::Sender;
    use crate::test_support::{unreachable_base_url, FakeOllama};

    fn offline_app(model: &str) -> App {
        App::new(OllamaClient::new(&unreachable_base_url()), Some(model.to_string()))
    }

    #[tokio::test]
    async fn test_send_appends_one_user_and_one_assistant_turn() {
        let mut app = offline_app("gpt-4");
        app.input.set("  Explain quantum computing  ");

        assert!(app.send_message());
        assert!(app.is_waiting());
        assert!(app.input.text().is_empty());
        app.wait_for_reply().await;

        assert_eq!(app.session.count(Sender::User), 1);
        assert_eq!(app.session.count(Sender::Assistant), 1);
        assert_eq!(app.session.turns()[0].text, "Explain quantum computing");
        assert!(!app.is_waiting());
        assert!(!app.session.welcome_visible());
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut app = offline_app("gpt-4");
        app.input.set("   \n ");
        assert!(!app.send_message());
        assert!(app.session.turns().is_empty());
        assert!(app.session.welcome_visible());
    }

    #[tokio::test]
    async fn test_second_send_refused_while_waiting() {
        let mut app = offline_app("gpt-4");
        app.input.set("one");
        assert!(app.send_message());
        app.input.set("two");
        assert!(!app.send_message());
        assert_eq!(app.input.text(), "two");

        app.wait_for_reply().await;
        assert_eq!(app.session.turns().len(), 2);
        assert!(app.send_message());
    }

    #[tokio::test]
    async fn test_cloud_model_never_calls_ollama() {
        let fake = FakeOllama::new().models(&["llama3:8b"]).spawn().await;
        let mut app = App::new(OllamaClient::new(&fake.base_url), None);

        app.select_model("claude").await;
        assert_eq!(app.selected_model, "claude");
        app.input.set("write me a story");
        app.send_message();
        app.wait_for_reply().await;

        assert_eq!(fake.total_hits(), 0);
        assert_eq!(app.session.count(Sender::Assistant), 1);
    }

    #[tokio::test]
    async fn test_failed_local_call_yields_apology_turn() {
        let mut app = offline_app("mistral:7b-instruct");
        app.input.set("hello");
        app.send_message();
        app.wait_for_reply().await;

        let reply = &app.session.turns()[1];
        assert_eq!(reply.sender, Sender::Assistant);
        assert!(reply.text.starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_local_reply_comes_from_ollama() {
        let fake = FakeOllama::new().reply("from llama").spawn().await;
        let mut app = App::new(OllamaClient::new(&fake.base_url), Some("llama3:8b".into()));
        app.input.set("hi");
        app.send_message();
        app.wait_for_reply().await;

        assert_eq!(app.session.turns()[1].text, "from llama");
        assert_eq!(fake.generate_hits(), 1);
    }

    #[tokio::test]
    async fn test_new_chat_clears_and_restores_welcome() {
        let mut app = offline_app("gpt-4");
        app.input.set("hi");
        app.send_message();
        app.wait_for_reply().await;
        app.input.set("draft");

        app.start_new_chat();
        assert!(app.session.turns().is_empty());
        assert!(app.session.welcome_visible());
        assert_eq!(app.session.message_count(), 0);
        assert!(app.input.text().is_empty());
    }

    #[tokio::test]
    async fn test_new_chat_drops_pending_reply() {
        let mut app = offline_app("gpt-4");
        app.input.set("hi");
        app.send_message();
        app.start_new_chat();

        assert!(app.reply_task.is_none());
        assert!(!app.is_waiting());
        app.poll_reply().await;
        assert!(app.session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_quick_action_sends_its_prompt() {
        let mut app = offline_app("gpt-4");
        assert!(app.send_quick_action(3));
        app.wait_for_reply().await;
        assert_eq!(app.session.turns()[0].text, QUICK_ACTIONS[3].prompt);
        assert!(!app.send_quick_action(99));
    }

    #[tokio::test]
    async fn test_suggestion_fills_without_sending() {
        let mut app = offline_app("gpt-4");
        app.accept_suggestion(1);
        assert_eq!(app.input.text(), "How do I learn Rust effectively?");
        assert!(app.session.turns().is_empty());
        assert!(app.reply_task.is_none());
    }

    #[tokio::test]
    async fn test_connection_prefers_first_local_model() {
        let fake = FakeOllama::new()
            .models(&["mistral:7b-instruct", "llama3:8b"])
            .spawn()
            .await;
        let mut app = App::new(OllamaClient::new(&fake.base_url), None);

        app.check_connection().await;
        assert_eq!(app.status, ConnectionStatus::Connected);
        assert_eq!(app.selected_model, "mistral:7b-instruct");
        assert_eq!(app.model_options.len(), 5);
    }

    #[tokio::test]
    async fn test_connection_keeps_pinned_model() {
        let fake = FakeOllama::new().models(&["mistral:7b-instruct"]).spawn().await;
        let mut app = App::new(OllamaClient::new(&fake.base_url), Some("gemini".into()));

        app.check_connection().await;
        assert_eq!(app.selected_model, "gemini");
    }

    #[tokio::test]
    async fn test_offline_connection() {
        let mut app = offline_app("gpt-4");
        app.check_connection().await;
        assert_eq!(app.status, ConnectionStatus::Offline);
        assert_eq!(app.status.label(), "Ollama Offline");
        assert_eq!(app.model_options, models::cloud_models());
    }

    #[tokio::test]
    async fn test_local_selection_falls_back_when_offline() {
        let mut app = offline_app("gemini");
        app.select_model("llama3:8b").await;

        assert_eq!(app.selected_model, FALLBACK_MODEL);
        assert_eq!(app.alert.as_deref(), Some(OLLAMA_OFFLINE_ALERT));
    }

    #[tokio::test]
    async fn test_model_picker_selects_highlighted_option() {
        let mut app = offline_app("gpt-4");
        app.open_model_picker();
        assert_eq!(app.model_picker_state.selected(), Some(0));
        app.model_picker_nav_down();
        app.model_picker_nav_down();
        app.model_picker_nav_down();
        app.confirm_model_picker().await;

        assert!(!app.show_model_picker);
        assert_eq!(app.selected_model, "gemini");
    }

    #[tokio::test]
    async fn test_tick_reveals_reply() {
        let mut app = offline_app("gpt-4");
        app.input.set("hi");
        app.send_message();
        app.wait_for_reply().await;

        assert_eq!(app.session.visible_text(1), "");
        app.tick();
        assert_eq!(app.session.visible_text(1).chars().count(), 1);
    }

    #[tokio::test]
    async fn test_crashed_reply_task_becomes_error_turn() {
        let mut app = offline_app("gpt-4");
        app.session.push_user("hi");
        app.session.begin_reply();
        let task: JoinHandle<String> = tokio::spawn(async { panic!("reply task crashed") });
        app.reply_task = Some(task);

        app.wait_for_reply().await;

        assert!(!app.is_waiting());
        assert_eq!(app.session.count(Sender::Assistant), 1);
        let turn = &app.session.turns()[1];
        assert_eq!(turn.sender, Sender::Assistant);
        assert!(turn.text.starts_with("Error: "), "{}", turn.text);
    }

    #[test]
    fn test_scroll_survives_huge_transcript() {
        let mut app = offline_app("gpt-4");
        app.chat_width = 80;
        app.chat_height = 20;
        for _ in 0..30 {
            app.session.push_user("go");
        }
        app.session.push_assistant("x".repeat(200_000));
        app.session.finish_reveal();

        app.scroll_to_bottom();
        assert_eq!(app.session.scroll, u16::MAX);
    }

    #[test]
    fn test_scroll_to_bottom_offsets_past_visible_height() {
        let mut app = offline_app("gpt-4");
        app.chat_width = 10;
        app.chat_height = 5;
        app.session.push_assistant("x".repeat(95));
        app.session.finish_reveal();

        app.scroll_to_bottom();
        // sender + 10 wrapped rows + timestamp + blank
        assert_eq!(app.session.scroll, 13 - 5);
    }

    #[test]
    fn test_cycle_focus() {
        let mut app = App::new(OllamaClient::new("http://localhost:11434"), None);
        app.cycle_focus();
        assert_eq!(app.focus, Focus::QuickActions);
        assert_eq!(app.quick_action_state.selected(), Some(0));
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_suggestion_nav() {
        let mut app = App::new(OllamaClient::new("http://localhost:11434"), None);
        app.suggestion_nav(false);
        assert_eq!(app.suggestion_state.selected(), None);
        app.suggestion_nav(true);
        app.suggestion_nav(true);
        app.suggestion_nav(true);
        app.suggestion_nav(true);
        assert_eq!(app.suggestion_state.selected(), Some(SUGGESTIONS.len() - 1));
        app.suggestion_nav(false);
        app.suggestion_nav(false);
        app.suggestion_nav(false);
        assert_eq!(app.suggestion_state.selected(), None);
    }
}
