use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod canned;
mod config;
mod error;
mod handler;
mod input;
mod models;
mod ollama;
mod responder;
mod session;
mod tui;
mod ui;

#[cfg(test)]
mod test_support;

use app::App;
use config::Config;
use ollama::OllamaClient;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "neuralchat")]
#[command(version, about = "Chat with local Ollama models, or canned cloud-model replies")]
struct Cli {
    /// Ollama server address (overrides the config file)
    #[arg(long)]
    ollama_url: Option<String>,

    /// Model to start with, e.g. gpt-4 or mistral:7b-instruct
    #[arg(short, long)]
    model: Option<String>,

    /// Where to write logs (default: <cache dir>/neuralchat/neuralchat.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Milliseconds per typed-out character of a reply
    #[arg(long, default_value = "30")]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.clone())?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });

    let (ollama_url, model) = resolve_settings(&cli, &config);
    let ollama = OllamaClient::new(&ollama_url);
    info!(url = ollama.base_url(), "starting NeuralChat");

    let mut app = App::new(ollama, model);
    app.persist_model_choice = true;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(Duration::from_millis(cli.tick_ms.max(1)));

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

/// Command-line flags win over the config file.
fn resolve_settings(cli: &Cli, config: &Config) -> (String, Option<String>) {
    let ollama_url = cli
        .ollama_url
        .clone()
        .unwrap_or_else(|| config.ollama_url().to_string());
    let model = cli.model.clone().or_else(|| config.default_model.clone());
    (ollama_url, model)
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    // Show the "Connecting..." header while Ollama is probed
    terminal.draw(|frame| ui::render(app, frame))?;
    app.check_connection().await;

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    info!("exiting");
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path.or_else(default_log_path) else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("neuralchat").join("neuralchat.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ollama::DEFAULT_BASE_URL;

    fn file_config() -> Config {
        Config {
            ollama_url: Some("http://gpu-box:11434".to_string()),
            default_model: Some("mistral:7b-instruct".to_string()),
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = Cli::parse_from([
            "neuralchat",
            "--ollama-url",
            "http://127.0.0.1:9999",
            "--model",
            "claude",
        ]);
        let (url, model) = resolve_settings(&cli, &file_config());
        assert_eq!(url, "http://127.0.0.1:9999");
        assert_eq!(model.as_deref(), Some("claude"));
    }

    #[test]
    fn test_config_file_fills_missing_flags() {
        let cli = Cli::parse_from(["neuralchat"]);
        let (url, model) = resolve_settings(&cli, &file_config());
        assert_eq!(url, "http://gpu-box:11434");
        assert_eq!(model.as_deref(), Some("mistral:7b-instruct"));
    }

    #[test]
    fn test_defaults_without_flags_or_file() {
        let cli = Cli::parse_from(["neuralchat"]);
        let (url, model) = resolve_settings(&cli, &Config::new());
        assert_eq!(url, DEFAULT_BASE_URL);
        assert_eq!(model, None);
        assert_eq!(cli.tick_ms, 30);
    }
}
