use tracing::{debug, error, info};

use crate::canned;
use crate::models::ModelKind;
use crate::ollama::OllamaClient;

/// Prefix of every reply produced from a failed local generation
pub const ERROR_PREFIX: &str = "Sorry, I encountered an error";

/// Produce the assistant's reply to `message` for the selected `model`.
///
/// Local models go to Ollama; a failed request is folded into the reply text
/// rather than returned, so a reply always comes back. Cloud models never
/// touch the network.
pub async fn resolve(client: &OllamaClient, model: &str, message: &str) -> String {
    match ModelKind::of(model) {
        ModelKind::Local => {
            info!(model, "requesting reply from Ollama");
            match client.generate(model, message).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(model, error = %e, "Ollama generation failed");
                    format!(
                        "{}: {}. Please make sure Ollama is running on localhost:11434",
                        ERROR_PREFIX, e
                    )
                }
            }
        }
        ModelKind::Cloud => {
            let topic = canned::match_topic(message).map_or("general", |t| t.name);
            debug!(model, topic, "answering from canned replies");
            let mut rng = rand::thread_rng();
            canned::pick(message, &mut rng).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unreachable_base_url, FakeOllama};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_cloud_model_makes_no_request() {
        let fake = FakeOllama::new().spawn().await;
        let client = OllamaClient::new(&fake.base_url);

        let reply = resolve(&client, "gpt-4", "explain quantum computing").await;
        assert!(canned::TOPICS[0].responses.contains(&reply.as_str()));
        assert_eq!(fake.total_hits(), 0);
    }

    #[tokio::test]
    async fn test_local_model_uses_ollama() {
        let fake = FakeOllama::new().reply("local answer").spawn().await;
        let client = OllamaClient::new(&fake.base_url);

        let reply = resolve(&client, "mistral:7b-instruct", "hi").await;
        assert_eq!(reply, "local answer");
        assert_eq!(fake.generate_hits(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_ollama_yields_apology() {
        let client = OllamaClient::new(&unreachable_base_url());

        let reply = resolve(&client, "llama3:8b", "hi").await;
        assert!(reply.starts_with(ERROR_PREFIX), "{}", reply);
        assert!(reply.ends_with("Please make sure Ollama is running on localhost:11434"));
    }

    #[tokio::test]
    async fn test_error_status_yields_apology() {
        let fake = FakeOllama::new()
            .generate_status(StatusCode::INTERNAL_SERVER_ERROR)
            .spawn()
            .await;
        let client = OllamaClient::new(&fake.base_url);

        let reply = resolve(&client, "codellama", "hi").await;
        assert_eq!(
            reply,
            "Sorry, I encountered an error: HTTP error! status: 500. \
             Please make sure Ollama is running on localhost:11434"
        );
    }
}
