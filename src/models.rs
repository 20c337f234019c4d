/// Model served when nothing else is selected, and the fallback when Ollama is unreachable
pub const FALLBACK_MODEL: &str = "gpt-4";

const LOCAL_NAME_HINTS: [&str; 3] = ["mistral", "llama", "codellama"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Answered by the Ollama server
    Local,
    /// Answered from the canned response table
    Cloud,
}

impl ModelKind {
    /// Tagged names (`name:tag`) and the well-known local families are local.
    pub fn of(model: &str) -> Self {
        if model.contains(':') || LOCAL_NAME_HINTS.iter().any(|hint| model.contains(hint)) {
            ModelKind::Local
        } else {
            ModelKind::Cloud
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOption {
    pub id: String,
    pub label: String,
}

pub fn cloud_models() -> Vec<ModelOption> {
    [
        ("gpt-4", "GPT-4 Turbo"),
        ("claude", "Claude 3.5 Sonnet"),
        ("gemini", "Gemini Pro"),
    ]
    .iter()
    .map(|(id, label)| ModelOption {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Selector entries: the cloud catalog first, then every installed local model.
pub fn selector_options(local_models: &[String]) -> Vec<ModelOption> {
    let mut options = cloud_models();
    options.extend(local_models.iter().map(|name| ModelOption {
        id: name.clone(),
        label: format!("🤖 {}", name),
    }));
    options
}

pub fn display_name(model: &str) -> String {
    if let Some(option) = cloud_models().into_iter().find(|o| o.id == model) {
        return option.label;
    }
    match ModelKind::of(model) {
        ModelKind::Local => format!("Ollama Local LLM ({})", model),
        ModelKind::Cloud => model.to_string(),
    }
}

/// Footer line under the input box
pub fn model_info(model: &str) -> String {
    format!("Powered by {} • Responses may vary", display_name(model))
}
