use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::services::assistant::{ChatExchange, ChatMessage, DEFAULT_LEVEL};

fn default_history_limit() -> usize {
    50
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[schema(example = "Can you help me with math?")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub user_message: String,
    pub reply: String,
    pub timestamp: NaiveDateTime,
}

impl From<ChatExchange> for ChatResponse {
    fn from(exchange: ChatExchange) -> Self {
        Self {
            user_message: exchange.user_message,
            reply: exchange.reply,
            timestamp: exchange.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatMessageResponse {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    pub history: Vec<ChatMessageResponse>,
    pub total: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HelpQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HelpResponse {
    pub subject: String,
    pub topic: Option<String>,
    pub help: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExplainRequest {
    #[schema(example = "derivative")]
    pub topic: String,
    /// beginner, intermediate or advanced
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExplainResponse {
    pub topic: String,
    pub level: String,
    pub explanation: String,
}
