use serde::Serialize;
use utoipa::ToSchema;

pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod homework;
pub mod knowledge;
pub mod notifications;
pub mod schedule;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
