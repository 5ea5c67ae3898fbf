use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    ChatHistoryResponse, ChatRequest, ChatResponse, ExplainRequest, ExplainResponse,
    HelpQuery, HelpResponse, HistoryQuery,
};
use crate::config::CHAT_HISTORY_LIMIT;
use crate::extractor::AuthUser;
use crate::routes::MessageResponse;
use crate::services::assistant;
use crate::static_service::get_chat_history;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/assistant/chat", post(chat))
        .route(
            "/api/v1/assistant/chat/history",
            get(chat_history).delete(clear_history),
        )
        .route("/api/v1/assistant/help/{subject}", get(subject_help))
        .route("/api/v1/assistant/explain", post(explain))
}

/// Send a message and get the scripted reply
#[utoipa::path(
    post,
    path = "/api/v1/assistant/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Empty message"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn chat(
    AuthUser(user): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), (StatusCode, String)> {
    let exchange = get_chat_history().send(user.id, &payload.message).await?;
    Ok((StatusCode::OK, Json(exchange.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/assistant/chat/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Newest messages, oldest first", body = ChatHistoryResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn chat_history(
    AuthUser(user): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> (StatusCode, Json<ChatHistoryResponse>) {
    let limit = query.limit.min(CHAT_HISTORY_LIMIT);
    let (history, total) = get_chat_history().recent(user.id, limit).await;

    (
        StatusCode::OK,
        Json(ChatHistoryResponse {
            history: history.into_iter().map(Into::into).collect(),
            total,
        }),
    )
}

#[utoipa::path(
    delete,
    path = "/api/v1/assistant/chat/history",
    responses(
        (status = 200, description = "History cleared", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn clear_history(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)> {
    get_chat_history().clear(user.id).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Chat history cleared"))))
}

#[utoipa::path(
    get,
    path = "/api/v1/assistant/help/{subject}",
    params(
        ("subject" = String, Path, description = "math, physics or programming"),
        HelpQuery
    ),
    responses(
        (status = 200, description = "Help text", body = HelpResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown subject")
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn subject_help(
    _user: AuthUser,
    Path(subject): Path<String>,
    Query(query): Query<HelpQuery>,
) -> Result<(StatusCode, Json<HelpResponse>), (StatusCode, String)> {
    let help = assistant::subject_help(&subject, query.topic.as_deref())
        .ok_or((StatusCode::NOT_FOUND, "Subject not found".to_string()))?;

    Ok((
        StatusCode::OK,
        Json(HelpResponse {
            subject,
            topic: query.topic,
            help: help.to_string(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/assistant/explain",
    request_body = ExplainRequest,
    responses(
        (status = 200, description = "Explanation", body = ExplainResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn explain(
    _user: AuthUser,
    Json(payload): Json<ExplainRequest>,
) -> (StatusCode, Json<ExplainResponse>) {
    let explanation = assistant::explain(&payload.topic, &payload.level);

    (
        StatusCode::OK,
        Json(ExplainResponse {
            topic: payload.topic,
            level: payload.level,
            explanation,
        }),
    )
}
