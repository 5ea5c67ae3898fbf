use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};

use super::dto::{
    SearchQuery, SearchResponse, SubjectArticlesResponse, SubjectSummary, TopicQuery,
    TopicsResponse,
};
use crate::extractor::AuthUser;
use crate::knowledge_base::{Article, MIN_QUERY_LEN, Subject};
use crate::static_service::get_knowledge_base;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/knowledge", get(list_subjects))
        .route("/api/v1/knowledge/search", get(search))
        .route("/api/v1/knowledge/{subject}", get(subject_articles))
        .route("/api/v1/knowledge/{subject}/topics", get(subject_topics))
        .route(
            "/api/v1/knowledge/{subject}/articles/{id}",
            get(get_article),
        )
}

fn find_subject(id: &str) -> Result<&'static Subject, (StatusCode, String)> {
    get_knowledge_base()
        .subject(id)
        .ok_or((StatusCode::NOT_FOUND, "Subject not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/knowledge",
    responses(
        (status = 200, description = "Subjects", body = Vec<SubjectSummary>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Knowledge base"
)]
pub async fn list_subjects(_user: AuthUser) -> (StatusCode, Json<Vec<SubjectSummary>>) {
    let subjects = get_knowledge_base().subjects().map(Into::into).collect();
    (StatusCode::OK, Json(subjects))
}

/// Case-insensitive search over article titles, content and topics
#[utoipa::path(
    get,
    path = "/api/v1/knowledge/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching articles", body = SearchResponse),
        (status = 400, description = "Query too short"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Knowledge base"
)]
pub async fn search(
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<(StatusCode, Json<SearchResponse>), (StatusCode, String)> {
    let q = query.q.trim();
    if q.chars().count() < MIN_QUERY_LEN {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Search query must be at least {} characters", MIN_QUERY_LEN),
        ));
    }

    let results = get_knowledge_base().search(q, query.subject.as_deref());

    Ok((
        StatusCode::OK,
        Json(SearchResponse {
            query: q.to_string(),
            results,
        }),
    ))
}

/// Articles of a subject, optionally filtered by topic name
#[utoipa::path(
    get,
    path = "/api/v1/knowledge/{subject}",
    params(
        ("subject" = String, Path, description = "Subject id, e.g. math"),
        TopicQuery
    ),
    responses(
        (status = 200, description = "Articles", body = SubjectArticlesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Knowledge base"
)]
pub async fn subject_articles(
    _user: AuthUser,
    Path(subject): Path<String>,
    Query(query): Query<TopicQuery>,
) -> Result<(StatusCode, Json<SubjectArticlesResponse>), (StatusCode, String)> {
    let found = find_subject(&subject)?;
    let articles = get_knowledge_base()
        .articles(&subject, query.topic.as_deref())
        .unwrap_or_default()
        .into_iter()
        .cloned()
        .collect();

    Ok((
        StatusCode::OK,
        Json(SubjectArticlesResponse {
            subject: found.id.clone(),
            title: found.title.clone(),
            topic: query.topic,
            articles,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/knowledge/{subject}/topics",
    params(("subject" = String, Path, description = "Subject id")),
    responses(
        (status = 200, description = "Topics", body = TopicsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Subject not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Knowledge base"
)]
pub async fn subject_topics(
    _user: AuthUser,
    Path(subject): Path<String>,
) -> Result<(StatusCode, Json<TopicsResponse>), (StatusCode, String)> {
    let found = find_subject(&subject)?;

    Ok((
        StatusCode::OK,
        Json(TopicsResponse {
            subject: found.id.clone(),
            topics: found.topics.clone(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/knowledge/{subject}/articles/{id}",
    params(
        ("subject" = String, Path, description = "Subject id"),
        ("id" = i32, Path, description = "Article id")
    ),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Article not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Knowledge base"
)]
pub async fn get_article(
    _user: AuthUser,
    Path((subject, id)): Path<(String, i32)>,
) -> Result<(StatusCode, Json<Article>), (StatusCode, String)> {
    let article = get_knowledge_base()
        .article(&subject, id)
        .ok_or((StatusCode::NOT_FOUND, "Article not found".to_string()))?;

    Ok((StatusCode::OK, Json(article.clone())))
}
