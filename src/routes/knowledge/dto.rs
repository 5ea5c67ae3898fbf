use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::knowledge_base::{Article, SearchHit, Subject, Topic};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// At least two characters
    pub q: String,
    /// Restrict to one subject id
    pub subject: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopicQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectSummary {
    pub id: String,
    pub title: String,
    pub topic_count: usize,
    pub article_count: usize,
}

impl From<&Subject> for SubjectSummary {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id.clone(),
            title: subject.title.clone(),
            topic_count: subject.topics.len(),
            article_count: subject.articles.len(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectArticlesResponse {
    pub subject: String,
    pub title: String,
    pub topic: Option<String>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicsResponse {
    pub subject: String,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
}
