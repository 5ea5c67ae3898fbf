//! Read-only subject/topic/article catalogue.
//!
//! Loaded once at startup, either from the JSON bundled into the binary or
//! from `--knowledge-base-path`. There is no mutation API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const BUNDLED: &str = include_str!("../data/knowledge_base.json");

pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBase {
    subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Subject {
    pub id: String,
    pub title: String,
    pub topics: Vec<Topic>,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Topic {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchHit {
    pub subject: String,
    pub subject_title: String,
    #[serde(flatten)]
    pub article: Article,
}

impl KnowledgeBase {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        serde_json::from_str(BUNDLED)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Articles of a subject, optionally narrowed to one topic (case-insensitive).
    pub fn articles(&self, subject: &str, topic: Option<&str>) -> Option<Vec<&Article>> {
        let subject = self.subject(subject)?;
        let articles = subject
            .articles
            .iter()
            .filter(|a| topic.is_none_or(|t| a.topic.to_lowercase() == t.to_lowercase()))
            .collect();
        Some(articles)
    }

    pub fn article(&self, subject: &str, article_id: i32) -> Option<&Article> {
        self.subject(subject)?
            .articles
            .iter()
            .find(|a| a.id == article_id)
    }

    /// Case-insensitive substring search over article title, content and topic.
    pub fn search(&self, query: &str, subject: Option<&str>) -> Vec<SearchHit> {
        let needle = query.to_lowercase();

        self.subjects
            .iter()
            .filter(|s| subject.is_none_or(|id| s.id == id))
            .flat_map(|s| s.articles.iter().map(move |a| (s, a)))
            .filter(|(_, a)| {
                a.title.to_lowercase().contains(&needle)
                    || a.content.to_lowercase().contains(&needle)
                    || a.topic.to_lowercase().contains(&needle)
            })
            .map(|(s, a)| SearchHit {
                subject: s.id.clone(),
                subject_title: s.title.clone(),
                article: a.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalogue_parses() {
        let kb = KnowledgeBase::bundled().unwrap();
        let ids: Vec<_> = kb.subjects().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["math", "physics", "programming"]);
    }

    #[test]
    fn filters_articles_by_topic_ignoring_case() {
        let kb = KnowledgeBase::bundled().unwrap();
        let articles = kb.articles("math", Some("geometry")).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Pythagorean theorem");

        assert_eq!(kb.articles("math", None).unwrap().len(), 3);
        assert!(kb.articles("history", None).is_none());
    }

    #[test]
    fn finds_article_by_id() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert_eq!(kb.article("physics", 2).unwrap().title, "Ohm's law");
        assert!(kb.article("physics", 99).is_none());
    }

    #[test]
    fn search_spans_subjects_unless_narrowed() {
        let kb = KnowledgeBase::bundled().unwrap();

        let hits = kb.search("LAW", None);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.subject == "physics"));

        let hits = kb.search("algo", Some("math"));
        assert!(hits.is_empty());

        let hits = kb.search("algo", Some("programming"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subject_title, "Programming");
    }
}
