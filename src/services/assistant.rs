//! Scripted study assistant: fixed keyword replies, subject help and topic
//! explanations, plus a per-user chat history kept as JSON files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::config::CHAT_HISTORY_LIMIT;
use crate::error::{ServiceError, ServiceResult};

/// Checked in order; the first entry with a keyword found in the message wins.
const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["hello", "привет"],
        "Hello! I am your study assistant. How can I help?",
    ),
    (
        &["how are you", "как дела"],
        "I am doing great and ready to help you study.",
    ),
    (
        &["help", "помощь"],
        "I can help with:\n1. Explaining topics\n2. Solving problems\n3. Planning your studies\n4. Answering questions",
    ),
    (
        &["math", "математика"],
        "Math is fascinating! Which topic are you interested in?",
    ),
    (
        &["physics", "физика"],
        "Physics studies the laws of nature. What would you like to know?",
    ),
    (
        &["programming", "программирование"],
        "Programming is writing instructions for a computer. Which language are you interested in?",
    ),
    (
        &["thank", "спасибо"],
        "You're welcome! Come back any time you need help.",
    ),
    (&["bye", "пока"], "Goodbye! Good luck with your studies!"),
];

pub const DEFAULT_LEVEL: &str = "beginner";

const HELP_TOPICS: &[(&str, &[(&str, &str)])] = &[
    (
        "math",
        &[
            ("algebra", "Algebra studies operations on numbers and variables. Core topics: equations, inequalities, functions."),
            ("geometry", "Geometry studies shapes and their properties. Core topics: triangles, circles, the Pythagorean theorem."),
            ("calculus", "Calculus studies change. Core topics: derivatives, integrals, limits."),
            ("default", "Mathematics is the science of numbers, shapes and structures. Which area interests you: algebra, geometry or calculus?"),
        ],
    ),
    (
        "physics",
        &[
            ("mechanics", "Mechanics studies the motion of bodies. Newton's laws: 1) a body keeps its state of rest or uniform motion, 2) F=ma, 3) every action has an equal and opposite reaction."),
            ("electricity", "Electricity studies electric charges and current. Ohm's law: I=U/R."),
            ("thermodynamics", "Thermodynamics studies heat and energy. First law: energy is conserved."),
            ("default", "Physics studies the laws of nature. Which area interests you: mechanics, electricity or thermodynamics?"),
        ],
    ),
    (
        "programming",
        &[
            ("python", "Python is a high-level programming language used for web development, data analysis and AI."),
            ("javascript", "JavaScript is the language of the web. It runs in the browser and on the server (Node.js)."),
            ("algorithms", "An algorithm is a sequence of steps that solves a problem. Key topics: sorting, searching, data structures."),
            ("default", "Programming is writing instructions for a computer. Which language or topic are you studying?"),
        ],
    ),
];

const EXPLANATIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "quadratic equation",
        &[
            ("beginner", "A quadratic equation looks like ax² + bx + c = 0. It is solved through the discriminant: D = b² - 4ac."),
            ("intermediate", "The roots are x = (-b ± √D) / 2a. The discriminant gives the number of roots: D>0 two roots, D=0 one root, D<0 no real roots."),
            ("advanced", "Vieta's formulas: for x² + px + q = 0 the sum of the roots is -p and the product is q. Completing the square also works."),
        ],
    ),
    (
        "derivative",
        &[
            ("beginner", "A derivative shows how fast a function changes. For example, speed is the derivative of distance."),
            ("intermediate", "The derivative of f at x is f'(x) = lim(h→0) [f(x+h)-f(x)]/h. Basic rules: (xⁿ)' = n*xⁿ⁻¹, (sin x)' = cos x."),
            ("advanced", "Differentiation is a linear operator with sum, product, quotient and chain rules. Geometrically it is the slope of the tangent line."),
        ],
    ),
];

fn lookup<'a>(
    table: &'a [(&'a str, &'a [(&'a str, &'a str)])],
    key: &str,
) -> Option<&'a [(&'a str, &'a str)]> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, entries)| *entries)
}

fn entry<'a>(entries: &'a [(&'a str, &'a str)], key: &str) -> Option<&'a str> {
    entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn reply_to(message: &str) -> String {
    let lowered = message.to_lowercase();

    KEYWORD_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, reply)| reply.to_string())
        .unwrap_or_else(|| {
            format!(
                "I received your message: '{}'. I am still learning and can help with basic study questions. Ask me about math, physics or programming!",
                message
            )
        })
}

/// Help text for `subject`, narrowed to `topic` when it is known. `None` for
/// unknown subjects.
pub fn subject_help(subject: &str, topic: Option<&str>) -> Option<&'static str> {
    let entries = lookup(HELP_TOPICS, &subject.to_lowercase())?;

    topic
        .and_then(|topic| entry(entries, &topic.to_lowercase()))
        .or_else(|| entry(entries, "default"))
}

/// Known topics fall back to the beginner text for unknown levels.
pub fn explain(topic: &str, level: &str) -> String {
    match lookup(EXPLANATIONS, &topic.trim().to_lowercase()) {
        Some(levels) => entry(levels, level)
            .or_else(|| entry(levels, DEFAULT_LEVEL))
            .unwrap_or_default()
            .to_string(),
        None => format!(
            "Topic '{}' at level '{}'. Please refer to your textbook or ask your teacher.",
            topic, level
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatExchange {
    pub user_message: String,
    pub reply: String,
    pub timestamp: NaiveDateTime,
}

/// One JSON file per user under `dir`. Writes for the same user are
/// serialised; different users never wait on each other.
pub struct ChatHistoryStore {
    dir: PathBuf,
    locks: Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>,
}

impl ChatHistoryStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn path_for(&self, user_id: i32) -> PathBuf {
        self.dir.join(format!("user_{}.json", user_id))
    }

    fn lock_for(&self, user_id: i32) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(user_id).or_default().clone()
    }

    /// Missing or unreadable files count as an empty history.
    pub async fn load(&self, user_id: i32) -> Vec<ChatMessage> {
        let path = self.path_for(user_id);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to read chat history");
                return Vec::new();
            }
        };

        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(user_id, error = %e, "Corrupt chat history, starting over");
            Vec::new()
        })
    }

    /// Appends the message and the scripted reply, keeping the newest
    /// `CHAT_HISTORY_LIMIT` entries.
    pub async fn send(&self, user_id: i32, message: &str) -> ServiceResult<ChatExchange> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ServiceError::Validation(
                "Message cannot be empty".to_string(),
            ));
        }

        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        let mut history = self.load(user_id).await;
        let now = Utc::now().naive_utc();
        let reply = reply_to(message);

        history.push(ChatMessage::new("user", message, now));
        history.push(ChatMessage::new("assistant", reply.clone(), now));
        if history.len() > CHAT_HISTORY_LIMIT {
            history.drain(..history.len() - CHAT_HISTORY_LIMIT);
        }

        let json = serde_json::to_vec_pretty(&history)
            .map_err(|e| ServiceError::Internal(format!("Failed to encode chat history: {}", e)))?;
        fs::create_dir_all(&self.dir).await?;
        fs::write(self.path_for(user_id), json).await?;

        Ok(ChatExchange {
            user_message: message.to_string(),
            reply,
            timestamp: now,
        })
    }

    /// The newest `limit` entries plus the stored total.
    pub async fn recent(&self, user_id: i32, limit: usize) -> (Vec<ChatMessage>, usize) {
        let mut history = self.load(user_id).await;
        let total = history.len();
        if total > limit {
            history.drain(..total - limit);
        }
        (history, total)
    }

    pub async fn clear(&self, user_id: i32) -> ServiceResult<()> {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().await;

        match fs::remove_file(self.path_for(user_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_keyword_in_table_order_wins() {
        assert_eq!(reply_to("Hello there"), KEYWORD_REPLIES[0].1);
        // "help" comes before "math" in the table
        assert_eq!(reply_to("I need HELP with math"), KEYWORD_REPLIES[2].1);
        assert_eq!(reply_to("thanks, bye"), KEYWORD_REPLIES[6].1);
    }

    #[test]
    fn russian_keywords_get_the_same_replies() {
        assert_eq!(reply_to("Привет!"), KEYWORD_REPLIES[0].1);
        assert_eq!(reply_to("Нужна ПОМОЩЬ по физике"), KEYWORD_REPLIES[2].1);
        assert_eq!(reply_to("Спасибо"), KEYWORD_REPLIES[6].1);
    }

    #[test]
    fn unknown_messages_are_echoed() {
        let reply = reply_to("What is a quark?");
        assert!(reply.contains("'What is a quark?'"));
    }

    #[test]
    fn help_falls_back_to_subject_default() {
        assert!(subject_help("Math", Some("Algebra")).unwrap().starts_with("Algebra"));
        assert!(
            subject_help("math", Some("topology"))
                .unwrap()
                .starts_with("Mathematics")
        );
        assert!(subject_help("physics", None).unwrap().starts_with("Physics"));
        assert!(subject_help("history", None).is_none());
    }

    #[test]
    fn explain_falls_back_to_beginner_then_generic() {
        assert!(explain("Derivative", "advanced").starts_with("Differentiation"));
        assert!(explain("derivative", "expert").starts_with("A derivative"));
        assert!(explain("entropy", "beginner").contains("'entropy'"));
    }

    #[tokio::test]
    async fn history_is_capped_and_cleared() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ChatHistoryStore::new(dir.path().join("chat"));

        for i in 0..(CHAT_HISTORY_LIMIT / 2 + 3) {
            store.send(7, &format!("message {}", i)).await.unwrap();
        }

        let (all, total) = store.recent(7, usize::MAX).await;
        assert_eq!(total, CHAT_HISTORY_LIMIT);
        assert_eq!(all.len(), CHAT_HISTORY_LIMIT);
        assert_eq!(all.last().unwrap().role, "assistant");
        assert_eq!(all[all.len() - 2].content, format!("message {}", CHAT_HISTORY_LIMIT / 2 + 2));

        let (recent, _) = store.recent(7, 4).await;
        assert_eq!(recent.len(), 4);

        store.clear(7).await.unwrap();
        assert!(store.load(7).await.is_empty());
        store.clear(7).await.unwrap();
    }

    #[tokio::test]
    async fn empty_messages_and_broken_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ChatHistoryStore::new(dir.path());

        assert!(matches!(
            store.send(1, "   ").await,
            Err(ServiceError::Validation(_))
        ));

        std::fs::write(dir.path().join("user_1.json"), b"{not json").unwrap();
        assert!(store.load(1).await.is_empty());

        let exchange = store.send(1, "hello").await.unwrap();
        assert_eq!(exchange.reply, KEYWORD_REPLIES[0].1);
        assert_eq!(store.load(1).await.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_sends_from_one_user_are_not_lost() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(ChatHistoryStore::new(dir.path()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.send(3, &format!("msg {}", i)).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.load(3).await.len(), 20);
    }
}
