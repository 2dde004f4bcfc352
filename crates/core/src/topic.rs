use crate::responder::Responder;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::fmt;

/// A debate topic. Plain text; two topics are the same if their text is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Topic {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Topic {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The suggested topics, or the reason they could not be fetched.
///
/// An unavailable catalog behaves as an empty one: the user can still type a
/// topic of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicCatalog {
    Loaded(Vec<Topic>),
    Unavailable { reason: String },
}

impl TopicCatalog {
    /// Fetches the catalog once. Failures are logged and captured, never returned.
    pub async fn fetch<R: Responder + ?Sized>(responder: &R) -> Self {
        match responder.suggested_topics().await {
            Ok(topics) => {
                tracing::info!("Loaded {} suggested topics.", topics.len());
                TopicCatalog::Loaded(topics.into_iter().map(Topic::from).collect())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch topics: {}", e);
                TopicCatalog::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn topics(&self) -> &[Topic] {
        match self {
            TopicCatalog::Loaded(topics) => topics,
            TopicCatalog::Unavailable { .. } => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TopicCatalog::Loaded(_))
    }

    pub fn get(&self, index: usize) -> Option<&Topic> {
        self.topics().get(index)
    }

    // Topics fuzzily matching the query, best match first. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Topic> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.topics().iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &Topic)> = self
            .topics()
            .iter()
            .filter_map(|topic| {
                matcher
                    .fuzzy_match(&topic.as_str().to_lowercase(), &query)
                    .map(|score| (score, topic))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, topic)| topic).collect()
    }
}
