/// Topics offered when the user has not typed one of their own.
pub const DEFAULT_TOPICS: [&str; 6] = [
    "Free Will vs. Determinism",
    "The Ethics of Artificial Intelligence Consciousness",
    "Universal Basic Income: Pros and Cons",
    "Privacy in the Digital Age vs. National Security",
    "The Simulation Theory: Are we living in a computer program?",
    "Morality: Objective Truth or Social Construct?",
];

/// Body of `GET /suggested-topics`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct SuggestedTopics {
    topics: Vec<String>,
}

impl SuggestedTopics {
    pub fn new(topics: Vec<String>) -> Self {
        Self { topics }
    }

    pub fn defaults() -> Self {
        Self::new(DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect())
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn into_topics(self) -> Vec<String> {
        self.topics
    }
}
