use crate::Turn;

/// Body of `POST /debate`.
///
/// The topic and the initial stance travel on every request, separately from
/// `history`; the stance is never repeated inside the history.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DebateRequest {
    /// The debate topic
    topic: String,

    /// The stance the user declared before the first exchange
    initial_viewpoint: String,

    /// Prior turns, oldest first. Empty for the opening exchange.
    #[serde(default)]
    history: Vec<Turn>,
}

impl DebateRequest {
    /// Request for the opening exchange: no history.
    pub fn opening(topic: impl Into<String>, initial_viewpoint: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            initial_viewpoint: initial_viewpoint.into(),
            history: Vec::new(),
        }
    }

    /// Request for a follow-up exchange carrying the full transcript.
    pub fn follow_up(
        topic: impl Into<String>,
        initial_viewpoint: impl Into<String>,
        history: Vec<Turn>,
    ) -> Self {
        Self {
            topic: topic.into(),
            initial_viewpoint: initial_viewpoint.into(),
            history,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn initial_viewpoint(&self) -> &str {
        &self.initial_viewpoint
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn is_opening(&self) -> bool {
        self.history.is_empty()
    }
}

/// Successful body of `POST /debate`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DebateResponse {
    /// The responder's rebuttal
    response: String,
}

impl DebateResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn into_response(self) -> String {
        self.response
    }
}
