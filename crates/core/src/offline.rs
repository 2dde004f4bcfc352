use crate::error::ExchangeError;
use crate::responder::Responder;
use async_trait::async_trait;
use debate_types::{DEFAULT_TOPICS, DebateRequest};

/// A `Responder` that never touches the network.
///
/// It returns the default topic list and canned rebuttals built from the
/// request, so the terminal client can be exercised without a backend.
pub struct OfflineResponder;

#[async_trait]
impl Responder for OfflineResponder {
    async fn suggested_topics(&self) -> Result<Vec<String>, ExchangeError> {
        Ok(DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect())
    }

    async fn respond(&self, request: &DebateRequest) -> Result<String, ExchangeError> {
        if request.is_opening() {
            return Ok(format!(
                "You claim that \"{}\". On \"{}\" I take the opposing side: your position assumes the very thing it needs to prove.",
                request.initial_viewpoint(),
                request.topic()
            ));
        }

        let last_point = request
            .history()
            .iter()
            .rev()
            .find(|turn| turn.is_user())
            .map(|turn| turn.content())
            .unwrap_or_default();
        let round = request.history().len().div_ceil(2);
        Ok(format!(
            "Round {round}: \"{last_point}\" still does not answer my objection. Why should it hold in every case?"
        ))
    }
}
