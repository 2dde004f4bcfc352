use crate::error::SessionError;
use crate::exchange::{self, PendingExchange};
use crate::responder::Responder;
use crate::session_state::DebateSession;
use crate::topic::{Topic, TopicCatalog};
use debate_types::Turn;
use std::sync::Arc;

/// Shared handle over the single live session and its responder.
///
/// Transitions run under the session lock; the responder is awaited with the
/// lock released, so the busy flag is checked-and-set atomically while the
/// UI can still read the session (and reset it) during an exchange.
///
/// An exchange always runs to completion: dropping the future returned by
/// [`start_debate`](Self::start_debate) or [`send_turn`](Self::send_turn)
/// only stops the caller from seeing the reply.
#[derive(Clone)]
pub struct DebateController {
    session: Arc<tokio::sync::Mutex<DebateSession>>,
    responder: Arc<dyn Responder>,
    catalog: Arc<TopicCatalog>,
}

impl DebateController {
    /// Fetches the topic catalog once and starts a fresh session.
    pub async fn start(responder: Arc<dyn Responder>) -> Self {
        let catalog = TopicCatalog::fetch(responder.as_ref()).await;
        Self::with_catalog(responder, catalog)
    }

    pub fn with_catalog(responder: Arc<dyn Responder>, catalog: TopicCatalog) -> Self {
        Self {
            session: Arc::new(tokio::sync::Mutex::new(DebateSession::new())),
            responder,
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &TopicCatalog {
        &self.catalog
    }

    /// A copy of the session as it is right now.
    pub async fn session(&self) -> DebateSession {
        self.session.lock().await.clone()
    }

    pub async fn select_topic(&self, topic: Topic) -> Result<(), SessionError> {
        self.session.lock().await.select_topic(topic)
    }

    pub async fn enter_own_topic(&self, text: &str) -> Result<(), SessionError> {
        self.session.lock().await.enter_own_topic(text)
    }

    pub async fn go_back(&self) -> Result<(), SessionError> {
        self.session.lock().await.go_back()
    }

    /// Declares the stance and runs the opening exchange to completion.
    ///
    /// Returns the assistant turn that was appended, or `None` if the session
    /// was reset before the reply arrived.
    pub async fn start_debate(&self, stance: &str) -> Result<Option<Turn>, SessionError> {
        let pending = self.session.lock().await.start_debate(stance)?;
        Ok(self.run_exchange(pending).await)
    }

    /// Sends the user's next argument and runs the follow-up exchange.
    pub async fn send_turn(&self, text: &str) -> Result<Option<Turn>, SessionError> {
        let pending = self.session.lock().await.send_turn(text)?;
        Ok(self.run_exchange(pending).await)
    }

    pub async fn reset(&self) {
        self.session.lock().await.reset();
    }

    // The exchange runs on its own task so it completes (and clears the busy
    // flag) even if the caller stops waiting for it.
    async fn run_exchange(&self, pending: PendingExchange) -> Option<Turn> {
        let session = self.session.clone();
        let responder = self.responder.clone();
        let task = tokio::spawn(async move {
            let outcome = exchange::dispatch(responder.as_ref(), &pending).await;
            session.lock().await.complete(pending, outcome)
        });

        match task.await {
            Ok(turn) => turn,
            Err(e) => {
                tracing::error!("Exchange task failed: {}", e);
                None
            }
        }
    }
}
