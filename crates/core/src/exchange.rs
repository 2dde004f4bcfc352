//! Request packaging, dispatch and reconciliation for one round trip with the responder.
//!
//! An exchange is split in two: the session builds a [`PendingExchange`]
//! synchronously (after appending the user's turn), then [`dispatch`] awaits
//! the responder without touching the session. The outcome is folded back by
//! `DebateSession::complete`, which calls [`reconcile`].

use crate::error::ExchangeError;
use crate::responder::Responder;
use debate_types::{DebateRequest, Turn};

/// Shown when the opening exchange fails.
pub const INITIAL_FAILURE_TEXT: &str = "I'm sorry, I encountered an error connecting to my neural core. Please ensure the backend is running and the GROQ_API_KEY is set.";

/// Shown when a follow-up exchange fails.
pub const FOLLOW_UP_FAILURE_TEXT: &str = "Failed to generate counter-argument. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeKind {
    /// The first exchange, sent right after the stance is declared.
    Opening,
    /// Any later exchange, carrying the transcript as history.
    FollowUp,
}

impl ExchangeKind {
    pub fn fallback_text(&self) -> &'static str {
        match self {
            ExchangeKind::Opening => INITIAL_FAILURE_TEXT,
            ExchangeKind::FollowUp => FOLLOW_UP_FAILURE_TEXT,
        }
    }
}

/// A prepared exchange awaiting dispatch.
///
/// Not `Clone`: it is consumed when the outcome is reconciled, so a single
/// exchange can never append two replies.
#[derive(Debug)]
pub struct PendingExchange {
    kind: ExchangeKind,
    epoch: u64,
    request: DebateRequest,
}

impl PendingExchange {
    pub(crate) fn new(kind: ExchangeKind, epoch: u64, request: DebateRequest) -> Self {
        Self {
            kind,
            epoch,
            request,
        }
    }

    pub fn kind(&self) -> ExchangeKind {
        self.kind
    }

    /// The session epoch the exchange was started in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn request(&self) -> &DebateRequest {
        &self.request
    }
}

pub fn opening_request(topic: &str, stance: &str) -> DebateRequest {
    DebateRequest::opening(topic, stance)
}

// The stance travels in `initial_viewpoint` only; the history holds exactly
// the transcript so far plus the new user turn.
pub fn follow_up_request(
    topic: &str,
    stance: &str,
    transcript_so_far: &[Turn],
    new_user_turn: Turn,
) -> DebateRequest {
    let mut history = Vec::with_capacity(transcript_so_far.len() + 1);
    history.extend_from_slice(transcript_so_far);
    history.push(new_user_turn);
    DebateRequest::follow_up(topic, stance, history)
}

/// Opening exchange: `{topic, initial_viewpoint: stance, history: []}`.
///
/// Stateless form of the request `DebateSession::start_debate` prepares; it
/// does not touch a session, so no turn is appended and no busy flag is set.
pub async fn send_initial<R: Responder + ?Sized>(
    responder: &R,
    topic: &str,
    stance: &str,
) -> Result<String, ExchangeError> {
    responder.respond(&opening_request(topic, stance)).await
}

/// Follow-up exchange: the history is the transcript so far plus the new user turn.
///
/// Stateless form of the request `DebateSession::send_turn` prepares.
pub async fn send_turn<R: Responder + ?Sized>(
    responder: &R,
    topic: &str,
    stance: &str,
    transcript_so_far: &[Turn],
    new_user_text: &str,
) -> Result<String, ExchangeError> {
    let request = follow_up_request(topic, stance, transcript_so_far, Turn::user(new_user_text));
    responder.respond(&request).await
}

/// Issues a prepared exchange. Runs to completion; there is no timeout or abort.
pub async fn dispatch<R: Responder + ?Sized>(
    responder: &R,
    pending: &PendingExchange,
) -> Result<String, ExchangeError> {
    tracing::debug!(
        "dispatching {:?} exchange with {} history turns",
        pending.kind(),
        pending.request().history().len()
    );
    let outcome = responder.respond(pending.request()).await;
    if let Err(e) = &outcome {
        tracing::warn!("{:?} exchange failed: {}", pending.kind(), e);
    }
    outcome
}

/// The assistant turn to append for an outcome: the reply, or the fixed fallback.
pub fn reconcile(kind: ExchangeKind, outcome: Result<String, ExchangeError>) -> Turn {
    match outcome {
        Ok(reply) => Turn::assistant(reply),
        Err(_) => Turn::assistant(kind.fallback_text()),
    }
}
