use crate::{
    error::{ExchangeError, SessionError},
    exchange::{self, ExchangeKind, PendingExchange},
    topic::Topic,
    transcript::Transcript,
};
use debate_types::Turn;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// Epochs are unique across sessions, so a pending exchange only ever matches
// the session (and the reset generation) that created it.
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(0);

fn next_epoch() -> u64 {
    NEXT_EPOCH.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingTopic,
    AwaitingStance,
    Active,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AwaitingTopic => "awaiting-topic",
            Phase::AwaitingStance => "awaiting-stance",
            Phase::Active => "active",
        };
        f.write_str(name)
    }
}

/// The live debate session.
///
/// Every mutation goes through a transition method. A refused transition
/// returns a `SessionError` and leaves all fields as they were.
#[derive(Debug, Clone)]
pub struct DebateSession {
    phase: Phase,
    topic: Topic,
    initial_stance: String,
    transcript: Transcript,
    busy: bool,
    // Replaced on reset so replies to exchanges from before the reset are dropped.
    epoch: u64,
}

impl Default for DebateSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingTopic,
            topic: Topic::default(),
            initial_stance: String::new(),
            transcript: Transcript::new(),
            busy: false,
            epoch: next_epoch(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The chosen topic, if any.
    pub fn topic(&self) -> Option<&Topic> {
        if self.topic.is_blank() {
            None
        } else {
            Some(&self.topic)
        }
    }

    pub fn initial_stance(&self) -> &str {
        &self.initial_stance
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.transcript.snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn round(&self) -> usize {
        self.transcript.round()
    }

    pub fn select_topic(&mut self, topic: impl Into<Topic>) -> Result<(), SessionError> {
        let topic = topic.into();
        self.ensure_idle()?;
        self.ensure_phase(Phase::AwaitingTopic)?;
        if topic.is_blank() {
            return Err(SessionError::EmptyInput("topic"));
        }

        tracing::info!("Topic selected: {}", topic);
        self.topic = topic;
        self.phase = Phase::AwaitingStance;
        Ok(())
    }

    /// Same as `select_topic`, for a topic typed by the user instead of picked from the catalog.
    pub fn enter_own_topic(&mut self, text: &str) -> Result<(), SessionError> {
        tracing::debug!("Own topic entered");
        self.select_topic(text)
    }

    // Back to topic selection. The topic is kept so it can be re-selected or edited.
    pub fn go_back(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        self.ensure_phase(Phase::AwaitingStance)?;
        self.phase = Phase::AwaitingTopic;
        Ok(())
    }

    /// Declares the stance and prepares the opening exchange.
    ///
    /// The stance is appended as the first user turn before anything is sent,
    /// and the session stays busy until the returned exchange is completed.
    pub fn start_debate(&mut self, stance: &str) -> Result<PendingExchange, SessionError> {
        self.ensure_idle()?;
        self.ensure_phase(Phase::AwaitingStance)?;
        require_text(stance, "stance")?;

        self.initial_stance = stance.to_string();
        self.transcript.append(Turn::user(stance));
        self.busy = true;
        self.phase = Phase::Active;
        tracing::info!("Debate started on {}", self.topic);

        Ok(PendingExchange::new(
            ExchangeKind::Opening,
            self.epoch,
            exchange::opening_request(self.topic.as_str(), stance),
        ))
    }

    /// Appends the user's turn (optimistically) and prepares a follow-up exchange.
    pub fn send_turn(&mut self, text: &str) -> Result<PendingExchange, SessionError> {
        self.ensure_idle()?;
        self.ensure_phase(Phase::Active)?;
        require_text(text, "message")?;

        let transcript_so_far = self.transcript.snapshot();
        let turn = Turn::user(text);
        self.transcript.append(turn.clone());
        self.busy = true;

        Ok(PendingExchange::new(
            ExchangeKind::FollowUp,
            self.epoch,
            exchange::follow_up_request(
                self.topic.as_str(),
                &self.initial_stance,
                &transcript_so_far,
                turn,
            ),
        ))
    }

    /// Folds an exchange outcome back into the transcript and clears the busy flag.
    ///
    /// Returns the appended assistant turn, or `None` when the session was
    /// reset while the exchange was in flight.
    pub fn complete(
        &mut self,
        pending: PendingExchange,
        outcome: Result<String, ExchangeError>,
    ) -> Option<Turn> {
        if pending.epoch() != self.epoch || !self.busy {
            tracing::debug!("Dropping reply for an exchange this session is not waiting on");
            return None;
        }

        let turn = exchange::reconcile(pending.kind(), outcome);
        self.transcript.append(turn.clone());
        self.busy = false;
        Some(turn)
    }

    /// Back to a fresh session. Allowed in every state, including while busy.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.topic = Topic::default();
        self.initial_stance.clear();
        self.busy = false;
        self.phase = Phase::AwaitingTopic;
        self.epoch = next_epoch();
        tracing::info!("Session reset");
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}

fn require_text(text: &str, field: &'static str) -> Result<(), SessionError> {
    if text.trim().is_empty() {
        return Err(SessionError::EmptyInput(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{FOLLOW_UP_FAILURE_TEXT, INITIAL_FAILURE_TEXT};

    fn network_error() -> Result<String, ExchangeError> {
        Err(ExchangeError::NetworkFailure("connection refused".to_string()))
    }

    // A session in the Active phase with one completed round.
    fn active_session() -> DebateSession {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();
        let pending = session.start_debate("Markets solve this").unwrap();
        session.complete(pending, Ok("I disagree because...".to_string()));
        session
    }

    fn assert_fresh(session: &DebateSession) {
        assert_eq!(session.phase(), Phase::AwaitingTopic);
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
        assert!(session.topic().is_none());
        assert_eq!(session.initial_stance(), "");
    }

    #[test]
    fn test_opening_exchange_success() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();
        assert_eq!(session.phase(), Phase::AwaitingStance);

        let pending = session.start_debate("Markets solve this").unwrap();

        // The user's turn is visible before the responder answers.
        assert!(session.is_busy());
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.snapshot(), vec![Turn::user("Markets solve this")]);
        assert_eq!(pending.kind(), ExchangeKind::Opening);
        assert!(pending.request().history().is_empty());
        assert_eq!(pending.request().topic(), "Climate Policy");

        let reply = session.complete(pending, Ok("I disagree because...".to_string()));

        assert_eq!(reply, Some(Turn::assistant("I disagree because...")));
        assert_eq!(
            session.snapshot(),
            vec![
                Turn::user("Markets solve this"),
                Turn::assistant("I disagree because..."),
            ]
        );
        assert!(!session.is_busy());
        assert_eq!(session.phase(), Phase::Active);
    }

    #[test]
    fn test_opening_exchange_network_failure() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();
        let pending = session.start_debate("Markets solve this").unwrap();

        session.complete(pending, network_error());

        assert_eq!(
            session.snapshot(),
            vec![
                Turn::user("Markets solve this"),
                Turn::assistant(INITIAL_FAILURE_TEXT),
            ]
        );
        assert!(!session.is_busy());
    }

    #[test]
    fn test_follow_up_exchange_grows_transcript() {
        let mut session = active_session();

        let pending = session.send_turn("Rebuttal text").unwrap();
        assert_eq!(pending.kind(), ExchangeKind::FollowUp);
        assert_eq!(pending.request().history().len(), 3);
        assert_eq!(pending.request().initial_viewpoint(), "Markets solve this");

        session.complete(pending, Ok("Counter".to_string()));

        let turns = session.snapshot();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[2], Turn::user("Rebuttal text"));
        assert_eq!(turns[3], Turn::assistant("Counter"));
        assert_eq!(session.round(), 2);
    }

    #[test]
    fn test_optimistic_user_turn_survives_failure() {
        let mut session = active_session();

        let pending = session.send_turn("Rebuttal text").unwrap();
        session.complete(pending, network_error());

        let turns = session.snapshot();
        assert_eq!(turns[2], Turn::user("Rebuttal text"));
        assert_eq!(turns[3], Turn::assistant(FOLLOW_UP_FAILURE_TEXT));
        assert!(!session.is_busy());

        // The user can resend right away.
        assert!(session.send_turn("Rebuttal text").is_ok());
    }

    #[test]
    fn test_empty_own_topic_is_rejected() {
        let mut session = DebateSession::new();

        assert_eq!(
            session.enter_own_topic(""),
            Err(SessionError::EmptyInput("topic"))
        );
        assert_eq!(
            session.enter_own_topic("   "),
            Err(SessionError::EmptyInput("topic"))
        );
        assert_fresh(&session);

        session.enter_own_topic("Is math discovered?").unwrap();
        assert_eq!(session.phase(), Phase::AwaitingStance);
        assert_eq!(session.topic(), Some(&Topic::from("Is math discovered?")));
    }

    #[test]
    fn test_empty_stance_is_rejected() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();

        assert!(matches!(
            session.start_debate("  "),
            Err(SessionError::EmptyInput("stance"))
        ));
        assert_eq!(session.phase(), Phase::AwaitingStance);
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_go_back_keeps_topic() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();

        session.go_back().unwrap();

        assert_eq!(session.phase(), Phase::AwaitingTopic);
        assert_eq!(session.topic(), Some(&Topic::from("Climate Policy")));
        session.select_topic("Free Will").unwrap();
        assert_eq!(session.topic(), Some(&Topic::from("Free Will")));
    }

    #[test]
    fn test_transitions_outside_their_phase_are_rejected() {
        let mut session = DebateSession::new();

        assert_eq!(
            session.go_back(),
            Err(SessionError::InvalidPhase {
                expected: Phase::AwaitingStance,
                actual: Phase::AwaitingTopic,
            })
        );
        assert!(session.start_debate("stance").is_err());
        assert!(session.send_turn("hello").is_err());
        assert_fresh(&session);

        let mut session = active_session();
        assert!(session.select_topic("Other").is_err());
        assert!(session.go_back().is_err());
        assert!(session.start_debate("again").is_err());
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn test_busy_session_refuses_everything_but_reset() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();
        let _pending = session.start_debate("Markets solve this").unwrap();

        assert_eq!(session.start_debate("again").unwrap_err(), SessionError::Busy);
        assert_eq!(session.send_turn("more").unwrap_err(), SessionError::Busy);
        assert_eq!(session.select_topic("Other").unwrap_err(), SessionError::Busy);
        assert_eq!(session.go_back().unwrap_err(), SessionError::Busy);
        assert_eq!(session.transcript().len(), 1);

        session.reset();
        assert_fresh(&session);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut session = DebateSession::new();
        session.reset();
        assert_fresh(&session);

        session.select_topic("Climate Policy").unwrap();
        session.reset();
        assert_fresh(&session);

        let mut session = active_session();
        session.reset();
        assert_fresh(&session);
    }

    #[test]
    fn test_reply_after_reset_is_dropped() {
        let mut session = DebateSession::new();
        session.select_topic("Climate Policy").unwrap();
        let pending = session.start_debate("Markets solve this").unwrap();

        session.reset();
        session.select_topic("Free Will").unwrap();

        assert_eq!(
            session.complete(pending, Ok("I disagree because...".to_string())),
            None
        );
        assert!(session.transcript().is_empty());
        assert_eq!(session.phase(), Phase::AwaitingStance);
    }

    #[test]
    fn test_reply_from_another_session_is_dropped() {
        let mut first = DebateSession::new();
        first.select_topic("Climate Policy").unwrap();
        let pending = first.start_debate("Markets solve this").unwrap();

        let mut second = DebateSession::new();
        assert_eq!(
            second.complete(pending, Ok("I disagree because...".to_string())),
            None
        );
        assert!(second.transcript().is_empty());
        assert_eq!(second.phase(), Phase::AwaitingTopic);
        assert!(first.is_busy());
    }

    #[test]
    fn test_each_exchange_appends_one_assistant_turn() {
        let mut session = active_session();
        let outcomes = [
            Ok("Counter".to_string()),
            network_error(),
            Err(ExchangeError::RemoteFailure {
                status: Some(500),
                detail: "boom".to_string(),
            }),
            Ok("Another counter".to_string()),
        ];

        for (i, outcome) in outcomes.into_iter().enumerate() {
            let before = session.transcript().len();
            let pending = session.send_turn(&format!("point {i}")).unwrap();
            session.complete(pending, outcome);

            assert_eq!(session.transcript().len(), before + 2);
            assert!(session.transcript().last().is_some_and(|t| !t.is_user()));
            assert!(!session.is_busy());
        }
    }
}
