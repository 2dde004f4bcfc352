//! Client-side state machine for a turn-based debate against a remote responder.
//!
//! [`DebateSession`] owns the phase, topic, stance, transcript and busy flag;
//! [`DebateController`] shares one session between the UI and the exchanges
//! it runs through a [`Responder`].

pub mod controller;
pub mod error;
pub mod exchange;
pub mod offline;
pub mod responder;
pub mod session_state;
pub mod topic;
pub mod transcript;

pub use controller::DebateController;
pub use error::{ExchangeError, SessionError};
pub use exchange::{ExchangeKind, PendingExchange};
pub use offline::OfflineResponder;
pub use responder::Responder;
pub use session_state::{DebateSession, Phase};
pub use topic::{Topic, TopicCatalog};
pub use transcript::Transcript;

pub use debate_types::{Speaker, Turn};
