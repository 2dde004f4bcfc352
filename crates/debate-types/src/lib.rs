//now people using the types library can use these types
pub mod exchange;
pub mod topics;
mod content;

//re-export types for easier access
pub use content::turn::{Speaker, Turn};
pub use exchange::{DebateRequest, DebateResponse};
pub use topics::{DEFAULT_TOPICS, SuggestedTopics};
