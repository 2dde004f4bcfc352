use crate::error::ExchangeError;
use async_trait::async_trait;
use debate_client::Client;
use debate_types::DebateRequest;
#[cfg(test)]
use mockall::automock;

// The `Responder` trait is the contract with whatever produces rebuttals.
// The session and the exchange protocol only depend on this trait, so unit
// tests can swap in `MockResponder` and the CLI can run against the offline
// responder without a backend.
//
// `#[cfg_attr(test, automock)]` generates the mock only when compiling tests.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Responder: Send + Sync {
    /// Suggested debate topics, fetched once at startup.
    async fn suggested_topics(&self) -> Result<Vec<String>, ExchangeError>;

    /// One exchange: returns the rebuttal text for the request.
    async fn respond(&self, request: &DebateRequest) -> Result<String, ExchangeError>;
}

// The HTTP client talks to the real backend; its transport errors are folded
// into the exchange taxonomy here.
#[async_trait]
impl Responder for Client {
    async fn suggested_topics(&self) -> Result<Vec<String>, ExchangeError> {
        Ok(Client::suggested_topics(self).await?)
    }

    async fn respond(&self, request: &DebateRequest) -> Result<String, ExchangeError> {
        Ok(self.debate(request).await?)
    }
}
