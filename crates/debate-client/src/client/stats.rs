/// Counters for the requests issued by one [`Client`](crate::Client).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stats {
    topic_fetches: u32,
    exchanges: u32,
    failed_exchanges: u32,
}

impl Stats {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_topic_fetch(&mut self) {
        self.topic_fetches += 1;
    }

    pub(crate) fn record_exchange(&mut self, succeeded: bool) {
        self.exchanges += 1;
        if !succeeded {
            self.failed_exchanges += 1;
        }
    }

    pub fn topic_fetches(&self) -> u32 {
        self.topic_fetches
    }

    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    pub fn failed_exchanges(&self) -> u32 {
        self.failed_exchanges
    }
}
