mod client;

pub use debate_types as types;
pub use client::config::{Config, ConfigBuilder};
pub use client::{Client, ClientError, Stats, connect, connect_with_config};
