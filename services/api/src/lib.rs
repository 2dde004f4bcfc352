pub mod completion;
pub mod config;
pub mod context;
pub mod prompts;
pub mod routes;
