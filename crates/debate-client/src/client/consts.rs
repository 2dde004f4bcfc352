pub const BASE_URL: &str = "http://localhost:8001";

pub const SUGGESTED_TOPICS_PATH: &str = "/suggested-topics";
pub const DEBATE_PATH: &str = "/debate";
