use crate::client::ClientError;
use crate::client::config::Config;
use reqwest::Url;

pub fn build_url(config: &Config, path: &str) -> Result<Url, ClientError> {
    let raw = format!("{}{}", config.base_url(), path);
    Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
}
