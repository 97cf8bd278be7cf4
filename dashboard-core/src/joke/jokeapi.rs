use async_trait::async_trait;
use reqwest::Client;

use crate::{
    http::{FetchError, get_json},
    model::Joke,
};

use super::JokeService;

/// JokeAPI v2, asking for either a one-liner or a setup/delivery pair.
#[derive(Debug, Clone)]
pub struct JokeApiClient {
    http: Client,
    url: String,
}

impl JokeApiClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl JokeService for JokeApiClient {
    async fn random_joke(&self) -> Result<Joke, FetchError> {
        get_json(&self.http, &self.url, &[("type", "single,twopart")]).await
    }
}
