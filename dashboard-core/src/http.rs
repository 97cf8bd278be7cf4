use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// Failure of a single JSON request against one of the public APIs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// HTTP client shared by every service, identifying itself to the public APIs.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send a GET with the given query and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, FetchError> {
    tracing::debug!(url, ?query, "GET");

    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let res = http.get(url).query(query).send().await.map_err(transport)?;

    let status = res.status();
    let body = res.text().await.map_err(transport)?;

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
