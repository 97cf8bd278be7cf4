use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};

use super::ImageLoader;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to load image {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("image {url} responded with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} is not an image (content type {content_type:?})")]
    NotAnImage {
        url: String,
        content_type: Option<String>,
    },
}

/// Fetches the full image body so it is cached before being displayed.
#[derive(Debug, Clone, Default)]
pub struct HttpImageLoader {
    http: Client,
}

impl HttpImageLoader {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn preload(&self, url: &str) -> Result<(), ImageError> {
        let transport = |source| ImageError::Transport {
            url: url.to_string(),
            source,
        };

        let res = self.http.get(url).send().await.map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                url: url.to_string(),
                status,
            });
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if !content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
        {
            return Err(ImageError::NotAnImage {
                url: url.to_string(),
                content_type,
            });
        }

        let bytes = res.bytes().await.map_err(transport)?;
        tracing::debug!(url, size = bytes.len(), "image preloaded");
        Ok(())
    }
}
