use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url, redirect};
use tracing::{debug, warn};

use crate::error::{Error, Result};

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Shared HTTP client for pulling image bodies, capped at `max_bytes`.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_bytes: usize,
}

impl Fetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent())
            .build()?;

        Ok(Self { client, max_bytes })
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let url = parse_image_url(url)?;
        debug!(%url, "fetching image");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "upstream rejected image fetch");
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(Error::BodyTooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|t| t.to_str().ok())
            .map(|s| s.to_string());

        let capacity = response.content_length().unwrap_or(0) as usize;
        let mut bytes = Vec::with_capacity(capacity.min(self.max_bytes));

        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(Error::BodyTooLarge {
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(%url, size = bytes.len(), "image fetched");

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn parse_image_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}

pub fn user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
