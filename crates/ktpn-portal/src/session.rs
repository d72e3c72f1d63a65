//! Cookie-bearing HTTP session scoped to one lookup attempt.
//!
//! The portal binds the CAPTCHA it serves to a server-side session, so the
//! CAPTCHA fetch, the form submission and the result page fetch must all go
//! through the same [`Session`]. A session is never reused across attempts.

use crate::error::{PortalError, Result};
use ktpn_core::HttpConfig;
use reqwest::cookie::Jar;
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// An HTTP client bound to a private cookie jar.
pub struct Session {
    client: Client,
    cookies: Arc<Jar>,
}

impl Session {
    /// Create a session with an empty cookie store.
    ///
    /// # Errors
    /// Returns [`PortalError::SessionInit`] if the client cannot be built.
    pub fn create(config: &HttpConfig) -> Result<Self> {
        let cookies = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .user_agent(config.user_agent.clone());
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        let client = builder.build().map_err(PortalError::SessionInit)?;
        Ok(Self { client, cookies })
    }

    /// GET a URL and return the body bytes of a 200 response.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        read_ok_body(url, response).await
    }

    /// POST a URL-encoded form and return the body bytes of a 200 response.
    ///
    /// The request carries `Content-Type: application/x-www-form-urlencoded`.
    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Vec<u8>> {
        tracing::debug!("POST {} ({} fields)", url, fields.len());
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        read_ok_body(url, response).await
    }

    /// Cookies the session would send to `url`, as a `Cookie` header value.
    #[must_use]
    pub fn cookie_header(&self, url: &reqwest::Url) -> Option<String> {
        use reqwest::cookie::CookieStore;

        self.cookies
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

fn transport(url: &str, source: reqwest::Error) -> PortalError {
    PortalError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn read_ok_body(url: &str, response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(PortalError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| transport(url, source))?;
    Ok(body.to_vec())
}
