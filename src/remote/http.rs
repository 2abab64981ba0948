use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use super::{RawResponse, Transport};
use crate::error::{CheckError, Result};

const AUTH_KEY_HEADER: &str = "x-auth-key";

/// Authenticated JSON client for the grading service.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(token: &str, basic_secret: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut key = HeaderValue::from_str(token)
            .map_err(|_| CheckError::Credentials("token contains invalid characters".into()))?;
        key.set_sensitive(true);
        headers.insert(AUTH_KEY_HEADER, key);

        let mut basic = HeaderValue::from_str(&format!("Basic {basic_secret}"))
            .map_err(|_| CheckError::Credentials("secret contains invalid characters".into()))?;
        basic.set_sensitive(true);
        headers.insert(AUTHORIZATION, basic);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(CheckError::HttpClient)?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse> {
        debug!(url, "POST");
        let transport_err = |source| CheckError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(transport_err)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_err)?;

        debug!(url, status, "response");
        Ok(RawResponse { status, body })
    }
}
