use reqwest::{Response, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ApiErrorObject, TransportError};

const API_PREFIX: &str = "api/v0.1";

/// Settings used when the transport builds its own HTTP client.
#[derive(Clone, Debug, Default)]
pub struct TransportConfig {
    /// Timeout applied to every request. Unbounded when unset.
    pub timeout: Option<Duration>,

    /// Timeout for the connect phase only.
    pub connect_timeout: Option<Duration>,

    /// The `User-Agent` header to send.
    pub user_agent: Option<String>,
}

impl TransportConfig {
    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.build()
    }
}

/// The body of a successful response, kept exactly as received.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseBody(Vec<u8>);

impl ResponseBody {
    /// The raw body bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.0).map_err(TransportError::Decode)
    }
}

/// Sends JSON POST requests to a subscription provider.
///
/// The HTTP client can be supplied by the caller through [`Transport::with_client`], which
/// allows sharing a client across transports or pointing it at a test server.
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
    address: String,
}

impl Transport {
    /// Create a transport with a default HTTP client.
    ///
    /// `address` is used verbatim as the URL prefix and is expected to end with a `/`.
    pub fn new(address: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_config(address, &TransportConfig::default())
    }

    /// Create a transport whose HTTP client is built from `config`.
    pub fn with_config(address: impl Into<String>, config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let client = config.build_client()?;
        Ok(Self::with_client(address, client))
    }

    /// Create a transport that uses the given HTTP client.
    pub fn with_client(address: impl Into<String>, client: reqwest::Client) -> Self {
        Self { client, address: address.into() }
    }

    /// The base address of the provider.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Build the full URL for an API path.
    ///
    /// Slashes are not normalized: the result is always `address + "api/v0.1" + suffix`.
    pub fn endpoint(&self, suffix: &str) -> String {
        let address = &self.address;
        format!("{address}{API_PREFIX}{suffix}")
    }

    /// POST `payload` as JSON to `endpoint`, sending an empty body when there is none.
    ///
    /// A `200 OK` yields the body untouched. Any other status is turned into a
    /// [`TransportError::Api`] if the body carries a non empty `error` string, and into a
    /// [`TransportError::UnexpectedResponse`] otherwise.
    pub async fn request<P>(&self, endpoint: &str, payload: Option<&P>) -> Result<ResponseBody, TransportError>
    where
        P: Serialize + ?Sized,
    {
        let mut request = self.client.post(endpoint);
        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload).map_err(TransportError::Serialize)?;
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }
        debug!("Sending request to {endpoint}");
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> Result<ResponseBody, TransportError> {
        let status = response.status();
        if status == StatusCode::OK {
            let body = response.bytes().await?;
            return Ok(ResponseBody(body.to_vec()));
        }

        let url = response.url().to_string();
        let headers: Map<String, Value> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.to_string(), Value::String(value))
            })
            .collect();
        let body = response.bytes().await?;

        // An empty `error` is not a usable error report.
        match serde_json::from_slice::<ApiErrorObject>(&body) {
            Ok(error) if !error.error.is_empty() => {
                warn!("Provider returned an error for {url}: status={status}, error={}", error.error);
                return Err(TransportError::Api(error));
            }
            _ => {}
        }

        let data = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
        let dump = json!({
            "url": url,
            "status": status.as_u16(),
            "headers": headers,
            "data": data,
        });
        warn!("Provider returned an unrecognized response: {dump}");
        Err(TransportError::UnexpectedResponse { status: status.as_u16(), response: dump.to_string() })
    }
}
