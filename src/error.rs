use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// An error when performing a request against the subscription provider.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or its response could not be read.
    #[error("http: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider reported an application level error.
    #[error("API response error: {0}")]
    Api(ApiErrorObject),

    /// The provider returned a failure response with an unrecognized shape.
    #[error("unknown API error: {response}")]
    UnexpectedResponse {
        /// The response's HTTP status code.
        status: u16,

        /// A JSON dump of the full response.
        response: String,
    },

    /// A successful response body did not match the expected type.
    #[error("decoding response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request payload could not be encoded as JSON.
    #[error("encoding request: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl TransportError {
    /// The structured error reported by the provider, if any.
    pub fn api_error(&self) -> Option<&ApiErrorObject> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// The HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network(e) => e.status().map(|status| status.as_u16()),
            Self::UnexpectedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiErrorObject> for TransportError {
    fn from(e: ApiErrorObject) -> Self {
        Self::Api(e)
    }
}

/// The error payload the provider returns alongside a failure status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorObject {
    /// The error message.
    pub error: String,
}

impl Display for ApiErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}
