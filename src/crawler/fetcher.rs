//! HTTP fetcher implementation
//!
//! This module owns the HTTP side of a single fetch attempt:
//! - building the shared client (timeouts, user agent, redirects disabled)
//! - issuing one GET and classifying what came back
//!
//! Classification, not error handling, is the point: the worker decides
//! what is retried, so every attempt collapses into a [`FetchOutcome`]
//! rather than an error type. Redirects are disabled on the client; a
//! redirect status is reported as-is and treated upstream as a
//! non-retryable anomaly.

use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;

/// Which stage of the request a network failure occurred in.
///
/// Each of these counts as one failed attempt; the distinction only feeds
/// the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Could not establish a connection
    Connect,
    /// The request exceeded the configured timeout
    Timeout,
    /// The request failed after connecting, before a response arrived
    Send,
    /// The response body could not be read to completion
    Read,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkErrorKind::Connect => "connect",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Send => "send",
            NetworkErrorKind::Read => "read",
        };
        f.write_str(name)
    }
}

/// Result of one fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// Got a success response with a complete body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, empty if absent
        content_type: String,
        /// Complete response body
        body: Vec<u8>,
    },

    /// The server answered with a redirect (not followed)
    Redirect {
        /// HTTP status code
        status_code: u16,
        /// Location header, if present
        location: Option<String>,
    },

    /// A non-success, non-redirect status
    HttpStatus {
        /// HTTP status code
        status_code: u16,
    },

    /// The request failed at the network level
    Network {
        /// Stage the failure occurred in
        kind: NetworkErrorKind,
        /// Error description
        detail: String,
    },
}

/// Builds the HTTP client shared by all fetch workers.
///
/// Redirects are handled nowhere: the endpoint is not supposed to issue
/// them, and following one silently would mask a configuration problem.
pub fn build_http_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("aquatrans/", env!("CARGO_PKG_VERSION")))
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues one GET and classifies the result.
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchOutcome::Network {
                kind: classify_request_error(&e),
                detail: e.to_string(),
            }
        }
    };

    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        return FetchOutcome::Redirect {
            status_code: status.as_u16(),
            location,
        };
    }

    if !status.is_success() {
        return FetchOutcome::HttpStatus {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.bytes().await {
        Ok(body) => FetchOutcome::Success {
            status_code: status.as_u16(),
            content_type,
            body: body.to_vec(),
        },
        Err(e) => FetchOutcome::Network {
            kind: NetworkErrorKind::Read,
            detail: e.to_string(),
        },
    }
}

fn classify_request_error(error: &reqwest::Error) -> NetworkErrorKind {
    if error.is_timeout() {
        NetworkErrorKind::Timeout
    } else if error.is_connect() {
        NetworkErrorKind::Connect
    } else {
        NetworkErrorKind::Send
    }
}
