use std::future::Future;

use anyhow::Context;
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Client, Method,
};
use url::Url;

use crate::error::Result;
use crate::sign::{KEY_HEADER, SIGN_HEADER};

pub const DEFAULT_API_URL: &str = "https://no23.lavina.tech";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub key: String,
    pub sign: String,
}

/// A fully prepared request. `body` is sent verbatim, it is the same string
/// the signature was computed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    pub auth: Option<AuthHeaders>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("bookshelf/", env!("CARGO_PKG_VERSION"))),
        );

        // Url::join drops the last path segment unless it ends with a slash
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            client: Client::builder().default_headers(headers).build()?,
            base_url: base_url
                .parse()
                .with_context(|| format!("invalid base url: {}", base_url))?,
        })
    }

    fn make_url(&self, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid endpoint: {}", path))?)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.make_url(&request.path)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);
        if let Some(auth) = &request.auth {
            builder = builder
                .header(KEY_HEADER, &auth.key)
                .header(SIGN_HEADER, &auth.sign);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("<- {} ({} bytes)", status, body.len());

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses and records every request it is handed.
    #[derive(Default)]
    pub(crate) struct StubTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl StubTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(ApiResponse {
                status,
                body: body.to_string(),
            });
            self
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for StubTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push(request);
            let response = self.responses.lock().unwrap().pop_front();
            Ok(response.expect("stub transport ran out of responses"))
        }
    }
}
