pub mod config;
pub mod factory;
pub mod karaoke;

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::error::{normalize, ApiError, HttpResponse, Payload, RawOutcome};
use crate::api::MIME_JSON;

/// Stateless HTTP client for the karaoke backend. It never looks at the session:
/// authenticated calls get their token passed in.
#[derive(Debug, Clone)]
pub struct RequestClient {
    url: String,
    client: reqwest::Client,
}

pub struct RequestClientBuilder {
    url: String,
    accept_invalid_certs: bool,
}

/// Per-call request description. Headers given here replace the JSON defaults
/// with the same name.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_query(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }
}

impl RequestClient {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let (_, payload) = self.send(path, options, None).await?;
        Ok(payload)
    }

    pub async fn request_json<T>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let (status, payload) = self.send(path, options, None).await?;
        payload.decode(status)
    }

    /// Same as [`RequestClient::request`], with `Authorization: Bearer <token>`.
    /// An empty token is sent without the header, checking the session first is
    /// up to the caller.
    pub async fn request_auth(
        &self,
        path: &str,
        token: &str,
        options: RequestOptions,
    ) -> Result<Payload, ApiError> {
        let (_, payload) = self.send(path, options, Some(token)).await?;
        Ok(payload)
    }

    pub async fn request_auth_json<T>(
        &self,
        path: &str,
        token: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let (status, payload) = self.send(path, options, Some(token)).await?;
        payload.decode(status)
    }

    async fn send(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<(Option<u16>, Payload), ApiError> {
        let req = self.build_request(path, options, token)?;
        let outcome = self.execute(req).await;
        let status = outcome.status();
        let payload = settle(outcome)?;
        Ok((status, payload))
    }

    pub fn build_request(
        &self,
        path: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> Result<reqwest::Request, ApiError> {
        let url = format!("{}{}", self.url, path);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
        for (name, value) in options.headers.iter() {
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(name) => name,
                Err(_) => return Err(ApiError::new(format!("Invalid header name '{name}'"))),
            };
            let value = match HeaderValue::from_str(value) {
                Ok(value) => value,
                Err(_) => return Err(ApiError::new(format!("Invalid value for header '{name}'"))),
            };
            headers.insert(name, value);
        }

        if let Some(token) = token {
            if token.is_empty() {
                warn!("Authenticated request to {path} without token, sending it anonymously");
            } else {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(value) => {
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(_) => return Err(ApiError::new("Session token is not a valid header")),
                }
            }
        }

        let mut req = self.client.request(options.method, &url).headers(headers);
        if !options.query.is_empty() {
            req = req.query(&options.query);
        }
        if let Some(body) = options.body {
            req = req.body(body.to_string());
        }

        match req.build() {
            Ok(req) => Ok(req),
            Err(e) => Err(ApiError::new(format!("Build request failed: {e}"))),
        }
    }

    async fn execute(&self, req: reqwest::Request) -> RawOutcome {
        debug!("Request server: {} {}", req.method(), req.url());
        let resp = match self.client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => {
                debug!("Send request failed: {e}");
                return RawOutcome::NetworkFailure(network_message(&e));
            }
        };

        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        match resp.text().await {
            Ok(body) => {
                debug!("Server responded {status}, body size {}", body.len());
                RawOutcome::Response(HttpResponse {
                    status: status.as_u16(),
                    status_text,
                    body,
                })
            }
            Err(e) => {
                debug!("Read response body failed: {e}");
                RawOutcome::NetworkFailure(String::from(
                    "Network error: connection lost while reading the response",
                ))
            }
        }
    }
}

/// User facing text for a transport failure. The reqwest error carries the full
/// url and is only logged.
fn network_message(err: &reqwest::Error) -> String {
    let reason = if err.is_timeout() {
        "the server took too long to answer"
    } else if err.is_connect() {
        "could not connect to the server"
    } else {
        "the request could not be sent"
    };
    format!("Network error: {reason}")
}

/// Percent-encodes `segment` so it stays one path segment of the url: `/`, `?` and
/// `#` cannot leak into the path, query or fragment. Dot segments are refused.
pub fn encode_segment(segment: &str) -> Result<String, ApiError> {
    if matches!(segment, "" | "." | "..") {
        return Err(ApiError::new(format!("Invalid path segment '{segment}'")));
    }
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(e) => return Err(ApiError::new(format!("Encode path segment failed: {e}"))),
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().push(segment);
        }
        Err(_) => return Err(ApiError::new("Encode path segment failed")),
    }
    Ok(url.path().trim_start_matches('/').to_string())
}

/// `204 No Content` is a success with an empty object, whatever the body says.
/// Everything else goes through [`normalize`].
pub fn settle(outcome: RawOutcome) -> Result<Payload, ApiError> {
    if let RawOutcome::Response(ref resp) = outcome {
        if resp.status == 204 {
            return Ok(Payload::empty());
        }
    }
    normalize(outcome)
}

impl RequestClientBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            accept_invalid_certs: false,
        }
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<RequestClient> {
        let parsed = match Url::parse(&self.url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{}'", self.url),
        };

        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        if parsed.query().is_some() {
            bail!("invalid server url, query is not allowed: '{}'", self.url);
        }

        let client = if self.accept_invalid_certs && parsed.scheme() == "https" {
            reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .context("build https client")?
        } else {
            reqwest::Client::new()
        };

        Ok(RequestClient {
            url: self.url,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn build_client() -> RequestClient {
        RequestClientBuilder::new("http://127.0.0.1:8080/api/")
            .build()
            .unwrap()
    }

    fn header<'a>(req: &'a reqwest::Request, name: &str) -> Option<&'a str> {
        req.headers().get(name).and_then(|value| value.to_str().ok())
    }

    #[test]
    fn test_builder() {
        assert_eq!(build_client().url(), "http://127.0.0.1:8080/api");
        assert!(RequestClientBuilder::new("ftp://example.com").build().is_err());
        assert!(RequestClientBuilder::new("not a url").build().is_err());
        assert!(RequestClientBuilder::new("http://example.com/?a=1")
            .build()
            .is_err());
    }

    #[test]
    fn test_default_headers() {
        let client = build_client();
        let req = client
            .build_request(
                "/songs",
                RequestOptions::get().with_query("search", "queen bee"),
                None,
            )
            .unwrap();

        assert_eq!(*req.method(), Method::GET);
        assert_eq!(
            req.url().as_str(),
            "http://127.0.0.1:8080/api/songs?search=queen+bee"
        );
        assert_eq!(header(&req, "content-type"), Some(MIME_JSON));
        assert_eq!(header(&req, "accept"), Some(MIME_JSON));
        assert_eq!(header(&req, "authorization"), None);
        assert!(req.body().is_none());
    }

    #[test]
    fn test_header_override() {
        let client = build_client();
        let req = client
            .build_request(
                "/version",
                RequestOptions::get()
                    .with_header("accept", "text/plain")
                    .with_header("X-Venue", "7"),
                None,
            )
            .unwrap();
        let accepts: Vec<_> = req.headers().get_all(ACCEPT).iter().collect();
        assert_eq!(accepts, vec!["text/plain"]);
        assert_eq!(header(&req, "x-venue"), Some("7"));
        assert_eq!(header(&req, "content-type"), Some(MIME_JSON));

        let result = client.build_request(
            "/version",
            RequestOptions::get().with_header("bad header", "x"),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bearer_token() {
        let client = build_client();
        let req = client
            .build_request("/favorites", RequestOptions::get(), Some("abc"))
            .unwrap();
        assert_eq!(header(&req, "authorization"), Some("Bearer abc"));

        // Empty token: no header, no error.
        let req = client
            .build_request("/favorites", RequestOptions::get(), Some(""))
            .unwrap();
        assert_eq!(header(&req, "authorization"), None);

        assert!(client
            .build_request("/favorites", RequestOptions::get(), Some("bad\ntoken"))
            .is_err());
    }

    #[test]
    fn test_json_body() {
        let client = build_client();
        let req = client
            .build_request(
                "/favorites",
                RequestOptions::post(json!({"songId": 3})),
                Some("abc"),
            )
            .unwrap();
        assert_eq!(*req.method(), Method::POST);
        let body = req.body().and_then(|body| body.as_bytes()).unwrap();
        assert_eq!(body, br#"{"songId":3}"#);
    }

    #[test]
    fn test_settle_no_content() {
        for body in ["", "not json at all", r#"{"error":true,"errorString":"x"}"#] {
            let outcome = RawOutcome::Response(HttpResponse {
                status: 204,
                status_text: String::from("No Content"),
                body: body.to_string(),
            });
            assert_eq!(settle(outcome).unwrap(), Payload::Json(json!({})));
        }

        let outcome = RawOutcome::Response(HttpResponse {
            status: 200,
            status_text: String::from("OK"),
            body: String::from("pong"),
        });
        assert_eq!(settle(outcome).unwrap(), Payload::Text(String::from("pong")));

        let outcome = RawOutcome::NetworkFailure(String::from("Network error: refused"));
        assert_eq!(settle(outcome).unwrap_err().status, None);
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("42").unwrap(), "42");
        assert_eq!(encode_segment("song-7_b").unwrap(), "song-7_b");

        let client = build_client();
        for id in ["a/b?x=1#frag", "../songs/9", "%2e%2e"] {
            let path = format!("/favorites/{}", encode_segment(id).unwrap());
            let req = client
                .build_request(&path, RequestOptions::delete(), Some("abc"))
                .unwrap();
            let url = req.url();
            assert_eq!(url.query(), None, "{id}");
            assert_eq!(url.fragment(), None, "{id}");
            let segments: Vec<_> = url.path_segments().unwrap().collect();
            assert_eq!(segments.len(), 3, "{id}: {url}");
            assert_eq!(segments[..2], ["api", "favorites"], "{id}");
        }

        for id in ["", ".", ".."] {
            assert!(encode_segment(id).is_err());
        }
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) is closed on any sane test machine.
        let client = RequestClientBuilder::new("http://127.0.0.1:9")
            .build()
            .unwrap();
        let err = client
            .request("/songs", RequestOptions::get())
            .await
            .unwrap_err();
        assert_eq!(err.status, None);
        assert_eq!(err.message, "Network error: could not connect to the server");
        assert!(!err.message.contains("127.0.0.1"));
    }
}
