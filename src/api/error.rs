//! Turns every outcome of an HTTP exchange into either a payload or one [`ApiError`].
//!
//! Rules are applied in order:
//!
//! 1. Transport failure: message of the failure, no status.
//! 2. Body is not JSON, status is not 2xx: message from status text or body.
//! 3. Body is not JSON, status is 2xx: the raw text is the payload.
//! 4. JSON body flagged with `"error": true`: error, whatever the status.
//! 5. JSON body without the flag, status is not 2xx: error, best-effort message.
//! 6. Anything else is the JSON payload, verbatim.
//!
//! `204 No Content` never reaches this module, the client settles it first.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The one error shape handed to callers of the request client.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: Option<u16>,
    pub details: Option<Value>,
    pub raw_body: Option<Value>,
}

/// What came back from the transport, before any interpretation.
#[derive(Debug, Clone)]
pub enum RawOutcome {
    NetworkFailure(String),
    Response(HttpResponse),
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl ApiError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            status: None,
            details: None,
            raw_body: None,
        }
    }

    pub fn unstructured(status: u16, message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            status: Some(status),
            details: None,
            raw_body: None,
        }
    }

    pub fn structured(status: u16, body: Value) -> Self {
        let message = lookup_message(&body).unwrap_or_else(|| generic_message(status));
        let details = match body.get("details") {
            Some(Value::Null) | None => None,
            Some(details) => Some(details.clone()),
        };
        Self {
            message,
            status: Some(status),
            details,
            raw_body: Some(body),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl RawOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            RawOutcome::NetworkFailure(_) => None,
            RawOutcome::Response(resp) => Some(resp.status),
        }
    }
}

impl Payload {
    pub fn empty() -> Self {
        Payload::Json(Value::Object(Default::default()))
    }

    /// Decode the payload into the type an endpoint promises. Plain text is offered
    /// as a JSON string, so `String` targets work for text endpoints.
    pub fn decode<T: DeserializeOwned>(self, status: Option<u16>) -> Result<T, ApiError> {
        let value = match self {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        };
        match serde_json::from_value(value.clone()) {
            Ok(data) => Ok(data),
            Err(err) => Err(ApiError {
                message: format!("Unexpected response from server: {err}"),
                status,
                details: None,
                raw_body: Some(value),
            }),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Payload::Text(text) => text,
            Payload::Json(Value::String(text)) => text,
            Payload::Json(value) => value.to_string(),
        }
    }
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn normalize(outcome: RawOutcome) -> Result<Payload, ApiError> {
    let resp = match outcome {
        RawOutcome::NetworkFailure(message) => return Err(ApiError::new(message)),
        RawOutcome::Response(resp) => resp,
    };
    let ok = is_success(resp.status);

    let body: Value = match serde_json::from_str(&resp.body) {
        Ok(body) => body,
        Err(_) if ok => return Ok(Payload::Text(resp.body)),
        Err(_) => {
            let message = unstructured_message(&resp);
            return Err(ApiError::unstructured(resp.status, message));
        }
    };

    let flagged = matches!(body.get("error"), Some(Value::Bool(true)));
    if flagged || !ok {
        return Err(ApiError::structured(resp.status, body));
    }

    Ok(Payload::Json(body))
}

fn unstructured_message(resp: &HttpResponse) -> String {
    let status_text = resp.status_text.trim();
    if !status_text.is_empty() {
        return status_text.to_string();
    }
    let body = resp.body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    generic_message(resp.status)
}

fn lookup_message(body: &Value) -> Option<String> {
    ["errorString", "message"]
        .iter()
        .filter_map(|field| body.get(field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(String::from)
}

fn generic_message(status: u16) -> String {
    format!("API Error: {status}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn response(status: u16, status_text: &str, body: &str) -> RawOutcome {
        RawOutcome::Response(HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_network_failure() {
        let err = normalize(RawOutcome::NetworkFailure(String::from("connection refused")))
            .unwrap_err();
        assert_eq!(err, ApiError::new("connection refused"));
        assert_eq!(err.status, None);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_unparsable_failure() {
        let err = normalize(response(502, "Bad Gateway", "<html>oops</html>")).unwrap_err();
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.status, Some(502));
        assert_eq!(err.details, None);
        assert_eq!(err.raw_body, None);

        let err = normalize(response(500, "", "  database exploded \n")).unwrap_err();
        assert_eq!(err.message, "database exploded");

        let err = normalize(response(500, "", "")).unwrap_err();
        assert_eq!(err.message, "API Error: 500");
    }

    #[test]
    fn test_plain_text_success() {
        let payload = normalize(response(200, "OK", "v1.4.2")).unwrap();
        assert_eq!(payload, Payload::Text(String::from("v1.4.2")));

        let payload = normalize(response(200, "OK", "")).unwrap();
        assert_eq!(payload, Payload::Text(String::new()));
    }

    #[test]
    fn test_flagged_error() {
        let body = json!({
            "error": true,
            "errorString": "Song is already queued",
            "details": {"songId": ["duplicate"]},
        });
        // Flag wins even on 2xx.
        for status in [200, 400] {
            let err = normalize(response(status, "", &body.to_string())).unwrap_err();
            assert_eq!(err.message, "Song is already queued");
            assert_eq!(err.status, Some(status));
            assert_eq!(err.details, Some(json!({"songId": ["duplicate"]})));
            assert_eq!(err.raw_body, Some(body.clone()));
        }

        let err = normalize(response(200, "", r#"{"error":true}"#)).unwrap_err();
        assert_eq!(err.message, "API Error: 200");
        assert_eq!(err.details, None);

        let err =
            normalize(response(400, "", r#"{"error":true,"details":null,"errorString":""}"#))
                .unwrap_err();
        assert_eq!(err.message, "API Error: 400");
        assert_eq!(err.details, None);
    }

    #[test]
    fn test_unflagged_failure() {
        let err = normalize(response(401, "Unauthorized", r#"{"message":"Token expired"}"#))
            .unwrap_err();
        assert_eq!(err.message, "Token expired");
        assert!(err.is_unauthorized());
        assert_eq!(err.raw_body, Some(json!({"message": "Token expired"})));

        let err = normalize(response(404, "Not Found", "[1,2]")).unwrap_err();
        assert_eq!(err.message, "API Error: 404");
        assert!(err.is_not_found());

        // A string error flag is not the boolean flag, but the status still fails.
        let err = normalize(response(500, "", r#"{"error":"boom"}"#)).unwrap_err();
        assert_eq!(err.message, "API Error: 500");
    }

    #[test]
    fn test_json_success() {
        let body = json!({"error": false, "songs": []});
        let payload = normalize(response(200, "OK", &body.to_string())).unwrap();
        assert_eq!(payload, Payload::Json(body));

        let payload = normalize(response(201, "Created", "\"queued\"")).unwrap();
        assert_eq!(payload, Payload::Json(json!("queued")));
    }

    #[test]
    fn test_normalize_is_total() {
        let bodies = [
            r#"{"error":true,"errorString":"bad"}"#,
            r#"{"ok":1}"#,
            "",
            "plain words",
        ];
        for status in [200, 204, 400, 500] {
            for body in bodies {
                let result = normalize(response(status, "", body));
                match result {
                    Ok(_) => assert!(is_success(status), "{status} {body:?}"),
                    Err(err) => {
                        assert_eq!(err.status, Some(status));
                        assert!(!err.message.is_empty());
                    }
                }
            }
        }
        assert!(normalize(RawOutcome::NetworkFailure(String::from("down"))).is_err());
    }

    #[test]
    fn test_decode() {
        let payload = Payload::Json(json!({"token": "abc", "user": {"id": 1, "email": "a@b.com"}}));
        let resp: crate::api::user::LoginResponse = payload.decode(Some(200)).unwrap();
        assert_eq!(resp.token, "abc");

        let text: String = Payload::Text(String::from("hello")).decode(Some(200)).unwrap();
        assert_eq!(text, "hello");

        let err = Payload::Json(json!([1, 2]))
            .decode::<crate::api::user::LoginResponse>(Some(200))
            .unwrap_err();
        assert_eq!(err.status, Some(200));
        assert_eq!(err.raw_body, Some(json!([1, 2])));

        assert_eq!(Payload::empty().into_text(), "{}");
    }
}
