//! Minimal blocking client for the W3C WebDriver wire protocol.
//!
//! Only the handful of endpoints the driving session needs: session
//! create/delete, navigation, element lookup, click/clear/type, and reads of
//! text, the `value` property, and visibility. JSON over HTTP against a
//! chromedriver-compatible endpoint.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Key under which the wire protocol nests element ids.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Error)]
pub enum WdError {
    #[error("webdriver request failed: {0}")]
    Http(String),
    /// The remote end answered with a protocol error payload.
    #[error("webdriver error `{error}`: {message}")]
    Remote { error: String, message: String },
    #[error("unexpected webdriver response: {0}")]
    Decode(String),
}

impl WdError {
    /// Element lookups report absence as a protocol error; callers polling
    /// for an element treat this one as "not yet".
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, WdError::Remote { error, .. } if error == "no such element")
    }
}

/// Opaque element handle returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(String);

/// Element lookup strategies the crate uses.
#[derive(Debug, Clone, Copy)]
pub enum Locator<'a> {
    Css(&'a str),
    XPath(&'a str),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct RemoteError {
    error: String,
    message: String,
}

pub struct WdClient {
    http: Client,
    base: String,
    session_id: String,
}

impl WdClient {
    /// Open a new browser session against `endpoint` (e.g. chromedriver).
    pub fn new_session(endpoint: &str, headless: bool) -> Result<Self, WdError> {
        let mut chrome_args = vec!["--disable-gpu"];
        if headless {
            chrome_args.push("--headless=new");
        }
        let caps = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": chrome_args }
                }
            }
        });

        let http = Client::new();
        let base = endpoint.trim_end_matches('/').to_string();
        let value = Self::check(http.post(format!("{base}/session")).json(&caps).send())?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WdError::Decode("new-session response carried no sessionId".into()))?
            .to_string();

        Ok(Self {
            http,
            base,
            session_id,
        })
    }

    pub fn navigate(&self, url: &str) -> Result<(), WdError> {
        self.post("/url", &json!({ "url": url })).map(drop)
    }

    pub fn find(&self, locator: Locator) -> Result<ElementRef, WdError> {
        let (using, value) = match locator {
            Locator::Css(selector) => ("css selector", selector),
            Locator::XPath(xpath) => ("xpath", xpath),
        };
        let body = self.post("/element", &json!({ "using": using, "value": value }))?;
        body.get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementRef(id.to_string()))
            .ok_or_else(|| WdError::Decode("element response carried no element id".into()))
    }

    pub fn click(&self, el: &ElementRef) -> Result<(), WdError> {
        self.post(&format!("/element/{}/click", el.0), &json!({}))
            .map(drop)
    }

    pub fn clear(&self, el: &ElementRef) -> Result<(), WdError> {
        self.post(&format!("/element/{}/clear", el.0), &json!({}))
            .map(drop)
    }

    pub fn send_keys(&self, el: &ElementRef, text: &str) -> Result<(), WdError> {
        self.post(&format!("/element/{}/value", el.0), &json!({ "text": text }))
            .map(drop)
    }

    pub fn text(&self, el: &ElementRef) -> Result<String, WdError> {
        let value = self.get(&format!("/element/{}/text", el.0))?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| WdError::Decode("element text was not a string".into()))
    }

    /// Current value of an `<input>`, as the page holds it right now.
    pub fn value_property(&self, el: &ElementRef) -> Result<String, WdError> {
        let value = self.get(&format!("/element/{}/property/value", el.0))?;
        Ok(match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    pub fn displayed(&self, el: &ElementRef) -> Result<bool, WdError> {
        let value = self.get(&format!("/element/{}/displayed", el.0))?;
        value
            .as_bool()
            .ok_or_else(|| WdError::Decode("displayed response was not a boolean".into()))
    }

    /// End the session. Consumes the client; the browser is gone afterwards.
    pub fn quit(self) -> Result<(), WdError> {
        Self::check(self.http.delete(self.url("")).send()).map(drop)
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/session/{}{}", self.base, self.session_id, tail)
    }

    fn post(&self, tail: &str, body: &Value) -> Result<Value, WdError> {
        Self::check(self.http.post(self.url(tail)).json(body).send())
    }

    fn get(&self, tail: &str) -> Result<Value, WdError> {
        Self::check(self.http.get(self.url(tail)).send())
    }

    fn check(sent: reqwest::Result<reqwest::blocking::Response>) -> Result<Value, WdError> {
        let resp = sent.map_err(|e| WdError::Http(e.to_string()))?;
        let ok = resp.status().is_success();
        let body: Value = resp.json().map_err(|e| WdError::Decode(e.to_string()))?;
        Self::interpret(ok, body)
    }

    /// Unwrap the `{"value": ...}` envelope, mapping error payloads.
    fn interpret(ok: bool, body: Value) -> Result<Value, WdError> {
        if !ok {
            return Err(match serde_json::from_value::<Envelope<RemoteError>>(body.clone()) {
                Ok(env) => WdError::Remote {
                    error: env.value.error,
                    message: env.value.message,
                },
                Err(_) => WdError::Decode(format!("error response without payload: {body}")),
            });
        }
        serde_json::from_value::<Envelope<Value>>(body)
            .map(|env| env.value)
            .map_err(|e| WdError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_unwraps_value() {
        let body: Value = serde_json::from_str(r#"{"value": {"sessionId": "abc"}}"#).unwrap();
        let value = WdClient::interpret(true, body).unwrap();
        assert_eq!(value.get("sessionId").and_then(Value::as_str), Some("abc"));
    }

    #[test]
    fn error_envelope_maps_to_remote_error() {
        let body: Value = serde_json::from_str(
            r#"{"value": {"error": "no such element", "message": "not found", "stacktrace": ""}}"#,
        )
        .unwrap();
        let err = WdClient::interpret(false, body).unwrap_err();
        assert!(err.is_no_such_element(), "{err}");
    }

    #[test]
    fn malformed_error_body_is_a_decode_error() {
        let body: Value = serde_json::from_str(r#"{"unexpected": true}"#).unwrap();
        let err = WdClient::interpret(false, body).unwrap_err();
        assert!(matches!(err, WdError::Decode(_)), "{err}");
    }

    #[test]
    fn other_remote_errors_are_not_no_such_element() {
        let body: Value = serde_json::from_str(
            r#"{"value": {"error": "stale element reference", "message": "gone"}}"#,
        )
        .unwrap();
        let err = WdClient::interpret(false, body).unwrap_err();
        assert!(!err.is_no_such_element());
        assert!(matches!(err, WdError::Remote { .. }));
    }
}
