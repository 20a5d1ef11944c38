//! WebDriver Bridge - W3C WebDriver wire protocol over HTTP
//!
//! This bridge talks JSON over HTTP to any W3C-compliant automation server
//! using reqwest. The same client serves browser drivers and Appium; the
//! Appium-only commands (`mobile: ...`) travel as execute-script calls.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ElementRef, ErrorCode, Session, WebDriverError, WindowSize};
use crate::interaction::Locator;

#[derive(Debug, Clone)]
pub struct WebDriverClient {
    base_url: String,
    client: reqwest::Client,
}

impl WebDriverClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WebDriverError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebDriverError::Connection {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}", base, path)
    }

    /// Send one command and unwrap the `value` member of the response
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, WebDriverError> {
        let url = self.build_url(path);
        let mut request = self.client.request(method.clone(), &url);

        // POST commands must carry a JSON body, even an empty one
        match body {
            Some(ref body) => request = request.json(body),
            None if method == Method::POST => request = request.json(&json!({})),
            None => {}
        }

        debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                WebDriverError::Timeout
            } else {
                WebDriverError::Connection {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| WebDriverError::InvalidResponse(e.to_string()))?;

        let body: Value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        parse_response(status, body)
    }

    /// Create a session with the given `alwaysMatch` capabilities
    pub async fn new_session(&self, capabilities: Value) -> Result<WireSession, WebDriverError> {
        let value = self
            .send(
                Method::POST,
                "/session",
                Some(json!({ "capabilities": { "alwaysMatch": capabilities } })),
            )
            .await?;

        let session_id = value
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| WebDriverError::InvalidResponse("No session ID returned".to_string()))?
            .to_string();

        info!(session_id = %session_id, server = %self.base_url, "Session created");

        Ok(WireSession {
            client: self.clone(),
            session_id,
        })
    }
}

/// Extract the `value` of a response, or the W3C error it carries
pub fn parse_response(status: u16, body: Value) -> Result<Value, WebDriverError> {
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if (200..300).contains(&status) {
        return Ok(value);
    }

    let code = value
        .get("error")
        .and_then(|v| v.as_str())
        .map(ErrorCode::from_w3c)
        .unwrap_or(ErrorCode::UnknownError);
    let message = value
        .get("message")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {}", status));

    Err(WebDriverError::Command { code, message })
}

/// A session created on a WebDriver or Appium server
#[derive(Debug)]
pub struct WireSession {
    client: WebDriverClient,
    session_id: String,
}

impl WireSession {
    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.session_id, suffix)
    }

    fn element_path(&self, element: &ElementRef, suffix: &str) -> String {
        self.path(&format!("/element/{}{}", element.id, suffix))
    }

    async fn get(&self, path: String) -> Result<Value, WebDriverError> {
        self.client.send(Method::GET, &path, None).await
    }

    async fn post(&self, path: String, body: Value) -> Result<Value, WebDriverError> {
        self.client.send(Method::POST, &path, Some(body)).await
    }
}

fn expect_bool(value: Value) -> Result<bool, WebDriverError> {
    value
        .as_bool()
        .ok_or_else(|| WebDriverError::InvalidResponse(format!("Expected boolean, got {}", value)))
}

fn expect_string(value: Value) -> Result<String, WebDriverError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(WebDriverError::InvalidResponse(format!(
            "Expected string, got {}",
            other
        ))),
    }
}

#[async_trait]
impl Session for WireSession {
    fn id(&self) -> &str {
        &self.session_id
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self
            .post(
                self.path("/elements"),
                json!({ "using": locator.strategy(), "value": locator.value() }),
            )
            .await?;

        let items = value.as_array().ok_or_else(|| {
            WebDriverError::InvalidResponse("Expected element array".to_string())
        })?;

        items
            .iter()
            .map(|item| {
                ElementRef::from_json(item).ok_or_else(|| {
                    WebDriverError::InvalidResponse(format!("Not an element reference: {}", item))
                })
            })
            .collect()
    }

    async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.post(self.element_path(element, "/click"), json!({}))
            .await?;
        Ok(())
    }

    async fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.post(self.element_path(element, "/clear"), json!({}))
            .await?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        self.post(self.element_path(element, "/value"), json!({ "text": text }))
            .await?;
        Ok(())
    }

    async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        expect_string(self.get(self.element_path(element, "/text")).await?)
    }

    async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        let value = self
            .get(self.element_path(element, &format!("/attribute/{}", name)))
            .await?;
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        expect_bool(self.get(self.element_path(element, "/displayed")).await?)
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        expect_bool(self.get(self.element_path(element, "/enabled")).await?)
    }

    async fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, WebDriverError> {
        self.post(
            self.path("/execute/sync"),
            json!({ "script": script, "args": args }),
        )
        .await
    }

    async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.post(self.path("/url"), json!({ "url": url })).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, WebDriverError> {
        expect_string(self.get(self.path("/url")).await?)
    }

    async fn window_size(&self) -> Result<WindowSize, WebDriverError> {
        let rect = self.get(self.path("/window/rect")).await?;
        let dimension = |key: &str| {
            rect.get(key)
                .and_then(|v| v.as_f64())
                .map(|v| v as u32)
                .ok_or_else(|| {
                    WebDriverError::InvalidResponse(format!("Window rect without {}", key))
                })
        };
        Ok(WindowSize {
            width: dimension("width")?,
            height: dimension("height")?,
        })
    }

    async fn maximize_window(&self) -> Result<(), WebDriverError> {
        self.post(self.path("/window/maximize"), json!({})).await?;
        Ok(())
    }

    async fn perform_actions(&self, actions: Value) -> Result<(), WebDriverError> {
        self.post(self.path("/actions"), json!({ "actions": actions }))
            .await?;
        Ok(())
    }

    async fn release_actions(&self) -> Result<(), WebDriverError> {
        self.client
            .send(Method::DELETE, &self.path("/actions"), None)
            .await?;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, WebDriverError> {
        let encoded = expect_string(self.get(self.path("/screenshot")).await?)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| WebDriverError::InvalidResponse(format!("Bad screenshot payload: {}", e)))
    }

    async fn quit(&self) -> Result<(), WebDriverError> {
        self.client
            .send(Method::DELETE, &self.path(""), None)
            .await?;
        info!(session_id = %self.session_id, "Session closed");
        Ok(())
    }
}
