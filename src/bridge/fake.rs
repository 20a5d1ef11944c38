//! In-memory session for unit tests
//!
//! Elements are registered per locator with scripted behaviour; every
//! command is recorded so tests can assert on what was dispatched.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ElementRef, ErrorCode, Session, WebDriverError, WindowSize};
use crate::interaction::Locator;

/// How a script-driven `click()` on an element behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClick {
    Works,
    Fails,
    /// Only succeeds once the element was scrolled into view
    NeedsScroll,
    /// Only succeeds after the forced-visibility style mutation
    NeedsForce,
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: String,
    pub text: String,
    pub value: Option<String>,
    pub displayed: bool,
    pub enabled: bool,
    /// Number of displayed checks that report `false` before `displayed` applies
    pub hidden_checks: u32,
    pub stale: bool,
    pub click_error: Option<ErrorCode>,
    pub script_click: ScriptClick,
    scrolled: bool,
}

impl FakeElement {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: String::new(),
            value: None,
            displayed: true,
            enabled: true,
            hidden_checks: 0,
            stale: false,
            click_error: None,
            script_click: ScriptClick::Works,
            scrolled: false,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn visible_after(mut self, checks: u32) -> Self {
        self.hidden_checks = checks;
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn click_error(mut self, code: ErrorCode) -> Self {
        self.click_error = Some(code);
        self
    }

    pub fn script_click(mut self, behaviour: ScriptClick) -> Self {
        self.script_click = behaviour;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindElements(Locator),
    Click(String),
    Clear(String),
    SendKeys(String, String),
    Script(String, Vec<Value>),
    Navigate(String),
    MaximizeWindow,
    PerformActions(Value),
    ReleaseActions,
    Screenshot,
    Quit,
}

#[derive(Debug, Default)]
struct FakeState {
    elements: HashMap<Locator, Vec<FakeElement>>,
    calls: Vec<Call>,
    disconnected: bool,
}

#[derive(Debug)]
pub struct FakeSession {
    id: String,
    state: Mutex<FakeState>,
    pub url: Mutex<String>,
    pub ready_state: Mutex<String>,
    pub window: WindowSize,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSession {
    pub fn new() -> Self {
        Self {
            id: "fake-session".to_string(),
            state: Mutex::new(FakeState::default()),
            url: Mutex::new("about:blank".to_string()),
            ready_state: Mutex::new("complete".to_string()),
            window: WindowSize {
                width: 1080,
                height: 2400,
            },
        }
    }

    pub fn with_element(self, locator: Locator, element: FakeElement) -> Self {
        self.add_element(locator, element);
        self
    }

    pub fn add_element(&self, locator: Locator, element: FakeElement) {
        self.state
            .lock()
            .unwrap()
            .elements
            .entry(locator)
            .or_default()
            .push(element);
    }

    /// Every subsequent command fails as if the server went away
    pub fn disconnect(&self) {
        self.state.lock().unwrap().disconnected = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Click(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Script(script, _) => Some(script),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<(), WebDriverError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.disconnected {
            return Err(WebDriverError::Connection {
                url: "fake://".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn with_element_mut<T>(
        &self,
        element: &ElementRef,
        f: impl FnOnce(&mut FakeElement) -> Result<T, WebDriverError>,
    ) -> Result<T, WebDriverError> {
        let mut state = self.state.lock().unwrap();
        let found = state
            .elements
            .values_mut()
            .flat_map(|v| v.iter_mut())
            .find(|e| e.id == element.id);
        match found {
            Some(e) if e.stale => Err(WebDriverError::command(
                ErrorCode::StaleElementReference,
                "element is not attached to the page document",
            )),
            Some(e) => f(e),
            None => Err(WebDriverError::command(ErrorCode::NoSuchElement, &element.id)),
        }
    }

    fn script_target(args: &[Value]) -> Option<ElementRef> {
        args.first().and_then(ElementRef::from_json)
    }
}

#[async_trait]
impl Session for FakeSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>, WebDriverError> {
        self.record(Call::FindElements(locator.clone()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .elements
            .get(locator)
            .map(|v| v.iter().map(|e| ElementRef::new(&e.id)).collect())
            .unwrap_or_default())
    }

    async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.record(Call::Click(element.id.clone()))?;
        self.with_element_mut(element, |e| match &e.click_error {
            Some(code) => Err(WebDriverError::command(code.clone(), "native click failed")),
            None => Ok(()),
        })
    }

    async fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.record(Call::Clear(element.id.clone()))?;
        self.with_element_mut(element, |e| {
            e.value = Some(String::new());
            Ok(())
        })
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        self.record(Call::SendKeys(element.id.clone(), text.to_string()))?;
        self.with_element_mut(element, |e| {
            let mut value = e.value.clone().unwrap_or_default();
            value.push_str(text);
            e.value = Some(value);
            Ok(())
        })
    }

    async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        self.with_element_mut(element, |e| Ok(e.text.clone()))
    }

    async fn attribute(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, WebDriverError> {
        self.with_element_mut(element, |e| match name {
            "value" => Ok(e.value.clone()),
            _ => Ok(None),
        })
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        self.with_element_mut(element, |e| {
            if e.hidden_checks > 0 {
                e.hidden_checks -= 1;
                return Ok(false);
            }
            Ok(e.displayed)
        })
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool, WebDriverError> {
        self.with_element_mut(element, |e| Ok(e.enabled))
    }

    async fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> Result<Value, WebDriverError> {
        self.record(Call::Script(script.to_string(), args.clone()))?;

        if script.contains("document.readyState") {
            return Ok(Value::String(self.ready_state.lock().unwrap().clone()));
        }
        if script.contains("jQuery.active") {
            return Ok(Value::Bool(true));
        }

        let Some(target) = Self::script_target(&args) else {
            return Ok(Value::Null);
        };

        let forced = script.contains("pointerEvents");
        let clicks = script.contains(".click()");
        let scrolls = script.contains("scrollIntoView");

        self.with_element_mut(&target, |e| {
            if scrolls {
                e.scrolled = true;
            }
            if script.contains("value = ''") {
                e.value = Some(String::new());
            }
            if !clicks {
                return Ok(Value::Null);
            }
            let ok = match e.script_click {
                ScriptClick::Works => true,
                ScriptClick::Fails => false,
                ScriptClick::NeedsScroll => e.scrolled,
                ScriptClick::NeedsForce => forced,
            };
            if ok {
                Ok(Value::Null)
            } else {
                Err(WebDriverError::command(
                    ErrorCode::JavascriptError,
                    "click() had no effect",
                ))
            }
        })
    }

    async fn navigate(&self, url: &str) -> Result<(), WebDriverError> {
        self.record(Call::Navigate(url.to_string()))?;
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, WebDriverError> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn window_size(&self) -> Result<WindowSize, WebDriverError> {
        Ok(self.window)
    }

    async fn maximize_window(&self) -> Result<(), WebDriverError> {
        self.record(Call::MaximizeWindow)
    }

    async fn perform_actions(&self, actions: Value) -> Result<(), WebDriverError> {
        self.record(Call::PerformActions(actions))
    }

    async fn release_actions(&self) -> Result<(), WebDriverError> {
        self.record(Call::ReleaseActions)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, WebDriverError> {
        self.record(Call::Screenshot)?;
        Ok(b"\x89PNG fake".to_vec())
    }

    async fn quit(&self) -> Result<(), WebDriverError> {
        self.record(Call::Quit)
    }
}
