//! Resilient interaction layer
//!
//! This module wraps raw session commands with bounded waits and fallbacks:
//! - `locator` - Locator and PlatformLocator
//! - `wait` - WaitPolicy, Condition, Lookup and the polling loops
//! - `escalation` - ordered click strategies and the `first_success` combinator
//! - `platform_ops` - per-platform scroll, swipe and click capabilities
//!
//! [`Interactor`] is what page objects build on.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::bridge::{ElementRef, Session};
use crate::suite::{Platform, TestContext};

pub mod error;
pub mod escalation;
pub mod locator;
pub mod platform_ops;
pub mod wait;

pub use error::{Attempt, InteractionError};
pub use escalation::{first_success, ClickTier, Escalation, Strategy, SETTLE_PAUSE};
pub use locator::{Locator, PlatformLocator};
pub use platform_ops::{ops_for, AndroidOps, IosOps, PlatformOps, WebOps};
pub use wait::{Condition, Lookup, WaitPolicy, WaitProfile};

const CLEAR_VALUE: &str = "arguments[0].value = '';";
const READY_STATE: &str = "return document.readyState;";
const AJAX_IDLE: &str = "return window.jQuery ? jQuery.active == 0 : true;";

/// Element operations for one scenario's session
#[derive(Debug, Clone)]
pub struct Interactor {
    ctx: TestContext,
    settle: Duration,
}

impl Interactor {
    pub fn new(ctx: TestContext) -> Self {
        Self {
            ctx,
            settle: SETTLE_PAUSE,
        }
    }

    /// Override the pause between scrolling and clicking
    pub fn with_settle_pause(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn context(&self) -> &TestContext {
        &self.ctx
    }

    pub fn platform(&self) -> Platform {
        self.ctx.platform
    }

    pub fn settle_pause(&self) -> Duration {
        self.settle
    }

    fn session(&self) -> &dyn Session {
        self.ctx.session()
    }

    fn ops(&self) -> &'static dyn PlatformOps {
        self.ctx.ops()
    }

    // ========================================================================
    // Waits
    // ========================================================================

    pub async fn lookup(
        &self,
        locator: &Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<Lookup, InteractionError> {
        Ok(wait::poll_lookup(
            self.session(),
            locator,
            condition,
            timeout,
            self.ctx.waits.poll_interval,
        )
        .await?)
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: Condition,
        timeout: Duration,
    ) -> Result<ElementRef, InteractionError> {
        match self.lookup(locator, condition, timeout).await? {
            Lookup::Found(element) => Ok(element),
            Lookup::NotFound | Lookup::TimedOut => Err(InteractionError::Timeout {
                locator: locator.clone(),
                condition,
                timeout,
                context: None,
            }),
        }
    }

    pub async fn wait_for_presence(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<ElementRef, InteractionError> {
        self.wait_for(locator, Condition::Present, timeout).await
    }

    pub async fn wait_for_visibility(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<ElementRef, InteractionError> {
        self.wait_for(locator, Condition::Visible, timeout).await
    }

    pub async fn wait_for_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<ElementRef, InteractionError> {
        self.wait_for(locator, Condition::Clickable, timeout).await
    }

    /// Wait for at least one match, then return every match
    pub async fn wait_for_all_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Vec<ElementRef>, InteractionError> {
        self.wait_for_presence(locator, timeout).await?;
        Ok(self.session().find_elements(locator).await?)
    }

    /// `true` once nothing matching `locator` is displayed
    pub async fn wait_to_disappear(&self, locator: &Locator, timeout: Duration) -> bool {
        wait::poll_absent(self.session(), locator, timeout, self.ctx.waits.poll_interval)
            .await
            .unwrap_or(false)
    }

    /// First match without waiting
    pub async fn locate(&self, locator: &Locator) -> Result<ElementRef, InteractionError> {
        platform_ops::first_element(self.session(), locator).await
    }

    // ========================================================================
    // Boolean queries (never fail)
    // ========================================================================

    pub async fn is_displayed(&self, locator: &Locator) -> bool {
        let Ok(element) = self.wait_for_presence(locator, self.ctx.waits.default).await else {
            return false;
        };
        self.session().is_displayed(&element).await.unwrap_or(false)
    }

    /// Short visibility wait
    pub async fn is_element_displayed(&self, locator: &Locator) -> bool {
        matches!(
            self.lookup(locator, Condition::Visible, self.ctx.waits.short).await,
            Ok(Lookup::Found(_))
        )
    }

    pub async fn is_present(&self, locator: &Locator) -> bool {
        matches!(
            self.lookup(locator, Condition::Present, self.ctx.waits.short).await,
            Ok(Lookup::Found(_))
        )
    }

    pub async fn is_enabled(&self, locator: &Locator) -> bool {
        let Ok(element) = self.wait_for_presence(locator, self.ctx.waits.short).await else {
            return false;
        };
        self.session().is_enabled(&element).await.unwrap_or(false)
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Click through the platform's escalation; returns the winning strategy
    pub async fn click(
        &self,
        locator: &Locator,
        context: Option<&str>,
    ) -> Result<Escalation, InteractionError> {
        let strategies: Vec<&dyn Strategy<Interactor>> = self
            .ops()
            .click_escalation()
            .iter()
            .map(|tier| tier as &dyn Strategy<Interactor>)
            .collect();

        let escalation = first_success(&strategies, self, locator, context).await?;
        debug!(%locator, strategy = %escalation.strategy, "Clicked");
        Ok(escalation)
    }

    pub async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        context: Option<&str>,
    ) -> Result<(), InteractionError> {
        let result = async {
            let element = self.wait_for_visibility(locator, self.ctx.waits.default).await?;
            self.session().clear(&element).await?;
            self.session().send_keys(&element, text).await?;
            Ok::<_, InteractionError>(())
        }
        .await;

        result.map_err(|e| InteractionError::Input {
            locator: locator.clone(),
            context: context.map(str::to_string),
            source: Box::new(e),
        })
    }

    pub async fn read(&self, locator: &Locator) -> Result<String, InteractionError> {
        let element = self.wait_for_visibility(locator, self.ctx.waits.default).await?;
        Ok(self.session().text(&element).await?)
    }

    /// The `value` attribute, empty when absent
    pub async fn read_value(&self, locator: &Locator) -> Result<String, InteractionError> {
        let element = self.wait_for_visibility(locator, self.ctx.waits.default).await?;
        Ok(self
            .session()
            .attribute(&element, "value")
            .await?
            .unwrap_or_default())
    }

    /// Native clear, then a scripted empty value where scripts can run
    pub async fn clear(&self, locator: &Locator) -> Result<(), InteractionError> {
        let result = async {
            let element = self.wait_for_visibility(locator, self.ctx.waits.default).await?;
            self.session().clear(&element).await?;
            if self.ops().supports_scripts() {
                self.session()
                    .execute_script(CLEAR_VALUE, vec![element.to_json()])
                    .await?;
            }
            Ok::<_, InteractionError>(())
        }
        .await;

        result.map_err(|e| InteractionError::Input {
            locator: locator.clone(),
            context: None,
            source: Box::new(e),
        })
    }

    pub async fn scroll_to(&self, locator: &Locator) -> Result<(), InteractionError> {
        self.ops()
            .scroll_into_view(self.session(), locator)
            .await
            .map_err(|e| InteractionError::Scroll {
                locator: locator.clone(),
                source: Box::new(e),
            })
    }

    /// Vertical swipe given as fractions of the viewport.
    ///
    /// Mobile only; on Web nothing is dispatched.
    pub async fn swipe_vertical(
        &self,
        start: f64,
        end: f64,
        x: f64,
    ) -> Result<(), InteractionError> {
        if !self.platform().is_mobile() {
            debug!(platform = %self.platform(), "Swipe skipped");
            return Ok(());
        }

        let result = async {
            let size = self.session().window_size().await?;
            let px = |fraction: f64, extent: u32| (f64::from(extent) * fraction) as i64;
            let from = (px(x, size.width), px(start, size.height));
            let to = (px(x, size.width), px(end, size.height));
            self.ops().swipe(self.session(), from, to).await
        }
        .await;

        result.map(|_| ()).map_err(|e| InteractionError::Gesture {
            context: Some(format!("swipe {start} -> {end} at x={x}")),
            source: Box::new(e),
        })
    }

    /// Click the first match whose trimmed text equals `text`.
    ///
    /// Returns `false` without clicking when nothing matches.
    pub async fn select_by_visible_text(
        &self,
        locator: &Locator,
        text: &str,
    ) -> Result<bool, InteractionError> {
        let elements = match self.wait_for_all_present(locator, self.ctx.waits.short).await {
            Ok(elements) => elements,
            Err(e) if e.is_session_fatal() => return Err(e),
            Err(_) => return Ok(false),
        };

        for element in &elements {
            let label = match self.session().text(element).await {
                Ok(label) => label,
                Err(e) if e.is_session_fatal() => return Err(e.into()),
                Err(_) => continue,
            };
            if label.trim() == text {
                self.session().click(element).await?;
                return Ok(true);
            }
        }

        debug!(%locator, text, "No option with matching text");
        Ok(false)
    }

    // ========================================================================
    // Page state (Web only)
    // ========================================================================

    pub async fn wait_for_page_ready(&self) -> Result<(), InteractionError> {
        if !self.ops().supports_scripts() {
            return Ok(());
        }
        self.wait_for_script(READY_STATE, |v| v.as_str() == Some("complete"))
            .await
    }

    pub async fn wait_for_ajax(&self) -> Result<(), InteractionError> {
        if !self.ops().supports_scripts() {
            return Ok(());
        }
        self.wait_for_script(AJAX_IDLE, |v| v.as_bool() == Some(true))
            .await
    }

    async fn wait_for_script(
        &self,
        script: &str,
        done: impl Fn(&serde_json::Value) -> bool,
    ) -> Result<(), InteractionError> {
        let timeout = self.ctx.waits.default;
        let deadline = Instant::now() + timeout;
        let mut last = serde_json::Value::Null;

        loop {
            match self.session().execute_script(script, Vec::new()).await {
                Ok(value) if done(&value) => return Ok(()),
                Ok(value) => last = value,
                Err(e) if e.is_session_fatal() => return Err(e.into()),
                Err(e) => warn!("Page state script failed: {}", e),
            }

            let now = Instant::now();
            if now >= deadline {
                info!(%last, "Page did not settle in time");
                return Err(InteractionError::PageNotReady {
                    timeout,
                    state: last.to_string(),
                });
            }
            sleep(self.ctx.waits.poll_interval.min(deadline - now)).await;
        }
    }
}
