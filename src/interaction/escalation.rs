//! Click escalation
//!
//! A click is an ordered list of strategies tried by [`first_success`]
//! until one reports success. Element-level failures move on to the next
//! strategy; a session-fatal failure stops the escalation at once.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::error::Attempt;
use super::platform_ops::first_element;
use super::{InteractionError, Interactor, Locator};

/// Pause between scrolling an element into view and clicking it
pub const SETTLE_PAUSE: Duration = Duration::from_millis(500);

const SCROLL_INTO_VIEW: &str = "arguments[0].scrollIntoView(true);";
const SCRIPT_CLICK: &str = "arguments[0].click();";
const FORCE_VISIBLE_CLICK: &str = "var el = arguments[0];\
el.style.border = '3px solid red';\
el.style.visibility = 'visible';\
el.style.opacity = '1';\
el.style.display = 'block';\
el.style.pointerEvents = 'auto';\
el.click();";

/// One way of performing an action on `target`
#[async_trait]
pub trait Strategy<T: ?Sized + Sync>: Send + Sync {
    fn name(&self) -> &str;

    async fn attempt(&self, target: &T, locator: &Locator) -> Result<(), InteractionError>;
}

/// Which strategy succeeded, and what failed before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escalation {
    pub strategy: String,
    pub failed: Vec<Attempt>,
}

impl Escalation {
    /// Zero-based index of the winning strategy
    pub fn tier(&self) -> usize {
        self.failed.len()
    }
}

/// Try `strategies` in order; the first success ends the escalation.
pub async fn first_success<T: ?Sized + Sync>(
    strategies: &[&dyn Strategy<T>],
    target: &T,
    locator: &Locator,
    context: Option<&str>,
) -> Result<Escalation, InteractionError> {
    let mut failed = Vec::new();

    for strategy in strategies {
        match strategy.attempt(target, locator).await {
            Ok(()) => {
                if !failed.is_empty() {
                    info!(%locator, strategy = strategy.name(), "Click succeeded after escalation");
                }
                return Ok(Escalation {
                    strategy: strategy.name().to_string(),
                    failed,
                });
            }
            Err(e) if e.is_session_fatal() => return Err(e),
            Err(e) => {
                debug!(%locator, strategy = strategy.name(), "Strategy failed: {}", e);
                failed.push(Attempt {
                    strategy: strategy.name().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    Err(InteractionError::NotClickable {
        locator: locator.clone(),
        context: context.map(str::to_string),
        attempts: failed,
    })
}

// ============================================================================
// Click strategies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTier {
    /// Wait until clickable, then a native click
    Native,
    /// Scroll into view, settle, script click
    ScrollAndScript,
    /// Script click without scrolling
    Script,
    /// Last resort: forces the element visible and clickable before a
    /// script click. This can hide real defects in the page under test.
    ForcedVisibility,
}

impl ClickTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickTier::Native => "native",
            ClickTier::ScrollAndScript => "scroll-and-script",
            ClickTier::Script => "script",
            ClickTier::ForcedVisibility => "forced-visibility",
        }
    }
}

#[async_trait]
impl Strategy<Interactor> for ClickTier {
    fn name(&self) -> &str {
        self.as_str()
    }

    async fn attempt(
        &self,
        target: &Interactor,
        locator: &Locator,
    ) -> Result<(), InteractionError> {
        let session = target.context().session();

        match self {
            ClickTier::Native => {
                let element = target
                    .wait_for_clickable(locator, target.context().waits.default)
                    .await?;
                session.click(&element).await?;
            }
            ClickTier::ScrollAndScript => {
                let element = first_element(session, locator).await?;
                session
                    .execute_script(SCROLL_INTO_VIEW, vec![element.to_json()])
                    .await?;
                sleep(target.settle_pause()).await;
                session
                    .execute_script(SCRIPT_CLICK, vec![element.to_json()])
                    .await?;
            }
            ClickTier::Script => {
                let element = first_element(session, locator).await?;
                session
                    .execute_script(SCRIPT_CLICK, vec![element.to_json()])
                    .await?;
            }
            ClickTier::ForcedVisibility => {
                warn!(
                    %locator,
                    "Forcing element visibility to click it; this may hide a real defect"
                );
                let element = first_element(session, locator).await?;
                session
                    .execute_script(FORCE_VISIBLE_CLICK, vec![element.to_json()])
                    .await?;
            }
        }
        Ok(())
    }
}
