//! Bounded waits
//!
//! Every wait is a polling loop: query the session, check the condition,
//! sleep for the poll interval, give up once the timeout has elapsed.

use std::fmt;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use super::Locator;
use crate::bridge::{ElementRef, Session, WebDriverError};

/// Named timeout profiles, selected by call-site intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub short: Duration,
    pub default: Duration,
    pub long: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(5),
            default: Duration::from_secs(15),
            long: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitProfile {
    Short,
    Default,
    Long,
}

impl WaitPolicy {
    pub fn timeout(&self, profile: WaitProfile) -> Duration {
        match profile {
            WaitProfile::Short => self.short,
            WaitProfile::Default => self.default,
            WaitProfile::Long => self.long,
        }
    }
}

/// State an element is waited into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Present,
    Visible,
    /// Visible and enabled
    Clickable,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Condition::Present => "present",
            Condition::Visible => "visible",
            Condition::Clickable => "clickable",
        })
    }
}

/// Outcome of a bounded element query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(ElementRef),
    /// No element matched the locator before the timeout
    NotFound,
    /// Elements matched but never reached the condition
    TimedOut,
}

impl Lookup {
    pub fn found(self) -> Option<ElementRef> {
        match self {
            Lookup::Found(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

async fn meets(
    session: &dyn Session,
    element: &ElementRef,
    condition: Condition,
) -> Result<bool, WebDriverError> {
    match condition {
        Condition::Present => Ok(true),
        Condition::Visible => session.is_displayed(element).await,
        Condition::Clickable => {
            Ok(session.is_displayed(element).await? && session.is_enabled(element).await?)
        }
    }
}

/// Poll until the first element matching `locator` meets `condition`.
///
/// Element-level errors (stale references, transient lookup failures) count
/// as "not yet"; only session-fatal errors are returned. A zero timeout makes
/// exactly one attempt.
pub async fn poll_lookup(
    session: &dyn Session,
    locator: &Locator,
    condition: Condition,
    timeout: Duration,
    interval: Duration,
) -> Result<Lookup, WebDriverError> {
    let deadline = Instant::now() + timeout;
    let mut seen = false;

    loop {
        match session.find_elements(locator).await {
            Ok(elements) => {
                if let Some(element) = elements.into_iter().next() {
                    seen = true;
                    match meets(session, &element, condition).await {
                        Ok(true) => return Ok(Lookup::Found(element)),
                        Ok(false) => {}
                        Err(e) if e.is_session_fatal() => return Err(e),
                        Err(e) => debug!(%locator, "Condition check failed: {}", e),
                    }
                }
            }
            Err(e) if e.is_session_fatal() => return Err(e),
            Err(e) => debug!(%locator, "Lookup failed: {}", e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(if seen { Lookup::TimedOut } else { Lookup::NotFound });
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Poll until no element matching `locator` is displayed
pub async fn poll_absent(
    session: &dyn Session,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> Result<bool, WebDriverError> {
    let deadline = Instant::now() + timeout;

    loop {
        let mut visible = false;
        match session.find_elements(locator).await {
            Ok(elements) => {
                for element in &elements {
                    match session.is_displayed(element).await {
                        Ok(true) => {
                            visible = true;
                            break;
                        }
                        Ok(false) => {}
                        Err(e) if e.is_session_fatal() => return Err(e),
                        // A stale element has left the page
                        Err(_) => {}
                    }
                }
            }
            Err(e) if e.is_session_fatal() => return Err(e),
            Err(_) => visible = true,
        }

        if !visible {
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(interval.min(deadline - now)).await;
    }
}
