//! Per-platform capabilities
//!
//! Everything that differs between Web, Android and iOS lives behind
//! [`PlatformOps`]: which locator applies, how to scroll and swipe, whether
//! scripts can run, and which click strategies are worth trying.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::escalation::ClickTier;
use super::{InteractionError, Locator, PlatformLocator};
use crate::bridge::{ElementRef, Session};
use crate::suite::Platform;

/// Hold time before a swipe starts moving
pub const SWIPE_HOLD: Duration = Duration::from_millis(1000);

#[async_trait]
pub trait PlatformOps: Send + Sync {
    fn platform(&self) -> Platform;

    fn locate_for<'a>(&self, locator: &'a PlatformLocator) -> Option<&'a Locator> {
        locator.get(self.platform())
    }

    /// Whether `execute_script` can touch the UI under test
    fn supports_scripts(&self) -> bool;

    /// Ordered click strategies for this platform
    fn click_escalation(&self) -> &'static [ClickTier];

    async fn scroll_into_view(
        &self,
        session: &dyn Session,
        locator: &Locator,
    ) -> Result<(), InteractionError>;

    /// Drag from one viewport point to another.
    ///
    /// Returns `false` when the platform has no touch gestures and nothing
    /// was dispatched.
    async fn swipe(
        &self,
        session: &dyn Session,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Result<bool, InteractionError>;
}

pub(crate) async fn first_element(
    session: &dyn Session,
    locator: &Locator,
) -> Result<ElementRef, InteractionError> {
    session
        .find_elements(locator)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| InteractionError::NotFound {
            locator: locator.clone(),
            context: None,
        })
}

async fn touch_swipe(
    session: &dyn Session,
    from: (i64, i64),
    to: (i64, i64),
) -> Result<bool, InteractionError> {
    let hold = SWIPE_HOLD.as_millis() as u64;
    let actions = json!([{
        "type": "pointer",
        "id": "finger1",
        "parameters": { "pointerType": "touch" },
        "actions": [
            { "type": "pointerMove", "duration": 0, "origin": "viewport", "x": from.0, "y": from.1 },
            { "type": "pointerDown", "button": 0 },
            { "type": "pause", "duration": hold },
            { "type": "pointerMove", "duration": hold, "origin": "viewport", "x": to.0, "y": to.1 },
            { "type": "pointerUp", "button": 0 }
        ]
    }]);
    session.perform_actions(actions).await?;
    session.release_actions().await?;
    Ok(true)
}

// ============================================================================
// Web
// ============================================================================

pub struct WebOps;

#[async_trait]
impl PlatformOps for WebOps {
    fn platform(&self) -> Platform {
        Platform::Web
    }

    fn supports_scripts(&self) -> bool {
        true
    }

    fn click_escalation(&self) -> &'static [ClickTier] {
        &[
            ClickTier::Native,
            ClickTier::ScrollAndScript,
            ClickTier::Script,
            ClickTier::ForcedVisibility,
        ]
    }

    async fn scroll_into_view(
        &self,
        session: &dyn Session,
        locator: &Locator,
    ) -> Result<(), InteractionError> {
        let element = first_element(session, locator).await?;
        session
            .execute_script(
                "arguments[0].scrollIntoView({behavior: 'smooth', block: 'center'});",
                vec![element.to_json()],
            )
            .await?;
        Ok(())
    }

    async fn swipe(
        &self,
        _session: &dyn Session,
        _from: (i64, i64),
        _to: (i64, i64),
    ) -> Result<bool, InteractionError> {
        Ok(false)
    }
}

// ============================================================================
// Android
// ============================================================================

pub struct AndroidOps;

impl AndroidOps {
    /// UiScrollable search for the element a locator names
    pub fn scrollable_search(locator: &Locator) -> Locator {
        let target = match locator {
            Locator::AndroidUiAutomator(selector) => selector.clone(),
            other => format!(
                "new UiSelector().descriptionContains(\"{}\")",
                other.value().replace('"', "\\\"")
            ),
        };
        Locator::ui_automator(format!(
            "new UiScrollable(new UiSelector().scrollable(true).instance(0)).scrollIntoView({})",
            target
        ))
    }
}

#[async_trait]
impl PlatformOps for AndroidOps {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn supports_scripts(&self) -> bool {
        false
    }

    fn click_escalation(&self) -> &'static [ClickTier] {
        &[ClickTier::Native]
    }

    async fn scroll_into_view(
        &self,
        session: &dyn Session,
        locator: &Locator,
    ) -> Result<(), InteractionError> {
        // The device scrolls while resolving the selector
        first_element(session, &Self::scrollable_search(locator)).await?;
        Ok(())
    }

    async fn swipe(
        &self,
        session: &dyn Session,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Result<bool, InteractionError> {
        touch_swipe(session, from, to).await
    }
}

// ============================================================================
// iOS
// ============================================================================

pub struct IosOps;

#[async_trait]
impl PlatformOps for IosOps {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn supports_scripts(&self) -> bool {
        false
    }

    fn click_escalation(&self) -> &'static [ClickTier] {
        &[ClickTier::Native]
    }

    async fn scroll_into_view(
        &self,
        session: &dyn Session,
        locator: &Locator,
    ) -> Result<(), InteractionError> {
        let element = first_element(session, locator).await?;
        session
            .execute_script(
                "mobile: scroll",
                vec![json!({ "direction": "down", "elementId": element.id })],
            )
            .await?;
        Ok(())
    }

    async fn swipe(
        &self,
        session: &dyn Session,
        from: (i64, i64),
        to: (i64, i64),
    ) -> Result<bool, InteractionError> {
        touch_swipe(session, from, to).await
    }
}

static WEB: WebOps = WebOps;
static ANDROID: AndroidOps = AndroidOps;
static IOS: IosOps = IosOps;

pub fn ops_for(platform: Platform) -> &'static dyn PlatformOps {
    match platform {
        Platform::Web => &WEB,
        Platform::Android => &ANDROID,
        Platform::Ios => &IOS,
    }
}
