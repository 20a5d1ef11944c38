use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::interaction::{Interactor, Locator};

/// Buttons that close the cookie consent overlay
pub const CONSENT_BUTTONS: &[&str] = &["//button[contains(.,'Accepter & Fermer')]"];

/// Dismisses the cookie consent overlay on the web site
#[derive(Debug, Clone)]
pub struct ConsentBanner {
    timeout: Duration,
    pause: Duration,
}

impl ConsentBanner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pause: Duration::from_secs(1),
        }
    }

    /// Pause after each click while the overlay animates away
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Click every consent button that shows up; returns one line per button.
    ///
    /// A button that never becomes clickable is assumed already handled.
    pub async fn dismiss(&self, ui: &Interactor) -> String {
        let mut summary = Vec::new();

        for xpath in CONSENT_BUTTONS {
            let locator = Locator::xpath(*xpath);
            let clicked = match ui.wait_for_clickable(&locator, self.timeout).await {
                Ok(element) => ui.context().session().click(&element).await.is_ok(),
                Err(e) => {
                    debug!("Consent button unavailable: {}", e);
                    false
                }
            };

            if clicked {
                summary.push(format!("Clicked: {}", xpath));
                sleep(self.pause).await;
            } else {
                summary.push(format!("Not found or already handled: {}", xpath));
            }
        }

        let summary = summary.join("\n");
        info!("Consent banner: {}", summary.replace('\n', "; "));
        summary
    }
}
