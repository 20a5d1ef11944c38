//! Test context for scenario runtime
//!
//! A [`TestContext`] is built once per scenario and handed to every page
//! object and interaction: it carries the platform, the live session and
//! the wait policy, so nothing below the scenario runner reads global state.

use std::fmt;
use std::sync::Arc;

use super::platform::Platform;
use crate::bridge::Session;
use crate::interaction::{ops_for, PlatformOps, WaitPolicy};

#[derive(Clone)]
pub struct TestContext {
    pub platform: Platform,
    pub session: Arc<dyn Session>,
    pub waits: WaitPolicy,
}

impl TestContext {
    pub fn new(platform: Platform, session: Arc<dyn Session>, waits: WaitPolicy) -> Self {
        Self {
            platform,
            session,
            waits,
        }
    }

    /// Platform-specific locate/gesture behaviour
    pub fn ops(&self) -> &'static dyn PlatformOps {
        ops_for(self.platform)
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("platform", &self.platform)
            .field("session", &self.session.id())
            .field("waits", &self.waits)
            .finish()
    }
}
