use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{capabilities, DriverError};
use crate::bridge::{Session, WebDriverClient};
use crate::suite::{Platform, PlatformSelector, SuiteConfig};

/// Creates sessions on an automation server
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(
        &self,
        platform: Platform,
        config: &SuiteConfig,
    ) -> Result<Arc<dyn Session>, DriverError>;
}

/// Creates W3C sessions over HTTP
#[derive(Debug, Default)]
pub struct WireSessionFactory;

#[async_trait]
impl SessionFactory for WireSessionFactory {
    async fn create(
        &self,
        platform: Platform,
        config: &SuiteConfig,
    ) -> Result<Arc<dyn Session>, DriverError> {
        let caps = capabilities::for_platform(platform, config)?;
        let server = config.server_url(platform);

        let client = WebDriverClient::new(server, config.command_timeout())?;
        let session = client
            .new_session(caps)
            .await
            .map_err(|e| DriverError::SessionInit {
                platform,
                reason: format!("{} ({})", e, server),
            })?;

        if platform == Platform::Web {
            if let Err(e) = session.maximize_window().await {
                warn!("Could not maximize browser window: {}", e);
            }
        }

        Ok(Arc::new(session))
    }
}

/// At most one live session per platform
pub struct DriverProvider {
    config: SuiteConfig,
    factory: Box<dyn SessionFactory>,
    sessions: Mutex<HashMap<Platform, Arc<dyn Session>>>,
}

impl DriverProvider {
    pub fn new(config: SuiteConfig) -> Self {
        Self::with_factory(config, Box::new(WireSessionFactory))
    }

    pub fn with_factory(config: SuiteConfig, factory: Box<dyn SessionFactory>) -> Self {
        Self {
            config,
            factory,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Cached session for `platform`, created on first use
    pub async fn get_session(&self, platform: Platform) -> Result<Arc<dyn Session>, DriverError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&platform) {
            return Ok(session.clone());
        }

        info!(platform = %platform, "Starting session");
        let session = self.factory.create(platform, &self.config).await?;
        sessions.insert(platform, session.clone());
        Ok(session)
    }

    /// Session of the selected platform
    pub async fn current(
        &self,
        selector: &PlatformSelector,
    ) -> Result<Arc<dyn Session>, DriverError> {
        self.get_session(selector.current()?).await
    }

    pub async fn is_live(&self, platform: Platform) -> bool {
        self.sessions.lock().await.contains_key(&platform)
    }

    /// Quit the session of `platform`; a no-op when none is live.
    ///
    /// Mobile apps are terminated first; a failed termination only logs.
    pub async fn close_session(&self, platform: Platform) -> Result<(), DriverError> {
        let Some(session) = self.sessions.lock().await.remove(&platform) else {
            debug!(platform = %platform, "No session to close");
            return Ok(());
        };

        if let Some(args) = self.terminate_args(platform) {
            if let Err(e) = session.execute_script("mobile: terminateApp", vec![args]).await {
                warn!(platform = %platform, "Could not terminate app: {}", e);
            }
        }

        session.quit().await?;
        info!(platform = %platform, "Session closed");
        Ok(())
    }

    pub async fn close_all(&self) -> Result<(), DriverError> {
        let platforms: Vec<Platform> = self.sessions.lock().await.keys().copied().collect();
        let results = join_all(platforms.iter().map(|p| self.close_session(*p))).await;

        let mut first_error = None;
        for (platform, result) in platforms.into_iter().zip(results) {
            if let Err(e) = result {
                warn!(platform = %platform, "Close failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn terminate_args(&self, platform: Platform) -> Option<serde_json::Value> {
        match platform {
            Platform::Web => None,
            Platform::Android => Some(json!({ "appId": self.config.android.app_package })),
            Platform::Ios => self
                .config
                .ios
                .bundle_id
                .as_ref()
                .map(|id| json!({ "bundleId": id })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::bridge::fake::{Call, FakeSession};
    use crate::bridge::WebDriverError;

    /// Hands out one shared fake and counts creations
    struct FakeFactory {
        session: Arc<FakeSession>,
        created: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl SessionFactory for FakeFactory {
        async fn create(
            &self,
            platform: Platform,
            _config: &SuiteConfig,
        ) -> Result<Arc<dyn Session>, DriverError> {
            if self.fail {
                return Err(DriverError::SessionInit {
                    platform,
                    reason: "connection refused".to_string(),
                });
            }
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(self.session.clone())
        }
    }

    fn provider(
        config: SuiteConfig,
        fail: bool,
    ) -> (DriverProvider, Arc<FakeSession>, Arc<AtomicUsize>) {
        let session = Arc::new(FakeSession::new());
        let created = Arc::new(AtomicUsize::new(0));
        let factory = FakeFactory {
            session: session.clone(),
            created: created.clone(),
            fail,
        };
        (
            DriverProvider::with_factory(config, Box::new(factory)),
            session,
            created,
        )
    }

    #[tokio::test]
    async fn test_get_session_is_cached() {
        let (provider, _, created) = provider(SuiteConfig::default(), false);

        provider.get_session(Platform::Web).await.unwrap();
        provider.get_session(Platform::Web).await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 1);

        provider.get_session(Platform::Android).await.unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_close_session_is_idempotent() {
        let (provider, session, _) = provider(SuiteConfig::default(), false);

        provider.get_session(Platform::Web).await.unwrap();
        provider.close_session(Platform::Web).await.unwrap();
        provider.close_session(Platform::Web).await.unwrap();

        assert!(!provider.is_live(Platform::Web).await);
        let quits = session.calls().iter().filter(|c| **c == Call::Quit).count();
        assert_eq!(quits, 1);
    }

    #[tokio::test]
    async fn test_close_android_terminates_app_first() {
        let (provider, session, _) = provider(SuiteConfig::default(), false);

        provider.get_session(Platform::Android).await.unwrap();
        provider.close_session(Platform::Android).await.unwrap();

        assert_eq!(
            session.calls(),
            vec![
                Call::Script(
                    "mobile: terminateApp".to_string(),
                    vec![json!({ "appId": "com.planity.android" })]
                ),
                Call::Quit
            ]
        );
    }

    #[tokio::test]
    async fn test_close_ios_without_bundle_id_only_quits() {
        let (provider, session, _) = provider(SuiteConfig::default(), false);

        provider.get_session(Platform::Ios).await.unwrap();
        provider.close_session(Platform::Ios).await.unwrap();
        assert_eq!(session.calls(), vec![Call::Quit]);
    }

    #[tokio::test]
    async fn test_session_init_failure_is_not_cached() {
        let (provider, _, _) = provider(SuiteConfig::default(), true);

        let err = provider.get_session(Platform::Web).await.err().unwrap();
        assert!(matches!(err, DriverError::SessionInit { .. }));
        assert!(!provider.is_live(Platform::Web).await);
    }

    #[tokio::test]
    async fn test_current_requires_selected_platform() {
        let (provider, _, _) = provider(SuiteConfig::default(), false);

        let err = provider.current(&PlatformSelector::new()).await.err().unwrap();
        assert!(matches!(err, DriverError::UnsupportedPlatform(_)));

        let selector = PlatformSelector::with_platform(Platform::Android);
        provider.current(&selector).await.unwrap();
        assert!(provider.is_live(Platform::Android).await);
    }

    #[tokio::test]
    async fn test_close_all_reports_quit_failure() {
        let (provider, session, _) = provider(SuiteConfig::default(), false);
        provider.get_session(Platform::Web).await.unwrap();
        session.disconnect();

        let err = provider.close_all().await.unwrap_err();
        assert!(matches!(err, DriverError::WebDriver(WebDriverError::Connection { .. })));
        assert!(!provider.is_live(Platform::Web).await);
    }

    #[tokio::test]
    async fn test_unsupported_browser_fails_before_connecting() {
        let config = SuiteConfig {
            browser: "opera".to_string(),
            ..SuiteConfig::default()
        };
        let err = WireSessionFactory
            .create(Platform::Web, &config)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported browser: opera"));
    }
}
