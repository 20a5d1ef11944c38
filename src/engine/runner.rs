//! Scenario lifecycle
//!
//! [`ScenarioRunner`] owns one scenario: it selects the platform, obtains
//! the session, runs steps while recording them in the ledger, and tears
//! everything down afterwards.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use super::error::ScenarioError;
use super::ledger::{sanitize_file_name, Ledger, StepRecord, StepStatus};
use crate::bridge::Session;
use crate::driver::DriverProvider;
use crate::interaction::{InteractionError, Interactor};
use crate::pages::ConsentBanner;
use crate::suite::{Platform, PlatformSelector, SuiteConfig, TestContext};

pub const STEP_TEST_START: &str = "Début du Test";
pub const STEP_LAUNCH: &str = "Lancement de l'Application";
pub const STEP_CONSENT: &str = "Gestion des Popups et Cookies";
pub const STEP_TEST_END: &str = "Fin du Test";

pub struct ScenarioRunner {
    provider: Arc<DriverProvider>,
    selector: PlatformSelector,
    ledger: Ledger,
    scenario: String,
    session: Option<Arc<dyn Session>>,
}

impl ScenarioRunner {
    pub fn new(provider: Arc<DriverProvider>) -> Self {
        Self::with_ledger(provider, Ledger::new())
    }

    pub fn with_ledger(provider: Arc<DriverProvider>, ledger: Ledger) -> Self {
        Self {
            provider,
            selector: PlatformSelector::new(),
            ledger,
            scenario: String::new(),
            session: None,
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        self.provider.config()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn selector(&self) -> &PlatformSelector {
        &self.selector
    }

    pub fn failed(&self) -> bool {
        self.ledger.has_failures()
    }

    fn record(&self, step: &str, status: StepStatus) -> StepRecord {
        StepRecord::new(self.ledger.run_id(), &self.scenario, step, status)
    }

    fn platform(&self) -> Result<Platform, ScenarioError> {
        Ok(self.selector.current()?)
    }

    /// Context for page objects of the running scenario
    pub fn context(&self) -> Result<TestContext, ScenarioError> {
        let session = self.session.clone().ok_or(ScenarioError::NoSession)?;
        Ok(TestContext::new(
            self.platform()?,
            session,
            self.config().wait_policy(),
        ))
    }

    async fn current_url(&self) -> Option<String> {
        match &self.session {
            Some(session) => session.current_url().await.ok(),
            None => None,
        }
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Select the platform and start its session
    #[instrument(skip(self))]
    pub async fn before(&mut self, scenario: &str) -> Result<(), ScenarioError> {
        self.scenario = scenario.to_string();

        let started = async {
            let platform = self.config().platform()?;
            self.selector.set(platform);

            let record = self.record(STEP_TEST_START, StepStatus::Started).platform(platform);
            let record = if platform.is_mobile() {
                record.expected(format!("L'application {} doit être lancée", platform))
            } else {
                record
            };
            self.ledger.record(record);

            let session = self.provider.current(&self.selector).await?;
            self.session = Some(session);
            Ok::<_, ScenarioError>(())
        }
        .await;

        if let Err(e) = &started {
            error!("Scenario setup failed: {}", e);
            let record = self
                .record(STEP_TEST_START, StepStatus::Failed)
                .error(format!("Erreur d'initialisation: {}", e));
            self.ledger.record(record);
        }
        started
    }

    /// Open the site (Web) or confirm the app is up (mobile)
    pub async fn launch_app(&mut self) -> Result<(), ScenarioError> {
        let ctx = self.context()?;
        let base_url = self.config().base_url.clone();

        if ctx.platform != Platform::Web {
            let record = self
                .record(STEP_LAUNCH, StepStatus::Passed)
                .actual("L'application a été lancée avec la session");
            self.ledger.record(record);
            return Ok(());
        }

        info!("Launching web application: {}", base_url);
        let launched = async {
            ctx.session()
                .navigate(&base_url)
                .await
                .map_err(InteractionError::from)?;
            let ui = Interactor::new(ctx.clone());
            ui.wait_for_page_ready().await?;
            Ok::<_, ScenarioError>(ui)
        }
        .await;

        match launched {
            Ok(ui) => {
                let summary = ConsentBanner::new(self.config().waits.consent())
                    .dismiss(&ui)
                    .await;
                let consent = self.record(STEP_CONSENT, StepStatus::Passed).actual(summary);
                self.ledger.record(consent);

                let record = self
                    .record(STEP_LAUNCH, StepStatus::Passed)
                    .actual("L'application web a été lancée avec succès")
                    .url(Some(base_url));
                self.ledger.record(record);
                Ok(())
            }
            Err(e) => {
                let record = self
                    .record(STEP_LAUNCH, StepStatus::Failed)
                    .error(format!("Erreur de lancement: {}", e));
                self.ledger.record(record);
                Err(e)
            }
        }
    }

    /// Run one step; the action returns the observed result.
    ///
    /// A failed step is recorded and its error returned to end the scenario.
    pub async fn execute_step<F, Fut>(
        &mut self,
        step: &str,
        expected: &str,
        action: F,
    ) -> Result<String, ScenarioError>
    where
        F: FnOnce(TestContext) -> Fut,
        Fut: Future<Output = Result<String, ScenarioError>>,
    {
        info!("Executing step: {}", step);
        let started = self.record(step, StepStatus::Started).expected(expected);
        self.ledger.record(started);

        let outcome = match self.context() {
            Ok(ctx) => action(ctx).await,
            Err(e) => Err(e),
        };
        let url = self.current_url().await;

        match outcome {
            Ok(actual) => {
                let record = self
                    .record(step, StepStatus::Passed)
                    .expected(expected)
                    .actual(actual.clone())
                    .url(url);
                self.ledger.record(record);
                Ok(actual)
            }
            Err(e) => {
                let record = self
                    .record(step, StepStatus::Failed)
                    .expected(expected)
                    .error(e.to_string())
                    .url(url);
                self.ledger.record(record);
                Err(e)
            }
        }
    }

    /// Screenshot on failure, final record, report, session close.
    ///
    /// Returns the report path. Teardown problems are logged only.
    #[instrument(skip(self))]
    pub async fn after(&mut self, failed: bool) -> Option<PathBuf> {
        let failed = failed || self.failed();
        let url = self.current_url().await;

        let mut record = if failed {
            self.record(STEP_TEST_END, StepStatus::Failed)
        } else {
            self.record(STEP_TEST_END, StepStatus::Passed)
                .actual("Test terminé avec succès")
        };
        record = record.url(url);
        if let Ok(platform) = self.selector.current() {
            record = record.platform(platform);
        }

        if failed {
            match self.capture_screenshot().await {
                Some(path) => {
                    record = record
                        .actual("Test échoué - Capture d'écran ajoutée")
                        .screenshot(path);
                }
                None => record = record.actual("Test échoué"),
            }
        }
        self.ledger.record(record);

        let report = match self.ledger.write_report(&self.config().report_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not write report: {}", e);
                None
            }
        };

        if let Ok(platform) = self.selector.current() {
            if let Err(e) = self.provider.close_session(platform).await {
                warn!("Could not close {} session: {}", platform, e);
            }
        }
        self.session = None;

        report
    }

    async fn capture_screenshot(&self) -> Option<PathBuf> {
        let session = self.session.as_ref()?;
        let png = match session.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                warn!("Could not take screenshot: {}", e);
                return None;
            }
        };

        let dir = self.config().report_dir.join("screenshots");
        let name = format!(
            "{}_{}.png",
            sanitize_file_name(&self.scenario),
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = dir.join(name);

        let written = std::fs::create_dir_all(&dir).and_then(|_| std::fs::write(&path, png));
        match written {
            Ok(()) => {
                info!("Screenshot saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Could not save screenshot: {}", e);
                None
            }
        }
    }
}
