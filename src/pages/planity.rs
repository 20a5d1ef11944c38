use tracing::info;

use crate::interaction::{InteractionError, Interactor, Locator, PlatformLocator};
use crate::suite::TestContext;

fn hairdresser_link() -> PlatformLocator {
    PlatformLocator::new()
        .web(Locator::xpath("//a[@id='nav-item-0'][@href='/coiffeur']"))
        .android(Locator::android_text("Coiffeur"))
        .ios(Locator::ios_predicate("label == 'Coiffeur'"))
}

fn location_input() -> PlatformLocator {
    PlatformLocator::new()
        // the id carries a per-build numeric suffix
        .web(Locator::css("input[id^='main-where-input']"))
        .android(Locator::android_text("Adresse, ville..."))
        .ios(Locator::ios_predicate("value == 'Adresse, ville...'"))
}

fn search_button() -> PlatformLocator {
    PlatformLocator::new()
        .web(Locator::xpath("//span[text()='Rechercher']"))
        .android(Locator::android_text("Recherche"))
        .ios(Locator::ios_predicate("label == 'Recherche'"))
}

fn results_title(city: &str) -> PlatformLocator {
    let heading = format!("Coiffeurs à {}", city);
    PlatformLocator::new()
        .web(Locator::css("h2#place-title-0-category-page"))
        .android(Locator::android_text_contains(&heading))
        .ios(Locator::ios_predicate(format!(
            "label CONTAINS '{}'",
            heading.replace('\'', "\\'")
        )))
}

/// The Planity home and search screens
#[derive(Debug, Clone)]
pub struct PlanityPage {
    ui: Interactor,
}

impl PlanityPage {
    pub fn new(ctx: TestContext) -> Self {
        Self {
            ui: Interactor::new(ctx),
        }
    }

    pub fn from_interactor(ui: Interactor) -> Self {
        Self { ui }
    }

    pub fn interactor(&self) -> &Interactor {
        &self.ui
    }

    fn resolve(
        &self,
        element: &str,
        locator: &PlatformLocator,
    ) -> Result<Locator, InteractionError> {
        let ops = self.ui.context().ops();
        ops.locate_for(locator)
            .cloned()
            .ok_or_else(|| InteractionError::NoLocator {
                element: element.to_string(),
                platform: ops.platform(),
            })
    }

    pub async fn click_hairdresser_link(&self) -> Result<(), InteractionError> {
        let locator = self.resolve("hairdresser link", &hairdresser_link())?;
        self.ui.click(&locator, Some("hairdresser menu link")).await?;
        Ok(())
    }

    pub async fn enter_location(&self, location: &str) -> Result<(), InteractionError> {
        let locator = self.resolve("location field", &location_input())?;
        self.ui
            .type_text(&locator, location, Some("location field"))
            .await
    }

    pub async fn click_search(&self) -> Result<(), InteractionError> {
        let locator = self.resolve("search button", &search_button())?;
        let escalation = self.ui.click(&locator, Some("search button")).await?;
        if escalation.tier() > 0 {
            info!(strategy = %escalation.strategy, "Search button needed escalation");
        }
        Ok(())
    }

    pub async fn click_hairdresser_city_link(&self) -> Result<(), InteractionError> {
        let locator = self.resolve("hairdresser link", &hairdresser_link())?;
        self.ui.click(&locator, Some("hairdresser city link")).await?;
        Ok(())
    }

    pub async fn hairdresser_results_displayed(&self, city: &str) -> bool {
        match self.resolve("results title", &results_title(city)) {
            Ok(locator) => self.ui.is_displayed(&locator).await,
            Err(_) => false,
        }
    }
}
